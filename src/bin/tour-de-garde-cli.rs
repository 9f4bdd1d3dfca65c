#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tour_de_garde::{
    config::{export_config_json, load_config_from_file, RosterConfig},
    io,
    model::{AssignmentId, PersonnelId},
    scheduler::{RosterError, RosterRequest, RosterScheduler},
    storage::{HistoryStore, JsonHistoryStore},
    workload,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de tableaux de service hebdomadaires
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de configuration (postes, règles de grade, fenêtre d'équité)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le tableau d'une semaine
    Generate {
        /// Demande JSON complète (personnel, congés, historique, semaine)
        #[arg(long, conflicts_with_all = ["personnel", "leaves", "week_start"])]
        request: Option<String>,
        /// CSV du personnel
        #[arg(long)]
        personnel: Option<String>,
        /// CSV des congés
        #[arg(long)]
        leaves: Option<String>,
        /// Premier jour de la semaine (YYYY-MM-DD)
        #[arg(long)]
        week_start: Option<String>,
        /// Historique JSON des affectations passées
        #[arg(long)]
        history: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        /// Export CSV des créneaux non pourvus (optionnel)
        #[arg(long)]
        report: Option<String>,
        /// Ajoute le tableau généré à l'historique
        #[arg(long, requires = "history")]
        append_history: bool,
    },

    /// Vérifier une liste d'affectations
    Check {
        #[arg(long)]
        request: String,
        #[arg(long)]
        assignments: String,
        /// Export CSV des violations (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Bilan de charge par personne
    Stats {
        #[arg(long)]
        personnel: String,
        #[arg(long)]
        history: String,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Lister le personnel disponible, du moins récemment de service au plus récent
    Eligible {
        #[arg(long)]
        personnel: String,
        #[arg(long)]
        leaves: Option<String>,
        #[arg(long)]
        history: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
    },

    /// Réattribuer une affectation de l'historique à une autre personne
    Reassign {
        #[arg(long)]
        request: String,
        #[arg(long)]
        history: String,
        #[arg(long)]
        assignment: String,
        #[arg(long)]
        with: String,
    },

    /// Échanger les titulaires de deux affectations de l'historique
    Swap {
        #[arg(long)]
        request: String,
        #[arg(long)]
        history: String,
        #[arg(long)]
        first: String,
        #[arg(long)]
        second: String,
    },

    /// Écrire la configuration par défaut
    InitConfig {
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let config = match &cli.config {
        Some(path) => load_config_from_file(path)
            .with_context(|| format!("loading config {path}"))?,
        None => RosterConfig::default(),
    };
    let scheduler = RosterScheduler::new(config)?;

    let code = match cli.cmd {
        Commands::Generate {
            request,
            personnel,
            leaves,
            week_start,
            history,
            out_json,
            out_csv,
            report,
            append_history,
        } => {
            let mut req = match request {
                Some(path) => io::load_request_json(path)?,
                None => {
                    let Some(personnel) = personnel else {
                        bail!("--personnel or --request is required");
                    };
                    let Some(week_start) = week_start else {
                        bail!("--week-start is required with --personnel");
                    };
                    RosterRequest {
                        personnel: io::import_personnel_csv(personnel)?,
                        leaves: match leaves {
                            Some(path) => io::import_leaves_csv(path)?,
                            None => Vec::new(),
                        },
                        past_duties: Vec::new(),
                        week_start_date: week_start,
                        assigned_at: None,
                    }
                }
            };
            let store = history.map(JsonHistoryStore::open).transpose()?;
            if let Some(store) = &store {
                req.past_duties.extend(store.load()?);
            }

            match scheduler.generate(&req) {
                Ok(assignments) => {
                    if let Some(path) = out_json {
                        io::export_assignments_json(path, &assignments)?;
                    }
                    if let Some(path) = out_csv {
                        io::export_assignments_csv(path, &assignments)?;
                    }
                    if append_history {
                        if let Some(store) = &store {
                            let added = store.append(&assignments)?;
                            println!("{added} assignment(s) appended to history");
                        }
                    }
                    for a in &assignments {
                        println!(
                            "{} | {:<5} | {:<20} | {}",
                            a.date, a.shift, a.duty_type, a.personnel_id
                        );
                    }
                    0
                }
                Err(RosterError::Unfillable(failure)) => {
                    eprintln!(
                        "Found {} unfilled slot(s)",
                        failure.unfilled_slots.len()
                    );
                    if let Some(path) = report {
                        io::export_unfilled_csv(path, &failure)?;
                    }
                    println!("{}", serde_json::to_string_pretty(&failure)?);
                    // Code 2 = WARNING/INCOMPLETE
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Check {
            request,
            assignments,
            report,
        } => {
            let req = io::load_request_json(request)?;
            let assignments = io::load_assignments_json(assignments)?;
            let violations = scheduler.audit(&req, &assignments)?;
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["kind", "personnel_id", "date", "shift", "duty_type"])?;
                    for v in &violations {
                        let kind = format!("{:?}", v.kind);
                        let date = v.date.to_string();
                        let shift = v.shift.map(|s| s.to_string()).unwrap_or_default();
                        w.write_record([
                            kind.as_str(),
                            v.personnel_id.as_ref().map_or("", |p| p.as_str()),
                            date.as_str(),
                            shift.as_str(),
                            v.duty_type.map_or("", |d| d.label()),
                        ])?;
                    }
                    w.flush()?;
                }
                2
            }
        }
        Commands::Stats {
            personnel,
            history,
            out_csv,
        } => {
            let personnel = io::import_personnel_csv(personnel)?;
            let history = JsonHistoryStore::open(history)?.load()?;
            let rows = workload::workload(&personnel, &history);
            if let Some(path) = out_csv {
                io::export_workload_csv(path, &rows)?;
            }
            for r in &rows {
                println!(
                    "{} | {} | total {} (day {}, night {})",
                    r.personnel_id, r.name, r.total, r.day, r.night
                );
            }
            println!("spread: {}", workload::spread(&rows));
            0
        }
        Commands::Eligible {
            personnel,
            leaves,
            history,
            date,
        } => {
            let personnel = io::import_personnel_csv(personnel)?;
            let leaves = match leaves {
                Some(path) => io::import_leaves_csv(path)?,
                None => Vec::new(),
            };
            let history = JsonHistoryStore::open(history)?.load()?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("invalid date: {date}"))?;
            for g in workload::least_recently_tasked(&personnel, &leaves, &history, date) {
                let last = g
                    .last_duty
                    .map_or_else(|| "never".to_string(), |d| d.to_string());
                println!("{} | {} | last duty: {}", g.personnel_id, g.name, last);
            }
            0
        }
        Commands::Reassign {
            request,
            history,
            assignment,
            with,
        } => {
            let req = io::load_request_json(request)?;
            let store = JsonHistoryStore::open(history)?;
            let mut assignments = store.load()?;
            scheduler.reassign(
                &req,
                &mut assignments,
                &AssignmentId::new(assignment),
                &PersonnelId::new(with),
            )?;
            store.save(&assignments)?;
            0
        }
        Commands::Swap {
            request,
            history,
            first,
            second,
        } => {
            let req = io::load_request_json(request)?;
            let store = JsonHistoryStore::open(history)?;
            let mut assignments = store.load()?;
            scheduler.swap(
                &req,
                &mut assignments,
                &AssignmentId::new(first),
                &AssignmentId::new(second),
            )?;
            store.save(&assignments)?;
            0
        }
        Commands::InitConfig { out } => {
            export_config_json(out, scheduler.config())?;
            0
        }
    };

    std::process::exit(code);
}
