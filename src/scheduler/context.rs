use super::{util, RosterError, RosterRequest};
use crate::config::RosterConfig;
use crate::model::{LeaveRecord, LeaveStatus, Personnel, PersonnelId};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Vue validée d'une demande : personnel trié par identifiant, congés
/// approuvés seulement, dates de la semaine.
pub(super) struct WeekContext<'a> {
    pub week_start: NaiveDate,
    pub dates: Vec<NaiveDate>,
    pub personnel: Vec<&'a Personnel>,
    pub assigned_at: DateTime<Utc>,
    leaves: Vec<&'a LeaveRecord>,
    index: HashMap<&'a PersonnelId, usize>,
}

impl<'a> WeekContext<'a> {
    pub fn new(request: &'a RosterRequest) -> Result<Self, RosterError> {
        let week_start = util::parse_week_start(&request.week_start_date)?;
        let dates = util::week_dates(week_start)?;

        let mut personnel: Vec<&Personnel> = request.personnel.iter().collect();
        personnel.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(dup) = personnel.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(RosterError::InvalidInput(format!(
                "duplicate personnel id: {}",
                dup[0].id
            )));
        }

        for leave in &request.leaves {
            if leave.end_date < leave.start_date {
                return Err(RosterError::InvalidInput(format!(
                    "leave {} for {} ends before it starts",
                    leave.id, leave.personnel_id
                )));
            }
        }
        let leaves: Vec<&LeaveRecord> = request
            .leaves
            .iter()
            .filter(|l| l.status == LeaveStatus::Approved)
            .collect();

        let index = personnel
            .iter()
            .enumerate()
            .map(|(idx, p)| (&p.id, idx))
            .collect();

        let assigned_at = request
            .assigned_at
            .unwrap_or_else(|| Utc.from_utc_datetime(&week_start.and_time(NaiveTime::MIN)));

        debug!(
            week_start = %week_start,
            personnel = personnel.len(),
            approved_leaves = leaves.len(),
            "week context prepared"
        );

        Ok(Self {
            week_start,
            dates,
            personnel,
            assigned_at,
            leaves,
            index,
        })
    }

    pub fn index_of(&self, id: &PersonnelId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn on_leave(&self, id: &PersonnelId, date: NaiveDate) -> bool {
        self.leaves
            .iter()
            .any(|l| &l.personnel_id == id && l.blocks(date))
    }

    /// Refuse la semaine d'emblée s'il y a moins de personnes que de postes
    /// d'un créneau, globalement ou un jour donné une fois les congés retirés.
    /// Le poste au plus gros effectif est cité dans l'erreur.
    pub fn precheck(&self, config: &RosterConfig) -> Result<(), RosterError> {
        let Some((duty_type, duty_headcount)) = config.binding_requirement() else {
            return Err(RosterError::InvalidInput(
                "duty requirement table requires no slot".to_string(),
            ));
        };
        // un seul service par date : chaque poste d'un créneau veut une personne distincte
        let required = config.slots_per_shift();
        let active: Vec<&Personnel> = self
            .personnel
            .iter()
            .copied()
            .filter(|p| p.is_assignable())
            .collect();
        if active.len() < required as usize {
            return Err(RosterError::InsufficientPersonnel {
                duty_type,
                duty_headcount,
                required,
                available: active.len(),
                date: None,
            });
        }
        for date in &self.dates {
            let available = active
                .iter()
                .filter(|p| !self.on_leave(&p.id, *date))
                .count();
            if available < required as usize {
                return Err(RosterError::InsufficientPersonnel {
                    duty_type,
                    duty_headcount,
                    required,
                    available,
                    date: Some(*date),
                });
            }
        }
        Ok(())
    }
}
