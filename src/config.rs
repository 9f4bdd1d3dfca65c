use crate::model::{DutyType, Rank};
use crate::scheduler::RosterError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Fenêtre d'historique prise en compte pour l'équité (jours).
pub const DEFAULT_LOOKBACK_DAYS: u32 = 28;

/// Effectif requis pour un poste, par créneau.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyRequirement {
    pub duty_type: DutyType,
    pub headcount: i32,
}

/// Règle d'éligibilité par grade : en dessous de `min_rank`, une personne
/// ne peut pas tenir `duty_type` quand le poste compte au plus
/// `applies_up_to_headcount` personnes (i.e. elle y serait seule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRule {
    pub duty_type: DutyType,
    pub min_rank: Rank,
    #[serde(default = "default_rule_headcount")]
    pub applies_up_to_headcount: u32,
}

fn default_rule_headcount() -> u32 {
    1
}

impl RankRule {
    /// Vrai si `rank` est exclu du poste pour l'effectif `headcount`.
    pub fn excludes(&self, rank: Rank, headcount: u32) -> bool {
        headcount <= self.applies_up_to_headcount && rank < self.min_rank
    }
}

/// Paramétrage complet d'une génération de tableau de service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterConfig {
    #[serde(default = "default_lookback")]
    pub lookback_days: u32,
    #[serde(default = "default_requirements")]
    pub requirements: Vec<DutyRequirement>,
    #[serde(default = "default_rank_rules")]
    pub rank_rules: Vec<RankRule>,
}

fn default_lookback() -> u32 {
    DEFAULT_LOOKBACK_DAYS
}

fn default_requirements() -> Vec<DutyRequirement> {
    DutyType::ALL
        .into_iter()
        .map(|duty_type| DutyRequirement {
            duty_type,
            headcount: duty_type.default_headcount() as i32,
        })
        .collect()
}

fn default_rank_rules() -> Vec<RankRule> {
    [DutyType::Radio, DutyType::Desk]
        .into_iter()
        .map(|duty_type| RankRule {
            duty_type,
            min_rank: Rank::OfficerIII,
            applies_up_to_headcount: 1,
        })
        .collect()
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            requirements: default_requirements(),
            rank_rules: default_rank_rules(),
        }
    }
}

impl RosterConfig {
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.requirements.is_empty() {
            return Err(invalid("duty requirement table cannot be empty"));
        }
        let mut seen = HashSet::new();
        for req in &self.requirements {
            if req.headcount < 0 {
                return Err(invalid(format!(
                    "negative headcount {} for {}",
                    req.headcount, req.duty_type
                )));
            }
            if !seen.insert(req.duty_type) {
                return Err(invalid(format!("duplicate requirement for {}", req.duty_type)));
            }
        }
        if self.slots_per_shift() == 0 {
            return Err(invalid("duty requirement table requires no slot"));
        }
        for rule in &self.rank_rules {
            if !seen.contains(&rule.duty_type) {
                return Err(invalid(format!(
                    "rank rule references {} which has no requirement",
                    rule.duty_type
                )));
            }
        }
        Ok(())
    }

    /// Exigences triées dans l'ordre déclaré des postes (effectif > 0).
    pub fn ordered_requirements(&self) -> Vec<(DutyType, u32)> {
        let mut out: Vec<(DutyType, u32)> = self
            .requirements
            .iter()
            .filter(|r| r.headcount > 0)
            .map(|r| (r.duty_type, r.headcount as u32))
            .collect();
        out.sort_by_key(|(duty, _)| *duty);
        out
    }

    pub fn headcount(&self, duty_type: DutyType) -> u32 {
        self.requirements
            .iter()
            .find(|r| r.duty_type == duty_type)
            .map_or(0, |r| r.headcount.max(0) as u32)
    }

    /// Postes d'un créneau, soit le personnel minimal disponible chaque jour.
    pub fn slots_per_shift(&self) -> u32 {
        self.requirements
            .iter()
            .map(|r| r.headcount.max(0) as u32)
            .sum()
    }

    /// Poste au plus gros effectif simultané (premier dans l'ordre déclaré
    /// en cas d'égalité).
    pub fn binding_requirement(&self) -> Option<(DutyType, u32)> {
        self.ordered_requirements()
            .into_iter()
            .fold(None, |best: Option<(DutyType, u32)>, cur| match best {
                Some(b) if b.1 >= cur.1 => Some(b),
                _ => Some(cur),
            })
    }

    /// Vrai si une règle de grade interdit ce poste à ce grade.
    pub fn rank_excluded(&self, duty_type: DutyType, rank: Rank) -> bool {
        let headcount = self.headcount(duty_type);
        self.rank_rules
            .iter()
            .filter(|rule| rule.duty_type == duty_type)
            .any(|rule| rule.excludes(rank, headcount))
    }
}

fn invalid<S: Into<String>>(msg: S) -> RosterError {
    RosterError::InvalidInput(msg.into())
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<RosterConfig> {
    let data = fs::read(&path)?;
    let config: RosterConfig = serde_json::from_slice(&data)?;
    config.validate()?;
    Ok(config)
}

pub fn export_config_json<P: AsRef<Path>>(path: P, config: &RosterConfig) -> Result<()> {
    config.validate()?;
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}
