use crate::model::{DutyAssignment, DutyType, LeaveRecord, Personnel, PersonnelId, Shift};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Demande de génération pour une semaine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRequest {
    pub personnel: Vec<Personnel>,
    #[serde(default)]
    pub leaves: Vec<LeaveRecord>,
    #[serde(default)]
    pub past_duties: Vec<DutyAssignment>,
    /// Date ISO `YYYY-MM-DD` du premier jour de la semaine.
    pub week_start_date: String,
    /// Horodatage porté par les affectations générées (défaut : début de semaine, 00h UTC).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
}

/// Unité élémentaire à pourvoir : (date, créneau, poste, position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutySlot {
    pub date: NaiveDate,
    pub shift: Shift,
    pub duty_type: DutyType,
    pub slot_index: u32,
}

/// Raison pour laquelle un créneau n'a trouvé aucun candidat : l'étape de
/// filtrage à laquelle la liste de candidats est devenue vide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    NoActivePersonnel,
    AllOnLeave,
    RankIneligible,
    AlreadyAssignedThisPeriod,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::NoActivePersonnel => "NoActivePersonnel",
            ReasonCode::AllOnLeave => "AllOnLeave",
            ReasonCode::RankIneligible => "RankIneligible",
            ReasonCode::AlreadyAssignedThisPeriod => "AlreadyAssignedThisPeriod",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfilledSlot {
    #[serde(flatten)]
    pub slot: DutySlot,
    pub reason_code: ReasonCode,
}

/// Échec structuré : tous les créneaux non pourvus, plus les affectations
/// partielles (diagnostic uniquement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterFailure {
    pub unfilled_slots: Vec<UnfilledSlot>,
    pub partial_assignments: Vec<DutyAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    DoubleBooking,
    BothShiftsSameDay,
    OnLeave,
    RankIneligible,
    Inactive,
    UnknownPersonnel,
    UnderFilled,
    OverFilled,
    OutsideWeek,
}

/// Contrainte dure non respectée par une liste d'affectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub kind: ViolationKind,
    pub personnel_id: Option<PersonnelId>,
    pub date: NaiveDate,
    pub shift: Option<Shift>,
    pub duty_type: Option<DutyType>,
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(
        "insufficient personnel: {required} required per shift ({duty_type} alone needs {duty_headcount}), {available} available{}",
        on_date(.date)
    )]
    InsufficientPersonnel {
        duty_type: DutyType,
        duty_headcount: u32,
        required: u32,
        available: usize,
        date: Option<NaiveDate>,
    },
    #[error("{} duty slot(s) could not be filled", .0.unfilled_slots.len())]
    Unfillable(RosterFailure),
    #[error("unknown personnel: {0}")]
    UnknownPersonnel(String),
    #[error("unknown assignment: {0}")]
    UnknownAssignment(String),
    #[error("reassignment invalid: {0}")]
    ReassignInvalid(&'static str),
}

fn on_date(date: &Option<NaiveDate>) -> String {
    date.map(|d| format!(" on {d}")).unwrap_or_default()
}
