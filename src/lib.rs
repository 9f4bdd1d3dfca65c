#![forbid(unsafe_code)]
//! Tour de garde : génération déterministe de tableaux de service hebdomadaires.
//!
//! - Postes (garde, patrouille, radio, permanence, QRF) sur deux créneaux par jour.
//! - Filtrage des candidats : statut, congés approuvés, grade, un seul service par jour.
//! - Remplissage glouton avec départage équitable et déterministe.
//! - Échec structuré listant chaque créneau non pourvu, jamais de tableau partiel silencieux.

pub mod config;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;
pub mod workload;

pub use config::{
    export_config_json, load_config_from_file, DutyRequirement, RankRule, RosterConfig,
    DEFAULT_LOOKBACK_DAYS,
};
pub use model::{
    AssignmentId, DutyAssignment, DutyType, LeaveRecord, LeaveStatus, LeaveType, Personnel,
    PersonnelId, PersonnelStatus, Rank, Section, Shift,
};
pub use scheduler::{
    enumerate_slots, DutySlot, ReasonCode, RosterError, RosterFailure, RosterRequest,
    RosterScheduler, UnfilledSlot, Violation, ViolationKind,
};
pub use storage::{HistoryStore, JsonHistoryStore};
pub use workload::{least_recently_tasked, spread, workload, EligibleGuard, PersonWorkload};
