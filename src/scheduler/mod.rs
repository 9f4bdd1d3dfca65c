mod assignment;
mod conflicts;
mod context;
mod eligibility;
mod fairness;
mod mutate;
mod slots;
mod types;
mod util;

pub use slots::enumerate_slots;
pub use types::{
    DutySlot, ReasonCode, RosterError, RosterFailure, RosterRequest, UnfilledSlot, Violation,
    ViolationKind,
};

use crate::config::RosterConfig;
use crate::model::{AssignmentId, DutyAssignment, PersonnelId};

/// Générateur de tableau de service hebdomadaire.
///
/// Calcul pur : mêmes entrées, même sortie (ordre et contenu). Les
/// affectations sont remplies glouton, créneau par créneau, dans l'ordre
/// de `enumerate_slots`.
#[derive(Debug, Clone, Default)]
pub struct RosterScheduler {
    config: RosterConfig,
}

impl RosterScheduler {
    /// Construit un scheduler ; la configuration est validée d'emblée.
    pub fn new(config: RosterConfig) -> Result<Self, RosterError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Génère les affectations de la semaine, ou l'échec structuré.
    pub fn generate(&self, request: &RosterRequest) -> Result<Vec<DutyAssignment>, RosterError> {
        assignment::generate_week(self, request)
    }

    /// Contrôle une liste d'affectations contre les contraintes dures.
    pub fn audit(
        &self,
        request: &RosterRequest,
        assignments: &[DutyAssignment],
    ) -> Result<Vec<Violation>, RosterError> {
        conflicts::audit(self, request, assignments)
    }

    pub fn reassign(
        &self,
        request: &RosterRequest,
        assignments: &mut [DutyAssignment],
        assignment: &AssignmentId,
        person: &PersonnelId,
    ) -> Result<(), RosterError> {
        mutate::reassign(self, request, assignments, assignment, person)
    }

    pub fn swap(
        &self,
        request: &RosterRequest,
        assignments: &mut [DutyAssignment],
        a: &AssignmentId,
        b: &AssignmentId,
    ) -> Result<(), RosterError> {
        mutate::swap(self, request, assignments, a, b)
    }
}
