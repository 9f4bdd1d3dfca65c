use super::context::WeekContext;
use super::{DutySlot, ReasonCode};
use crate::config::RosterConfig;
use crate::model::Personnel;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Personnes déjà de service à une date donnée (index dans le contexte).
pub(super) type BusySet = HashSet<(usize, NaiveDate)>;

/// Premier filtre qui écarte `person` du créneau, ou `None` si candidat.
///
/// Les filtres sont appliqués dans l'ordre de `ReasonCode` : statut, congé,
/// grade, puis déjà de service sur la même date (même créneau ou créneau opposé).
pub(super) fn exclusion(
    ctx: &WeekContext<'_>,
    config: &RosterConfig,
    busy: &BusySet,
    idx: usize,
    person: &Personnel,
    slot: &DutySlot,
) -> Option<ReasonCode> {
    if !person.is_assignable() {
        return Some(ReasonCode::NoActivePersonnel);
    }
    if ctx.on_leave(&person.id, slot.date) {
        return Some(ReasonCode::AllOnLeave);
    }
    if config.rank_excluded(slot.duty_type, person.rank) {
        return Some(ReasonCode::RankIneligible);
    }
    if busy.contains(&(idx, slot.date)) {
        return Some(ReasonCode::AlreadyAssignedThisPeriod);
    }
    None
}

/// Étape à laquelle la liste de candidats s'est vidée : le filtre le plus
/// tardif parmi ceux qui ont écarté chaque personne.
pub(super) fn classify<I>(exclusions: I) -> ReasonCode
where
    I: IntoIterator<Item = ReasonCode>,
{
    exclusions
        .into_iter()
        .max()
        .unwrap_or(ReasonCode::NoActivePersonnel)
}
