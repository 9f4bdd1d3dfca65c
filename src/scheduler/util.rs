use super::RosterError;
use crate::model::{AssignmentId, DutyAssignment};
use chrono::{Days, NaiveDate};

/// Nombre de jours couverts par une génération.
pub(super) const WEEK_DAYS: u64 = 7;

pub(super) fn parse_week_start(raw: &str) -> Result<NaiveDate, RosterError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| RosterError::InvalidInput(format!("malformed week start date: {raw:?}")))
}

pub(super) fn week_dates(start: NaiveDate) -> Result<Vec<NaiveDate>, RosterError> {
    (0..WEEK_DAYS)
        .map(|offset| {
            start
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| RosterError::InvalidInput("week overflows calendar".to_string()))
        })
        .collect()
}

pub(super) fn find_assignment_index(
    assignments: &[DutyAssignment],
    id: &AssignmentId,
) -> Option<usize> {
    assignments.iter().position(|a| &a.id == id)
}
