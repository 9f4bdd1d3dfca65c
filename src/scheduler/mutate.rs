use super::context::WeekContext;
use super::{conflicts, util, RosterError, RosterRequest, RosterScheduler, ViolationKind};
use crate::model::{AssignmentId, DutyAssignment, PersonnelId};

pub(super) fn reassign(
    scheduler: &RosterScheduler,
    request: &RosterRequest,
    assignments: &mut [DutyAssignment],
    assignment: &AssignmentId,
    person: &PersonnelId,
) -> Result<(), RosterError> {
    let Some(pos) = util::find_assignment_index(assignments, assignment) else {
        return Err(RosterError::UnknownAssignment(assignment.as_str().to_string()));
    };
    if &assignments[pos].personnel_id == person {
        return Ok(());
    }

    let ctx = WeekContext::new(request)?;
    check_holder(scheduler, &ctx, person, &assignments[pos])?;

    let before = double_shifts(scheduler, request, assignments, person)?;
    let prev = std::mem::replace(&mut assignments[pos].personnel_id, person.clone());
    let after = double_shifts(scheduler, request, assignments, person)?;
    if after > before {
        assignments[pos].personnel_id = prev;
        return Err(RosterError::ReassignInvalid("target already on duty that day"));
    }
    Ok(())
}

pub(super) fn swap(
    scheduler: &RosterScheduler,
    request: &RosterRequest,
    assignments: &mut [DutyAssignment],
    a: &AssignmentId,
    b: &AssignmentId,
) -> Result<(), RosterError> {
    let Some(pos_a) = util::find_assignment_index(assignments, a) else {
        return Err(RosterError::UnknownAssignment(a.as_str().to_string()));
    };
    let Some(pos_b) = util::find_assignment_index(assignments, b) else {
        return Err(RosterError::UnknownAssignment(b.as_str().to_string()));
    };
    let person_a = assignments[pos_a].personnel_id.clone();
    let person_b = assignments[pos_b].personnel_id.clone();
    if person_a == person_b {
        return Ok(());
    }

    let ctx = WeekContext::new(request)?;
    check_holder(scheduler, &ctx, &person_b, &assignments[pos_a])?;
    check_holder(scheduler, &ctx, &person_a, &assignments[pos_b])?;

    let before = double_shifts(scheduler, request, assignments, &person_a)?
        + double_shifts(scheduler, request, assignments, &person_b)?;
    assignments[pos_a].personnel_id = person_b.clone();
    assignments[pos_b].personnel_id = person_a.clone();
    let after = double_shifts(scheduler, request, assignments, &person_a)?
        + double_shifts(scheduler, request, assignments, &person_b)?;
    if after > before {
        assignments[pos_a].personnel_id = person_a;
        assignments[pos_b].personnel_id = person_b;
        return Err(RosterError::ReassignInvalid("swap introduces a double shift"));
    }
    Ok(())
}

/// Vérifie que `person` peut tenir l'affectation (hors règle de double service).
fn check_holder(
    scheduler: &RosterScheduler,
    ctx: &WeekContext<'_>,
    person: &PersonnelId,
    assignment: &DutyAssignment,
) -> Result<(), RosterError> {
    let Some(idx) = ctx.index_of(person) else {
        return Err(RosterError::UnknownPersonnel(person.as_str().to_string()));
    };
    let holder = ctx.personnel[idx];
    if !holder.is_assignable() {
        return Err(RosterError::ReassignInvalid("target personnel not active"));
    }
    if ctx.on_leave(person, assignment.date) {
        return Err(RosterError::ReassignInvalid("target personnel on approved leave"));
    }
    if scheduler
        .config
        .rank_excluded(assignment.duty_type, holder.rank)
    {
        return Err(RosterError::ReassignInvalid("target rank not eligible for this duty"));
    }
    Ok(())
}

fn double_shifts(
    scheduler: &RosterScheduler,
    request: &RosterRequest,
    assignments: &[DutyAssignment],
    person: &PersonnelId,
) -> Result<usize, RosterError> {
    let violations = conflicts::audit(scheduler, request, assignments)?;
    Ok(violations
        .iter()
        .filter(|v| v.personnel_id.as_ref() == Some(person))
        .filter(|v| {
            matches!(
                v.kind,
                ViolationKind::DoubleBooking | ViolationKind::BothShiftsSameDay
            )
        })
        .count())
}
