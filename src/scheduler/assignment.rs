use super::context::WeekContext;
use super::eligibility::{self, BusySet};
use super::fairness::FairnessLedger;
use super::{slots, RosterError, RosterFailure, RosterRequest, RosterScheduler, UnfilledSlot};
use crate::model::{AssignmentId, DutyAssignment};
use tracing::{debug, info, warn};

pub(super) fn generate_week(
    scheduler: &RosterScheduler,
    request: &RosterRequest,
) -> Result<Vec<DutyAssignment>, RosterError> {
    let config = &scheduler.config;
    let ctx = WeekContext::new(request)?;
    ctx.precheck(config)?;

    let slots = slots::enumerate_slots(&ctx.dates, config);
    let mut ledger = FairnessLedger::from_history(&ctx, &request.past_duties, config.lookback_days);
    let mut busy = BusySet::new();
    let mut assignments = Vec::with_capacity(slots.len());
    let mut unfilled = Vec::new();

    info!(
        week_start = %ctx.week_start,
        slots = slots.len(),
        personnel = ctx.personnel.len(),
        "generating duty roster"
    );

    for slot in slots {
        let mut exclusions = Vec::new();
        let candidates = ctx.personnel.iter().enumerate().filter_map(|(idx, person)| {
            match eligibility::exclusion(&ctx, config, &busy, idx, person, &slot) {
                None => Some(idx),
                Some(reason) => {
                    exclusions.push(reason);
                    None
                }
            }
        });

        let Some(idx) = ledger.pick(candidates) else {
            let reason_code = eligibility::classify(exclusions);
            warn!(
                date = %slot.date,
                shift = %slot.shift,
                duty = %slot.duty_type,
                slot_index = slot.slot_index,
                reason = reason_code.as_str(),
                "duty slot left unfilled"
            );
            unfilled.push(UnfilledSlot { slot, reason_code });
            continue;
        };

        let person = ctx.personnel[idx];
        busy.insert((idx, slot.date));
        ledger.record(idx, slot.date, slot.shift);
        debug!(
            date = %slot.date,
            shift = %slot.shift,
            duty = %slot.duty_type,
            slot_index = slot.slot_index,
            personnel = %person.id,
            count = ledger.count(idx),
            "slot assigned"
        );

        let key = format!(
            "{}/{}/{}/{}/{}/{}",
            ctx.week_start,
            slot.date,
            slot.shift,
            slot.duty_type.code(),
            slot.slot_index,
            person.id
        );
        assignments.push(DutyAssignment {
            id: AssignmentId::derived(key),
            personnel_id: person.id.clone(),
            duty_type: slot.duty_type,
            date: slot.date,
            shift: slot.shift,
            assigned_at: ctx.assigned_at,
        });
    }

    if unfilled.is_empty() {
        info!(assignments = assignments.len(), "duty roster complete");
        Ok(assignments)
    } else {
        warn!(
            unfilled = unfilled.len(),
            filled = assignments.len(),
            "duty roster incomplete"
        );
        Err(RosterError::Unfillable(RosterFailure {
            unfilled_slots: unfilled,
            partial_assignments: assignments,
        }))
    }
}
