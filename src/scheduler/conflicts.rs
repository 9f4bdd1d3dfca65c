use super::context::WeekContext;
use super::{RosterError, RosterRequest, RosterScheduler, Violation, ViolationKind};
use crate::model::{DutyAssignment, DutyType, PersonnelId, Shift};
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub(super) fn audit(
    scheduler: &RosterScheduler,
    request: &RosterRequest,
    assignments: &[DutyAssignment],
) -> Result<Vec<Violation>, RosterError> {
    let config = &scheduler.config;
    let ctx = WeekContext::new(request)?;
    let mut out = Vec::new();

    let mut per_person: BTreeMap<(&PersonnelId, NaiveDate), Vec<Shift>> = BTreeMap::new();
    let mut coverage: BTreeMap<(NaiveDate, Shift, DutyType), u32> = BTreeMap::new();

    for a in assignments {
        let violation = |kind: ViolationKind| Violation {
            kind,
            personnel_id: Some(a.personnel_id.clone()),
            date: a.date,
            shift: Some(a.shift),
            duty_type: Some(a.duty_type),
        };

        if !ctx.contains_date(a.date) {
            out.push(violation(ViolationKind::OutsideWeek));
        } else {
            *coverage.entry((a.date, a.shift, a.duty_type)).or_default() += 1;
        }

        let Some(idx) = ctx.index_of(&a.personnel_id) else {
            out.push(violation(ViolationKind::UnknownPersonnel));
            continue;
        };
        let person = ctx.personnel[idx];
        if !person.is_assignable() {
            out.push(violation(ViolationKind::Inactive));
        }
        if ctx.on_leave(&person.id, a.date) {
            out.push(violation(ViolationKind::OnLeave));
        }
        if config.rank_excluded(a.duty_type, person.rank) {
            out.push(violation(ViolationKind::RankIneligible));
        }
        per_person
            .entry((&a.personnel_id, a.date))
            .or_default()
            .push(a.shift);
    }

    for ((person, date), mut shifts) in per_person {
        shifts.sort();
        let violation = |kind: ViolationKind, shift: Option<Shift>| Violation {
            kind,
            personnel_id: Some(person.clone()),
            date,
            shift,
            duty_type: None,
        };
        for pair in shifts.windows(2) {
            if pair[0] == pair[1] {
                out.push(violation(ViolationKind::DoubleBooking, Some(pair[0])));
            }
        }
        if shifts.contains(&Shift::Day) && shifts.contains(&Shift::Night) {
            out.push(violation(ViolationKind::BothShiftsSameDay, None));
        }
    }

    for &date in &ctx.dates {
        for shift in Shift::ALL {
            for duty_type in DutyType::ALL {
                let required = config.headcount(duty_type);
                let filled = coverage.get(&(date, shift, duty_type)).copied().unwrap_or(0);
                let kind = if filled < required {
                    ViolationKind::UnderFilled
                } else if filled > required {
                    ViolationKind::OverFilled
                } else {
                    continue;
                };
                out.push(Violation {
                    kind,
                    personnel_id: None,
                    date,
                    shift: Some(shift),
                    duty_type: Some(duty_type),
                });
            }
        }
    }

    Ok(out)
}
