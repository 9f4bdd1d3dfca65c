use crate::model::{
    DutyAssignment, DutyType, LeaveRecord, Personnel, PersonnelId, Section, Shift,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Charge de service d'une personne sur un ensemble d'affectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonWorkload {
    pub personnel_id: PersonnelId,
    pub name: String,
    pub section: Section,
    pub total: u32,
    pub day: u32,
    pub night: u32,
    pub by_duty: BTreeMap<DutyType, u32>,
}

/// Bilan par personne, trié par identifiant. Les personnes non actives
/// n'apparaissent que si elles ont des affectations.
pub fn workload(personnel: &[Personnel], assignments: &[DutyAssignment]) -> Vec<PersonWorkload> {
    let mut rows: BTreeMap<&PersonnelId, PersonWorkload> = personnel
        .iter()
        .map(|p| {
            (
                &p.id,
                PersonWorkload {
                    personnel_id: p.id.clone(),
                    name: p.display_name(),
                    section: p.section,
                    total: 0,
                    day: 0,
                    night: 0,
                    by_duty: BTreeMap::new(),
                },
            )
        })
        .collect();

    for a in assignments {
        let Some(row) = rows.get_mut(&a.personnel_id) else {
            continue;
        };
        row.total += 1;
        match a.shift {
            Shift::Day => row.day += 1,
            Shift::Night => row.night += 1,
        }
        *row.by_duty.entry(a.duty_type).or_default() += 1;
    }

    let active: Vec<&PersonnelId> = personnel
        .iter()
        .filter(|p| p.is_assignable())
        .map(|p| &p.id)
        .collect();
    rows.into_iter()
        .filter(|(id, row)| row.total > 0 || active.contains(id))
        .map(|(_, row)| row)
        .collect()
}

/// Écart max - min du nombre d'affectations.
pub fn spread(rows: &[PersonWorkload]) -> u32 {
    let max = rows.iter().map(|r| r.total).max().unwrap_or(0);
    let min = rows.iter().map(|r| r.total).min().unwrap_or(0);
    max - min
}

/// Personne disponible à une date, avec sa dernière date de service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleGuard {
    pub personnel_id: PersonnelId,
    pub name: String,
    pub last_duty: Option<NaiveDate>,
}

/// Personnel actif, hors congé approuvé à `date`, du moins récemment
/// de service au plus récemment (jamais de service en tête), puis par id.
pub fn least_recently_tasked(
    personnel: &[Personnel],
    leaves: &[LeaveRecord],
    history: &[DutyAssignment],
    date: NaiveDate,
) -> Vec<EligibleGuard> {
    let mut last: BTreeMap<&PersonnelId, NaiveDate> = BTreeMap::new();
    for duty in history.iter().filter(|d| d.date < date) {
        last.entry(&duty.personnel_id)
            .and_modify(|d| *d = (*d).max(duty.date))
            .or_insert(duty.date);
    }

    let mut out: Vec<EligibleGuard> = personnel
        .iter()
        .filter(|p| p.is_assignable())
        .filter(|p| {
            !leaves
                .iter()
                .any(|l| l.personnel_id == p.id && l.blocks(date))
        })
        .map(|p| EligibleGuard {
            personnel_id: p.id.clone(),
            name: p.display_name(),
            last_duty: last.get(&p.id).copied(),
        })
        .collect();
    out.sort_by(|a, b| {
        a.last_duty
            .cmp(&b.last_duty)
            .then_with(|| a.personnel_id.cmp(&b.personnel_id))
    });
    out
}
