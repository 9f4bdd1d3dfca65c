#![allow(dead_code)]
use chrono::NaiveDate;
use tour_de_garde::{
    DutyAssignment, LeaveRecord, LeaveType, Personnel, PersonnelId, PersonnelStatus, Rank,
    RosterRequest, Section,
};

pub const WEEK: &str = "2024-05-20";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn pid(s: &str) -> PersonnelId {
    PersonnelId::new(s)
}

/// `n` personnes actives `p01..pNN` ; les index de `cadets` (1-based) sont Cadet.
pub fn squad(n: usize, cadets: &[usize]) -> Vec<Personnel> {
    (1..=n)
        .map(|i| {
            let rank = if cadets.contains(&i) {
                Rank::Cadet
            } else {
                Rank::OfficerI
            };
            Personnel::new(
                format!("p{i:02}"),
                format!("First{i}"),
                format!("Last{i}"),
                rank,
                Section::Operations,
            )
        })
        .collect()
}

/// Jeu de données de l'application d'origine (8 personnes).
pub fn mock_personnel() -> Vec<Personnel> {
    vec![
        Personnel::new("1", "John", "Doe", Rank::Sergeant, Section::Operations),
        Personnel::new("2", "Jane", "Smith", Rank::OfficerI, Section::Intelligence),
        Personnel::new("3", "Robert", "Brown", Rank::OfficerII, Section::Logistics)
            .with_status(PersonnelStatus::OnLeave),
        Personnel::new("4", "Alice", "Wilson", Rank::Cadet, Section::Operations),
        Personnel::new("5", "Michael", "Chen", Rank::Inspector, Section::Administration),
        Personnel::new("6", "Sarah", "Taylor", Rank::OfficerI, Section::Training),
        Personnel::new("7", "Kevin", "Davis", Rank::OfficerIII, Section::Communications),
        Personnel::new("8", "Emma", "White", Rank::ChiefInspector, Section::Operations),
    ]
}

pub fn leave(person: &str, start: NaiveDate, end: NaiveDate) -> LeaveRecord {
    LeaveRecord::approved(pid(person), LeaveType::Annual, start, end).unwrap()
}

pub fn request(
    personnel: Vec<Personnel>,
    leaves: Vec<LeaveRecord>,
    past_duties: Vec<DutyAssignment>,
) -> RosterRequest {
    RosterRequest {
        personnel,
        leaves,
        past_duties,
        week_start_date: WEEK.to_string(),
        assigned_at: None,
    }
}

pub fn count_for(assignments: &[DutyAssignment], person: &str) -> usize {
    assignments
        .iter()
        .filter(|a| a.personnel_id.as_str() == person)
        .count()
}

pub fn past(person: &str, on: NaiveDate, shift: tour_de_garde::Shift) -> DutyAssignment {
    DutyAssignment {
        id: tour_de_garde::AssignmentId::new(format!("past-{person}-{on}-{shift}")),
        personnel_id: pid(person),
        duty_type: tour_de_garde::DutyType::Guard,
        date: on,
        shift,
        assigned_at: shift.starts_at(on),
    }
}
