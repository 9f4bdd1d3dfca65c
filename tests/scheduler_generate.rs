#![forbid(unsafe_code)]
mod common;

use common::*;
use std::collections::{HashMap, HashSet};
use tour_de_garde::{
    workload, DutyRequirement, DutyType, LeaveStatus, RankRule, ReasonCode, RosterConfig,
    RosterError, RosterScheduler, Rank, Shift,
};

fn generate_ok(req: &tour_de_garde::RosterRequest) -> Vec<tour_de_garde::DutyAssignment> {
    RosterScheduler::default()
        .generate(req)
        .expect("roster should be feasible")
}

#[test]
fn full_week_fills_every_slot_exactly_once() {
    let req = request(squad(21, &[]), vec![], vec![]);
    let out = generate_ok(&req);
    assert_eq!(out.len(), 126);

    let mut per_slot: HashMap<_, u32> = HashMap::new();
    for a in &out {
        *per_slot.entry((a.date, a.shift, a.duty_type)).or_default() += 1;
    }
    assert_eq!(per_slot.len(), 7 * 2 * 5);
    for ((_, _, duty), filled) in per_slot {
        assert_eq!(filled, duty.default_headcount());
    }

    let dates: HashSet<_> = out.iter().map(|a| a.date).collect();
    assert!(dates.contains(&date(2024, 5, 20)));
    assert!(dates.contains(&date(2024, 5, 26)));
    assert!(!dates.contains(&date(2024, 5, 27)));

    let violations = RosterScheduler::default().audit(&req, &out).unwrap();
    assert!(violations.is_empty(), "{violations:?}");
}

#[test]
fn nobody_works_twice_on_the_same_date() {
    let req = request(squad(21, &[2, 9]), vec![], vec![]);
    let out = generate_ok(&req);
    let mut seen = HashSet::new();
    for a in &out {
        assert!(
            seen.insert((a.personnel_id.clone(), a.date)),
            "{} booked twice on {}",
            a.personnel_id,
            a.date
        );
    }
}

#[test]
fn slots_follow_calendar_shift_and_duty_order() {
    let out = generate_ok(&request(squad(21, &[]), vec![], vec![]));
    let first = &out[0];
    assert_eq!(first.date, date(2024, 5, 20));
    assert_eq!(first.shift, Shift::Day);
    assert_eq!(first.duty_type, DutyType::Guard);
    assert_eq!(out[9].shift, Shift::Night);
    assert_eq!(out[18].date, date(2024, 5, 21));
    assert_eq!(out[125].duty_type, DutyType::Qrf);
    assert_eq!(out[125].shift, Shift::Night);
}

#[test]
fn ties_are_broken_by_lowest_personnel_id() {
    let out = generate_ok(&request(squad(21, &[]), vec![], vec![]));
    let picked: Vec<&str> = out[..3].iter().map(|a| a.personnel_id.as_str()).collect();
    assert_eq!(picked, ["p01", "p02", "p03"]);
}

#[test]
fn identical_inputs_give_identical_output() {
    let req = request(
        squad(24, &[1, 7]),
        vec![leave("p04", date(2024, 5, 21), date(2024, 5, 23))],
        vec![past("p10", date(2024, 5, 18), Shift::Night)],
    );
    let a = serde_json::to_string(&generate_ok(&req)).unwrap();
    let b = serde_json::to_string(&generate_ok(&req)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn workload_spread_stays_within_one() {
    let req = request(squad(21, &[]), vec![], vec![]);
    let out = generate_ok(&req);
    let rows = workload(&req.personnel, &out);
    assert_eq!(rows.len(), 21);
    assert!(tour_de_garde::spread(&rows) <= 1);
}

#[test]
fn lowest_tier_never_holds_single_post() {
    let req = request(squad(21, &[1, 2, 3]), vec![], vec![]);
    let out = generate_ok(&req);
    let cadets: HashSet<_> = req
        .personnel
        .iter()
        .filter(|p| p.rank == Rank::Cadet)
        .map(|p| p.id.clone())
        .collect();
    assert!(out
        .iter()
        .filter(|a| matches!(a.duty_type, DutyType::Radio | DutyType::Desk))
        .all(|a| !cadets.contains(&a.personnel_id)));
    // les cadets restent affectables aux postes à plusieurs
    assert!(out
        .iter()
        .any(|a| cadets.contains(&a.personnel_id) && a.duty_type == DutyType::Guard));
}

#[test]
fn approved_leave_excludes_only_covered_dates() {
    let mut pending = leave("p06", date(2024, 5, 20), date(2024, 5, 26));
    pending.status = LeaveStatus::Pending;
    let req = request(
        squad(22, &[]),
        vec![
            leave("p05", date(2024, 5, 1), date(2024, 5, 31)),
            leave("p01", date(2024, 5, 22), date(2024, 5, 23)),
            pending,
        ],
        vec![],
    );
    let out = generate_ok(&req);
    assert_eq!(count_for(&out, "p05"), 0);
    assert!(count_for(&out, "p06") > 0);
    assert!(count_for(&out, "p01") > 0);
    assert!(out
        .iter()
        .filter(|a| a.personnel_id.as_str() == "p01")
        .all(|a| a.date < date(2024, 5, 22) || a.date > date(2024, 5, 23)));
}

#[test]
fn recent_history_pushes_person_back() {
    let history = vec![
        past("p01", date(2024, 5, 17), Shift::Day),
        past("p01", date(2024, 5, 18), Shift::Day),
        past("p01", date(2024, 5, 19), Shift::Night),
    ];
    let out = generate_ok(&request(squad(21, &[]), vec![], history));
    assert_eq!(out[0].personnel_id.as_str(), "p02");
    assert!(out
        .iter()
        .filter(|a| a.personnel_id.as_str() == "p01")
        .all(|a| a.date > date(2024, 5, 21)));
}

#[test]
fn history_outside_lookback_only_breaks_ties() {
    let history = vec![
        past("p01", date(2024, 3, 1), Shift::Day),
        past("p01", date(2024, 3, 2), Shift::Day),
        past("p01", date(2024, 3, 3), Shift::Night),
    ];
    let out = generate_ok(&request(squad(21, &[]), vec![], history));
    // compteur à zéro mais dernière affectation connue : passe après les jamais affectés
    assert_eq!(out[0].personnel_id.as_str(), "p02");
    assert!(!out[..18].iter().any(|a| a.personnel_id.as_str() == "p01"));
    assert!(out[18..36].iter().any(|a| a.personnel_id.as_str() == "p01"));
}

#[test]
fn history_inside_week_is_ignored() {
    let history = vec![past("p01", date(2024, 5, 20), Shift::Day)];
    let out = generate_ok(&request(squad(21, &[]), vec![], history));
    assert_eq!(out[0].personnel_id.as_str(), "p01");
}

#[test]
fn mock_unit_is_understaffed() {
    let req = request(
        mock_personnel(),
        vec![leave("3", date(2024, 5, 15), date(2024, 5, 30))],
        vec![],
    );
    let err = RosterScheduler::default().generate(&req).unwrap_err();
    match err {
        RosterError::InsufficientPersonnel {
            duty_type,
            duty_headcount,
            required,
            available,
            date,
        } => {
            assert_eq!(duty_type, DutyType::Qrf);
            assert_eq!(duty_headcount, 3);
            assert_eq!(required, 9);
            assert_eq!(available, 7);
            assert_eq!(date, None);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reinforced_mock_unit_reports_every_unfilled_slot() {
    let mut personnel = mock_personnel();
    personnel.extend(squad(5, &[]));
    let req = request(
        personnel,
        vec![leave("3", date(2024, 5, 15), date(2024, 5, 30))],
        vec![],
    );
    let failure = match RosterScheduler::default().generate(&req) {
        Err(RosterError::Unfillable(failure)) => failure,
        other => panic!("expected unfillable slots, got {other:?}"),
    };

    // 12 personnes actives pour 18 postes par jour, un seul service par jour
    assert_eq!(failure.partial_assignments.len(), 84);
    assert_eq!(failure.unfilled_slots.len(), 42);
    assert!(failure
        .unfilled_slots
        .iter()
        .all(|u| u.reason_code == ReasonCode::AlreadyAssignedThisPeriod));

    let partial = &failure.partial_assignments;
    assert_eq!(count_for(partial, "3"), 0);
    assert!(count_for(partial, "4") > 0);
    assert!(partial
        .iter()
        .filter(|a| a.personnel_id.as_str() == "4")
        .all(|a| !matches!(a.duty_type, DutyType::Radio | DutyType::Desk)));
    for p in ["1", "2", "4", "5", "6", "7", "8", "p01", "p05"] {
        assert_eq!(count_for(partial, p), 7, "personnel {p}");
    }
}

#[test]
fn three_active_personnel_cannot_staff_a_shift() {
    let err = RosterScheduler::default()
        .generate(&request(squad(3, &[]), vec![], vec![]))
        .unwrap_err();
    match err {
        RosterError::InsufficientPersonnel {
            duty_type,
            duty_headcount,
            required,
            available,
            date,
        } => {
            assert_eq!(duty_type, DutyType::Qrf);
            assert_eq!(duty_headcount, 3);
            assert_eq!(required, 9);
            assert_eq!(available, 3);
            assert_eq!(date, None);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn suspended_personnel_do_not_count() {
    let mut personnel = squad(9, &[]);
    personnel[8].status = tour_de_garde::PersonnelStatus::Suspended;
    let err = RosterScheduler::default()
        .generate(&request(personnel, vec![], vec![]))
        .unwrap_err();
    assert!(matches!(
        err,
        RosterError::InsufficientPersonnel {
            available: 8,
            date: None,
            ..
        }
    ));
}

#[test]
fn leave_shortfall_on_one_day_is_fatal() {
    let req = request(
        squad(9, &[]),
        vec![leave("p02", date(2024, 5, 22), date(2024, 5, 22))],
        vec![],
    );
    let err = RosterScheduler::default().generate(&req).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"insufficient personnel: 9 required per shift (Quick Reaction Force alone needs 3), 8 available on 2024-05-22"
    );
}

#[test]
fn ten_active_personnel_pass_the_precheck() {
    match RosterScheduler::default().generate(&request(squad(10, &[]), vec![], vec![])) {
        Err(RosterError::Unfillable(failure)) => assert!(!failure.unfilled_slots.is_empty()),
        other => panic!("expected unfillable slots, got {other:?}"),
    }
}

#[test]
fn malformed_week_start_is_rejected() {
    for raw in ["2024-13-01", "20/05/2024", ""] {
        let mut req = request(squad(21, &[]), vec![], vec![]);
        req.week_start_date = raw.to_string();
        let err = RosterScheduler::default().generate(&req).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)), "{raw}: {err}");
    }
}

#[test]
fn inverted_leave_and_duplicate_ids_are_rejected() {
    let mut bad = leave("p01", date(2024, 5, 20), date(2024, 5, 21));
    bad.end_date = date(2024, 5, 19);
    let err = RosterScheduler::default()
        .generate(&request(squad(21, &[]), vec![bad], vec![]))
        .unwrap_err();
    assert!(matches!(err, RosterError::InvalidInput(_)));

    let mut personnel = squad(21, &[]);
    personnel.push(personnel[0].clone());
    let err = RosterScheduler::default()
        .generate(&request(personnel, vec![], vec![]))
        .unwrap_err();
    assert!(matches!(err, RosterError::InvalidInput(_)));
}

#[test]
fn invalid_duty_tables_are_rejected() {
    let negative = RosterConfig {
        requirements: vec![DutyRequirement {
            duty_type: DutyType::Guard,
            headcount: -1,
        }],
        rank_rules: vec![],
        ..RosterConfig::default()
    };
    let empty = RosterConfig {
        requirements: vec![],
        rank_rules: vec![],
        ..RosterConfig::default()
    };
    let mut duplicate = RosterConfig::default();
    duplicate.requirements.push(DutyRequirement {
        duty_type: DutyType::Qrf,
        headcount: 1,
    });
    for config in [negative, empty, duplicate] {
        let err = RosterScheduler::new(config).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)), "{err}");
    }
}

fn radio_only(headcount: i32) -> RosterConfig {
    RosterConfig {
        requirements: vec![DutyRequirement {
            duty_type: DutyType::Radio,
            headcount,
        }],
        rank_rules: vec![RankRule {
            duty_type: DutyType::Radio,
            min_rank: Rank::OfficerIII,
            applies_up_to_headcount: 1,
        }],
        ..RosterConfig::default()
    }
}

#[test]
fn lone_cadet_cannot_cover_radio_room() {
    let scheduler = RosterScheduler::new(radio_only(1)).unwrap();
    let failure = match scheduler.generate(&request(squad(1, &[1]), vec![], vec![])) {
        Err(RosterError::Unfillable(failure)) => failure,
        other => panic!("expected unfillable slots, got {other:?}"),
    };
    assert_eq!(failure.unfilled_slots.len(), 14);
    assert!(failure
        .unfilled_slots
        .iter()
        .all(|u| u.reason_code == ReasonCode::RankIneligible));
    assert!(failure.partial_assignments.is_empty());
}

#[test]
fn cadets_may_share_a_multi_person_post() {
    let scheduler = RosterScheduler::new(radio_only(2)).unwrap();
    let out = scheduler
        .generate(&request(squad(4, &[1, 2, 3, 4]), vec![], vec![]))
        .unwrap();
    assert_eq!(out.len(), 28);
}

#[test]
fn assigned_at_defaults_to_week_start() {
    let out = generate_ok(&request(squad(21, &[]), vec![], vec![]));
    assert!(out
        .iter()
        .all(|a| a.assigned_at.to_rfc3339() == "2024-05-20T00:00:00+00:00"));
}
