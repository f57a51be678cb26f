#![forbid(unsafe_code)]
mod common;

use chrono::{Datelike, NaiveDate};
use common::{chief, regular, substitute};
use planning_gardes::scheduler::{can_work, check, DayContext, Ineligibility, NurseState};
use planning_gardes::{NurseId, ShiftKind, StaffingPolicy, WorkloadTracker};
use std::collections::BTreeSet;

fn ctx<'a>(day: u32, unavailable: &'a BTreeSet<NurseId>) -> DayContext<'a> {
    // octobre 2025 : le 1er est un mercredi, le 4 un samedi
    let date = NaiveDate::from_ymd_opt(2025, 10, day).unwrap();
    DayContext {
        day,
        date,
        weekday: date.weekday(),
        days_in_month: 31,
        unavailable,
    }
}

fn worked(days: &[u32]) -> NurseState {
    NurseState {
        worked_days: days.iter().copied().collect(),
        ..NurseState::default()
    }
}

#[test]
fn fresh_regular_can_work_a_preferred_shift() {
    let policy = StaffingPolicy::default();
    let nurse = regular("r1");
    let none = BTreeSet::new();
    let state = NurseState::default();
    let tracker = WorkloadTracker::new();
    for shift in ShiftKind::ALL {
        assert!(can_work(&nurse, shift, &ctx(1, &none), &state, &tracker, &policy));
    }
}

#[test]
fn absence_vacation_and_rest_days_block_everyone() {
    let policy = StaffingPolicy::default();
    let tracker = WorkloadTracker::new();
    let nurse = regular("r1");
    let boss = chief("c", ShiftKind::Morning);

    let mut absent = BTreeSet::new();
    absent.insert(nurse.id.clone());
    absent.insert(boss.id.clone());
    let state = NurseState::default();
    assert_eq!(
        check(&nurse, ShiftKind::Morning, &ctx(1, &absent), &state, &tracker, &policy, false),
        Err(Ineligibility::Absent)
    );
    assert_eq!(
        check(&boss, ShiftKind::Morning, &ctx(1, &absent), &state, &tracker, &policy, false),
        Err(Ineligibility::Absent)
    );

    let none = BTreeSet::new();
    let on_vacation = NurseState::new([1].into(), BTreeSet::new(), None);
    assert_eq!(
        check(&boss, ShiftKind::Morning, &ctx(1, &none), &on_vacation, &tracker, &policy, false),
        Err(Ineligibility::OnVacation)
    );
    let resting = NurseState::new(BTreeSet::new(), [1].into(), None);
    assert_eq!(
        check(&nurse, ShiftKind::Night, &ctx(1, &none), &resting, &tracker, &policy, true),
        Err(Ineligibility::RestDay)
    );
}

#[test]
fn chief_only_works_pinned_shift_on_weekdays() {
    let policy = StaffingPolicy::default();
    let tracker = WorkloadTracker::new();
    let state = NurseState::default();
    let none = BTreeSet::new();
    let boss = chief("c", ShiftKind::Afternoon);

    assert!(can_work(&boss, ShiftKind::Afternoon, &ctx(1, &none), &state, &tracker, &policy));
    assert_eq!(
        check(&boss, ShiftKind::Morning, &ctx(1, &none), &state, &tracker, &policy, false),
        Err(Ineligibility::ChiefOtherShift)
    );
    assert_eq!(
        check(&boss, ShiftKind::Night, &ctx(1, &none), &state, &tracker, &policy, false),
        Err(Ineligibility::ChiefOffDay)
    );
    assert_eq!(
        check(&boss, ShiftKind::Afternoon, &ctx(4, &none), &state, &tracker, &policy, false),
        Err(Ineligibility::ChiefOffDay)
    );
}

#[test]
fn chief_has_no_cap_and_no_streak_limit() {
    let policy = StaffingPolicy::default();
    let none = BTreeSet::new();
    let boss = chief("c", ShiftKind::Morning);
    let mut tracker = WorkloadTracker::new();
    for _ in 0..40 {
        tracker.increment(&boss.id);
    }
    // lundi 6 au vendredi 10, après une semaine complète
    let state = worked(&[1, 2, 3, 6, 7, 8, 9]);
    assert!(can_work(&boss, ShiftKind::Morning, &ctx(10, &none), &state, &tracker, &policy));
}

#[test]
fn preference_is_only_lifted_on_request() {
    let policy = StaffingPolicy::default();
    let tracker = WorkloadTracker::new();
    let state = NurseState::default();
    let none = BTreeSet::new();
    let nurse = regular("r1").with_preferences([ShiftKind::Night]);

    assert_eq!(
        check(&nurse, ShiftKind::Morning, &ctx(1, &none), &state, &tracker, &policy, false),
        Err(Ineligibility::NotPreferred)
    );
    assert_eq!(
        check(&nurse, ShiftKind::Morning, &ctx(1, &none), &state, &tracker, &policy, true),
        Ok(())
    );
}

#[test]
fn workload_cap_depends_on_rank() {
    let policy = StaffingPolicy::default();
    let none = BTreeSet::new();
    let state = NurseState::default();
    let r = regular("r1");
    let s = substitute("s1");
    let mut tracker = WorkloadTracker::new();
    for _ in 0..12 {
        tracker.increment(&r.id);
        tracker.increment(&s.id);
    }
    assert!(can_work(&r, ShiftKind::Morning, &ctx(20, &none), &state, &tracker, &policy));
    assert_eq!(
        check(&s, ShiftKind::Morning, &ctx(20, &none), &state, &tracker, &policy, false),
        Err(Ineligibility::WorkloadCap)
    );

    for _ in 0..5 {
        tracker.increment(&r.id);
    }
    assert!(!can_work(&r, ShiftKind::Morning, &ctx(20, &none), &state, &tracker, &policy));

    // un objectif individuel prime sur le plafond du grade
    let capped = NurseState {
        workload_target: Some(30),
        ..NurseState::default()
    };
    assert!(can_work(&r, ShiftKind::Morning, &ctx(20, &none), &capped, &tracker, &policy));
}

#[test]
fn joining_a_run_must_leave_room_for_rest() {
    let policy = StaffingPolicy::default();
    let tracker = WorkloadTracker::new();
    let none = BTreeSet::new();
    let nurse = regular("r1");

    // 1,2,_,4 + 3 → série de 4, deux jours de repos dus mais le 6 est travaillé
    let state = worked(&[1, 2, 4, 6]);
    assert_eq!(
        check(&nurse, ShiftKind::Morning, &ctx(3, &none), &state, &tracker, &policy, false),
        Err(Ineligibility::RestOwed)
    );

    // 1..4 + 5 → série de 5
    let state = worked(&[1, 2, 3, 4]);
    assert_eq!(
        check(&nurse, ShiftKind::Morning, &ctx(5, &none), &state, &tracker, &policy, false),
        Err(Ineligibility::StreakTooLong)
    );

    // 8 + 9 → série de 2, le 10 reste libre
    let state = worked(&[8]);
    assert!(can_work(&nurse, ShiftKind::Morning, &ctx(9, &none), &state, &tracker, &policy));
}

#[test]
fn owed_rest_follows_streak_length() {
    let policy = StaffingPolicy::default();
    assert_eq!(policy.owed_rest(1), 0);
    assert_eq!(policy.owed_rest(2), 1);
    assert_eq!(policy.owed_rest(3), 1);
    assert_eq!(policy.owed_rest(4), 2);
}
