#![forbid(unsafe_code)]
mod common;

use chrono::{Days, NaiveDate};
use common::regular;
use planning_gardes::scheduler::{NurseState, ViolationKind};
use planning_gardes::{detect_violations, Day, NurseId, Roster, StaffingPolicy, WorkloadTracker};
use std::collections::{BTreeMap, BTreeSet};

/// Février 2023 avec `id` au matin des jours `worked` et les repos `rest`.
fn roster_with(id: &NurseId, worked: &[u32], rest: &[u32]) -> Roster {
    let first = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
    let mut workload = WorkloadTracker::new();
    let calendar = (1..=28)
        .map(|n| {
            let mut day = Day::new(first + Days::new(n - 1));
            if worked.contains(&(n as u32)) {
                day.morning.push(id.clone());
                workload.increment(id);
            }
            day
        })
        .collect();
    let state = NurseState {
        worked_days: worked.iter().copied().collect(),
        rest_days: rest.iter().copied().collect::<BTreeSet<_>>(),
        ..NurseState::default()
    };
    Roster {
        year: 2023,
        month: 2,
        calendar,
        workload,
        states: BTreeMap::from([(id.clone(), state)]),
        unavailable: BTreeMap::new(),
        warnings: Vec::new(),
    }
}

fn missing_rest(roster: &Roster, id: &NurseId) -> Vec<u32> {
    let nurses = vec![regular(id.as_str())];
    detect_violations(roster, &nurses, &StaffingPolicy::default())
        .into_iter()
        .filter(|v| v.nurse.as_ref() == Some(id))
        .filter_map(|v| match v.kind {
            ViolationKind::MissingRest { streak_end } => Some(streak_end),
            _ => None,
        })
        .collect()
}

#[test]
fn four_day_run_needs_two_rest_days() {
    let id = NurseId::new("r-01");

    // un seul jour de repos puis reprise le 15
    let roster = roster_with(&id, &[10, 11, 12, 13, 15], &[14]);
    assert_eq!(missing_rest(&roster, &id), vec![13]);

    // repos posé le 15 mais travaillé quand même
    let roster = roster_with(&id, &[10, 11, 12, 13, 15], &[14, 15]);
    assert_eq!(missing_rest(&roster, &id), vec![13]);

    let roster = roster_with(&id, &[10, 11, 12, 13, 16], &[14, 15]);
    assert!(missing_rest(&roster, &id).is_empty());
}

#[test]
fn short_run_needs_one_rest_day_within_the_month() {
    let id = NurseId::new("r-02");

    let roster = roster_with(&id, &[3, 4], &[]);
    assert_eq!(missing_rest(&roster, &id), vec![4]);

    let roster = roster_with(&id, &[3, 4], &[5]);
    assert!(missing_rest(&roster, &id).is_empty());

    // série en fin de mois : le repos tombe le mois suivant
    let roster = roster_with(&id, &[25, 26, 27, 28], &[]);
    assert!(missing_rest(&roster, &id).is_empty());

    // série de 4 le 26 : repos dus le 27 et le 28
    let roster = roster_with(&id, &[23, 24, 25, 26], &[27]);
    assert_eq!(missing_rest(&roster, &id), vec![26]);
    let roster = roster_with(&id, &[23, 24, 25, 26], &[27, 28]);
    assert!(missing_rest(&roster, &id).is_empty());
}
