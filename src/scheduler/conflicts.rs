use super::StaffingPolicy;
use crate::model::{Nurse, NurseId, Rank, Roster, ShiftKind};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    DoubleBooking,
    Overstaffed { shift: ShiftKind, max: usize },
    ChiefOnWeekend,
    ChiefOnNight,
    WorkedOnVacation,
    WorkedOnRestDay,
    WorkedWhileAbsent,
    WorkloadExceeded { count: u32, cap: u32 },
    StreakTooLong { length: u32 },
    MissingRest { streak_end: u32 },
}

#[derive(Debug, Clone)]
pub struct Violation {
    pub nurse: Option<NurseId>,
    pub date: Option<NaiveDate>,
    pub kind: ViolationKind,
}

/// Revérifie un planning complet contre les règles de génération.
pub fn detect_violations(
    roster: &Roster,
    nurses: &[Nurse],
    policy: &StaffingPolicy,
) -> Vec<Violation> {
    let mut out = Vec::new();
    let ranks: BTreeMap<&NurseId, Rank> = nurses.iter().map(|n| (&n.id, n.rank)).collect();
    let is_chief = |id: &NurseId| ranks.get(id) == Some(&Rank::Chief);

    for day in &roster.calendar {
        let mut seen: BTreeMap<&NurseId, usize> = BTreeMap::new();
        for shift in ShiftKind::ALL {
            let staff = day.shift(shift);
            let max = policy.staffing(shift, day.weekday).max;
            if staff.len() > max {
                out.push(Violation {
                    nurse: None,
                    date: Some(day.date),
                    kind: ViolationKind::Overstaffed { shift, max },
                });
            }
            for id in staff {
                *seen.entry(id).or_insert(0) += 1;
                if is_chief(id) {
                    if day.is_weekend() {
                        out.push(at(id, day.date, ViolationKind::ChiefOnWeekend));
                    }
                    if shift == ShiftKind::Night {
                        out.push(at(id, day.date, ViolationKind::ChiefOnNight));
                    }
                }
                if let Some(state) = roster.state(id) {
                    if state.vacation_days.contains(&day.number()) {
                        out.push(at(id, day.date, ViolationKind::WorkedOnVacation));
                    }
                    if state.rest_days.contains(&day.number()) {
                        out.push(at(id, day.date, ViolationKind::WorkedOnRestDay));
                    }
                }
                if roster
                    .unavailable
                    .get(&day.number())
                    .is_some_and(|ids| ids.contains(id))
                {
                    out.push(at(id, day.date, ViolationKind::WorkedWhileAbsent));
                }
            }
        }
        for (id, count) in seen {
            if count > 1 {
                out.push(at(id, day.date, ViolationKind::DoubleBooking));
            }
        }
    }

    for nurse in nurses {
        if let Some(cap) = nurse.rank.workload_cap(policy) {
            let count = roster.workload.get(&nurse.id);
            if count > cap {
                out.push(Violation {
                    nurse: Some(nurse.id.clone()),
                    date: None,
                    kind: ViolationKind::WorkloadExceeded { count, cap },
                });
            }
        }
        if nurse.rank != Rank::Chief {
            check_streaks(roster, nurse, policy, &mut out);
        }
    }

    out
}

fn check_streaks(roster: &Roster, nurse: &Nurse, policy: &StaffingPolicy, out: &mut Vec<Violation>) {
    let worked: Vec<u32> = roster
        .calendar
        .iter()
        .filter(|d| d.shift_of(&nurse.id).is_some())
        .map(|d| d.number())
        .collect();
    let rest = roster.state(&nurse.id).map(|s| &s.rest_days);
    let days = roster.days_in_month();

    let mut idx = 0;
    while idx < worked.len() {
        let start = worked[idx];
        let mut end = start;
        while idx + 1 < worked.len() && worked[idx + 1] == end + 1 {
            idx += 1;
            end += 1;
        }
        idx += 1;

        let length = end - start + 1;
        let date = roster.day(end).map(|d| d.date);
        if length > policy.max_consecutive_days {
            out.push(Violation {
                nurse: Some(nurse.id.clone()),
                date,
                kind: ViolationKind::StreakTooLong { length },
            });
        }
        // chaque jour de repos dû dans le mois doit être posé et non travaillé
        let missing = (1..=policy.owed_rest(length))
            .map(|offset| end + offset)
            .filter(|day| *day <= days)
            .any(|day| worked.contains(&day) || !rest.is_some_and(|r| r.contains(&day)));
        if missing {
            out.push(Violation {
                nurse: Some(nurse.id.clone()),
                date,
                kind: ViolationKind::MissingRest { streak_end: end },
            });
        }
    }
}

fn at(id: &NurseId, date: NaiveDate, kind: ViolationKind) -> Violation {
    Violation {
        nurse: Some(id.clone()),
        date: Some(date),
        kind,
    }
}
