use super::StaffingPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// État transitoire d'une personne pour une génération.
///
/// Les jours sont des numéros de jour dans le mois (1-based).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseState {
    pub vacation_days: BTreeSet<u32>,
    pub rest_days: BTreeSet<u32>,
    pub worked_days: BTreeSet<u32>,
    pub consecutive_days_worked: u32,
    pub last_day_worked: Option<u32>,
    pub workload_target: Option<u32>,
}

impl NurseState {
    pub fn new(
        vacation_days: BTreeSet<u32>,
        rest_days: BTreeSet<u32>,
        workload_target: Option<u32>,
    ) -> Self {
        Self {
            vacation_days,
            rest_days,
            workload_target,
            ..Self::default()
        }
    }

    pub fn works_on(&self, day: u32) -> bool {
        self.worked_days.contains(&day)
    }

    /// Bornes de la série de jours travaillés qui contiendrait `day`.
    pub fn run_around(&self, day: u32) -> (u32, u32) {
        let mut start = day;
        while start > 1 && self.worked_days.contains(&(start - 1)) {
            start -= 1;
        }
        let mut end = day;
        while self.worked_days.contains(&(end + 1)) {
            end += 1;
        }
        (start, end)
    }

    /// Enregistre une garde sur `day` et planifie le repos dû (sauf chefs).
    pub(crate) fn work(
        &mut self,
        day: u32,
        policy: &StaffingPolicy,
        days_in_month: u32,
        exempt_from_rest: bool,
    ) {
        self.worked_days.insert(day);
        self.refresh_streak();
        if exempt_from_rest {
            return;
        }
        let (start, end) = self.run_around(day);
        let owed = policy.owed_rest(end - start + 1);
        for offset in 1..=owed {
            let rest = end + offset;
            if rest <= days_in_month {
                self.rest_days.insert(rest);
            }
        }
    }

    pub(crate) fn release(&mut self, day: u32) {
        self.worked_days.remove(&day);
        self.refresh_streak();
    }

    fn refresh_streak(&mut self) {
        self.last_day_worked = self.worked_days.last().copied();
        self.consecutive_days_worked = match self.last_day_worked {
            Some(last) => {
                let (start, end) = self.run_around(last);
                end - start + 1
            }
            None => 0,
        };
    }
}
