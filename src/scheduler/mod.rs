mod assignment;
mod conflicts;
mod constraints;
mod day;
mod state;
mod substitution;
mod types;
mod util;
mod workload;

pub use conflicts::{detect_violations, Violation, ViolationKind};
pub use constraints::{can_work, check, DayContext, Ineligibility};
pub use state::NurseState;
pub use substitution::{Resolution, Substitution};
pub use types::{SchedError, ShiftStaffing, StaffingPolicy, Warning, WarningKind};
pub use workload::WorkloadTracker;

use crate::ledger::SubstitutionLedger;
use crate::model::{Absence, Nurse, Roster};
use assignment::Books;
use chrono::Datelike;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Scheduler : génère le planning d'un mois et rééquilibre les absences.
///
/// La source d'aléa est injectée : même graine, mêmes entrées, même planning.
#[derive(Debug)]
pub struct Scheduler<R: RngCore = ChaCha8Rng> {
    policy: StaffingPolicy,
    rng: R,
}

impl Scheduler<ChaCha8Rng> {
    /// Mode déterministe.
    pub fn seeded(policy: StaffingPolicy, seed: u64) -> Self {
        Self::with_rng(policy, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(policy: StaffingPolicy) -> Self {
        Self::with_rng(policy, ChaCha8Rng::from_os_rng())
    }
}

impl<R: RngCore> Scheduler<R> {
    pub fn with_rng(policy: StaffingPolicy, rng: R) -> Self {
        Self { policy, rng }
    }

    pub fn policy(&self) -> &StaffingPolicy {
        &self.policy
    }

    /// Génère le planning de `month`/`year`.
    ///
    /// Les absences déjà connues rendent la personne indisponible ; le
    /// registre reçoit les remplacements effectués par des suppléants.
    pub fn generate(
        &mut self,
        nurses: &[Nurse],
        absences: &[Absence],
        year: i32,
        month: u32,
        ledger: &mut SubstitutionLedger,
    ) -> Result<Roster, SchedError> {
        self.policy.validate()?;
        util::validate_nurses(nurses)?;
        let (first, days) = util::month_bounds(year, month)?;
        let unavailable = util::unavailability(absences, first, days)?;

        let mut states = BTreeMap::new();
        for nurse in nurses {
            let vacation = util::random_days(&mut self.rng, nurse.vacation_days, days);
            let rest = util::random_days(&mut self.rng, nurse.rest_days, days);
            let target = nurse.rank.workload_cap(&self.policy);
            states.insert(nurse.id.clone(), NurseState::new(vacation, rest, target));
        }
        let mut workload = WorkloadTracker::new();
        let mut warnings = Vec::new();
        let mut calendar = Vec::with_capacity(days as usize);
        let blank = BTreeSet::new();

        for day in 1..=days {
            let date = util::date_of(first, day);
            let ctx = DayContext {
                day,
                date,
                weekday: date.weekday(),
                days_in_month: days,
                unavailable: unavailable.get(&day).unwrap_or(&blank),
            };
            let mut books = Books {
                states: &mut states,
                workload: &mut workload,
            };
            calendar.push(day::build_day(
                nurses,
                &ctx,
                &mut books,
                ledger,
                &self.policy,
                &mut self.rng,
                &mut warnings,
            ));
        }

        info!(
            year,
            month,
            nurses = nurses.len(),
            shifts = workload.total(),
            warnings = warnings.len(),
            "roster generated"
        );

        Ok(Roster {
            year,
            month,
            calendar,
            workload,
            states,
            unavailable,
            warnings,
        })
    }

    /// Enregistre une absence sur un planning existant et remplace la
    /// personne sur chaque garde concernée.
    pub fn resolve_absence(
        &mut self,
        roster: &mut Roster,
        nurses: &[Nurse],
        absence: &mut Absence,
        ledger: &mut SubstitutionLedger,
    ) -> Result<Resolution, SchedError> {
        self.policy.validate()?;
        for nurse in nurses {
            if !roster.states.contains_key(&nurse.id) {
                let mut state = NurseState::default();
                state.workload_target = nurse.rank.workload_cap(&self.policy);
                roster.states.insert(nurse.id.clone(), state);
            }
        }
        substitution::resolve_absence(roster, nurses, absence, ledger, &self.policy, &mut self.rng)
    }
}
