use super::assignment::{order_substitutes, Books};
use super::constraints::DayContext;
use super::{util, SchedError, StaffingPolicy, Warning, WarningKind, WorkloadTracker};
use crate::ledger::SubstitutionLedger;
use crate::model::{Absence, Nurse, NurseId, Rank, Roster, ShiftKind};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Un remplacement effectué.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub date: NaiveDate,
    pub shift: ShiftKind,
    pub absent: NurseId,
    pub substitute: NurseId,
}

/// Bilan d'une absence enregistrée après génération.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub prolonged: bool,
    pub substitutions: Vec<Substitution>,
    pub warnings: Vec<Warning>,
}

impl Resolution {
    pub fn distinct_substitutes(&self) -> BTreeSet<&NurseId> {
        self.substitutions.iter().map(|s| &s.substitute).collect()
    }
}

pub(super) fn resolve_absence<R: Rng + ?Sized>(
    roster: &mut Roster,
    nurses: &[Nurse],
    absence: &mut Absence,
    ledger: &mut SubstitutionLedger,
    policy: &StaffingPolicy,
    rng: &mut R,
) -> Result<Resolution, SchedError> {
    if absence.end < absence.start {
        return Err(SchedError::InvalidAbsence("end before start"));
    }
    if !nurses.iter().any(|n| n.id == absence.nurse) {
        return Err(SchedError::UnknownNurse(absence.nurse.as_str().to_string()));
    }

    let prolonged = absence.is_prolonged(policy);
    let mut resolution = Resolution {
        prolonged,
        ..Resolution::default()
    };
    let Some(first) = roster.calendar.first().map(|d| d.date) else {
        return Ok(resolution);
    };
    let days = roster.days_in_month();
    let affected = util::mark_absence(&mut roster.unavailable, absence, first, days)?;

    let Roster {
        calendar,
        states,
        workload,
        unavailable,
        warnings,
        ..
    } = roster;
    let mut books = Books { states, workload };
    let blank = BTreeSet::new();

    for day in affected {
        let idx = (day - 1) as usize;
        let Some(shift) = calendar[idx].shift_of(&absence.nurse) else {
            continue;
        };
        let Some(pos) = calendar[idx]
            .shift(shift)
            .iter()
            .position(|id| id == &absence.nurse)
        else {
            continue;
        };
        calendar[idx].shift_mut(shift).remove(pos);
        books.release(&absence.nurse, day);

        let today = &calendar[idx];
        let ctx = DayContext {
            day,
            date: today.date,
            weekday: today.weekday,
            days_in_month: days,
            unavailable: unavailable.get(&day).unwrap_or(&blank),
        };
        let mut candidates: Vec<&Nurse> = nurses
            .iter()
            .filter(|n| n.rank == Rank::Substitute && today.shift_of(&n.id).is_none())
            .filter(|n| books.is_eligible(n, shift, &ctx, policy, false))
            .collect();
        candidates.shuffle(rng);

        match pick_substitute(&mut candidates, absence, prolonged, &*books.workload, ledger) {
            Some(sub) => {
                calendar[idx].shift_mut(shift).insert(pos, sub.id.clone());
                books.record(sub, &ctx, policy);
                ledger.record(&absence.nurse, &sub.id, ctx.date);
                absence.assigned_substitutes.insert(sub.id.clone());
                debug!(date = %ctx.date, shift = %shift, substitute = %sub.id, "absence covered");
                resolution.substitutions.push(Substitution {
                    date: ctx.date,
                    shift,
                    absent: absence.nurse.clone(),
                    substitute: sub.id.clone(),
                });
            }
            None => {
                warn!(date = %ctx.date, shift = %shift, absent = %absence.nurse, "no eligible substitute");
                let warning = Warning {
                    date: ctx.date,
                    shift,
                    kind: WarningKind::UncoveredAbsence {
                        absent: absence.nurse.clone(),
                    },
                };
                warnings.push(warning.clone());
                resolution.warnings.push(warning);
            }
        }
    }

    info!(
        absent = %absence.nurse,
        prolonged,
        covered = resolution.substitutions.len(),
        uncovered = resolution.warnings.len(),
        "absence resolved"
    );
    Ok(resolution)
}

/// Absence courte : même ordre qu'à la génération, rapporté à l'absent.
/// Absence longue : d'abord un suppléant jamais utilisé pour cette absence,
/// sinon celui qui a le moins remplacé cette personne.
fn pick_substitute<'n>(
    candidates: &mut [&'n Nurse],
    absence: &Absence,
    prolonged: bool,
    workload: &WorkloadTracker,
    ledger: &SubstitutionLedger,
) -> Option<&'n Nurse> {
    order_substitutes(candidates, workload, ledger, Some(&absence.nurse));
    if !prolonged {
        return candidates.first().copied();
    }
    if let Some(fresh) = candidates
        .iter()
        .find(|n| !absence.assigned_substitutes.contains(&n.id))
    {
        return Some(*fresh);
    }
    candidates
        .iter()
        .min_by_key(|n| ledger.pair_count(&absence.nurse, &n.id))
        .copied()
}
