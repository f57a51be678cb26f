use super::assignment::{self, Books};
use super::constraints::DayContext;
use super::{StaffingPolicy, Warning};
use crate::ledger::SubstitutionLedger;
use crate::model::{Day, Nurse, NurseId, Rank, ShiftKind};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// Construit une journée : matin, après-midi puis nuit, sans doublon.
#[allow(clippy::too_many_arguments)]
pub(super) fn build_day<R: Rng + ?Sized>(
    nurses: &[Nurse],
    ctx: &DayContext<'_>,
    books: &mut Books<'_>,
    ledger: &mut SubstitutionLedger,
    policy: &StaffingPolicy,
    rng: &mut R,
    warnings: &mut Vec<Warning>,
) -> Day {
    let mut day = Day::new(ctx.date);
    let mut pool: Vec<usize> = (0..nurses.len()).collect();
    pool.shuffle(rng);

    let mut assigned_today: BTreeSet<NurseId> = BTreeSet::new();
    let mut uncovered: Vec<&Nurse> = nurses
        .iter()
        .filter(|n| n.rank != Rank::Chief && ctx.unavailable.contains(&n.id))
        .collect();
    uncovered.sort_by(|a, b| a.id.cmp(&b.id));

    for shift in ShiftKind::ALL {
        let assigned = assignment::assign_shift(
            nurses,
            &pool,
            shift,
            ctx,
            &mut assigned_today,
            books,
            ledger,
            policy,
            warnings,
        );
        record_cover(nurses, &assigned, shift, ctx, &mut uncovered, ledger);
        *day.shift_mut(shift) = assigned;
    }

    debug!(
        date = %ctx.date,
        morning = day.morning.len(),
        afternoon = day.afternoon.len(),
        night = day.night.len(),
        "day built"
    );
    day
}

/// Impute chaque suppléant tiré à une absence déclarée du jour qui
/// concernait cette garde.
fn record_cover(
    nurses: &[Nurse],
    assigned: &[NurseId],
    shift: ShiftKind,
    ctx: &DayContext<'_>,
    uncovered: &mut Vec<&Nurse>,
    ledger: &mut SubstitutionLedger,
) {
    for id in assigned {
        let is_substitute = nurses
            .iter()
            .any(|n| &n.id == id && n.rank == Rank::Substitute);
        if !is_substitute {
            continue;
        }
        if let Some(pos) = uncovered.iter().position(|n| n.prefers(shift)) {
            let absent = uncovered.remove(pos);
            ledger.record(&absent.id, id, ctx.date);
        }
    }
}
