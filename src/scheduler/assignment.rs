use super::constraints::{self, DayContext};
use super::{NurseState, StaffingPolicy, Warning, WarningKind, WorkloadTracker};
use crate::ledger::SubstitutionLedger;
use crate::model::{Nurse, NurseId, Rank, ShiftKind};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Registres mutables d'une génération en cours.
pub(super) struct Books<'a> {
    pub states: &'a mut BTreeMap<NurseId, NurseState>,
    pub workload: &'a mut WorkloadTracker,
}

impl Books<'_> {
    pub(super) fn is_eligible(
        &self,
        nurse: &Nurse,
        shift: ShiftKind,
        ctx: &DayContext<'_>,
        policy: &StaffingPolicy,
        ignore_preferences: bool,
    ) -> bool {
        let blank = NurseState::default();
        let state = self.states.get(&nurse.id).unwrap_or(&blank);
        constraints::check(
            nurse,
            shift,
            ctx,
            state,
            &*self.workload,
            policy,
            ignore_preferences,
        )
        .is_ok()
    }

    /// Compte la garde et met à jour série / repos de la personne.
    pub(super) fn record(
        &mut self,
        nurse: &Nurse,
        ctx: &DayContext<'_>,
        policy: &StaffingPolicy,
    ) {
        self.workload.increment(&nurse.id);
        self.states.entry(nurse.id.clone()).or_default().work(
            ctx.day,
            policy,
            ctx.days_in_month,
            nurse.rank == Rank::Chief,
        );
    }

    /// Annule une garde (absence constatée après génération).
    pub(super) fn release(&mut self, id: &NurseId, day: u32) {
        self.workload.decrement(id);
        if let Some(state) = self.states.get_mut(id) {
            state.release(day);
        }
    }
}

/// Ordre de tirage des suppléants : charge, puis historique de remplacement.
///
/// Tri stable : à égalité, l'ordre mélangé du pool départage.
pub(super) fn order_substitutes(
    candidates: &mut [&Nurse],
    workload: &WorkloadTracker,
    ledger: &SubstitutionLedger,
    absentee: Option<&NurseId>,
) {
    candidates.sort_by_key(|n| {
        (
            workload.get(&n.id),
            absentee.map_or(0, |a| ledger.pair_count(a, &n.id)),
            ledger.substitute_total(&n.id),
        )
    });
}

/// Remplit une garde pour un jour : chef, titulaires, puis suppléants.
#[allow(clippy::too_many_arguments)]
pub(super) fn assign_shift(
    nurses: &[Nurse],
    pool: &[usize],
    shift: ShiftKind,
    ctx: &DayContext<'_>,
    assigned_today: &mut BTreeSet<NurseId>,
    books: &mut Books<'_>,
    ledger: &SubstitutionLedger,
    policy: &StaffingPolicy,
    warnings: &mut Vec<Warning>,
) -> Vec<NurseId> {
    let staffing = policy.staffing(shift, ctx.weekday);
    let mut selected: Vec<&Nurse> = Vec::with_capacity(staffing.max);

    let free = |n: &Nurse, selected: &[&Nurse]| {
        !assigned_today.contains(&n.id) && !selected.iter().any(|s| s.id == n.id)
    };
    let candidates = || pool.iter().map(|&i| &nurses[i]);

    if policy.chief_allowed(shift, ctx.weekday) && staffing.max > 0 {
        let chief = candidates()
            .filter(|n| n.rank == Rank::Chief && n.pinned_shift() == Some(shift))
            .find(|n| free(*n, selected.as_slice()) && books.is_eligible(n, shift, ctx, policy, false));
        if let Some(chief) = chief {
            selected.push(chief);
        }
    }

    let mut regulars: Vec<&Nurse> = candidates()
        .filter(|n| n.rank == Rank::Regular)
        .filter(|n| free(*n, selected.as_slice()) && books.is_eligible(n, shift, ctx, policy, false))
        .collect();
    regulars.sort_by_key(|n| books.workload.get(&n.id));
    let room = staffing.max.saturating_sub(selected.len());
    selected.extend(regulars.into_iter().take(room));

    if selected.len() < staffing.min {
        let mut substitutes: Vec<&Nurse> = candidates()
            .filter(|n| n.rank == Rank::Substitute)
            .filter(|n| free(*n, selected.as_slice()) && books.is_eligible(n, shift, ctx, policy, false))
            .collect();
        order_substitutes(&mut substitutes, &*books.workload, ledger, None);
        let need = staffing.min - selected.len();
        selected.extend(substitutes.into_iter().take(need));
    }

    if selected.len() < staffing.min && policy.fill_outside_preferences {
        let mut others: Vec<&Nurse> = candidates()
            .filter(|n| n.rank != Rank::Chief)
            .filter(|n| free(*n, selected.as_slice()) && books.is_eligible(n, shift, ctx, policy, true))
            .collect();
        others.sort_by_key(|n| books.workload.get(&n.id));
        let need = staffing.min - selected.len();
        selected.extend(others.into_iter().take(need));
    }

    selected.truncate(staffing.max);

    if selected.len() < staffing.min {
        warn!(
            date = %ctx.date,
            shift = %shift,
            required = staffing.min,
            found = selected.len(),
            "understaffed shift"
        );
        warnings.push(Warning {
            date: ctx.date,
            shift,
            kind: WarningKind::Understaffed {
                required: staffing.min,
                found: selected.len(),
            },
        });
    }

    let mut ids = Vec::with_capacity(selected.len());
    for nurse in selected {
        books.record(nurse, ctx, policy);
        assigned_today.insert(nurse.id.clone());
        ids.push(nurse.id.clone());
    }
    ids
}
