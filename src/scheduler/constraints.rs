use super::{NurseState, StaffingPolicy, WorkloadTracker};
use crate::model::{Nurse, NurseId, Rank, ShiftKind};
use chrono::{NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Ce que le vérificateur doit savoir du jour en cours.
#[derive(Debug, Clone, Copy)]
pub struct DayContext<'a> {
    pub day: u32,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub days_in_month: u32,
    pub unavailable: &'a BTreeSet<NurseId>,
}

/// Première règle violée, dans l'ordre d'évaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    Absent,
    OnVacation,
    RestDay,
    ChiefOffDay,
    ChiefOtherShift,
    NotPreferred,
    WorkloadCap,
    RestOwed,
    StreakTooLong,
}

/// `true` si `nurse` peut prendre `shift` ce jour-là.
pub fn can_work(
    nurse: &Nurse,
    shift: ShiftKind,
    ctx: &DayContext<'_>,
    state: &NurseState,
    tracker: &WorkloadTracker,
    policy: &StaffingPolicy,
) -> bool {
    check(nurse, shift, ctx, state, tracker, policy, false).is_ok()
}

/// Évalue les règles dans l'ordre ; `ignore_preferences` ne lève que la
/// règle de préférence (complément de dernier recours).
pub fn check(
    nurse: &Nurse,
    shift: ShiftKind,
    ctx: &DayContext<'_>,
    state: &NurseState,
    tracker: &WorkloadTracker,
    policy: &StaffingPolicy,
    ignore_preferences: bool,
) -> Result<(), Ineligibility> {
    if ctx.unavailable.contains(&nurse.id) {
        return Err(Ineligibility::Absent);
    }
    if state.vacation_days.contains(&ctx.day) {
        return Err(Ineligibility::OnVacation);
    }
    if state.rest_days.contains(&ctx.day) {
        return Err(Ineligibility::RestDay);
    }

    if nurse.rank == Rank::Chief {
        if !policy.chief_allowed(shift, ctx.weekday) {
            return Err(Ineligibility::ChiefOffDay);
        }
        if nurse.pinned_shift() != Some(shift) {
            return Err(Ineligibility::ChiefOtherShift);
        }
        // chefs : ni plafond ni repos automatique
        return Ok(());
    }

    if !ignore_preferences && !nurse.prefers(shift) {
        return Err(Ineligibility::NotPreferred);
    }
    let cap = state
        .workload_target
        .or_else(|| nurse.rank.workload_cap(policy));
    if !tracker.below(&nurse.id, cap) {
        return Err(Ineligibility::WorkloadCap);
    }

    let (start, end) = state.run_around(ctx.day);
    let streak = end - start + 1;
    let owed = policy.owed_rest(streak);
    if (1..=owed).any(|offset| state.works_on(end + offset)) {
        return Err(Ineligibility::RestOwed);
    }
    if streak > policy.max_consecutive_days {
        return Err(Ineligibility::StreakTooLong);
    }

    Ok(())
}
