use super::SchedError;
use crate::model::{Absence, Nurse, NurseId};
use chrono::{Days, NaiveDate};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Premier jour du mois et nombre de jours.
pub(super) fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, u32), SchedError> {
    let invalid = || SchedError::InvalidPeriod { month, year };
    if year <= 0 || !(1..=12).contains(&month) {
        return Err(invalid());
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let days = next.signed_duration_since(first).num_days() as u32;
    Ok((first, days))
}

pub(super) fn validate_nurses(nurses: &[Nurse]) -> Result<(), SchedError> {
    if nurses.is_empty() {
        return Err(SchedError::EmptyRoster);
    }
    let mut seen = BTreeSet::new();
    for nurse in nurses {
        if !seen.insert(&nurse.id) {
            return Err(SchedError::DuplicateNurse(nurse.id.as_str().to_string()));
        }
    }
    Ok(())
}

/// Projette les absences sur les numéros de jour du mois.
pub(super) fn unavailability(
    absences: &[Absence],
    first: NaiveDate,
    days: u32,
) -> Result<BTreeMap<u32, BTreeSet<NurseId>>, SchedError> {
    let mut out: BTreeMap<u32, BTreeSet<NurseId>> = BTreeMap::new();
    for absence in absences {
        mark_absence(&mut out, absence, first, days)?;
    }
    Ok(out)
}

/// Ajoute les jours de `absence` tombant dans le mois ; renvoie ces jours.
pub(super) fn mark_absence(
    map: &mut BTreeMap<u32, BTreeSet<NurseId>>,
    absence: &Absence,
    first: NaiveDate,
    days: u32,
) -> Result<Vec<u32>, SchedError> {
    if absence.end < absence.start {
        return Err(SchedError::InvalidAbsence("end before start"));
    }
    let covered: Vec<u32> = (1..=days)
        .filter(|day| absence.covers(date_of(first, *day)))
        .collect();
    for day in &covered {
        map.entry(*day).or_default().insert(absence.nurse.clone());
    }
    Ok(covered)
}

pub(super) fn date_of(first: NaiveDate, day: u32) -> NaiveDate {
    first + Days::new(u64::from(day - 1))
}

/// Tire `count` jours distincts dans `1..=days`.
pub(super) fn random_days<R: Rng + ?Sized>(rng: &mut R, count: u32, days: u32) -> BTreeSet<u32> {
    let amount = count.min(days) as usize;
    rand::seq::index::sample(rng, days as usize, amount)
        .into_iter()
        .map(|idx| idx as u32 + 1)
        .collect()
}
