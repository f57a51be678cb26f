use crate::model::{NurseId, ShiftKind};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Effectif minimal / maximal d'une garde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftStaffing {
    pub min: usize,
    pub max: usize,
}

impl ShiftStaffing {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }
}

/// Règles de génération
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffingPolicy {
    /// Matin / après-midi du lundi au vendredi.
    pub weekday: ShiftStaffing,
    /// Matin / après-midi le week-end.
    pub weekend: ShiftStaffing,
    pub night: ShiftStaffing,
    pub regular_cap: u32,
    pub substitute_cap: u32,
    /// Série (jours consécutifs) qui déclenche `short_streak_rest` jours de repos.
    pub short_streak: u32,
    pub short_streak_rest: u32,
    pub long_streak: u32,
    pub long_streak_rest: u32,
    pub max_consecutive_days: u32,
    /// Au-delà de ce nombre de jours, l'absence est traitée par rotation.
    pub prolonged_absence_days: i64,
    /// Dernier recours : compléter une garde hors préférences.
    pub fill_outside_preferences: bool,
}

impl Default for StaffingPolicy {
    fn default() -> Self {
        Self {
            weekday: ShiftStaffing::exactly(4),
            weekend: ShiftStaffing::exactly(3),
            night: ShiftStaffing::exactly(2),
            regular_cap: 17,
            substitute_cap: 12,
            short_streak: 2,
            short_streak_rest: 1,
            long_streak: 4,
            long_streak_rest: 2,
            max_consecutive_days: 4,
            prolonged_absence_days: 7,
            fill_outside_preferences: false,
        }
    }
}

impl StaffingPolicy {
    pub fn validate(&self) -> Result<(), SchedError> {
        let checks = [
            ("weekday", self.weekday),
            ("weekend", self.weekend),
            ("night", self.night),
        ];
        for (slot, staffing) in checks {
            if staffing.min > staffing.max {
                return Err(SchedError::InvalidStaffing {
                    slot,
                    min: staffing.min,
                    max: staffing.max,
                });
            }
        }
        if self.regular_cap == 0 || self.substitute_cap == 0 {
            return Err(SchedError::InvalidPolicy("workload caps must be > 0"));
        }
        if self.max_consecutive_days == 0 || self.short_streak == 0 {
            return Err(SchedError::InvalidPolicy("streak thresholds must be > 0"));
        }
        if self.long_streak < self.short_streak {
            return Err(SchedError::InvalidPolicy(
                "long_streak must not be shorter than short_streak",
            ));
        }
        if self.prolonged_absence_days < 1 {
            return Err(SchedError::InvalidPolicy("prolonged_absence_days must be > 0"));
        }
        Ok(())
    }

    pub fn staffing(&self, shift: ShiftKind, weekday: Weekday) -> ShiftStaffing {
        match shift {
            ShiftKind::Night => self.night,
            _ if is_weekend(weekday) => self.weekend,
            _ => self.weekday,
        }
    }

    /// Un chef ne travaille qu'en semaine, jamais la nuit.
    pub fn chief_allowed(&self, shift: ShiftKind, weekday: Weekday) -> bool {
        shift != ShiftKind::Night && !is_weekend(weekday)
    }

    /// Jours de repos dus après une série de `streak` jours.
    pub fn owed_rest(&self, streak: u32) -> u32 {
        if streak >= self.long_streak {
            self.long_streak_rest
        } else if streak >= self.short_streak {
            self.short_streak_rest
        } else {
            0
        }
    }
}

pub(crate) fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    Understaffed { required: usize, found: usize },
    UncoveredAbsence { absent: NurseId },
}

/// Situation non bloquante remontée à l'appelant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub date: NaiveDate,
    pub shift: ShiftKind,
    pub kind: WarningKind,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::Understaffed { required, found } => write!(
                f,
                "{} {}: understaffed ({found}/{required})",
                self.date, self.shift
            ),
            WarningKind::UncoveredAbsence { absent } => write!(
                f,
                "{} {}: no substitute for {absent}, slot left vacant",
                self.date, self.shift
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("empty nurse list")]
    EmptyRoster,
    #[error("duplicate nurse id: {0}")]
    DuplicateNurse(String),
    #[error("invalid period: month {month}, year {year}")]
    InvalidPeriod { month: u32, year: i32 },
    /// `slot` : `weekday`, `weekend` ou `night`.
    #[error("invalid {slot} staffing: min {min} > max {max}")]
    InvalidStaffing {
        slot: &'static str,
        min: usize,
        max: usize,
    },
    #[error("invalid policy: {0}")]
    InvalidPolicy(&'static str),
    #[error("invalid absence: {0}")]
    InvalidAbsence(&'static str),
    #[error("unknown nurse: {0}")]
    UnknownNurse(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
