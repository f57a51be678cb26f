use crate::ledger::SubstitutionLedger;
use crate::scheduler::{NurseState, StaffingPolicy, Warning, WorkloadTracker};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour Nurse
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NurseId(String);

impl NurseId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NurseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grade dans la hiérarchie du service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Chief,
    Regular,
    Substitute,
}

impl Rank {
    /// Plafond mensuel de gardes ; `None` pour un chef.
    pub fn workload_cap(self, policy: &StaffingPolicy) -> Option<u32> {
        match self {
            Rank::Chief => None,
            Rank::Regular => Some(policy.regular_cap),
            Rank::Substitute => Some(policy.substitute_cap),
        }
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chief" | "chef" | "jefe" => Ok(Rank::Chief),
            "regular" | "titulaire" | "titular" => Ok(Rank::Regular),
            "substitute" | "suppleant" | "suplente" => Ok(Rank::Substitute),
            other => Err(format!("unknown rank: {other}")),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::Chief => "chief",
            Rank::Regular => "regular",
            Rank::Substitute => "substitute",
        };
        f.write_str(s)
    }
}

/// Les trois gardes de la journée, dans l'ordre où elles sont remplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    Morning,
    Afternoon,
    Night,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Afternoon, ShiftKind::Night];
}

impl FromStr for ShiftKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "morning" | "matin" => Ok(ShiftKind::Morning),
            "a" | "t" | "afternoon" | "apres-midi" => Ok(ShiftKind::Afternoon),
            "n" | "night" | "nuit" => Ok(ShiftKind::Night),
            other => Err(format!("unknown shift: {other}")),
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShiftKind::Morning => "morning",
            ShiftKind::Afternoon => "afternoon",
            ShiftKind::Night => "night",
        };
        f.write_str(s)
    }
}

/// Infirmier·ère tel que fourni par le registre du service.
///
/// Les quotas `vacation_days` / `rest_days` sont des nombres de jours ; leur
/// placement concret dans le mois est tiré à chaque génération et vit dans
/// [`NurseState`], jamais sur l'enregistrement d'entrée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nurse {
    pub id: NurseId,
    pub name: String,
    pub rank: Rank,
    #[serde(default)]
    pub preferences: BTreeSet<ShiftKind>,
    #[serde(default)]
    pub vacation_days: u32,
    #[serde(default)]
    pub rest_days: u32,
}

impl Nurse {
    pub fn new<N: Into<String>>(name: N, rank: Rank) -> Self {
        Self {
            id: NurseId::random(),
            name: name.into(),
            rank,
            preferences: BTreeSet::new(),
            vacation_days: 0,
            rest_days: 0,
        }
    }

    pub fn with_id<S: AsRef<str>>(mut self, id: S) -> Self {
        self.id = NurseId::new(id);
        self
    }

    pub fn with_preferences<I: IntoIterator<Item = ShiftKind>>(mut self, prefs: I) -> Self {
        self.preferences = prefs.into_iter().collect();
        self
    }

    pub fn with_quotas(mut self, vacation_days: u32, rest_days: u32) -> Self {
        self.vacation_days = vacation_days;
        self.rest_days = rest_days;
        self
    }

    pub fn prefers(&self, shift: ShiftKind) -> bool {
        self.preferences.contains(&shift)
    }

    /// Garde à laquelle un chef est rattaché : sa première préférence.
    pub fn pinned_shift(&self) -> Option<ShiftKind> {
        match self.rank {
            Rank::Chief => self.preferences.iter().next().copied(),
            _ => None,
        }
    }
}

/// Absence déclarée, bornes incluses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    pub nurse: NurseId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub reason: String,
    /// Remplaçants déjà utilisés pour cette absence (rotation longue durée).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub assigned_substitutes: BTreeSet<NurseId>,
}

impl Absence {
    pub fn new<R: Into<String>>(
        nurse: NurseId,
        start: NaiveDate,
        end: NaiveDate,
        reason: R,
    ) -> Result<Self, String> {
        if end < start {
            return Err("absence end must not be before start".to_string());
        }
        Ok(Self {
            nurse,
            start,
            end,
            reason: reason.into(),
            assigned_substitutes: BTreeSet::new(),
        })
    }

    /// Nombre de jours couverts, bornes incluses.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn is_prolonged(&self, policy: &StaffingPolicy) -> bool {
        self.span_days() > policy.prolonged_absence_days
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Une journée du planning et ses trois gardes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub morning: Vec<NurseId>,
    pub afternoon: Vec<NurseId>,
    pub night: Vec<NurseId>,
}

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            weekday: date.weekday(),
            morning: Vec::new(),
            afternoon: Vec::new(),
            night: Vec::new(),
        }
    }

    pub fn number(&self) -> u32 {
        self.date.day()
    }

    pub fn shift(&self, kind: ShiftKind) -> &[NurseId] {
        match kind {
            ShiftKind::Morning => &self.morning,
            ShiftKind::Afternoon => &self.afternoon,
            ShiftKind::Night => &self.night,
        }
    }

    pub fn shift_mut(&mut self, kind: ShiftKind) -> &mut Vec<NurseId> {
        match kind {
            ShiftKind::Morning => &mut self.morning,
            ShiftKind::Afternoon => &mut self.afternoon,
            ShiftKind::Night => &mut self.night,
        }
    }

    /// Garde occupée par `id` ce jour-là, s'il y en a une.
    pub fn shift_of(&self, id: &NurseId) -> Option<ShiftKind> {
        ShiftKind::ALL
            .into_iter()
            .find(|kind| self.shift(*kind).contains(id))
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }
}

/// Jours du mois, dans l'ordre du calendrier.
pub type Calendar = Vec<Day>;

/// Résultat d'une génération : calendrier, charge et état par personne.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub year: i32,
    pub month: u32,
    pub calendar: Calendar,
    pub workload: WorkloadTracker,
    pub states: BTreeMap<NurseId, NurseState>,
    /// Indisponibilités explicites par numéro de jour.
    #[serde(default)]
    pub unavailable: BTreeMap<u32, BTreeSet<NurseId>>,
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl Roster {
    pub fn days_in_month(&self) -> u32 {
        self.calendar.len() as u32
    }
    pub fn day(&self, number: u32) -> Option<&Day> {
        self.calendar.get(number.checked_sub(1)? as usize)
    }
    pub fn find_day_by_date(&self, date: NaiveDate) -> Option<&Day> {
        self.calendar.iter().find(|d| d.date == date)
    }
    pub fn state(&self, id: &NurseId) -> Option<&NurseState> {
        self.states.get(id)
    }
}

/// Service complet tel que persisté par la CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ward {
    #[serde(default)]
    pub nurses: Vec<Nurse>,
    #[serde(default)]
    pub absences: Vec<Absence>,
    #[serde(default)]
    pub ledger: SubstitutionLedger,
    #[serde(default)]
    pub roster: Option<Roster>,
}

impl Ward {
    pub fn find_nurse_by_name<'a>(&'a self, name: &str) -> Option<&'a Nurse> {
        self.nurses.iter().find(|n| n.name == name)
    }
    pub fn find_nurse_by_id<'a>(&'a self, id: &NurseId) -> Option<&'a Nurse> {
        self.nurses.iter().find(|n| &n.id == id)
    }
    /// Cherche par identifiant, puis par nom.
    pub fn lookup_nurse<'a>(&'a self, key: &str) -> Option<&'a Nurse> {
        self.find_nurse_by_id(&NurseId::new(key))
            .or_else(|| self.find_nurse_by_name(key))
    }

    pub fn lookup_nurse_mut(&mut self, key: &str) -> Option<&mut Nurse> {
        let id = self.lookup_nurse(key)?.id.clone();
        self.nurses.iter_mut().find(|n| n.id == id)
    }

    /// Retire une personne et ses absences déclarées.
    pub fn remove_nurse(&mut self, key: &str) -> Option<Nurse> {
        let id = self.lookup_nurse(key)?.id.clone();
        let pos = self.nurses.iter().position(|n| n.id == id)?;
        self.absences.retain(|a| a.nurse != id);
        Some(self.nurses.remove(pos))
    }

    /// Retire l'absence de `nurse` qui commence le `start`.
    pub fn remove_absence(&mut self, nurse: &NurseId, start: NaiveDate) -> Option<Absence> {
        let pos = self
            .absences
            .iter()
            .position(|a| &a.nurse == nurse && a.start == start)?;
        Some(self.absences.remove(pos))
    }
}
