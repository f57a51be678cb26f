//! Historique des remplacements (absent, remplaçant).
//!
//! Le registre survit aux générations : c'est à l'appelant de le charger et
//! de le sauvegarder (voir [`crate::storage`]). Le moteur ne fait que le lire
//! pour départager les remplaçants et y ajouter les nouveaux appariements.

use crate::model::NurseId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Compteur cumulé pour un couple (absent, remplaçant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRecord {
    pub absent: NurseId,
    pub substitute: NurseId,
    pub count: u32,
    pub last_used: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionLedger {
    records: Vec<SubstitutionRecord>,
}

impl SubstitutionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SubstitutionRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Enregistre un remplacement ; un seul enregistrement par couple.
    pub fn record(&mut self, absent: &NurseId, substitute: &NurseId, date: NaiveDate) {
        match self
            .records
            .iter_mut()
            .find(|r| &r.absent == absent && &r.substitute == substitute)
        {
            Some(rec) => {
                rec.count += 1;
                rec.last_used = rec.last_used.max(date);
            }
            None => self.records.push(SubstitutionRecord {
                absent: absent.clone(),
                substitute: substitute.clone(),
                count: 1,
                last_used: date,
            }),
        }
    }

    pub fn find(&self, absent: &NurseId, substitute: &NurseId) -> Option<&SubstitutionRecord> {
        self.records
            .iter()
            .find(|r| &r.absent == absent && &r.substitute == substitute)
    }

    /// Nombre de fois où `substitute` a remplacé `absent`.
    pub fn pair_count(&self, absent: &NurseId, substitute: &NurseId) -> u32 {
        self.find(absent, substitute).map_or(0, |r| r.count)
    }

    /// Total des remplacements assurés par `substitute`, tous absents confondus.
    pub fn substitute_total(&self, substitute: &NurseId) -> u32 {
        self.records
            .iter()
            .filter(|r| &r.substitute == substitute)
            .map(|r| r.count)
            .sum()
    }

    /// Total des remplacements reçus par `absent`.
    pub fn absentee_total(&self, absent: &NurseId) -> u32 {
        self.records
            .iter()
            .filter(|r| &r.absent == absent)
            .map(|r| r.count)
            .sum()
    }
}
