use crate::model::NurseId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nombre de gardes effectuées par personne pendant le mois généré.
///
/// Le tracker ne fait que compter ; le plafond par grade est vérifié par
/// [`super::can_work`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkloadTracker {
    counts: BTreeMap<NurseId, u32>,
}

impl WorkloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &NurseId) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, id: &NurseId) -> u32 {
        let count = self.counts.entry(id.clone()).or_insert(0);
        *count += 1;
        *count
    }

    /// Retire une garde (absence enregistrée après coup).
    pub fn decrement(&mut self, id: &NurseId) -> u32 {
        let count = self.counts.entry(id.clone()).or_insert(0);
        *count = count.saturating_sub(1);
        *count
    }

    pub fn below(&self, id: &NurseId, cap: Option<u32>) -> bool {
        cap.map_or(true, |cap| self.get(id) < cap)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NurseId, u32)> {
        self.counts.iter().map(|(id, c)| (id, *c))
    }

    pub fn snapshot(&self) -> BTreeMap<NurseId, u32> {
        self.counts.clone()
    }
}
