#![allow(dead_code)]
use planning_gardes::{Nurse, Rank, ShiftKind};

pub const ALL_SHIFTS: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Afternoon, ShiftKind::Night];

pub fn chief(id: &str, shift: ShiftKind) -> Nurse {
    Nurse::new(id, Rank::Chief)
        .with_id(id)
        .with_preferences([shift])
}

pub fn regular(id: &str) -> Nurse {
    Nurse::new(id, Rank::Regular)
        .with_id(id)
        .with_preferences(ALL_SHIFTS)
}

pub fn substitute(id: &str) -> Nurse {
    Nurse::new(id, Rank::Substitute)
        .with_id(id)
        .with_preferences(ALL_SHIFTS)
}

/// 1 chef matin, 1 chef après-midi, `regulars` titulaires, `substitutes` suppléants.
pub fn ward(regulars: usize, substitutes: usize) -> Vec<Nurse> {
    let mut nurses = vec![
        chief("chief-m", ShiftKind::Morning),
        chief("chief-a", ShiftKind::Afternoon),
    ];
    nurses.extend((1..=regulars).map(|i| regular(&format!("r-{i:02}"))));
    nurses.extend((1..=substitutes).map(|i| substitute(&format!("s-{i:02}"))));
    nurses
}

/// Effectif du scénario de référence : 12 personnes.
pub fn twelve_nurses() -> Vec<Nurse> {
    ward(8, 2)
}

/// Effectif suffisant pour couvrir un mois sans alerte.
pub fn staffed() -> Vec<Nurse> {
    ward(18, 4)
}
