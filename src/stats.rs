use crate::ledger::SubstitutionLedger;
use crate::model::{Nurse, NurseId, Rank, Roster};
use crate::scheduler::StaffingPolicy;

/// Bilan mensuel d'une personne.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NurseReport {
    pub id: NurseId,
    pub name: String,
    pub rank: Rank,
    pub shifts_worked: u32,
    pub days_off: u32,
    pub cap: Option<u32>,
    /// Remplacements assurés, tous mois confondus.
    pub substitutions: u32,
}

/// Jours travaillés / non travaillés par personne, dans l'ordre du registre.
pub fn workload_report(
    roster: &Roster,
    nurses: &[Nurse],
    ledger: &SubstitutionLedger,
    policy: &StaffingPolicy,
) -> Vec<NurseReport> {
    let days = roster.days_in_month();
    nurses
        .iter()
        .map(|nurse| {
            let worked = roster
                .calendar
                .iter()
                .filter(|d| d.shift_of(&nurse.id).is_some())
                .count() as u32;
            NurseReport {
                id: nurse.id.clone(),
                name: nurse.name.clone(),
                rank: nurse.rank,
                shifts_worked: roster.workload.get(&nurse.id),
                days_off: days.saturating_sub(worked),
                cap: nurse.rank.workload_cap(policy),
                substitutions: ledger.substitute_total(&nurse.id),
            }
        })
        .collect()
}
