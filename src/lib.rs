#![forbid(unsafe_code)]
//! Planning des gardes infirmières: génération mensuelle et remplacements.
//!
//! - Trois gardes par jour (matin, après-midi, nuit), chefs en semaine seulement.
//! - Plafonds de charge par grade, repos automatique après une série.
//! - Absences tardives redistribuées aux suppléants, avec registre d'équité.
//! - Aléa injectable : une graine donne toujours le même planning.

pub mod io;
pub mod ledger;
pub mod model;
pub mod scheduler;
pub mod stats;
pub mod storage;

pub use ledger::{SubstitutionLedger, SubstitutionRecord};
pub use model::{Absence, Calendar, Day, Nurse, NurseId, Rank, Roster, ShiftKind, Ward};
pub use scheduler::{
    detect_violations, Resolution, SchedError, Scheduler, StaffingPolicy, Substitution, Warning,
    WarningKind, WorkloadTracker,
};
pub use stats::{workload_report, NurseReport};
pub use storage::{JsonStorage, Storage};
