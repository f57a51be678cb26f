#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use planning_gardes::{
    io,
    model::{Absence, Nurse, Rank},
    scheduler::{detect_violations, Scheduler, StaffingPolicy},
    stats::workload_report,
    storage::{JsonStorage, Storage},
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planning des gardes infirmières
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du service
    #[arg(long, global = true, default_value = "ward.json")]
    ward: String,

    /// Règles de génération (JSON) ; valeurs par défaut sinon
    #[arg(long, global = true)]
    policy: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer le personnel depuis un CSV
    ImportNurses {
        #[arg(long)]
        csv: String,
    },

    /// Ajouter une personne
    AddNurse {
        #[arg(long)]
        name: String,
        /// chief | regular | substitute
        #[arg(long)]
        rank: String,
        /// liste "morning;afternoon;night"
        #[arg(long, default_value = "")]
        prefs: String,
        #[arg(long, default_value_t = 0)]
        vacation_days: u32,
        #[arg(long, default_value_t = 0)]
        rest_days: u32,
    },

    /// Modifier une personne (identifiant ou nom)
    EditNurse {
        #[arg(long)]
        nurse: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        rank: Option<String>,
        #[arg(long)]
        prefs: Option<String>,
        #[arg(long)]
        vacation_days: Option<u32>,
        #[arg(long)]
        rest_days: Option<u32>,
    },

    /// Retirer une personne et ses absences
    RemoveNurse {
        #[arg(long)]
        nurse: String,
    },

    /// Importer des absences depuis un CSV
    ImportAbsences {
        #[arg(long)]
        csv: String,
    },

    /// Générer le planning d'un mois
    Generate {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// Graine ; aléatoire si absente
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Déclarer une absence et remplacer sur le planning courant
    Absence {
        /// identifiant ou nom
        #[arg(long)]
        nurse: String,
        /// YYYY-MM-DD
        #[arg(long)]
        from: String,
        /// YYYY-MM-DD (inclus)
        #[arg(long)]
        to: String,
        #[arg(long, default_value = "")]
        reason: String,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Retirer une absence déclarée (le planning courant n'est pas modifié)
    RemoveAbsence {
        #[arg(long)]
        nurse: String,
        /// début de l'absence, YYYY-MM-DD
        #[arg(long)]
        from: String,
    },

    /// Afficher et optionnellement exporter le planning
    List {
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Vérifier le planning courant
    Check,

    /// Bilan de charge par personne
    Stats,
}

fn scheduler(policy: StaffingPolicy, seed: Option<u64>) -> Scheduler {
    match seed {
        Some(seed) => Scheduler::seeded(policy, seed),
        None => Scheduler::from_entropy(policy),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let policy = match &cli.policy {
        Some(path) => io::load_policy_json(path)?,
        None => StaffingPolicy::default(),
    };
    let storage = JsonStorage::open(&cli.ward)?;
    let mut ward = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::ImportNurses { csv } => {
            let nurses = io::import_nurses_csv(csv)?;
            println!("{} nurse(s) imported", nurses.len());
            ward.nurses.extend(nurses);
            storage.save(&ward)?;
            0
        }
        Commands::AddNurse {
            name,
            rank,
            prefs,
            vacation_days,
            rest_days,
        } => {
            let rank: Rank = rank.parse().map_err(anyhow::Error::msg)?;
            let mut nurse = Nurse::new(name, rank).with_quotas(vacation_days, rest_days);
            nurse.preferences = io::parse_preferences(&prefs)?;
            println!("{} ({})", nurse.id, nurse.rank);
            ward.nurses.push(nurse);
            storage.save(&ward)?;
            0
        }
        Commands::EditNurse {
            nurse,
            name,
            rank,
            prefs,
            vacation_days,
            rest_days,
        } => {
            let rank: Option<Rank> = rank
                .map(|r| r.parse::<Rank>().map_err(anyhow::Error::msg))
                .transpose()?;
            let prefs = prefs.map(|p| io::parse_preferences(&p)).transpose()?;
            let target = ward
                .lookup_nurse_mut(&nurse)
                .with_context(|| format!("unknown nurse: {nurse}"))?;
            if let Some(name) = name {
                target.name = name;
            }
            if let Some(rank) = rank {
                target.rank = rank;
            }
            if let Some(prefs) = prefs {
                target.preferences = prefs;
            }
            if let Some(days) = vacation_days {
                target.vacation_days = days;
            }
            if let Some(days) = rest_days {
                target.rest_days = days;
            }
            println!("{} ({}) updated", target.id, target.rank);
            storage.save(&ward)?;
            0
        }
        Commands::RemoveNurse { nurse } => {
            let removed = ward
                .remove_nurse(&nurse)
                .with_context(|| format!("unknown nurse: {nurse}"))?;
            println!("{} ({}) removed", removed.id, removed.name);
            storage.save(&ward)?;
            0
        }
        Commands::ImportAbsences { csv } => {
            let absences = io::import_absences_csv(csv, &ward)?;
            println!("{} absence(s) imported", absences.len());
            ward.absences.extend(absences);
            storage.save(&ward)?;
            0
        }
        Commands::Generate { month, year, seed } => {
            let mut sched = scheduler(policy, seed);
            let roster =
                sched.generate(&ward.nurses, &ward.absences, year, month, &mut ward.ledger)?;
            for w in &roster.warnings {
                eprintln!("WARN {w}");
            }
            let code = if roster.warnings.is_empty() { 0 } else { 2 };
            println!(
                "{} day(s), {} shift(s) assigned, {} warning(s)",
                roster.calendar.len(),
                roster.workload.total(),
                roster.warnings.len()
            );
            ward.roster = Some(roster);
            storage.save(&ward)?;
            code
        }
        Commands::Absence {
            nurse,
            from,
            to,
            reason,
            seed,
        } => {
            let id = ward
                .lookup_nurse(&nurse)
                .map(|n| n.id.clone())
                .with_context(|| format!("unknown nurse: {nurse}"))?;
            let start = io::parse_date(&from)?;
            let end = io::parse_date(&to)?;
            let mut absence = Absence::new(id, start, end, reason).map_err(anyhow::Error::msg)?;

            let mut code = 0;
            if let Some(mut roster) = ward.roster.take() {
                let mut sched = scheduler(policy, seed);
                let resolution =
                    sched.resolve_absence(&mut roster, &ward.nurses, &mut absence, &mut ward.ledger)?;
                for s in &resolution.substitutions {
                    println!("{} {}: {} -> {}", s.date, s.shift, s.absent, s.substitute);
                }
                for w in &resolution.warnings {
                    eprintln!("WARN {w}");
                }
                if !resolution.warnings.is_empty() {
                    code = 2;
                }
                ward.roster = Some(roster);
            }
            ward.absences.push(absence);
            storage.save(&ward)?;
            code
        }
        Commands::RemoveAbsence { nurse, from } => {
            let id = ward
                .lookup_nurse(&nurse)
                .map(|n| n.id.clone())
                .with_context(|| format!("unknown nurse: {nurse}"))?;
            let start = io::parse_date(&from)?;
            let removed = ward
                .remove_absence(&id, start)
                .with_context(|| format!("no absence for {nurse} starting {start}"))?;
            println!("absence {} {}..{} removed", removed.nurse, removed.start, removed.end);
            storage.save(&ward)?;
            0
        }
        Commands::List { out_json } => {
            let Some(roster) = ward.roster.as_ref() else {
                bail!("no roster generated yet");
            };
            if let Some(path) = out_json {
                io::export_roster_json(path, roster)?;
            }
            let names = |ids: &[planning_gardes::NurseId]| {
                ids.iter()
                    .map(|id| {
                        ward.find_nurse_by_id(id)
                            .map(|n| n.name.as_str())
                            .unwrap_or(id.as_str())
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            for day in &roster.calendar {
                println!(
                    "{} {:?} | M: {} | A: {} | N: {}",
                    day.date,
                    day.weekday,
                    names(day.morning.as_slice()),
                    names(day.afternoon.as_slice()),
                    names(day.night.as_slice())
                );
            }
            0
        }
        Commands::Check => {
            let Some(roster) = ward.roster.as_ref() else {
                bail!("no roster generated yet");
            };
            let violations = detect_violations(roster, &ward.nurses, &policy);
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                for v in &violations {
                    eprintln!(
                        "{} {} {:?}",
                        v.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                        v.nurse.as_ref().map(|n| n.as_str()).unwrap_or("-"),
                        v.kind
                    );
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Stats => {
            let Some(roster) = ward.roster.as_ref() else {
                bail!("no roster generated yet");
            };
            for r in workload_report(roster, &ward.nurses, &ward.ledger, &policy) {
                let cap = r.cap.map(|c| c.to_string()).unwrap_or_else(|| "-".into());
                println!(
                    "{} | {} | worked {}/{} | off {} | substitutions {}",
                    r.name, r.rank, r.shifts_worked, cap, r.days_off, r.substitutions
                );
            }
            0
        }
    };

    std::process::exit(code);
}
