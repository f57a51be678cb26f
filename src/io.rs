use crate::model::{Absence, Nurse, NurseId, Rank, Roster, ShiftKind, Ward};
use crate::scheduler::StaffingPolicy;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Import de personnel depuis CSV:
/// header `id,name,rank[,preferences][,vacation_days][,rest_days]`.
///
/// `id` vide → identifiant aléatoire ; `preferences` séparées par `;`
/// (`morning;night`, ou `M;T;N`).
pub fn import_nurses_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Nurse>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid nurse row (empty name)");
        }
        let rank: Rank = rec
            .get(2)
            .context("missing rank")?
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid rank for {name}"))?;

        let mut nurse = Nurse::new(name, rank);
        if !id.is_empty() {
            nurse.id = NurseId::new(id);
        }
        if let Some(raw) = rec.get(3) {
            nurse.preferences = parse_preferences(raw)
                .with_context(|| format!("invalid preferences for {name}"))?;
        }
        nurse.vacation_days = parse_count(rec.get(4))
            .with_context(|| format!("invalid vacation_days for {name}"))?;
        nurse.rest_days =
            parse_count(rec.get(5)).with_context(|| format!("invalid rest_days for {name}"))?;
        out.push(nurse);
    }
    Ok(out)
}

pub fn parse_preferences(raw: &str) -> anyhow::Result<BTreeSet<ShiftKind>> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| chunk.parse::<ShiftKind>().map_err(anyhow::Error::msg))
        .collect()
}

fn parse_count(raw: Option<&str>) -> anyhow::Result<u32> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(s) => Ok(s.parse()?),
    }
}

/// Import d'absences: header `nurse,start,end[,reason]` (dates `YYYY-MM-DD`).
///
/// `nurse` est un identifiant ou un nom connu de `ward`.
pub fn import_absences_csv<P: AsRef<Path>>(path: P, ward: &Ward) -> anyhow::Result<Vec<Absence>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let key = rec.get(0).context("missing nurse")?.trim();
        let nurse = ward
            .lookup_nurse(key)
            .with_context(|| format!("unknown nurse: {key}"))?;
        let start = parse_date(rec.get(1).context("missing start")?)?;
        let end = parse_date(rec.get(2).context("missing end")?)?;
        let reason = rec.get(3).unwrap_or("").trim();
        let absence =
            Absence::new(nurse.id.clone(), start, end, reason).map_err(anyhow::Error::msg)?;
        out.push(absence);
    }
    Ok(out)
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date: {raw}"))
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Règles lues depuis un fichier JSON ; les champs absents gardent leur
/// valeur par défaut.
pub fn load_policy_json<P: AsRef<Path>>(path: P) -> anyhow::Result<StaffingPolicy> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let policy: StaffingPolicy = serde_json::from_slice(&data)
        .with_context(|| format!("parsing policy {}", path.display()))?;
    policy.validate()?;
    Ok(policy)
}
