#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn staffed_csv(path: &Path) {
    let mut csv = String::from("id,name,rank,preferences\n");
    csv.push_str("chief-m,Chief Morning,chief,morning\n");
    csv.push_str("chief-a,Chief Afternoon,chief,afternoon\n");
    for i in 1..=18 {
        csv.push_str(&format!("r-{i:02},Regular {i:02},regular,morning;afternoon;night\n"));
    }
    for i in 1..=4 {
        csv.push_str(&format!("s-{i:02},Substitute {i:02},substitute,morning;afternoon;night\n"));
    }
    fs::write(path, csv).unwrap();
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("planning-gardes-cli").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn import_generate_check_and_report() {
    let dir = tempdir().unwrap();
    staffed_csv(&dir.path().join("nurses.csv"));

    cli(dir.path())
        .args(["import-nurses", "--csv", "nurses.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("24 nurse(s) imported"));

    cli(dir.path())
        .args(["generate", "--month", "2", "--year", "2023", "--seed", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("28 day(s)").and(predicate::str::contains("0 warning(s)")));

    cli(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no violations"));

    cli(dir.path())
        .args([
            "absence", "--nurse", "Regular 01", "--from", "2023-02-05", "--to", "2023-02-20",
            "--seed", "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("-> s-"));

    cli(dir.path())
        .arg("check")
        .assert()
        .success();

    cli(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Regular 01 | regular"));

    cli(dir.path())
        .args(["list", "--out-json", "roster.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-02-01 Wed | M: Chief Morning"));
    assert!(dir.path().join("roster.json").exists());
}

#[test]
fn shortfalls_exit_with_warning_code() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["add-nurse", "--name", "Alice", "--rank", "chief", "--prefs", "morning"])
        .assert()
        .success();

    cli(dir.path())
        .args(["generate", "--month", "10", "--year", "2025", "--seed", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("WARN 2025-10-01 morning: understaffed (1/4)"));
}

#[test]
fn list_without_roster_fails() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no roster generated yet"));
}

#[test]
fn edit_and_remove_nurses_and_absences() {
    let dir = tempdir().unwrap();
    staffed_csv(&dir.path().join("nurses.csv"));
    cli(dir.path())
        .args(["import-nurses", "--csv", "nurses.csv"])
        .assert()
        .success();

    cli(dir.path())
        .args(["edit-nurse", "--nurse", "r-02", "--rank", "substitute", "--prefs", "night"])
        .assert()
        .success()
        .stdout(predicate::str::contains("r-02 (substitute) updated"));

    fs::write(
        dir.path().join("absences.csv"),
        "nurse,start,end\nRegular 03,2023-02-06,2023-02-08\n",
    )
    .unwrap();
    cli(dir.path())
        .args(["import-absences", "--csv", "absences.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 absence(s) imported"));

    cli(dir.path())
        .args(["remove-absence", "--nurse", "r-03", "--from", "2023-02-07"])
        .assert()
        .failure();
    cli(dir.path())
        .args(["remove-absence", "--nurse", "r-03", "--from", "2023-02-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("absence r-03 2023-02-06..2023-02-08 removed"));

    cli(dir.path())
        .args(["remove-nurse", "--nurse", "Regular 04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("r-04 (Regular 04) removed"));
    cli(dir.path())
        .args(["remove-nurse", "--nurse", "r-04"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown nurse: r-04"));

    let raw = fs::read_to_string(dir.path().join("ward.json")).unwrap();
    let ward: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(ward["nurses"].as_array().unwrap().len(), 23);
    assert!(ward["absences"].as_array().unwrap().is_empty());
}
