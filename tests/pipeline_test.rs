//! End-to-end pipeline tests
//!
//! Drives convert and analyze over a small synthetic survey written into a
//! temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DICTIONARY: &str = "\
D033 KCAL TOTAL CALORIE INTAKE \n\
    (KCAL/DAY, AGE-SEX STANDARDIZED)\n\
D045 FIBER DIETARY FIBER INTAKE \n\
    (G/DAY)\n\
M004 ALLVASCc MORTALITY ALL VASCULAR DISEASES \n\
    AGES 0-64\n\
P002 SBP MEAN SYSTOLIC \n\
    BLOOD PRESSURE\n";

// Diet extract carries a trailing dummy column and a "." missing value.
const DIET_EXTRACT: &str = "\
County,Sex,Xiang,D033,D045,   \n\
TS,T,3,2639.6,33.1,\n\
TS,M,3,2710.0,32.0,\n\
SA,T,3,2405.2,.,\n\
LC,T,3,2500.1,30.2,\n\
WX,T,3,2850.4,35.8,\n\
YJ,T,3,2300.8,27.5,\n\
HY,T,3,2950.3,36.4,\n";

const MORTALITY_EXTRACT: &str = "\
County,Sex,Xiang,M004\n\
TS,T,3,52.2\n\
TS,M,3,60.0\n\
SA,T,3,44.9\n\
LC,T,3,47.8\n\
WX,T,3,58.1\n\
YJ,T,3,40.3\n\
HY,T,3,61.0\n";

fn write_survey(dir: &Path) {
    fs::write(dir.join("CHNAME.TXT"), DICTIONARY).unwrap();
    fs::write(dir.join("CH89DG.CSV"), DIET_EXTRACT).unwrap();
    fs::write(dir.join("CH89MO.CSV"), MORTALITY_EXTRACT).unwrap();
}

fn run_convert(data_dir: &Path, out_dir: &Path) {
    let mut cmd = Command::cargo_bin("countystat").unwrap();
    cmd.arg("convert")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--out-dir")
        .arg(out_dir)
        .arg("89")
        .assert()
        .success();
}

#[test]
fn convert_writes_merged_table() {
    let dir = TempDir::new().unwrap();
    write_survey(dir.path());
    let out_dir = dir.path().join("data");

    run_convert(dir.path(), &out_dir);

    let merged = fs::read_to_string(out_dir.join("89.csv")).unwrap();
    let header = merged.lines().next().unwrap();
    assert_eq!(header, "County,Sex,Xiang,D_KCAL,D_FIBER,M_ALLVASCc");
    // 7 data rows survive the inner join
    assert_eq!(merged.lines().count(), 8);
    // "." became a missing cell
    assert!(merged.contains("SA,T,3,2405.2,,44.9"));
}

#[test]
fn convert_fails_for_unknown_dataset() {
    let dir = TempDir::new().unwrap();
    write_survey(dir.path());

    let mut cmd = Command::cargo_bin("countystat").unwrap();
    cmd.arg("convert")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--out-dir")
        .arg(dir.path().join("data"))
        .arg("42")
        .assert()
        .failure();
}

#[test]
fn analyze_ranks_variables_against_outcome() {
    let dir = TempDir::new().unwrap();
    write_survey(dir.path());
    let out_dir = dir.path().join("data");
    run_convert(dir.path(), &out_dir);

    let report_path = dir.path().join("report.json");
    let mut cmd = Command::cargo_bin("countystat").unwrap();
    cmd.arg("analyze")
        .arg(out_dir.join("89.csv"))
        .arg("--dictionary")
        .arg(dir.path().join("CHNAME.TXT"))
        .arg("--outcome")
        .arg("M_ALLVASCc")
        .arg("--json")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("D_KCAL"))
        .stdout(predicate::str::contains("D_FIBER"))
        .stdout(predicate::str::contains("outcome: M_ALLVASCc"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["outcome"], "M_ALLVASCc");

    let results = report["results"].as_array().unwrap();
    let variables: Vec<&str> = results
        .iter()
        .map(|r| r["variable"].as_str().unwrap())
        .collect();
    // P_SBP is absent from the table (skipped); mortality codes are excluded
    assert_eq!(variables, vec!["D_KCAL", "D_FIBER"]);

    // Totals filter keeps the six Sex == "T" counties; fiber lost one row
    // to the missing cell
    assert_eq!(results[0]["n"], 6);
    assert_eq!(results[1]["n"], 5);
    assert!(results[0]["correlation"].as_f64().unwrap() > 0.9);
    assert!(results[0]["rmse_ratio"].as_f64().unwrap() < 1.0);
}

#[test]
fn analyze_fails_when_filter_matches_nothing() {
    let dir = TempDir::new().unwrap();
    write_survey(dir.path());
    let out_dir = dir.path().join("data");
    run_convert(dir.path(), &out_dir);

    let mut cmd = Command::cargo_bin("countystat").unwrap();
    cmd.arg("analyze")
        .arg(out_dir.join("89.csv"))
        .arg("--dictionary")
        .arg(dir.path().join("CHNAME.TXT"))
        .arg("--outcome")
        .arg("M_ALLVASCc")
        .arg("--sex")
        .arg("F")
        .assert()
        .failure();
}

#[test]
fn columns_prints_dictionary() {
    let dir = TempDir::new().unwrap();
    write_survey(dir.path());

    let mut cmd = Command::cargo_bin("countystat").unwrap();
    cmd.arg("columns")
        .arg(dir.path().join("CHNAME.TXT"))
        .assert()
        .success()
        .stdout(predicate::str::contains("D_KCAL"))
        .stdout(predicate::str::contains("TOTAL CALORIE INTAKE"))
        .stdout(predicate::str::contains("M004"));
}

#[test]
fn columns_json_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    write_survey(dir.path());

    let mut cmd = Command::cargo_bin("countystat").unwrap();
    let output = cmd
        .arg("columns")
        .arg(dir.path().join("CHNAME.TXT"))
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let entries: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 4);
    assert_eq!(entries[0]["code"], "D033");
    assert_eq!(entries[0]["name"], "D_KCAL");
}
