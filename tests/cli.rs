use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
bill_groups:
  - account: Visa
    file_type: csv
    file_config:
      has_header: true
      fields:
        date: {column: date}
        name: {column: name}
        amount:
          format: SignedColumn
          column: amount
export_to: csv
"#;

fn setup(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.yaml"), config).unwrap();
    fs::write(
        dir.path().join("Visa-2020.csv"),
        "date,name,amount,type\n2020-01-02,A,-10.00,D\n2020-01-01,B,5.00,C\n",
    )
    .unwrap();
    dir
}

fn bill_agg(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bill-agg").unwrap();
    cmd.current_dir(dir).env_remove("BILL_AGG_CONFIG");
    cmd
}

#[test]
fn test_run_exports_sorted_records() {
    let dir = setup(CONFIG);

    bill_agg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Visa-2020.csv"))
        .stdout(predicate::str::contains("Extracting completed."));

    let output = fs::read_to_string(dir.path().join("result.csv")).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Date,Time,Account,Name,Memo,Amount,Type");
    assert_eq!(lines[1], "2020-01-01,00:00:00,Visa,B,,5.00,in");
    assert_eq!(lines[2], "2020-01-02,00:00:00,Visa,A,,-10.00,out");
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = setup(CONFIG);

    bill_agg(dir.path())
        .args(["run", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!dir.path().join("result.csv").exists());
}

#[test]
fn test_check_valid_config() {
    let dir = setup(CONFIG);

    bill_agg(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid."));
}

#[test]
fn test_check_invalid_amount_format() {
    let dir = setup(&CONFIG.replace("SignedColumn", "ThreeColumns"));

    bill_agg(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config Error"));
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();

    bill_agg(dir.path())
        .args(["--conf", "nope.yaml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such file"));
}

#[test]
fn test_bad_file_is_reported_and_run_continues() {
    let dir = setup(CONFIG);
    fs::write(
        dir.path().join("Visa-2021.csv"),
        "date,name,amount\n2021-01-01,C,1.2.3\n",
    )
    .unwrap();

    bill_agg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cannot parse amount"))
        .stdout(predicate::str::contains("(1 error)"));

    let output = fs::read_to_string(dir.path().join("result.csv")).unwrap();
    assert_eq!(output.lines().count(), 3);
}

#[test]
fn test_extract_single_file() {
    let dir = setup(CONFIG);

    bill_agg(dir.path())
        .args(["extract", "Visa-2020.csv", "--account", "Visa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 records extracted."))
        .stdout(predicate::str::contains("-10.00"));
}

#[test]
fn test_json_export_with_log_file() {
    let dir = setup(&CONFIG.replace("export_to: csv", "export_to: json"));

    bill_agg(dir.path())
        .args(["--log-file", "run.log"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("result.json")).unwrap())
            .unwrap();
    assert_eq!(json["record_count"], 2);
    assert_eq!(json["records"][0]["Name"], "B");

    let log = fs::read_to_string(dir.path().join("run.log")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("\"account\":\"Visa\""));
}

#[test]
fn test_xlsx_export_with_table_style() {
    let dir = setup(&CONFIG.replace(
        "export_to: csv\n",
        "export_to: xlsx\nexport_config:\n  font_size: 10\n  table_style: Table Style Medium 2\n  columns:\n    - header: Amount\n      data: {type: extracted_field, field: amount}\n      style: {width: 14, number_format: \"0.00\"}\n",
    ));

    bill_agg(dir.path()).assert().success();

    let workbook = fs::read(dir.path().join("result.xlsx")).unwrap();
    assert!(workbook.starts_with(b"PK"));
}

#[test]
fn test_check_rejects_unknown_table_style() {
    let dir = setup(&CONFIG.replace(
        "export_to: csv\n",
        "export_to: xlsx\nexport_config:\n  table_style: Table Style Glossy 1\n",
    ));

    bill_agg(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid table_style"));
}
