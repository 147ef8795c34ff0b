//! Binary smoke tests against a throwaway data directory

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const BIN_NAME: &str = "ledgerlens";

fn ledgerlens(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("LEDGERLENS_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG")
        .env("LEDGERLENS_TODAY", "2025-03-20");
    cmd
}

fn seed(data_dir: &TempDir) {
    ledgerlens(data_dir).arg("init").assert().success();
    ledgerlens(data_dir)
        .args(["record", "add", "10000", "--kind", "income", "--date", "2025-03-10"])
        .args(["--status", "paid", "--category", "Consulting"])
        .assert()
        .success()
        .stdout(contains("Added record"));
    ledgerlens(data_dir)
        .args(["record", "add", "4000", "--kind", "expense", "--date", "2025-03-12"])
        .args(["--category", "Payroll", "-m", "March payroll"])
        .assert()
        .success();
}

#[test]
fn init_writes_config() {
    let dir = TempDir::new().unwrap();
    ledgerlens(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete!"));
    assert!(dir.path().join("config.json").exists());

    ledgerlens(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("business-default").and(contains("Initialized:    yes")));
}

#[test]
fn period_resolves_against_today_override() {
    let dir = TempDir::new().unwrap();
    ledgerlens(&dir)
        .args(["period", "--period", "last-month"])
        .assert()
        .success()
        .stdout(contains("2025-02-01..2025-02-28"));
}

#[test]
fn unknown_period_fails() {
    let dir = TempDir::new().unwrap();
    ledgerlens(&dir)
        .args(["period", "--period", "fortnight"])
        .assert()
        .failure()
        .stderr(contains("Unknown period"));
}

#[test]
fn records_can_be_listed_and_exported() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    ledgerlens(&dir)
        .args(["record", "list", "--from", "2025-03-01", "--to", "2025-03-31"])
        .assert()
        .success()
        .stdout(contains("+10000.00").and(contains("2 record(s)")));

    ledgerlens(&dir)
        .args(["record", "list", "--kind", "expense", "--csv"])
        .assert()
        .success()
        .stdout(contains("2025-03-12,expense,4000.00,Payroll,,March payroll"));
}

#[test]
fn import_skips_duplicates() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("bank.csv");
    std::fs::write(
        &csv_path,
        "Date,Description,Amount\n2025-03-01,Client payment,1200.00\n2025-03-02,Rent,-800.00\nnot-a-date,Broken,1.00\n",
    )
    .unwrap();

    ledgerlens(&dir)
        .args(["record", "import"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("Imported:    2").and(contains("Row 3")));

    ledgerlens(&dir)
        .args(["record", "import"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("Imported:    0").and(contains("Skipped:     2")));
}

#[test]
fn import_honours_delimiter() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("semicolon.csv");
    std::fs::write(&csv_path, "Date;Description;Amount\n2025-03-05;Invoice 7;250.00\n").unwrap();

    ledgerlens(&dir)
        .args(["record", "import", "--delimiter", ";"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("Imported:    1"));

    ledgerlens(&dir)
        .args(["record", "list", "--from", "2025-03-01", "--to", "2025-03-31"])
        .assert()
        .success()
        .stdout(contains("+250.00"));
}

#[test]
fn tax_compute_uses_default_schedule() {
    let dir = TempDir::new().unwrap();
    ledgerlens(&dir)
        .args(["tax", "compute", "1500000"])
        .assert()
        .success()
        .stdout(contains("Liability:      60000.00").and(contains("4.0%")));

    ledgerlens(&dir)
        .args(["tax", "compute", "400000", "--mode", "quarterly"])
        .assert()
        .success()
        .stdout(contains("Estimate:  25000.00"));
}

#[test]
fn tax_estimate_rejects_bad_rate() {
    let dir = TempDir::new().unwrap();
    ledgerlens(&dir)
        .args(["tax", "estimate", "1000", "--rate", "1.5"])
        .assert()
        .failure()
        .stderr(contains("outside [0, 1]"));
}

#[test]
fn trend_rejects_oversized_count() {
    let dir = TempDir::new().unwrap();
    ledgerlens(&dir)
        .args(["report", "trend", "--count", "4294967298"])
        .assert()
        .failure()
        .stderr(contains("--count must be between 1 and 1200"));

    ledgerlens(&dir)
        .args(["report", "trend", "--count", "3"])
        .assert()
        .success()
        .stdout(contains("Jan 2025").and(contains("Mar 2025")));
}

#[test]
fn period_accepts_year_month_and_quarter() {
    let dir = TempDir::new().unwrap();
    ledgerlens(&dir)
        .args(["period", "--period", "2024-Q3"])
        .assert()
        .success()
        .stdout(contains("2024-07-01..2024-09-30"));
    ledgerlens(&dir)
        .args(["period", "--period", "2025-02"])
        .assert()
        .success()
        .stdout(contains("2025-02-01..2025-02-28"));
}

#[test]
fn metrics_report_exports_csv() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    ledgerlens(&dir)
        .args(["report", "metrics", "--format", "csv"])
        .assert()
        .success()
        .stdout(contains("2025-03-01..2025-03-31,summary,revenue,10000.00"));
}

#[test]
fn budget_report_shows_progress() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    ledgerlens(&dir)
        .args(["budget", "add", "Payroll", "5000"])
        .assert()
        .success();
    ledgerlens(&dir)
        .args(["report", "budgets"])
        .assert()
        .success()
        .stdout(contains("Payroll").and(contains("80.0%")));
}

#[test]
fn tax_report_exports_json_envelope() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let out = dir.path().join("tax.json");

    ledgerlens(&dir)
        .args(["report", "tax", "--year", "2025", "--format", "json", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Report exported to"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["report_type"], "tax");
    assert_eq!(value["schema_version"], "1.0.0");
    assert_eq!(value["report"]["taxable_income"], 600_000);
}

#[test]
fn goals_track_contributions() {
    let dir = TempDir::new().unwrap();
    ledgerlens(&dir)
        .args(["goal", "add", "Laptop", "2000", "--by", "2025-06-30"])
        .assert()
        .success();
    ledgerlens(&dir)
        .args(["goal", "contribute", "laptop", "500"])
        .assert()
        .success()
        .stdout(contains("25.0%"));
    ledgerlens(&dir)
        .args(["report", "savings"])
        .assert()
        .success()
        .stdout(contains("Laptop").and(contains("102d")));
}
