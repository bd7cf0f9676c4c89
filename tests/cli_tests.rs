//! Integration tests for the command-line binaries.

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn top_customers() -> Command {
    cargo_bin_cmd!("top_customers")
}

fn analytics() -> Command {
    cargo_bin_cmd!("datafun-analytics")
}

fn sales_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "customer_id,amount,sale_date\nC1,10,2024-01-01\nC1,5,2024-01-02\nC2,20,2024-01-01\n"
    )
    .unwrap();
    file
}

#[test]
fn test_top_customers_limit_one() {
    let sales = sales_file();

    top_customers()
        .args([
            "--input",
            sales.path().to_str().unwrap(),
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-03",
            "--limit",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("C2").and(predicate::str::contains("20.00")))
        .stdout(predicate::str::contains("C1").not());
}

#[test]
fn test_top_customers_writes_csv_and_explains() {
    let sales = sales_file();
    let out_dir = TempDir::new().unwrap();
    let out = out_dir.path().join("top.csv");

    top_customers()
        .args([
            "--input",
            sales.path().to_str().unwrap(),
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-03",
            "--output",
            out.to_str().unwrap(),
            "--explain",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("GROUP BY customer_id"));

    let table = std::fs::read_to_string(out).unwrap();
    assert_eq!(table, "customer_id,total_spend\nC2,20.00\nC1,15.00\n");
}

#[test]
fn test_top_customers_negative_limit_is_empty() {
    let sales = sales_file();

    top_customers()
        .args([
            "--input",
            sales.path().to_str().unwrap(),
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-03",
            "--limit",
            "-1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sales in range."));
}

#[test]
fn test_top_customers_reversed_range_is_empty() {
    let sales = sales_file();

    top_customers()
        .args([
            "--input",
            sales.path().to_str().unwrap(),
            "--start",
            "2024-02-01",
            "--end",
            "2024-01-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sales in range."))
        .stderr(predicate::str::contains("contains no dates"));
}

#[test]
fn test_top_customers_rejects_malformed_dates() {
    let sales = sales_file();

    top_customers()
        .args([
            "--input",
            sales.path().to_str().unwrap(),
            "--start",
            "01/02/2024",
            "--end",
            "2024-01-03",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_analytics_dry_run_lists_plan() {
    analytics()
        .args(["--dry-run", "--only", "text,sales", "--raw-dir", "somewhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("somewhere/romeo_and_juliet.txt"))
        .stdout(predicate::str::contains("somewhere/sales.csv"))
        .stdout(predicate::str::contains("CSV:").not());
}

#[test]
fn test_analytics_runs_selected_pipeline() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw");
    let processed = dir.path().join("processed");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::write(raw.join("romeo_and_juliet.txt"), "But soft\n").unwrap();

    analytics()
        .args([
            "--only",
            "text",
            "--raw-dir",
            raw.to_str().unwrap(),
            "--processed-dir",
            processed.to_str().unwrap(),
        ])
        .assert()
        .success();

    let report = std::fs::read_to_string(processed.join("txt_summary.txt")).unwrap();
    assert_eq!(report, "Text File Summary\nLines: 1\nWords: 2\nCharacters: 9\n");
}

#[test]
fn test_analytics_json_logs_keep_stdout_for_the_summary() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::write(raw.join("romeo_and_juliet.txt"), "But soft\n").unwrap();

    analytics()
        .args([
            "--only",
            "text",
            "--json-logs",
            "--raw-dir",
            raw.to_str().unwrap(),
            "--processed-dir",
            dir.path().join("processed").to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("✅ TXT"))
        .stdout(predicate::str::contains("\"level\"").not())
        .stderr(predicate::str::contains("\"level\":\"INFO\""));
}

#[test]
fn test_analytics_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    analytics()
        .args([
            "--only",
            "json",
            "--raw-dir",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("astros.json"));
}
