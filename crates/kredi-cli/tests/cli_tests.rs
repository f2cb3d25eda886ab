use assert_cmd::prelude::*;
use predicates::prelude::*;
use rust_decimal::Decimal;
use std::process::Command;

fn kredi() -> Command {
    Command::cargo_bin("kredi").unwrap()
}

fn plan_args(cmd: &mut Command) -> &mut Command {
    cmd.args([
        "plan",
        "--principal",
        "120000",
        "--annual-rate",
        "0.12",
        "--term",
        "12",
        "--start-date",
        "2024-01-15",
        "--bsmv-rate",
        "0",
    ])
}

#[test]
fn test_plan_equal_installment_json() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = kredi();
    plan_args(&mut cmd).args(["--scheme", "equal-installment"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output)?;

    assert_eq!(value["result"]["level_installment"], "10661.85");
    let rows = value["result"]["installments"].as_array().unwrap();
    assert_eq!(rows.len(), 12);
    let remaining: Decimal = rows[11]["remaining_principal"].as_str().unwrap().parse()?;
    assert_eq!(remaining, Decimal::ZERO);

    Ok(())
}

#[test]
fn test_plan_monthly_rate_matches_annual() -> Result<(), Box<dyn std::error::Error>> {
    kredi()
        .args([
            "plan",
            "--principal",
            "120000",
            "--monthly-rate",
            "0.01",
            "--term",
            "12",
            "--start-date",
            "2024-01-15",
            "--bsmv-rate",
            "0",
            "--scheme",
            "equal-installment",
            "--output",
            "minimal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("10661.85\n"));

    Ok(())
}

#[test]
fn test_invalid_principal_exits_with_error_and_writes_no_export() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let sheet = dir.path().join("plan.csv");

    kredi()
        .args([
            "plan",
            "--principal",
            "-5",
            "--annual-rate",
            "0.12",
            "--term",
            "12",
            "--start-date",
            "2024-01-15",
            "--spreadsheet",
        ])
        .arg(&sheet)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("principal"));

    assert!(!sheet.exists());
    Ok(())
}

#[test]
fn test_spreadsheet_and_document_exports() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let sheet = dir.path().join("plan.csv");
    let doc = dir.path().join("plan.txt");

    let mut cmd = kredi();
    plan_args(&mut cmd)
        .arg("--spreadsheet")
        .arg(&sheet)
        .arg("--document")
        .arg(&doc)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&sheet)?;
    assert!(csv.contains("Taksit No"));
    assert!(csv.contains("Toplam:"));

    let text = std::fs::read_to_string(&doc)?;
    assert!(text.contains("Ticari Kredi Ödeme Planı"));
    assert!(text.contains("Eşit Ana Paralı Kredi"));

    Ok(())
}

#[test]
fn test_spreadsheet_defaults_to_xlsx_workbook() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let sheet = dir.path().join("plan.xlsx");

    let mut cmd = kredi();
    plan_args(&mut cmd)
        .args(["--commission-rate", "0.01"])
        .arg("--spreadsheet")
        .arg(&sheet)
        .assert()
        .success();

    let bytes = std::fs::read(&sheet)?;
    assert!(bytes.starts_with(b"PK"));
    Ok(())
}

#[test]
fn test_pdf_with_missing_font_is_a_warning() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let doc = dir.path().join("plan.pdf");

    let mut cmd = kredi();
    plan_args(&mut cmd)
        .arg("--document")
        .arg(&doc)
        .arg("--font-dir")
        .arg(dir.path().join("no-fonts"))
        .assert()
        .success()
        .stdout(predicate::str::contains("installments"))
        .stderr(predicate::str::contains("warning").and(predicate::str::contains("document")));

    assert!(!doc.exists());
    Ok(())
}

#[test]
fn test_export_failure_is_a_warning() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let unwritable = dir.path().join("missing").join("plan.csv");

    let mut cmd = kredi();
    plan_args(&mut cmd)
        .arg("--spreadsheet")
        .arg(&unwritable)
        .assert()
        .success()
        .stdout(predicate::str::contains("installments"))
        .stderr(predicate::str::contains("warning"));

    Ok(())
}

#[test]
fn test_plan_from_yaml_input() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("request.yaml");
    std::fs::write(
        &path,
        "principal: \"50000\"\nannual_rate: \"0.24\"\nterm: 6\nscheme: equal_principal\nstart_date: 2024-03-01\nfrequency: monthly\n",
    )?;

    kredi()
        .args(["plan", "--output", "csv", "--input"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("installment_number"))
        .stdout(predicate::str::contains("principal_payment"));

    Ok(())
}

#[test]
fn test_calendar_rolls_weekend_payment() -> Result<(), Box<dyn std::error::Error>> {
    // 2024-06-15 is a Saturday; the first payment lands on Monday 2024-06-17.
    let output = kredi()
        .args([
            "calendar",
            "--term",
            "3",
            "--start-date",
            "2024-05-15",
            "--holidays",
            "weekends-only",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output)?;

    let entries = value["result"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["scheduled_date"], "2024-06-15");
    assert_eq!(entries[0]["payment_date"], "2024-06-17");

    Ok(())
}

#[test]
fn test_calendar_reads_piped_request() -> Result<(), Box<dyn std::error::Error>> {
    let output = assert_cmd::Command::cargo_bin("kredi")?
        .arg("calendar")
        .write_stdin(r#"{"start_date": "2024-05-15", "installments": 2, "holidays": "weekends_only"}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output)?;

    let entries = value["result"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["payment_date"], "2024-06-17");

    Ok(())
}

#[test]
fn test_calendar_term_flag_skips_stdin() -> Result<(), Box<dyn std::error::Error>> {
    // Same precedence as `plan`: explicit flags mean stdin is never read
    let output = assert_cmd::Command::cargo_bin("kredi")?
        .args(["calendar", "--term", "4", "--start-date", "2024-05-15"])
        .write_stdin(r#"{"start_date": "2024-05-15", "installments": 2}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output)?;

    assert_eq!(value["result"].as_array().unwrap().len(), 4);
    Ok(())
}

#[test]
fn test_minimal_installment_includes_amortized_commission() {
    kredi()
        .args([
            "plan",
            "--principal",
            "100000",
            "--annual-rate",
            "0.30",
            "--term",
            "12",
            "--start-date",
            "2025-01-15",
            "--scheme",
            "equal-installment",
            "--commission-rate",
            "0.012",
            "--commission-mode",
            "amortized",
            "--output",
            "minimal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("9927.64\n"));
}

#[test]
fn test_version() {
    kredi()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("kredi "));
}
