//! Integration tests for the batch pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;

use hcn_cli::pipeline::{RunConfig, run_pipeline};
use hcn_model::columns::RAW_COLUMNS;
use hcn_transform::NormalizeOptions;

fn row(visit: usize, doctor: &str, visited: &str) -> String {
    RAW_COLUMNS
        .iter()
        .map(|name| match *name {
            "doctor_name" => doctor.to_string(),
            "doctor_title" => "MD".to_string(),
            "doctor_department" => "General".to_string(),
            "patient_id" => format!("P{}", visit % 2),
            "visit_datetime" => visited.to_string(),
            other => format!("{other}-{visit}"),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn write_input(dir: &Path) -> PathBuf {
    let path = dir.join("legacy_healthcare_data.csv");
    let mut content = RAW_COLUMNS.join(",");
    content.push('\n');
    for line in [
        row(0, "Dr. Lee", "2021-04-01 10:00:00"),
        row(1, "Dr. Lee", "2022-02-01 10:00:00"),
        row(2, "Dr. Ahn", "2021-11-30 16:15:00"),
    ] {
        content.push_str(&line);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

fn config(dir: &TempDir) -> RunConfig {
    let input = write_input(dir.path());
    RunConfig::new(input)
        .with_output_dir(dir.path().join("answers"))
        .with_options(NormalizeOptions::default().with_parallel(false))
}

#[test]
fn run_writes_every_table() {
    let dir = TempDir::new().unwrap();
    let result = run_pipeline(&config(&dir)).unwrap();

    assert_eq!(result.raw_records, 3);
    assert!(!result.has_errors);
    assert_eq!(result.tables.len(), 11);
    for summary in &result.tables {
        let path = summary.path.as_ref().expect("table written");
        assert!(path.exists(), "{} missing", path.display());
    }

    let provider = result
        .tables
        .iter()
        .find(|summary| summary.table == "DimProvider")
        .unwrap();
    assert_eq!(provider.records, 2);
    assert_eq!(provider.null_foreign_keys, Some(0));

    let fact = fs::read_to_string(dir.path().join("answers/FactVisit.csv")).unwrap();
    assert_eq!(fact.lines().count(), 4);

    let patients = fs::read_to_string(dir.path().join("answers/DimPatient.csv")).unwrap();
    let lines: Vec<&str> = patients.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("patient_status"));
    // P0 visited in 2021 only; P1 visited in 2022.
    assert!(lines[1].starts_with("P0,") && lines[1].ends_with(",Inactive"));
    assert!(lines[2].starts_with("P1,") && lines[2].ends_with(",Active"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let result = run_pipeline(&config(&dir).with_dry_run(true)).unwrap();

    assert!(result.dry_run);
    assert!(result.validation.is_some());
    assert!(result.tables.iter().all(|summary| summary.path.is_none()));
    assert!(!dir.path().join("answers").exists());
}

#[test]
fn active_after_moves_the_cutoff() {
    let dir = TempDir::new().unwrap();
    let options = NormalizeOptions::default()
        .with_parallel(false)
        .with_activity_cutoff(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    run_pipeline(&config(&dir).with_options(options)).unwrap();

    let patients = fs::read_to_string(dir.path().join("answers/DimPatient.csv")).unwrap();
    assert!(patients.lines().skip(1).all(|line| line.ends_with(",Active")));
}

#[test]
fn report_json_is_written() {
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("report.json");
    let result =
        run_pipeline(&config(&dir).with_report_json(Some(report_path.clone()))).unwrap();

    assert_eq!(result.report_json.as_deref(), Some(report_path.as_path()));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["fact_rows"], 3);
    assert_eq!(json["raw_rows"], 3);
    assert_eq!(json["coverage"].as_array().unwrap().len(), 10);
}

#[test]
fn skipped_validation_writes_no_report() {
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("report.json");
    let result = run_pipeline(
        &config(&dir)
            .with_validation(false)
            .with_report_json(Some(report_path.clone())),
    )
    .unwrap();

    assert!(result.validation.is_none());
    assert!(result.report_json.is_none());
    assert!(!report_path.exists());
}

#[test]
fn missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = RunConfig::new(dir.path().join("absent.csv"))
        .with_output_dir(dir.path().join("answers"));
    let error = run_pipeline(&config).unwrap_err();
    assert!(format!("{error:#}").contains("absent.csv"));
}
