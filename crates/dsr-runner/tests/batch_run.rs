//! Integration tests for batch submission.
//!
//! These tests load a spreadsheet export from disk, run it through the mock
//! form driver and check the written report.

use dsr_browser::{DriverAction, MockFormDriver};
use dsr_core::{DsrConfig, MatchMethod, RequestCategory, SubOption};
use dsr_runner::{FormRunner, JsonRecordSource, RecordOutcome, RecordSource, RunReport, RunnerOptions};
use tempfile::TempDir;

const EXPORT: &str = r#"[
    {
        "Request_type": "request to delete my data",
        "First_name": "Ada",
        "Last_name": "Lovelace",
        "Email": "ada@example.com",
        "Birth_date": "2012-03-15T00:00:00",
        "delete_student": "Student data (if any)",
        "delete_parent": "",
        "delete_educator": "Educator data (if any)"
    },
    {
        "Request_type": "Remove my parent's cc information",
        "Email": "grace@example.com",
        "Birth_date": "03/15/2012",
        "delete_student": "yes"
    },
    {
        "Request_type": null,
        "Email": "nobody@example.com"
    },
    {
        "Request_type": "Close/deactivate/cancel my College Board account",
        "close_student": "Y",
        "close_educator": "nan"
    }
]"#;

fn write_export(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("records.json");
    std::fs::write(&path, EXPORT).unwrap();
    path
}

#[tokio::test]
async fn test_batch_run_from_export() {
    let temp = TempDir::new().unwrap();
    let records = JsonRecordSource::new(write_export(&temp)).records().unwrap();
    assert_eq!(records.len(), 4);

    let mut config = DsrConfig::default();
    config.output.screenshot_dir = Some(temp.path().join("shots"));
    let runner = FormRunner::new(MockFormDriver::new(), RunnerOptions::from_config(&config));

    let report = runner.run(&records).await;
    let summary = report.summary();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.submitted, 3);
    assert_eq!(summary.skipped, 1);

    let delete = &report.results[0];
    assert_eq!(delete.plan.classification.category, RequestCategory::Delete);
    assert!(delete.plan.options[&SubOption::StudentData]);
    assert!(!delete.plan.options[&SubOption::ParentData]);
    assert!(delete.plan.options[&SubOption::EducatorData]);
    assert!(delete.screenshot.as_ref().unwrap().exists());

    let parent_cc = &report.results[1];
    assert_eq!(parent_cc.plan.classification.method, MatchMethod::Exact);
    assert_eq!(
        parent_cc.plan.classification.category,
        RequestCategory::RemoveParentCC
    );
    assert!(parent_cc.plan.options.is_empty());

    assert!(matches!(
        report.results[2].outcome,
        RecordOutcome::Skipped { .. }
    ));
    assert!(report.results[2].screenshot.is_none());

    let close = &report.results[3];
    assert_eq!(close.plan.classification.category, RequestCategory::CloseAccount);
    assert_eq!(close.plan.selected_labels(), vec!["Student account (if any)"]);

    let submits = runner
        .driver()
        .actions()
        .into_iter()
        .filter(|a| *a == DriverAction::Submit)
        .count();
    assert_eq!(submits, 3);
}

#[tokio::test]
async fn test_report_written_and_reloaded() {
    let temp = TempDir::new().unwrap();
    let records = JsonRecordSource::new(write_export(&temp)).records().unwrap();

    let options = RunnerOptions::from_config(&DsrConfig::default()).dry_run(true);
    let runner = FormRunner::new(MockFormDriver::new(), options);
    let report = runner.run(&records).await;

    let path = temp.path().join("report.json");
    report.write_json(&path).unwrap();

    let loaded = RunReport::load_json(&path).unwrap();
    assert!(loaded.dry_run);
    assert_eq!(loaded.summary().planned, 3);
    assert_eq!(loaded.summary().skipped, 1);
    assert_eq!(
        loaded.results[0].plan.fields.values().cloned().collect::<Vec<_>>(),
        vec!["Ada", "Lovelace", "ada@example.com", "3/15/2012"]
    );
}
