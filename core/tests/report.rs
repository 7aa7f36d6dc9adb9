//! End-to-end report runs: output file, stdout, and failure behaviour.

use std::fs;
use std::time::Duration;

use trip_report_core::{
    error::ReportError,
    report,
    retry::RetryPolicy,
    store::SqliteTripStore,
    summary::{persist_and_emit, STDOUT_HEADER},
};

const NO_WAIT: RetryPolicy = RetryPolicy {
    max_attempts: 3,
    delay: Duration::ZERO,
};

fn seeded() -> Result<SqliteTripStore, ReportError> {
    let store = SqliteTripStore::in_memory()?;
    store.prepare_fixture()?;
    Ok(store)
}

#[test]
fn writes_file_and_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("summary.json");
    let mut stdout = Vec::new();

    let summary = report::generate(&NO_WAIT, seeded, 3, &path, &mut stdout).unwrap();
    assert_eq!(summary.total_trips, 6);

    let file = fs::read_to_string(&path).unwrap();
    let printed = String::from_utf8(stdout).unwrap();
    assert_eq!(printed, format!("{STDOUT_HEADER}\n{file}\n"));

    let parsed: serde_json::Value = serde_json::from_str(&file).unwrap();
    assert_eq!(parsed["total_trips"], 6);
    assert_eq!(parsed["top_by_minutes"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["top_by_minutes"][0]["city"], "San Francisco");
}

#[test]
fn rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");

    report::generate(&NO_WAIT, seeded, 5, &path, &mut Vec::new()).unwrap();
    let first = fs::read(&path).unwrap();
    // Directory already exists on the second run.
    report::generate(&NO_WAIT, seeded, 5, &path, &mut Vec::new()).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn unreachable_store_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("summary.json");
    let mut stdout = Vec::new();
    let mut calls = 0;

    let err = report::generate(
        &NO_WAIT,
        || {
            calls += 1;
            Err::<SqliteTripStore, _>(ReportError::Other(anyhow::anyhow!("no route to host")))
        },
        5,
        &path,
        &mut stdout,
    )
    .unwrap_err();

    assert!(matches!(err, ReportError::ConnectRetriesExhausted { attempts: 3, .. }));
    assert_eq!(calls, 3);
    assert!(!path.exists());
    assert!(stdout.is_empty());
}

#[test]
fn unreachable_store_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");
    fs::write(&path, "previous").unwrap();

    let result = report::generate(
        &NO_WAIT,
        || Err::<SqliteTripStore, _>(ReportError::Other(anyhow::anyhow!("refused"))),
        5,
        &path,
        &mut Vec::new(),
    );

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
}

#[test]
fn query_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");

    // No migration: the trips table is missing.
    let result = report::generate(&NO_WAIT, SqliteTripStore::in_memory, 5, &path, &mut Vec::new());

    assert!(matches!(result, Err(ReportError::Sqlite(_))));
    assert!(!path.exists());
}

#[test]
fn persist_into_existing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");
    let mut store = seeded().unwrap();
    let summary = trip_report_core::summary::compute_summary(&mut store, 2).unwrap();

    persist_and_emit(&summary, &path, &mut Vec::new()).unwrap();
    persist_and_emit(&summary, &path, &mut Vec::new()).unwrap();
    assert!(path.exists());
}
