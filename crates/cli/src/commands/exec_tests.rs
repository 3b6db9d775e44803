// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jx_runbook::load_runbook;

const RUNBOOK: &str = r#"
[job.ok]
run = "echo ok >> log.txt"

[job.fail]
run = "echo fail >> log.txt; exit 1"

[job.greet]
run = "echo hello {times} >> log.txt"
[job.greet.params]
times = { type = "long", default = 1 }
"#;

fn setup() -> (tempfile::TempDir, Runbook) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jx.toml");
    std::fs::write(&path, RUNBOOK).unwrap();
    let runbook = load_runbook(&path).unwrap();
    (dir, runbook)
}

fn log(dir: &tempfile::TempDir) -> String {
    std::fs::read_to_string(dir.path().join("log.txt")).unwrap_or_default()
}

fn args(jobs: &[&str], serial: bool, params: &[(&str, &str)]) -> ExecArgs {
    ExecArgs {
        jobs: jobs.iter().map(|j| j.to_string()).collect(),
        serial,
        params: params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[test]
fn parse_key_val_splits_on_first_equals() {
    assert_eq!(
        parse_key_val("query=a=b").unwrap(),
        ("query".to_string(), "a=b".to_string())
    );
    assert!(parse_key_val("novalue").is_err());
}

#[tokio::test]
async fn unknown_job_fails_before_running_anything() {
    let (dir, runbook) = setup();

    let err = handle(args(&["ok", "nope"], false, &[]), &runbook)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("unknown job: nope"));
    assert_eq!(log(&dir), "");
}

#[tokio::test]
async fn serial_stops_after_failure() {
    let (dir, runbook) = setup();

    let succeeded = handle(args(&["ok", "fail", "greet"], true, &[]), &runbook)
        .await
        .unwrap();

    assert!(!succeeded);
    assert_eq!(log(&dir), "ok\nfail\n");
}

#[tokio::test]
async fn parallel_runs_every_job() {
    let (dir, runbook) = setup();

    let succeeded = handle(args(&["fail", "ok"], false, &[]), &runbook)
        .await
        .unwrap();

    assert!(!succeeded);
    let log = log(&dir);
    assert!(log.contains("ok\n"));
    assert!(log.contains("fail\n"));
}

#[tokio::test]
async fn params_are_converted() {
    let (dir, runbook) = setup();

    let succeeded = handle(args(&["greet"], false, &[("times", "4")]), &runbook)
        .await
        .unwrap();

    assert!(succeeded);
    assert_eq!(log(&dir), "hello 4\n");
}

#[tokio::test]
async fn badly_typed_param_is_an_error() {
    let (dir, runbook) = setup();

    assert!(handle(args(&["greet"], false, &[("times", "many")]), &runbook)
        .await
        .is_err());
    assert_eq!(log(&dir), "");
}
