//! Serial execution specs
//!
//! Verify `--serial` runs jobs in order and stops at the first failure.

use crate::prelude::*;

#[test]
fn serial_runs_jobs_in_order() {
    let temp = Project::with_runbook(MINIMAL_RUNBOOK);

    temp.jx()
        .args(&["exec", "--serial", "ok", "other"])
        .passes()
        .stdout_eq("ok: success\nother: success\n");

    assert_eq!(temp.read("log.txt"), "ok\nother\n");
}

#[test]
fn serial_aborts_remaining_jobs_after_failure() {
    let temp = Project::with_runbook(MINIMAL_RUNBOOK);

    temp.jx()
        .args(&["exec", "--serial", "ok", "fail", "other"])
        .fails()
        .stdout_has("fail: failure: exited with status 1")
        .stdout_has("other: not started");

    assert_eq!(temp.read("log.txt"), "ok\nfail\n");
}
