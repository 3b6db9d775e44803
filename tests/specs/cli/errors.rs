//! CLI error specs
//!
//! Verify bad input fails with a clear message and exit code 1.

use crate::prelude::*;

#[test]
fn unknown_job_fails_before_anything_runs() {
    let temp = Project::with_runbook(MINIMAL_RUNBOOK);

    temp.jx()
        .args(&["exec", "ok", "missing"])
        .fails()
        .stderr_has("unknown job: missing");

    assert_eq!(temp.read("log.txt"), "");
}

#[test]
fn missing_runbook_suggests_config_flag() {
    let temp = Project::empty();

    temp.jx()
        .args(&["list"])
        .fails()
        .stderr_has("runbook not found: jx.toml")
        .stderr_has("--config");
}

#[test]
fn invalid_runbook_names_the_problem() {
    let temp = Project::with_runbook(
        r#"
[job.a]
run = "true"
depends_on = ["b"]

[job.b]
run = "true"
depends_on = ["a"]
"#,
    );

    temp.jx()
        .args(&["list"])
        .fails()
        .stderr_has("dependency cycle: a -> b -> a");
}

#[test]
fn trigger_without_schedule_is_rejected() {
    let temp = Project::with_runbook(
        r#"
[job.a]
run = "true"

[trigger.t]
job = "a"
"#,
    );

    temp.jx()
        .args(&["list"])
        .fails()
        .stderr_has("trigger 't': exactly one of cron, fixed_rate, fixed_delay is required");
}

#[test]
fn config_flag_selects_runbook() {
    let temp = Project::empty();
    temp.file("conf/other.toml", MINIMAL_RUNBOOK);

    temp.jx()
        .args(&["--config", "conf/other.toml", "exec", "ok"])
        .passes()
        .stdout_has("ok: success");

    // jobs run next to the runbook file
    assert_eq!(temp.read("conf/log.txt"), "ok\n");
}
