//! Parallel execution specs
//!
//! Jobs named together run concurrently by default.

use crate::prelude::*;

#[test]
fn parallel_failure_does_not_stop_siblings() {
    let temp = Project::with_runbook(MINIMAL_RUNBOOK);

    temp.jx()
        .args(&["exec", "fail", "ok", "other"])
        .fails()
        .stdout_has("fail: failure")
        .stdout_has("ok: success")
        .stdout_has("other: success");

    let log = temp.read("log.txt");
    for line in ["ok", "other", "fail"] {
        assert!(log.lines().any(|l| l == line), "{line} missing from {log:?}");
    }
}

#[test]
fn params_reach_the_command() {
    let temp = Project::with_runbook(
        r#"
[job.greet]
run = "echo {greeting} {count} > out.txt"
[job.greet.params]
greeting = { type = "string", default = "hi" }
count = { type = "long" }
"#,
    );

    temp.jx()
        .args(&["exec", "greet", "-p", "count=2", "-p", "greeting=hello there"])
        .passes();

    assert_eq!(temp.read("out.txt"), "hello there 2\n");
}

#[test]
fn badly_typed_param_fails() {
    let temp = Project::with_runbook(
        r#"
[job.greet]
run = "echo {count} > out.txt"
[job.greet.params]
count = { type = "long" }
"#,
    );

    temp.jx()
        .args(&["exec", "greet", "-p", "count=two"])
        .fails()
        .stderr_has("invalid value 'two' for long parameter 'count'");

    assert_eq!(temp.read("out.txt"), "");
}
