//! Dependency graph specs
//!
//! Verify dependencies run first and a failed batch stops later ones.

use crate::prelude::*;

const GRAPH_RUNBOOK: &str = r#"
[job.prepare]
run = "echo prepare >> log.txt"

[job.build]
run = "echo build {target} >> log.txt"
depends_on = ["prepare"]
[job.build.params]
target = { type = "string", default = "debug" }

[job.broken]
run = "exit 4"

[job.publish]
run = "echo publish >> log.txt"

[graph.release]
type = "group"
[graph.release.jobs.build]
params = { target = "release" }
[graph.release.jobs.publish]
depends_on = ["build"]

[graph.doomed]
type = "group"
[graph.doomed.jobs.broken]
[graph.doomed.jobs.publish]
depends_on = ["broken"]
"#;

#[test]
fn dependencies_run_first() {
    let temp = Project::with_runbook(GRAPH_RUNBOOK);

    temp.jx()
        .args(&["exec", "build"])
        .passes()
        .stdout_eq("build: success\n");

    assert_eq!(temp.read("log.txt"), "prepare\nbuild debug\n");
}

#[test]
fn group_runs_in_dependency_order_with_overrides() {
    let temp = Project::with_runbook(GRAPH_RUNBOOK);

    temp.jx().args(&["exec", "release"]).passes();

    assert_eq!(temp.read("log.txt"), "prepare\nbuild release\npublish\n");
}

#[test]
fn failed_batch_stops_the_group() {
    let temp = Project::with_runbook(GRAPH_RUNBOOK);

    temp.jx()
        .args(&["exec", "doomed"])
        .fails()
        .stdout_has("doomed: failure: exited with status 4");

    assert_eq!(temp.read("log.txt"), "");
}
