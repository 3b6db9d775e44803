//! `jx list` specs

use crate::prelude::*;

const RUNBOOK: &str = r#"
[job.fetch]
run = "curl {url}"
[job.fetch.params]
url = { type = "string" }

[graph.nightly.jobs.fetch]
params = { url = "https://example.test" }

[trigger.poll]
job = "nightly"
fixed_delay = "30s"
"#;

#[test]
fn list_shows_jobs_graphs_and_triggers() {
    let temp = Project::with_runbook(RUNBOOK);

    temp.jx()
        .args(&["list"])
        .passes()
        .stdout_has("JOBS")
        .stdout_has("url:string")
        .stdout_has("GRAPHS")
        .stdout_has("nightly")
        .stdout_has("TRIGGERS")
        .stdout_has("30s after each run");
}

#[test]
fn list_json_is_machine_readable() {
    let temp = Project::with_runbook(RUNBOOK);

    let output = temp.jx().args(&["list", "--output", "json"]).passes();
    let json: serde_json::Value = serde_json::from_str(output.stdout()).unwrap();

    assert_eq!(json["jobs"][0]["name"], "fetch");
    assert_eq!(json["graphs"][0]["kind"], "group");
    assert_eq!(json["triggers"][0]["name"], "poll");
}

#[test]
fn list_empty_runbook() {
    let temp = Project::with_runbook("");

    temp.jx().args(&["list"]).passes().stdout_eq("No jobs\n");
}
