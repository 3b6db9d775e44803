// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jx_core::ParamValue;
use yare::parameterized;

const SAMPLE_RUNBOOK: &str = r#"
[scheduler]
threads = 2
graph_threads = 3

[job.prepare]
run = "mkdir -p out"

[job.fetch]
run = "curl -o {out} {url}"
lock = "net"
depends_on = ["prepare"]
workdir = "data"
[job.fetch.params]
url = { type = "string" }
out = { type = "string", default = "page.html" }
retries = { type = "long", default = 3 }

[job.load]
run = "load {day}"
[job.load.params]
day = { type = "date", default = "2024-01-01" }

[graph.nightly]
type = "group"
[graph.nightly.jobs.fetch]
params = { url = "https://example.test" }
[graph.nightly.jobs.load]
depends_on = ["fetch"]

[graph.fetch-alias]
type = "single"
job = "fetch"
params = { retries = 5 }

[trigger.nightly-2am]
job = "nightly"
cron = "0 0 2 * * *"
params = { day = "2024-02-01" }

[trigger.poll]
job = "fetch"
fixed_rate = "10m"
initial_delay = "5s"

[trigger.cleanup]
job = "prepare"
fixed_delay = "30s"
"#;

#[test]
fn parse_sample_runbook() {
    let runbook = parse_runbook(SAMPLE_RUNBOOK).unwrap();

    assert_eq!(runbook.settings.threads, 2);
    assert_eq!(runbook.settings.graph_threads, 3);
    assert_eq!(
        runbook.names(),
        vec!["fetch", "fetch-alias", "load", "nightly", "prepare"]
    );
}

#[test]
fn parse_job_definition() {
    let runbook = parse_runbook(SAMPLE_RUNBOOK).unwrap();
    let fetch = &runbook.jobs["fetch"];

    assert_eq!(fetch.run, "curl -o {out} {url}");
    assert_eq!(fetch.lock.as_deref(), Some("net"));
    assert_eq!(fetch.depends_on, vec!["prepare".to_string()]);
    assert_eq!(fetch.workdir, Some(PathBuf::from("data")));

    let metadata = fetch.metadata();
    let defaults = metadata.default_params();
    assert_eq!(defaults.get("retries"), Some(&ParamValue::Long(3)));
    assert_eq!(defaults.get("out"), Some(&ParamValue::from("page.html")));
    assert!(!defaults.contains_key("url"));
}

#[test]
fn parse_graph_definitions() {
    let runbook = parse_runbook(SAMPLE_RUNBOOK).unwrap();

    let JobNode::Group(nightly) = &runbook.definitions["nightly"] else {
        panic!("nightly should be a group");
    };
    assert_eq!(nightly.jobs.len(), 2);
    let JobNode::Single(load) = &nightly.jobs["load"] else {
        panic!("load should be a single node");
    };
    assert_eq!(load.depends_on, Some(vec!["fetch".to_string()]));

    let JobNode::Single(alias) = &runbook.definitions["fetch-alias"] else {
        panic!("alias should be a single node");
    };
    assert_eq!(alias.job.as_deref(), Some("fetch"));
    assert_eq!(alias.params.get("retries").map(String::as_str), Some("5"));
}

#[test]
fn group_type_inferred_from_jobs() {
    let runbook = parse_runbook(
        r#"
[job.a]
run = "true"
[graph.all.jobs.a]
"#,
    )
    .unwrap();
    assert!(matches!(runbook.definitions["all"], JobNode::Group(_)));
}

#[test]
fn parse_triggers() {
    let runbook = parse_runbook(SAMPLE_RUNBOOK).unwrap();

    let nightly = &runbook.triggers["nightly-2am"];
    assert_eq!(nightly.job, "nightly");
    assert_eq!(nightly.schedule, ScheduleDef::Cron("0 0 2 * * *".to_string()));
    assert_eq!(nightly.params.get("day").map(String::as_str), Some("2024-02-01"));

    let poll = &runbook.triggers["poll"];
    assert_eq!(poll.schedule, ScheduleDef::FixedRate(Duration::from_secs(600)));
    assert_eq!(poll.initial_delay, Duration::from_secs(5));

    let cleanup = &runbook.triggers["cleanup"];
    assert_eq!(cleanup.schedule, ScheduleDef::FixedDelay(Duration::from_secs(30)));
    assert_eq!(cleanup.initial_delay, Duration::ZERO);
}

#[test]
fn empty_runbook_uses_defaults() {
    let runbook = parse_runbook("").unwrap();
    assert_eq!(runbook.settings, SchedulerSettings::default());
    assert!(runbook.names().is_empty());
}

#[parameterized(
    no_schedule = { "job = \"a\"" },
    two_schedules = { "job = \"a\"\ncron = \"* * * * * *\"\nfixed_rate = \"1s\"" },
    cron_with_delay = { "job = \"a\"\ncron = \"* * * * * *\"\ninitial_delay = \"1s\"" },
    bad_cron = { "job = \"a\"\ncron = \"61 * * * * *\"" },
    zero_period = { "job = \"a\"\nfixed_delay = \"0s\"" },
    unknown_job = { "job = \"missing\"\nfixed_rate = \"1s\"" },
    bad_param = { "job = \"a\"\nfixed_rate = \"1s\"\nparams = { n = \"many\" }" },
)]
fn invalid_trigger(body: &str) {
    let content = format!(
        "[job.a]\nrun = \"true\"\n[job.a.params]\nn = {{ type = \"long\" }}\n[trigger.t]\n{}\n",
        body
    );
    let err = parse_runbook(&content).unwrap_err();
    assert!(
        matches!(&err, ParseError::Trigger { name, .. } if name == "t"),
        "unexpected error: {err}"
    );
}

#[test]
fn invalid_default_names_location() {
    let err = parse_runbook(
        r#"
[job.a]
run = "true"
[job.a.params]
n = { type = "long", default = "lots" }
"#,
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("job.a.params.n:"), "{err}");
}

#[test]
fn unknown_param_type_is_rejected() {
    let err = parse_runbook(
        r#"
[job.a]
run = "true"
[job.a.params]
n = { type = "bytes" }
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::Toml(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = parse_runbook("[job.a]\nrun = \"true\"\ncommand = \"x\"\n").unwrap_err();
    assert!(matches!(err, ParseError::Toml(_)));
}

#[test]
fn cycle_is_rejected() {
    let err = parse_runbook(
        r#"
[job.a]
run = "true"
depends_on = ["b"]
[job.b]
run = "true"
depends_on = ["a"]
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::Graph(GraphError::Cycle { .. })));
}

#[test]
fn unknown_dependency_is_rejected() {
    let err = parse_runbook("[job.a]\nrun = \"true\"\ndepends_on = [\"ghost\"]\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid job graph: unknown job: ghost (required by a)"
    );
}

#[parameterized(
    bad_type = { "[graph.g]\ntype = \"batch\"\n" },
    group_with_job = { "[graph.g]\ntype = \"group\"\njob = \"a\"\n" },
    single_with_jobs = { "[graph.g]\ntype = \"single\"\n[graph.g.jobs.a]\n" },
    array_param = { "[graph.g]\njob = \"a\"\nparams = { x = [1, 2] }\n" },
    zero_threads = { "[scheduler]\nthreads = 0\n" },
    empty_run = { "[job.b]\nrun = \"  \"\n" },
)]
fn invalid_format(extra: &str) {
    let content = format!("[job.a]\nrun = \"true\"\n{}", extra);
    let err = parse_runbook(&content).unwrap_err();
    assert!(matches!(err, ParseError::InvalidFormat(_)), "unexpected error: {err}");
}

#[test]
fn load_runbook_sets_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jx.toml");
    std::fs::write(&path, "[job.a]\nrun = \"true\"\n").unwrap();

    let runbook = load_runbook(&path).unwrap();
    assert_eq!(runbook.base_dir, dir.path());
    assert!(runbook.contains("a"));
}

#[test]
fn load_runbook_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    assert!(matches!(load_runbook(&missing), Err(LoadError::Io { .. })));

    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[job.a]\n").unwrap();
    let err = load_runbook(&path).unwrap_err();
    assert!(err.to_string().contains("bad.toml"), "{err}");
}
