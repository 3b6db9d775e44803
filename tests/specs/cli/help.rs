//! CLI help specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .jx()
        .args(&["--help"])
        .passes()
        .stdout_has("exec")
        .stdout_has("list")
        .stdout_has("schedule");
}

#[test]
fn exec_requires_a_job() {
    let temp = Project::with_runbook(MINIMAL_RUNBOOK);
    // clap reports usage errors with exit code 2
    temp.jx().args(&["exec"]).fails_with(2).stderr_has("<JOBS>");
}
