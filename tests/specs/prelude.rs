//! Shared helpers for CLI specs

#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Two independent jobs and one that fails, each appending to `log.txt`
pub const MINIMAL_RUNBOOK: &str = r#"
[job.ok]
run = "echo ok >> log.txt"

[job.other]
run = "echo other >> log.txt"

[job.fail]
run = "echo fail >> log.txt; exit 1"
"#;

/// Temporary project directory holding a runbook
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Project with `content` as its `jx.toml`
    pub fn with_runbook(content: &str) -> Self {
        let project = Self::empty();
        project.file("jx.toml", content);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }

    /// `jx` command running in the project directory
    pub fn jx(&self) -> Cli {
        let mut cmd = Command::cargo_bin("jx").unwrap();
        cmd.current_dir(self.dir.path()).env("JX_LOG", "warn");
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> Output {
        let assert = self.cmd.assert().success();
        Output::from(assert)
    }

    pub fn fails(self) -> Output {
        self.fails_with(1)
    }

    pub fn fails_with(mut self, code: i32) -> Output {
        let assert = self.cmd.assert().failure().code(code);
        Output::from(assert)
    }
}

pub struct Output {
    stdout: String,
    stderr: String,
}

impl From<assert_cmd::assert::Assert> for Output {
    fn from(assert: assert_cmd::assert::Assert) -> Self {
        let output = assert.get_output();
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Output {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        assert!(
            predicate::str::contains(expected).eval(&self.stdout),
            "stdout should contain {expected:?}, got:\n{}",
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        assert!(
            !self.stdout.contains(unexpected),
            "stdout should not contain {unexpected:?}, got:\n{}",
            self.stdout
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        assert!(
            predicate::str::contains(expected).eval(&self.stderr),
            "stderr should contain {expected:?}, got:\n{}",
            self.stderr
        );
        self
    }
}
