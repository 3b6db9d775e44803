// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell job definitions

use crate::template::interpolate;
use async_trait::async_trait;
use jx_core::{JobMetadata, JobOutcome, JobParams, ParameterMetadata};
use jx_engine::{current_transaction_id, Job, JobResult};
use std::path::{Path, PathBuf};

/// A `[job.<name>]` table
#[derive(Debug, Clone, PartialEq)]
pub struct JobDef {
    pub name: String,
    /// Shell command template with `{param}` placeholders
    pub run: String,
    pub lock: Option<String>,
    pub depends_on: Vec<String>,
    pub params: Vec<ParameterMetadata>,
    /// Working directory, relative to the runbook's directory
    pub workdir: Option<PathBuf>,
}

impl JobDef {
    pub fn metadata(&self) -> JobMetadata {
        let mut builder = JobMetadata::builder(&self.name);
        if let Some(lock) = &self.lock {
            builder = builder.lock_name(lock);
        }
        for param in &self.params {
            builder = builder.param(param.clone());
        }
        for dep in &self.depends_on {
            builder = builder.depends_on(dep);
        }
        builder.build()
    }

    /// Executable job running in `base_dir` (or the configured workdir under it)
    pub fn to_job(&self, base_dir: &Path) -> ShellJob {
        let workdir = match &self.workdir {
            Some(dir) => base_dir.join(dir),
            None => base_dir.to_path_buf(),
        };
        ShellJob {
            metadata: self.metadata(),
            run: self.run.clone(),
            workdir,
        }
    }
}

/// Runs a command template through `sh -c`
pub struct ShellJob {
    metadata: JobMetadata,
    run: String,
    workdir: PathBuf,
}

impl ShellJob {
    pub fn new(metadata: JobMetadata, run: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            metadata,
            run: run.into(),
            workdir: workdir.into(),
        }
    }

    pub fn command(&self, params: &JobParams) -> String {
        interpolate(&self.run, params)
    }
}

/// Environment variable name for a parameter: `JX_PARAM_` plus the
/// upper-cased name with dashes as underscores
pub fn param_env_name(name: &str) -> String {
    format!("JX_PARAM_{}", name.to_ascii_uppercase().replace('-', "_"))
}

#[async_trait]
impl Job for ShellJob {
    fn metadata(&self) -> &JobMetadata {
        &self.metadata
    }

    async fn run(&self, params: JobParams) -> JobResult {
        let command = self.command(&params);
        let job = self.metadata.name();
        tracing::debug!(job, %command, "running shell command");

        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command)
            .current_dir(&self.workdir)
            .env("JX_JOB", job)
            .env("JX_TX_ID", current_transaction_id().unwrap_or_default())
            .envs(
                params
                    .iter()
                    .map(|(name, value)| (param_env_name(name), value.to_string())),
            )
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.stdout.is_empty() {
            tracing::info!(
                job,
                stdout = %String::from_utf8_lossy(&output.stdout).trim_end(),
                "shell stdout"
            );
        }
        if !output.stderr.is_empty() {
            tracing::warn!(
                job,
                stderr = %String::from_utf8_lossy(&output.stderr).trim_end(),
                "shell stderr"
            );
        }

        if output.status.success() {
            return Ok(JobOutcome::succeeded());
        }
        Ok(match output.status.code() {
            Some(code) => JobOutcome::failed(format!("exited with status {code}")),
            None => JobOutcome::failed("terminated by signal"),
        })
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
