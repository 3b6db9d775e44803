// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jx exec <job>...` - Run jobs now

use crate::error::JxError;
use anyhow::{Context, Result};
use clap::Args;
use jx_core::{JobOutcome, JobParams};
use jx_engine::Scheduler;
use jx_runbook::Runbook;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args)]
pub struct ExecArgs {
    /// Jobs to run
    #[arg(required = true)]
    pub jobs: Vec<String>,

    /// Run one job at a time, stopping at the first one that does not succeed
    #[arg(long)]
    pub serial: bool,

    /// Parameters (key=value), converted with each job's declared types
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,
}

pub(crate) fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Run the jobs and print their outcomes; `Ok(true)` when every job succeeded
pub async fn handle(args: ExecArgs, runbook: &Runbook) -> Result<bool> {
    let names = runbook.names();
    if let Some(unknown) = args.jobs.iter().find(|job| !runbook.contains(job)) {
        return Err(JxError::unknown_job(unknown, &names).into());
    }

    let raw: BTreeMap<String, String> = args.params.into_iter().collect();
    let mut runs = Vec::with_capacity(args.jobs.len());
    for job in &args.jobs {
        let params = runbook.convert_params(job, &raw)?;
        runs.push((job.clone(), params));
    }

    let registry = Arc::new(runbook.registry().context("failed to build job registry")?);
    for job in &args.jobs {
        registry.get_job(job)?;
    }
    let scheduler = Scheduler::builder(registry)
        .threads(runbook.settings.threads)
        .build();

    let outcomes = if args.serial {
        run_serial(&scheduler, runs).await?
    } else {
        run_parallel(&scheduler, runs).await?
    };
    scheduler.shutdown();

    let mut all_succeeded = outcomes.len() == args.jobs.len();
    for (job, outcome) in &outcomes {
        println!("{}: {}", job, outcome);
        all_succeeded &= outcome.is_success();
    }
    for job in args.jobs.iter().skip(outcomes.len()) {
        println!("{}: not started", job);
    }

    Ok(all_succeeded)
}

async fn run_serial(
    scheduler: &Scheduler,
    runs: Vec<(String, JobParams)>,
) -> Result<Vec<(String, JobOutcome)>> {
    let mut outcomes = Vec::with_capacity(runs.len());
    for (job, params) in runs {
        let outcome = scheduler
            .new_execution()
            .job_name(&job)
            .params(params)
            .run()
            .await?;
        let stop = !outcome.is_success();
        outcomes.push((job, outcome));
        if stop {
            tracing::warn!("aborting remaining jobs after a non-successful run");
            break;
        }
    }
    Ok(outcomes)
}

async fn run_parallel(
    scheduler: &Scheduler,
    runs: Vec<(String, JobParams)>,
) -> Result<Vec<(String, JobOutcome)>> {
    let mut handles = Vec::with_capacity(runs.len());
    for (job, params) in runs {
        let handle = scheduler
            .new_execution()
            .job_name(&job)
            .params(params)
            .run_non_blocking()?;
        handles.push((job, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (job, handle) in handles {
        let outcome = handle
            .await
            .unwrap_or_else(|e| JobOutcome::unknown(format!("execution did not complete: {e}")));
        outcomes.push((job, outcome));
    }
    Ok(outcomes)
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
