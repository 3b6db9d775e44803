// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jx schedule` - Run the runbook's triggers until interrupted

use anyhow::{bail, Context, Result};
use clap::Args;
use jx_runbook::Runbook;
use std::sync::Arc;

#[derive(Args)]
pub struct ScheduleArgs {
    /// Only schedule triggers of these jobs
    #[arg(long = "job")]
    pub jobs: Vec<String>,
}

pub async fn handle(args: ScheduleArgs, runbook: &Runbook) -> Result<()> {
    let registry = Arc::new(runbook.registry().context("failed to build job registry")?);
    let scheduler = runbook
        .scheduler(registry)
        .context("failed to add triggers")?;

    let scheduled = if args.jobs.is_empty() {
        scheduler.start()
    } else {
        let mut scheduled = 0;
        for job in &args.jobs {
            scheduled += scheduler.schedule_triggers(job);
        }
        scheduled
    };
    if scheduled == 0 {
        scheduler.shutdown();
        bail!("no triggers to schedule");
    }

    for trigger in scheduler.scheduled_triggers() {
        match trigger.next_fire_time() {
            Some(next) => println!("{}: next run at {}", trigger.key(), next.to_rfc3339()),
            None => println!("{}: scheduled", trigger.key()),
        }
    }
    tracing::info!(scheduled, "scheduler running, press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    tracing::info!("interrupted, shutting down");
    scheduler.shutdown();
    Ok(())
}
