// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DecorationContext, JobDecorator};
use crate::job::{Job, JobResult};
use crate::lock::{LockError, LockHandler};
use async_trait::async_trait;
use jx_core::{JobOutcome, JobParams};
use std::sync::Arc;

/// Runs the job under its lock name; a held lock skips the run
pub struct LockDecorator {
    handler: Arc<dyn LockHandler>,
}

impl LockDecorator {
    pub fn new(handler: Arc<dyn LockHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl JobDecorator for LockDecorator {
    async fn run(
        &self,
        ctx: &DecorationContext,
        delegate: &dyn Job,
        params: JobParams,
    ) -> JobResult {
        let lock_name = delegate.metadata().lock_name();
        match self.handler.run_locked(lock_name, delegate, params).await {
            Ok(result) => result,
            Err(LockError::AlreadyLocked(name)) => {
                tracing::info!(job = ctx.job_name(), lock = %name, "lock held, skipping");
                Ok(JobOutcome::skipped(format!("lock '{name}' is already held")))
            }
            Err(error) => Ok(JobOutcome::failed_with(Box::new(error))),
        }
    }
}
