// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::exception::panic_message;
use super::{DecorationContext, JobDecorator};
use crate::job::{Job, JobResult};
use async_trait::async_trait;
use jx_core::{JobOutcome, JobParams};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Observer notified around top-level job runs
pub trait JobListener: Send + Sync {
    fn on_started(&self, _job: &str, _params: &JobParams) {}

    fn on_finished(&self, _job: &str, _outcome: &JobOutcome) {}
}

/// Fans out start and finish notifications to every listener
///
/// A panicking listener is logged and does not affect the others or the job.
pub struct ListenerDispatcher {
    listeners: Vec<Arc<dyn JobListener>>,
}

impl ListenerDispatcher {
    pub fn new(listeners: Vec<Arc<dyn JobListener>>) -> Self {
        Self { listeners }
    }

    fn notify(&self, job: &str, event: &str, f: impl Fn(&dyn JobListener)) {
        for listener in &self.listeners {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| f(listener.as_ref()))) {
                let panic = panic_message(panic.as_ref());
                tracing::warn!(job, event, %panic, "listener panicked");
            }
        }
    }
}

#[async_trait]
impl JobDecorator for ListenerDispatcher {
    fn is_applicable(&self, _ctx: &DecorationContext) -> bool {
        !self.listeners.is_empty()
    }

    async fn run(
        &self,
        ctx: &DecorationContext,
        delegate: &dyn Job,
        params: JobParams,
    ) -> JobResult {
        let job = ctx.job_name();
        self.notify(job, "started", |l| l.on_started(job, &params));

        let result = delegate.run(params).await;
        match &result {
            Ok(outcome) => self.notify(job, "finished", |l| l.on_finished(job, outcome)),
            Err(e) => {
                let outcome = JobOutcome::failed(e.to_string());
                self.notify(job, "finished", |l| l.on_finished(job, &outcome));
            }
        }
        result
    }
}
