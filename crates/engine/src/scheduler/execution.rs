// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-off executions of a job

use super::{Scheduler, SchedulerInner};
use crate::error::SchedulerError;
use crate::job::{Job, JobResult};
use futures::future::BoxFuture;
use jx_core::{JobOutcome, JobParams, ParamValue};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;

enum Target {
    Name(String),
    Job(Arc<dyn Job>),
}

/// Builder for running a job once, outside any trigger
#[must_use]
pub struct ExecutionBuilder<'a> {
    scheduler: &'a Scheduler,
    target: Option<Target>,
    params: JobParams,
}

impl<'a> ExecutionBuilder<'a> {
    pub(crate) fn new(scheduler: &'a Scheduler) -> Self {
        Self {
            scheduler,
            target: None,
            params: JobParams::new(),
        }
    }

    /// Run the registered job or graph called `name`
    pub fn job_name(mut self, name: impl Into<String>) -> Self {
        self.target = Some(Target::Name(name.into()));
        self
    }

    /// Run an unregistered job behind the top decorator chain
    pub fn job(mut self, job: Arc<dyn Job>) -> Self {
        self.target = Some(Target::Job(job));
        self
    }

    pub fn params(mut self, params: JobParams) -> Self {
        self.params.extend(params);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Run to completion
    pub async fn run(self) -> Result<JobOutcome, SchedulerError> {
        let scheduler = self.scheduler;
        let job = self.resolve()?;
        execute_on(&scheduler.inner, job, self.params).await
    }

    /// Start the run and return its handle
    ///
    /// The job is resolved before anything is spawned, so an unknown name
    /// fails here rather than in the handle.
    pub fn run_non_blocking(self) -> Result<JoinHandle<JobOutcome>, SchedulerError> {
        let job = self.resolve()?;
        let inner = Arc::clone(&self.scheduler.inner);
        let params = self.params;
        Ok(tokio::spawn(async move {
            execute_on(&inner, job, params)
                .await
                .unwrap_or_else(|e| JobOutcome::failed(e.to_string()))
        }))
    }

    fn resolve(&self) -> Result<Arc<dyn Job>, SchedulerError> {
        let registry = &self.scheduler.inner.registry;
        match &self.target {
            Some(Target::Name(name)) => Ok(registry.get_job(name)?),
            Some(Target::Job(job)) => Ok(registry.decorate(Arc::clone(job))),
            None => Err(SchedulerError::MissingJob),
        }
    }
}

/// Run `job` on the top-level pool inside an execution span
///
/// Nested executions keep the surrounding transaction id; top-level ones
/// get a fresh one.
pub(crate) async fn execute_on(
    inner: &SchedulerInner,
    job: Arc<dyn Job>,
    params: JobParams,
) -> Result<JobOutcome, SchedulerError> {
    let _permit = inner
        .permits
        .acquire()
        .await
        .map_err(|_| SchedulerError::ShutDown)?;

    let ids = inner.registry.transaction_ids();
    let tx_id = ids.current_id().unwrap_or_else(|| inner.id_gen.next_id());
    let span = tracing::info_span!("execution", job = job.metadata().name(), tx_id = %tx_id);

    let run: BoxFuture<'static, JobResult> = Box::pin(async move { job.run(params).await });
    let result = ids.scope(tx_id, run).instrument(span).await;
    Ok(result.unwrap_or_else(JobOutcome::failed_with))
}
