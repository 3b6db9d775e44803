// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DecorationContext, JobDecorator};
use crate::job::{Job, JobResult};
use crate::metrics::MetricsSink;
use async_trait::async_trait;
use jx_core::{JobParams, JobStatus};
use std::sync::Arc;
use std::time::Instant;

/// Logs start and finish of every run and feeds the metrics sink
pub struct JobLogger {
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl JobLogger {
    pub fn new(metrics: Option<Arc<dyn MetricsSink>>) -> Self {
        Self { metrics }
    }
}

/// A started run; reports `Unknown` if dropped before [`RunRecord::finish`]
struct RunRecord<'a> {
    job: &'a str,
    metrics: Option<&'a dyn MetricsSink>,
    start: Instant,
    finished: bool,
}

impl<'a> RunRecord<'a> {
    fn start(job: &'a str, metrics: Option<&'a dyn MetricsSink>) -> Self {
        if let Some(metrics) = metrics {
            metrics.job_started(job);
        }
        Self {
            job,
            metrics,
            start: Instant::now(),
            finished: false,
        }
    }

    fn finish(mut self, status: JobStatus) {
        self.finished = true;
        if let Some(metrics) = self.metrics {
            metrics.job_finished(self.job, status, self.start.elapsed());
        }
    }
}

impl Drop for RunRecord<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let elapsed = self.start.elapsed();
        tracing::warn!(job = self.job, elapsed_ms = elapsed.as_millis() as u64, "job interrupted");
        if let Some(metrics) = self.metrics {
            metrics.job_finished(self.job, JobStatus::Unknown, elapsed);
        }
    }
}

#[async_trait]
impl JobDecorator for JobLogger {
    async fn run(
        &self,
        ctx: &DecorationContext,
        delegate: &dyn Job,
        params: JobParams,
    ) -> JobResult {
        let job = ctx.job_name();
        tracing::info!(job, params = ?params, "job started");
        let record = RunRecord::start(job, self.metrics.as_deref());

        let result = delegate.run(params).await;
        let elapsed_ms = record.start.elapsed().as_millis() as u64;

        let status = match &result {
            Ok(outcome) => {
                let status = outcome.status();
                let message = outcome.message().unwrap_or_default();
                match status {
                    JobStatus::Success => {
                        tracing::info!(job, %status, elapsed_ms, "job finished")
                    }
                    JobStatus::Skipped | JobStatus::PartialSuccess => {
                        tracing::warn!(job, %status, message, elapsed_ms, "job finished")
                    }
                    JobStatus::Failure | JobStatus::Unknown => {
                        tracing::error!(job, %status, message, elapsed_ms, "job finished")
                    }
                }
                status
            }
            Err(e) => {
                tracing::error!(job, error = %e, elapsed_ms, "job failed");
                JobStatus::Failure
            }
        };

        record.finish(status);
        result
    }
}
