// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The executable job abstraction

use async_trait::async_trait;
use jx_core::{JobError, JobMetadata, JobOutcome, JobParams};
use std::future::Future;
use std::sync::Arc;

/// What a job run produces; errors are turned into failure outcomes by
/// the exception-handling decorator
pub type JobResult = Result<JobOutcome, JobError>;

/// A named unit of work
#[async_trait]
pub trait Job: Send + Sync {
    fn metadata(&self) -> &JobMetadata;

    async fn run(&self, params: JobParams) -> JobResult;
}

/// Job backed by an async closure
pub struct FnJob<F> {
    metadata: JobMetadata,
    body: F,
}

impl<F, Fut> FnJob<F>
where
    F: Fn(JobParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = JobResult> + Send + 'static,
{
    pub fn new(metadata: JobMetadata, body: F) -> Self {
        Self { metadata, body }
    }

    /// Shared job ready for registration
    pub fn shared(metadata: JobMetadata, body: F) -> Arc<dyn Job> {
        Arc::new(Self::new(metadata, body))
    }
}

#[async_trait]
impl<F, Fut> Job for FnJob<F>
where
    F: Fn(JobParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = JobResult> + Send + 'static,
{
    fn metadata(&self) -> &JobMetadata {
        &self.metadata
    }

    async fn run(&self, params: JobParams) -> JobResult {
        (self.body)(params).await
    }
}
