// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decorator chain wrapped around every registered job
//!
//! Decorators are ordered by an integer key; a lower order sits further
//! outside and so observes the start of a run first and its finish last.
//! The chain is folded once per job into nested [`DecoratedJob`]s.

mod binder;
mod exception;
mod listener;
mod lock;
mod logger;
mod renamer;

pub use binder::ParamsBinder;
pub use exception::ExceptionHandler;
pub use listener::{JobListener, ListenerDispatcher};
pub use lock::LockDecorator;
pub use logger::JobLogger;
pub use renamer::JobRenamer;

use crate::job::{Job, JobResult};
use async_trait::async_trait;
use jx_core::{JobMetadata, JobParams};
use std::sync::Arc;

pub const RENAMER_ORDER: i32 = 100;
pub const LOGGER_ORDER: i32 = 200;
pub const LISTENER_ORDER: i32 = 300;
pub const PARAMS_BINDER_ORDER: i32 = 400;
pub const LOCK_ORDER: i32 = 500;
pub const EXCEPTION_HANDLER_ORDER: i32 = 600;
/// Unordered custom decorators sit closest to the job
pub const DEFAULT_ORDER: i32 = i32::MAX;

/// What a decorator knows about the job it wraps
#[derive(Debug, Clone)]
pub struct DecorationContext {
    /// Metadata of the undecorated job
    pub metadata: JobMetadata,
    /// Name the job is exposed under, when it differs from its own
    pub alt_name: Option<String>,
    /// Parameters bound ahead of the caller's
    pub prebind: JobParams,
}

impl DecorationContext {
    pub fn new(metadata: JobMetadata, alt_name: Option<String>, prebind: JobParams) -> Self {
        let alt_name = alt_name.filter(|alt| alt != metadata.name());
        Self {
            metadata,
            alt_name,
            prebind,
        }
    }

    /// Name used for logs and metrics
    pub fn job_name(&self) -> &str {
        self.alt_name.as_deref().unwrap_or(self.metadata.name())
    }
}

/// Behavior injected around a job run
#[async_trait]
pub trait JobDecorator: Send + Sync {
    /// Whether this decorator wraps the given job at all
    fn is_applicable(&self, _ctx: &DecorationContext) -> bool {
        true
    }

    /// Metadata the decorated job presents to outer layers
    fn decorated_metadata(&self, _ctx: &DecorationContext, inner: &JobMetadata) -> JobMetadata {
        inner.clone()
    }

    async fn run(
        &self,
        ctx: &DecorationContext,
        delegate: &dyn Job,
        params: JobParams,
    ) -> JobResult;
}

/// A decorator paired with its position in the chain
#[derive(Clone)]
pub struct MappedJobDecorator {
    pub decorator: Arc<dyn JobDecorator>,
    pub order: i32,
}

impl MappedJobDecorator {
    pub fn new(decorator: Arc<dyn JobDecorator>, order: i32) -> Self {
        Self { decorator, order }
    }

    /// Custom decorator placed innermost
    pub fn unordered(decorator: Arc<dyn JobDecorator>) -> Self {
        Self::new(decorator, DEFAULT_ORDER)
    }
}

/// Ordered set of decorators
#[derive(Clone, Default)]
pub struct DecoratorChain {
    decorators: Vec<MappedJobDecorator>,
}

impl DecoratorChain {
    pub fn new(mut decorators: Vec<MappedJobDecorator>) -> Self {
        // stable: equal orders keep registration order
        decorators.sort_by_key(|d| d.order);
        Self { decorators }
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Wrap `job` with every applicable decorator, outermost first
    pub fn decorate(
        &self,
        job: Arc<dyn Job>,
        alt_name: Option<&str>,
        prebind: JobParams,
    ) -> Arc<dyn Job> {
        let ctx = Arc::new(DecorationContext::new(
            job.metadata().clone(),
            alt_name.map(str::to_string),
            prebind,
        ));
        self.decorators
            .iter()
            .rev()
            .filter(|mapped| mapped.decorator.is_applicable(&ctx))
            .fold(job, |delegate, mapped| {
                let metadata = mapped
                    .decorator
                    .decorated_metadata(&ctx, delegate.metadata());
                let layer: Arc<dyn Job> = Arc::new(DecoratedJob {
                    metadata,
                    ctx: Arc::clone(&ctx),
                    decorator: Arc::clone(&mapped.decorator),
                    delegate,
                });
                layer
            })
    }
}

/// One layer of the chain
pub struct DecoratedJob {
    metadata: JobMetadata,
    ctx: Arc<DecorationContext>,
    decorator: Arc<dyn JobDecorator>,
    delegate: Arc<dyn Job>,
}

#[async_trait]
impl Job for DecoratedJob {
    fn metadata(&self) -> &JobMetadata {
        &self.metadata
    }

    async fn run(&self, params: JobParams) -> JobResult {
        self.decorator
            .run(&self.ctx, self.delegate.as_ref(), params)
            .await
    }
}

#[cfg(test)]
#[path = "decorator_tests.rs"]
mod tests;
