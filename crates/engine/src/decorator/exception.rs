// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DecorationContext, JobDecorator};
use crate::job::{Job, JobResult};
use async_trait::async_trait;
use futures::FutureExt;
use jx_core::{JobOutcome, JobParams};
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Turns errors and panics of the wrapped job into failure outcomes
///
/// Nothing escapes this layer: the result is always `Ok`.
pub struct ExceptionHandler;

#[async_trait]
impl JobDecorator for ExceptionHandler {
    async fn run(
        &self,
        ctx: &DecorationContext,
        delegate: &dyn Job,
        params: JobParams,
    ) -> JobResult {
        match AssertUnwindSafe(delegate.run(params)).catch_unwind().await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(error)) => {
                tracing::debug!(job = ctx.job_name(), error = %error, "job returned an error");
                Ok(JobOutcome::failed_with(error))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(job = ctx.job_name(), panic = %message, "job panicked");
                Ok(JobOutcome::failed(format!("job panicked: {message}")))
            }
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
