// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DecorationContext, JobDecorator};
use crate::job::{Job, JobResult};
use async_trait::async_trait;
use jx_core::JobParams;

/// Merges pre-bound parameters under the caller's
///
/// Caller-supplied values win over pre-bound ones with the same name.
pub struct ParamsBinder;

#[async_trait]
impl JobDecorator for ParamsBinder {
    fn is_applicable(&self, ctx: &DecorationContext) -> bool {
        !ctx.prebind.is_empty()
    }

    async fn run(
        &self,
        ctx: &DecorationContext,
        delegate: &dyn Job,
        params: JobParams,
    ) -> JobResult {
        let mut bound = ctx.prebind.clone();
        bound.extend(params);
        delegate.run(bound).await
    }
}
