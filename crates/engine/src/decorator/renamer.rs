// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DecorationContext, JobDecorator};
use crate::job::{Job, JobResult};
use async_trait::async_trait;
use jx_core::{JobMetadata, JobParams};

/// Exposes a job under an alternative name, keeping its lock name
pub struct JobRenamer;

#[async_trait]
impl JobDecorator for JobRenamer {
    fn is_applicable(&self, ctx: &DecorationContext) -> bool {
        ctx.alt_name.is_some()
    }

    fn decorated_metadata(&self, ctx: &DecorationContext, inner: &JobMetadata) -> JobMetadata {
        match &ctx.alt_name {
            Some(alt) => inner.renamed(alt.as_str()),
            None => inner.clone(),
        }
    }

    async fn run(
        &self,
        _ctx: &DecorationContext,
        delegate: &dyn Job,
        params: JobParams,
    ) -> JobResult {
        delegate.run(params).await
    }
}
