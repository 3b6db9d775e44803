// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job dependency graphs
//!
//! Configured [`JobNodes`] are resolved from a root name into a
//! [`DependencyGraph`], which is then cut into sequential batches of
//! independent executions.

mod batch;
mod builder;
mod node;

pub use builder::{build_graph, DependencyGraph, JobExecution};
pub use node::{GroupNode, JobNode, JobNodes, SingleJobNode};

use crate::job::ParamError;
use thiserror::Error;

/// Errors raised while resolving a graph
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unknown job: {name}{}", required_by_suffix(required_by))]
    UnknownJob {
        name: String,
        required_by: Option<String>,
    },

    #[error("dependency cycle: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("invalid parameters for {job}: {source}")]
    Params {
        job: String,
        #[source]
        source: ParamError,
    },
}

fn required_by_suffix(required_by: &Option<String>) -> String {
    required_by
        .as_ref()
        .map(|r| format!(" (required by {r})"))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
