//! jx-core: Core library for the jx job runner
//!
//! This crate provides:
//! - Job metadata, typed parameters and outcomes
//! - Cron expression parsing and next-fire computation
//! - Dependency graph resolution and topological batching
//! - A wall-clock seam for schedule computations

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

pub mod clock;
pub mod cron;
pub mod graph;
pub mod job;

// Re-exports
pub use clock::{Clock, SystemClock};
pub use cron::{CronError, CronExpression};
pub use graph::{
    build_graph, DependencyGraph, GraphError, GroupNode, JobExecution, JobNode, JobNodes,
    SingleJobNode,
};
pub use job::{
    JobError, JobMetadata, JobMetadataBuilder, JobOutcome, JobParams, JobStatus, ParamError,
    ParamType, ParamValue, ParameterMetadata,
};
