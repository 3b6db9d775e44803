// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use jx_core::{CronError, GraphError};
use thiserror::Error;

/// Errors resolving a job from the registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown job: {0}")]
    UnknownJob(String),
    #[error("job registered twice: {0}")]
    DuplicateJob(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors from scheduler operations
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("invalid cron expression for trigger {trigger}: {source}")]
    Cron {
        trigger: String,
        #[source]
        source: CronError,
    },
    #[error("trigger has no job name")]
    MissingJobName,
    #[error("unknown trigger: {job}/{trigger}")]
    UnknownTrigger { job: String, trigger: String },
    #[error("trigger already exists: {job}/{trigger}")]
    DuplicateTrigger { job: String, trigger: String },
    #[error("execution has no job")]
    MissingJob,
    #[error("scheduler is shut down")]
    ShutDown,
}
