// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result classification of a job run

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Error type carried by failed outcomes and returned by job bodies
pub type JobError = Box<dyn std::error::Error + Send + Sync>;

/// Status of a finished job run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Success,
    PartialSuccess,
    Failure,
    /// Deliberately not run, e.g. because its lock was held
    Skipped,
    /// The run could not be resolved to a result
    Unknown,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Success => "success",
            JobStatus::PartialSuccess => "partial_success",
            JobStatus::Failure => "failure",
            JobStatus::Skipped => "skipped",
            JobStatus::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a job run: a status with an optional message and cause
#[derive(Debug, Clone)]
pub struct JobOutcome {
    status: JobStatus,
    message: Option<String>,
    error: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl JobOutcome {
    pub fn new(status: JobStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            error: None,
        }
    }

    pub fn succeeded() -> Self {
        Self::new(JobStatus::Success, None)
    }

    pub fn partial(message: impl Into<String>) -> Self {
        Self::new(JobStatus::PartialSuccess, Some(message.into()))
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(JobStatus::Failure, Some(message.into()))
    }

    /// Failure carrying the error that caused it
    pub fn failed_with(error: JobError) -> Self {
        Self {
            status: JobStatus::Failure,
            message: Some(error.to_string()),
            error: Some(Arc::from(error)),
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self::new(JobStatus::Skipped, Some(message.into()))
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(JobStatus::Unknown, Some(message.into()))
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Success
    }
}

impl PartialEq for JobOutcome {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.message == other.message
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.status, message),
            None => write!(f, "{}", self.status),
        }
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
