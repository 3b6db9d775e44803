// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job run metrics
//!
//! Metrics are an output side channel only; nothing reads them back to
//! make decisions.

use dashmap::DashMap;
use jx_core::JobStatus;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

/// Receives start and stop events for job runs
pub trait MetricsSink: Send + Sync {
    fn job_started(&self, job: &str);

    fn job_finished(&self, job: &str, status: JobStatus, elapsed: Duration);
}

/// Counters for one job
#[derive(Debug, Default)]
pub struct JobMeter {
    active: AtomicI64,
    completed: AtomicU64,
    success: AtomicU64,
    failure: AtomicU64,
    total_ms: AtomicU64,
}

/// Point-in-time copy of a [`JobMeter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeterSnapshot {
    pub active: i64,
    pub completed: u64,
    pub success: u64,
    pub failure: u64,
    pub total_ms: u64,
}

impl JobMeter {
    pub fn snapshot(&self) -> MeterSnapshot {
        MeterSnapshot {
            active: self.active.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            failure: self.failure.load(Ordering::Relaxed),
            total_ms: self.total_ms.load(Ordering::Relaxed),
        }
    }
}

/// In-memory metrics keyed by job name
#[derive(Debug, Default)]
pub struct JobMetrics {
    meters: DashMap<String, JobMeter>,
}

impl JobMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, job: &str) -> Option<MeterSnapshot> {
        self.meters.get(job).map(|m| m.snapshot())
    }

    /// Snapshots of every job seen so far, sorted by name
    pub fn snapshots(&self) -> Vec<(String, MeterSnapshot)> {
        let mut all: Vec<_> = self
            .meters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().snapshot()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    fn with_meter(&self, job: &str, f: impl FnOnce(&JobMeter)) {
        if let Some(meter) = self.meters.get(job) {
            f(&meter);
            return;
        }
        f(&self.meters.entry(job.to_string()).or_default());
    }
}

impl MetricsSink for JobMetrics {
    fn job_started(&self, job: &str) {
        self.with_meter(job, |m| {
            m.active.fetch_add(1, Ordering::Relaxed);
        });
    }

    fn job_finished(&self, job: &str, status: JobStatus, elapsed: Duration) {
        self.with_meter(job, |m| {
            m.active.fetch_sub(1, Ordering::Relaxed);
            m.completed.fetch_add(1, Ordering::Relaxed);
            match status {
                JobStatus::Success => m.success.fetch_add(1, Ordering::Relaxed),
                JobStatus::Failure | JobStatus::Unknown => {
                    m.failure.fetch_add(1, Ordering::Relaxed)
                }
                JobStatus::PartialSuccess | JobStatus::Skipped => 0,
            };
            m.total_ms
                .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
        });
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
