// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutual exclusion per lock name
//!
//! A lock is never waited for: a run whose lock is already held is
//! reported as [`LockError::AlreadyLocked`] and the decorator skips it.

use crate::job::{Job, JobResult};
use async_trait::async_trait;
use jx_core::JobParams;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors acquiring a job lock
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("lock already held: {0}")]
    AlreadyLocked(String),
    #[error("lock unavailable: {0}")]
    Unavailable(String),
}

/// Capability that runs a job while holding its lock
#[async_trait]
pub trait LockHandler: Send + Sync {
    async fn run_locked(
        &self,
        lock_name: &str,
        delegate: &dyn Job,
        params: JobParams,
    ) -> Result<JobResult, LockError>;
}

/// Runs everything without locking
pub struct NoopLockHandler;

#[async_trait]
impl LockHandler for NoopLockHandler {
    async fn run_locked(
        &self,
        _lock_name: &str,
        delegate: &dyn Job,
        params: JobParams,
    ) -> Result<JobResult, LockError> {
        Ok(delegate.run(params).await)
    }
}

/// In-process try-lock keyed by lock name
#[derive(Default)]
pub struct LocalLockHandler {
    held: Arc<Mutex<HashSet<String>>>,
}

impl LocalLockHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `lock_name` is currently held
    pub fn is_locked(&self, lock_name: &str) -> bool {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(lock_name)
    }

    fn try_acquire(&self, lock_name: &str) -> Option<LockGuard> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        if !held.insert(lock_name.to_string()) {
            return None;
        }
        Some(LockGuard {
            held: Arc::clone(&self.held),
            name: lock_name.to_string(),
        })
    }
}

#[async_trait]
impl LockHandler for LocalLockHandler {
    async fn run_locked(
        &self,
        lock_name: &str,
        delegate: &dyn Job,
        params: JobParams,
    ) -> Result<JobResult, LockError> {
        let _guard = self
            .try_acquire(lock_name)
            .ok_or_else(|| LockError::AlreadyLocked(lock_name.to_string()))?;
        tracing::debug!(lock = lock_name, "lock acquired");
        Ok(delegate.run(params).await)
    }
}

/// Releases the lock when dropped, including on panic or abort
struct LockGuard {
    held: Arc<Mutex<HashSet<String>>>,
    name: String,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.name);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
