// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transaction id propagation
//!
//! Each top-level execution carries a transaction id. Task-local context
//! does not follow work onto another runtime, so the graph executor
//! captures the id before dispatching a batch member and re-enters it
//! inside the spawned task.

use crate::job::JobResult;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicU64, Ordering};

tokio::task_local! {
    static TRANSACTION_ID: String;
}

/// Capability carrying the current transaction id across tasks
pub trait TransactionIds: Send + Sync {
    /// Id of the surrounding execution, if any
    fn current_id(&self) -> Option<String>;

    /// Run `fut` with `id` as the current id; the previous id is restored
    /// when it completes
    fn scope<'a>(&self, id: String, fut: BoxFuture<'a, JobResult>) -> BoxFuture<'a, JobResult>;
}

/// Transaction ids held in a tokio task-local
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskLocalTransactionIds;

impl TransactionIds for TaskLocalTransactionIds {
    fn current_id(&self) -> Option<String> {
        current_transaction_id()
    }

    fn scope<'a>(&self, id: String, fut: BoxFuture<'a, JobResult>) -> BoxFuture<'a, JobResult> {
        Box::pin(TRANSACTION_ID.scope(id, fut))
    }
}

/// Transaction id of the execution the calling task belongs to
pub fn current_transaction_id() -> Option<String> {
    TRANSACTION_ID.try_with(|id| id.clone()).ok()
}

/// Source of ids for top-level executions
pub trait IdGen: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs in hyphen-less form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... in call order
#[derive(Debug)]
pub struct SequentialIdGen {
    prefix: String,
    issued: AtomicU64,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            issued: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("tx")
    }
}

impl IdGen for SequentialIdGen {
    fn next_id(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "txid_tests.rs"]
mod tests;
