// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graph executor
//!
//! Batches run strictly in order. A batch with one member runs inline; a
//! larger batch runs its first member inline and the others on the graph
//! pool, a runtime separate from the one driving top-level executions so
//! nested groups cannot starve their own parents. A failed member keeps
//! later members of its batch from starting but never interrupts a running
//! sibling.

use crate::job::{Job, JobResult};
use crate::txid::TransactionIds;
use async_trait::async_trait;
use futures::future::BoxFuture;
use jx_core::{JobMetadata, JobOutcome, JobParams};
use std::sync::{Arc, Mutex};
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Worker pool for parallel batch members, created on first use
pub struct GraphPool {
    threads: usize,
    runtime: Mutex<Option<Runtime>>,
}

impl GraphPool {
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
            runtime: Mutex::new(None),
        }
    }

    pub fn is_started(&self) -> bool {
        self.runtime
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn handle(&self) -> std::io::Result<Handle> {
        let mut runtime = self.runtime.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(rt) = runtime.as_ref() {
            return Ok(rt.handle().clone());
        }
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.threads)
            .thread_name("jx-graph")
            .enable_all()
            .build()?;
        tracing::debug!(threads = self.threads, "graph pool started");
        let handle = rt.handle().clone();
        *runtime = Some(rt);
        Ok(handle)
    }

    /// Stop the pool without waiting for running members
    pub fn shutdown(&self) {
        let runtime = self
            .runtime
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(rt) = runtime {
            rt.shutdown_background();
            tracing::debug!("graph pool stopped");
        }
    }
}

impl Drop for GraphPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A compiled dependency graph, runnable as one job
pub struct GraphJob {
    metadata: JobMetadata,
    batches: Vec<Vec<Arc<dyn Job>>>,
    pool: Arc<GraphPool>,
    transaction_ids: Arc<dyn TransactionIds>,
}

impl GraphJob {
    pub fn new(
        metadata: JobMetadata,
        batches: Vec<Vec<Arc<dyn Job>>>,
        pool: Arc<GraphPool>,
        transaction_ids: Arc<dyn TransactionIds>,
    ) -> Self {
        Self {
            metadata,
            batches,
            pool,
            transaction_ids,
        }
    }

    pub fn batches(&self) -> &[Vec<Arc<dyn Job>>] {
        &self.batches
    }

    /// First non-success in join order wins. A failure stops members that
    /// have not started yet; members already running are awaited.
    async fn run_batch(&self, batch: &[Arc<dyn Job>], params: &JobParams) -> JobOutcome {
        let (first, rest) = match batch {
            [] => return JobOutcome::succeeded(),
            [single] => return into_outcome(single.run(params.clone()).await),
            [first, rest @ ..] => (first, rest),
        };

        let handle = match self.pool.handle() {
            Ok(handle) => handle,
            Err(e) => return JobOutcome::failed(format!("graph pool unavailable: {e}")),
        };
        let failed = CancellationToken::new();
        let transaction_id = self.transaction_ids.current_id();
        let handles: Vec<JoinHandle<Option<JobOutcome>>> = rest
            .iter()
            .map(|job| {
                let job = Arc::clone(job);
                let ids = Arc::clone(&self.transaction_ids);
                let params = params.clone();
                let transaction_id = transaction_id.clone();
                let failed = failed.clone();
                let member = async move {
                    if failed.is_cancelled() {
                        tracing::debug!(job = job.metadata().name(), "batch failed, not starting");
                        return None;
                    }
                    let run: BoxFuture<'static, JobResult> =
                        Box::pin(async move { job.run(params).await });
                    let run = match transaction_id {
                        Some(id) => ids.scope(id, run),
                        None => run,
                    };
                    let outcome = into_outcome(run.await);
                    if !outcome.is_success() {
                        failed.cancel();
                    }
                    Some(outcome)
                };
                handle.spawn(member.instrument(tracing::Span::current()))
            })
            .collect();

        let mut batch_outcome = into_outcome(first.run(params.clone()).await);
        if !batch_outcome.is_success() {
            failed.cancel();
        }

        for member in handles {
            let outcome = match member.await {
                Ok(Some(outcome)) => outcome,
                Ok(None) => continue,
                Err(e) => JobOutcome::unknown(format!("batch member did not complete: {e}")),
            };
            if batch_outcome.is_success() && !outcome.is_success() {
                failed.cancel();
                batch_outcome = outcome;
            }
        }
        batch_outcome
    }
}

#[async_trait]
impl Job for GraphJob {
    fn metadata(&self) -> &JobMetadata {
        &self.metadata
    }

    async fn run(&self, params: JobParams) -> JobResult {
        for (index, batch) in self.batches.iter().enumerate() {
            tracing::debug!(
                graph = self.metadata.name(),
                batch = index,
                size = batch.len(),
                "running batch"
            );
            let outcome = self.run_batch(batch, &params).await;
            if !outcome.is_success() {
                return Ok(outcome);
            }
        }
        Ok(JobOutcome::succeeded())
    }
}

fn into_outcome(result: JobResult) -> JobOutcome {
    result.unwrap_or_else(JobOutcome::failed_with)
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
