// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jx execution engine

mod clock;
pub mod decorator;
mod error;
mod graph;
mod job;
pub mod lock;
pub mod metrics;
mod registry;
mod scheduler;
#[cfg(test)]
mod test_support;
mod txid;

pub use clock::TokioClock;
pub use decorator::{JobDecorator, JobListener, MappedJobDecorator};
pub use error::{RegistryError, SchedulerError};
pub use graph::{GraphJob, GraphPool};
pub use job::{FnJob, Job, JobResult};
pub use lock::{LocalLockHandler, LockError, LockHandler, NoopLockHandler};
pub use metrics::{JobMetrics, MetricsSink};
pub use registry::{JobRegistry, JobRegistryBuilder, DEFAULT_GRAPH_THREADS};
pub use scheduler::{
    ExecutionBuilder, Schedule, ScheduleContext, Scheduler, SchedulerBuilder, Trigger,
    TriggerBuilder, TriggerKey, TriggerStatus, DEFAULT_THREADS,
};
pub use txid::{
    current_transaction_id, IdGen, SequentialIdGen, TaskLocalTransactionIds, TransactionIds,
    UuidIdGen,
};
