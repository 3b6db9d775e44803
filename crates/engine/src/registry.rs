// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job registry
//!
//! Holds the raw jobs and node definitions and hands out decorated jobs.
//! Each name is compiled once: a name resolving to one single job is that
//! job behind the top decorator chain; anything larger becomes a
//! [`GraphJob`] whose members sit behind the shorter sub chain.

use crate::decorator::{
    DecoratorChain, ExceptionHandler, JobDecorator, JobListener, JobLogger, JobRenamer,
    ListenerDispatcher, LockDecorator, MappedJobDecorator, ParamsBinder, EXCEPTION_HANDLER_ORDER,
    LISTENER_ORDER, LOCK_ORDER, LOGGER_ORDER, PARAMS_BINDER_ORDER, RENAMER_ORDER,
};
use crate::error::RegistryError;
use crate::graph::{GraphJob, GraphPool};
use crate::job::Job;
use crate::lock::{LocalLockHandler, LockHandler};
use crate::metrics::{JobMetrics, MetricsSink};
use crate::txid::{TaskLocalTransactionIds, TransactionIds};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jx_core::{build_graph, JobMetadata, JobNodes, JobParams};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

pub const DEFAULT_GRAPH_THREADS: usize = 4;

/// Registered jobs and the compiled executables built from them
pub struct JobRegistry {
    jobs: HashMap<String, Arc<dyn Job>>,
    metadata: BTreeMap<String, JobMetadata>,
    definitions: JobNodes,
    top: DecoratorChain,
    sub: DecoratorChain,
    pool: Arc<GraphPool>,
    transaction_ids: Arc<dyn TransactionIds>,
    metrics: Arc<JobMetrics>,
    compiled: DashMap<String, Arc<dyn Job>>,
}

impl JobRegistry {
    pub fn builder() -> JobRegistryBuilder {
        JobRegistryBuilder::default()
    }

    /// Decorated job for `name`, compiled on first request
    ///
    /// Concurrent first requests compile once; failures are not cached.
    pub fn get_job(&self, name: &str) -> Result<Arc<dyn Job>, RegistryError> {
        if let Some(job) = self.compiled.get(name) {
            return Ok(Arc::clone(job.value()));
        }
        match self.compiled.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let job = self.compile(name)?;
                entry.insert(Arc::clone(&job));
                Ok(job)
            }
        }
    }

    /// Wrap an ad-hoc job with the top decorator chain
    pub fn decorate(&self, job: Arc<dyn Job>) -> Arc<dyn Job> {
        self.top.decorate(job, None, JobParams::new())
    }

    /// Whether `name` resolves to a job or a node definition
    pub fn contains(&self, name: &str) -> bool {
        self.jobs.contains_key(name) || self.definitions.contains_key(name)
    }

    /// Every runnable name, sorted
    pub fn job_names(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self.jobs.keys().chain(self.definitions.keys()).collect();
        names.into_iter().cloned().collect()
    }

    /// Metadata of a registered raw job
    pub fn metadata(&self, name: &str) -> Option<&JobMetadata> {
        self.metadata.get(name)
    }

    pub fn definitions(&self) -> &JobNodes {
        &self.definitions
    }

    /// In-memory metrics fed by the logger decorator
    pub fn metrics(&self) -> &Arc<JobMetrics> {
        &self.metrics
    }

    pub fn transaction_ids(&self) -> &Arc<dyn TransactionIds> {
        &self.transaction_ids
    }

    /// Stop the graph pool
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    fn compile(&self, name: &str) -> Result<Arc<dyn Job>, RegistryError> {
        let graph = build_graph(name, &self.definitions, &self.metadata)?;

        let root = graph.get(name);
        if graph.len() == 1 {
            if let Some(execution) = root {
                let job = self.raw_job(&execution.job)?;
                tracing::debug!(job = name, "compiled single job");
                return Ok(self.top.decorate(job, Some(name), execution.params.clone()));
            }
        }

        let batches = graph
            .batches()
            .into_iter()
            .map(|batch| {
                batch
                    .into_iter()
                    .map(|execution| {
                        let job = self.raw_job(&execution.job)?;
                        Ok(self.sub.decorate(job, Some(execution.name.as_str()), execution.params))
                    })
                    .collect::<Result<Vec<_>, RegistryError>>()
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        let metadata = match root.and_then(|execution| self.metadata.get(&execution.job)) {
            Some(root) => JobMetadata::builder(name)
                .lock_name(root.lock_name())
                .build(),
            None => JobMetadata::builder(name).group().build(),
        };
        tracing::debug!(job = name, batches = batches.len(), "compiled job graph");
        let graph_job: Arc<dyn Job> = Arc::new(GraphJob::new(
            metadata,
            batches,
            Arc::clone(&self.pool),
            Arc::clone(&self.transaction_ids),
        ));
        Ok(self.top.decorate(graph_job, None, JobParams::new()))
    }

    fn raw_job(&self, name: &str) -> Result<Arc<dyn Job>, RegistryError> {
        self.jobs
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownJob(name.to_string()))
    }
}

/// Builder for [`JobRegistry`]
pub struct JobRegistryBuilder {
    jobs: Vec<Arc<dyn Job>>,
    definitions: JobNodes,
    lock_handler: Arc<dyn LockHandler>,
    listeners: Vec<Arc<dyn JobListener>>,
    metrics: Arc<JobMetrics>,
    metrics_sink: Option<Arc<dyn MetricsSink>>,
    decorators: Vec<MappedJobDecorator>,
    graph_threads: usize,
    transaction_ids: Arc<dyn TransactionIds>,
}

impl Default for JobRegistryBuilder {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            definitions: JobNodes::new(),
            lock_handler: Arc::new(LocalLockHandler::new()),
            listeners: Vec::new(),
            metrics: Arc::new(JobMetrics::new()),
            metrics_sink: None,
            decorators: Vec::new(),
            graph_threads: DEFAULT_GRAPH_THREADS,
            transaction_ids: Arc::new(TaskLocalTransactionIds),
        }
    }
}

impl JobRegistryBuilder {
    pub fn job(mut self, job: Arc<dyn Job>) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn jobs(mut self, jobs: impl IntoIterator<Item = Arc<dyn Job>>) -> Self {
        self.jobs.extend(jobs);
        self
    }

    pub fn definitions(mut self, definitions: JobNodes) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn lock_handler(mut self, handler: Arc<dyn LockHandler>) -> Self {
        self.lock_handler = handler;
        self
    }

    pub fn listener(mut self, listener: Arc<dyn JobListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Send run metrics to `sink` instead of the in-memory [`JobMetrics`]
    pub fn metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics_sink = Some(sink);
        self
    }

    /// Custom decorator for top-level runs
    pub fn decorator(mut self, decorator: MappedJobDecorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn graph_threads(mut self, threads: usize) -> Self {
        self.graph_threads = threads;
        self
    }

    pub fn transaction_ids(mut self, ids: Arc<dyn TransactionIds>) -> Self {
        self.transaction_ids = ids;
        self
    }

    pub fn build(self) -> Result<JobRegistry, RegistryError> {
        let mut jobs = HashMap::new();
        let mut metadata = BTreeMap::new();
        for job in self.jobs {
            let name = job.metadata().name().to_string();
            if jobs.contains_key(&name) {
                return Err(RegistryError::DuplicateJob(name));
            }
            metadata.insert(name.clone(), job.metadata().clone());
            jobs.insert(name, job);
        }

        let sink: Arc<dyn MetricsSink> = match self.metrics_sink {
            Some(sink) => sink,
            None => Arc::clone(&self.metrics) as Arc<dyn MetricsSink>,
        };
        let logger = mapped(JobLogger::new(Some(sink)), LOGGER_ORDER);
        let renamer = mapped(JobRenamer, RENAMER_ORDER);
        let binder = mapped(ParamsBinder, PARAMS_BINDER_ORDER);
        let exception = mapped(ExceptionHandler, EXCEPTION_HANDLER_ORDER);

        let mut top = vec![
            renamer.clone(),
            logger.clone(),
            mapped(ListenerDispatcher::new(self.listeners), LISTENER_ORDER),
            binder.clone(),
            mapped(LockDecorator::new(self.lock_handler), LOCK_ORDER),
            exception.clone(),
        ];
        top.extend(self.decorators);
        let sub = vec![renamer, logger, binder, exception];

        Ok(JobRegistry {
            jobs,
            metadata,
            definitions: self.definitions,
            top: DecoratorChain::new(top),
            sub: DecoratorChain::new(sub),
            pool: Arc::new(GraphPool::new(self.graph_threads)),
            transaction_ids: self.transaction_ids,
            metrics: self.metrics,
            compiled: DashMap::new(),
        })
    }
}

fn mapped(decorator: impl JobDecorator + 'static, order: i32) -> MappedJobDecorator {
    MappedJobDecorator::new(Arc::new(decorator), order)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
