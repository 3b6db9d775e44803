// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A parsed runbook and its conversion into engine inputs

use crate::job::JobDef;
use crate::trigger::{ScheduleDef, TriggerDef};
use jx_core::{build_graph, GraphError, JobMetadata, JobNodes, JobParams};
use jx_engine::{
    Job, JobRegistry, JobRegistryBuilder, RegistryError, Scheduler, SchedulerError,
    DEFAULT_GRAPH_THREADS, DEFAULT_THREADS,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

/// The `[scheduler]` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Bound on concurrent top-level executions
    pub threads: usize,
    /// Worker threads of the graph member pool
    pub graph_threads: usize,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            graph_threads: DEFAULT_GRAPH_THREADS,
        }
    }
}

/// A parsed runbook
#[derive(Debug, Clone)]
pub struct Runbook {
    /// Directory shell jobs run in
    pub base_dir: PathBuf,
    pub settings: SchedulerSettings,
    pub jobs: BTreeMap<String, JobDef>,
    pub definitions: JobNodes,
    pub triggers: BTreeMap<String, TriggerDef>,
}

impl Runbook {
    /// Metadata of every shell job, keyed by name
    pub fn job_metadata(&self) -> BTreeMap<String, JobMetadata> {
        self.jobs
            .iter()
            .map(|(name, def)| (name.clone(), def.metadata()))
            .collect()
    }

    /// Every runnable name: jobs and graph definitions, sorted
    pub fn names(&self) -> Vec<String> {
        self.jobs
            .keys()
            .chain(self.definitions.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.jobs.contains_key(name) || self.definitions.contains_key(name)
    }

    /// Convert parameter text for running `name`
    ///
    /// Types come from the jobs the name resolves to; the first declaration
    /// of a parameter wins and undeclared keys stay strings.
    pub fn convert_params(
        &self,
        name: &str,
        raw: &BTreeMap<String, String>,
    ) -> Result<JobParams, GraphError> {
        let metadata = self.job_metadata();
        let graph = build_graph(name, &self.definitions, &metadata)?;

        let mut seen = BTreeSet::new();
        let mut builder = JobMetadata::builder(name);
        for execution in graph.executions() {
            let Some(job) = metadata.get(&execution.job) else {
                continue;
            };
            for param in job.params() {
                if seen.insert(param.name.clone()) {
                    builder = builder.param(param.clone());
                }
            }
        }
        builder
            .build()
            .convert_params(raw)
            .map_err(|source| GraphError::Params {
                job: name.to_string(),
                source,
            })
    }

    /// Registry builder holding the shell jobs and graph definitions
    ///
    /// Callers add listeners, metrics sinks or decorators before building.
    pub fn registry_builder(&self) -> JobRegistryBuilder {
        let jobs = self
            .jobs
            .values()
            .map(|def| -> Arc<dyn Job> { Arc::new(def.to_job(&self.base_dir)) });
        JobRegistry::builder()
            .jobs(jobs)
            .definitions(self.definitions.clone())
            .graph_threads(self.settings.graph_threads)
    }

    pub fn registry(&self) -> Result<JobRegistry, RegistryError> {
        self.registry_builder().build()
    }

    /// Scheduler over `registry` with every trigger added (not yet started)
    pub fn scheduler(&self, registry: Arc<JobRegistry>) -> Result<Scheduler, SchedulerError> {
        let scheduler = Scheduler::builder(registry)
            .threads(self.settings.threads)
            .build();
        for trigger in self.triggers.values() {
            let params = self
                .convert_params(&trigger.job, &trigger.params)
                .map_err(RegistryError::from)?;
            let builder = match &trigger.schedule {
                ScheduleDef::Cron(expr) => scheduler.new_cron_trigger(expr.clone()),
                ScheduleDef::FixedRate(period) => scheduler.new_fixed_rate_trigger(*period),
                ScheduleDef::FixedDelay(delay) => scheduler.new_fixed_delay_trigger(*delay),
            };
            builder
                .job_name(&trigger.job)
                .trigger_name(&trigger.name)
                .params(params)
                .initial_delay(trigger.initial_delay)
                .add()?;
        }
        Ok(scheduler)
    }
}

#[cfg(test)]
#[path = "runbook_tests.rs"]
mod tests;
