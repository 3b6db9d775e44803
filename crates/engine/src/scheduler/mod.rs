// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler for triggers and one-off executions
//!
//! Top-level executions, whether started by a trigger or by a caller, run
//! on a pool bounded by `threads` concurrent runs. Graph members use the
//! registry's separate graph pool.

mod execution;
mod schedule;
mod timer;
mod trigger;

pub use execution::ExecutionBuilder;
pub use schedule::{Schedule, ScheduleContext};
pub use trigger::{Trigger, TriggerKey, TriggerStatus};

use crate::error::{RegistryError, SchedulerError};
use crate::registry::JobRegistry;
use crate::txid::{IdGen, UuidIdGen};
use jx_core::{Clock, CronExpression, JobOutcome, JobParams, ParamValue, SystemClock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_THREADS: usize = 4;

/// Schedules triggers and runs executions against a [`JobRegistry`]
///
/// Scheduling spawns tokio tasks, so triggers must be scheduled from
/// within a tokio runtime.
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

pub(crate) struct SchedulerInner {
    pub(crate) registry: Arc<JobRegistry>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) id_gen: Arc<dyn IdGen>,
    pub(crate) permits: Semaphore,
    triggers: Mutex<BTreeMap<TriggerKey, Arc<Trigger>>>,
    started: AtomicBool,
}

impl SchedulerInner {
    pub(crate) async fn run_job(
        &self,
        job_name: &str,
        params: JobParams,
    ) -> Result<JobOutcome, SchedulerError> {
        let job = self.registry.get_job(job_name)?;
        execution::execute_on(self, job, params).await
    }
}

impl Scheduler {
    pub fn builder(registry: Arc<JobRegistry>) -> SchedulerBuilder {
        SchedulerBuilder {
            registry,
            threads: DEFAULT_THREADS,
            clock: Arc::new(SystemClock),
            id_gen: Arc::new(UuidIdGen),
        }
    }

    pub fn new(registry: Arc<JobRegistry>) -> Self {
        Self::builder(registry).build()
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.inner.registry
    }

    pub fn new_cron_trigger(&self, expression: impl Into<String>) -> TriggerBuilder<'_> {
        TriggerBuilder::new(self, PendingSchedule::Cron(expression.into()))
    }

    pub fn new_fixed_rate_trigger(&self, period: Duration) -> TriggerBuilder<'_> {
        TriggerBuilder::new(self, PendingSchedule::FixedRate(period))
    }

    pub fn new_fixed_delay_trigger(&self, delay: Duration) -> TriggerBuilder<'_> {
        TriggerBuilder::new(self, PendingSchedule::FixedDelay(delay))
    }

    pub fn new_execution(&self) -> ExecutionBuilder<'_> {
        ExecutionBuilder::new(self)
    }

    /// Register a trigger; it is scheduled right away once the scheduler is started
    pub fn add_trigger(&self, trigger: Trigger) -> Result<Arc<Trigger>, SchedulerError> {
        if !self.inner.registry.contains(trigger.job_name()) {
            return Err(RegistryError::UnknownJob(trigger.job_name().to_string()).into());
        }
        let trigger = Arc::new(trigger);
        {
            let mut triggers = self.lock_triggers();
            if triggers.contains_key(trigger.key()) {
                return Err(SchedulerError::DuplicateTrigger {
                    job: trigger.job_name().to_string(),
                    trigger: trigger.name().to_string(),
                });
            }
            triggers.insert(trigger.key().clone(), Arc::clone(&trigger));
        }
        tracing::info!(trigger = %trigger.key(), schedule = %trigger.schedule(), "trigger added");
        if self.is_started() {
            trigger.start_timer(&self.inner);
        }
        Ok(trigger)
    }

    /// Every registered trigger, ordered by job then trigger name
    pub fn triggers(&self) -> Vec<Arc<Trigger>> {
        self.lock_triggers().values().cloned().collect()
    }

    pub fn scheduled_triggers(&self) -> Vec<Arc<Trigger>> {
        self.triggers()
            .into_iter()
            .filter(|t| t.is_scheduled())
            .collect()
    }

    pub fn trigger(&self, job: &str, trigger: &str) -> Option<Arc<Trigger>> {
        self.lock_triggers().get(&TriggerKey::new(job, trigger)).cloned()
    }

    /// Schedule every trigger; returns how many were newly scheduled
    pub fn schedule_all_triggers(&self) -> usize {
        self.count(self.triggers(), |t| t.start_timer(&self.inner))
    }

    pub fn schedule_triggers(&self, job: &str) -> usize {
        self.count(self.triggers_of(job), |t| t.start_timer(&self.inner))
    }

    pub fn schedule_trigger(&self, job: &str, trigger: &str) -> Result<bool, SchedulerError> {
        Ok(self.require(job, trigger)?.start_timer(&self.inner))
    }

    pub fn cancel_all_triggers(&self, interrupt: bool) -> usize {
        self.count(self.triggers(), |t| t.cancel(interrupt))
    }

    pub fn cancel_triggers(&self, job: &str, interrupt: bool) -> usize {
        self.count(self.triggers_of(job), |t| t.cancel(interrupt))
    }

    pub fn cancel_trigger(
        &self,
        job: &str,
        trigger: &str,
        interrupt: bool,
    ) -> Result<bool, SchedulerError> {
        Ok(self.require(job, trigger)?.cancel(interrupt))
    }

    /// Cancel and forget every trigger; returns how many were removed
    pub fn remove_all_triggers(&self) -> usize {
        let removed: Vec<_> = std::mem::take(&mut *self.lock_triggers()).into_values().collect();
        self.removed(removed)
    }

    pub fn remove_triggers(&self, job: &str) -> usize {
        let removed: Vec<_> = {
            let mut triggers = self.lock_triggers();
            let keys: Vec<_> = triggers.keys().filter(|k| k.job == job).cloned().collect();
            keys.iter().filter_map(|k| triggers.remove(k)).collect()
        };
        self.removed(removed)
    }

    pub fn remove_trigger(&self, job: &str, trigger: &str) -> bool {
        let removed = self.lock_triggers().remove(&TriggerKey::new(job, trigger));
        self.removed(removed.into_iter().collect()) == 1
    }

    /// Schedule all registered triggers and those added later
    pub fn start(&self) -> usize {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return 0;
        }
        let scheduled = self.schedule_all_triggers();
        tracing::info!(scheduled, "scheduler started");
        scheduled
    }

    pub fn is_started(&self) -> bool {
        self.inner.started.load(Ordering::SeqCst)
    }

    /// Cancel every trigger, interrupting runs in flight, and refuse new executions
    pub fn shutdown(&self) {
        self.inner.started.store(false, Ordering::SeqCst);
        let canceled = self.cancel_all_triggers(true);
        self.inner.permits.close();
        self.inner.registry.shutdown();
        tracing::info!(canceled, "scheduler shut down");
    }

    fn lock_triggers(&self) -> std::sync::MutexGuard<'_, BTreeMap<TriggerKey, Arc<Trigger>>> {
        self.inner.triggers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn triggers_of(&self, job: &str) -> Vec<Arc<Trigger>> {
        self.triggers()
            .into_iter()
            .filter(|t| t.job_name() == job)
            .collect()
    }

    fn require(&self, job: &str, trigger: &str) -> Result<Arc<Trigger>, SchedulerError> {
        self.trigger(job, trigger)
            .ok_or_else(|| SchedulerError::UnknownTrigger {
                job: job.to_string(),
                trigger: trigger.to_string(),
            })
    }

    fn count(&self, triggers: Vec<Arc<Trigger>>, f: impl Fn(&Arc<Trigger>) -> bool) -> usize {
        triggers.iter().filter(|t| f(t)).count()
    }

    fn removed(&self, triggers: Vec<Arc<Trigger>>) -> usize {
        for trigger in &triggers {
            trigger.cancel(false);
            tracing::info!(trigger = %trigger.key(), "trigger removed");
        }
        triggers.len()
    }
}

/// Builder for [`Scheduler`]
pub struct SchedulerBuilder {
    registry: Arc<JobRegistry>,
    threads: usize,
    clock: Arc<dyn Clock>,
    id_gen: Arc<dyn IdGen>,
}

impl SchedulerBuilder {
    /// Maximum concurrent top-level executions
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn id_gen(mut self, id_gen: Arc<dyn IdGen>) -> Self {
        self.id_gen = id_gen;
        self
    }

    pub fn build(self) -> Scheduler {
        Scheduler {
            inner: Arc::new(SchedulerInner {
                registry: self.registry,
                clock: self.clock,
                id_gen: self.id_gen,
                permits: Semaphore::new(self.threads.max(1)),
                triggers: Mutex::new(BTreeMap::new()),
                started: AtomicBool::new(false),
            }),
        }
    }
}

enum PendingSchedule {
    Cron(String),
    FixedRate(Duration),
    FixedDelay(Duration),
}

/// Builder returned by the `new_*_trigger` methods
#[must_use]
pub struct TriggerBuilder<'a> {
    scheduler: &'a Scheduler,
    schedule: PendingSchedule,
    initial_delay: Duration,
    job_name: Option<String>,
    trigger_name: Option<String>,
    params: JobParams,
}

impl<'a> TriggerBuilder<'a> {
    fn new(scheduler: &'a Scheduler, schedule: PendingSchedule) -> Self {
        Self {
            scheduler,
            schedule,
            initial_delay: Duration::ZERO,
            job_name: None,
            trigger_name: None,
            params: JobParams::new(),
        }
    }

    pub fn job_name(mut self, name: impl Into<String>) -> Self {
        self.job_name = Some(name.into());
        self
    }

    /// Defaults to the schedule's description
    pub fn trigger_name(mut self, name: impl Into<String>) -> Self {
        self.trigger_name = Some(name.into());
        self
    }

    pub fn params(mut self, params: JobParams) -> Self {
        self.params.extend(params);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Delay before the first run of a fixed-rate or fixed-delay trigger
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Build the trigger and register it with the scheduler
    pub fn add(self) -> Result<Arc<Trigger>, SchedulerError> {
        let job = self.job_name.ok_or(SchedulerError::MissingJobName)?;
        let schedule = match self.schedule {
            PendingSchedule::Cron(text) => {
                let expression =
                    CronExpression::parse(&text).map_err(|source| SchedulerError::Cron {
                        trigger: self.trigger_name.clone().unwrap_or_else(|| job.clone()),
                        source,
                    })?;
                Schedule::Cron(expression)
            }
            PendingSchedule::FixedRate(period) => Schedule::FixedRate {
                period,
                initial_delay: self.initial_delay,
            },
            PendingSchedule::FixedDelay(delay) => Schedule::FixedDelay {
                delay,
                initial_delay: self.initial_delay,
            },
        };
        let name = self.trigger_name.unwrap_or_else(|| schedule.to_string());
        self.scheduler
            .add_trigger(Trigger::new(TriggerKey::new(job, name), schedule, self.params))
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
