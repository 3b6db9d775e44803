// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Triggers and their scheduling state machine
//!
//! ```text
//! Unscheduled --schedule--> Scheduled --cancel--> Canceled
//!                              ^                     |
//!                              +------schedule-------+
//! ```
//!
//! Every transition happens under the trigger's own mutex, so at most one
//! timer is alive per trigger.

use super::schedule::Schedule;
use super::timer;
use super::SchedulerInner;
use chrono::{DateTime, Utc};
use jx_core::JobParams;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Identity of a trigger: trigger names are unique per job
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerKey {
    pub job: String,
    pub trigger: String,
}

impl TriggerKey {
    pub fn new(job: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            trigger: trigger.into(),
        }
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.job, self.trigger)
    }
}

/// Observable scheduling state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStatus {
    Unscheduled,
    Scheduled,
    Canceled,
}

enum TriggerState {
    Unscheduled,
    Scheduled(Timer),
    Canceled,
}

struct Timer {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// A schedule bound to a job
pub struct Trigger {
    key: TriggerKey,
    params: JobParams,
    schedule: Schedule,
    state: Mutex<TriggerState>,
    next_fire: Mutex<Option<DateTime<Utc>>>,
}

impl Trigger {
    pub(crate) fn new(key: TriggerKey, schedule: Schedule, params: JobParams) -> Self {
        Self {
            key,
            params,
            schedule,
            state: Mutex::new(TriggerState::Unscheduled),
            next_fire: Mutex::new(None),
        }
    }

    pub fn key(&self) -> &TriggerKey {
        &self.key
    }

    pub fn job_name(&self) -> &str {
        &self.key.job
    }

    pub fn name(&self) -> &str {
        &self.key.trigger
    }

    pub fn params(&self) -> &JobParams {
        &self.params
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn status(&self) -> TriggerStatus {
        match &*self.state.lock().unwrap_or_else(|e| e.into_inner()) {
            TriggerState::Unscheduled => TriggerStatus::Unscheduled,
            TriggerState::Scheduled(timer) if timer.task.is_finished() => {
                TriggerStatus::Unscheduled
            }
            TriggerState::Scheduled(_) => TriggerStatus::Scheduled,
            TriggerState::Canceled => TriggerStatus::Canceled,
        }
    }

    /// Whether a live timer drives this trigger
    pub fn is_scheduled(&self) -> bool {
        self.status() == TriggerStatus::Scheduled
    }

    /// Instant the live timer is armed for
    pub fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        *self.next_fire.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_next_fire(&self, next: Option<DateTime<Utc>>) {
        *self.next_fire.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }

    /// Start a timer unless one is already alive
    ///
    /// Each call starts from a fresh schedule context.
    pub(crate) fn start_timer(self: &Arc<Self>, scheduler: &Arc<SchedulerInner>) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let TriggerState::Scheduled(timer) = &*state {
            if !timer.task.is_finished() {
                return false;
            }
        }

        let token = CancellationToken::new();
        let task = tokio::spawn(timer::run(
            Arc::clone(self),
            Arc::clone(scheduler),
            token.clone(),
        ));
        *state = TriggerState::Scheduled(Timer { token, task });
        tracing::info!(trigger = %self.key, schedule = %self.schedule, "trigger scheduled");
        true
    }

    /// Stop the live timer
    ///
    /// A run in flight finishes unless `interrupt` is set; no further run is
    /// armed either way. Returns false when no timer is alive, including one
    /// that stopped after its schedule ran out.
    pub(crate) fn cancel(&self, interrupt: bool) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match std::mem::replace(&mut *state, TriggerState::Canceled) {
            TriggerState::Scheduled(timer) if timer.task.is_finished() => {
                *state = TriggerState::Unscheduled;
                false
            }
            TriggerState::Scheduled(timer) => {
                timer.token.cancel();
                if interrupt {
                    timer.task.abort();
                }
                self.set_next_fire(None);
                tracing::info!(trigger = %self.key, interrupt, "trigger canceled");
                true
            }
            previous => {
                *state = previous;
                false
            }
        }
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("key", &self.key)
            .field("schedule", &self.schedule)
            .field("status", &self.status())
            .finish()
    }
}
