// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger schedules and next-execution computation

use chrono::{DateTime, Local, Utc};
use jx_core::CronExpression;
use std::fmt;
use std::time::Duration;

/// When a trigger fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// At every instant matching the expression, in local time
    Cron(CronExpression),
    /// Every `period` measured from the previous scheduled instant
    FixedRate {
        period: Duration,
        initial_delay: Duration,
    },
    /// `delay` after the previous run completed
    FixedDelay {
        delay: Duration,
        initial_delay: Duration,
    },
}

/// What a timer remembers between runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleContext {
    pub last_scheduled: Option<DateTime<Utc>>,
    pub last_completion: Option<DateTime<Utc>>,
}

impl Schedule {
    /// Next instant to fire at, or `None` when the schedule is exhausted
    pub fn next_execution(
        &self,
        ctx: &ScheduleContext,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self {
            Schedule::Cron(expression) => {
                // never fire the same instant twice if the clock lags the timer
                let after = match ctx.last_scheduled {
                    Some(scheduled) if scheduled > now => scheduled,
                    _ => now,
                };
                expression
                    .next(&after.with_timezone(&Local))
                    .map(|next| next.with_timezone(&Utc))
            }
            Schedule::FixedRate {
                period,
                initial_delay,
            } => match ctx.last_scheduled {
                None => add(now, *initial_delay),
                Some(scheduled) => add(scheduled, *period),
            },
            Schedule::FixedDelay {
                delay,
                initial_delay,
            } => match ctx.last_completion {
                None => add(now, *initial_delay),
                Some(completed) => add(completed, *delay),
            },
        }
    }
}

fn add(instant: DateTime<Utc>, duration: Duration) -> Option<DateTime<Utc>> {
    instant.checked_add_signed(chrono::Duration::from_std(duration).ok()?)
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Cron(expression) => write!(f, "cron({})", expression),
            Schedule::FixedRate {
                period,
                initial_delay,
            } => write!(
                f,
                "fixed_rate({}, initial {})",
                humantime::format_duration(*period),
                humantime::format_duration(*initial_delay)
            ),
            Schedule::FixedDelay {
                delay,
                initial_delay,
            } => write!(
                f,
                "fixed_delay({}, initial {})",
                humantime::format_duration(*delay),
                humantime::format_duration(*initial_delay)
            ),
        }
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
