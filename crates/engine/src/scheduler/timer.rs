// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Self-rescheduling timer behind a scheduled trigger

use super::schedule::ScheduleContext;
use super::trigger::Trigger;
use super::SchedulerInner;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fire `trigger` until its schedule is exhausted or `token` is canceled
///
/// Runs are never preempted by a cancel; the token is checked again after
/// each run before the next one is armed.
pub(crate) async fn run(
    trigger: Arc<Trigger>,
    scheduler: Arc<SchedulerInner>,
    token: CancellationToken,
) {
    let key = trigger.key().clone();
    let mut ctx = ScheduleContext::default();
    loop {
        let now = scheduler.clock.now();
        let Some(next) = trigger.schedule().next_execution(&ctx, now) else {
            tracing::debug!(trigger = %key, "no further executions");
            trigger.set_next_fire(None);
            return;
        };
        trigger.set_next_fire(Some(next));
        tracing::debug!(trigger = %key, next = %next, "timer armed");

        let delay = (next - now).to_std().unwrap_or(Duration::ZERO);
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }

        ctx.last_scheduled = Some(next);
        match scheduler.run_job(&key.job, trigger.params().clone()).await {
            Ok(outcome) => {
                tracing::debug!(trigger = %key, outcome = %outcome, "trigger run finished")
            }
            Err(e) => tracing::warn!(trigger = %key, error = %e, "trigger run failed"),
        }
        ctx.last_completion = Some(scheduler.clock.now());

        if token.is_cancelled() {
            return;
        }
    }
}
