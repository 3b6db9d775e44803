// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Runbook parsing and shell job definitions

mod job;
mod parser;
mod runbook;
mod template;
mod trigger;

pub use job::{param_env_name, JobDef, ShellJob};
pub use parser::{load_runbook, parse_runbook, LoadError, ParseError};
pub use runbook::{Runbook, SchedulerSettings};
pub use template::{interpolate, placeholders, shell_quote};
pub use trigger::{ScheduleDef, TriggerDef};
