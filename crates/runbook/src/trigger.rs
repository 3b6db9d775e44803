// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger definitions

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// When a trigger fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDef {
    Cron(String),
    FixedRate(Duration),
    FixedDelay(Duration),
}

impl fmt::Display for ScheduleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleDef::Cron(expr) => write!(f, "cron {expr}"),
            ScheduleDef::FixedRate(period) => {
                write!(f, "every {}", humantime::format_duration(*period))
            }
            ScheduleDef::FixedDelay(delay) => {
                write!(f, "{} after each run", humantime::format_duration(*delay))
            }
        }
    }
}

/// A `[trigger.<name>]` table
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerDef {
    pub name: String,
    pub job: String,
    pub schedule: ScheduleDef,
    pub initial_delay: Duration,
    /// Parameter text, converted with the target job's declarations
    pub params: BTreeMap<String, String>,
}
