// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jx list` - Show jobs, graphs and triggers

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use jx_core::JobNode;
use jx_runbook::Runbook;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct Listing {
    pub jobs: Vec<JobInfo>,
    pub graphs: Vec<GraphInfo>,
    pub triggers: Vec<TriggerInfo>,
}

#[derive(Debug, Serialize)]
pub struct JobInfo {
    pub name: String,
    pub run: String,
    pub lock: String,
    pub depends_on: Vec<String>,
    pub params: Vec<ParamInfo>,
}

#[derive(Debug, Serialize)]
pub struct ParamInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GraphInfo {
    pub name: String,
    /// "single" or "group"
    pub kind: &'static str,
    /// Aliased job for a single node, member names for a group
    pub jobs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TriggerInfo {
    pub name: String,
    pub job: String,
    pub schedule: String,
}

impl Listing {
    pub fn from_runbook(runbook: &Runbook) -> Self {
        let jobs = runbook
            .jobs
            .values()
            .map(|def| {
                let metadata = def.metadata();
                JobInfo {
                    name: def.name.clone(),
                    run: def.run.clone(),
                    lock: metadata.lock_name().to_string(),
                    depends_on: metadata.depends_on().iter().cloned().collect(),
                    params: metadata
                        .params()
                        .iter()
                        .map(|p| ParamInfo {
                            name: p.name.clone(),
                            kind: p.kind.to_string(),
                            default: p.default.as_ref().map(ToString::to_string),
                        })
                        .collect(),
                }
            })
            .collect();

        let graphs = runbook
            .definitions
            .iter()
            .map(|(name, node)| match node {
                JobNode::Single(single) => GraphInfo {
                    name: name.clone(),
                    kind: "single",
                    jobs: vec![single.job.clone().unwrap_or_else(|| name.clone())],
                },
                JobNode::Group(group) => GraphInfo {
                    name: name.clone(),
                    kind: "group",
                    jobs: group.jobs.keys().cloned().collect(),
                },
            })
            .collect();

        let triggers = runbook
            .triggers
            .values()
            .map(|t| TriggerInfo {
                name: t.name.clone(),
                job: t.job.clone(),
                schedule: t.schedule.to_string(),
            })
            .collect();

        Self {
            jobs,
            graphs,
            triggers,
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.jobs.is_empty() && self.graphs.is_empty() {
            return writeln!(f, "No jobs");
        }

        writeln!(f, "JOBS")?;
        for job in &self.jobs {
            let params: Vec<String> = job
                .params
                .iter()
                .map(|p| match &p.default {
                    Some(default) => format!("{}:{}={}", p.name, p.kind, default),
                    None => format!("{}:{}", p.name, p.kind),
                })
                .collect();
            write!(f, "  {:<20} {}", job.name, params.join(" "))?;
            if !job.depends_on.is_empty() {
                write!(f, " (after {})", job.depends_on.join(", "))?;
            }
            writeln!(f)?;
        }

        if !self.graphs.is_empty() {
            writeln!(f, "GRAPHS")?;
            for graph in &self.graphs {
                writeln!(f, "  {:<20} {:<6} {}", graph.name, graph.kind, graph.jobs.join(", "))?;
            }
        }

        if !self.triggers.is_empty() {
            writeln!(f, "TRIGGERS")?;
            for trigger in &self.triggers {
                writeln!(f, "  {:<20} {:<20} {}", trigger.name, trigger.job, trigger.schedule)?;
            }
        }
        Ok(())
    }
}

pub fn handle(args: ListArgs, runbook: &Runbook) -> Result<()> {
    output::print(&Listing::from_runbook(runbook), args.format)
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
