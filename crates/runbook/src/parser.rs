// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runbook TOML parsing

use crate::job::JobDef;
use crate::runbook::{Runbook, SchedulerSettings};
use crate::trigger::{ScheduleDef, TriggerDef};
use jx_core::{
    build_graph, CronExpression, GraphError, GroupNode, JobNode, JobNodes, ParamError, ParamType,
    ParameterMetadata, SingleJobNode,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during runbook parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("{location}: {source}")]
    Param {
        location: String,
        #[source]
        source: ParamError,
    },
    #[error("trigger '{name}': {reason}")]
    Trigger { name: String, reason: String },
    #[error("invalid job graph: {0}")]
    Graph(#[from] GraphError),
}

/// Errors reading a runbook file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRunbook {
    #[serde(default)]
    scheduler: Option<RawScheduler>,
    #[serde(default)]
    job: BTreeMap<String, RawJob>,
    #[serde(default)]
    graph: BTreeMap<String, RawNode>,
    #[serde(default)]
    trigger: BTreeMap<String, RawTrigger>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScheduler {
    threads: Option<usize>,
    graph_threads: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawJob {
    run: String,
    lock: Option<String>,
    #[serde(default)]
    depends_on: Vec<String>,
    #[serde(default)]
    params: BTreeMap<String, RawParam>,
    workdir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParam {
    #[serde(rename = "type")]
    kind: ParamType,
    default: Option<toml::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNode {
    #[serde(rename = "type")]
    kind: Option<String>,
    job: Option<String>,
    #[serde(default)]
    params: BTreeMap<String, toml::Value>,
    depends_on: Option<Vec<String>>,
    jobs: Option<BTreeMap<String, RawNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTrigger {
    job: String,
    cron: Option<String>,
    #[serde(default, with = "humantime_serde")]
    fixed_rate: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    fixed_delay: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    initial_delay: Option<Duration>,
    #[serde(default)]
    params: BTreeMap<String, toml::Value>,
}

/// Parse a runbook from TOML content
///
/// Relative job working directories resolve against the current directory;
/// use [`load_runbook`] to resolve them against the file's directory.
pub fn parse_runbook(content: &str) -> Result<Runbook, ParseError> {
    let raw: RawRunbook = toml::from_str(content)?;

    let settings = parse_settings(raw.scheduler)?;

    let mut jobs = BTreeMap::new();
    for (name, job) in raw.job {
        let def = parse_job(&name, job)?;
        jobs.insert(name, def);
    }

    let mut definitions = JobNodes::new();
    for (name, node) in raw.graph {
        let location = format!("graph.{}", name);
        let node = parse_node(&location, node)?;
        definitions.insert(name, node);
    }

    let mut runbook = Runbook {
        base_dir: PathBuf::from("."),
        settings,
        jobs,
        definitions,
        triggers: BTreeMap::new(),
    };

    // Every runnable name must resolve into an acyclic graph
    let metadata = runbook.job_metadata();
    for name in runbook.names() {
        build_graph(&name, &runbook.definitions, &metadata)?;
    }

    for (name, trigger) in raw.trigger {
        let def = parse_trigger(&runbook, &name, trigger)?;
        runbook.triggers.insert(name, def);
    }

    Ok(runbook)
}

/// Read and parse a runbook file; jobs run relative to its directory
pub fn load_runbook(path: &Path) -> Result<Runbook, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut runbook = parse_runbook(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    runbook.base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tracing::debug!(
        path = %path.display(),
        jobs = runbook.jobs.len(),
        triggers = runbook.triggers.len(),
        "loaded runbook"
    );
    Ok(runbook)
}

fn parse_settings(raw: Option<RawScheduler>) -> Result<SchedulerSettings, ParseError> {
    let mut settings = SchedulerSettings::default();
    let Some(raw) = raw else {
        return Ok(settings);
    };
    if let Some(threads) = raw.threads {
        if threads == 0 {
            return Err(ParseError::InvalidFormat(
                "scheduler.threads must be at least 1".to_string(),
            ));
        }
        settings.threads = threads;
    }
    if let Some(threads) = raw.graph_threads {
        if threads == 0 {
            return Err(ParseError::InvalidFormat(
                "scheduler.graph_threads must be at least 1".to_string(),
            ));
        }
        settings.graph_threads = threads;
    }
    Ok(settings)
}

fn parse_job(name: &str, raw: RawJob) -> Result<JobDef, ParseError> {
    if raw.run.trim().is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "job.{}.run must not be empty",
            name
        )));
    }

    let mut params = Vec::new();
    for (param_name, param) in raw.params {
        let location = format!("job.{}.params.{}", name, param_name);
        let mut metadata = ParameterMetadata::new(param_name, param.kind);
        if let Some(default) = param.default {
            let text = value_text(&location, &default)?;
            metadata = metadata
                .with_default_text(&text)
                .map_err(|source| ParseError::Param { location, source })?;
        }
        params.push(metadata);
    }

    Ok(JobDef {
        name: name.to_string(),
        run: raw.run,
        lock: raw.lock,
        depends_on: raw.depends_on,
        params,
        workdir: raw.workdir,
    })
}

fn parse_node(location: &str, raw: RawNode) -> Result<JobNode, ParseError> {
    let is_group = match raw.kind.as_deref() {
        Some("group") => true,
        Some("single") => false,
        None => raw.jobs.is_some(),
        Some(other) => {
            return Err(ParseError::InvalidFormat(format!(
                "{}.type must be \"single\" or \"group\", got \"{}\"",
                location, other
            )))
        }
    };

    if is_group {
        if raw.job.is_some() || raw.depends_on.is_some() || !raw.params.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "{}: a group only takes `jobs`",
                location
            )));
        }
        let mut group = GroupNode::default();
        for (name, node) in raw.jobs.unwrap_or_default() {
            let nested = format!("{}.jobs.{}", location, name);
            group.jobs.insert(name, parse_node(&nested, node)?);
        }
        return Ok(JobNode::Group(group));
    }

    if raw.jobs.is_some() {
        return Err(ParseError::InvalidFormat(format!(
            "{}: `jobs` is only allowed in a group",
            location
        )));
    }
    let mut params = BTreeMap::new();
    for (name, value) in raw.params {
        let text = value_text(&format!("{}.params.{}", location, name), &value)?;
        params.insert(name, text);
    }
    Ok(JobNode::Single(SingleJobNode {
        job: raw.job,
        params,
        depends_on: raw.depends_on,
    }))
}

fn parse_trigger(runbook: &Runbook, name: &str, raw: RawTrigger) -> Result<TriggerDef, ParseError> {
    let invalid = |reason: String| ParseError::Trigger {
        name: name.to_string(),
        reason,
    };

    let schedule = match (raw.cron, raw.fixed_rate, raw.fixed_delay) {
        (Some(expr), None, None) => {
            if raw.initial_delay.is_some() {
                return Err(invalid("initial_delay cannot be used with cron".to_string()));
            }
            CronExpression::parse(&expr).map_err(|e| invalid(e.to_string()))?;
            ScheduleDef::Cron(expr)
        }
        (None, Some(period), None) => ScheduleDef::FixedRate(period),
        (None, None, Some(delay)) => ScheduleDef::FixedDelay(delay),
        _ => {
            return Err(invalid(
                "exactly one of cron, fixed_rate, fixed_delay is required".to_string(),
            ))
        }
    };
    if matches!(&schedule, ScheduleDef::FixedRate(d) | ScheduleDef::FixedDelay(d) if d.is_zero()) {
        return Err(invalid("period must be greater than zero".to_string()));
    }

    if !runbook.contains(&raw.job) {
        return Err(invalid(format!("unknown job: {}", raw.job)));
    }

    let mut params = BTreeMap::new();
    for (param, value) in raw.params {
        let text = value_text(&format!("trigger.{}.params.{}", name, param), &value)?;
        params.insert(param, text);
    }
    runbook
        .convert_params(&raw.job, &params)
        .map_err(|e| invalid(e.to_string()))?;

    Ok(TriggerDef {
        name: name.to_string(),
        job: raw.job,
        schedule,
        initial_delay: raw.initial_delay.unwrap_or_default(),
        params,
    })
}

/// Parameter text for a scalar TOML value
fn value_text(location: &str, value: &toml::Value) -> Result<String, ParseError> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(d) => Ok(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => Err(ParseError::InvalidFormat(format!(
            "{} must be a scalar value",
            location
        ))),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
