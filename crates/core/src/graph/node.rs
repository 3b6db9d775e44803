// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative job graph node definitions
//!
//! Definitions come from configuration as a map of name to node. A single
//! job node overrides parameters and dependencies of a job; a group node
//! nests further definitions that shadow the enclosing ones.

use crate::job::JobMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node definitions keyed by name
pub type JobNodes = BTreeMap<String, JobNode>;

/// A single job or a nested group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobNode {
    Single(SingleJobNode),
    Group(GroupNode),
}

impl JobNode {
    pub fn single() -> SingleJobNode {
        SingleJobNode::default()
    }

    pub fn group() -> GroupNode {
        GroupNode::default()
    }
}

impl From<SingleJobNode> for JobNode {
    fn from(node: SingleJobNode) -> Self {
        JobNode::Single(node)
    }
}

impl From<GroupNode> for JobNode {
    fn from(node: GroupNode) -> Self {
        JobNode::Group(node)
    }
}

/// Overrides for one job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleJobNode {
    /// Job to run when it differs from the definition's name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    /// Parameter overrides as text, converted with the job's declarations
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Explicit dependencies; `None` inherits the job's declared ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
}

impl SingleJobNode {
    /// Default node for a job: no overrides, declared dependencies
    pub fn from_metadata(metadata: &JobMetadata) -> Self {
        Self {
            job: None,
            params: BTreeMap::new(),
            depends_on: Some(metadata.depends_on().iter().cloned().collect()),
        }
    }

    pub fn with_job(mut self, job: impl Into<String>) -> Self {
        self.job = Some(job.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_depends_on<I, S>(mut self, jobs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = Some(jobs.into_iter().map(Into::into).collect());
        self
    }

    /// Layer this node on top of `base`
    ///
    /// Parameters merge key by key with this node winning; the job and the
    /// dependency list are taken from this node when set, else from `base`.
    pub fn merge(&self, base: &SingleJobNode) -> SingleJobNode {
        let mut params = base.params.clone();
        params.extend(self.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        SingleJobNode {
            job: self.job.clone().or_else(|| base.job.clone()),
            params,
            depends_on: self
                .depends_on
                .clone()
                .or_else(|| base.depends_on.clone()),
        }
    }
}

/// A named set of nested definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    #[serde(default)]
    pub jobs: JobNodes,
}

impl GroupNode {
    pub fn with(mut self, name: impl Into<String>, node: impl Into<JobNode>) -> Self {
        self.jobs.insert(name.into(), node.into());
        self
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
