// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency graph construction
//!
//! Resolution is depth-first from the root name. Every single job reached
//! becomes one [`JobExecution`]; groups contribute no execution of their
//! own, their children attach directly where the group would have been.

use super::node::{GroupNode, JobNode, JobNodes, SingleJobNode};
use super::GraphError;
use crate::job::{JobMetadata, JobParams};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One resolved occurrence of a single job within a graph
#[derive(Debug, Clone, PartialEq)]
pub struct JobExecution {
    /// Name within the graph (the definition name)
    pub name: String,
    /// Name of the job that actually runs
    pub job: String,
    /// Declared defaults overlaid with converted overrides
    pub params: JobParams,
}

/// Directed acyclic graph of executions; an edge `a -> b` means `b` waits for `a`
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<JobExecution>,
    index: HashMap<String, usize>,
    edges: BTreeSet<(usize, usize)>,
}

impl DependencyGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Executions in discovery order
    pub fn executions(&self) -> &[JobExecution] {
        &self.nodes
    }

    pub fn get(&self, name: &str) -> Option<&JobExecution> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    /// Names of the executions `name` directly waits for
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        let Some(&target) = self.index.get(name) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .filter(|(_, to)| *to == target)
            .map(|(from, _)| self.nodes[*from].name.as_str())
            .collect()
    }

    pub(crate) fn edges(&self) -> &BTreeSet<(usize, usize)> {
        &self.edges
    }

    fn add(&mut self, execution: JobExecution) -> usize {
        let idx = self.nodes.len();
        self.index.insert(execution.name.clone(), idx);
        self.nodes.push(execution);
        idx
    }
}

/// Resolved definition for one name
enum Resolved<'a> {
    Single { job: String, node: SingleJobNode },
    Group(&'a GroupNode),
}

/// Build the dependency graph rooted at `root`
///
/// `definitions` are the configured nodes; `jobs` holds the metadata of
/// every runnable job. A name without a definition falls back to the job
/// of the same name with its declared dependencies.
pub fn build_graph(
    root: &str,
    definitions: &JobNodes,
    jobs: &BTreeMap<String, JobMetadata>,
) -> Result<DependencyGraph, GraphError> {
    let mut builder = GraphBuilder {
        jobs,
        graph: DependencyGraph::default(),
        path: Vec::new(),
        resolved: HashMap::new(),
    };
    builder.visit(root, None, &[definitions])?;
    Ok(builder.graph)
}

struct GraphBuilder<'a> {
    jobs: &'a BTreeMap<String, JobMetadata>,
    graph: DependencyGraph,
    /// Names on the current resolution path, for cycle detection
    path: Vec<String>,
    /// Executions produced by each fully resolved name
    resolved: HashMap<String, Vec<usize>>,
}

impl<'a> GraphBuilder<'a> {
    fn visit(
        &mut self,
        name: &str,
        required_by: Option<&str>,
        scopes: &[&'a JobNodes],
    ) -> Result<Vec<usize>, GraphError> {
        if let Some(produced) = self.resolved.get(name) {
            return Ok(produced.clone());
        }
        if self.path.iter().any(|n| n == name) {
            let mut path = self.path.clone();
            path.push(name.to_string());
            return Err(GraphError::Cycle { path });
        }

        self.path.push(name.to_string());
        let produced = match self.resolve(name, required_by, scopes)? {
            Resolved::Single { job, node } => vec![self.visit_single(name, job, node, scopes)?],
            Resolved::Group(group) => {
                let mut nested = scopes.to_vec();
                nested.push(&group.jobs);
                let mut produced = Vec::new();
                for child in group.jobs.keys() {
                    produced.extend(self.visit(child, Some(name), &nested)?);
                }
                produced
            }
        };
        self.path.pop();

        self.resolved.insert(name.to_string(), produced.clone());
        Ok(produced)
    }

    fn visit_single(
        &mut self,
        name: &str,
        job: String,
        node: SingleJobNode,
        scopes: &[&'a JobNodes],
    ) -> Result<usize, GraphError> {
        let metadata = self.metadata(&job, Some(name))?;
        let mut params = metadata.default_params();
        let overrides = metadata
            .convert_params(&node.params)
            .map_err(|source| GraphError::Params {
                job: name.to_string(),
                source,
            })?;
        params.extend(overrides);

        let idx = self.graph.add(JobExecution {
            name: name.to_string(),
            job,
            params,
        });
        for dependency in node.depends_on.unwrap_or_default() {
            for from in self.visit(&dependency, Some(name), scopes)? {
                self.graph.edges.insert((from, idx));
            }
        }
        Ok(idx)
    }

    /// Merge the definitions visible for `name`, innermost scope winning
    fn resolve(
        &self,
        name: &str,
        required_by: Option<&str>,
        scopes: &[&'a JobNodes],
    ) -> Result<Resolved<'a>, GraphError> {
        let mut layered: Option<Resolved<'a>> = None;
        for &scope in scopes {
            layered = match (scope.get(name), layered) {
                (None, current) => current,
                (Some(JobNode::Group(group)), _) => Some(Resolved::Group(group)),
                (Some(JobNode::Single(node)), Some(Resolved::Single { node: base, .. })) => {
                    Some(self.single(name, node.merge(&base)))
                }
                (Some(JobNode::Single(node)), _) => Some(self.single(name, node.clone())),
            };
        }

        match layered {
            Some(Resolved::Single { job, node }) => {
                let metadata = if job == name {
                    self.metadata(&job, required_by)?
                } else {
                    self.metadata(&job, Some(name))?
                };
                let base = SingleJobNode::from_metadata(metadata);
                Ok(Resolved::Single {
                    node: node.merge(&base),
                    job,
                })
            }
            Some(group) => Ok(group),
            None => {
                let metadata = self.metadata(name, required_by)?;
                Ok(Resolved::Single {
                    job: name.to_string(),
                    node: SingleJobNode::from_metadata(metadata),
                })
            }
        }
    }

    fn single(&self, name: &str, node: SingleJobNode) -> Resolved<'a> {
        Resolved::Single {
            job: node.job.clone().unwrap_or_else(|| name.to_string()),
            node,
        }
    }

    fn metadata(
        &self,
        job: &str,
        required_by: Option<&str>,
    ) -> Result<&'a JobMetadata, GraphError> {
        self.jobs.get(job).ok_or_else(|| GraphError::UnknownJob {
            name: job.to_string(),
            required_by: required_by.map(str::to_string),
        })
    }
}
