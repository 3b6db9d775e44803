// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topological batching

use super::builder::{DependencyGraph, JobExecution};

impl DependencyGraph {
    /// Split the graph into batches that can run one after another
    ///
    /// Every execution lands in exactly one batch, strictly after all of
    /// its dependencies. Members of a batch are independent of each other
    /// and keep discovery order.
    pub fn batches(&self) -> Vec<Vec<JobExecution>> {
        let mut in_degree = vec![0usize; self.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.len()];
        for &(from, to) in self.edges() {
            in_degree[to] += 1;
            dependents[from].push(to);
        }

        let mut ready: Vec<usize> = (0..self.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut batches = Vec::new();
        while !ready.is_empty() {
            let mut next = Vec::new();
            for &idx in &ready {
                for &dependent in &dependents[idx] {
                    in_degree[dependent] -= 1;
                    if in_degree[dependent] == 0 {
                        next.push(dependent);
                    }
                }
            }
            next.sort_unstable();
            let executions = self.executions();
            batches.push(ready.iter().map(|&i| executions[i].clone()).collect());
            ready = next;
        }
        batches
    }
}
