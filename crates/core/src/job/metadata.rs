// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable job descriptions

use super::param::{JobParams, ParamError, ParamValue, ParameterMetadata};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Describes a job: its name, lock, declared parameters and dependencies
///
/// Cheap to clone; the contents are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct JobMetadata {
    inner: Arc<MetadataInner>,
}

#[derive(Debug, PartialEq)]
struct MetadataInner {
    name: String,
    lock_name: String,
    params: Vec<ParameterMetadata>,
    group: bool,
    depends_on: BTreeSet<String>,
}

impl JobMetadata {
    pub fn builder(name: impl Into<String>) -> JobMetadataBuilder {
        JobMetadataBuilder::new(name)
    }

    /// Metadata with just a name and no parameters or dependencies
    pub fn named(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Mutual-exclusion key; defaults to the job name
    pub fn lock_name(&self) -> &str {
        &self.inner.lock_name
    }

    pub fn params(&self) -> &[ParameterMetadata] {
        &self.inner.params
    }

    pub fn param(&self, name: &str) -> Option<&ParameterMetadata> {
        self.inner.params.iter().find(|p| p.name == name)
    }

    pub fn is_group(&self) -> bool {
        self.inner.group
    }

    pub fn depends_on(&self) -> &BTreeSet<String> {
        &self.inner.depends_on
    }

    /// Same job exposed under another name; the lock name is kept
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MetadataInner {
                name: name.into(),
                lock_name: self.inner.lock_name.clone(),
                params: self.inner.params.clone(),
                group: self.inner.group,
                depends_on: self.inner.depends_on.clone(),
            }),
        }
    }

    /// Declared defaults for every parameter that has one
    pub fn default_params(&self) -> JobParams {
        self.inner
            .params
            .iter()
            .filter_map(|p| p.default.clone().map(|v| (p.name.clone(), v)))
            .collect()
    }

    /// Convert string parameters using the declared types
    ///
    /// Keys without a declaration pass through as strings.
    pub fn convert_params(&self, raw: &BTreeMap<String, String>) -> Result<JobParams, ParamError> {
        raw.iter()
            .map(|(name, text)| {
                let value = match self.param(name) {
                    Some(declared) => declared.parse(text)?,
                    None => ParamValue::String(text.clone()),
                };
                Ok((name.clone(), value))
            })
            .collect()
    }
}

/// Builder for [`JobMetadata`]
#[derive(Debug, Clone)]
pub struct JobMetadataBuilder {
    name: String,
    lock_name: Option<String>,
    params: Vec<ParameterMetadata>,
    group: bool,
    depends_on: BTreeSet<String>,
}

impl JobMetadataBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lock_name: None,
            params: Vec::new(),
            group: false,
            depends_on: BTreeSet::new(),
        }
    }

    pub fn lock_name(mut self, lock_name: impl Into<String>) -> Self {
        self.lock_name = Some(lock_name.into());
        self
    }

    /// Declare a parameter; a later declaration with the same name replaces it
    pub fn param(mut self, param: ParameterMetadata) -> Self {
        self.params.retain(|p| p.name != param.name);
        self.params.push(param);
        self
    }

    pub fn group(mut self) -> Self {
        self.group = true;
        self
    }

    pub fn depends_on(mut self, job: impl Into<String>) -> Self {
        self.depends_on.insert(job.into());
        self
    }

    pub fn build(self) -> JobMetadata {
        let lock_name = self.lock_name.unwrap_or_else(|| self.name.clone());
        JobMetadata {
            inner: Arc::new(MetadataInner {
                name: self.name,
                lock_name,
                params: self.params,
                group: self.group,
                depends_on: self.depends_on,
            }),
        }
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
