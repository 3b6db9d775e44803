// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing errors with hints

use std::fmt;

/// A line printed under the error message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    /// Background on the failure
    Note(String),
    /// A command or flag that may fix it
    Try(String),
}

#[derive(Debug)]
pub struct JxError {
    pub message: String,
    pub hints: Vec<Hint>,
}

impl JxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hints: Vec::new(),
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.hints.push(Hint::Note(note.into()));
        self
    }

    pub fn try_instead(mut self, fix: impl Into<String>) -> Self {
        self.hints.push(Hint::Try(fix.into()));
        self
    }

    /// A job name the runbook does not define
    pub fn unknown_job(name: &str, known: &[String]) -> Self {
        let similar: Vec<&str> = known
            .iter()
            .map(String::as_str)
            .filter(|k| k.contains(name) || name.contains(k))
            .collect();
        let err = Self::new(format!("unknown job: {name}"));
        let err = if similar.is_empty() {
            err
        } else {
            err.note(format!("similar names: {}", similar.join(", ")))
        };
        err.try_instead("jx list")
    }

    /// No runbook at the configured path
    pub fn config_not_found(path: &str) -> Self {
        Self::new(format!("runbook not found: {path}"))
            .note("jx reads jx.toml from the current directory by default")
            .try_instead("jx --config <path>")
    }
}

impl fmt::Display for JxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for hint in &self.hints {
            match hint {
                Hint::Note(note) => write!(f, "\n  note: {note}")?,
                Hint::Try(fix) => write!(f, "\n  try: {fix}")?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for JxError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
