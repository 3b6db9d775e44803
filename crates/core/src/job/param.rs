// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed job parameters

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parameters passed to a job run, keyed by parameter name
pub type JobParams = BTreeMap<String, ParamValue>;

/// Errors converting parameter text into typed values
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("invalid value '{value}' for {kind} parameter '{name}'")]
    InvalidValue {
        name: String,
        kind: ParamType,
        value: String,
    },

    #[error("unknown parameter type: {0}")]
    UnknownType(String),
}

/// Declared type of a job parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Long,
    Double,
    Boolean,
    Date,
    DateTime,
}

impl ParamType {
    /// Convert parameter text for the parameter called `name`
    pub fn parse(self, name: &str, text: &str) -> Result<ParamValue, ParamError> {
        let invalid = || ParamError::InvalidValue {
            name: name.to_string(),
            kind: self,
            value: text.to_string(),
        };
        let trimmed = text.trim();
        match self {
            ParamType::String => Ok(ParamValue::String(text.to_string())),
            ParamType::Long => trimmed.parse().map(ParamValue::Long).map_err(|_| invalid()),
            ParamType::Double => trimmed
                .parse()
                .map(ParamValue::Double)
                .map_err(|_| invalid()),
            ParamType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(ParamValue::Boolean(true)),
                "false" | "no" | "0" => Ok(ParamValue::Boolean(false)),
                _ => Err(invalid()),
            },
            ParamType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(ParamValue::Date)
                .map_err(|_| invalid()),
            ParamType::DateTime => DateTime::parse_from_rfc3339(trimmed)
                .map(ParamValue::DateTime)
                .map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::String => "string",
            ParamType::Long => "long",
            ParamType::Double => "double",
            ParamType::Boolean => "boolean",
            ParamType::Date => "date",
            ParamType::DateTime => "datetime",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ParamType {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ParamType::String),
            "long" => Ok(ParamType::Long),
            "double" => Ok(ParamType::Double),
            "boolean" => Ok(ParamType::Boolean),
            "date" => Ok(ParamType::Date),
            "datetime" => Ok(ParamType::DateTime),
            other => Err(ParamError::UnknownType(other.to_string())),
        }
    }
}

/// A typed parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ParamValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => write!(f, "{}", s),
            ParamValue::Long(v) => write!(f, "{}", v),
            ParamValue::Double(v) => write!(f, "{}", v),
            ParamValue::Boolean(v) => write!(f, "{}", v),
            ParamValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            ParamValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Long(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Boolean(v)
    }
}

/// Declaration of one parameter a job accepts
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMetadata {
    pub name: String,
    pub kind: ParamType,
    pub default: Option<ParamValue>,
}

impl ParameterMetadata {
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::String)
    }

    pub fn long(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Long)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Date)
    }

    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the default from text, converting it with this parameter's type
    pub fn with_default_text(mut self, text: &str) -> Result<Self, ParamError> {
        self.default = Some(self.parse(text)?);
        Ok(self)
    }

    /// Convert text into this parameter's type
    pub fn parse(&self, text: &str) -> Result<ParamValue, ParamError> {
        self.kind.parse(&self.name, text)
    }
}

#[cfg(test)]
#[path = "param_tests.rs"]
mod tests;
