// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Six-field cron expressions with Quartz-style day extensions
//!
//! Fields, in order: seconds, minutes, hours, day-of-month, month,
//! day-of-week. Each field accepts `*`, single values, `a-b` ranges,
//! `a/b` and `a-b/c` steps, comma lists, and three-letter month or weekday
//! names. Day-of-month additionally accepts `L`, `L-n`, `LW` and `nW`;
//! day-of-week accepts `dL` and `d#n`. `?` is a synonym for `*` in both
//! day fields.
//!
//! When both day fields are restricted, a day matches if either one does.
//!
//! ```ignore
//! let cron = CronExpression::parse("0 30 9 * * MON-FRI")?;
//! let next = cron.next(&Utc::now());
//! ```

mod field;
mod parse;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use field::{CronField, FieldKind};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on iterations when searching for the next matching instant
pub const MAX_ATTEMPTS: usize = 366;

const MACROS: [(&str, &str); 7] = [
    ("@yearly", "0 0 0 1 1 *"),
    ("@annually", "0 0 0 1 1 *"),
    ("@monthly", "0 0 0 1 * *"),
    ("@weekly", "0 0 0 * * 0"),
    ("@daily", "0 0 0 * * *"),
    ("@midnight", "0 0 0 * * *"),
    ("@hourly", "0 0 * * * *"),
];

/// Errors from parsing cron expression text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CronError {
    #[error("cron expression \"{expression}\" must have 6 space-separated fields, found {found}")]
    FieldCount { expression: String, found: usize },

    #[error("invalid {field} field '{value}' in cron expression \"{expression}\": {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        expression: String,
        reason: String,
    },
}

/// A parsed cron expression
#[derive(Clone, Debug)]
pub struct CronExpression {
    /// Matchers in application order, most significant first
    fields: Vec<CronField>,
    source: String,
}

impl CronExpression {
    /// Parse a 6-field expression or one of the `@` macros
    pub fn parse(text: &str) -> Result<Self, CronError> {
        let source = text.trim();
        let expanded = MACROS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(source))
            .map(|(_, expansion)| *expansion)
            .unwrap_or(source);

        let parts: Vec<&str> = expanded.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(CronError::FieldCount {
                expression: source.to_string(),
                found: parts.len(),
            });
        }

        let field_error = |kind: FieldKind, value: &str, reason: String| CronError::InvalidField {
            field: kind.name(),
            value: value.to_string(),
            expression: source.to_string(),
            reason,
        };
        let bits = |kind: FieldKind, value: &str| {
            parse::parse_bits_field(kind, value).map_err(|reason| field_error(kind, value, reason))
        };

        let seconds = bits(FieldKind::Second, parts[0])?;
        let minutes = bits(FieldKind::Minute, parts[1])?;
        let hours = bits(FieldKind::Hour, parts[2])?;
        let days_of_month = parse::parse_days_of_month(parts[3])
            .map_err(|reason| field_error(FieldKind::DayOfMonth, parts[3], reason))?;
        let months = bits(FieldKind::Month, parts[4])?;
        let days_of_week = parse::parse_days_of_week(parts[5])
            .map_err(|reason| field_error(FieldKind::DayOfWeek, parts[5], reason))?;

        let days = match (is_wildcard(parts[3]), is_wildcard(parts[5])) {
            (_, true) => days_of_month,
            (true, false) => days_of_week,
            (false, false) => CronField::Composite(vec![days_of_month, days_of_week]),
        };

        Ok(Self {
            fields: vec![days, months, hours, minutes, seconds, CronField::ZeroNanos],
            source: source.to_string(),
        })
    }

    /// The expression text as given (macros are not expanded)
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Earliest instant strictly after `after` matching every field
    ///
    /// Returns `None` when the expression can never fire again (e.g. the
    /// 30th of February).
    pub fn next<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = after.timezone();
        let mut cursor = after.naive_local();
        for _ in 0..MAX_ATTEMPTS {
            let candidate = self.next_naive(cursor)?;
            match tz.from_local_datetime(&candidate) {
                LocalResult::Single(instant) if instant > *after => return Some(instant),
                LocalResult::Ambiguous(earliest, latest) => {
                    if earliest > *after {
                        return Some(earliest);
                    }
                    if latest > *after {
                        return Some(latest);
                    }
                }
                // Skipped by a DST gap, or not after the input: keep searching
                _ => {}
            }
            cursor = candidate;
        }
        None
    }

    /// Earliest wall-clock time strictly after `after` matching every field
    pub fn next_naive(&self, after: NaiveDateTime) -> Option<NaiveDateTime> {
        let start = after.checked_add_signed(Duration::nanoseconds(1))?;
        self.next_or_same(start)
    }

    fn next_or_same(&self, mut t: NaiveDateTime) -> Option<NaiveDateTime> {
        for _ in 0..MAX_ATTEMPTS {
            let mut result = t;
            for field in &self.fields {
                result = field.next_or_same(result)?;
            }
            if result == t {
                return Some(result);
            }
            t = result;
        }
        None
    }
}

fn is_wildcard(text: &str) -> bool {
    text == "*" || text == "?"
}

impl PartialEq for CronExpression {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for CronExpression {}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl FromStr for CronExpression {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
