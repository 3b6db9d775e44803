// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text to matcher compilation for individual cron fields

use super::field::{CronField, DayRule, FieldKind};
use chrono::Weekday;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const DAY_NAMES: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// Compile seconds, minutes, hours or month
pub(crate) fn parse_bits_field(kind: FieldKind, text: &str) -> Result<CronField, String> {
    Ok(CronField::Bits {
        kind,
        bits: parse_bits(kind, text)?,
    })
}

pub(crate) fn parse_days_of_month(text: &str) -> Result<CronField, String> {
    let text = if text == "?" { "*" } else { text };
    let mut plain = Vec::new();
    let mut rules = Vec::new();
    for part in text.split(',') {
        match parse_month_day_rule(part)? {
            Some(rule) => rules.push(CronField::Day(rule)),
            None => plain.push(part),
        }
    }
    combine(FieldKind::DayOfMonth, plain, rules)
}

pub(crate) fn parse_days_of_week(text: &str) -> Result<CronField, String> {
    let text = if text == "?" { "*" } else { text };
    let mut plain = Vec::new();
    let mut rules = Vec::new();
    for part in text.split(',') {
        match parse_week_day_rule(part)? {
            Some(rule) => rules.push(CronField::Day(rule)),
            None => plain.push(part),
        }
    }
    combine(FieldKind::DayOfWeek, plain, rules)
}

fn combine(
    kind: FieldKind,
    plain: Vec<&str>,
    mut rules: Vec<CronField>,
) -> Result<CronField, String> {
    if plain.is_empty() && rules.len() == 1 {
        return Ok(rules.remove(0));
    }
    if plain.is_empty() {
        return Ok(CronField::Composite(rules));
    }
    let bits = parse_bits(kind, &plain.join(","))?;
    let field = CronField::Bits { kind, bits };
    if rules.is_empty() {
        return Ok(field);
    }
    rules.insert(0, field);
    Ok(CronField::Composite(rules))
}

fn parse_month_day_rule(part: &str) -> Result<Option<DayRule>, String> {
    if part == "L" {
        return Ok(Some(DayRule::LastDayOfMonth { offset: 0 }));
    }
    if part == "LW" {
        return Ok(Some(DayRule::LastWeekdayOfMonth));
    }
    if let Some(offset) = part.strip_prefix("L-") {
        let offset = parse_number(offset)?;
        if !(1..=30).contains(&offset) {
            return Err(format!("offset in '{}' must be between 1 and 30", part));
        }
        return Ok(Some(DayRule::LastDayOfMonth { offset }));
    }
    if let Some(day) = part.strip_suffix('W') {
        let day = parse_number(day)?;
        if !(1..=31).contains(&day) {
            return Err(format!("day in '{}' must be between 1 and 31", part));
        }
        return Ok(Some(DayRule::NearestWeekday(day)));
    }
    if part.contains('L') {
        return Err(format!("unsupported use of 'L' in '{}'", part));
    }
    Ok(None)
}

fn parse_week_day_rule(part: &str) -> Result<Option<DayRule>, String> {
    if part == "L" {
        return Err("'L' must follow a weekday, e.g. 5L for the last Friday".to_string());
    }
    if let Some(day) = part.strip_suffix('L') {
        return Ok(Some(DayRule::LastWeekdayInMonth(parse_weekday(day)?)));
    }
    if let Some((day, nth)) = part.split_once('#') {
        let weekday = parse_weekday(day)?;
        let nth = parse_number(nth)?;
        if !(1..=5).contains(&nth) {
            return Err(format!("occurrence in '{}' must be between 1 and 5", part));
        }
        return Ok(Some(DayRule::NthWeekdayInMonth(weekday, nth)));
    }
    Ok(None)
}

fn parse_weekday(text: &str) -> Result<Weekday, String> {
    let value = parse_value(FieldKind::DayOfWeek, text)?;
    Ok(match value {
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        _ => Weekday::Sun,
    })
}

fn parse_bits(kind: FieldKind, text: &str) -> Result<u64, String> {
    let (min, max) = kind.bounds();
    let mut bits = 0u64;
    for part in text.split(',') {
        if part.is_empty() {
            return Err("empty list element".to_string());
        }
        let (range, step) = match part.split_once('/') {
            Some((range, step)) => {
                let step = parse_number(step)?;
                if step == 0 {
                    return Err(format!("step in '{}' must be positive", part));
                }
                (range, Some(step))
            }
            None => (part, None),
        };
        let (start, end) = if range == "*" {
            (min, max)
        } else if let Some((start, end)) = range.split_once('-') {
            (parse_value(kind, start)?, parse_value(kind, end)?)
        } else {
            let start = parse_value(kind, range)?;
            // `a/b` runs from a to the field maximum
            (start, if step.is_some() { max } else { start })
        };
        if start > end {
            return Err(format!("range '{}' starts after it ends", range));
        }
        let step = step.unwrap_or(1) as usize;
        for value in (start..=end).step_by(step) {
            bits |= 1 << value;
        }
    }
    if kind == FieldKind::DayOfWeek && bits & 1 != 0 {
        // Sunday is stored as 7 to match ISO numbering
        bits = (bits & !1) | (1 << 7);
    }
    Ok(bits)
}

fn parse_value(kind: FieldKind, text: &str) -> Result<u32, String> {
    let names: &[&str] = match kind {
        FieldKind::Month => &MONTH_NAMES,
        FieldKind::DayOfWeek => &DAY_NAMES,
        _ => &[],
    };
    let upper = text.to_ascii_uppercase();
    let value = match names.iter().position(|name| *name == upper) {
        // Names are 1-based: JAN..DEC and MON..SUN; numeric 0 still means Sunday
        Some(index) => index as u32 + 1,
        None => parse_number(text)?,
    };
    let (min, max) = kind.bounds();
    if value < min || value > max {
        return Err(format!("value {} out of range {}-{}", value, min, max));
    }
    Ok(value)
}

fn parse_number(text: &str) -> Result<u32, String> {
    text.parse::<u32>()
        .map_err(|_| format!("'{}' is not a number", text))
}
