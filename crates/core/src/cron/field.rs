// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-field cron matchers and the calendar arithmetic behind them
//!
//! Every matcher answers one question: given an instant, what is the
//! earliest instant at or after it that satisfies this field alone? When a
//! field has to move forward, all lower-order components are reset to their
//! minimum so that no stale sub-field leaks into the result.

use super::MAX_ATTEMPTS;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

/// Calendar component a matcher operates on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl FieldKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            FieldKind::Second => "seconds",
            FieldKind::Minute => "minutes",
            FieldKind::Hour => "hours",
            FieldKind::DayOfMonth => "day-of-month",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "day-of-week",
        }
    }

    /// Accepted range of values in expression text
    pub(crate) fn bounds(self) -> (u32, u32) {
        match self {
            FieldKind::Second | FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::DayOfMonth => (1, 31),
            FieldKind::Month => (1, 12),
            // 0 and 7 both mean Sunday
            FieldKind::DayOfWeek => (0, 7),
        }
    }

    fn min(self) -> u32 {
        match self {
            FieldKind::DayOfMonth | FieldKind::Month | FieldKind::DayOfWeek => 1,
            _ => 0,
        }
    }

    /// Largest valid value at the given instant (day-of-month depends on the month)
    fn max_at(self, t: &NaiveDateTime) -> u32 {
        match self {
            FieldKind::Second | FieldKind::Minute => 59,
            FieldKind::Hour => 23,
            FieldKind::DayOfMonth => days_in_month(t.year(), t.month()),
            FieldKind::Month => 12,
            FieldKind::DayOfWeek => 7,
        }
    }

    fn get(self, t: &NaiveDateTime) -> u32 {
        match self {
            FieldKind::Second => t.second(),
            FieldKind::Minute => t.minute(),
            FieldKind::Hour => t.hour(),
            FieldKind::DayOfMonth => t.day(),
            FieldKind::Month => t.month(),
            FieldKind::DayOfWeek => t.weekday().number_from_monday(),
        }
    }

    /// Reset every component below this one to its minimum
    fn reset(self, t: NaiveDateTime) -> NaiveDateTime {
        let date = t.date();
        match self {
            FieldKind::Second => t.with_nanosecond(0).unwrap_or(t),
            FieldKind::Minute => hms(date, t.hour(), t.minute(), 0).unwrap_or(t),
            FieldKind::Hour => hms(date, t.hour(), 0, 0).unwrap_or(t),
            FieldKind::DayOfMonth | FieldKind::DayOfWeek => date.and_time(NaiveTime::MIN),
            FieldKind::Month => date
                .with_day(1)
                .map(|d| d.and_time(NaiveTime::MIN))
                .unwrap_or(t),
        }
    }

    /// Advance to the start of the next higher-order unit with this field at its minimum
    fn roll_forward(self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        let date = t.date();
        match self {
            FieldKind::Second => {
                hms(date, t.hour(), t.minute(), 0)?.checked_add_signed(Duration::minutes(1))
            }
            FieldKind::Minute => hms(date, t.hour(), 0, 0)?.checked_add_signed(Duration::hours(1)),
            FieldKind::Hour => date.succ_opt().map(|d| d.and_time(NaiveTime::MIN)),
            FieldKind::DayOfMonth => first_of_next_month(date).map(|d| d.and_time(NaiveTime::MIN)),
            FieldKind::DayOfWeek => {
                let to_monday = 7 - i64::from(date.weekday().num_days_from_monday());
                date.checked_add_signed(Duration::days(to_monday))
                    .map(|d| d.and_time(NaiveTime::MIN))
            }
            FieldKind::Month => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
                .map(|d| d.and_time(NaiveTime::MIN)),
        }
    }

    /// Move forward until this field reads `goal` or wraps past its maximum
    fn elapse_until(self, t: NaiveDateTime, goal: u32) -> Option<NaiveDateTime> {
        let current = self.get(&t);
        let max = self.max_at(&t);
        if current < goal {
            if goal <= max {
                self.set(t, goal, current)
            } else {
                self.add(t, max - current + 1)
            }
        } else {
            self.add(t, goal + max - current + 1 - self.min())
        }
    }

    fn set(self, t: NaiveDateTime, goal: u32, current: u32) -> Option<NaiveDateTime> {
        match self {
            FieldKind::Second => t.with_second(goal),
            FieldKind::Minute => t.with_minute(goal),
            FieldKind::Hour => t.with_hour(goal),
            FieldKind::DayOfMonth => t.with_day(goal),
            FieldKind::Month => t
                .date()
                .with_day(1)
                .and_then(|d| d.with_month(goal))
                .map(|d| d.and_time(t.time())),
            FieldKind::DayOfWeek => self.add(t, goal - current),
        }
    }

    fn add(self, t: NaiveDateTime, amount: u32) -> Option<NaiveDateTime> {
        let amount = i64::from(amount);
        match self {
            FieldKind::Second => t.checked_add_signed(Duration::seconds(amount)),
            FieldKind::Minute => t.checked_add_signed(Duration::minutes(amount)),
            FieldKind::Hour => t.checked_add_signed(Duration::hours(amount)),
            FieldKind::DayOfMonth | FieldKind::DayOfWeek => {
                t.checked_add_signed(Duration::days(amount))
            }
            FieldKind::Month => {
                let months = u32::try_from(amount).ok()?;
                t.checked_add_months(Months::new(months))
            }
        }
    }
}

/// Quartz-style day rules that pick at most one day per month
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DayRule {
    /// `L` or `L-n`: last day of the month minus `offset` days
    LastDayOfMonth { offset: u32 },
    /// `LW`: last weekday (Mon-Fri) of the month
    LastWeekdayOfMonth,
    /// `nW`: weekday nearest to day `n`, never leaving the month
    NearestWeekday(u32),
    /// `dL`: last given weekday of the month
    LastWeekdayInMonth(Weekday),
    /// `d#n`: n-th given weekday of the month
    NthWeekdayInMonth(Weekday, u32),
}

impl DayRule {
    fn day_in(self, year: i32, month: u32) -> Option<NaiveDate> {
        let last = days_in_month(year, month);
        let last_date = NaiveDate::from_ymd_opt(year, month, last)?;
        match self {
            DayRule::LastDayOfMonth { offset } => {
                if offset >= last {
                    return None;
                }
                NaiveDate::from_ymd_opt(year, month, last - offset)
            }
            DayRule::LastWeekdayOfMonth => match last_date.weekday() {
                Weekday::Sat => last_date.pred_opt(),
                Weekday::Sun => last_date.checked_sub_signed(Duration::days(2)),
                _ => Some(last_date),
            },
            DayRule::NearestWeekday(day) => {
                if day > last {
                    return None;
                }
                let date = NaiveDate::from_ymd_opt(year, month, day)?;
                let adjusted = match date.weekday() {
                    Weekday::Sat if day == 1 => day + 2,
                    Weekday::Sat => day - 1,
                    Weekday::Sun if day == last => day - 2,
                    Weekday::Sun => day + 1,
                    _ => day,
                };
                NaiveDate::from_ymd_opt(year, month, adjusted)
            }
            DayRule::LastWeekdayInMonth(weekday) => {
                let back = (last_date.weekday().num_days_from_monday() + 7
                    - weekday.num_days_from_monday())
                    % 7;
                last_date.checked_sub_signed(Duration::days(i64::from(back)))
            }
            DayRule::NthWeekdayInMonth(weekday, nth) => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                let forward = (weekday.num_days_from_monday() + 7
                    - first.weekday().num_days_from_monday())
                    % 7;
                let day = 1 + forward + 7 * (nth - 1);
                if day > last {
                    return None;
                }
                NaiveDate::from_ymd_opt(year, month, day)
            }
        }
    }

    fn next_or_same(self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        let date = t.date();
        let (mut year, mut month) = (date.year(), date.month());
        for _ in 0..MAX_ATTEMPTS {
            if let Some(day) = self.day_in(year, month) {
                if day == date {
                    return Some(t);
                }
                if day > date {
                    return Some(day.and_time(NaiveTime::MIN));
                }
            }
            (year, month) = if month == 12 {
                (year + 1, 1)
            } else {
                (year, month + 1)
            };
        }
        None
    }
}

/// A compiled matcher for one cron field
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CronField {
    /// Sub-second component is always zero
    ZeroNanos,
    /// Set of allowed values, one bit per value
    Bits { kind: FieldKind, bits: u64 },
    /// Quartz day rule (`L`, `W`, `#`)
    Day(DayRule),
    /// Earliest instant among alternatives
    Composite(Vec<CronField>),
}

impl CronField {
    /// Earliest instant at or after `t` that this field accepts
    pub(crate) fn next_or_same(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            CronField::ZeroNanos => {
                if t.nanosecond() == 0 {
                    Some(t)
                } else {
                    t.with_nanosecond(0)?
                        .checked_add_signed(Duration::seconds(1))
                }
            }
            CronField::Bits { kind, bits } => next_or_same_bits(*kind, *bits, t),
            CronField::Day(rule) => rule.next_or_same(t),
            CronField::Composite(alternatives) => alternatives
                .iter()
                .filter_map(|field| field.next_or_same(t))
                .min(),
        }
    }
}

fn next_or_same_bits(kind: FieldKind, bits: u64, mut t: NaiveDateTime) -> Option<NaiveDateTime> {
    let current = kind.get(&t);
    let mut next = match next_set_bit(bits, current) {
        Some(next) => next,
        None => {
            t = kind.roll_forward(t)?;
            next_set_bit(bits, 0)?
        }
    };
    if next == current {
        return Some(t);
    }

    let mut current = kind.get(&t);
    let mut attempts = 0;
    while current != next {
        if attempts >= MAX_ATTEMPTS {
            return None;
        }
        attempts += 1;
        t = kind.elapse_until(t, next)?;
        current = kind.get(&t);
        next = match next_set_bit(bits, current) {
            Some(next) => next,
            None => {
                t = kind.roll_forward(t)?;
                next_set_bit(bits, 0)?
            }
        };
    }
    Some(kind.reset(t))
}

fn next_set_bit(bits: u64, from: u32) -> Option<u32> {
    if from >= 64 {
        return None;
    }
    let masked = bits & (u64::MAX << from);
    (masked != 0).then(|| masked.trailing_zeros())
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(first_of_next_month)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

fn hms(date: NaiveDate, hour: u32, minute: u32, second: u32) -> Option<NaiveDateTime> {
    date.and_hms_opt(hour, minute, second)
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
