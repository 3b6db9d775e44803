// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, mo, d).unwrap()
}

#[parameterized(
    january = { 2024, 1, 31 },
    leap_february = { 2024, 2, 29 },
    february = { 2023, 2, 28 },
    april = { 2024, 4, 30 },
    december = { 2024, 12, 31 },
)]
fn days_in_month_handles_calendar(year: i32, month: u32, expected: u32) {
    assert_eq!(days_in_month(year, month), expected);
}

#[test]
fn next_set_bit_finds_lowest_at_or_above() {
    let bits = (1 << 3) | (1 << 10);
    assert_eq!(next_set_bit(bits, 0), Some(3));
    assert_eq!(next_set_bit(bits, 3), Some(3));
    assert_eq!(next_set_bit(bits, 4), Some(10));
    assert_eq!(next_set_bit(bits, 11), None);
    assert_eq!(next_set_bit(bits, 64), None);
}

#[test]
fn bits_field_keeps_matching_instant() {
    let field = CronField::Bits {
        kind: FieldKind::Minute,
        bits: 1 << 15,
    };
    let t = at(2024, 5, 1, 10, 15, 42);
    assert_eq!(field.next_or_same(t), Some(t));
}

#[test]
fn bits_field_resets_lower_components_when_advancing() {
    let field = CronField::Bits {
        kind: FieldKind::Hour,
        bits: 1 << 9,
    };
    let t = at(2024, 5, 1, 7, 45, 30);
    assert_eq!(field.next_or_same(t), Some(at(2024, 5, 1, 9, 0, 0)));
}

#[test]
fn bits_field_rolls_into_next_unit() {
    let field = CronField::Bits {
        kind: FieldKind::Second,
        bits: 1 << 5,
    };
    let t = at(2024, 12, 31, 23, 59, 30);
    assert_eq!(field.next_or_same(t), Some(at(2025, 1, 1, 0, 0, 5)));
}

#[test]
fn day_of_month_skips_short_months() {
    let field = CronField::Bits {
        kind: FieldKind::DayOfMonth,
        bits: 1 << 31,
    };
    let t = at(2024, 4, 2, 8, 0, 0);
    assert_eq!(field.next_or_same(t), Some(at(2024, 5, 31, 0, 0, 0)));
}

#[test]
fn day_of_week_moves_to_next_matching_day() {
    // 2024-01-06 is a Saturday; 3 is Wednesday
    let field = CronField::Bits {
        kind: FieldKind::DayOfWeek,
        bits: 1 << 3,
    };
    let t = at(2024, 1, 6, 12, 0, 0);
    assert_eq!(field.next_or_same(t), Some(at(2024, 1, 10, 0, 0, 0)));
}

#[test]
fn zero_nanos_rounds_up_to_next_second() {
    let t = at(2024, 1, 1, 0, 0, 0).with_nanosecond(500).unwrap();
    assert_eq!(
        CronField::ZeroNanos.next_or_same(t),
        Some(at(2024, 1, 1, 0, 0, 1))
    );
}

#[parameterized(
    last_day = { DayRule::LastDayOfMonth { offset: 0 }, 2024, 2, Some(date(2024, 2, 29)) },
    last_day_offset = { DayRule::LastDayOfMonth { offset: 2 }, 2024, 4, Some(date(2024, 4, 28)) },
    offset_too_large = { DayRule::LastDayOfMonth { offset: 29 }, 2023, 2, None },
    last_weekday_on_saturday = { DayRule::LastWeekdayOfMonth, 2024, 8, Some(date(2024, 8, 30)) },
    last_weekday_on_sunday = { DayRule::LastWeekdayOfMonth, 2024, 3, Some(date(2024, 3, 29)) },
    nearest_weekday_saturday = { DayRule::NearestWeekday(15), 2024, 6, Some(date(2024, 6, 14)) },
    nearest_weekday_first_saturday = { DayRule::NearestWeekday(1), 2024, 6, Some(date(2024, 6, 3)) },
    nearest_weekday_sunday = { DayRule::NearestWeekday(16), 2024, 6, Some(date(2024, 6, 17)) },
    nearest_weekday_last_sunday = { DayRule::NearestWeekday(30), 2024, 6, Some(date(2024, 6, 28)) },
    nearest_weekday_missing_day = { DayRule::NearestWeekday(31), 2024, 6, None },
    last_friday = { DayRule::LastWeekdayInMonth(Weekday::Fri), 2024, 1, Some(date(2024, 1, 26)) },
    second_friday = { DayRule::NthWeekdayInMonth(Weekday::Fri, 2), 2024, 1, Some(date(2024, 1, 12)) },
    fifth_monday_missing = { DayRule::NthWeekdayInMonth(Weekday::Mon, 5), 2024, 2, None },
)]
fn day_rules_pick_expected_day(rule: DayRule, year: i32, month: u32, expected: Option<NaiveDate>) {
    assert_eq!(rule.day_in(year, month), expected);
}

#[test]
fn day_rule_moves_to_following_month_when_passed() {
    let rule = DayRule::LastWeekdayInMonth(Weekday::Fri);
    let t = at(2024, 1, 27, 10, 0, 0);
    assert_eq!(
        CronField::Day(rule).next_or_same(t),
        Some(at(2024, 2, 23, 0, 0, 0))
    );
}

#[test]
fn composite_picks_earliest_alternative() {
    let field = CronField::Composite(vec![
        CronField::Bits {
            kind: FieldKind::DayOfMonth,
            bits: 1 << 20,
        },
        CronField::Day(DayRule::LastDayOfMonth { offset: 0 }),
    ]);
    assert_eq!(
        field.next_or_same(at(2024, 3, 5, 0, 0, 0)),
        Some(at(2024, 3, 20, 0, 0, 0))
    );
    assert_eq!(
        field.next_or_same(at(2024, 3, 21, 0, 0, 0)),
        Some(at(2024, 3, 31, 0, 0, 0))
    );
}
