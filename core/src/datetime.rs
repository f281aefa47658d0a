// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Small civil-time helpers shared by the normalizer and the engine.

use jiff::ToSpan;
use jiff::civil::{Date, DateTime};

/// The Monday starting the week that contains `date`.
pub(crate) fn week_start(date: Date) -> Date {
    let offset = i64::from(date.weekday().to_monday_zero_offset());
    date.checked_sub(offset.days()).unwrap_or(date)
}

/// The last representable instant of `date`'s day. Used for inclusive
/// "until" bounds.
pub(crate) fn end_of_day(date: Date) -> DateTime {
    date.at(23, 59, 59, 999_999_999)
}

/// Whole days from `a` to `b`; negative when `b` is earlier.
pub(crate) fn days_between(a: Date, b: Date) -> i64 {
    (b - a).get_days().into()
}

/// Months since year zero, for month-period arithmetic.
pub(crate) fn month_index(date: Date) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month()) - 1
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn week_starts_on_monday() {
        // 2021-01-01 is a Friday
        assert_eq!(week_start(date(2021, 1, 1)), date(2020, 12, 28));
        assert_eq!(week_start(date(2020, 12, 28)), date(2020, 12, 28));
        assert_eq!(week_start(date(2021, 1, 3)), date(2020, 12, 28));
        assert_eq!(week_start(date(2021, 1, 4)), date(2021, 1, 4));
    }

    #[test]
    fn day_and_month_arithmetic() {
        assert_eq!(days_between(date(2021, 1, 1), date(2021, 1, 4)), 3);
        assert_eq!(days_between(date(2021, 1, 4), date(2021, 1, 1)), -3);
        assert_eq!(
            month_index(date(2021, 3, 15)) - month_index(date(2020, 12, 1)),
            3
        );
    }

    #[test]
    fn end_of_day_is_inside_the_day() {
        let end = end_of_day(date(2021, 1, 1));
        assert_eq!(end.date(), date(2021, 1, 1));
        assert!(end > date(2021, 1, 1).at(23, 59, 59, 0));
    }
}
