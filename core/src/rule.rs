// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical recurrence rules.

use std::fmt::{self, Display};

use evry_grammar::{Ast, Frequency};
use jiff::civil::{DateTime, Weekday};

use crate::datetime::end_of_day;

/// Canonical, frequency-indexed description of a repeating schedule.
///
/// Unlike the raw AST, a rule always carries enough to enumerate occurrences:
/// every by-set relevant to its frequency is non-empty and `start` is pinned,
/// which fixes the phase of `interval > 1` rules independently of any query
/// window.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Frequency of recurrence
    pub freq: Frequency,

    /// Every Nth period, counted from the first qualifying period
    pub interval: u32,

    /// Days of the week, Monday-first order
    pub by_day: Vec<Weekday>,

    /// Hours of the day (0-23)
    pub by_hour: Vec<i8>,

    /// Minutes of the hour (0-59), crossed with `by_hour`
    pub by_minute: Vec<i8>,

    /// Days of the month (1-31)
    pub by_month_day: Vec<i8>,

    /// Months of the year (1-12)
    pub by_month: Vec<i8>,

    /// Lower bound; also the interval phase origin
    pub start: DateTime,

    /// Inclusive upper bound
    pub until: Option<DateTime>,

    /// Occurrence count bound, counted from `start`
    pub count: Option<u32>,
}

/// Canonicalize a parsed expression into a rule, or `None` for one-off and
/// pure-subject expressions.
///
/// The anchor becomes the rule's start when the expression has no explicit
/// one. Semantically impossible by-set combinations are not rejected here;
/// they simply produce no occurrences downstream.
#[must_use]
pub fn normalize(ast: &Ast, anchor: DateTime) -> Option<Rule> {
    let freq = ast.freq?;
    let start = ast.start.unwrap_or(anchor);

    let mut by_day = sorted_weekdays(ast.by_day.clone());
    let mut by_hour = sorted_i8(ast.by_hour.clone());
    let mut by_minute = sorted_i8(ast.by_minute.clone());
    let mut by_month_day = sorted_i8(ast.by_month_day.clone());
    let mut by_month = sorted_i8(ast.by_month.clone());

    match freq {
        // The frequency granularity itself is the time unit
        Frequency::Minutely | Frequency::Hourly => {
            by_hour.clear();
            by_minute.clear();
        }
        _ => {
            if by_hour.is_empty() {
                by_hour.push(0);
            }
            if by_minute.is_empty() {
                by_minute.push(0);
            }
        }
    }

    match freq {
        Frequency::Weekly if by_day.is_empty() => by_day.push(start.weekday()),
        Frequency::Monthly if by_month_day.is_empty() => by_month_day.push(1),
        Frequency::Yearly => {
            if by_month.is_empty() {
                by_month.push(start.month());
                // Anniversary of the start when nothing is explicit
                if by_month_day.is_empty() {
                    by_month_day.push(start.day());
                }
            }
            if by_month_day.is_empty() {
                by_month_day.push(1);
            }
        }
        _ => {}
    }

    Some(Rule {
        freq,
        interval: ast.interval.max(1),
        by_day,
        by_hour,
        by_minute,
        by_month_day,
        by_month,
        start,
        until: ast.until.map(end_of_day),
        count: None,
    })
}

fn sorted_i8(mut values: Vec<i8>) -> Vec<i8> {
    values.sort_unstable();
    values.dedup();
    values
}

fn sorted_weekdays(mut values: Vec<Weekday>) -> Vec<Weekday> {
    values.sort_unstable_by_key(|wd| wd.to_monday_zero_offset());
    values.dedup();
    values
}

/// Canonical two-letter weekday code.
pub(crate) fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "MO",
        Weekday::Tuesday => "TU",
        Weekday::Wednesday => "WE",
        Weekday::Thursday => "TH",
        Weekday::Friday => "FR",
        Weekday::Saturday => "SA",
        Weekday::Sunday => "SU",
    }
}

fn freq_code(freq: Frequency) -> &'static str {
    match freq {
        Frequency::Minutely => "MINUTELY",
        Frequency::Hourly => "HOURLY",
        Frequency::Daily => "DAILY",
        Frequency::Weekly => "WEEKLY",
        Frequency::Monthly => "MONTHLY",
        Frequency::Yearly => "YEARLY",
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", freq_code(self.freq))?;
        if self.interval > 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        if !self.by_day.is_empty() {
            let days: Vec<_> = self.by_day.iter().map(|&wd| weekday_code(wd)).collect();
            write!(f, ";BYDAY={}", days.join(","))?;
        }
        for (name, values) in [
            ("BYHOUR", &self.by_hour),
            ("BYMINUTE", &self.by_minute),
            ("BYMONTHDAY", &self.by_month_day),
            ("BYMONTH", &self.by_month),
        ] {
            if !values.is_empty() {
                let values: Vec<_> = values.iter().map(i8::to_string).collect();
                write!(f, ";{}={}", name, values.join(","))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use evry_grammar::{ParseContext, parse};
    use jiff::civil::date;

    use super::*;

    fn anchor() -> DateTime {
        date(2021, 1, 1).at(0, 0, 0, 0)
    }

    fn rule_of(src: &str) -> Option<Rule> {
        let ast = parse(src, ParseContext::new(anchor())).unwrap();
        normalize(&ast, anchor())
    }

    #[test]
    fn one_offs_normalize_to_nothing() {
        assert!(rule_of("tomorrow at 5").is_none());
        assert!(rule_of("just words").is_none());
    }

    #[test]
    fn fills_default_times() {
        let rule = rule_of("every 2 mondays").unwrap();
        assert_eq!(rule.freq, Frequency::Weekly);
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.by_day, vec![Weekday::Monday]);
        assert_eq!(rule.by_hour, vec![0]);
        assert_eq!(rule.by_minute, vec![0]);
        assert_eq!(rule.start, anchor());
    }

    #[test]
    fn yearly_rules_keep_explicit_dates() {
        let rule = rule_of("every 29 december").unwrap();
        assert_eq!(rule.freq, Frequency::Yearly);
        assert_eq!(rule.by_month_day, vec![29]);
        assert_eq!(rule.by_month, vec![12]);
        assert_eq!(rule.by_hour, vec![0]);
        assert_eq!(rule.by_minute, vec![0]);
    }

    #[test]
    fn yearly_defaults() {
        // Month alone: first of that month
        let rule = rule_of("every december").unwrap();
        assert_eq!(rule.by_month, vec![12]);
        assert_eq!(rule.by_month_day, vec![1]);

        // Nothing explicit: anniversary of the start
        let rule = rule_of("every year").unwrap();
        assert_eq!(rule.by_month, vec![1]);
        assert_eq!(rule.by_month_day, vec![1]);
    }

    #[test]
    fn weekly_defaults_to_the_start_weekday() {
        // Anchor is a Friday
        let rule = rule_of("every week").unwrap();
        assert_eq!(rule.by_day, vec![Weekday::Friday]);

        let rule = rule_of("every week starting tomorrow").unwrap();
        assert_eq!(rule.by_day, vec![Weekday::Saturday]);
    }

    #[test]
    fn monthly_defaults_to_the_first() {
        let rule = rule_of("every month").unwrap();
        assert_eq!(rule.by_month_day, vec![1]);
    }

    #[test]
    fn sub_daily_rules_carry_no_time_sets() {
        let rule = rule_of("every 2 hours").unwrap();
        assert!(rule.by_hour.is_empty());
        assert!(rule.by_minute.is_empty());

        let rule = rule_of("every 30 min").unwrap();
        assert!(rule.by_hour.is_empty());
        assert_eq!(rule.interval, 30);
    }

    #[test]
    fn by_sets_are_sorted_and_deduplicated() {
        let rule = rule_of("every friday and monday at 18 and 9").unwrap();
        assert_eq!(rule.by_day, vec![Weekday::Monday, Weekday::Friday]);
        assert_eq!(rule.by_hour, vec![9, 18]);
    }

    #[test]
    fn until_becomes_an_end_of_day_bound() {
        let rule = rule_of("every day until 31/1").unwrap();
        let until = rule.until.unwrap();
        assert_eq!(until.date(), date(2021, 1, 31));
        assert!(until > date(2021, 1, 31).at(23, 59, 59, 0));
    }

    #[test]
    fn renders_canonical_weekday_codes() {
        let rule = rule_of("every 2 mondays").unwrap();
        assert_eq!(
            rule.to_string(),
            "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO;BYHOUR=0;BYMINUTE=0"
        );

        let rule = rule_of("every weekend").unwrap();
        assert!(rule.to_string().contains("BYDAY=SA"));
    }
}
