// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The occurrence engine.
//!
//! A [`Schedule`] aggregates canonical rules and explicit one-off instants
//! and answers occurrence queries with a lazy, strictly-ascending,
//! deduplicated stream. All candidate enumeration happens in civil time;
//! candidates become zoned instants exactly once, at yield.

use std::iter::Peekable;
use std::vec;

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{ToSpan, Zoned};

use evry_grammar::Frequency;

use crate::datetime::{days_between, month_index, week_start};
use crate::rule::Rule;

/// Consecutive candidate-free periods scanned before a rule is considered
/// dead. Large enough for any gap a real calendar produces (leap-day rules
/// wait at most 8 years) while bounding impossible rules like February 30th.
const MAX_BARREN_PERIODS: u32 = 1024;

/// One concrete point in time produced by a schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    /// The instant, in the schedule's time zone
    pub date: Zoned,

    /// Index of the producing source: rules first, then explicit dates
    pub source: usize,
}

/// An aggregate of recurrence rules and explicit one-off instants.
///
/// A schedule is a plain value: queries never mutate it and hold no cursor
/// state inside it, so a fresh call with the same arguments reproduces the
/// same sequence.
#[derive(Debug, Clone)]
pub struct Schedule {
    tz: TimeZone,
    rules: Vec<Rule>,
    dates: Vec<DateTime>,
}

impl Schedule {
    /// An empty schedule producing occurrences in `tz`.
    #[must_use]
    pub fn new(tz: TimeZone) -> Self {
        Schedule {
            tz,
            rules: Vec::new(),
            dates: Vec::new(),
        }
    }

    /// Add a recurrence rule.
    pub fn push_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Add an explicit one-off instant.
    pub fn push_date(&mut self, date: DateTime) {
        self.dates.push(date);
    }

    /// The time zone occurrences resolve in.
    #[must_use]
    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    /// Lazy ascending occurrences at/after `start`, deduplicated by instant.
    ///
    /// The stream is logically infinite for ever-repeating rules; bound it
    /// with [`Schedule::occurrences_between`], `take`, or stop pulling.
    #[must_use]
    pub fn occurrences(&self, start: &Zoned) -> Occurrences<'_> {
        let lower = civil_in(&self.tz, start);
        let mut dates: Vec<(DateTime, usize)> = self
            .dates
            .iter()
            .enumerate()
            .filter(|&(_, date)| *date >= lower)
            .map(|(idx, date)| (*date, self.rules.len() + idx))
            .collect();
        dates.sort_unstable();

        Occurrences {
            tz: self.tz.clone(),
            rules: self
                .rules
                .iter()
                .map(|rule| RuleOccurrences::new(rule, lower).peekable())
                .collect(),
            dates: dates.into_iter().peekable(),
            last: None,
        }
    }

    /// All occurrences in the half-open window `[start, end)`.
    pub fn occurrences_between(
        &self,
        start: &Zoned,
        end: &Zoned,
    ) -> impl Iterator<Item = Occurrence> + '_ {
        let end = end.clone();
        self.occurrences(start).take_while(move |occ| occ.date < end)
    }

    /// The first occurrence strictly after `after`, if any.
    #[must_use]
    pub fn first_after(&self, after: &Zoned) -> Option<Occurrence> {
        self.occurrences(after).find(|occ| occ.date > *after)
    }
}

fn civil_in(tz: &TimeZone, instant: &Zoned) -> DateTime {
    instant.timestamp().to_zoned(tz.clone()).datetime()
}

/// Merged occurrence stream over all sources of a schedule.
#[derive(Debug)]
pub struct Occurrences<'s> {
    tz: TimeZone,
    rules: Vec<Peekable<RuleOccurrences<'s>>>,
    dates: Peekable<vec::IntoIter<(DateTime, usize)>>,
    last: Option<DateTime>,
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        loop {
            // k-way minimum across every rule stream and the date list
            let mut best: Option<(DateTime, Option<usize>)> = None;
            for (idx, rule) in self.rules.iter_mut().enumerate() {
                if let Some(&candidate) = rule.peek() {
                    if best.is_none_or(|(b, _)| candidate < b) {
                        best = Some((candidate, Some(idx)));
                    }
                }
            }
            if let Some(&(candidate, _)) = self.dates.peek() {
                if best.is_none_or(|(b, _)| candidate < b) {
                    best = Some((candidate, None));
                }
            }

            let (candidate, origin) = best?;
            let source = match origin {
                Some(idx) => {
                    if let Some(rule) = self.rules.get_mut(idx) {
                        rule.next();
                    }
                    idx
                }
                None => match self.dates.next() {
                    Some((_, source)) => source,
                    None => continue,
                },
            };

            // Identical instants from multiple sources collapse into one
            if self.last.is_some_and(|last| candidate <= last) {
                continue;
            }
            self.last = Some(candidate);

            match candidate.to_zoned(self.tz.clone()) {
                Ok(date) => return Some(Occurrence { date, source }),
                Err(_) => continue,
            }
        }
    }
}

/// Lazy per-rule candidate stream.
///
/// Periods are stepped by `interval` from the phase origin: the period
/// holding the first candidate at/after the rule's start. Within a period the
/// populated by-sets are crossed in ascending order.
#[derive(Debug)]
struct RuleOccurrences<'r> {
    rule: &'r Rule,
    times: Vec<(i8, i8)>,
    window_lower: DateTime,
    /// Next period to expand; `None` once exhausted
    cursor: Option<DateTime>,
    buffer: vec::IntoIter<DateTime>,
    remaining: Option<u32>,
    barren: u32,
}

impl<'r> RuleOccurrences<'r> {
    fn new(rule: &'r Rule, window_lower: DateTime) -> RuleOccurrences<'r> {
        let mut occurrences = RuleOccurrences {
            rule,
            times: time_pairs(rule),
            window_lower,
            cursor: None,
            buffer: Vec::new().into_iter(),
            remaining: rule.count,
            barren: 0,
        };
        occurrences.cursor = occurrences.find_origin();
        // A count bound must see every occurrence from the rule start, so
        // only uncounted rules may skip ahead to the query window.
        if rule.count.is_none() {
            occurrences.fast_forward();
        }
        occurrences
    }

    /// The period holding the first candidate at/after the rule start.
    fn find_origin(&self) -> Option<DateTime> {
        let mut period = period_start(self.rule, self.rule.start);
        for _ in 0..MAX_BARREN_PERIODS {
            if self
                .expand(period)
                .iter()
                .any(|candidate| *candidate >= self.rule.start)
            {
                return Some(period);
            }
            period = advance(self.rule, period, 1)?;
        }
        None
    }

    /// Jump the cursor to the last qualifying period at/before the query
    /// window, keeping the interval phase.
    fn fast_forward(&mut self) {
        let Some(origin) = self.cursor else { return };
        let target = period_start(self.rule, self.window_lower);
        let interval = i64::from(self.rule.interval.max(1));
        let diff = periods_between(self.rule, origin, target);
        if diff > 0 {
            let qualifying = (diff / interval) * interval;
            if qualifying > 0 {
                self.cursor = advance(self.rule, origin, qualifying);
            }
        }
    }

    /// All candidates inside one period, ascending.
    fn expand(&self, period: DateTime) -> Vec<DateTime> {
        let rule = self.rule;
        match rule.freq {
            Frequency::Minutely | Frequency::Hourly => vec![period],
            Frequency::Daily => {
                let date = period.date();
                if !rule.by_day.is_empty() && !rule.by_day.contains(&date.weekday()) {
                    return Vec::new();
                }
                self.times_on(date)
            }
            Frequency::Weekly => {
                let monday = period.date();
                let mut out = Vec::new();
                for weekday in &rule.by_day {
                    let offset = i64::from(weekday.to_monday_zero_offset());
                    if let Ok(date) = monday.checked_add(offset.days()) {
                        out.extend(self.times_on(date));
                    }
                }
                out
            }
            Frequency::Monthly => {
                let first = period.date();
                let mut out = Vec::new();
                for &day in &rule.by_month_day {
                    // Day 31 in a 30-day month: skip the month, never clamp
                    if let Ok(date) = Date::new(first.year(), first.month(), day) {
                        out.extend(self.times_on(date));
                    }
                }
                out
            }
            Frequency::Yearly => {
                let year = period.date().year();
                let mut out = Vec::new();
                for &month in &rule.by_month {
                    for &day in &rule.by_month_day {
                        // Feb 29 only exists in leap years
                        if let Ok(date) = Date::new(year, month, day) {
                            out.extend(self.times_on(date));
                        }
                    }
                }
                out
            }
        }
    }

    fn times_on(&self, date: Date) -> Vec<DateTime> {
        if self.times.is_empty() {
            vec![date.at(0, 0, 0, 0)]
        } else {
            self.times
                .iter()
                .map(|&(hour, minute)| date.at(hour, minute, 0, 0))
                .collect()
        }
    }
}

impl Iterator for RuleOccurrences<'_> {
    type Item = DateTime;

    fn next(&mut self) -> Option<DateTime> {
        loop {
            for candidate in self.buffer.by_ref() {
                if candidate < self.rule.start {
                    continue;
                }
                if let Some(until) = self.rule.until {
                    if candidate > until {
                        self.cursor = None;
                        return None;
                    }
                }
                if let Some(remaining) = &mut self.remaining {
                    if *remaining == 0 {
                        self.cursor = None;
                        return None;
                    }
                    *remaining -= 1;
                }
                if candidate < self.window_lower {
                    continue;
                }
                return Some(candidate);
            }

            let period = self.cursor?;
            let candidates = self.expand(period);
            self.cursor = advance(self.rule, period, i64::from(self.rule.interval.max(1)));
            if candidates.is_empty() {
                self.barren += 1;
                if self.barren > MAX_BARREN_PERIODS {
                    self.cursor = None;
                    return None;
                }
            } else {
                self.barren = 0;
                self.buffer = candidates.into_iter();
            }
        }
    }
}

/// Hour×minute cartesian product, ascending. Empty for sub-daily rules.
fn time_pairs(rule: &Rule) -> Vec<(i8, i8)> {
    if matches!(rule.freq, Frequency::Minutely | Frequency::Hourly) {
        return Vec::new();
    }
    let hours: &[i8] = if rule.by_hour.is_empty() {
        &[0]
    } else {
        &rule.by_hour
    };
    let minutes: &[i8] = if rule.by_minute.is_empty() {
        &[0]
    } else {
        &rule.by_minute
    };
    let mut pairs: Vec<(i8, i8)> = hours
        .iter()
        .flat_map(|&hour| minutes.iter().map(move |&minute| (hour, minute)))
        .collect();
    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

/// The start of the period containing `dt`.
///
/// Sub-daily periods are the candidates themselves, aligned to the rule
/// start's sub-unit fields so an hourly rule starting 10:23 fires at :23.
fn period_start(rule: &Rule, dt: DateTime) -> DateTime {
    match rule.freq {
        Frequency::Minutely => dt.date().at(dt.hour(), dt.minute(), 0, 0),
        Frequency::Hourly => dt.date().at(dt.hour(), rule.start.minute(), 0, 0),
        Frequency::Daily => dt.date().at(0, 0, 0, 0),
        Frequency::Weekly => week_start(dt.date()).at(0, 0, 0, 0),
        Frequency::Monthly => dt.date().first_of_month().at(0, 0, 0, 0),
        Frequency::Yearly => jiff::civil::date(dt.year(), 1, 1).at(0, 0, 0, 0),
    }
}

/// Move a period start forward by `k` base periods.
fn advance(rule: &Rule, period: DateTime, k: i64) -> Option<DateTime> {
    match rule.freq {
        Frequency::Minutely => period.checked_add(k.minutes()),
        Frequency::Hourly => period.checked_add(k.hours()),
        Frequency::Daily => period.checked_add(k.days()),
        Frequency::Weekly => period.checked_add((k * 7).days()),
        Frequency::Monthly => period.checked_add(k.months()),
        Frequency::Yearly => period.checked_add(k.years()),
    }
    .ok()
}

/// Whole periods from `a` to `b`; negative when `b` is earlier.
fn periods_between(rule: &Rule, a: DateTime, b: DateTime) -> i64 {
    match rule.freq {
        Frequency::Minutely => hours_between(a, b) * 60 + i64::from(b.minute()) - i64::from(a.minute()),
        Frequency::Hourly => hours_between(a, b),
        Frequency::Daily => days_between(a.date(), b.date()),
        Frequency::Weekly => days_between(week_start(a.date()), week_start(b.date())) / 7,
        Frequency::Monthly => month_index(b.date()) - month_index(a.date()),
        Frequency::Yearly => i64::from(b.date().year()) - i64::from(a.date().year()),
    }
}

fn hours_between(a: DateTime, b: DateTime) -> i64 {
    days_between(a.date(), b.date()) * 24 + i64::from(b.hour()) - i64::from(a.hour())
}

#[cfg(test)]
mod tests {
    use evry_grammar::Frequency;
    use jiff::civil::{Weekday, date};

    use super::*;

    fn utc(year: i16, month: i8, day: i8, hour: i8, minute: i8) -> Zoned {
        date(year, month, day)
            .at(hour, minute, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
    }

    fn weekly_rule(interval: u32, by_day: Vec<Weekday>) -> Rule {
        Rule {
            freq: Frequency::Weekly,
            interval,
            by_day,
            by_hour: vec![0],
            by_minute: vec![0],
            by_month_day: vec![],
            by_month: vec![],
            start: date(2021, 1, 1).at(0, 0, 0, 0),
            until: None,
            count: None,
        }
    }

    fn schedule_with(rule: Rule) -> Schedule {
        let mut schedule = Schedule::new(TimeZone::UTC);
        schedule.push_rule(rule);
        schedule
    }

    fn dates_between(schedule: &Schedule, start: &Zoned, end: &Zoned) -> Vec<DateTime> {
        schedule
            .occurrences_between(start, end)
            .map(|occ| occ.date.datetime())
            .collect()
    }

    #[test]
    fn every_second_monday_from_a_friday_anchor() {
        let schedule = schedule_with(weekly_rule(2, vec![Weekday::Monday]));
        let dates = dates_between(&schedule, &utc(2021, 1, 1, 0, 0), &utc(2021, 2, 1, 0, 0));
        assert_eq!(
            dates,
            vec![
                date(2021, 1, 4).at(0, 0, 0, 0),
                date(2021, 1, 18).at(0, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn interval_phase_does_not_depend_on_the_window() {
        let schedule = schedule_with(weekly_rule(2, vec![Weekday::Monday]));
        // A window starting mid-stream still sees the same qualifying weeks
        let dates = dates_between(&schedule, &utc(2021, 1, 11, 0, 0), &utc(2021, 2, 1, 0, 0));
        assert_eq!(dates, vec![date(2021, 1, 18).at(0, 0, 0, 0)]);
    }

    #[test]
    fn multi_weekday_rules_fire_every_day_of_qualifying_weeks() {
        let schedule = schedule_with(weekly_rule(2, vec![Weekday::Monday, Weekday::Thursday]));
        let dates = dates_between(&schedule, &utc(2021, 1, 1, 0, 0), &utc(2021, 1, 25, 0, 0));
        assert_eq!(
            dates,
            vec![
                // Phase week: the week of the first qualifying candidate
                date(2021, 1, 4).at(0, 0, 0, 0),
                date(2021, 1, 7).at(0, 0, 0, 0),
                date(2021, 1, 18).at(0, 0, 0, 0),
                date(2021, 1, 21).at(0, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn day_31_skips_short_months() {
        let rule = Rule {
            freq: Frequency::Monthly,
            by_month_day: vec![31],
            by_day: vec![],
            by_hour: vec![0],
            by_minute: vec![0],
            by_month: vec![],
            interval: 1,
            start: date(2021, 1, 1).at(0, 0, 0, 0),
            until: None,
            count: None,
        };
        let schedule = schedule_with(rule);
        let dates = dates_between(&schedule, &utc(2021, 1, 1, 0, 0), &utc(2021, 7, 1, 0, 0));
        assert_eq!(
            dates,
            vec![
                date(2021, 1, 31).at(0, 0, 0, 0),
                date(2021, 3, 31).at(0, 0, 0, 0),
                date(2021, 5, 31).at(0, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn leap_day_rules_fire_only_in_leap_years() {
        let rule = Rule {
            freq: Frequency::Yearly,
            by_month: vec![2],
            by_month_day: vec![29],
            by_day: vec![],
            by_hour: vec![0],
            by_minute: vec![0],
            interval: 1,
            start: date(2021, 1, 1).at(0, 0, 0, 0),
            until: None,
            count: None,
        };
        let schedule = schedule_with(rule);
        let dates = dates_between(&schedule, &utc(2021, 1, 1, 0, 0), &utc(2029, 1, 1, 0, 0));
        assert_eq!(
            dates,
            vec![
                date(2024, 2, 29).at(0, 0, 0, 0),
                date(2028, 2, 29).at(0, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn impossible_rules_terminate_with_no_occurrences() {
        let rule = Rule {
            freq: Frequency::Yearly,
            by_month: vec![2],
            by_month_day: vec![30],
            by_day: vec![],
            by_hour: vec![0],
            by_minute: vec![0],
            interval: 1,
            start: date(2021, 1, 1).at(0, 0, 0, 0),
            until: None,
            count: None,
        };
        let schedule = schedule_with(rule);
        assert!(schedule.first_after(&utc(2021, 1, 1, 0, 0)).is_none());
    }

    #[test]
    fn merges_rules_and_dates_ascending_with_dedup() {
        let mut schedule = schedule_with(weekly_rule(1, vec![Weekday::Monday]));
        // Duplicates the rule's Jan 4 occurrence and adds a unique instant
        schedule.push_date(date(2021, 1, 4).at(0, 0, 0, 0));
        schedule.push_date(date(2021, 1, 6).at(15, 0, 0, 0));

        let occurrences: Vec<_> = schedule
            .occurrences_between(&utc(2021, 1, 1, 0, 0), &utc(2021, 1, 12, 0, 0))
            .collect();
        let dates: Vec<_> = occurrences.iter().map(|o| o.date.datetime()).collect();
        assert_eq!(
            dates,
            vec![
                date(2021, 1, 4).at(0, 0, 0, 0),
                date(2021, 1, 6).at(15, 0, 0, 0),
                date(2021, 1, 11).at(0, 0, 0, 0),
            ]
        );
        // The explicit date is attributed to its own source slot
        assert_eq!(occurrences[1].source, 2);
    }

    #[test]
    fn first_after_excludes_exact_ties() {
        let schedule = schedule_with(weekly_rule(1, vec![Weekday::Monday]));
        let at_occurrence = utc(2021, 1, 4, 0, 0);
        let next = schedule.first_after(&at_occurrence).unwrap();
        assert_eq!(next.date.datetime(), date(2021, 1, 11).at(0, 0, 0, 0));
    }

    #[test]
    fn sequences_are_restartable() {
        let schedule = schedule_with(weekly_rule(2, vec![Weekday::Monday]));
        let start = utc(2021, 1, 1, 0, 0);
        let first: Vec<_> = schedule.occurrences(&start).take(5).collect();
        let second: Vec<_> = schedule.occurrences(&start).take(5).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn until_bound_is_inclusive_of_its_day() {
        let rule = Rule {
            until: Some(date(2021, 1, 11).at(23, 59, 59, 999_999_999)),
            ..weekly_rule(1, vec![Weekday::Monday])
        };
        let schedule = schedule_with(rule);
        let dates = dates_between(&schedule, &utc(2021, 1, 1, 0, 0), &utc(2021, 3, 1, 0, 0));
        assert_eq!(
            dates,
            vec![
                date(2021, 1, 4).at(0, 0, 0, 0),
                date(2021, 1, 11).at(0, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn count_bound_counts_from_the_rule_start() {
        let rule = Rule {
            count: Some(3),
            ..weekly_rule(1, vec![Weekday::Monday])
        };
        let schedule = schedule_with(rule);
        let dates: Vec<_> = schedule
            .occurrences(&utc(2021, 1, 1, 0, 0))
            .map(|occ| occ.date.datetime())
            .collect();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates.last().copied(), Some(date(2021, 1, 18).at(0, 0, 0, 0)));

        // A later window sees only the tail of the same three occurrences
        let tail: Vec<_> = schedule
            .occurrences(&utc(2021, 1, 10, 0, 0))
            .map(|occ| occ.date.datetime())
            .collect();
        assert_eq!(
            tail,
            vec![
                date(2021, 1, 11).at(0, 0, 0, 0),
                date(2021, 1, 18).at(0, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn hourly_rules_keep_the_start_minute() {
        let rule = Rule {
            freq: Frequency::Hourly,
            interval: 2,
            by_day: vec![],
            by_hour: vec![],
            by_minute: vec![],
            by_month_day: vec![],
            by_month: vec![],
            start: date(2021, 1, 1).at(10, 30, 0, 0),
            until: None,
            count: None,
        };
        let schedule = schedule_with(rule);
        let dates: Vec<_> = schedule
            .occurrences(&utc(2021, 1, 1, 0, 0))
            .take(3)
            .map(|occ| occ.date.datetime())
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2021, 1, 1).at(10, 30, 0, 0),
                date(2021, 1, 1).at(12, 30, 0, 0),
                date(2021, 1, 1).at(14, 30, 0, 0),
            ]
        );
    }

    #[test]
    fn daily_times_cross_hours_and_minutes() {
        let rule = Rule {
            freq: Frequency::Daily,
            interval: 1,
            by_day: vec![],
            by_hour: vec![9, 18],
            by_minute: vec![0, 30],
            by_month_day: vec![],
            by_month: vec![],
            start: date(2021, 1, 1).at(0, 0, 0, 0),
            until: None,
            count: None,
        };
        let schedule = schedule_with(rule);
        let dates: Vec<_> = schedule
            .occurrences(&utc(2021, 1, 1, 0, 0))
            .take(4)
            .map(|occ| occ.date.datetime())
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2021, 1, 1).at(9, 0, 0, 0),
                date(2021, 1, 1).at(9, 30, 0, 0),
                date(2021, 1, 1).at(18, 0, 0, 0),
                date(2021, 1, 1).at(18, 30, 0, 0),
            ]
        );
    }

    #[test]
    fn empty_schedules_produce_nothing() {
        let schedule = Schedule::new(TimeZone::UTC);
        assert!(schedule.first_after(&utc(2021, 1, 1, 0, 0)).is_none());
        assert_eq!(
            schedule.occurrences(&utc(2021, 1, 1, 0, 0)).count(),
            0
        );
    }

    #[test]
    fn occurrences_respect_both_bounds() {
        let schedule = schedule_with(weekly_rule(1, vec![Weekday::Monday]));
        let start = utc(2021, 1, 4, 0, 0);
        let end = utc(2021, 1, 18, 0, 0);
        for occ in schedule.occurrences_between(&start, &end) {
            assert!(occ.date >= start);
            assert!(occ.date < end);
        }
        // Jan 4 included (>= start), Jan 18 excluded (half-open end)
        let dates = dates_between(&schedule, &start, &end);
        assert_eq!(
            dates,
            vec![
                date(2021, 1, 4).at(0, 0, 0, 0),
                date(2021, 1, 11).at(0, 0, 0, 0),
            ]
        );
    }
}
