// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parsed expression AST.

use jiff::SignedDuration;
use jiff::civil::{Date, DateTime, Weekday};

/// Structured result of parsing one schedule expression.
///
/// Exactly one of `freq` (a recurring rule) or a freq-less `start` (a one-off
/// instant) describes when the expression happens; when both are absent the
/// expression is a pure free-text subject with no temporal meaning, which is
/// still a valid expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    /// Free text with all temporal and annotation fragments stripped
    pub subject: String,

    /// Frequency of recurrence; `None` for one-off expressions
    pub freq: Option<Frequency>,

    /// "every N units", counted from the rule start boundary
    pub interval: u32,

    /// Days of the week the rule fires on
    pub by_day: Vec<Weekday>,

    /// Hours of the day (0-23) the rule fires at
    pub by_hour: Vec<i8>,

    /// Minutes of the hour (0-59), crossed with `by_hour`
    pub by_minute: Vec<i8>,

    /// Days of the month (1-31)
    pub by_month_day: Vec<i8>,

    /// Months of the year (1-12)
    pub by_month: Vec<i8>,

    /// Explicit instant: the one-off moment, or a recurring rule's lower bound
    pub start: Option<DateTime>,

    /// Last day the rule applies, inclusive
    pub until: Option<Date>,

    /// "for 1h"
    pub duration: Option<SignedDuration>,

    /// Single `@word` annotation
    pub context: Option<String>,

    /// `#word` annotations, in input order, deduplicated
    pub tags: Vec<String>,
}

impl Ast {
    /// Whether this expression carries any temporal meaning at all.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.freq.is_some() || self.start.is_some()
    }
}

impl Default for Ast {
    fn default() -> Self {
        Ast {
            subject: String::new(),
            freq: None,
            interval: 1,
            by_day: Vec::new(),
            by_hour: Vec::new(),
            by_minute: Vec::new(),
            by_month_day: Vec::new(),
            by_month: Vec::new(),
            start: None,
            until: None,
            duration: None,
            context: None,
            tags: Vec::new(),
        }
    }
}

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[expect(missing_docs)]
pub enum Frequency {
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}
