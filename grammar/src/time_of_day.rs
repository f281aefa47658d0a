// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Caller-supplied mapping from named times of day to hours.

use std::str::FromStr;

/// A named time of day recognized by the grammar.
///
/// These resolve through a [`TimeOfDayTable`] rather than fixed hours, so a
/// night-owl user can move "morning" without touching the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[expect(missing_docs)]
pub enum NamedTime {
    Morning,
    Afternoon,
    Evening,
    Night,
    Lunch,
    WakeUp,
    Work,
}

/// Hours-of-day for each named time, supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDayTable {
    /// "morning", "in the morning"
    pub morning: i8,
    /// "afternoon" resolves as "after lunch"
    pub afternoon: i8,
    /// "evening", "in the evening"
    pub evening: i8,
    /// "night", "at night"
    pub night: i8,
    /// "lunch", "after lunch"
    pub lunch: i8,
    /// "wake up"
    pub wake_up: i8,
    /// "work" means the end of the work day, as in "after work"
    pub work: i8,
}

impl TimeOfDayTable {
    /// Resolve a named time to its hour of day.
    #[must_use]
    pub fn hour(&self, name: NamedTime) -> i8 {
        match name {
            NamedTime::Morning => self.morning,
            NamedTime::Afternoon => self.afternoon,
            NamedTime::Evening => self.evening,
            NamedTime::Night => self.night,
            NamedTime::Lunch => self.lunch,
            NamedTime::WakeUp => self.wake_up,
            NamedTime::Work => self.work,
        }
    }

    /// Resolve a single keyword to an hour, if it names a time of day.
    ///
    /// "noon" and "midnight" are fixed clock points, not table entries.
    #[must_use]
    pub fn hour_of_keyword(&self, word: &str) -> Option<i8> {
        if word.eq_ignore_ascii_case(crate::keyword::KW_NOON) {
            return Some(12);
        }
        if word.eq_ignore_ascii_case(crate::keyword::KW_MIDNIGHT) {
            return Some(0);
        }
        NamedTime::from_str(&word.to_ascii_lowercase())
            .ok()
            .map(|name| self.hour(name))
    }
}

impl Default for TimeOfDayTable {
    fn default() -> Self {
        TimeOfDayTable {
            morning: 9,
            afternoon: 15,
            evening: 18,
            night: 22,
            lunch: 15,
            wake_up: 7,
            work: 18,
        }
    }
}
