// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Keywords recognized by the schedule expression grammar.
//!
//! All keyword matching is ASCII-case-insensitive; the constants here are the
//! canonical lowercase spellings, which are also what the canonical renderer
//! emits.

pub const KW_EVERY: &str = "every";
pub const KW_STARTING: &str = "starting";
pub const KW_UNTIL: &str = "until";
pub const KW_FOR: &str = "for";
pub const KW_AT: &str = "at";
pub const KW_AFTER: &str = "after";
pub const KW_IN: &str = "in";
pub const KW_THE: &str = "the";
pub const KW_ON: &str = "on";
pub const KW_AND: &str = "and";
pub const KW_NEXT: &str = "next";

// Relative dates
pub const KW_TODAY: &str = "today";
pub const KW_TOMORROW: &str = "tomorrow";
pub const KW_YESTERDAY: &str = "yesterday";
pub const KW_WEEKEND: &str = "weekend";
pub const KW_WEEKENDS: &str = "weekends";

// Named times of day
pub const KW_MORNING: &str = "morning";
pub const KW_AFTERNOON: &str = "afternoon";
pub const KW_EVENING: &str = "evening";
pub const KW_NIGHT: &str = "night";
pub const KW_LUNCH: &str = "lunch";
pub const KW_WAKE: &str = "wake";
pub const KW_UP: &str = "up";
pub const KW_WORK: &str = "work";
pub const KW_NOON: &str = "noon";
pub const KW_MIDNIGHT: &str = "midnight";

// Clock suffixes
pub const KW_HOUR_SUFFIX: &str = "h";
pub const KW_AM: &str = "am";
pub const KW_PM: &str = "pm";

// Ordinal suffixes ("29th", "3rd")
pub const KW_ORD_ST: &str = "st";
pub const KW_ORD_ND: &str = "nd";
pub const KW_ORD_RD: &str = "rd";
pub const KW_ORD_TH: &str = "th";

// Weekday names with their three-letter abbreviations
pub const KW_MONDAY: &str = "monday";
pub const KW_TUESDAY: &str = "tuesday";
pub const KW_WEDNESDAY: &str = "wednesday";
pub const KW_THURSDAY: &str = "thursday";
pub const KW_FRIDAY: &str = "friday";
pub const KW_SATURDAY: &str = "saturday";
pub const KW_SUNDAY: &str = "sunday";

// Month names
pub const KW_JANUARY: &str = "january";
pub const KW_FEBRUARY: &str = "february";
pub const KW_MARCH: &str = "march";
pub const KW_APRIL: &str = "april";
pub const KW_MAY: &str = "may";
pub const KW_JUNE: &str = "june";
pub const KW_JULY: &str = "july";
pub const KW_AUGUST: &str = "august";
pub const KW_SEPTEMBER: &str = "september";
pub const KW_OCTOBER: &str = "october";
pub const KW_NOVEMBER: &str = "november";
pub const KW_DECEMBER: &str = "december";

/// Month names in calendar order, for name→number lookup and rendering.
pub const KW_MONTH_NAMES: [&str; 12] = [
    KW_JANUARY,
    KW_FEBRUARY,
    KW_MARCH,
    KW_APRIL,
    KW_MAY,
    KW_JUNE,
    KW_JULY,
    KW_AUGUST,
    KW_SEPTEMBER,
    KW_OCTOBER,
    KW_NOVEMBER,
    KW_DECEMBER,
];

/// Weekday names in Monday-first order, for name→weekday lookup and rendering.
pub const KW_WEEKDAY_NAMES: [&str; 7] = [
    KW_MONDAY,
    KW_TUESDAY,
    KW_WEDNESDAY,
    KW_THURSDAY,
    KW_FRIDAY,
    KW_SATURDAY,
    KW_SUNDAY,
];

// Frequency units
pub const KW_MINUTE: &str = "minute";
pub const KW_MIN: &str = "min";
pub const KW_HOUR: &str = "hour";
pub const KW_DAY: &str = "day";
pub const KW_WEEK: &str = "week";
pub const KW_MONTH: &str = "month";
pub const KW_YEAR: &str = "year";
