// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::OnceLock;

use jiff::tz::TimeZone;
use regex::Regex;
use serde::de;

use evry_grammar::TimeOfDayTable;

use crate::expression::Engine;

/// User-facing engine configuration.
///
/// ```toml
/// timezone = "Europe/Amsterdam"
///
/// [time_of_day]
/// morning = 8
/// lunch = "13:00"
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA time zone name; the system zone when omitted.
    pub timezone: Option<String>,

    /// Hour overrides for the named times of day.
    pub time_of_day: TimeOfDayConfig,
}

impl Config {
    /// Validate the configuration.
    pub fn normalize(&self) -> Result<(), ConfigError> {
        self.time_zone().map(|_| ())
    }

    /// Resolve the configured time zone.
    ///
    /// Falls back to the system zone, then UTC, when no zone is configured.
    pub fn time_zone(&self) -> Result<TimeZone, ConfigError> {
        match &self.timezone {
            Some(name) => {
                TimeZone::get(name).map_err(|_| ConfigError::UnknownTimeZone(name.clone()))
            }
            None => Ok(system_time_zone()),
        }
    }

    /// Build an [`Engine`] from this configuration.
    pub fn engine(&self) -> Result<Engine, ConfigError> {
        Ok(Engine::new(self.time_zone()?, self.time_of_day.table()))
    }
}

fn system_time_zone() -> TimeZone {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| TimeZone::get(&name).ok())
        .unwrap_or(TimeZone::UTC)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configured time zone name is not in the IANA database.
    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),
}

/// Hour overrides for named times of day; unset entries keep their defaults.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct TimeOfDayConfig {
    morning: ClockHour,
    afternoon: ClockHour,
    evening: ClockHour,
    night: ClockHour,
    lunch: ClockHour,
    wake_up: ClockHour,
    work: ClockHour,
}

impl TimeOfDayConfig {
    /// The resolved table consumed by the grammar.
    #[must_use]
    pub fn table(&self) -> TimeOfDayTable {
        TimeOfDayTable {
            morning: self.morning.0,
            afternoon: self.afternoon.0,
            evening: self.evening.0,
            night: self.night.0,
            lunch: self.lunch.0,
            wake_up: self.wake_up.0,
            work: self.work.0,
        }
    }
}

impl Default for TimeOfDayConfig {
    fn default() -> Self {
        let table = TimeOfDayTable::default();
        TimeOfDayConfig {
            morning: ClockHour(table.morning),
            afternoon: ClockHour(table.afternoon),
            evening: ClockHour(table.evening),
            night: ClockHour(table.night),
            lunch: ClockHour(table.lunch),
            wake_up: ClockHour(table.wake_up),
            work: ClockHour(table.work),
        }
    }
}

/// An hour of day (0-23), accepted as an integer or a string like `"9"`,
/// `"09:00"` or `"9h"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockHour(i8);

impl<'de> serde::Deserialize<'de> for ClockHour {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct HourVisitor;

        impl de::Visitor<'_> for HourVisitor {
            type Value = ClockHour;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"an hour of day between 0 and 23, like 9 or "09:00""#)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                hour_in_range(value)
                    .map(ClockHour)
                    .ok_or_else(|| E::custom(format!("hour {value} out of range 0-23")))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                self.visit_i64(i64::try_from(value).unwrap_or(i64::MAX))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse_hour(value)
                    .map(ClockHour)
                    .ok_or_else(|| E::custom(format!("invalid hour {value:?}")))
            }
        }

        deserializer.deserialize_any(HourVisitor)
    }
}

fn hour_in_range(value: i64) -> Option<i8> {
    (0..=23).contains(&value).then_some(value as i8)
}

/// Parse hour strings like "9", "09", "9:00", "9h"
fn parse_hour(s: &str) -> Option<i8> {
    const RE: &str = r"(?i)^\s*(\d{1,2})\s*(?::00|h)?\s*$";
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| Regex::new(RE).unwrap());
    let captures = re.captures(s)?;
    let value = captures.get(1)?.as_str().parse::<i64>().ok()?;
    hour_in_range(value)
}
