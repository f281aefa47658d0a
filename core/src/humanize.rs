// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical re-rendering of parsed expressions.
//!
//! The inverse of the grammar: every phrase emitted here parses back to an
//! equal normalized rule, which is what lets the UI rewrite the input box
//! with a canonicalized version of what the user typed.

use evry_grammar::keyword::{KW_MONTH_NAMES, KW_WEEKDAY_NAMES};
use evry_grammar::{Ast, Frequency};
use jiff::SignedDuration;
use jiff::civil::{Date, DateTime, Weekday};

use crate::datetime::days_between;

/// Reconstruct a canonical phrase for `ast`, with dates rendered relative to
/// `anchor` ("today", "tomorrow", a weekday name, or `d/m/yyyy`).
#[must_use]
pub fn human_readable(ast: &Ast, anchor: DateTime) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !ast.subject.is_empty() {
        parts.push(ast.subject.clone());
    }

    match ast.freq {
        Some(freq) => {
            parts.push(recurrence_phrase(ast, freq));
            if let Some(times) = times_phrase(ast, freq) {
                parts.push(times);
            }
            if let Some(start) = ast.start {
                parts.push(format!("starting {}", date_phrase(start.date(), anchor)));
            }
            if let Some(until) = ast.until {
                parts.push(format!("until {}", date_phrase(until, anchor)));
            }
        }
        None => {
            if let Some(start) = ast.start {
                parts.push(date_phrase(start.date(), anchor));
                if (start.hour(), start.minute()) != (0, 0) {
                    parts.push(format!("at {}", clock_phrase(start.hour(), start.minute())));
                }
            }
        }
    }

    if let Some(duration) = ast.duration {
        parts.push(format!("for {}", duration_phrase(duration)));
    }
    if let Some(context) = &ast.context {
        parts.push(format!("@{context}"));
    }
    for tag in &ast.tags {
        parts.push(format!("#{tag}"));
    }

    parts.join(" ")
}

fn recurrence_phrase(ast: &Ast, freq: Frequency) -> String {
    let interval = ast.interval.max(1);

    match freq {
        Frequency::Weekly if !ast.by_day.is_empty() => {
            let names: Vec<&str> = ast.by_day.iter().map(|&wd| weekday_name(wd)).collect();
            if names.len() == 1 && interval > 1 {
                format!("every {interval} {}s", names[0])
            } else if interval == 1 {
                format!("every {}", names.join(" and "))
            } else {
                format!("every {interval} weeks on {}", names.join(" and "))
            }
        }
        Frequency::Yearly if !ast.by_month.is_empty() => {
            let month = month_name(ast.by_month.first().copied().unwrap_or(1));
            match ast.by_month_day.first() {
                None => format!("every {month}"),
                Some(day) if interval == 1 => format!("every {day} {month}"),
                Some(day) => format!("every {interval} years on {day} {month}"),
            }
        }
        Frequency::Monthly if !ast.by_month_day.is_empty() => {
            let days: Vec<String> = ast.by_month_day.iter().map(|&d| ordinal(d)).collect();
            if days.len() == 1 && interval == 1 {
                format!("every {}", days[0])
            } else if interval == 1 {
                format!("every month on the {}", days.join(" and "))
            } else {
                format!("every {interval} months on the {}", days.join(" and "))
            }
        }
        _ => {
            let unit = unit_word(freq);
            if interval == 1 {
                format!("every {unit}")
            } else {
                format!("every {interval} {unit}s")
            }
        }
    }
}

/// "at 9", "at 20:50", "at 9 and 18". Omitted for sub-daily frequencies and
/// for the default midnight fill.
fn times_phrase(ast: &Ast, freq: Frequency) -> Option<String> {
    if matches!(freq, Frequency::Minutely | Frequency::Hourly) || ast.by_hour.is_empty() {
        return None;
    }

    let minutes: Vec<i8> = {
        let mut m = ast.by_minute.clone();
        m.sort_unstable();
        m.dedup();
        if m.is_empty() { vec![0] } else { m }
    };
    let hours: Vec<i8> = {
        let mut h = ast.by_hour.clone();
        h.sort_unstable();
        h.dedup();
        h
    };

    if hours == [0] && minutes == [0] {
        return None;
    }

    let clocks: Vec<String> = hours
        .iter()
        .flat_map(|&hour| minutes.iter().map(move |&minute| clock_phrase(hour, minute)))
        .collect();
    Some(format!("at {}", clocks.join(" and ")))
}

fn date_phrase(date: Date, anchor: DateTime) -> String {
    let today = anchor.date();
    if date == today {
        return "today".to_owned();
    }
    if today.tomorrow().is_ok_and(|tomorrow| tomorrow == date) {
        return "tomorrow".to_owned();
    }
    let ahead = days_between(today, date);
    if (2..=6).contains(&ahead) {
        return weekday_name(date.weekday()).to_owned();
    }
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

fn clock_phrase(hour: i8, minute: i8) -> String {
    if minute == 0 {
        format!("{hour}")
    } else {
        format!("{hour}:{minute:02}")
    }
}

fn duration_phrase(duration: SignedDuration) -> String {
    let secs = duration.as_secs();
    if secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else {
        format!("{} min", secs / 60)
    }
}

fn unit_word(freq: Frequency) -> &'static str {
    match freq {
        Frequency::Minutely => "minute",
        Frequency::Hourly => "hour",
        Frequency::Daily => "day",
        Frequency::Weekly => "week",
        Frequency::Monthly => "month",
        Frequency::Yearly => "year",
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    let idx = weekday.to_monday_zero_offset() as usize;
    KW_WEEKDAY_NAMES.get(idx).copied().unwrap_or("monday")
}

fn month_name(month: i8) -> &'static str {
    let idx = month.saturating_sub(1) as usize;
    KW_MONTH_NAMES.get(idx).copied().unwrap_or("january")
}

fn ordinal(day: i8) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

#[cfg(test)]
mod tests {
    use evry_grammar::{ParseContext, parse};
    use jiff::civil::date;

    use super::*;
    use crate::rule::normalize;

    fn anchor() -> DateTime {
        date(2021, 1, 1).at(0, 0, 0, 0)
    }

    fn render(src: &str) -> String {
        let ast = parse(src, ParseContext::new(anchor())).unwrap();
        human_readable(&ast, anchor())
    }

    #[test]
    fn renders_recurrences() {
        assert_eq!(render("task every 2 mondays"), "task every 2 mondays");
        assert_eq!(render("task every monday and friday"), "task every monday and friday");
        assert_eq!(render("task every day at 9"), "task every day at 9");
        assert_eq!(render("task every 29 december"), "task every 29 december");
        assert_eq!(render("task every 29th"), "task every 29th");
        assert_eq!(render("task every 2 hours"), "task every 2 hours");
    }

    #[test]
    fn renders_one_offs_relative_to_the_anchor() {
        assert_eq!(render("task today"), "task today");
        assert_eq!(render("task tomorrow at 5"), "task tomorrow at 5");
        // Within the week: a weekday name
        assert_eq!(render("task 4/1/2021 at 5"), "task monday at 5");
        // Far away: numeric
        assert_eq!(render("task 23/12/2022 at 20:50"), "task 23/12/2022 at 20:50");
    }

    #[test]
    fn rewrites_stale_dates_against_a_fresh_anchor() {
        // The §6 scenario: an absolute date redisplayed as "tomorrow"
        let anchor = date(2020, 1, 1).at(0, 0, 0, 0);
        let ast = parse("task 2/1/2020 at 5", ParseContext::new(anchor)).unwrap();
        assert_eq!(human_readable(&ast, anchor), "task tomorrow at 5");
    }

    #[test]
    fn renders_durations_and_annotations() {
        assert_eq!(
            render("task every day for 1h @home #a #b"),
            "task every day for 1h @home #a #b"
        );
        assert_eq!(render("call for 45 min tomorrow"), "call tomorrow for 45 min");
    }

    #[test]
    fn canonical_phrases_round_trip_to_equal_rules() {
        let sources = [
            "task every 2 mondays",
            "task every wednesday at 11",
            "task every day after lunch",
            "task every 29 december",
            "task every month on the 15th",
            "task every 2 weeks on monday and thursday at 8:30",
            "task every morning starting tomorrow",
            "task every day until 31/3",
        ];
        for src in sources {
            let ctx = ParseContext::new(anchor());
            let ast = parse(src, ctx).unwrap();
            let rendered = human_readable(&ast, anchor());
            let reparsed = parse(&rendered, ctx)
                .unwrap_or_else(|e| panic!("{rendered:?} does not reparse: {e}"));
            assert_eq!(
                normalize(&reparsed, anchor()),
                normalize(&ast, anchor()),
                "rule drifted for {src:?} via {rendered:?}"
            );
        }
    }
}
