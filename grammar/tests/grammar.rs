// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the expression grammar
//!
//! These exercise whole sentences through the public API, anchored at a fixed
//! instant so every relative keyword resolves deterministically.

use evry_grammar::{Ast, Frequency, ParseContext, StartSymbol, TimeOfDayTable, parse, parse_at};
use jiff::SignedDuration;
use jiff::civil::{Weekday, date};

/// Anchor for all tests: 2021-01-01 00:00:00, a Friday.
fn ctx() -> ParseContext {
    ParseContext::new(date(2021, 1, 1).at(0, 0, 0, 0))
}

#[test]
fn time_construct_resolves_against_anchor() {
    let ast = parse_at("at 5", ctx(), StartSymbol::TimeConstruct).unwrap();
    assert_eq!(ast.start, Some(date(2021, 1, 1).at(5, 0, 0, 0)));
    assert_eq!(ast.freq, None);
    assert_eq!(ast.subject, "");
}

#[test]
fn counted_plural_weekdays() {
    let ast = parse("every 2 mondays", ctx()).unwrap();
    assert_eq!(ast.freq, Some(Frequency::Weekly));
    assert_eq!(ast.interval, 2);
    assert_eq!(ast.by_day, vec![Weekday::Monday]);
}

#[test]
fn yearly_day_and_month() {
    let ast = parse("every 29 december", ctx()).unwrap();
    assert_eq!(ast.freq, Some(Frequency::Yearly));
    assert_eq!(ast.by_month_day, vec![29]);
    assert_eq!(ast.by_month, vec![12]);
}

#[test]
fn full_numeric_date_with_time() {
    let ast = parse("23/12/2022 at 20:50", ctx()).unwrap();
    assert_eq!(ast.start, Some(date(2022, 12, 23).at(20, 50, 0, 0)));
    assert_eq!(ast.freq, None);
}

#[test]
fn subject_with_recurrence_and_hour_suffix() {
    let ast = parse("word every 2 thursdays at 11h", ctx()).unwrap();
    assert_eq!(ast.subject, "word");
    assert_eq!(ast.freq, Some(Frequency::Weekly));
    assert_eq!(ast.interval, 2);
    assert_eq!(ast.by_day, vec![Weekday::Thursday]);
    assert_eq!(ast.by_hour, vec![11]);
    assert_eq!(ast.by_minute, vec![0]);
}

#[test]
fn keywords_are_case_insensitive() {
    let lower = parse("task every 2 mondays at 11h", ctx()).unwrap();
    let mixed = parse("task EVERY 2 Mondays AT 11H", ctx()).unwrap();
    assert_eq!(lower.freq, mixed.freq);
    assert_eq!(lower.interval, mixed.interval);
    assert_eq!(lower.by_day, mixed.by_day);
    assert_eq!(lower.by_hour, mixed.by_hour);
    // Subject keeps its original casing
    assert_eq!(mixed.subject, "task");
}

#[test]
fn the_full_sentence_from_the_readme() {
    let ast = parse("task every 2 mondays at 11h for 1h starting tomorrow", ctx()).unwrap();
    assert_eq!(
        ast,
        Ast {
            subject: "task".to_owned(),
            freq: Some(Frequency::Weekly),
            interval: 2,
            by_day: vec![Weekday::Monday],
            by_hour: vec![11],
            by_minute: vec![0],
            start: Some(date(2021, 1, 2).at(0, 0, 0, 0)),
            duration: Some(SignedDuration::from_hours(1)),
            ..Ast::default()
        }
    );
}

#[test]
fn one_off_with_annotations_and_duration() {
    let ast = parse("dentist tomorrow at 9:30 for 45 min @health #self", ctx()).unwrap();
    assert_eq!(ast.subject, "dentist");
    assert_eq!(ast.start, Some(date(2021, 1, 2).at(9, 30, 0, 0)));
    assert_eq!(ast.duration, Some(SignedDuration::from_mins(45)));
    assert_eq!(ast.context.as_deref(), Some("health"));
    assert_eq!(ast.tags, vec!["self"]);
}

#[test]
fn named_times_resolve_through_the_table() {
    let ast = parse("review every day after lunch", ctx()).unwrap();
    assert_eq!(ast.freq, Some(Frequency::Daily));
    assert_eq!(ast.by_hour, vec![15]);

    let night_owl = ctx().with_time_of_day(TimeOfDayTable {
        lunch: 13,
        ..TimeOfDayTable::default()
    });
    let ast = parse("review every day after lunch", night_owl).unwrap();
    assert_eq!(ast.by_hour, vec![13]);
}

#[test]
fn weekend_one_off_and_recurring_both_mean_saturday() {
    let ast = parse("hike weekend", ctx()).unwrap();
    assert_eq!(ast.start, Some(date(2021, 1, 2).at(0, 0, 0, 0)));

    let ast = parse("hike every weekend", ctx()).unwrap();
    assert_eq!(ast.by_day, vec![Weekday::Saturday]);
}

#[test]
fn pure_subjects_have_no_temporal_meaning() {
    let ast = parse("think about life", ctx()).unwrap();
    assert_eq!(ast.subject, "think about life");
    assert!(ast.start.is_none());
    assert!(ast.freq.is_none());
}

#[test]
fn malformed_constructs_report_columns() {
    let err = parse_at("for 1 banana", ctx(), StartSymbol::DurationConstruct).unwrap_err();
    assert_eq!(err.column, 7);

    let err = parse_at("at 99", ctx(), StartSymbol::TimeConstruct).unwrap_err();
    assert!(err.column >= 4);

    assert!(parse("meet at banana", ctx()).is_err());
    assert!(parse("task every", ctx()).is_err());
}

#[test]
fn determinism_for_fixed_inputs() {
    let srcs = [
        "task every 2 mondays at 11h",
        "standup every day at 9:15 until 31/3",
        "party 23/12 at 20:00",
    ];
    for src in srcs {
        assert_eq!(parse(src, ctx()), parse(src, ctx()), "not deterministic: {src}");
    }
}
