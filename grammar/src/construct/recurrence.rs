// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence constructs: everything introduced by "every".

use chumsky::extra::ParserExtra;
use chumsky::input::ValueInput;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::civil::Weekday;

use crate::ast::Frequency;
use crate::construct::date::weekday_from_name;
use crate::construct::miscellaneous::{ConstructExpected, int_u32, kw, list_sep, positive_u32, word};
use crate::keyword::{
    KW_EVERY, KW_MONTH_NAMES, KW_ON, KW_ORD_ND, KW_ORD_RD, KW_ORD_ST, KW_ORD_TH, KW_THE,
    KW_WEEKEND, KW_WEEKENDS,
};
use crate::lexer::Token;
use crate::parser::ParseContext;

/// Raw recurrence fragment emitted by the grammar, later canonicalized into a
/// rule by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecurSpec {
    pub freq: Frequency,
    pub interval: u32,
    pub by_day: Vec<Weekday>,
    pub by_month_day: Vec<i8>,
    pub by_month: Vec<i8>,
    pub by_hour: Vec<i8>,
    pub by_minute: Vec<i8>,
}

impl RecurSpec {
    fn new(freq: Frequency) -> Self {
        RecurSpec {
            freq,
            interval: 1,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_month: Vec::new(),
            by_hour: Vec::new(),
            by_minute: Vec::new(),
        }
    }
}

/// An "on …" refinement after a frequency unit.
#[derive(Debug, Clone, PartialEq)]
enum OnWhich {
    Weekdays(Vec<Weekday>),
    MonthDays(Vec<i8>),
    DateOfYear(i8, i8),
}

/// What follows the count in "every N …".
#[derive(Debug, Clone, PartialEq)]
enum CountedTail {
    Weekdays(Vec<Weekday>),
    Month(i8),
    Unit(Frequency, Option<OnWhich>),
    Ordinal,
}

/// Format Definition:
///
/// ```txt
/// every-construct = "every" ( counted / uncounted )
///
/// counted         = count ( weekday-list          ; every 2 mondays
///                         / month-name            ; every 29 december
///                         / unit [ on-suffix ]    ; every 2 weeks on monday
///                         / [ ordinal-suffix ] )  ; every 29th
///
/// uncounted       = weekday-list                  ; every monday and friday
///                 / month-name                    ; every december
///                 / "weekend" / "weekends"        ; every weekend
///                 / named-time                    ; every morning
///                 / unit [ on-suffix ]            ; every day
///
/// on-suffix       = "on" ( day-of-month month-name
///                        / [ "the" ] ordinal-day *( list-sep ordinal-day )
///                        / weekday-list )
/// ```
pub(crate) fn every_construct<'tokens, 'src: 'tokens, I, E>(
    ctx: ParseContext,
) -> impl Parser<'tokens, I, RecurSpec, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    kw(KW_EVERY).ignore_then(choice((counted(), uncounted(ctx))))
}

fn counted<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, RecurSpec, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    let tail = choice((
        weekday_list().map(CountedTail::Weekdays),
        month_name().map(CountedTail::Month),
        unit()
            .then(on_suffix().or_not())
            .map(|(freq, on)| CountedTail::Unit(freq, on)),
        ordinal_suffix().or_not().to(CountedTail::Ordinal),
    ));

    positive_u32()
        .then(tail)
        .try_map_with(|(count, tail), e| match tail {
            CountedTail::Weekdays(days) => {
                let mut spec = RecurSpec::new(Frequency::Weekly);
                spec.interval = count;
                spec.by_day = days;
                Ok(spec)
            }
            CountedTail::Month(month) => {
                let day = day_of_month(count).ok_or_else(|| {
                    E::Error::expected_found([ConstructExpected::DayOfMonth], None, e.span())
                })?;
                let mut spec = RecurSpec::new(Frequency::Yearly);
                spec.by_month_day.push(day);
                spec.by_month.push(month);
                Ok(spec)
            }
            CountedTail::Unit(freq, on) => {
                let mut spec = RecurSpec::new(freq);
                spec.interval = count;
                if let Some(on) = on {
                    apply_on(&mut spec, on);
                }
                Ok(spec)
            }
            CountedTail::Ordinal => {
                let day = day_of_month(count).ok_or_else(|| {
                    E::Error::expected_found([ConstructExpected::DayOfMonth], None, e.span())
                })?;
                let mut spec = RecurSpec::new(Frequency::Monthly);
                spec.by_month_day.push(day);
                Ok(spec)
            }
        })
}

fn uncounted<'tokens, 'src: 'tokens, I, E>(
    ctx: ParseContext,
) -> impl Parser<'tokens, I, RecurSpec, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    let table = ctx.time_of_day;

    choice((
        weekday_list().map(|days| {
            let mut spec = RecurSpec::new(Frequency::Weekly);
            spec.by_day = days;
            spec
        }),
        month_name().map(|month| {
            let mut spec = RecurSpec::new(Frequency::Yearly);
            spec.by_month.push(month);
            spec
        }),
        choice((kw(KW_WEEKEND), kw(KW_WEEKENDS))).map(|()| {
            let mut spec = RecurSpec::new(Frequency::Weekly);
            spec.by_day.push(Weekday::Saturday);
            spec
        }),
        word().try_map_with(move |w, e| {
            let hour = table.hour_of_keyword(w).ok_or_else(|| {
                E::Error::expected_found([ConstructExpected::NamedTime], None, e.span())
            })?;
            let mut spec = RecurSpec::new(Frequency::Daily);
            spec.by_hour.push(hour);
            spec.by_minute.push(0);
            Ok(spec)
        }),
        unit().then(on_suffix().or_not()).map(|(freq, on)| {
            let mut spec = RecurSpec::new(freq);
            if let Some(on) = on {
                apply_on(&mut spec, on);
            }
            spec
        }),
    ))
}

fn apply_on(spec: &mut RecurSpec, on: OnWhich) {
    match on {
        OnWhich::Weekdays(days) => spec.by_day.extend(days),
        OnWhich::MonthDays(days) => spec.by_month_day.extend(days),
        OnWhich::DateOfYear(day, month) => {
            spec.by_month_day.push(day);
            spec.by_month.push(month);
        }
    }
}

fn on_suffix<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, OnWhich, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    let date_of_year = month_day()
        .then(month_name())
        .map(|(day, month)| OnWhich::DateOfYear(day, month));

    let ordinal_day = month_day().then_ignore(ordinal_suffix().or_not());
    let month_days = kw(KW_THE)
        .or_not()
        .ignore_then(ordinal_day.separated_by(list_sep()).at_least(1).collect())
        .map(OnWhich::MonthDays);

    kw(KW_ON).ignore_then(choice((
        date_of_year,
        month_days,
        weekday_list().map(OnWhich::Weekdays),
    )))
}

/// One or more weekday names, singular or plural, separated by "and"/commas.
fn weekday_list<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, Vec<Weekday>, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    weekday_or_plural()
        .separated_by(list_sep())
        .at_least(1)
        .collect()
}

/// "monday" and "mondays" both name Monday.
fn weekday_or_plural<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, Weekday, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    word().try_map_with(|w: &str, e| {
        weekday_from_name(w)
            .or_else(|| w.strip_suffix(['s', 'S']).and_then(weekday_from_name))
            .ok_or_else(|| {
                E::Error::expected_found([ConstructExpected::WeekdayName], None, e.span())
            })
    })
}

fn month_name<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, i8, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    word().try_map_with(|w, e| {
        month_from_name(w).ok_or_else(|| {
            E::Error::expected_found([ConstructExpected::MonthName], None, e.span())
        })
    })
}

pub(crate) fn month_from_name(s: &str) -> Option<i8> {
    let lower = s.to_ascii_lowercase();
    KW_MONTH_NAMES
        .iter()
        .position(|name| lower == *name || (lower.len() == 3 && name.starts_with(&lower)))
        .map(|idx| idx as i8 + 1)
}

/// A frequency unit word, singular or plural.
fn unit<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, Frequency, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    word().try_map_with(|w: &str, e| {
        match w.to_ascii_lowercase().as_str() {
            "minute" | "minutes" | "min" | "mins" => Ok(Frequency::Minutely),
            "hour" | "hours" => Ok(Frequency::Hourly),
            "day" | "days" => Ok(Frequency::Daily),
            "week" | "weeks" => Ok(Frequency::Weekly),
            "month" | "months" => Ok(Frequency::Monthly),
            "year" | "years" => Ok(Frequency::Yearly),
            _ => Err(E::Error::expected_found(
                [ConstructExpected::TimeUnit],
                None,
                e.span(),
            )),
        }
    })
}

fn ordinal_suffix<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, (), E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
{
    choice((
        kw(KW_ORD_ST),
        kw(KW_ORD_ND),
        kw(KW_ORD_RD),
        kw(KW_ORD_TH),
    ))
}

/// A day-of-month number (1-31) from an already-parsed count.
fn day_of_month(count: u32) -> Option<i8> {
    (1..=31).contains(&count).then_some(count as i8)
}

/// A day-of-month token (1-31).
fn month_day<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, i8, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    int_u32().try_map_with(|v, e| {
        day_of_month(v).ok_or_else(|| {
            E::Error::expected_found([ConstructExpected::DayOfMonth], None, e.span())
        })
    })
}
