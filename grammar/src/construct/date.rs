// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Date constructs: numeric dates and relative date keywords.
//!
//! All relative keywords resolve against the parse anchor, never against the
//! wall clock, so parsing is deterministic for a fixed anchor.

use chumsky::extra::ParserExtra;
use chumsky::input::ValueInput;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::ToSpan;
use jiff::civil::{Date, Weekday};

use crate::construct::miscellaneous::{ConstructExpected, int_u32, kw, word};
use crate::keyword::{
    KW_FRIDAY, KW_MONDAY, KW_MONTH, KW_NEXT, KW_ON, KW_SATURDAY, KW_SUNDAY, KW_THURSDAY, KW_TODAY,
    KW_TOMORROW, KW_TUESDAY, KW_WEDNESDAY, KW_WEEK, KW_WEEKEND, KW_WEEKENDS, KW_YESTERDAY,
};
use crate::lexer::Token;
use crate::parser::ParseContext;

/// Format Definition:
///
/// ```txt
/// date-construct = numeric-date
///                / "today" / "tomorrow" / "yesterday"
///                / "next" ( "week" / "month" / weekday-name )
///                / "on" weekday-name
///                / "weekend" / "weekends"
///                / weekday-name
///
/// numeric-date   = day "/" month [ "/" year ]
/// ```
pub(crate) fn date_construct<'tokens, 'src: 'tokens, I, E>(
    ctx: ParseContext,
) -> impl Parser<'tokens, I, Date, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    let anchor = ctx.anchor.date();

    choice((
        numeric_date(ctx),
        kw(KW_TODAY).to(anchor),
        kw(KW_TOMORROW).map(move |()| anchor.tomorrow().unwrap_or(anchor)),
        kw(KW_YESTERDAY).map(move |()| anchor.yesterday().unwrap_or(anchor)),
        kw(KW_NEXT).ignore_then(choice((
            kw(KW_WEEK).map(move |()| next_week(anchor)),
            kw(KW_MONTH).map(move |()| next_month(anchor)),
            weekday().map(move |wd| next_weekday(anchor, wd)),
        ))),
        kw(KW_ON).ignore_then(weekday()).map(move |wd| next_or_same_weekday(anchor, wd)),
        choice((kw(KW_WEEKEND), kw(KW_WEEKENDS)))
            .map(move |()| next_or_same_weekday(anchor, Weekday::Saturday)),
        weekday().map(move |wd| next_or_same_weekday(anchor, wd)),
    ))
}

/// `d/m[/y]`. A missing year resolves to the first year at/after the anchor
/// in which the day/month combination exists; two-digit years are 2000-based.
fn numeric_date<'tokens, 'src: 'tokens, I, E>(
    ctx: ParseContext,
) -> impl Parser<'tokens, I, Date, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    let anchor = ctx.anchor.date();

    int_u32()
        .then_ignore(just(Token::Slash))
        .then(int_u32())
        .then(just(Token::Slash).ignore_then(int_u32()).or_not())
        .try_map_with(move |((day, month), year), e| {
            resolve_numeric_date(anchor, day, month, year)
                .ok_or_else(|| E::Error::expected_found([ConstructExpected::Date], None, e.span()))
        })
}

fn resolve_numeric_date(anchor: Date, day: u32, month: u32, year: Option<u32>) -> Option<Date> {
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return None;
    }
    let (day, month) = (day as i8, month as i8);

    match year {
        Some(year) => {
            let year = if year < 100 { 2000 + year } else { year };
            Date::new(i16::try_from(year).ok()?, month, day).ok()
        }
        // No year given: the next time this day/month exists, starting at the
        // anchor year. The scan covers leap-day inputs like 29/2.
        None => (0..=8).find_map(|offset| {
            let date = Date::new(anchor.year().checked_add(offset)?, month, day).ok()?;
            (date >= anchor).then_some(date)
        }),
    }
}

/// A full or three-letter weekday name.
pub(crate) fn weekday<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, Weekday, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    word().try_map_with(|w, e| {
        weekday_from_name(w).ok_or_else(|| {
            E::Error::expected_found([ConstructExpected::WeekdayName], None, e.span())
        })
    })
}

pub(crate) fn weekday_from_name(s: &str) -> Option<Weekday> {
    let lower = s.to_ascii_lowercase();
    let names = [
        (KW_MONDAY, Weekday::Monday),
        (KW_TUESDAY, Weekday::Tuesday),
        (KW_WEDNESDAY, Weekday::Wednesday),
        (KW_THURSDAY, Weekday::Thursday),
        (KW_FRIDAY, Weekday::Friday),
        (KW_SATURDAY, Weekday::Saturday),
        (KW_SUNDAY, Weekday::Sunday),
    ];
    names
        .into_iter()
        .find(|(name, _)| lower == *name || (lower.len() == 3 && name.starts_with(&lower)))
        .map(|(_, wd)| wd)
}

pub(crate) fn next_or_same_weekday(date: Date, weekday: Weekday) -> Date {
    if date.weekday() == weekday {
        date
    } else {
        date.nth_weekday(1, weekday).unwrap_or(date)
    }
}

pub(crate) fn next_weekday(date: Date, weekday: Weekday) -> Date {
    date.nth_weekday(1, weekday).unwrap_or(date)
}

fn next_week(date: Date) -> Date {
    let offset = i64::from(date.weekday().to_monday_zero_offset());
    date.checked_sub(offset.days())
        .and_then(|monday| monday.checked_add(7.days()))
        .unwrap_or(date)
}

fn next_month(date: Date) -> Date {
    date.first_of_month().checked_add(1.months()).unwrap_or(date)
}
