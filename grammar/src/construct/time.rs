// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Time-of-day constructs.
//!
//! Numeric clock times are grammar-fixed; named times ("morning", "after
//! lunch") resolve through the caller-supplied [`TimeOfDayTable`], so the
//! same expression can mean different hours for different users.
//!
//! [`TimeOfDayTable`]: crate::time_of_day::TimeOfDayTable

use chumsky::extra::ParserExtra;
use chumsky::input::ValueInput;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::construct::miscellaneous::{ConstructExpected, int_u32, kw, list_sep, word};
use crate::keyword::{KW_AFTER, KW_AM, KW_AT, KW_HOUR_SUFFIX, KW_IN, KW_PM, KW_THE, KW_UP, KW_WAKE};
use crate::lexer::Token;
use crate::parser::ParseContext;
use crate::time_of_day::NamedTime;

/// An (hour, minute) pair.
pub(crate) type ClockTime = (i8, i8);

/// Format Definition:
///
/// ```txt
/// time-construct = "at" time-item *( list-sep time-item )
///                / "after" named-time
///                / "in" [ "the" ] named-time
///
/// time-item      = clock-time / named-time
/// clock-time     = hour [ ":" minute / "h" ] [ "am" / "pm" ]
/// named-time     = "wake" "up" / table-keyword / "noon" / "midnight"
/// ```
pub(crate) fn time_construct<'tokens, 'src: 'tokens, I, E>(
    ctx: ParseContext,
) -> impl Parser<'tokens, I, Vec<ClockTime>, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    choice((
        at_times(ctx),
        kw(KW_AFTER).ignore_then(named_time(ctx)).map(|t| vec![t]),
        kw(KW_IN)
            .ignore_then(kw(KW_THE).or_not())
            .ignore_then(named_time(ctx))
            .map(|t| vec![t]),
    ))
}

/// "at 5", "at 11h", "at 20:50", "at 9 and 18", "at night"
fn at_times<'tokens, 'src: 'tokens, I, E>(
    ctx: ParseContext,
) -> impl Parser<'tokens, I, Vec<ClockTime>, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    let item = choice((clock_time(), named_time(ctx)));
    kw(KW_AT).ignore_then(item.separated_by(list_sep()).at_least(1).collect())
}

fn clock_time<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, ClockTime, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    let minute_part = choice((
        just(Token::Colon).ignore_then(int_u32()).map(Some),
        kw(KW_HOUR_SUFFIX).to(None),
    ));
    let meridiem = choice((kw(KW_AM).to(false), kw(KW_PM).to(true)));

    int_u32()
        .then(minute_part.or_not())
        .then(meridiem.or_not())
        .try_map_with(|((hour, minute), meridiem), e| {
            let minute = minute.flatten().unwrap_or(0);
            if minute > 59 {
                return Err(E::Error::expected_found(
                    [ConstructExpected::Minute],
                    None,
                    e.span(),
                ));
            }
            let hour = match meridiem {
                None if hour <= 23 => hour,
                Some(pm) if (1..=12).contains(&hour) => match (hour, pm) {
                    (12, false) => 0,
                    (12, true) => 12,
                    (hour, false) => hour,
                    (hour, true) => hour + 12,
                },
                _ => {
                    return Err(E::Error::expected_found(
                        [ConstructExpected::Hour],
                        None,
                        e.span(),
                    ));
                }
            };
            Ok((hour as i8, minute as i8))
        })
}

/// A named time resolved through the time-of-day table.
fn named_time<'tokens, 'src: 'tokens, I, E>(
    ctx: ParseContext,
) -> impl Parser<'tokens, I, ClockTime, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    let table = ctx.time_of_day;
    choice((
        kw(KW_WAKE)
            .then(kw(KW_UP))
            .map(move |_| (table.hour(NamedTime::WakeUp), 0)),
        word().try_map_with(move |w, e| {
            table.hour_of_keyword(w).map(|h| (h, 0)).ok_or_else(|| {
                E::Error::expected_found([ConstructExpected::NamedTime], None, e.span())
            })
        }),
    ))
}
