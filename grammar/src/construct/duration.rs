// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duration constructs: "for 1h", "for 30 min", "for 2 days".

use chumsky::extra::ParserExtra;
use chumsky::input::ValueInput;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::SignedDuration;

use crate::construct::miscellaneous::{ConstructExpected, kw, positive_u32, word};
use crate::keyword::KW_FOR;
use crate::lexer::Token;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * 60;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;
const SECS_PER_WEEK: i64 = 7 * SECS_PER_DAY;

/// Format Definition:
///
/// ```txt
/// duration-construct = "for" 1*DIGIT duration-unit
/// duration-unit      = "min" / "mins" / "minute" / "minutes"
///                    / "h" / "hr" / "hrs" / "hour" / "hours"
///                    / "d" / "day" / "days"
///                    / "w" / "week" / "weeks"
/// ```
pub(crate) fn duration_construct<'tokens, 'src: 'tokens, I, E>()
-> impl Parser<'tokens, I, SignedDuration, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    kw(KW_FOR)
        .ignore_then(positive_u32())
        .then(duration_unit())
        .map(|(count, unit_secs)| SignedDuration::from_secs(i64::from(count) * unit_secs))
}

/// Seconds per one duration unit.
fn duration_unit<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, i64, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    word().try_map_with(|w: &str, e| match w.to_ascii_lowercase().as_str() {
        "min" | "mins" | "minute" | "minutes" => Ok(SECS_PER_MINUTE),
        "h" | "hr" | "hrs" | "hour" | "hours" => Ok(SECS_PER_HOUR),
        "d" | "day" | "days" => Ok(SECS_PER_DAY),
        "w" | "week" | "weeks" => Ok(SECS_PER_WEEK),
        _ => Err(E::Error::expected_found(
            [ConstructExpected::DurationUnit],
            None,
            e.span(),
        )),
    })
}
