// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Small shared parsers and error labels used across the constructs.

use std::borrow::Cow;

use chumsky::error::RichPattern;
use chumsky::extra::ParserExtra;
use chumsky::input::ValueInput;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::lexer::Token;

/// Failure reasons when a specific construct value was expected but not found.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstructExpected {
    /// An integer was expected
    U32,
    /// A non-zero integer was expected
    PositiveU32,
    /// An hour of day (0-23, or 1-12 with am/pm) was expected
    Hour,
    /// A minute of hour (0-59) was expected
    Minute,
    /// A calendar date was expected
    Date,
    /// A day of month (1-31) was expected
    DayOfMonth,
    /// A weekday name was expected
    WeekdayName,
    /// A month name was expected
    MonthName,
    /// A named time of day was expected
    NamedTime,
    /// A frequency unit (minute, hour, day, week, month, year) was expected
    TimeUnit,
    /// A duration unit (min, h, day, week) was expected
    DurationUnit,
}

impl From<ConstructExpected> for RichPattern<'_, Token<'_>> {
    fn from(expected: ConstructExpected) -> Self {
        match expected {
            ConstructExpected::U32 => Self::Label(Cow::Borrowed("a number")),
            ConstructExpected::PositiveU32 => Self::Label(Cow::Borrowed("a non-zero number")),
            ConstructExpected::Hour => Self::Label(Cow::Borrowed("an hour of day")),
            ConstructExpected::Minute => Self::Label(Cow::Borrowed("a minute of hour")),
            ConstructExpected::Date => Self::Label(Cow::Borrowed("a valid calendar date")),
            ConstructExpected::DayOfMonth => Self::Label(Cow::Borrowed("a day of month")),
            ConstructExpected::WeekdayName => Self::Label(Cow::Borrowed("a weekday name")),
            ConstructExpected::MonthName => Self::Label(Cow::Borrowed("a month name")),
            ConstructExpected::NamedTime => Self::Label(Cow::Borrowed("a named time of day")),
            ConstructExpected::TimeUnit => Self::Label(Cow::Borrowed("a frequency unit")),
            ConstructExpected::DurationUnit => Self::Label(Cow::Borrowed("a duration unit")),
        }
    }
}

/// Match one word token ASCII-case-insensitively.
pub(crate) fn kw<'tokens, 'src: 'tokens, I, E>(keyword: &'static str) -> impl Parser<'tokens, I, (), E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
{
    any()
        .filter(move |token: &Token<'src>| match token {
            Token::Word(w) => w.eq_ignore_ascii_case(keyword),
            _ => false,
        })
        .ignored()
}

/// Any word token, yielding its source text.
pub(crate) fn word<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, &'src str, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
{
    select! { Token::Word(w) => w }
}

/// Any number token parsed as `u32`.
pub(crate) fn int_u32<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, u32, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    select! { Token::Number(s) => s }.try_map_with(|s: &str, e| {
        lexical::parse::<u32, _>(s)
            .map_err(|_| E::Error::expected_found([ConstructExpected::U32], None, e.span()))
    })
}

/// A number token that must be non-zero.
pub(crate) fn positive_u32<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, u32, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    int_u32().try_map_with(|v, e| match v {
        0 => Err(E::Error::expected_found(
            [ConstructExpected::PositiveU32],
            None,
            e.span(),
        )),
        v => Ok(v),
    })
}

/// List separator: "and" or a comma, as in "monday, wednesday and friday".
pub(crate) fn list_sep<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, (), E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
{
    choice((
        just(Token::Comma).then(kw(crate::keyword::KW_AND).or_not()).ignored(),
        kw(crate::keyword::KW_AND),
    ))
}

#[cfg(test)]
mod tests {
    use chumsky::error::Rich;
    use chumsky::extra;

    use super::*;
    use crate::lexer::lex_analysis;

    #[test]
    fn keyword_matching_ignores_case() {
        for src in ["every", "Every", "EVERY"] {
            let result = kw::<'_, '_, _, extra::Err<Rich<'_, _>>>(crate::keyword::KW_EVERY)
                .parse(lex_analysis(src))
                .into_result();
            assert!(result.is_ok(), "failed to match {src}");
        }
    }

    #[test]
    fn rejects_other_words_and_non_words() {
        for src in ["daily", "5", "@"] {
            let result = kw::<'_, '_, _, extra::Err<Rich<'_, _>>>(crate::keyword::KW_EVERY)
                .parse(lex_analysis(src))
                .into_result();
            assert!(result.is_err(), "unexpectedly matched {src}");
        }
    }

    #[test]
    fn parses_integers_with_bounds() {
        let ok = int_u32::<'_, '_, _, extra::Err<Rich<'_, _>>>()
            .parse(lex_analysis("29"))
            .into_result();
        assert_eq!(ok.unwrap(), 29);

        // 11 digits overflows u32
        let too_big = int_u32::<'_, '_, _, extra::Err<Rich<'_, _>>>()
            .parse(lex_analysis("99999999999"))
            .into_result();
        assert!(too_big.is_err());

        let zero = positive_u32::<'_, '_, _, extra::Err<Rich<'_, _>>>()
            .parse(lex_analysis("0"))
            .into_result();
        assert!(zero.is_err());
    }
}
