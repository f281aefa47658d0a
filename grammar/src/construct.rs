// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The sentence grammar: an expression is a sequence of fragments.
//!
//! Fragments are tried in a fixed order and the first successful alternative
//! wins; whatever no construct claims becomes part of the free-text subject.
//! The construct keywords "every", "starting", "until", "at" and "for" are
//! reserved: once one appears, the construct it introduces must parse, so a
//! malformed construct is reported as a parse error at its column instead of
//! silently turning into subject text.

use chumsky::extra::ParserExtra;
use chumsky::input::ValueInput;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::SignedDuration;
use jiff::civil::{Date, DateTime};

use crate::ast::Ast;
use crate::keyword::{KW_AT, KW_EVERY, KW_FOR, KW_STARTING, KW_UNTIL};
use crate::lexer::Token;
use crate::parser::ParseContext;

pub(crate) mod annotation;
pub(crate) mod date;
pub(crate) mod duration;
pub(crate) mod miscellaneous;
pub(crate) mod recurrence;
pub(crate) mod time;

use annotation::{context_construct, tag_construct};
use date::date_construct;
use duration::duration_construct;
use miscellaneous::{ConstructExpected, kw};
use recurrence::{RecurSpec, every_construct};
use time::{ClockTime, time_construct};

/// One recognized piece of an expression.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fragment<'src> {
    Recurrence(RecurSpec),
    Date(Date),
    Time(Vec<ClockTime>),
    Duration(SignedDuration),
    Starting(Date),
    Until(Date),
    Context(&'src str),
    Tag(&'src str),
    Word(&'src str),
}

/// Format Definition:
///
/// ```txt
/// root     = *fragment EOF
///
/// fragment = every-construct
///          / "starting" date-construct
///          / "until" date-construct
///          / duration-construct
///          / date-construct
///          / time-construct
///          / "@" word            ; context
///          / "#" word            ; tag
///          / subject-word        ; anything else
/// ```
pub(crate) fn root<'tokens, 'src: 'tokens, I, E>(ctx: ParseContext) -> impl Parser<'tokens, I, Ast, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    fragment(ctx)
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(move |fragments| build_from_fragments(fragments, ctx))
}

fn fragment<'tokens, 'src: 'tokens, I, E>(
    ctx: ParseContext,
) -> impl Parser<'tokens, I, Fragment<'src>, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
    E::Error: LabelError<'tokens, I, ConstructExpected>,
{
    choice((
        every_construct(ctx).map(Fragment::Recurrence),
        kw(KW_STARTING)
            .ignore_then(date_construct(ctx))
            .map(Fragment::Starting),
        kw(KW_UNTIL)
            .ignore_then(date_construct(ctx))
            .map(Fragment::Until),
        duration_construct().map(Fragment::Duration),
        date_construct(ctx).map(Fragment::Date),
        time_construct(ctx).map(Fragment::Time),
        context_construct().map(Fragment::Context),
        tag_construct().map(Fragment::Tag),
        subject_word(),
    ))
}

/// Fallback: any token that does not open a reserved construct becomes
/// subject text.
fn subject_word<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, Fragment<'src>, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
{
    any()
        .filter(|token: &Token<'src>| !matches!(token, Token::Word(w) if is_reserved(w)))
        .map(|token: Token<'src>| Fragment::Word(token.text()))
}

fn is_reserved(word: &str) -> bool {
    [KW_EVERY, KW_STARTING, KW_UNTIL, KW_AT, KW_FOR]
        .iter()
        .any(|kw| word.eq_ignore_ascii_case(kw))
}

/// Fold recognized fragments into an AST.
///
/// Scalar slots (recurrence, date, duration, context) keep the first value
/// seen; times and tags accumulate. With a recurrence present, a bare date or
/// a "starting" date becomes the rule's lower bound and every time fragment
/// joins the by-hour/by-minute sets; without one, date and time resolve to a
/// one-off start against the anchor.
pub(crate) fn build_from_fragments(fragments: Vec<Fragment<'_>>, ctx: ParseContext) -> Ast {
    let mut subject_parts: Vec<&str> = Vec::new();
    let mut recurrence: Option<RecurSpec> = None;
    let mut date: Option<Date> = None;
    let mut times: Vec<ClockTime> = Vec::new();
    let mut duration: Option<SignedDuration> = None;
    let mut starting: Option<Date> = None;
    let mut until: Option<Date> = None;
    let mut context: Option<&str> = None;
    let mut tags: Vec<&str> = Vec::new();

    for fragment in fragments {
        match fragment {
            Fragment::Recurrence(spec) => {
                if recurrence.is_none() {
                    recurrence = Some(spec);
                }
            }
            Fragment::Date(d) => {
                if date.is_none() {
                    date = Some(d);
                }
            }
            Fragment::Time(ts) => times.extend(ts),
            Fragment::Duration(d) => {
                if duration.is_none() {
                    duration = Some(d);
                }
            }
            Fragment::Starting(d) => {
                if starting.is_none() {
                    starting = Some(d);
                }
            }
            Fragment::Until(d) => {
                if until.is_none() {
                    until = Some(d);
                }
            }
            Fragment::Context(c) => {
                if context.is_none() {
                    context = Some(c);
                }
            }
            Fragment::Tag(t) => {
                if !tags.contains(&t) {
                    tags.push(t);
                }
            }
            Fragment::Word(w) => {
                if !w.is_empty() {
                    subject_parts.push(w);
                }
            }
        }
    }

    let mut ast = Ast {
        subject: subject_parts.join(" "),
        duration,
        until,
        context: context.map(str::to_owned),
        tags: tags.into_iter().map(str::to_owned).collect(),
        ..Ast::default()
    };

    match recurrence {
        Some(spec) => {
            ast.freq = Some(spec.freq);
            ast.interval = spec.interval.max(1);
            ast.by_day = spec.by_day;
            ast.by_month_day = spec.by_month_day;
            ast.by_month = spec.by_month;
            ast.by_hour = spec.by_hour;
            ast.by_minute = spec.by_minute;
            for (hour, minute) in times {
                ast.by_hour.push(hour);
                ast.by_minute.push(minute);
            }
            ast.start = starting.or(date).map(|d| d.at(0, 0, 0, 0));
        }
        None => {
            ast.start = resolve_one_off(ctx.anchor, date.or(starting), times.first().copied());
        }
    }

    ast
}

/// Resolve a one-off date/time pair against the anchor.
///
/// A time with no date means "the next time the clock shows this": today if
/// the time has not yet passed the anchor, otherwise tomorrow.
pub(crate) fn resolve_one_off(
    anchor: DateTime,
    date: Option<Date>,
    time: Option<ClockTime>,
) -> Option<DateTime> {
    match (date, time) {
        (Some(date), Some((hour, minute))) => Some(date.at(hour, minute, 0, 0)),
        (Some(date), None) => Some(date.at(0, 0, 0, 0)),
        (None, Some((hour, minute))) => {
            let time = jiff::civil::time(hour, minute, 0, 0);
            let date = if time >= anchor.time() {
                anchor.date()
            } else {
                anchor.date().tomorrow().unwrap_or(anchor.date())
            };
            Some(date.at(hour, minute, 0, 0))
        }
        (None, None) => None,
    }
}
