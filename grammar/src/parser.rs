// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use chumsky::error::Rich;
use chumsky::extra;
use chumsky::input::ValueInput;
use chumsky::prelude::*;
use jiff::civil::DateTime;

use crate::ast::Ast;
use crate::construct::{Fragment, build_from_fragments, root};
use crate::construct::date::date_construct;
use crate::construct::duration::duration_construct;
use crate::construct::recurrence::every_construct;
use crate::construct::time::time_construct;
use crate::lexer::{Token, lex_analysis};
use crate::time_of_day::TimeOfDayTable;

/// Everything the grammar needs besides the text itself.
///
/// The anchor stands in for "now": all relative keywords resolve against it,
/// so parsing is a pure function of `(text, context)` and nothing ever reads
/// the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    /// The instant relative keywords ("tomorrow", "next monday") resolve against
    pub anchor: DateTime,

    /// Mapping from named times of day to hours
    pub time_of_day: TimeOfDayTable,
}

impl ParseContext {
    /// A context with the default time-of-day table.
    #[must_use]
    pub fn new(anchor: DateTime) -> Self {
        ParseContext {
            anchor,
            time_of_day: TimeOfDayTable::default(),
        }
    }

    /// Replace the time-of-day table.
    #[must_use]
    pub fn with_time_of_day(mut self, table: TimeOfDayTable) -> Self {
        self.time_of_day = table;
        self
    }
}

/// Grammar symbol to start parsing from.
///
/// The facade parses whole sentences; tests and collaborators can enter the
/// grammar at an individual construct instead, which must then span the whole
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartSymbol {
    /// The full sentence grammar
    #[default]
    Root,
    /// A date construct, e.g. `23/12/2022` or `next monday`
    DateConstruct,
    /// A time construct, e.g. `at 5` or `after lunch`
    TimeConstruct,
    /// A recurrence construct, e.g. `every 2 mondays`
    RecurrenceConstruct,
    /// A duration construct, e.g. `for 1h`
    DurationConstruct,
}

/// Parse failure with the 1-based column where it happened, suitable for
/// caret-style display under the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (column {column})")]
pub struct ParseError {
    /// Human-readable description of the failure
    pub message: String,

    /// 1-based byte column in the source text
    pub column: usize,
}

/// Parse a schedule expression with the full sentence grammar.
///
/// ## Errors
///
/// Returns a [`ParseError`] carrying the failing column when the expression
/// does not match the grammar.
///
/// ## Examples
///
/// ```
/// # use evry_grammar::{ParseContext, parse};
/// # use jiff::civil::date;
/// let ctx = ParseContext::new(date(2021, 1, 1).at(0, 0, 0, 0));
/// let ast = parse("water plants every 2 days", ctx).unwrap();
/// assert_eq!(ast.subject, "water plants");
/// assert_eq!(ast.interval, 2);
/// ```
///
/// A failed parse reports where it failed, which renders well as a caret
/// diagnostic:
///
/// ```
/// # use evry_grammar::{ParseContext, parse};
/// # use jiff::civil::date;
/// use ariadne::{Color, Label, Report, ReportKind, Source};
///
/// let src = "meet at banana";
/// let ctx = ParseContext::new(date(2021, 1, 1).at(0, 0, 0, 0));
/// if let Err(e) = parse(src, ctx) {
///     let start = e.column - 1;
///     Report::build(ReportKind::Error, start..src.len())
///         .with_message(&e.message)
///         .with_label(Label::new(start..src.len()).with_color(Color::Red))
///         .finish()
///         .eprint(Source::from(src))
///         .unwrap();
/// }
/// ```
pub fn parse(src: &str, ctx: ParseContext) -> Result<Ast, ParseError> {
    parse_at(src, ctx, StartSymbol::Root)
}

/// Parse a schedule expression starting from the given grammar symbol.
///
/// Sub-symbols must consume the entire input; `"at 5 tomorrow"` parses from
/// [`StartSymbol::Root`] but not from [`StartSymbol::TimeConstruct`].
///
/// ## Errors
///
/// Returns a [`ParseError`] carrying the failing column when the expression
/// does not match the grammar from the requested symbol.
pub fn parse_at(src: &str, ctx: ParseContext, symbol: StartSymbol) -> Result<Ast, ParseError> {
    analyze(lex_analysis(src), ctx, symbol).map_err(into_parse_error)
}

fn analyze<'tokens, 'src: 'tokens, I>(
    input: I,
    ctx: ParseContext,
    symbol: StartSymbol,
) -> Result<Ast, Vec<Rich<'tokens, Token<'src>>>>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
{
    match symbol {
        StartSymbol::Root => root::<'_, '_, _, extra::Err<Rich<'_, _>>>(ctx)
            .parse(input)
            .into_result(),
        StartSymbol::DateConstruct => date_construct::<'_, '_, _, extra::Err<Rich<'_, _>>>(ctx)
            .then_ignore(end())
            .map(move |date| build_from_fragments(vec![Fragment::Date(date)], ctx))
            .parse(input)
            .into_result(),
        StartSymbol::TimeConstruct => time_construct::<'_, '_, _, extra::Err<Rich<'_, _>>>(ctx)
            .then_ignore(end())
            .map(move |times| build_from_fragments(vec![Fragment::Time(times)], ctx))
            .parse(input)
            .into_result(),
        StartSymbol::RecurrenceConstruct => {
            every_construct::<'_, '_, _, extra::Err<Rich<'_, _>>>(ctx)
                .then_ignore(end())
                .map(move |spec| build_from_fragments(vec![Fragment::Recurrence(spec)], ctx))
                .parse(input)
                .into_result()
        }
        StartSymbol::DurationConstruct => {
            duration_construct::<'_, '_, _, extra::Err<Rich<'_, _>>>()
                .then_ignore(end())
                .map(move |duration| build_from_fragments(vec![Fragment::Duration(duration)], ctx))
                .parse(input)
                .into_result()
        }
    }
}

fn into_parse_error(errors: Vec<Rich<'_, Token<'_>>>) -> ParseError {
    match errors.into_iter().next() {
        Some(error) => ParseError {
            column: error.span().start + 1,
            message: error.to_string(),
        },
        None => ParseError {
            column: 1,
            message: "expression does not parse".to_owned(),
        },
    }
}
