// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The expression facade: the single entry point collaborators talk to.

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Zoned};

use evry_grammar::{Ast, ParseContext, ParseError, TimeOfDayTable, parse};

use crate::humanize::human_readable;
use crate::rule::{Rule, normalize};
use crate::schedule::Schedule;

/// Evaluates schedule expressions against a time zone and time-of-day table.
///
/// The engine holds no mutable state and caches nothing: every evaluation
/// re-derives everything from the source text, so concurrent callers can
/// share one engine freely. Memoization, if wanted, belongs to the caller.
#[derive(Debug, Clone)]
pub struct Engine {
    tz: TimeZone,
    time_of_day: TimeOfDayTable,
}

impl Engine {
    /// An engine resolving instants in `tz` with the given table.
    #[must_use]
    pub fn new(tz: TimeZone, time_of_day: TimeOfDayTable) -> Self {
        Engine { tz, time_of_day }
    }

    /// The time zone occurrences resolve in.
    #[must_use]
    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    /// Evaluate `text` with relative keywords pinned to `anchor`.
    ///
    /// The anchor is captured at evaluation time: "tomorrow" stays what it
    /// was when evaluated until the caller re-evaluates with a fresh anchor.
    /// Parse failures never escape; they surface as an invalid [`Expression`].
    #[must_use]
    pub fn evaluate(&self, text: &str, anchor: &Zoned) -> Expression {
        let anchor_civil = anchor.timestamp().to_zoned(self.tz.clone()).datetime();
        let trimmed = text.trim();

        let outcome = if trimmed.is_empty() {
            Outcome::Empty
        } else {
            let ctx = ParseContext {
                anchor: anchor_civil,
                time_of_day: self.time_of_day,
            };
            match parse(trimmed, ctx) {
                Ok(ast) => {
                    let rule = normalize(&ast, anchor_civil);
                    tracing::debug!(text, subject = %ast.subject, "evaluated expression");
                    Outcome::Valid(Box::new(Evaluated { ast, rule }))
                }
                Err(error) => {
                    tracing::debug!(text, column = error.column, "expression does not parse");
                    Outcome::Invalid(error)
                }
            }
        };

        Expression {
            text: text.to_owned(),
            anchor_civil,
            tz: self.tz.clone(),
            outcome,
        }
    }
}

#[derive(Debug, Clone)]
struct Evaluated {
    ast: Ast,
    rule: Option<Rule>,
}

#[derive(Debug, Clone)]
enum Outcome {
    Empty,
    Valid(Box<Evaluated>),
    Invalid(ParseError),
}

/// One evaluated expression: an immutable snapshot of `(text, anchor)`.
///
/// Occurrence queries construct a fresh [`Schedule`] per call; nothing about
/// the expression mutates between queries and no cursor state survives one.
#[derive(Debug, Clone)]
pub struct Expression {
    text: String,
    anchor_civil: DateTime,
    tz: TimeZone,
    outcome: Outcome,
}

impl Expression {
    /// The source text, verbatim.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the expression currently has a meaning.
    ///
    /// Empty text is valid (an empty agenda entry); parsed text is valid
    /// when it yields a non-empty subject.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match &self.outcome {
            Outcome::Empty => true,
            Outcome::Valid(evaluated) => !evaluated.ast.subject.is_empty(),
            Outcome::Invalid(_) => false,
        }
    }

    /// The free-text subject, empty unless the expression parsed.
    #[must_use]
    pub fn subject(&self) -> &str {
        match &self.outcome {
            Outcome::Valid(evaluated) => &evaluated.ast.subject,
            _ => "",
        }
    }

    /// The parse failure, if the text does not match the grammar.
    #[must_use]
    pub fn error(&self) -> Option<&ParseError> {
        match &self.outcome {
            Outcome::Invalid(error) => Some(error),
            _ => None,
        }
    }

    /// The parsed AST, if the text parsed.
    #[must_use]
    pub fn ast(&self) -> Option<&Ast> {
        match &self.outcome {
            Outcome::Valid(evaluated) => Some(&evaluated.ast),
            _ => None,
        }
    }

    /// The canonical rule, for recurring expressions.
    #[must_use]
    pub fn rule(&self) -> Option<&Rule> {
        match &self.outcome {
            Outcome::Valid(evaluated) => evaluated.rule.as_ref(),
            _ => None,
        }
    }

    /// The "for 1h" duration, if present.
    #[must_use]
    pub fn duration(&self) -> Option<SignedDuration> {
        self.ast().and_then(|ast| ast.duration)
    }

    /// The `@context` annotation, if present.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.ast().and_then(|ast| ast.context.as_deref())
    }

    /// The `#tag` annotations.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        match self.ast() {
            Some(ast) => &ast.tags,
            None => &[],
        }
    }

    /// The first occurrence strictly after `after`, if any.
    #[must_use]
    pub fn next_occurrence(&self, after: &Zoned) -> Option<Zoned> {
        self.schedule().first_after(after).map(|occ| occ.date)
    }

    /// All occurrences in the half-open window `[start, end)`.
    #[must_use]
    pub fn occurrences_between(&self, start: &Zoned, end: &Zoned) -> Vec<Zoned> {
        self.schedule()
            .occurrences_between(start, end)
            .map(|occ| occ.date)
            .collect()
    }

    /// Canonical re-rendering of the expression relative to its anchor, e.g.
    /// `"task 4/1/2021 at 5"` becomes `"task monday at 5"`. Invalid text is
    /// returned verbatim.
    #[must_use]
    pub fn human_readable(&self) -> String {
        match &self.outcome {
            Outcome::Valid(evaluated) => human_readable(&evaluated.ast, self.anchor_civil),
            _ => self.text.clone(),
        }
    }

    /// A fresh schedule for this expression. Built per query by design.
    fn schedule(&self) -> Schedule {
        let mut schedule = Schedule::new(self.tz.clone());
        if let Outcome::Valid(evaluated) = &self.outcome {
            match &evaluated.rule {
                Some(rule) => schedule.push_rule(rule.clone()),
                None => {
                    if let Some(start) = evaluated.ast.start {
                        schedule.push_date(start);
                    }
                }
            }
        }
        schedule
    }
}
