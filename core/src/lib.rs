// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Turn parsed schedule expressions into concrete occurrences.

mod config;
mod datetime;
mod expression;
mod humanize;
mod rule;
mod schedule;

pub use evry_grammar::{Ast, Frequency, ParseContext, ParseError, StartSymbol, TimeOfDayTable};

pub use crate::config::{Config, ConfigError, TimeOfDayConfig};
pub use crate::expression::{Engine, Expression};
pub use crate::humanize::human_readable;
pub use crate::rule::{Rule, normalize};
pub use crate::schedule::{Occurrence, Occurrences, Schedule};
