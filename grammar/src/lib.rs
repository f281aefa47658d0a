// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse free-form agenda text into a structured schedule expression.
//!
//! The grammar turns text such as `"task every 2 mondays at 11h for 1h
//! starting tomorrow"` into an [`Ast`]: a free-text subject plus recurrence,
//! start, duration and annotation fields. All relative keywords resolve
//! against a caller-supplied anchor instant, never the wall clock.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::similar_names,
    clippy::single_match_else
)]

pub mod ast;
mod construct;
pub mod keyword;
pub mod lexer;
pub mod parser;
pub mod time_of_day;

pub use crate::ast::{Ast, Frequency};
pub use crate::parser::{ParseContext, ParseError, StartSymbol, parse, parse_at};
pub use crate::time_of_day::{NamedTime, TimeOfDayTable};
