// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Annotation constructs: `@context` and `#tag`.

use chumsky::extra::ParserExtra;
use chumsky::input::ValueInput;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::construct::miscellaneous::word;
use crate::lexer::Token;

/// `@word`, a single context annotation such as `@home`.
pub(crate) fn context_construct<'tokens, 'src: 'tokens, I, E>()
-> impl Parser<'tokens, I, &'src str, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
{
    just(Token::At).ignore_then(word())
}

/// `#word`, a tag annotation such as `#errand`.
pub(crate) fn tag_construct<'tokens, 'src: 'tokens, I, E>() -> impl Parser<'tokens, I, &'src str, E>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
    E: ParserExtra<'tokens, I>,
{
    just(Token::Hash).ignore_then(word())
}
