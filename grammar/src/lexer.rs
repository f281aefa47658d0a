// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Lexer for free-form schedule expressions.
//!
//! The lexer is total: every byte of input maps to some token, so a stray
//! character never aborts tokenization. Unrecognized material surfaces as
//! [`Token::Symbol`], [`Token::UnicodeText`] or [`Token::Error`] and flows
//! into the free-text subject during parsing.

use std::fmt::{self, Display};

use chumsky::input::{Input, Stream, ValueInput};
use chumsky::span::SimpleSpan;
use logos::Logos;

/// Token emitted by the expression lexer
#[derive(Debug, PartialEq, Eq, Clone, Copy, Logos)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token<'a> {
    /// Run of ASCII digits
    #[regex("[0-9]+")]
    Number(&'a str),

    /// Word: a letter followed by letters, digits or apostrophes
    #[regex("[A-Za-z][A-Za-z0-9']*")]
    Word(&'a str),

    /// Colon (:), separates hours from minutes
    #[token(":")]
    Colon,

    /// Slash (/), separates numeric date components
    #[token("/")]
    Slash,

    /// At sign (@), introduces a context annotation
    #[token("@")]
    At,

    /// Hash (#), introduces a tag annotation
    #[token("#")]
    Hash,

    /// Comma (,), list separator
    #[token(",")]
    Comma,

    /// Printable ASCII punctuation with no grammatical meaning
    #[regex(r#"[!"$%&'()*+\-.;<=>?\[\\\]^_`{|}~]+"#)]
    Symbol(&'a str),

    /// Non-ASCII text, kept verbatim for the subject
    #[regex(r"[^\x00-\x7F]+")]
    UnicodeText(&'a str),

    /// Error token for unlexable bytes
    Error,
}

impl<'a> Token<'a> {
    /// The source text this token stands for.
    #[must_use]
    pub fn text(&self) -> &'a str {
        match self {
            Token::Number(s) | Token::Word(s) | Token::Symbol(s) | Token::UnicodeText(s) => s,
            Token::Colon => ":",
            Token::Slash => "/",
            Token::At => "@",
            Token::Hash => "#",
            Token::Comma => ",",
            Token::Error => "",
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Error => write!(f, "<invalid>"),
            token => write!(f, "{}", token.text()),
        }
    }
}

/// Tokenize expression source into a spanned stream for the parser.
///
/// Spans are byte offsets into `src`, which is what makes column-accurate
/// error reporting possible across grammar rule composition.
pub fn lex_analysis<'src>(
    src: &'src str,
) -> impl ValueInput<'src, Token = Token<'src>, Span = SimpleSpan> {
    let tokens = Token::lexer(src).spanned().map(|(token, span)| match token {
        Ok(token) => (token, SimpleSpan::from(span)),
        Err(()) => (Token::Error, SimpleSpan::from(span)),
    });
    Stream::from_iter(tokens).map((0..src.len()).into(), |(t, s): (_, _)| (t, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token<'_>> {
        Token::lexer(src)
            .map(|t| t.unwrap_or(Token::Error))
            .collect()
    }

    #[test]
    fn lexes_words_and_numbers() {
        assert_eq!(
            tokens("task every 2 mondays"),
            vec![
                Token::Word("task"),
                Token::Word("every"),
                Token::Number("2"),
                Token::Word("mondays"),
            ]
        );
    }

    #[test]
    fn lexes_clock_and_date_punctuation() {
        assert_eq!(
            tokens("23/12/2022 at 20:50"),
            vec![
                Token::Number("23"),
                Token::Slash,
                Token::Number("12"),
                Token::Slash,
                Token::Number("2022"),
                Token::Word("at"),
                Token::Number("20"),
                Token::Colon,
                Token::Number("50"),
            ]
        );
    }

    #[test]
    fn lexes_hour_suffix_as_separate_word() {
        assert_eq!(
            tokens("11h"),
            vec![Token::Number("11"), Token::Word("h")]
        );
    }

    #[test]
    fn lexes_annotations() {
        assert_eq!(
            tokens("@home #errand"),
            vec![
                Token::At,
                Token::Word("home"),
                Token::Hash,
                Token::Word("errand"),
            ]
        );
    }

    #[test]
    fn lexes_punctuation_and_unicode_as_subject_material() {
        assert_eq!(
            tokens("fix (urgent!) café"),
            vec![
                Token::Word("fix"),
                Token::Symbol("("),
                Token::Word("urgent"),
                Token::Symbol("!)"),
                Token::Word("caf"),
                Token::UnicodeText("é"),
            ]
        );
    }

    #[test]
    fn empty_input_lexes_to_nothing() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \t ").is_empty());
    }
}
