//! Syntax highlighting for the REPL.

use std::borrow::Cow;

use cool_syntax::{Lexer, TokenKind};

const KEYWORD: &str = "\x1b[1;35m";
const TYPE: &str = "\x1b[33m";
const LITERAL: &str = "\x1b[36m";
const STRING: &str = "\x1b[32m";
const COMMENT: &str = "\x1b[2;3m";
const ERROR: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Highlighter for Cool source, driven by the lexer.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoolHighlighter;

impl CoolHighlighter {
    /// Creates a new highlighter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Highlights a line of input.
    ///
    /// Whitespace and punctuation are copied through unchanged; lines with
    /// nothing to color are returned borrowed.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn highlight<'l>(&self, line: &'l str) -> Cow<'l, str> {
        let mut result = String::with_capacity(line.len() * 2);
        let mut copied = 0;
        let mut colored = false;

        for token in Lexer::tokenize_all(line) {
            let Some(color) = color_for(&token.kind) else {
                continue;
            };
            result.push_str(&line[copied..token.span.start]);
            result.push_str(color);
            result.push_str(token.text(line));
            result.push_str(RESET);
            copied = token.span.end;
            colored = true;
        }

        if !colored {
            return Cow::Borrowed(line);
        }
        result.push_str(&line[copied..]);
        Cow::Owned(result)
    }
}

fn color_for(kind: &TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::TypeIdentifier | TokenKind::PrimitiveType => Some(TYPE),
        TokenKind::Integer | TokenKind::True | TokenKind::False | TokenKind::SelfValue => {
            Some(LITERAL)
        }
        TokenKind::String { .. } => Some(STRING),
        TokenKind::InlineComment | TokenKind::BlockComment { .. } => Some(COMMENT),
        TokenKind::Error(_) => Some(ERROR),
        kind if kind.literal().is_some_and(|text| text.chars().all(char::is_alphabetic)) => {
            Some(KEYWORD)
        }
        _ => None,
    }
}
