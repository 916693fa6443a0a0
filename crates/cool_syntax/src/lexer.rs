//! Lexer for Cool.
//!
//! The lexer converts source text into a stream of tokens. Comments are
//! returned as trivia tokens; whitespace is skipped.

use cool_foundation::{Point, Span};
use cool_grammar::definition::PRIMITIVE_TYPES;

use crate::token::{StringPart, StringPartKind, Token, TokenKind};

/// Lexer for Cool source code.
#[derive(Clone)]
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current zero-based row.
    row: usize,
    /// Current zero-based byte column.
    column: usize,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            row: 0,
            column: 0,
        }
    }

    /// Returns the next token from the source.
    ///
    /// After the end of input every call returns [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_point = self.point();

        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, Span::empty_at(start, start_point));
        };

        let kind = match c {
            '(' if self.peek_char_n(1) == Some('*') => self.scan_block_comment(),
            '-' if self.peek_char_n(1) == Some('-') => self.scan_inline_comment(),
            '"' => self.scan_string(),
            '<' => {
                self.advance();
                match self.peek_char() {
                    Some('-') => {
                        self.advance();
                        TokenKind::Assign
                    }
                    Some('=') => {
                        self.advance();
                        TokenKind::Le
                    }
                    _ => TokenKind::Lt,
                }
            }
            '=' => {
                self.advance();
                if self.peek_char() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Eq
                }
            }
            c if c.is_ascii_digit() => self.scan_integer(),
            c if is_word_start(c) => self.scan_word(),
            c => {
                self.advance();
                match c {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    ';' => TokenKind::Semicolon,
                    ':' => TokenKind::Colon,
                    ',' => TokenKind::Comma,
                    '.' => TokenKind::Dot,
                    '@' => TokenKind::At,
                    '~' => TokenKind::Tilde,
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    c => TokenKind::Error(format!("unexpected character: {c:?}")),
                }
            }
        };

        Token::new(kind, Span::new(start, self.position, start_point, self.point()))
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// Comments are included in the output; the last token is always `Eof`.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Returns the position the lexer has reached.
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.row, self.column)
    }

    /// Returns the byte offset the lexer has reached.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.position
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.row += 1;
                self.column = 0;
            } else {
                self.column += len;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans `-- ...` up to, not including, the end of the line.
    fn scan_inline_comment(&mut self) -> TokenKind {
        while self.peek_char().is_some_and(|c| c != '\n') {
            self.advance();
        }
        TokenKind::InlineComment
    }

    /// Scans `(* ... *)`. Block comments do not nest.
    fn scan_block_comment(&mut self) -> TokenKind {
        self.advance();
        self.advance();
        loop {
            match self.peek_char() {
                Some('*') if self.peek_char_n(1) == Some(')') => {
                    self.advance();
                    self.advance();
                    return TokenKind::BlockComment { terminated: true };
                }
                Some(_) => self.advance(),
                None => return TokenKind::BlockComment { terminated: false },
            }
        }
    }

    /// Scans a string literal, splitting it into content runs and escapes.
    ///
    /// A string may not contain an unescaped newline, a NUL character, or the
    /// end of input; any of these ends it unterminated, without consuming the
    /// offending character.
    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // consume opening '"'

        let mut parts = Vec::new();
        let mut run_start = (self.position, self.point());
        let terminated = loop {
            match self.peek_char() {
                Some('"') => {
                    self.flush_run(&mut parts, run_start);
                    self.advance();
                    break true;
                }
                None | Some('\n' | '\0') => {
                    self.flush_run(&mut parts, run_start);
                    break false;
                }
                Some('\\') => match self.peek_char_n(1) {
                    Some('b' | 't' | 'n' | 'f' | '"') => {
                        self.flush_run(&mut parts, run_start);
                        let start = (self.position, self.point());
                        self.advance();
                        self.advance();
                        parts.push(StringPart {
                            kind: StringPartKind::Escape,
                            span: Span::new(start.0, self.position, start.1, self.point()),
                        });
                        run_start = (self.position, self.point());
                    }
                    Some('\0') | None => self.advance(),
                    Some(_) => {
                        // `\c` means `c`, and `\` before a newline continues the string.
                        self.advance();
                        self.advance();
                    }
                },
                Some(_) => self.advance(),
            }
        };

        TokenKind::String { parts, terminated }
    }

    fn flush_run(&self, parts: &mut Vec<StringPart>, (start, start_point): (usize, Point)) {
        if start < self.position {
            parts.push(StringPart {
                kind: StringPartKind::Content,
                span: Span::new(start, self.position, start_point, self.point()),
            });
        }
    }

    fn scan_integer(&mut self) -> TokenKind {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        TokenKind::Integer
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.position;
        while self.peek_char().is_some_and(is_word_char) {
            self.advance();
        }
        let word = &self.source[start..self.position];

        if let Some(keyword) = TokenKind::keyword(word) {
            keyword
        } else if PRIMITIVE_TYPES.contains(&word) {
            TokenKind::PrimitiveType
        } else if word.chars().next().is_some_and(char::is_uppercase) {
            TokenKind::TypeIdentifier
        } else {
            TokenKind::Identifier
        }
    }
}

/// Returns true if `c` can start an identifier.
fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Returns true if `c` can appear in an identifier after the first character.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Decodes the text between a string literal's quotes into its value.
///
/// `\b`, `\t`, `\n` and `\f` become control characters; any other escaped
/// character stands for itself.
#[must_use]
pub fn unescape(content: &str) -> String {
    let mut value = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => value.push('\u{8}'),
            Some('t') => value.push('\t'),
            Some('n') => value.push('\n'),
            Some('f') => value.push('\u{c}'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}
