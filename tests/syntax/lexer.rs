//! Integration tests for the lexer
//!
//! Tests tokenization of Cool source code.

use cool_foundation::Point;
use cool_syntax::{Lexer, StringPartKind, TokenKind, unescape};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// =============================================================================
// Words
// =============================================================================

#[test]
fn tokenize_keywords() {
    assert_eq!(
        kinds("class inherits if then else fi"),
        vec![
            TokenKind::Class,
            TokenKind::Inherits,
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::Fi,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_are_case_sensitive() {
    assert_eq!(
        kinds("Class CLASS True"),
        vec![
            TokenKind::TypeIdentifier,
            TokenKind::TypeIdentifier,
            TokenKind::TypeIdentifier,
            TokenKind::Eof,
        ]
    );
    assert_eq!(kinds("iF")[0], TokenKind::Identifier);
}

#[test]
fn tokenize_identifiers_and_types() {
    assert_eq!(
        kinds("main _tmp x1 Main SELF_TYPE Int self"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::TypeIdentifier,
            TokenKind::PrimitiveType,
            TokenKind::PrimitiveType,
            TokenKind::SelfValue,
            TokenKind::Eof,
        ]
    );
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn tokenize_integers() {
    let source = "0 42 007";
    let tokens = Lexer::tokenize_all(source);
    let texts: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Integer)
        .map(|t| t.text(source))
        .collect();
    assert_eq!(texts, vec!["0", "42", "007"]);
}

#[test]
fn integer_then_word_split() {
    assert_eq!(
        kinds("12ab"),
        vec![TokenKind::Integer, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn tokenize_string_parts() {
    let source = r#""a\tb\"c""#;
    let tokens = Lexer::tokenize_all(source);
    let TokenKind::String { parts, terminated } = &tokens[0].kind else {
        panic!("expected string, got {:?}", tokens[0].kind);
    };
    assert!(terminated);
    let pieces: Vec<_> = parts
        .iter()
        .map(|p| (p.kind, p.span.text(source)))
        .collect();
    assert_eq!(
        pieces,
        vec![
            (StringPartKind::Content, "a"),
            (StringPartKind::Escape, "\\t"),
            (StringPartKind::Content, "b"),
            (StringPartKind::Escape, "\\\""),
            (StringPartKind::Content, "c"),
        ]
    );
    assert_eq!(tokens[0].text(source), source);
}

#[test]
fn empty_string_has_no_parts() {
    let tokens = Lexer::tokenize_all("\"\"");
    assert_eq!(
        tokens[0].kind,
        TokenKind::String {
            parts: Vec::new(),
            terminated: true
        }
    );
}

#[test]
fn string_stops_at_newline() {
    let source = "\"abc\nx";
    let tokens = Lexer::tokenize_all(source);
    assert!(matches!(
        tokens[0].kind,
        TokenKind::String {
            terminated: false,
            ..
        }
    ));
    assert_eq!(tokens[0].text(source), "\"abc");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].span.start_point, Point::new(1, 0));
}

#[test]
fn escaped_newline_continues_string() {
    let source = "\"a\\\nb\" x";
    let tokens = Lexer::tokenize_all(source);
    assert!(matches!(
        tokens[0].kind,
        TokenKind::String {
            terminated: true,
            ..
        }
    ));
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn unescape_values() {
    assert_eq!(unescape(r"a\nb"), "a\nb");
    assert_eq!(unescape(r"\t\b\f"), "\t\u{8}\u{c}");
    assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
    assert_eq!(unescape(r"\q"), "q");
}

// =============================================================================
// Operators and Punctuation
// =============================================================================

#[test]
fn tokenize_multi_char_operators() {
    assert_eq!(
        kinds("<- <= < => ="),
        vec![
            TokenKind::Assign,
            TokenKind::Le,
            TokenKind::Lt,
            TokenKind::Arrow,
            TokenKind::Eq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize_punctuation() {
    assert_eq!(
        kinds("{}();:,.@~+-*/"),
        vec![
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::At,
            TokenKind::Tilde,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unknown_character_is_error_token() {
    let tokens = Lexer::tokenize_all("a $ b");
    assert!(matches!(&tokens[1].kind, TokenKind::Error(msg) if msg.contains('$')));
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

// =============================================================================
// Comments
// =============================================================================

#[test]
fn tokenize_comments() {
    assert_eq!(
        kinds("-- line\nx (* block\n *) y"),
        vec![
            TokenKind::InlineComment,
            TokenKind::Identifier,
            TokenKind::BlockComment { terminated: true },
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn block_comments_do_not_nest() {
    assert_eq!(
        kinds("(* a (* b *) c *)"),
        vec![
            TokenKind::BlockComment { terminated: true },
            TokenKind::Identifier,
            TokenKind::Star,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unterminated_block_comment_runs_to_end() {
    let source = "x (* never closed";
    let tokens = Lexer::tokenize_all(source);
    assert_eq!(tokens[1].kind, TokenKind::BlockComment { terminated: false });
    assert_eq!(tokens[1].span.end, source.len());
}

#[test]
fn minus_before_minus_is_comment() {
    assert_eq!(
        kinds("a - -b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Minus,
            TokenKind::Minus,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("a --b"),
        vec![TokenKind::Identifier, TokenKind::InlineComment, TokenKind::Eof]
    );
}

// =============================================================================
// Positions
// =============================================================================

#[test]
fn positions_track_rows_and_columns() {
    let tokens = Lexer::tokenize_all("class A {\n  x : Int;\n};");
    let x = &tokens[3];
    assert_eq!(x.kind, TokenKind::Identifier);
    assert_eq!(x.span.start_point, Point::new(1, 2));
    assert_eq!(x.span.start, 12);
    let eof = tokens.last().unwrap();
    assert_eq!(eof.span.start_point, Point::new(2, 2));
}

#[test]
fn eof_repeats() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}
