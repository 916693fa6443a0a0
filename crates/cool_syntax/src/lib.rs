//! Lexer, parser, and concrete syntax trees for Cool.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of Cool source, comments included
//! - [`Parser`] - Error-tolerant parsing into a [`Tree`], driven by a
//!   [`cool_grammar::Language`]
//! - [`Node`] - Navigation over parsed trees and s-expression rendering

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod tree;

mod kinds;
mod sexp;

pub use config::ParserConfig;
pub use lexer::{Lexer, unescape};
pub use parser::{Parser, parse_strict};
pub use token::{StringPart, StringPartKind, Token, TokenKind};
pub use tree::{Descendants, Node, SyntaxError, Tree};
