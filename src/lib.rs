//! Cool - grammar artifact, language handle, and syntax tree parser
//!
//! This crate re-exports all layers of the Cool grammar system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: cool_cli        - `cool-parse` binary and REPL
//! Layer 2: cool_syntax     - Lexer, error-recovering parser, syntax trees
//! Layer 1: cool_grammar    - Grammar artifact and Language handle
//! Layer 0: cool_foundation - Spans, points, and errors
//! ```
//!
//! # Loading the grammar
//!
//! ```
//! use cool::grammar::{Language, language};
//!
//! let cool = Language::new(language()).expect("Error loading Cool grammar");
//! assert_eq!(cool.name(), "cool");
//! ```

pub use cool_cli as cli;
pub use cool_foundation as foundation;
pub use cool_grammar as grammar;
pub use cool_syntax as syntax;
