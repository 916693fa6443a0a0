//! The Cool grammar, packaged as a compiled artifact.
//!
//! This crate provides:
//! - [`language`] - The packaged grammar artifact
//! - [`Language`] - A validated handle over an artifact, used by parsers
//! - [`GrammarDefinition`] - The grammar tables the artifact is compiled from
//!
//! ```
//! let language = cool_grammar::Language::new(cool_grammar::language())
//!     .expect("Error loading Cool grammar");
//! assert_eq!(language.name(), "cool");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod artifact;
pub mod definition;
pub mod language;
pub mod symbol;

pub use artifact::{
    ABI_VERSION, HEADER_LEN, MAGIC, MIN_COMPATIBLE_ABI_VERSION, compile, language,
};
pub use definition::{
    Associativity, BinaryOperator, GrammarDefinition, PrecedenceLevel, SymbolInfo,
};
pub use language::{Language, LanguageError, OperatorInfo};
pub use symbol::{FieldId, Symbol};
