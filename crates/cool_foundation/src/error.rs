//! Error types for the Cool grammar crates.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for grammar loading and parsing.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a grammar load error.
    #[must_use]
    pub fn language_load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LanguageLoad(message.into()))
    }

    /// Creates an incompatible language error.
    #[must_use]
    pub fn incompatible_language(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncompatibleLanguage(message.into()))
    }

    /// Creates a parse error at a 1-based line and column.
    #[must_use]
    pub fn parse_error(
        message: impl Into<String>,
        line: usize,
        column: usize,
        context: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line,
            column,
            context: context.into(),
        })
    }

    /// Returns true if this error means a grammar could not be loaded.
    #[must_use]
    pub const fn is_language_load(&self) -> bool {
        matches!(self.kind, ErrorKind::LanguageLoad(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A grammar artifact could not be turned into a language handle.
    #[error("failed to load grammar: {0}")]
    LanguageLoad(String),

    /// A language handle lacks something the parser depends on.
    #[error("incompatible language: {0}")]
    IncompatibleLanguage(String),

    /// Source text does not match the grammar.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
        /// The source line where the error occurred.
        context: String,
    },

    /// Encoding or decoding a grammar payload failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        Ok(())
    }
}

/// Result type used throughout the Cool grammar crates.
pub type Result<T> = std::result::Result<T, Error>;
