//! Command-line parser and REPL for Cool.
//!
//! This crate provides:
//! - [`Repl`] - Interactive loop that echoes syntax trees
//! - [`BatchParser`] - Parses files and reports trees and syntax errors
//! - [`CliConfig`] - Command-line options for the `cool-parse` binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod editor;
pub mod highlight;
pub mod repl;

use std::sync::Once;

pub use cli::{BatchParser, CliConfig, CliError, Summary, help_text};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use highlight::CoolHighlighter;
pub use repl::{Repl, is_complete};

static TRACING_INIT: Once = Once::new();

/// Initializes tracing output, controlled by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
///
/// ```bash
/// RUST_LOG=cool_syntax=debug cool-parse demos/list.cool
/// RUST_LOG=cool_grammar=trace cool-parse
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
