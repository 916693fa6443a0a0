//! Command-line options and batch parsing of Cool files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use cool_foundation::{Error, ErrorKind, Result};
use cool_grammar::{Language, language};
use cool_syntax::{Lexer, Parser, Tree};
use thiserror::Error;

/// Invalid command-line arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// An option this tool does not know.
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

/// CLI configuration parsed from arguments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Files to parse. With none, the REPL starts.
    pub files: Vec<PathBuf>,
    /// Print help and exit.
    pub show_help: bool,
    /// Print the version and exit.
    pub show_version: bool,
    /// Print tokens instead of syntax trees.
    pub dump_tokens: bool,
    /// Print nothing; report through the exit status only.
    pub quiet: bool,
    /// Fail when any file has syntax errors.
    pub check: bool,
}

impl CliConfig {
    /// Parses arguments, skipping the program name in `args[0]`.
    ///
    /// # Errors
    /// Returns [`CliError::UnknownOption`] for unrecognized flags.
    pub fn from_args<I, S>(args: I) -> std::result::Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();

        for arg in args.into_iter().skip(1).map(Into::into) {
            match arg.as_str() {
                "-h" | "--help" => config.show_help = true,
                "-V" | "--version" => config.show_version = true,
                "--tokens" => config.dump_tokens = true,
                "-q" | "--quiet" => config.quiet = true,
                "--check" => config.check = true,
                "-" => config.files.push(PathBuf::from(arg)),
                flag if flag.starts_with('-') => {
                    return Err(CliError::UnknownOption(arg));
                }
                _ => config.files.push(PathBuf::from(arg)),
            }
        }

        Ok(config)
    }
}

/// Outcome of parsing one or more files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Files parsed.
    pub files: usize,
    /// Files with at least one syntax error.
    pub files_with_errors: usize,
    /// Syntax errors across all files.
    pub errors: usize,
}

impl Summary {
    /// Returns true if no file had syntax errors.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Parses files and reports trees, tokens, and syntax errors.
pub struct BatchParser {
    parser: Parser,
    config: CliConfig,
}

impl BatchParser {
    /// Loads the Cool grammar and prepares a parser.
    ///
    /// # Errors
    /// Returns a `LanguageLoad` error if the packaged grammar is unusable.
    pub fn new(config: CliConfig) -> Result<Self> {
        let cool = Language::new(language())?;
        let mut parser = Parser::new();
        parser.set_language(&cool)?;
        Ok(Self { parser, config })
    }

    /// Parses every configured file.
    ///
    /// Trees or tokens go to `out`; syntax errors go to `diagnostics`.
    ///
    /// # Errors
    /// Returns an `IoError` if a file cannot be read or output cannot be
    /// written.
    pub fn run(&self, out: &mut dyn Write, diagnostics: &mut dyn Write) -> Result<Summary> {
        let mut summary = Summary::default();
        for path in &self.config.files {
            let source = read_source(path)?;
            let errors = self.process(&path.display().to_string(), &source, out, diagnostics)?;
            summary.files += 1;
            summary.errors += errors;
            if errors > 0 {
                summary.files_with_errors += 1;
            }
        }
        tracing::debug!(
            files = summary.files,
            errors = summary.errors,
            "batch parse finished"
        );
        Ok(summary)
    }

    /// Parses one source text, returning its number of syntax errors.
    ///
    /// # Errors
    /// Returns an `IoError` if output cannot be written.
    pub fn process(
        &self,
        name: &str,
        source: &str,
        out: &mut dyn Write,
        diagnostics: &mut dyn Write,
    ) -> Result<usize> {
        let tree = self.parse(source)?;

        if !self.config.quiet {
            if self.config.dump_tokens {
                for token in Lexer::tokenize_all(source) {
                    writeln!(
                        out,
                        "{} - {}  {}  {:?}",
                        token.span.start_point,
                        token.span.end_point,
                        token.kind.name(),
                        token.text(source)
                    )
                    .map_err(io_error)?;
                }
            } else {
                writeln!(out, "{}", tree.root_node().to_sexp()).map_err(io_error)?;
            }
            for error in tree.errors() {
                writeln!(diagnostics, "{name}:{error}").map_err(io_error)?;
            }
        }

        Ok(tree.errors().len())
    }

    fn parse(&self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source)
            .ok_or_else(|| Error::new(ErrorKind::Internal("no language set".to_string())))
    }
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin()).map_err(io_error);
    }
    fs::read_to_string(path)
        .map_err(|e| Error::new(ErrorKind::IoError(format!("{}: {e}", path.display()))))
}

#[allow(clippy::needless_pass_by_value)]
fn io_error(error: std::io::Error) -> Error {
    Error::new(ErrorKind::IoError(error.to_string()))
}

/// Returns the `--help` text.
#[must_use]
pub fn help_text() -> String {
    format!(
        "\x1b[1mcool-parse\x1b[0m {} - Parse Cool source into syntax trees

\x1b[1mUSAGE:\x1b[0m
    cool-parse [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    Files to parse (`-` reads standard input). With none, starts the REPL.

\x1b[1mOPTIONS:\x1b[0m
    -h, --help       Print help information
    -V, --version    Print version information
    --tokens         Print tokens instead of syntax trees
    -q, --quiet      Print nothing; report through the exit status
    --check          Exit with failure if any file has syntax errors

\x1b[1mENVIRONMENT:\x1b[0m
    RUST_LOG         Enable logging, e.g. RUST_LOG=cool_syntax=debug

\x1b[1mEXAMPLES:\x1b[0m
    cool-parse                      Start the interactive REPL
    cool-parse list.cool            Print the syntax tree of list.cool
    cool-parse --check -q *.cool    Check files for syntax errors",
        env!("CARGO_PKG_VERSION")
    )
}
