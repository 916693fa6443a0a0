//! The interactive REPL.
//!
//! Each complete snippet is parsed as a Cool source file and echoed back as
//! an s-expression, followed by any syntax errors.

use std::io::{self, Write};

use cool_foundation::{Error, ErrorKind, Result};
use cool_grammar::{Language, language};
use cool_syntax::{Lexer, Parser, TokenKind, Tree};

use crate::editor::{LineEditor, ReadResult, RustylineEditor};

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Parser with the Cool language set.
    parser: Parser,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for multi-line input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize or the grammar
    /// cannot be loaded.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Self::with_editor(editor)
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the Cool grammar cannot be loaded.
    pub fn with_editor(mut editor: E) -> Result<Self> {
        let cool = Language::new(language())?;
        let mut parser = Parser::new();
        parser.set_language(&cool)?;

        let mut words: Vec<String> = cool
            .keywords()
            .chain(cool.primitive_types())
            .map(String::from)
            .collect();
        words.push("self".to_string());
        editor.set_keywords(words);

        Ok(Self {
            editor,
            parser,
            show_banner: true,
            prompt: "cool> ".to_string(),
            continuation_prompt: "...   ".to_string(),
        })
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns the parser used for each snippet.
    #[must_use]
    pub const fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Runs the REPL loop until end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    self.print_error(&e);
                }
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-parse-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };

        if input.trim().is_empty() {
            return Ok(true);
        }

        self.editor.add_history(&input);

        let tree = self.eval(&input)?;
        println!("\x1b[1m{}\x1b[0m", tree.root_node().to_sexp());
        for error in tree.errors() {
            eprintln!("\x1b[31m{error}\x1b[0m");
        }

        Ok(true)
    }

    /// Reads a potentially multi-line input.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let result = if first_line {
                self.editor.read_line(&self.prompt)?
            } else {
                self.editor.read_continuation(&self.continuation_prompt)?
            };

            match result {
                ReadResult::Line(line) => {
                    if !first_line {
                        input.push('\n');
                    }
                    input.push_str(&line);

                    if is_complete(&input) {
                        return Ok(Some(input));
                    }

                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::new(ErrorKind::Internal(
                        "unexpected EOF in multi-line input".to_string(),
                    )));
                }
            }
        }
    }

    /// Parses a snippet as a Cool source file.
    ///
    /// # Errors
    ///
    /// Returns an error only if the parser has lost its language.
    pub fn eval(&self, input: &str) -> Result<Tree> {
        self.parser
            .parse(input)
            .ok_or_else(|| Error::new(ErrorKind::Internal("no language set".to_string())))
    }

    /// Prints an error to stderr.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mCool parser REPL v{}\x1b[0m", env!("CARGO_PKG_VERSION"));
        println!("Enter class definitions to see their syntax trees. Use Ctrl+D to exit.\n");

        let _ = io::stdout().flush();
    }
}

/// Returns true if `input` has no unclosed bracket, string, or comment.
///
/// Strings that stop at a newline are complete: Cool strings cannot span
/// lines without an escape, so reading more input would not close them.
#[must_use]
pub fn is_complete(input: &str) -> bool {
    let mut depth = 0i32;
    for token in Lexer::tokenize_all(input) {
        match token.kind {
            TokenKind::LBrace | TokenKind::LParen => depth += 1,
            TokenKind::RBrace | TokenKind::RParen => depth -= 1,
            TokenKind::BlockComment { terminated: false } => return false,
            TokenKind::String {
                terminated: false, ..
            } if token.span.end == input.len() => return false,
            _ => {}
        }
    }
    depth <= 0
}
