//! Integration tests for Layer 3: CLI
//!
//! Tests argument handling, batch parsing of files, and the REPL loop.

use std::fs;
use std::path::PathBuf;

use cool_cli::{
    BatchParser, CliConfig, CliError, CoolHighlighter, LineEditor, ReadResult, Repl, is_complete,
};
use cool_foundation::{ErrorKind, Result};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cool-cli-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn config(files: Vec<PathBuf>) -> CliConfig {
    CliConfig {
        files,
        ..CliConfig::default()
    }
}

// =============================================================================
// Arguments
// =============================================================================

#[test]
fn arguments_from_strings() {
    let args = vec!["cool-parse".to_string(), "--check".to_string(), "a.cl".to_string()];
    let config = CliConfig::from_args(args).unwrap();
    assert!(config.check);
    assert_eq!(config.files, vec![PathBuf::from("a.cl")]);
}

#[test]
fn unknown_short_option() {
    let err = CliConfig::from_args(["cool-parse", "-x"]).unwrap_err();
    assert_eq!(err, CliError::UnknownOption("-x".to_string()));
    assert_eq!(err.to_string(), "unknown option: -x");
}

// =============================================================================
// Batch Parsing
// =============================================================================

#[test]
fn batch_parses_clean_files() {
    let path = temp_file("clean.cl", "class Main { main(): Object { 0 }; };\n");
    let batch = BatchParser::new(config(vec![path])).unwrap();
    let mut out = Vec::new();
    let mut diagnostics = Vec::new();
    let summary = batch.run(&mut out, &mut diagnostics).unwrap();

    assert_eq!(summary.files, 1);
    assert!(summary.is_clean());
    assert!(diagnostics.is_empty());
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("(source_file (class_item"));
    assert!(out.ends_with('\n'));
}

#[test]
fn batch_reports_errors_per_file() {
    let good = temp_file("good.cl", "class A {};");
    let bad = temp_file("bad.cl", "class B {\n  x : ;\n};\nclass C {}");
    let batch = BatchParser::new(config(vec![good, bad.clone()])).unwrap();
    let mut diagnostics = Vec::new();
    let summary = batch.run(&mut Vec::new(), &mut diagnostics).unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(summary.files_with_errors, 1);
    assert_eq!(summary.errors, 2);
    assert!(!summary.is_clean());

    let diagnostics = String::from_utf8(diagnostics).unwrap();
    let lines: Vec<_> = diagnostics.lines().collect();
    assert_eq!(lines.len(), 2);
    let prefix = format!("{}:2:", bad.display());
    assert!(lines[0].starts_with(&prefix), "{}", lines[0]);
    assert!(lines[0].ends_with("expected type, found ';'"), "{}", lines[0]);
}

#[test]
fn batch_stops_at_unreadable_file() {
    let batch = BatchParser::new(config(vec![PathBuf::from("/no/such/dir/x.cl")])).unwrap();
    let err = batch.run(&mut Vec::new(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IoError(ref msg) if msg.contains("x.cl")));
}

#[test]
fn demo_program_is_clean() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/list.cool");
    let batch = BatchParser::new(config(vec![path])).unwrap();
    let summary = batch.run(&mut Vec::new(), &mut Vec::new()).unwrap();
    assert!(summary.is_clean());
}

// =============================================================================
// REPL
// =============================================================================

struct ScriptedEditor {
    lines: std::vec::IntoIter<String>,
    history: Vec<String>,
}

impl ScriptedEditor {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|l| (*l).to_string())
                .collect::<Vec<_>>()
                .into_iter(),
            history: Vec::new(),
        }
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self.lines.next().map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult> {
        self.read_line(prompt)
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}

#[test]
fn repl_runs_to_end_of_input() {
    let editor = ScriptedEditor::new(&["class A {", "  x : Int;", "};", "class B {};"]);
    let mut repl = Repl::with_editor(editor).unwrap().without_banner();
    assert!(repl.run().is_ok());
}

#[test]
fn repl_eval_returns_tree_with_errors() {
    let repl = Repl::with_editor(ScriptedEditor::new(&[])).unwrap();
    let tree = repl.eval("class A {").unwrap();
    assert!(tree.root_node().has_error());
    assert!(!tree.errors().is_empty());
}

#[test]
fn snippet_completeness() {
    assert!(is_complete("class A { f(): Int { 1 }; };"));
    assert!(!is_complete("class A { f(): Int {"));
    assert!(is_complete("-- (\n"));
}

#[test]
fn highlighter_keeps_text() {
    let line = "class Main { main(): Int { 42 }; };";
    let highlighted = CoolHighlighter::new().highlight(line);
    assert!(highlighted.contains("class"));
    assert!(highlighted.contains("42"));
    assert!(highlighted.len() > line.len());
}
