//! Integration tests for the parser
//!
//! Tests parsing whole Cool programs and the parser's configuration.

use cool_foundation::ErrorKind;
use cool_grammar::{GrammarDefinition, Language, compile, language};
use cool_syntax::{Parser, ParserConfig, parse_strict};

use crate::{LIST_PROGRAM, cool_parser, parse};

// =============================================================================
// Whole Programs
// =============================================================================

#[test]
fn list_program_parses_cleanly() {
    let tree = parse(LIST_PROGRAM);
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    assert!(!tree.root_node().has_error());
    assert_eq!(tree.root_node().end_byte(), LIST_PROGRAM.len());
}

#[test]
fn list_program_classes() {
    let tree = parse(LIST_PROGRAM);
    let names: Vec<_> = tree
        .root_node()
        .named_children()
        .filter(|n| n.kind() == "class_item")
        .map(|class| class.child_by_field_name("name").unwrap().utf8_text())
        .collect();
    assert_eq!(names, vec!["List", "Cons", "Main"]);
}

#[test]
fn list_program_methods_of_list() {
    let tree = parse(LIST_PROGRAM);
    let list = tree.root_node().named_children().find(|n| n.kind() == "class_item").unwrap();
    let features = list.child_by_field_name("features").unwrap();
    let methods: Vec<_> = features
        .named_children()
        .filter(|n| n.kind() == "method_declaration")
        .map(|m| m.child_by_field_name("name").unwrap().utf8_text())
        .collect();
    assert_eq!(methods, vec!["isNil", "head", "tail", "cons"]);
}

#[test]
fn list_program_attributes_of_cons() {
    let tree = parse(LIST_PROGRAM);
    let attributes: Vec<_> = tree
        .root_node()
        .descendants()
        .filter(|n| n.kind() == "attribute_declaration")
        .map(|a| {
            (
                a.child_by_field_name("name").unwrap().utf8_text(),
                a.child_by_field_name("type").unwrap().utf8_text(),
            )
        })
        .collect();
    assert_eq!(
        attributes,
        vec![("car", "Int"), ("cdr", "List"), ("mylist", "List")]
    );
}

#[test]
fn list_program_keeps_comments() {
    let tree = parse(LIST_PROGRAM);
    let comments: Vec<_> = tree
        .root_node()
        .descendants()
        .filter(|n| n.is_extra())
        .map(|n| n.kind())
        .collect();
    assert_eq!(
        comments,
        vec!["inline_comment", "inline_comment", "inline_comment", "block_comment"]
    );
}

#[test]
fn list_program_dispatch_chain() {
    let tree = parse(LIST_PROGRAM);
    let longest = tree
        .root_node()
        .descendants()
        .filter(|n| n.kind() == "dispatch_expression")
        .map(|n| n.utf8_text())
        .max_by_key(|text| text.len())
        .unwrap();
    assert_eq!(longest, "new List.cons(1).cons(2).cons(3).cons(4).cons(5)");
}

#[test]
fn classes_without_features() {
    let tree = parse("class A {}; class B inherits A {};");
    assert_eq!(
        tree.root_node().to_sexp(),
        "(source_file (class_item name: (type_identifier) features: (field_declaration_list)) \
         (class_item name: (type_identifier) inherits: (type_identifier) \
         features: (field_declaration_list)))"
    );
}

#[test]
fn nested_let_and_case() {
    let source = "class A { f(): Object { let x : Int in case x of y : Int => let z : Int <- y in z; esac }; };";
    let tree = parse(source);
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let lets = tree
        .root_node()
        .descendants()
        .filter(|n| n.kind() == "let_expression")
        .count();
    assert_eq!(lets, 2);
}

// =============================================================================
// Strict Parsing
// =============================================================================

#[test]
fn parse_strict_accepts_valid_program() {
    let cool = Language::new(language()).expect("Error loading Cool grammar");
    let tree = parse_strict(&cool, LIST_PROGRAM).unwrap();
    assert_eq!(tree.source(), LIST_PROGRAM);
}

#[test]
fn parse_strict_reports_first_error() {
    let cool = Language::new(language()).expect("Error loading Cool grammar");
    let err = parse_strict(&cool, "class A {\n  f() : Int { 1 + };\n};").unwrap_err();
    match err.kind {
        ErrorKind::ParseError {
            message,
            line,
            context,
            ..
        } => {
            assert!(message.contains("expected expression"), "{message}");
            assert_eq!(line, 2);
            assert_eq!(context, "  f() : Int { 1 + };");
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}

// =============================================================================
// Configuration and Languages
// =============================================================================

#[test]
fn parser_keeps_language() {
    let parser = cool_parser();
    assert_eq!(parser.language().map(Language::name), Some("cool"));
    assert_eq!(parser.config(), &ParserConfig::default());
}

#[test]
fn parser_without_language_returns_none() {
    assert!(Parser::new().parse(LIST_PROGRAM).is_none());
}

#[test]
fn incompatible_language_is_rejected() {
    let mut definition = GrammarDefinition::cool();
    definition.symbols.retain(|s| s.name != "case_arm");
    let lacking = Language::new(&compile(&definition).unwrap()).unwrap();

    let mut parser = cool_parser();
    let err = parser.set_language(&lacking).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IncompatibleLanguage(_)));
    assert!(err.to_string().contains("case_arm"));
    assert_eq!(parser.language().map(Language::name), Some("cool"));
}

#[test]
fn trees_outlive_parser() {
    let tree = {
        let parser = cool_parser();
        parser.parse("class A {};").unwrap()
    };
    assert_eq!(tree.language().name(), "cool");
    assert_eq!(tree.root_node().named_child_count(), 1);
}

#[test]
fn parser_is_reusable_across_threads() {
    let parser = cool_parser();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || {
                let source = format!("class C{i} {{ x : Int <- {i}; }};");
                parser.parse(&source).unwrap().errors().len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 0);
    }
}
