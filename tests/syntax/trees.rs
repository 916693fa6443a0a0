//! Integration tests for syntax tree navigation

use cool_foundation::Point;

use crate::parse;

const SOURCE: &str = "class A inherits B {\n  x : Int <- 1;\n};";

#[test]
fn root_is_source_file() {
    let tree = parse(SOURCE);
    let root = tree.root_node();
    assert_eq!(root.kind(), "source_file");
    assert!(root.is_named());
    assert!(root.parent().is_none());
    assert_eq!(root.start_byte(), 0);
    assert_eq!(root.end_byte(), SOURCE.len());
    assert_eq!(root.utf8_text(), SOURCE);
}

#[test]
fn anonymous_and_named_children() {
    let tree = parse(SOURCE);
    let class = tree.root_node().child(0).unwrap();
    let kinds: Vec<_> = class.children().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec!["class", "type_identifier", "inherits", "type_identifier", "field_declaration_list", ";"]
    );
    assert_eq!(class.child_count(), 6);
    assert_eq!(class.named_child_count(), 3);
    assert!(!class.child(0).unwrap().is_named());
    assert_eq!(class.named_child(1).unwrap().utf8_text(), "B");
    assert!(class.child(6).is_none());
}

#[test]
fn field_access() {
    let tree = parse(SOURCE);
    let class = tree.root_node().child(0).unwrap();
    assert_eq!(class.child_by_field_name("name").unwrap().utf8_text(), "A");
    assert_eq!(class.child_by_field_name("inherits").unwrap().utf8_text(), "B");
    assert_eq!(class.field_name_for_child(0), None);
    assert_eq!(class.field_name_for_child(1), Some("name"));
    assert_eq!(class.field_name_for_child(4), Some("features"));
    assert!(class.child_by_field_name("body").is_none());
    assert!(class.child_by_field_name("no_such_field").is_none());
}

#[test]
fn repeated_fields() {
    let tree = parse("class A { f(): Int { let a : Int, b : Int, c : Int in a }; };");
    let let_expr = tree
        .root_node()
        .descendants()
        .find(|n| n.kind() == "let_expression")
        .unwrap();
    let names: Vec<_> = let_expr
        .children_by_field_name("name")
        .map(|n| n.utf8_text())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn parents_point_back() {
    let tree = parse(SOURCE);
    let root = tree.root_node();
    for node in root.descendants().skip(1) {
        let parent = node.parent().unwrap();
        assert!(parent.children().any(|c| c == node));
    }
}

#[test]
fn positions() {
    let tree = parse(SOURCE);
    let attribute = tree
        .root_node()
        .descendants()
        .find(|n| n.kind() == "attribute_declaration")
        .unwrap();
    assert_eq!(attribute.start_position(), Point::new(1, 2));
    let name = attribute.child_by_field_name("name").unwrap();
    assert_eq!(name.kind(), "field_identifier");
    assert_eq!(name.span().text(SOURCE), "x");
    assert_eq!(name.end_position(), Point::new(1, 3));
}

#[test]
fn descendants_are_pre_order() {
    let tree = parse("class A { x : Int; };");
    let kinds: Vec<_> = tree
        .root_node()
        .descendants()
        .filter(|n| n.is_named())
        .map(|n| n.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "source_file",
            "class_item",
            "type_identifier",
            "field_declaration_list",
            "attribute_declaration",
            "field_identifier",
            "primitive_type",
        ]
    );
}

#[test]
fn spans_nest() {
    let tree = parse(crate::LIST_PROGRAM);
    for node in tree.root_node().descendants() {
        for child in node.children() {
            assert!(child.start_byte() >= node.start_byte());
            assert!(child.end_byte() <= node.end_byte());
        }
    }
}

#[test]
fn sexp_of_subtree() {
    let tree = parse("class A { f(): Bool { not x < 1 }; };");
    let body = tree
        .root_node()
        .descendants()
        .find(|n| n.kind() == "method_declaration")
        .and_then(|m| m.child_by_field_name("body"))
        .unwrap();
    assert_eq!(
        body.to_sexp(),
        "(not_expression (binary_expression left: (identifier) right: (integer_literal)))"
    );
}

#[test]
fn tree_debug_shows_sexp() {
    let tree = parse("class A {};");
    let debug = format!("{tree:?}");
    assert!(debug.contains("(source_file (class_item"));
}
