//! S-expression rendering of syntax trees.
//!
//! Only named nodes and missing nodes are printed, with field names as
//! prefixes: `(class_item name: (type_identifier) (MISSING ";"))`.

use crate::tree::Node;

enum Step<'tree> {
    Open(Node<'tree>, Option<&'tree str>),
    Close,
}

/// Renders `node` and its visible descendants.
///
/// The walk keeps its own stack, so trees of any depth render.
pub(crate) fn to_sexp(node: Node<'_>) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Open(node, None)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Close => out.push(')'),
            Step::Open(node, field) => {
                if node.is_named() || node.is_missing() {
                    write_open(node, field, &mut out);
                    stack.push(Step::Close);
                }
                for index in (0..node.child_count()).rev() {
                    if let Some(child) = node.child(index) {
                        stack.push(Step::Open(child, node.field_name_for_child(index)));
                    }
                }
            }
        }
    }
    out
}

fn write_open(node: Node<'_>, field: Option<&str>, out: &mut String) {
    if !out.is_empty() {
        out.push(' ');
    }
    if let Some(field) = field {
        out.push_str(field);
        out.push_str(": ");
    }
    out.push('(');
    if node.is_missing() {
        out.push_str("MISSING ");
        if node.is_named() {
            out.push_str(node.kind());
        } else {
            out.push_str(&format!("{:?}", node.kind()));
        }
    } else {
        out.push_str(node.kind());
    }
}
