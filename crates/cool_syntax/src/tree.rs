//! Concrete syntax trees.
//!
//! A [`Tree`] owns its nodes in an arena; [`Node`] is a cheap handle into it.
//! Trees keep every token, including punctuation and comments, so the source
//! can be reconstructed from the leaves.

use std::fmt;

use cool_foundation::{Point, Span};
use cool_grammar::{FieldId, Language, Symbol};

use crate::sexp;

/// A problem found while parsing.
///
/// The parser never gives up, so syntax errors are reported alongside the
/// tree instead of replacing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    /// Description of the problem.
    pub message: String,
    /// Where it occurred.
    pub span: Span,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.span.start_point.line(),
            self.span.start_point.display_column(),
            self.message
        )
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub symbol: Symbol,
    pub span: Span,
    pub children: Vec<usize>,
    pub fields: Vec<Option<FieldId>>,
    pub parent: Option<usize>,
    pub is_extra: bool,
    pub is_missing: bool,
    pub has_error: bool,
}

impl NodeData {
    pub fn leaf(symbol: Symbol, span: Span) -> Self {
        Self {
            symbol,
            span,
            children: Vec::new(),
            fields: Vec::new(),
            parent: None,
            is_extra: false,
            is_missing: false,
            has_error: false,
        }
    }
}

/// A parsed Cool source file.
#[derive(Clone)]
pub struct Tree {
    language: Language,
    source: String,
    nodes: Vec<NodeData>,
    root: usize,
    errors: Vec<SyntaxError>,
}

impl Tree {
    pub(crate) fn new(
        language: Language,
        source: String,
        nodes: Vec<NodeData>,
        root: usize,
        mut errors: Vec<SyntaxError>,
    ) -> Self {
        errors.sort_by_key(|e| (e.span.start, e.span.end));
        Self {
            language,
            source,
            nodes,
            root,
            errors,
        }
    }

    /// Returns the root node.
    #[must_use]
    pub fn root_node(&self) -> Node<'_> {
        Node {
            tree: self,
            id: self.root,
        }
    }

    /// Returns the language this tree was parsed with.
    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Returns the parsed source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the syntax errors in source order.
    #[must_use]
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Returns the total number of nodes, hidden leaves included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn data(&self, id: usize) -> &NodeData {
        &self.nodes[id]
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Tree {:?}}}", self.root_node().to_sexp())
    }
}

/// A node in a [`Tree`].
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    tree: &'tree Tree,
    id: usize,
}

impl<'tree> Node<'tree> {
    fn data(&self) -> &'tree NodeData {
        self.tree.data(self.id)
    }

    fn at(&self, id: usize) -> Node<'tree> {
        Node {
            tree: self.tree,
            id,
        }
    }

    /// Returns the node kind, such as `class_item` or `;`.
    #[must_use]
    pub fn kind(&self) -> &'tree str {
        self.tree
            .language
            .node_kind_for_id(self.data().symbol)
            .unwrap_or("ERROR")
    }

    /// Returns the symbol of this node's kind.
    #[must_use]
    pub fn kind_id(&self) -> Symbol {
        self.data().symbol
    }

    /// Returns true if this node is named (not punctuation or a keyword).
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.tree.language.node_kind_is_named(self.data().symbol)
    }

    /// Returns true if this node is a comment.
    #[must_use]
    pub fn is_extra(&self) -> bool {
        self.data().is_extra
    }

    /// Returns true if this node stands for input that could not be parsed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind() == "ERROR" && self.is_named()
    }

    /// Returns true if the parser inserted this node for absent input.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.data().is_missing
    }

    /// Returns true if this node or any descendant is an error.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.data().has_error
    }

    /// Returns the source span of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        self.data().span
    }

    /// Returns the byte offset where this node starts.
    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.data().span.start
    }

    /// Returns the byte offset where this node ends.
    #[must_use]
    pub fn end_byte(&self) -> usize {
        self.data().span.end
    }

    /// Returns the position where this node starts.
    #[must_use]
    pub fn start_position(&self) -> Point {
        self.data().span.start_point
    }

    /// Returns the position where this node ends.
    #[must_use]
    pub fn end_position(&self) -> Point {
        self.data().span.end_point
    }

    /// Returns the source text of this node.
    #[must_use]
    pub fn utf8_text(&self) -> &'tree str {
        self.data().span.text(&self.tree.source)
    }

    /// Returns the number of children, anonymous and extra ones included.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Returns the child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Node<'tree>> {
        self.data().children.get(index).map(|&id| self.at(id))
    }

    /// Returns every child in order.
    pub fn children(&self) -> impl Iterator<Item = Node<'tree>> + 'tree {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// Returns the named children in order.
    pub fn named_children(&self) -> impl Iterator<Item = Node<'tree>> + 'tree {
        self.children().filter(Node::is_named)
    }

    /// Returns the number of named children.
    #[must_use]
    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    /// Returns the named child at `index`.
    #[must_use]
    pub fn named_child(&self, index: usize) -> Option<Node<'tree>> {
        self.named_children().nth(index)
    }

    /// Returns the first child assigned to `field`.
    #[must_use]
    pub fn child_by_field_name(&self, field: &str) -> Option<Node<'tree>> {
        self.children_by_field_name(field).next()
    }

    /// Returns every child assigned to `field`, in order.
    pub fn children_by_field_name(
        &self,
        field: &str,
    ) -> impl Iterator<Item = Node<'tree>> + 'tree {
        let wanted = self.tree.language.field_id_for_name(field);
        let data = self.data();
        let tree = self.tree;
        data.children
            .iter()
            .zip(&data.fields)
            .filter(move |(_, f)| wanted.is_some() && **f == wanted)
            .map(move |(&id, _)| Node { tree, id })
    }

    /// Returns the field name of the child at `index`, if it has one.
    #[must_use]
    pub fn field_name_for_child(&self, index: usize) -> Option<&'tree str> {
        let field = (*self.data().fields.get(index)?)?;
        self.tree.language.field_name_for_id(field)
    }

    /// Returns the parent node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Node<'tree>> {
        self.data().parent.map(|id| self.at(id))
    }

    /// Returns this node and all of its descendants in pre-order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'tree> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
        }
    }

    /// Renders this node and its named descendants as an s-expression.
    #[must_use]
    pub fn to_sexp(&self) -> String {
        sexp::to_sexp(*self)
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Node {} {} - {}}}",
            self.kind(),
            self.start_position(),
            self.end_position()
        )
    }
}

/// Pre-order iterator over a node and its descendants.
pub struct Descendants<'tree> {
    tree: &'tree Tree,
    stack: Vec<usize>,
}

impl<'tree> Iterator for Descendants<'tree> {
    type Item = Node<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.data(id).children.iter().rev().copied());
        Some(Node {
            tree: self.tree,
            id,
        })
    }
}
