//! The Cool grammar as data.
//!
//! A [`GrammarDefinition`] holds the tables a parser needs to build Cool
//! syntax trees: node kinds, field names, precedence levels, and binary
//! operators. It is what gets serialized into the grammar artifact.

use serde::{Deserialize, Serialize};

/// Named node kinds, in symbol-table order.
pub const NAMED_KINDS: &[&str] = &[
    "source_file",
    "class_item",
    "field_declaration_list",
    "attribute_declaration",
    "method_declaration",
    "parameters",
    "parameter",
    "type_identifier",
    "primitive_type",
    "field_identifier",
    "identifier",
    "self",
    "assignment_expression",
    "dispatch_expression",
    "arguments",
    "if_expression",
    "while_expression",
    "block",
    "let_expression",
    "case_expression",
    "case_arm",
    "case_pattern",
    "new_expression",
    "isvoid_expression",
    "not_expression",
    "unary_expression",
    "binary_expression",
    "parenthesized_expression",
    "boolean_literal",
    "integer_literal",
    "string_literal",
    "string_content",
    "escape_sequence",
    "inline_comment",
    "block_comment",
];

/// Reserved words. Matching is case-sensitive.
pub const KEYWORDS: &[&str] = &[
    "class", "inherits", "if", "then", "else", "fi", "while", "loop", "pool", "let", "in", "case",
    "of", "esac", "new", "isvoid", "not", "true", "false",
];

/// Punctuation and operator tokens.
pub const PUNCTUATION: &[&str] = &[
    "{", "}", "(", ")", ";", ":", ",", ".", "@", "<-", "=>", "~", "+", "-", "*", "/", "<", "<=",
    "=", "\"",
];

/// Built-in type names, parsed as `primitive_type` nodes.
pub const PRIMITIVE_TYPES: &[&str] = &["Bool", "Int", "IO", "Object", "String", "SELF_TYPE"];

/// Field names, in field-table order.
pub const FIELDS: &[&str] = &[
    "alternative",
    "arguments",
    "body",
    "condition",
    "consequence",
    "features",
    "inherits",
    "left",
    "method",
    "name",
    "operator",
    "parameters",
    "pattern",
    "return_type",
    "right",
    "type",
    "value",
];

/// Name of the symbol used for unparseable input.
pub const ERROR_KIND: &str = "ERROR";

/// Name of the end-of-input symbol.
pub const END_KIND: &str = "end";

/// One entry in a symbol table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Node kind name, or the literal token text for anonymous symbols.
    pub name: String,
    /// Whether nodes of this kind are named.
    pub named: bool,
    /// Whether nodes of this kind appear in syntax trees.
    pub visible: bool,
}

impl SymbolInfo {
    /// Creates a visible named symbol.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            named: true,
            visible: true,
        }
    }

    /// Creates a visible anonymous symbol.
    #[must_use]
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            named: false,
            visible: true,
        }
    }

    /// Creates a symbol that never appears in syntax trees.
    #[must_use]
    pub fn hidden(name: impl Into<String>, named: bool) -> Self {
        Self {
            name: name.into(),
            named,
            visible: false,
        }
    }
}

/// How repeated operators of the same level group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Associativity {
    /// `a - b - c` groups as `(a - b) - c`.
    Left,
    /// `a - b - c` groups as `a - (b - c)`.
    Right,
}

/// A named precedence level. Higher values bind tighter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedenceLevel {
    /// Level name, e.g. `multiplicative`.
    pub name: String,
    /// Binding strength.
    pub value: i32,
}

/// An infix operator producing `binary_expression` nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryOperator {
    /// Token text, which is also the anonymous symbol name.
    pub token: String,
    /// Name of the precedence level.
    pub level: String,
    /// Grouping of repeated operators.
    pub associativity: Associativity,
}

/// A complete grammar description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarDefinition {
    /// Language name.
    pub name: String,
    /// Symbol table; the index of an entry is its symbol id.
    pub symbols: Vec<SymbolInfo>,
    /// Field names; field id `n` names `fields[n - 1]`.
    pub fields: Vec<String>,
    /// Precedence levels.
    pub precedences: Vec<PrecedenceLevel>,
    /// Infix operators.
    pub binary_operators: Vec<BinaryOperator>,
    /// Type names that become `primitive_type` nodes.
    pub primitive_types: Vec<String>,
    /// Named symbols that may appear anywhere between tokens.
    pub extras: Vec<String>,
    /// Symbols produced by the string scanner rather than the main lexer.
    pub externals: Vec<String>,
}

impl GrammarDefinition {
    /// Builds the Cool grammar.
    #[must_use]
    pub fn cool() -> Self {
        let mut symbols = vec![SymbolInfo::hidden(END_KIND, false)];
        symbols.extend(NAMED_KINDS.iter().map(|&name| SymbolInfo::named(name)));
        symbols.extend(KEYWORDS.iter().map(|&text| SymbolInfo::anonymous(text)));
        symbols.extend(PUNCTUATION.iter().map(|&text| SymbolInfo::anonymous(text)));
        symbols.push(SymbolInfo::hidden("_error_sentinel", true));
        symbols.push(SymbolInfo::named(ERROR_KIND));

        let precedences = [
            ("call", 8),
            ("super", 7),
            ("comp", 6),
            ("isvoid", 5),
            ("multiplicative", 4),
            ("additive", 3),
            ("comparative", 2),
            ("negation", 1),
            ("assign", 0),
        ]
        .into_iter()
        .map(|(name, value)| PrecedenceLevel {
            name: name.to_string(),
            value,
        })
        .collect();

        let binary_operators = [
            ("<=", "comparative"),
            ("<", "comparative"),
            ("=", "comparative"),
            ("+", "additive"),
            ("-", "additive"),
            ("*", "multiplicative"),
            ("/", "multiplicative"),
        ]
        .into_iter()
        .map(|(token, level)| BinaryOperator {
            token: token.to_string(),
            level: level.to_string(),
            associativity: Associativity::Left,
        })
        .collect();

        Self {
            name: "cool".to_string(),
            symbols,
            fields: FIELDS.iter().map(ToString::to_string).collect(),
            precedences,
            binary_operators,
            primitive_types: PRIMITIVE_TYPES.iter().map(ToString::to_string).collect(),
            extras: vec!["inline_comment".to_string(), "block_comment".to_string()],
            externals: vec!["string_content".to_string(), "_error_sentinel".to_string()],
        }
    }
}
