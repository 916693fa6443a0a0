//! Node kinds, fields, and precedences resolved against a [`Language`].
//!
//! The parser never looks symbols up by name while parsing; everything it
//! needs is resolved once, when a language is assigned.

use std::collections::HashMap;

use cool_foundation::{Error, Result};
use cool_grammar::definition::{KEYWORDS, PUNCTUATION};
use cool_grammar::{FieldId, Language, OperatorInfo, Symbol};

use crate::token::TokenKind;

macro_rules! resolved_table {
    (
        $(#[$meta:meta])*
        $name:ident: $ty:ty, $lookup:ident { $($field:ident => $key:literal),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub(crate) struct $name {
            $(pub $field: $ty,)*
        }

        impl $name {
            fn resolve(language: &Language) -> Result<Self> {
                Ok(Self {
                    $($field: $lookup(language, $key)?,)*
                })
            }
        }
    };
}

fn named(language: &Language, kind: &str) -> Result<Symbol> {
    language.id_for_node_kind(kind, true).ok_or_else(|| {
        Error::incompatible_language(format!("missing node kind `{kind}`"))
    })
}

fn field(language: &Language, name: &str) -> Result<FieldId> {
    language
        .field_id_for_name(name)
        .ok_or_else(|| Error::incompatible_language(format!("missing field `{name}`")))
}

fn level(language: &Language, name: &str) -> Result<i32> {
    language.precedence(name).ok_or_else(|| {
        Error::incompatible_language(format!("missing precedence level `{name}`"))
    })
}

resolved_table! {
    /// Named node kinds the parser produces.
    Kinds: Symbol, named {
        source_file => "source_file",
        class_item => "class_item",
        field_declaration_list => "field_declaration_list",
        attribute_declaration => "attribute_declaration",
        method_declaration => "method_declaration",
        parameters => "parameters",
        parameter => "parameter",
        type_identifier => "type_identifier",
        primitive_type => "primitive_type",
        field_identifier => "field_identifier",
        identifier => "identifier",
        self_value => "self",
        assignment_expression => "assignment_expression",
        dispatch_expression => "dispatch_expression",
        arguments => "arguments",
        if_expression => "if_expression",
        while_expression => "while_expression",
        block => "block",
        let_expression => "let_expression",
        case_expression => "case_expression",
        case_arm => "case_arm",
        case_pattern => "case_pattern",
        new_expression => "new_expression",
        isvoid_expression => "isvoid_expression",
        not_expression => "not_expression",
        unary_expression => "unary_expression",
        binary_expression => "binary_expression",
        parenthesized_expression => "parenthesized_expression",
        boolean_literal => "boolean_literal",
        integer_literal => "integer_literal",
        string_literal => "string_literal",
        string_content => "string_content",
        escape_sequence => "escape_sequence",
        inline_comment => "inline_comment",
        block_comment => "block_comment",
        error => "ERROR",
    }
}

resolved_table! {
    /// Field names the parser assigns.
    Fields: FieldId, field {
        alternative => "alternative",
        arguments => "arguments",
        body => "body",
        condition => "condition",
        consequence => "consequence",
        features => "features",
        inherits => "inherits",
        left => "left",
        method => "method",
        name => "name",
        operator => "operator",
        parameters => "parameters",
        pattern => "pattern",
        return_type => "return_type",
        right => "right",
        type_ => "type",
        value => "value",
    }
}

resolved_table! {
    /// Precedence levels for prefix operators and dispatch.
    Precedences: i32, level {
        call => "call",
        superclass => "super",
        comp => "comp",
        isvoid => "isvoid",
        negation => "negation",
        assign => "assign",
    }
}

/// Everything the parser needs from a language.
#[derive(Clone, Debug)]
pub(crate) struct SymbolTable {
    pub kinds: Kinds,
    pub fields: Fields,
    pub precedences: Precedences,
    anonymous: HashMap<&'static str, Symbol>,
    operators: HashMap<&'static str, OperatorInfo>,
}

impl SymbolTable {
    /// Resolves every symbol, field, and operator the parser uses.
    pub fn resolve(language: &Language) -> Result<Self> {
        let mut anonymous = HashMap::with_capacity(KEYWORDS.len() + PUNCTUATION.len());
        for &text in KEYWORDS.iter().chain(PUNCTUATION) {
            let symbol = language.id_for_node_kind(text, false).ok_or_else(|| {
                Error::incompatible_language(format!("missing token `{text}`"))
            })?;
            anonymous.insert(text, symbol);
        }

        let mut operators = HashMap::new();
        for text in ["<=", "<", "=", "+", "-", "*", "/"] {
            let info = language.binary_operator(text).ok_or_else(|| {
                Error::incompatible_language(format!("missing binary operator `{text}`"))
            })?;
            operators.insert(text, info);
        }

        Ok(Self {
            kinds: Kinds::resolve(language)?,
            fields: Fields::resolve(language)?,
            precedences: Precedences::resolve(language)?,
            anonymous,
            operators,
        })
    }

    /// Returns the anonymous symbol for fixed token text.
    pub fn anonymous(&self, text: &str) -> Symbol {
        self.anonymous
            .get(text)
            .copied()
            .unwrap_or(self.kinds.error)
    }

    /// Returns the operator a token stands for, if it is a binary operator.
    pub fn operator(&self, kind: &TokenKind) -> Option<OperatorInfo> {
        kind.literal()
            .and_then(|text| self.operators.get(text))
            .copied()
    }

    /// Returns the symbol a token becomes as a leaf node.
    ///
    /// Strings are excluded: they become `string_literal` subtrees.
    pub fn leaf_symbol(&self, kind: &TokenKind) -> Symbol {
        match kind {
            TokenKind::Identifier => self.kinds.identifier,
            TokenKind::TypeIdentifier => self.kinds.type_identifier,
            TokenKind::PrimitiveType => self.kinds.primitive_type,
            TokenKind::Integer => self.kinds.integer_literal,
            TokenKind::SelfValue => self.kinds.self_value,
            TokenKind::InlineComment => self.kinds.inline_comment,
            TokenKind::BlockComment { .. } => self.kinds.block_comment,
            other => other
                .literal()
                .map_or(self.kinds.error, |text| self.anonymous(text)),
        }
    }
}
