//! Language handles.
//!
//! A [`Language`] is a validated, shared view of a grammar artifact. Parsers
//! use it to resolve node kinds, field names, and operator precedences.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::artifact::{self, HEADER_LEN};
use crate::definition::{Associativity, END_KIND, GrammarDefinition};
use crate::symbol::{FieldId, Symbol};

/// Reasons an artifact cannot be turned into a [`Language`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    /// The artifact has no bytes.
    #[error("grammar artifact is empty")]
    Empty,

    /// The artifact ends before its header or payload does.
    #[error("grammar artifact truncated: expected {expected} bytes, found {actual}")]
    Truncated {
        /// Bytes the header promises.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// The artifact does not start with the grammar magic.
    #[error("not a grammar artifact (bad magic)")]
    BadMagic,

    /// The artifact was written for an unsupported ABI.
    #[error("incompatible grammar ABI version {found}; supported versions are {min} through {max}")]
    VersionMismatch {
        /// ABI version in the artifact.
        found: u16,
        /// Oldest supported ABI.
        min: u16,
        /// Newest supported ABI.
        max: u16,
    },

    /// Bytes follow the declared payload.
    #[error("grammar artifact has {0} unexpected trailing bytes")]
    TrailingBytes(usize),

    /// The payload could not be decoded.
    #[error("grammar payload could not be decoded: {0}")]
    Decode(String),

    /// The decoded tables are inconsistent.
    #[error("invalid grammar: {0}")]
    Invalid(String),
}

impl From<LanguageError> for cool_foundation::Error {
    fn from(err: LanguageError) -> Self {
        Self::language_load(err.to_string())
    }
}

/// Resolved information about an infix operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperatorInfo {
    /// Anonymous symbol of the operator token.
    pub symbol: Symbol,
    /// Binding strength.
    pub precedence: i32,
    /// Grouping of repeated operators.
    pub associativity: Associativity,
}

/// A loaded grammar.
///
/// Cloning is cheap; clones share the same tables.
#[derive(Clone)]
pub struct Language {
    inner: Arc<LanguageData>,
}

struct LanguageData {
    abi_version: u16,
    definition: GrammarDefinition,
    named_index: HashMap<String, Symbol>,
    anonymous_index: HashMap<String, Symbol>,
    field_index: HashMap<String, FieldId>,
    precedence_index: HashMap<String, i32>,
    operator_index: HashMap<String, OperatorInfo>,
}

impl Language {
    /// Loads a language from a grammar artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact is empty, truncated, written for an
    /// unsupported ABI version, undecodable, or describes inconsistent tables.
    pub fn new(artifact: &[u8]) -> Result<Self, LanguageError> {
        let unpacked = artifact::unpack(artifact).inspect_err(|err| {
            tracing::debug!(%err, bytes = artifact.len(), "rejected grammar artifact");
        })?;
        let definition: GrammarDefinition = rmp_serde::from_slice(unpacked.payload)
            .map_err(|e| LanguageError::Decode(e.to_string()))?;

        let language = Self::from_definition(unpacked.abi_version, definition)?;
        tracing::debug!(
            name = language.name(),
            abi = language.abi_version(),
            symbols = language.node_kind_count(),
            fields = language.field_count(),
            payload = artifact.len() - HEADER_LEN,
            "loaded grammar"
        );
        Ok(language)
    }

    fn from_definition(
        abi_version: u16,
        definition: GrammarDefinition,
    ) -> Result<Self, LanguageError> {
        if definition.name.is_empty() {
            return Err(LanguageError::Invalid("grammar has no name".into()));
        }
        if definition.symbols.len() > usize::from(u16::MAX) {
            return Err(LanguageError::Invalid(format!(
                "too many symbols: {}",
                definition.symbols.len()
            )));
        }
        match definition.symbols.first() {
            Some(first) if first.name == END_KIND => {}
            _ => {
                return Err(LanguageError::Invalid(format!(
                    "symbol 0 must be `{END_KIND}`"
                )));
            }
        }

        let mut named_index = HashMap::new();
        let mut anonymous_index = HashMap::new();
        for (id, info) in definition.symbols.iter().enumerate().skip(1) {
            #[allow(clippy::cast_possible_truncation)]
            let symbol = Symbol(id as u16);
            let index = if info.named {
                &mut named_index
            } else {
                &mut anonymous_index
            };
            if index.insert(info.name.clone(), symbol).is_some() {
                return Err(LanguageError::Invalid(format!(
                    "duplicate symbol `{}`",
                    info.name
                )));
            }
        }

        let mut field_index = HashMap::new();
        for (i, name) in definition.fields.iter().enumerate() {
            if name.is_empty() {
                return Err(LanguageError::Invalid(format!("field {} has no name", i + 1)));
            }
            let id = u16::try_from(i + 1)
                .map_err(|_| LanguageError::Invalid("too many fields".into()))?;
            if field_index.insert(name.clone(), FieldId(id)).is_some() {
                return Err(LanguageError::Invalid(format!("duplicate field `{name}`")));
            }
        }

        let mut precedence_index = HashMap::new();
        for level in &definition.precedences {
            if precedence_index
                .insert(level.name.clone(), level.value)
                .is_some()
            {
                return Err(LanguageError::Invalid(format!(
                    "duplicate precedence level `{}`",
                    level.name
                )));
            }
        }

        let mut operator_index = HashMap::new();
        for op in &definition.binary_operators {
            let precedence = *precedence_index.get(&op.level).ok_or_else(|| {
                LanguageError::Invalid(format!(
                    "operator `{}` uses unknown precedence level `{}`",
                    op.token, op.level
                ))
            })?;
            let symbol = *anonymous_index.get(&op.token).ok_or_else(|| {
                LanguageError::Invalid(format!("operator `{}` has no symbol", op.token))
            })?;
            operator_index.insert(
                op.token.clone(),
                OperatorInfo {
                    symbol,
                    precedence,
                    associativity: op.associativity,
                },
            );
        }

        for name in definition.extras.iter().chain(&definition.externals) {
            if !named_index.contains_key(name) {
                return Err(LanguageError::Invalid(format!(
                    "extra or external `{name}` has no symbol"
                )));
            }
        }

        Ok(Self {
            inner: Arc::new(LanguageData {
                abi_version,
                definition,
                named_index,
                anonymous_index,
                field_index,
                precedence_index,
                operator_index,
            }),
        })
    }

    /// Returns the language name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.definition.name
    }

    /// Returns the ABI version of the artifact this language was loaded from.
    #[must_use]
    pub fn abi_version(&self) -> u16 {
        self.inner.abi_version
    }

    /// Returns the number of node kinds, including hidden ones.
    #[must_use]
    pub fn node_kind_count(&self) -> usize {
        self.inner.definition.symbols.len()
    }

    /// Returns the name of a node kind.
    #[must_use]
    pub fn node_kind_for_id(&self, id: Symbol) -> Option<&str> {
        self.inner
            .definition
            .symbols
            .get(id.index())
            .map(|info| info.name.as_str())
    }

    /// Looks up a node kind by name.
    #[must_use]
    pub fn id_for_node_kind(&self, kind: &str, named: bool) -> Option<Symbol> {
        let index = if named {
            &self.inner.named_index
        } else {
            &self.inner.anonymous_index
        };
        index.get(kind).copied()
    }

    /// Returns true if nodes of this kind are named.
    #[must_use]
    pub fn node_kind_is_named(&self, id: Symbol) -> bool {
        self.inner
            .definition
            .symbols
            .get(id.index())
            .is_some_and(|info| info.named)
    }

    /// Returns true if nodes of this kind appear in syntax trees.
    #[must_use]
    pub fn node_kind_is_visible(&self, id: Symbol) -> bool {
        self.inner
            .definition
            .symbols
            .get(id.index())
            .is_some_and(|info| info.visible)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.inner.definition.fields.len()
    }

    /// Returns the name of a field.
    #[must_use]
    pub fn field_name_for_id(&self, id: FieldId) -> Option<&str> {
        if id.0 == 0 {
            return None;
        }
        self.inner
            .definition
            .fields
            .get(id.index())
            .map(String::as_str)
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field_id_for_name(&self, name: &str) -> Option<FieldId> {
        self.inner.field_index.get(name).copied()
    }

    /// Returns the value of a named precedence level.
    #[must_use]
    pub fn precedence(&self, level: &str) -> Option<i32> {
        self.inner.precedence_index.get(level).copied()
    }

    /// Returns the infix operator for a token, if it is one.
    #[must_use]
    pub fn binary_operator(&self, token: &str) -> Option<OperatorInfo> {
        self.inner.operator_index.get(token).copied()
    }

    /// Returns true if `name` is a built-in type name.
    #[must_use]
    pub fn is_primitive_type(&self, name: &str) -> bool {
        self.inner
            .definition
            .primitive_types
            .iter()
            .any(|t| t == name)
    }

    /// Returns true if `name` is an extra (a node that may appear anywhere).
    #[must_use]
    pub fn is_extra(&self, name: &str) -> bool {
        self.inner.definition.extras.iter().any(|e| e == name)
    }

    /// Returns the word-like anonymous tokens (reserved words) of this language.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.inner
            .definition
            .symbols
            .iter()
            .filter(|info| {
                !info.named
                    && info.visible
                    && info.name.chars().all(|c| c.is_ascii_alphabetic())
            })
            .map(|info| info.name.as_str())
    }

    /// Returns the built-in type names.
    pub fn primitive_types(&self) -> impl Iterator<Item = &str> {
        self.inner
            .definition
            .primitive_types
            .iter()
            .map(String::as_str)
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.abi_version == other.inner.abi_version
                && self.inner.definition == other.inner.definition)
    }
}

impl Eq for Language {}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name())
            .field("abi_version", &self.abi_version())
            .field("node_kinds", &self.node_kind_count())
            .field("fields", &self.field_count())
            .finish()
    }
}
