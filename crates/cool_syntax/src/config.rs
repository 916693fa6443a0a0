//! Parser configuration.

/// Configuration for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of expressions before the rest is wrapped in an error.
    pub max_depth: usize,
    /// Whether comments are kept in the tree as extra nodes.
    pub include_extras: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            include_extras: true,
        }
    }
}

impl ParserConfig {
    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether comments are kept in the tree.
    #[must_use]
    pub const fn with_extras(mut self, include_extras: bool) -> Self {
        self.include_extras = include_extras;
        self
    }
}
