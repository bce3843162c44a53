//! # Configuration
//!
//! Module dedicated to the search query configuration.

use crate::filter::parser::DEFAULT_MAX_DEPTH;

/// The search query configuration.
///
/// The default configuration matches the behavior of
/// [`crate::parse_query`]: malformed queries are absorbed, there is
/// no limit on the query length and nesting stops at
/// [`DEFAULT_MAX_DEPTH`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", default)
)]
pub struct SearchQueryConfig {
    /// Report malformed queries instead of absorbing them.
    ///
    /// When enabled, unterminated quotes, unbalanced parentheses,
    /// missing leading operands and too deep nesting make
    /// [`crate::try_parse_query`] fail.
    pub strict: bool,

    /// The maximum length of a query, in bytes.
    ///
    /// Longer queries are rejected before being tokenized, whatever
    /// the value of [`SearchQueryConfig::strict`].
    pub max_len: Option<usize>,

    /// The maximum nesting depth of parentheses and `NOT` operators.
    ///
    /// Deeper parts of a query are ignored, or reported when
    /// [`SearchQueryConfig::strict`] is enabled.
    pub max_depth: usize,
}

impl Default for SearchQueryConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_len: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SearchQueryConfig {
    /// Create a strict configuration.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Default::default()
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
