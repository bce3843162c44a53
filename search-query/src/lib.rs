#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![doc = include_str!("../README.md")]

pub mod config;
mod error;
pub mod filter;
pub mod jmap;
pub mod lexer;

use tracing::debug;

#[doc(inline)]
pub use crate::{
    config::SearchQueryConfig,
    error::{Error, Result},
    filter::{
        parser::{Parser, DEFAULT_MAX_DEPTH},
        predicate::{interpret, DateBoundKind, Keyword, Predicate, TextField},
        FilterNode, Operator,
    },
    jmap::{search_filter, JmapCondition, JmapFilter, JmapOperator},
    lexer::{Lexer, Token},
};

/// Parse the given search query into a filter tree.
///
/// Parsing never fails: malformed parts of the query are absorbed,
/// see the [`parser`](filter::parser) module. Returns [`None`] when
/// the query holds no term, which means that everything matches.
pub fn parse_query(query: impl AsRef<str>) -> Option<FilterNode> {
    let query = query.as_ref();
    debug!(query, "parse search query");

    Parser::new(query).parse().unwrap_or_default()
}

/// Parse the given search query into a filter tree, following the
/// given configuration.
pub fn try_parse_query(
    query: impl AsRef<str>,
    config: &SearchQueryConfig,
) -> Result<Option<FilterNode>> {
    let query = query.as_ref();
    debug!(query, strict = config.strict, "parse search query");

    if let Some(max_len) = config.max_len {
        if query.len() > max_len {
            return Err(Error::QueryTooLongError(query.len(), max_len));
        }
    }

    Parser::new(query)
        .with_strict(config.strict)
        .with_max_depth(config.max_depth)
        .parse()
}

/// Parse the given search query, then compile it into a JMAP
/// filter.
pub fn compile_query(query: impl AsRef<str>) -> Option<JmapFilter> {
    parse_query(query).map(|filter| filter.to_jmap_filter())
}

/// Return `true` if the given search query contains an explicit
/// boolean operator or a parenthesis.
///
/// Adjacent terms, which are implicitly combined with `AND`, do not
/// count.
pub fn has_boolean_operators(query: impl AsRef<str>) -> bool {
    Lexer::new(query.as_ref()).any(|token| token.is_boolean_operator())
}
