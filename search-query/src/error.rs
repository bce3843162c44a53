//! # Error
//!
//! Module dedicated to search query errors. It contains an [`Error`]
//! enum based on [`thiserror::Error`] and a type alias [`Result`].
//!
//! Lenient parsing never fails: these errors can only come from
//! [`crate::try_parse_query`] and from the JSON rendition of a
//! [`crate::jmap::JmapFilter`].

use thiserror::Error;

/// The global `Result` alias of the library.
pub type Result<T> = std::result::Result<T, Error>;

/// The global `Error` enum of the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse search query: length {0} exceeds the maximum of {1}")]
    QueryTooLongError(usize, usize),
    #[error("cannot parse search query `{1}`: quote at position {0} is never closed")]
    UnterminatedQuoteError(usize, String),
    #[error("cannot parse search query `{1}`: unmatched closing parenthesis at position {0}")]
    UnmatchedClosingParenError(usize, String),
    #[error("cannot parse search query `{1}`: opening parenthesis at position {0} is never closed")]
    UnclosedParenError(usize, String),
    #[error("cannot parse search query `{1}`: missing operand at position {0}")]
    MissingOperandError(usize, String),
    #[error("cannot parse search query `{1}`: nesting at position {0} is too deep")]
    QueryTooDeepError(usize, String),
    #[error("cannot serialize jmap filter to json")]
    SerializeJmapFilterError(#[source] serde_json::Error),
}
