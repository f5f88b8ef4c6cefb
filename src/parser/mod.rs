//! Query parser and language utilities
//!
//! Lexing and parsing is delegated to the [`graphql_parser`] crate, whose
//! query AST is translated into [`crate::ast`] nodes.

mod document;
mod utils;

use derive_more::with_trait::{Display, Error};

pub use self::{
    document::parse_document_source,
    utils::{SourcePosition, Spanning},
};

/// Error while parsing a GraphQL query
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// The source is not a syntactically valid query document.
    #[display("{_0}")]
    Syntax(#[error(not(source))] String),

    /// An integer literal is out of the `Int` range.
    #[display("Integer literal {_0} is out of range for type \"Int\"")]
    IntegerOverflow(#[error(not(source))] i64),

    /// The document contains a subscription operation.
    #[display("Subscriptions are not supported")]
    UnsupportedSubscription,
}

/// Result of parsing, carrying the position of a failure when it's known.
pub type UnlocatedParseResult<T> = Result<T, Spanning<ParseError>>;
