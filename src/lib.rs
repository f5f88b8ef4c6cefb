#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod ast;
pub mod executor;
pub mod parser;
mod processor;
pub mod reducer;
mod schema;
mod types;
pub mod validation;
mod value;
// This needs to be public until docs have support for private modules:
// https://github.com/rust-lang/cargo/issues/1520
pub mod http;
pub mod integrations;

#[cfg(test)]
mod executor_tests;

use derive_more::with_trait::{Display, Error};
use itertools::Itertools as _;

pub use crate::{
    ast::{InputValue, Type},
    executor::{
        DeferredResolver, ExecutionError, FieldError, FieldResult, ResolveInfo, Resolved,
        Variables,
    },
    http::{GraphQLRequest, GraphQLResponse},
    parser::{ParseError, SourcePosition, Spanning},
    processor::Processor,
    reducer::{MaxComplexity, QueryVisitor, Reducer},
    schema::{
        builder::{SchemaBuilder, SchemaError},
        meta::{
            self, Argument, EnumMeta, EnumValue, Field, InputObjectMeta, InterfaceMeta, MetaType,
            ObjectMeta, ScalarMeta, UnionMeta,
        },
        model::{SchemaType, TypeType},
    },
    types::base::{Arguments, TypeKind},
    validation::RuleError,
    value::{Object, ScalarValue, Value},
};

/// An error that prevented query execution
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum GraphQLError {
    /// The document couldn't be parsed.
    #[display("{_0}")]
    ParseError(Spanning<ParseError>),

    /// The document failed validation against the schema.
    #[display("{}", _0.iter().join("\n"))]
    ValidationError(#[error(not(source))] Vec<RuleError>),

    /// The document holds no operation to execute.
    #[display("Must provide an operation.")]
    NoOperationProvided,

    /// A query visitor rejected the request.
    #[display("{}", _0.message())]
    Rejected(#[error(not(source))] FieldError),
}

impl GraphQLError {
    /// Converts the error into the entries reported to the client.
    ///
    /// Syntax errors carry no location, as the position is already part of
    /// their message.
    pub fn into_execution_errors(self) -> Vec<ExecutionError> {
        match self {
            Self::ParseError(e) => {
                let locations = match e.item {
                    ParseError::Syntax(_) => vec![],
                    ParseError::IntegerOverflow(_) | ParseError::UnsupportedSubscription => {
                        vec![e.start()]
                    }
                };
                vec![ExecutionError::with_locations(
                    locations,
                    e.item.to_string().into(),
                )]
            }
            Self::ValidationError(errors) => errors
                .into_iter()
                .map(|e| ExecutionError::with_locations(e.locations().to_vec(), e.message().into()))
                .collect(),
            Self::NoOperationProvided => vec![ExecutionError::with_locations(
                vec![],
                "Must provide an operation.".into(),
            )],
            Self::Rejected(e) => vec![ExecutionError::with_locations(vec![], e)],
        }
    }
}

impl From<Spanning<ParseError>> for GraphQLError {
    fn from(err: Spanning<ParseError>) -> Self {
        Self::ParseError(err)
    }
}

/// Execute a query in a provided schema
///
/// Every operation of the document is executed and their results are merged.
/// Uses the default [`Processor`] configuration: no complexity limit, and a
/// null root value.
pub fn execute<'a>(
    document_source: &'a str,
    schema: &'a SchemaType,
    variables: &Variables,
    reducers: Vec<Box<dyn QueryVisitor + 'a>>,
) -> Result<(Option<Value>, Vec<ExecutionError>), GraphQLError> {
    Processor::new(schema).execute(document_source, variables, reducers)
}
