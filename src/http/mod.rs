//! Utilities for building HTTP endpoints in a library-agnostic manner

use serde::{
    Deserialize, Serialize,
    ser::{self, SerializeMap as _},
};

use crate::{
    GraphQLError, Processor,
    executor::{ExecutionError, FieldError, Variables},
    schema::model::SchemaType,
    value::Value,
};

/// The expected structure of the decoded JSON document for either POST or GET
/// requests.
///
/// For POST, you can use Serde to deserialize the incoming JSON data directly
/// into this struct - it derives Deserialize for exactly this reason.
///
/// Every operation of the query is executed, so there is no operation name
/// to pick one of them.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphQLRequest {
    /// GraphQL query representing this request.
    pub query: String,

    /// Optional variables to execute the GraphQL operations with.
    #[serde(default)]
    pub variables: Option<Variables>,
}

impl GraphQLRequest {
    /// Construct a new GraphQL request from parts
    pub fn new(query: String, variables: Option<Variables>) -> Self {
        Self { query, variables }
    }

    /// Returns the variables defined within this request.
    pub fn variables(&self) -> Variables {
        self.variables.clone().unwrap_or_default()
    }

    /// Execute a GraphQL request using the specified schema
    ///
    /// This is a simple wrapper around the `execute` function exposed at the
    /// top level of this crate.
    pub fn execute(&self, schema: &SchemaType) -> GraphQLResponse {
        self.process(&Processor::new(schema))
    }

    /// Execute a GraphQL request with a configured [`Processor`].
    pub fn process(&self, processor: &Processor<'_>) -> GraphQLResponse {
        processor.process(&self.query, &self.variables(), vec![])
    }
}

/// Simple wrapper around the result from executing a GraphQL query
///
/// This struct implements Serialize, so you can simply serialize this
/// to JSON and send it over the wire. Use the `is_ok` method to determine
/// whether to send a 200 or 400 HTTP status code.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphQLResponse {
    data: Option<Value>,
    errors: Vec<ExecutionError>,
    is_ok: bool,
}

impl GraphQLResponse {
    /// Constructs new `GraphQLResponse` using the given result
    pub fn from_result(r: Result<(Option<Value>, Vec<ExecutionError>), GraphQLError>) -> Self {
        match r {
            Ok((data, errors)) => Self {
                data,
                errors,
                is_ok: true,
            },
            Err(e) => Self {
                data: None,
                errors: e.into_execution_errors(),
                is_ok: false,
            },
        }
    }

    /// Constructs an error response outside of the normal execution flow
    pub fn error(error: FieldError) -> Self {
        Self {
            data: None,
            errors: vec![ExecutionError::at_origin(error)],
            is_ok: true,
        }
    }

    /// Was the request executed or not?
    ///
    /// Note that there still might be errors in the response even though it's
    /// considered OK, as GraphQL reports field errors next to the data.
    pub fn is_ok(&self) -> bool {
        self.is_ok
    }

    /// Merged result of all operations, absent when none produced anything.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Errors recorded while processing the request, in occurrence order.
    pub fn errors(&self) -> &[ExecutionError] {
        &self.errors
    }

    /// Splits the response into its data and errors.
    pub fn into_parts(self) -> (Option<Value>, Vec<ExecutionError>) {
        (self.data, self.errors)
    }
}

impl From<GraphQLError> for GraphQLResponse {
    fn from(e: GraphQLError) -> Self {
        Self::from_result(Err(e))
    }
}

impl Serialize for GraphQLResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        if let Some(data) = &self.data {
            map.serialize_key("data")?;
            map.serialize_value(data)?;
        }

        if !self.errors.is_empty() {
            map.serialize_key("errors")?;
            map.serialize_value(&self.errors)?;
        }

        map.end()
    }
}
