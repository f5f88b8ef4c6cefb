//! Resolve the document to values

mod coerce;
mod deferred;
mod output;
mod request;
mod resolve;

use std::{any::Any, cell::RefCell, collections::HashMap, fmt, fmt::Display};

use indexmap::IndexMap;

use crate::{
    ast::{self, OperationType, Selection},
    parser::{SourcePosition, Spanning},
    schema::{
        meta::{Field, ObjectMeta},
        model::SchemaType,
    },
    value::Value,
};

pub use self::{deferred::DeferredResolver, request::Request};

use self::{deferred::DeferredQueues, output::Output};

/// Query execution engine
///
/// The executor walks the selection sets of a request against a schema. It
/// keeps track of the errors recorded on the way and of the deferred values
/// still waiting to be resolved.
pub struct Executor<'a> {
    schema: &'a SchemaType,
    request: &'a Request<'a>,
    context: &'a dyn Any,
    errors: RefCell<Vec<ExecutionError>>,
    deferred: DeferredQueues<'a>,
}

/// Error type for errors that occur during query execution
///
/// Execution errors recorded while resolving contain the source position in
/// the query of the field that failed to resolve. Errors ending a request
/// before execution may carry several positions, or none.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionError {
    locations: Vec<SourcePosition>,
    error: FieldError,
}

/// Error type for errors that occur during field resolution
///
/// Field errors are represented by a human-readable error message and an
/// optional `Value` structure containing additional information.
///
/// They can be converted to from any type that implements `std::fmt::Display`,
/// which makes error chaining with the `?` operator a breeze:
///
/// ```rust
/// # use dynql::FieldError;
/// fn get_string(data: Vec<u8>) -> Result<String, FieldError> {
///     let s = String::from_utf8(data)?;
///     Ok(s)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: Value,
    location: Option<SourcePosition>,
}

impl<T: Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            extensions: Value::null(),
            location: None,
        }
    }
}

impl FieldError {
    /// Construct a new [`FieldError`] with additional data.
    ///
    /// You can use the [`graphql_value!`] macro for construction:
    /// ```rust
    /// use dynql::{graphql_value, FieldError};
    ///
    /// # let _: FieldError =
    /// FieldError::new(
    ///     "Could not open connection to the database",
    ///     graphql_value!({"internal_error": "Connection refused"}),
    /// );
    /// ```
    ///
    /// The `extensions` parameter will be added to the `"extensions"` field of
    /// the `"errors"` object in response:
    /// ```json
    /// {
    ///   "errors": [
    ///     "message": "Could not open connection to the database",
    ///     "locations": [{"line": 2, "column": 4}],
    ///     "extensions": {
    ///       "internal_error": "Connection refused"
    ///     }
    ///   ]
    /// }
    /// ```
    ///
    /// If the argument is [`Value::Null`], then no extra data will be included.
    ///
    /// [`graphql_value!`]: macro@crate::graphql_value
    #[must_use]
    pub fn new<T: Display>(e: T, extensions: Value) -> Self {
        Self {
            message: e.to_string(),
            extensions,
            location: None,
        }
    }

    /// Reports the error at `location` rather than at the field it fails.
    #[must_use]
    pub(crate) fn located_at(mut self, location: SourcePosition) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns the `"message"` field of this [`FieldError`].
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `"extensions"` field of this [`FieldError`].
    ///
    /// If there is no `"extensions"`, then [`Value::Null`] will be returned.
    #[must_use]
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

/// The result of resolving the value of a field of type `T`
pub type FieldResult<T> = Result<T, FieldError>;

/// The map of variables used for substitution during query execution
pub type Variables = HashMap<String, Value>;

/// What a field resolver produced
///
/// Either a plain value, a deferred marker completed after the whole
/// request has been walked, or a list mixing both.
pub enum Resolved {
    /// A value that's available right away.
    Value(Value),
    /// A list whose items are resolved one by one.
    List(Vec<Resolved>),
    /// A value that's produced later, typically in a batch with its siblings.
    Deferred(Box<dyn DeferredResolver>),
}

impl Resolved {
    /// Wraps anything convertible into a [`Value`].
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Value(v.into())
    }

    /// Defers the production of the value to `f`.
    ///
    /// `f` runs once the request has been walked entirely, and may itself
    /// return another deferred value.
    pub fn deferred<F>(f: F) -> Self
    where
        F: FnOnce() -> FieldResult<Resolved> + 'static,
    {
        Self::Deferred(Box::new(f))
    }
}

impl From<Value> for Resolved {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::List(l) => f.debug_tuple("List").field(l).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Information about the field being resolved, handed to field resolvers and
/// type resolution hooks
///
/// It also gives access to the request being executed: its variables, the
/// context set up by the caller, and the errors reported with the response.
#[derive(Clone, Copy)]
pub struct ResolveInfo<'a> {
    schema: &'a SchemaType,
    request: &'a Request<'a>,
    context: &'a dyn Any,
    errors: &'a RefCell<Vec<ExecutionError>>,
    target: FieldTarget<'a>,
}

impl<'a> ResolveInfo<'a> {
    /// The schema the request is executed against.
    pub fn schema(&self) -> &'a SchemaType {
        self.schema
    }

    /// Data the request is executed with, like a database connection or the
    /// authenticated user.
    ///
    /// Returns `None` when no context was given, or when it isn't a `T`.
    pub fn context<T: Any>(&self) -> Option<&'a T> {
        self.context.downcast_ref()
    }

    /// Reports an error at the position of the field, without failing it.
    ///
    /// The field keeps whatever value its resolver returns.
    pub fn push_error(&self, error: impl Into<FieldError>) {
        self.push_error_at(error, self.location());
    }

    /// Reports an error at `location`, without failing the field.
    pub fn push_error_at(&self, error: impl Into<FieldError>, location: SourcePosition) {
        record_error(self.errors, error.into(), location);
    }

    /// The object type owning the field.
    pub fn parent_type(&self) -> &'a ObjectMeta {
        self.target.parent
    }

    /// Metadata of the field.
    pub fn field(&self) -> &'a Field {
        self.target.field
    }

    /// Name of the field in the query.
    pub fn field_name(&self) -> &'a str {
        self.target.ast.item.name.item
    }

    /// Alias of the field if given, its name otherwise.
    pub fn response_key(&self) -> &'a str {
        self.target.ast.item.response_key()
    }

    /// Sub-selections requested for the field, if any.
    pub fn selection_set(&self) -> Option<&'a [Selection<'a>]> {
        self.target.ast.item.selection_set.as_deref()
    }

    /// Position of the field in the query.
    pub fn location(&self) -> SourcePosition {
        self.target.ast.start()
    }

    /// Value of a variable, applying its declared default.
    pub fn variable_value(&self, name: &str) -> FieldResult<Value> {
        self.request.variable_value(name)
    }
}

impl fmt::Debug for ResolveInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveInfo")
            .field("parent_type", &self.target.parent.name)
            .field("field", &self.field_name())
            .field("location", &self.location())
            .finish()
    }
}

/// A field of an object type, as selected at one place of the query.
#[derive(Clone, Copy)]
pub(crate) struct FieldTarget<'a> {
    parent: &'a ObjectMeta,
    field: &'a Field,
    ast: &'a Spanning<ast::Field<'a>>,
}

impl<'a> FieldTarget<'a> {
    fn name(&self) -> &'a str {
        self.ast.item.name.item
    }

    fn location(&self) -> SourcePosition {
        self.ast.start()
    }

    fn invalid_value_error(&self) -> FieldError {
        format!("Not valid resolved type for field \"{}\"", self.name()).into()
    }
}

impl<'a> Executor<'a> {
    #[doc(hidden)]
    pub fn new(schema: &'a SchemaType, request: &'a Request<'a>) -> Self {
        Self {
            schema,
            request,
            context: &(),
            errors: RefCell::new(vec![]),
            deferred: DeferredQueues::default(),
        }
    }

    /// Makes `context` available to resolvers through
    /// [`ResolveInfo::context`].
    #[must_use]
    pub fn with_context(mut self, context: &'a dyn Any) -> Self {
        self.context = context;
        self
    }

    /// The schema the request is executed against.
    pub fn schema(&self) -> &'a SchemaType {
        self.schema
    }

    /// Add an error to the execution engine at a specific location
    pub fn push_error_at(&self, error: FieldError, location: SourcePosition) {
        record_error(&self.errors, error, location);
    }

    fn resolve_info(&self, target: FieldTarget<'a>) -> ResolveInfo<'_> {
        ResolveInfo {
            schema: self.schema,
            request: self.request,
            context: self.context,
            errors: &self.errors,
            target,
        }
    }

    fn into_errors(self) -> Vec<ExecutionError> {
        self.errors.into_inner()
    }
}

/// Records `error`, at its own location if it has one.
fn record_error(
    errors: &RefCell<Vec<ExecutionError>>,
    mut error: FieldError,
    location: SourcePosition,
) {
    let location = error.location.take().unwrap_or(location);
    tracing::warn!(%location, message = error.message(), "field error");
    errors.borrow_mut().push(ExecutionError::new(location, error));
}

impl ExecutionError {
    /// Construct a new execution error occurring at the beginning of the query
    pub fn at_origin(error: FieldError) -> Self {
        Self::new(SourcePosition::new_origin(), error)
    }

    #[doc(hidden)]
    pub fn new(location: SourcePosition, error: FieldError) -> Self {
        Self::with_locations(vec![location], error)
    }

    #[doc(hidden)]
    pub fn with_locations(locations: Vec<SourcePosition>, error: FieldError) -> Self {
        Self { locations, error }
    }

    /// The error message
    pub fn error(&self) -> &FieldError {
        &self.error
    }

    /// The source locations _in the query_ the error relates to
    ///
    /// Errors of a field that failed to resolve hold exactly one location.
    pub fn locations(&self) -> &[SourcePosition] {
        &self.locations
    }
}

/// Executes every operation of a validated request.
///
/// Operation results are merged into one mapping, deferred values are
/// resolved once all operations have been walked. Returns `None` as data when
/// nothing was produced.
///
/// `context` is handed to resolvers through [`ResolveInfo::context`].
pub fn execute_validated_query<'a>(
    schema: &'a SchemaType,
    request: &'a Request<'a>,
    root_value: &Value,
    context: &'a dyn Any,
) -> (Option<Value>, Vec<ExecutionError>) {
    let executor = Executor::new(schema, request).with_context(context);
    let mut data = IndexMap::new();

    for op in request.operations() {
        let root_type = match op.item.operation_type {
            OperationType::Query => schema.query_type(),
            OperationType::Mutation => schema.mutation_type(),
            OperationType::Subscription => None,
        };
        let Some(root_type) = root_type else {
            executor.push_error_at(
                format!("Schema is not configured for {:?} operations", op.item.operation_type)
                    .into(),
                op.start(),
            );
            continue;
        };

        tracing::debug!(
            operation = op.item.name.as_ref().map(|n| n.item),
            root_type = %root_type.name,
            "executing operation",
        );

        let mut result = IndexMap::new();
        executor.collect_fields(root_type, &op.item.selection_set, root_value, &mut result, true);
        for (key, value) in result {
            output::merge_entry(&mut data, key, value);
        }
    }

    executor.drain();

    let data = Output::Object(data).into_value();
    let errors = executor.into_errors();
    match data {
        Value::Object(o) if o.is_empty() => (None, errors),
        data => (Some(data), errors),
    }
}
