//! Request processing pipeline and its configuration

use std::{any::Any, sync::Arc};

use crate::{
    GraphQLError,
    executor::{ExecutionError, Request, Variables, execute_validated_query},
    http::GraphQLResponse,
    parser::parse_document_source,
    reducer::{MaxComplexity, QueryVisitor, Reducer},
    schema::model::SchemaType,
    validation::{ValidatorContext, visit_all_rules},
    value::Value,
};

/// Executes requests against a schema
///
/// A request is parsed, validated, checked by the query visitors and only
/// then executed. Failing any step before execution produces errors only.
///
/// ```rust
/// use dynql::{Field, ObjectMeta, Processor, SchemaBuilder, Type, Variables, graphql_value};
///
/// let schema = SchemaBuilder::new()
///     .register(
///         ObjectMeta::new("Query", vec![Field::new("hello", Type::named("String"))])
///             .into_meta(),
///     )
///     .query("Query")
///     .build()
///     .unwrap();
///
/// let processor = Processor::new(&schema)
///     .max_complexity(10)
///     .root_value(graphql_value!({"hello": "world"}));
/// let response = processor.process("{ hello }", &Variables::new(), vec![]);
///
/// assert_eq!(response.data(), Some(&graphql_value!({"hello": "world"})));
/// ```
#[derive(Clone, Debug)]
pub struct Processor<'a> {
    schema: &'a SchemaType,
    max_complexity: Option<i64>,
    root_value: Value,
    context: Option<Arc<dyn Any + Send + Sync>>,
}

impl<'a> Processor<'a> {
    /// Builds a processor without a complexity limit, resolving root fields
    /// from a null root value.
    pub fn new(schema: &'a SchemaType) -> Self {
        Self {
            schema,
            max_complexity: None,
            root_value: Value::null(),
            context: None,
        }
    }

    /// Rejects requests whose complexity exceeds `max`.
    ///
    /// Every field selected costs one.
    #[must_use]
    pub fn max_complexity(mut self, max: i64) -> Self {
        self.max_complexity = Some(max);
        self
    }

    /// Sets the value handed as parent to the resolvers of root fields.
    #[must_use]
    pub fn root_value(mut self, value: impl Into<Value>) -> Self {
        self.root_value = value.into();
        self
    }

    /// Sets data handed to resolvers through
    /// [`ResolveInfo::context`](crate::ResolveInfo::context).
    ///
    /// Resolvers get it back by downcasting to `T`.
    #[must_use]
    pub fn context<T: Any + Send + Sync>(mut self, context: T) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    /// The schema requests are executed against.
    pub fn schema(&self) -> &'a SchemaType {
        self.schema
    }

    /// Processes a request into a response ready to be sent.
    pub fn process(
        &self,
        document_source: &str,
        variables: &Variables,
        reducers: Vec<Box<dyn QueryVisitor + '_>>,
    ) -> GraphQLResponse {
        GraphQLResponse::from_result(self.execute(document_source, variables, reducers))
    }

    /// Processes a request.
    ///
    /// Returns the merged data of all operations along with the errors
    /// recorded while executing them, or the error that prevented execution.
    pub fn execute(
        &self,
        document_source: &str,
        variables: &Variables,
        mut reducers: Vec<Box<dyn QueryVisitor + '_>>,
    ) -> Result<(Option<Value>, Vec<ExecutionError>), GraphQLError> {
        let document = parse_document_source(document_source)?;

        {
            let mut ctx = ValidatorContext::new(self.schema, &document);
            visit_all_rules(&mut ctx, &document);
            let errors = ctx.into_errors();
            if !errors.is_empty() {
                tracing::debug!(errors = errors.len(), "request failed validation");
                return Err(GraphQLError::ValidationError(errors));
            }
        }

        let request = Request::new(&document, variables);
        if !request.has_operations() {
            return Err(GraphQLError::NoOperationProvided);
        }

        if let Some(max) = self.max_complexity {
            reducers.push(Box::new(MaxComplexity::new(max)));
        }
        if !reducers.is_empty() {
            Reducer::new(self.schema, &request)
                .reduce(&mut reducers)
                .map_err(GraphQLError::Rejected)?;
        }

        tracing::debug!(operations = request.operations().len(), "executing request");
        let context: &dyn Any = match &self.context {
            Some(context) => &**context,
            None => &(),
        };
        Ok(execute_validated_query(self.schema, &request, &self.root_value, context))
    }
}
