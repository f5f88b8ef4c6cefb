use std::{collections::HashSet, fmt};

use crate::{
    ast::{Definition, Document},
    parser::SourcePosition,
    schema::{meta::MetaType, model::SchemaType},
};

/// Query validation error
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct RuleError {
    locations: Vec<SourcePosition>,
    message: String,
}

/// State shared by the rules while a document is walked
#[doc(hidden)]
pub struct ValidatorContext<'a> {
    pub schema: &'a SchemaType,
    errors: Vec<RuleError>,
    parent_types: Vec<Option<&'a MetaType>>,
    fragment_names: HashSet<&'a str>,
}

impl RuleError {
    #[doc(hidden)]
    pub fn new(message: &str, locations: &[SourcePosition]) -> Self {
        Self {
            message: message.into(),
            locations: locations.to_vec(),
        }
    }

    /// Access the message for a validation error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Access the positions of the validation error
    ///
    /// All validation errors contain at least one source position, but some
    /// validators supply extra context through multiple positions.
    pub fn locations(&self) -> &[SourcePosition] {
        &self.locations
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let locations = self
            .locations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}. At {locations}", self.message)
    }
}

impl std::error::Error for RuleError {}

impl<'a> ValidatorContext<'a> {
    #[doc(hidden)]
    pub fn new(schema: &'a SchemaType, document: &'a Document<'a>) -> Self {
        Self {
            schema,
            errors: vec![],
            parent_types: vec![],
            fragment_names: document
                .iter()
                .filter_map(|def| match def {
                    Definition::Fragment(frag) => Some(frag.item.name.item),
                    Definition::Operation(_) => None,
                })
                .collect(),
        }
    }

    #[doc(hidden)]
    pub fn append_errors(&mut self, errors: impl IntoIterator<Item = RuleError>) {
        self.errors.extend(errors);
    }

    #[doc(hidden)]
    pub fn report_error(&mut self, message: &str, locations: &[SourcePosition]) {
        self.errors.push(RuleError::new(message, locations));
    }

    /// Errors found so far, sorted by position.
    #[doc(hidden)]
    pub fn into_errors(mut self) -> Vec<RuleError> {
        self.errors.sort();
        self.errors
    }

    /// Runs `f` while the selections being walked belong to the type named
    /// `type_name`.
    ///
    /// Unknown names are tracked as `None`, so rules checking fields skip
    /// them rather than reporting every field below.
    pub(crate) fn with_parent_type<R>(
        &mut self,
        type_name: Option<&str>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let schema = self.schema;
        self.parent_types
            .push(type_name.and_then(|name| schema.concrete_type_by_name(name)));
        let res = f(self);
        self.parent_types.pop();
        res
    }

    /// The type whose selection set is being walked.
    #[doc(hidden)]
    pub fn parent_type(&self) -> Option<&'a MetaType> {
        self.parent_types.last().copied().flatten()
    }

    #[doc(hidden)]
    pub fn is_known_fragment(&self, name: &str) -> bool {
        self.fragment_names.contains(name)
    }
}
