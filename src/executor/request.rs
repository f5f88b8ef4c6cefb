use std::collections::HashMap;

use crate::{
    ast::{Definition, Directive, Document, Fragment, InputValue, Operation, VariableDefinition},
    executor::{FieldError, FieldResult, Variables},
    parser::Spanning,
    value::Value,
};

/// A parsed request bound to its variables
///
/// Every operation of the document is executed, so variable definitions of
/// all operations share one namespace.
#[derive(Debug)]
pub struct Request<'a> {
    operations: Vec<&'a Spanning<Operation<'a>>>,
    fragments: HashMap<&'a str, &'a Fragment<'a>>,
    variable_definitions: HashMap<&'a str, &'a VariableDefinition<'a>>,
    variables: &'a Variables,
}

impl<'a> Request<'a> {
    /// Indexes the definitions of `document`.
    pub fn new(document: &'a Document<'a>, variables: &'a Variables) -> Self {
        let mut operations = vec![];
        let mut fragments = HashMap::new();
        let mut variable_definitions = HashMap::new();

        for def in document {
            match def {
                Definition::Operation(op) => {
                    if let Some(defs) = &op.item.variable_definitions {
                        for (name, def) in defs.item.iter() {
                            variable_definitions.insert(name.item, def);
                        }
                    }
                    operations.push(op);
                }
                Definition::Fragment(f) => {
                    fragments.insert(f.item.name.item, &f.item);
                }
            }
        }

        Self {
            operations,
            fragments,
            variable_definitions,
            variables,
        }
    }

    /// Operations in document order.
    pub fn operations(&self) -> &[&'a Spanning<Operation<'a>>] {
        &self.operations
    }

    /// Whether the request holds no operation at all.
    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }

    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn fragment_by_name(&self, name: &str) -> Option<&'a Fragment<'a>> {
        self.fragments.get(name).copied()
    }

    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn variable_definition(&self, name: &str) -> Option<&'a VariableDefinition<'a>> {
        self.variable_definitions.get(name).copied()
    }

    /// Value of the variable `name`.
    ///
    /// A supplied value wins over the declared default. A variable that is
    /// neither supplied nor has a default is null, unless its type is
    /// non-null. A missing required variable is reported where it's
    /// declared.
    pub fn variable_value(&self, name: &str) -> FieldResult<Value> {
        if let Some(v) = self.variables.get(name) {
            return Ok(v.clone());
        }
        let def = self
            .variable_definition(name)
            .ok_or_else(|| format!("Variable \"{name}\" does not exist in request"))?;
        match &def.default_value {
            Some(default) => Ok(default.item.to_const_value()),
            None if def.var_type.item.is_non_null() => Err(FieldError::from(format!(
                "Variable \"{name}\" of required type \"{}\" was not provided.",
                def.var_type.item,
            ))
            .located_at(def.var_type.start())),
            None => Ok(Value::null()),
        }
    }

    /// Whether `@skip` or `@include` exclude a selection.
    pub(crate) fn is_excluded(&self, directives: &Option<Vec<Spanning<Directive<'_>>>>) -> bool {
        directives.iter().flatten().any(|d| {
            let condition = d
                .item
                .arguments
                .as_ref()
                .and_then(|args| args.item.get("if"))
                .and_then(|v| self.directive_condition(&v.item));
            matches!(
                (d.item.name.item, condition),
                ("skip", Some(true)) | ("include", Some(false)),
            )
        })
    }

    fn directive_condition(&self, value: &InputValue) -> Option<bool> {
        match value {
            InputValue::Variable(name) => self.variable_value(name).ok()?.as_bool(),
            other => other.to_const_value().as_bool(),
        }
    }
}
