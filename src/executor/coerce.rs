use indexmap::IndexMap;

use crate::{
    ast::{self, InputValue, Type},
    executor::{Executor, FieldError, FieldResult},
    schema::{
        meta::{Field, MetaType},
        model::TypeType,
    },
    types::base::Arguments,
    value::{Object, Value},
};

impl<'a> Executor<'a> {
    /// Coerces the arguments given to `field_ast`, then applies the declared
    /// defaults of the missing ones.
    pub(crate) fn prepare_arguments(
        &self,
        field: &'a Field,
        field_ast: &ast::Field<'a>,
    ) -> FieldResult<Arguments> {
        let field_name = field_ast.name.item;
        let mut args = IndexMap::new();

        for (name, value) in field_ast.arguments.iter().flat_map(|a| a.item.iter()) {
            let name = name.item;
            let arg = field.argument_by_name(name).ok_or_else(|| {
                format!("Unknown argument \"{name}\" on field \"{field_name}\"")
            })?;
            let ty = self.make_type(&arg.arg_type)?;

            let coerced = self.coerce_value(&value.item, &ty)?;
            if !ty.is_valid_value(self.schema, &coerced) {
                return Err(format!(
                    "Not valid type for argument \"{name}\" in query \"{field_name}\"",
                )
                .into());
            }
            args.insert(name.to_owned(), ty.parse_value(self.schema, coerced));
        }

        for arg in field.arguments.iter().flatten() {
            if args.contains_key(arg.name.as_str()) {
                continue;
            }
            match &arg.default_value {
                Some(default) => {
                    let ty = self.make_type(&arg.arg_type)?;
                    args.insert(arg.name.to_string(), ty.parse_value(self.schema, default.clone()));
                }
                None if arg.arg_type.is_non_null() => {
                    return Err(format!(
                        "Require \"{}\" arguments to query \"{field_name}\"",
                        arg.name,
                    )
                    .into());
                }
                None => {}
            }
        }

        Ok(Arguments::new(args))
    }

    /// Converts an argument literal into a native value of type `ty`.
    pub(crate) fn coerce_value(&self, value: &InputValue, ty: &TypeType<'a>) -> FieldResult<Value> {
        if value.is_null() {
            return Ok(Value::null());
        }

        match ty.nullable_type() {
            TypeType::List(item_ty) => match value {
                InputValue::List(items) => items
                    .iter()
                    .map(|item| self.coerce_value(&item.item, item_ty))
                    .collect::<FieldResult<_>>()
                    .map(Value::list),
                InputValue::Variable(name) => self.coerce_variable(name, ty),
                _ => Ok(Value::list(vec![])),
            },
            TypeType::Concrete(input @ MetaType::InputObject(meta)) => match value {
                InputValue::Variable(name) => self.coerce_variable(name, ty),
                InputValue::Object(fields) => {
                    let mut obj = Object::with_capacity(meta.input_fields.len());
                    for field in &meta.input_fields {
                        if let Some(default) = &field.default_value {
                            let _ = obj.add_field(field.name.as_str(), default.clone());
                        }
                    }
                    for (key, value) in fields {
                        let coerced = match input.input_field_by_name(&key.item) {
                            Some(field) => {
                                let field_ty = self.make_type(&field.arg_type)?;
                                self.coerce_value(&value.item, &field_ty)?
                            }
                            None => value.item.to_const_value(),
                        };
                        let _ = obj.add_field(key.item.as_str(), coerced);
                    }
                    Ok(Value::object(obj))
                }
                other => Ok(other.to_const_value()),
            },
            TypeType::Concrete(MetaType::Scalar(_) | MetaType::Enum(_)) => match value {
                InputValue::Variable(name) => self.coerce_variable(name, ty),
                other => Ok(other.to_const_value()),
            },
            _ => Err("Argument type not supported".into()),
        }
    }

    fn coerce_variable(&self, name: &str, ty: &TypeType<'a>) -> FieldResult<Value> {
        let def = self
            .request
            .variable_definition(name)
            .ok_or_else(|| format!("Variable \"{name}\" does not exist in request"))?;
        if !variable_fits(&def.var_type.item, ty) {
            let message = format!("Invalid variable \"{name}\" type, allowed type is \"{ty}\"");
            return Err(FieldError::from(message).located_at(def.var_type.start()));
        }
        self.request.variable_value(name)
    }

    pub(crate) fn make_type(&self, t: &Type) -> FieldResult<TypeType<'a>> {
        self.schema
            .make_type(t)
            .ok_or_else(|| format!("Unknown type \"{t}\"").into())
    }
}

/// Whether a variable declared as `var_type` may be used where `target` is
/// expected.
///
/// Named types must match. For list targets the variable must be a list as
/// well, and its items may only be nullable if the target's items are.
fn variable_fits(var_type: &Type, target: &TypeType) -> bool {
    match target.nullable_type() {
        TypeType::List(item_ty) => var_type.list_contents().is_some_and(|var_item| {
            var_item.innermost_name() == item_ty.innermost_concrete().name().as_str()
                && (var_item.is_non_null() || !item_ty.is_non_null())
        }),
        _ => {
            !var_type.is_list()
                && var_type.innermost_name() == target.innermost_concrete().name().as_str()
        }
    }
}
