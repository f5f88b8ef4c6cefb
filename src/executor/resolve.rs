use indexmap::IndexMap;

use crate::{
    ast::{self, Selection},
    executor::{
        Executor, FieldError, FieldResult, FieldTarget, Resolved, deferred::Continuation,
        output::{self, Output},
    },
    parser::Spanning,
    schema::{
        meta::{MetaType, ObjectMeta},
        model::TypeType,
    },
    value::Value,
};

impl<'a> Executor<'a> {
    /// Resolves the fields selected by `selection_set` on `value` of type
    /// `object`, merging them into `out`.
    ///
    /// Failing fields are recorded and become null. On the root of an
    /// operation they're omitted instead.
    pub(crate) fn collect_fields(
        &self,
        object: &'a ObjectMeta,
        selection_set: &'a [Selection<'a>],
        value: &Value,
        out: &mut IndexMap<String, Output<'a>>,
        is_root: bool,
    ) {
        for selection in selection_set {
            match selection {
                Selection::Field(field) => {
                    if self.request.is_excluded(&field.item.directives) {
                        continue;
                    }
                    let key = field.item.response_key().to_owned();
                    match self.resolve_field(object, field, value) {
                        Ok(v) => output::merge_entry(out, key, v),
                        Err(e) => {
                            self.push_error_at(e, field.start());
                            if !is_root {
                                output::merge_entry(out, key, Output::default());
                            }
                        }
                    }
                }
                Selection::FragmentSpread(spread) => {
                    if self.request.is_excluded(&spread.item.directives) {
                        continue;
                    }
                    let name = spread.item.name.item;
                    let Some(fragment) = self.request.fragment_by_name(name) else {
                        self.push_error_at(
                            format!("Unknown fragment \"{name}\"").into(),
                            spread.start(),
                        );
                        continue;
                    };
                    if self
                        .schema
                        .type_condition_applies(fragment.type_condition.item, object)
                    {
                        self.collect_fields(object, &fragment.selection_set, value, out, is_root);
                    }
                }
                Selection::InlineFragment(fragment) => {
                    if self.request.is_excluded(&fragment.item.directives) {
                        continue;
                    }
                    let applies = fragment.item.type_condition.as_ref().is_none_or(|cond| {
                        self.schema.type_condition_applies(cond.item, object)
                    });
                    if applies {
                        self.collect_fields(
                            object,
                            &fragment.item.selection_set,
                            value,
                            out,
                            is_root,
                        );
                    }
                }
            }
        }
    }

    /// Resolves one field of `parent_value`, which is of type `parent`.
    pub(crate) fn resolve_field(
        &self,
        parent: &'a ObjectMeta,
        field_ast: &'a Spanning<ast::Field<'a>>,
        parent_value: &Value,
    ) -> FieldResult<Output<'a>> {
        let name = field_ast.item.name.item;
        if name == "__typename" {
            return Ok(Output::Value(Value::scalar(parent.name.as_str())));
        }

        let field = parent
            .field_by_name(name)
            .ok_or_else(|| format!("Field \"{name}\" not found in type \"{}\"", parent.name))?;
        let ty = self.make_type(&field.field_type)?;

        let named = ty.innermost_concrete();
        match (named.is_leaf(), &field_ast.item.selection_set) {
            (true, Some(_)) => {
                return Err(format!(
                    "You can't specify fields for scalar type \"{}\"",
                    named.name(),
                )
                .into());
            }
            (false, None) => {
                return Err(format!("You have to specify fields for \"{name}\"").into());
            }
            _ => {}
        }

        let args = self.prepare_arguments(field, &field_ast.item)?;
        let target = FieldTarget {
            parent,
            field,
            ast: field_ast,
        };
        let info = self.resolve_info(target);

        tracing::trace!(field = name, parent_type = %parent.name, "resolving field");
        let resolved = field.resolve_value(parent_value, &args, &info)?;

        self.complete(ty, target, resolved)
    }

    /// Turns what a resolver produced into output of type `ty`.
    ///
    /// Deferred values are queued and stand as placeholders in the output.
    pub(crate) fn complete(
        &self,
        ty: TypeType<'a>,
        target: FieldTarget<'a>,
        resolved: Resolved,
    ) -> FieldResult<Output<'a>> {
        match resolved {
            Resolved::Value(value) => self.complete_value(&ty, target, value),
            Resolved::List(items) => {
                let item_ty = ty.list_contents().ok_or_else(|| target.invalid_value_error())?;
                Ok(Output::List(
                    items
                        .into_iter()
                        .map(|item| {
                            self.isolate(self.complete(item_ty.clone(), target, item), target)
                        })
                        .collect(),
                ))
            }
            Resolved::Deferred(resolver) => Ok(self.defer(resolver, Continuation::new(ty, target))),
        }
    }

    fn complete_value(
        &self,
        ty: &TypeType<'a>,
        target: FieldTarget<'a>,
        value: Value,
    ) -> FieldResult<Output<'a>> {
        if value.is_null() {
            return if ty.is_non_null() {
                Err(format!(
                    "Cannot return null for non-nullable field \"{}\"",
                    target.name(),
                )
                .into())
            } else {
                Ok(Output::default())
            };
        }

        match ty.nullable_type() {
            TypeType::List(item_ty) => match value {
                Value::List(items) => Ok(Output::List(
                    items
                        .into_iter()
                        .map(|item| {
                            self.isolate(self.complete_value(item_ty, target, item), target)
                        })
                        .collect(),
                )),
                _ => Err(target.invalid_value_error()),
            },
            TypeType::Concrete(meta) => self.complete_concrete(meta, target, value),
            TypeType::NonNull(_) => Err(format!(
                "Resolving type with kind \"{}\" not supported",
                ty.nullable_type().kind(),
            )
            .into()),
        }
    }

    fn complete_concrete(
        &self,
        meta: &'a MetaType,
        target: FieldTarget<'a>,
        value: Value,
    ) -> FieldResult<Output<'a>> {
        match meta {
            MetaType::Scalar(_) | MetaType::Enum(_) => {
                if !meta.is_valid_value(self.schema, &value) {
                    return Err(target.invalid_value_error());
                }
                Ok(Output::Value(meta.serialize(&value)))
            }
            MetaType::Object(object) => Ok(self.collect_object(object, target, &value)),
            MetaType::Interface(iface) => {
                let name = iface
                    .concrete_type_name(&value, &self.resolve_info(target))
                    .ok_or("Resolving function must return type")?;
                match self.schema.concrete_type_by_name(&name) {
                    Some(MetaType::Object(object))
                        if self.schema.is_possible_type(meta, object) =>
                    {
                        Ok(self.collect_object(object, target, &value))
                    }
                    _ => Err(format!(
                        "Type \"{name}\" does not implement interface \"{}\"",
                        iface.name,
                    )
                    .into()),
                }
            }
            MetaType::Union(union) => {
                let name = union
                    .concrete_type_name(&value, &self.resolve_info(target))
                    .ok_or("Resolving function must return type")?;
                match self.schema.concrete_type_by_name(&name) {
                    Some(MetaType::Object(object))
                        if self.schema.is_possible_type(meta, object) =>
                    {
                        Ok(self.collect_object(object, target, &value))
                    }
                    _ => Err(format!(
                        "Type \"{name}\" is not a member of union \"{}\"",
                        union.name,
                    )
                    .into()),
                }
            }
            MetaType::InputObject(_) => Err(format!(
                "Resolving type with kind \"{}\" not supported",
                meta.type_kind(),
            )
            .into()),
        }
    }

    fn collect_object(
        &self,
        object: &'a ObjectMeta,
        target: FieldTarget<'a>,
        value: &Value,
    ) -> Output<'a> {
        let mut fields = IndexMap::new();
        if let Some(selection_set) = &target.ast.item.selection_set {
            self.collect_fields(object, selection_set, value, &mut fields, false);
        }
        Output::Object(fields)
    }

    /// Records a failed item of a list, which becomes null.
    fn isolate(&self, result: FieldResult<Output<'a>>, target: FieldTarget<'a>) -> Output<'a> {
        result.unwrap_or_else(|e: FieldError| {
            self.push_error_at(e, target.location());
            Output::default()
        })
    }
}
