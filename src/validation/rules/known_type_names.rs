use crate::{
    ast::{Fragment, InlineFragment, VariableDefinition},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Reports type conditions and variable types naming no type of the schema.
pub struct KnownTypeNames;

pub fn factory() -> KnownTypeNames {
    KnownTypeNames
}

impl KnownTypeNames {
    fn check(ctx: &mut ValidatorContext<'_>, name: &Spanning<&str>) {
        if ctx.schema.concrete_type_by_name(name.item).is_none() {
            ctx.report_error(&error_message(name.item), &[name.start()]);
        }
    }
}

impl<'a> Visitor<'a> for KnownTypeNames {
    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment<'a>>,
    ) {
        Self::check(ctx, &fragment.item.type_condition);
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<InlineFragment<'a>>,
    ) {
        if let Some(cond) = &fragment.item.type_condition {
            Self::check(ctx, cond);
        }
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (_, def): &'a (Spanning<&'a str>, VariableDefinition<'a>),
    ) {
        // Only the named type matters, whatever lists wrap it.
        let var_type = &def.var_type;
        Self::check(ctx, &Spanning::at(var_type.start(), var_type.item.innermost_name()));
    }
}

fn error_message(type_name: &str) -> String {
    format!(r#"Unknown type "{type_name}""#)
}
