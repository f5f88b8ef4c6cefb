use crate::{
    ast::{Arguments, Definition, Directive, Document, Field, OperationType, Selection},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Walks `doc` depth-first, notifying `v` of every node.
///
/// Selection sets are walked with their type tracked in `ctx`: the root
/// type for operations, the type condition for fragments, the field type
/// for sub-selections.
#[doc(hidden)]
pub fn visit<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    doc: &'a Document<'a>,
) {
    let schema = ctx.schema;
    for def in doc {
        match def {
            Definition::Operation(op) => {
                v.enter_operation_definition(ctx, op);
                for var in op.item.variable_definitions.iter().flat_map(|d| d.item.iter()) {
                    v.enter_variable_definition(ctx, var);
                }
                visit_directives(v, ctx, &op.item.directives);

                let root = match op.item.operation_type {
                    OperationType::Query => schema.query_type(),
                    OperationType::Mutation => schema.mutation_type(),
                    OperationType::Subscription => None,
                };
                ctx.with_parent_type(root.map(|t| t.name.as_str()), |ctx| {
                    visit_selections(v, ctx, &op.item.selection_set);
                });
            }
            Definition::Fragment(f) => {
                v.enter_fragment_definition(ctx, f);
                visit_directives(v, ctx, &f.item.directives);
                ctx.with_parent_type(Some(f.item.type_condition.item), |ctx| {
                    visit_selections(v, ctx, &f.item.selection_set);
                });
            }
        }
    }
    v.exit_document(ctx, doc);
}

fn visit_selections<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    selections: &'a [Selection<'a>],
) {
    for selection in selections {
        match selection {
            Selection::Field(field) => visit_field(v, ctx, field),
            Selection::FragmentSpread(spread) => {
                v.enter_fragment_spread(ctx, spread);
                visit_directives(v, ctx, &spread.item.directives);
            }
            Selection::InlineFragment(fragment) => {
                v.enter_inline_fragment(ctx, fragment);
                visit_directives(v, ctx, &fragment.item.directives);

                // Without a type condition the enclosing type still applies.
                let parent = ctx.parent_type().map(|t| t.name().as_str());
                let cond = fragment.item.type_condition.as_ref().map(|c| c.item);
                ctx.with_parent_type(cond.or(parent), |ctx| {
                    visit_selections(v, ctx, &fragment.item.selection_set);
                });
            }
        }
    }
}

fn visit_field<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    field: &'a Spanning<Field<'a>>,
) {
    v.enter_field(ctx, field);
    visit_arguments(v, ctx, &field.item.arguments);
    visit_directives(v, ctx, &field.item.directives);

    if let Some(selections) = &field.item.selection_set {
        let field_type = ctx
            .parent_type()
            .and_then(|t| t.field_by_name(field.item.name.item))
            .map(|f| f.field_type.innermost_name());
        ctx.with_parent_type(field_type, |ctx| visit_selections(v, ctx, selections));
    }
}

fn visit_directives<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    directives: &'a Option<Vec<Spanning<Directive<'a>>>>,
) {
    for directive in directives.iter().flatten() {
        v.enter_directive(ctx, directive);
        visit_arguments(v, ctx, &directive.item.arguments);
    }
}

fn visit_arguments<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    arguments: &'a Option<Spanning<Arguments<'a>>>,
) {
    for argument in arguments.iter().flat_map(|args| args.item.iter()) {
        v.enter_argument(ctx, argument);
    }
}
