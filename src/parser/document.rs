use graphql_parser::{
    Pos,
    query::{self as external, Definition as ExternalDefinition, OperationDefinition},
};

use crate::{
    ast::{
        Arguments, Definition, Directive, Field, Fragment, FragmentSpread, InlineFragment,
        InputValue, Operation, OperationType, OwnedDocument, Selection, Type, VariableDefinition,
        VariableDefinitions,
    },
    parser::{ParseError, SourcePosition, Spanning, UnlocatedParseResult, utils::LineIndex},
    value::ScalarValue,
};

type ExternalSelectionSet<'a> = external::SelectionSet<'a, &'a str>;
type ExternalDirectives<'a> = [external::Directive<'a, &'a str>];

/// Parses a query document, returning its definitions in source order.
///
/// An empty document is not an error here: detecting the absence of an
/// operation is up to the caller.
#[doc(hidden)]
pub fn parse_document_source(s: &str) -> UnlocatedParseResult<OwnedDocument<'_>> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document = external::parse_query::<&str>(s)
        .map_err(|e| Spanning::unlocated(ParseError::Syntax(e.to_string())))?;

    let translator = Translator {
        index: LineIndex::new(s),
    };
    document
        .definitions
        .into_iter()
        .map(|def| translator.definition(def))
        .collect()
}

/// Converts `graphql-parser` nodes into [`crate::ast`] nodes.
struct Translator<'a> {
    index: LineIndex<'a>,
}

impl<'a> Translator<'a> {
    fn definition(
        &self,
        def: ExternalDefinition<'a, &'a str>,
    ) -> UnlocatedParseResult<Definition<'a>> {
        match def {
            ExternalDefinition::Operation(op) => self.operation(op).map(Definition::Operation),
            ExternalDefinition::Fragment(frag) => {
                let external::TypeCondition::On(type_condition) = frag.type_condition;
                Ok(Definition::Fragment(located(
                    frag.position,
                    Fragment {
                        name: located(frag.position, frag.name),
                        type_condition: located(frag.position, type_condition),
                        directives: self.directives(&frag.directives)?,
                        selection_set: self.selection_set(frag.selection_set)?,
                    },
                )))
            }
        }
    }

    fn operation(
        &self,
        op: OperationDefinition<'a, &'a str>,
    ) -> UnlocatedParseResult<Spanning<Operation<'a>>> {
        let (operation_type, position, name, variable_definitions, directives, selection_set) =
            match op {
                OperationDefinition::SelectionSet(set) => {
                    (OperationType::Query, set.span.0, None, vec![], vec![], set)
                }
                OperationDefinition::Query(q) => (
                    OperationType::Query,
                    q.position,
                    q.name,
                    q.variable_definitions,
                    q.directives,
                    q.selection_set,
                ),
                OperationDefinition::Mutation(m) => (
                    OperationType::Mutation,
                    m.position,
                    m.name,
                    m.variable_definitions,
                    m.directives,
                    m.selection_set,
                ),
                OperationDefinition::Subscription(s) => {
                    return Err(located(s.position, ParseError::UnsupportedSubscription));
                }
            };

        let variable_definitions = if variable_definitions.is_empty() {
            None
        } else {
            let items = variable_definitions
                .into_iter()
                .map(|def| {
                    Ok((
                        located(def.position, def.name),
                        VariableDefinition {
                            var_type: located(def.position, translate_type(&def.var_type)),
                            default_value: def
                                .default_value
                                .as_ref()
                                .map(|v| translate_value(def.position, v))
                                .transpose()?,
                        },
                    ))
                })
                .collect::<UnlocatedParseResult<Vec<_>>>()?;
            Some(located(position, VariableDefinitions { items }))
        };

        Ok(located(
            position,
            Operation {
                operation_type,
                name: name.map(|n| located(position, n)),
                variable_definitions,
                directives: self.directives(&directives)?,
                selection_set: self.selection_set(selection_set)?,
            },
        ))
    }

    fn selection_set(
        &self,
        set: ExternalSelectionSet<'a>,
    ) -> UnlocatedParseResult<Vec<Selection<'a>>> {
        set.items
            .into_iter()
            .map(|selection| self.selection(selection))
            .collect()
    }

    fn selection(
        &self,
        selection: external::Selection<'a, &'a str>,
    ) -> UnlocatedParseResult<Selection<'a>> {
        Ok(match selection {
            external::Selection::Field(f) => {
                let selection_set = if f.selection_set.items.is_empty() {
                    None
                } else {
                    Some(self.selection_set(f.selection_set)?)
                };
                Selection::Field(located(
                    f.position,
                    Field {
                        alias: f.alias.map(|a| located(f.position, a)),
                        name: located(f.position, f.name),
                        arguments: translate_arguments(f.position, &f.arguments)?,
                        directives: self.directives(&f.directives)?,
                        selection_set,
                    },
                ))
            }
            external::Selection::FragmentSpread(spread) => {
                let start = self.spread_start(spread.position);
                Selection::FragmentSpread(Spanning::at(
                    start,
                    FragmentSpread {
                        name: Spanning::at(start, spread.fragment_name),
                        directives: self.directives(&spread.directives)?,
                    },
                ))
            }
            external::Selection::InlineFragment(frag) => {
                let start = self.spread_start(frag.position);
                Selection::InlineFragment(Spanning::at(
                    start,
                    InlineFragment {
                        type_condition: frag
                            .type_condition
                            .map(|external::TypeCondition::On(t)| Spanning::at(start, t)),
                        directives: self.directives(&frag.directives)?,
                        selection_set: self.selection_set(frag.selection_set)?,
                    },
                ))
            }
        })
    }

    /// Position of the `...` token opening a fragment spread or an inline
    /// fragment.
    ///
    /// `graphql-parser` places these nodes at the token following `...`.
    fn spread_start(&self, pos: Pos) -> SourcePosition {
        let reported = SourcePosition::from(pos);
        let Some(offset) = self.index.offset_of(reported) else {
            return reported;
        };
        let source = self.index.source();
        if source[offset..].starts_with("...") {
            return reported;
        }
        source[..offset]
            .rfind("...")
            .map_or(reported, |dots| self.index.position_of(dots))
    }

    fn directives(
        &self,
        directives: &ExternalDirectives<'a>,
    ) -> UnlocatedParseResult<Option<Vec<Spanning<Directive<'a>>>>> {
        if directives.is_empty() {
            return Ok(None);
        }
        directives
            .iter()
            .map(|d| {
                Ok(located(
                    d.position,
                    Directive {
                        name: located(d.position, d.name),
                        arguments: translate_arguments(d.position, &d.arguments)?,
                    },
                ))
            })
            .collect::<UnlocatedParseResult<Vec<_>>>()
            .map(Some)
    }
}

/// Arguments carry no position of their own in `graphql-parser`, so they're
/// placed at their field or directive.
fn translate_arguments<'a>(
    pos: Pos,
    args: &[(&'a str, external::Value<'a, &'a str>)],
) -> UnlocatedParseResult<Option<Spanning<Arguments<'a>>>> {
    if args.is_empty() {
        return Ok(None);
    }
    let items = args
        .iter()
        .map(|(name, value)| Ok((located(pos, *name), translate_value(pos, value)?)))
        .collect::<UnlocatedParseResult<Vec<_>>>()?;
    Ok(Some(located(pos, Arguments { items })))
}

fn translate_type<'a>(ty: &external::Type<'a, &'a str>) -> Type<'a> {
    match ty {
        external::Type::NamedType(n) => Type::named(*n),
        external::Type::ListType(inner) => Type::List(Box::new(translate_type(inner))),
        external::Type::NonNullType(inner) => match translate_type(inner) {
            Type::Named(n) => Type::NonNullNamed(n),
            Type::List(l) => Type::NonNullList(l),
            // `graphql-parser` never nests non-null wrappers.
            other => other,
        },
    }
}

fn translate_value<'a>(
    pos: Pos,
    value: &external::Value<'a, &'a str>,
) -> UnlocatedParseResult<Spanning<InputValue>> {
    use external::Value as V;

    let value = match value {
        V::Variable(name) => InputValue::variable(name),
        V::Int(n) => {
            let n = n.as_i64().unwrap_or(i64::MAX);
            let n = i32::try_from(n).map_err(|_| located(pos, ParseError::IntegerOverflow(n)))?;
            InputValue::Scalar(ScalarValue::Int(n))
        }
        V::Float(f) => InputValue::scalar(*f),
        V::String(s) => InputValue::scalar(s.as_str()),
        V::Boolean(b) => InputValue::scalar(*b),
        V::Null => InputValue::Null,
        V::Enum(e) => InputValue::enum_value(e),
        V::List(items) => InputValue::List(
            items
                .iter()
                .map(|v| translate_value(pos, v))
                .collect::<UnlocatedParseResult<_>>()?,
        ),
        V::Object(fields) => InputValue::Object(
            fields
                .iter()
                .map(|(k, v)| Ok((located(pos, (*k).to_owned()), translate_value(pos, v)?)))
                .collect::<UnlocatedParseResult<_>>()?,
        ),
    };
    Ok(located(pos, value))
}

fn located<T>(pos: Pos, item: T) -> Spanning<T> {
    Spanning::at(pos.into(), item)
}
