//! Query visitors run before execution
//!
//! A [`QueryVisitor`] scores every field of a request from the leaves up,
//! and may reject the whole request, e.g. when it's too expensive to run.

mod max_complexity;

use crate::{
    ast::{self, Selection},
    executor::{FieldError, Request},
    parser::Spanning,
    schema::{
        meta::{Field, MetaType},
        model::SchemaType,
    },
};

pub use self::max_complexity::MaxComplexity;

/// Visitor scoring the fields of a request
///
/// Fields are visited after their sub-selections, so `child_score` is the
/// sum of the scores returned for the fields selected below this one.
pub trait QueryVisitor {
    /// Scores one field, or rejects the request.
    fn visit(
        &mut self,
        field: &Field,
        ast: &ast::Field<'_>,
        child_score: i64,
    ) -> Result<i64, FieldError>;
}

/// Walks a request with query visitors
///
/// Fragments are expanded in place. On object types a fragment only counts
/// if its type condition applies to the object. On interfaces and unions it
/// is walked with the type named by its condition.
pub struct Reducer<'a> {
    schema: &'a SchemaType,
    request: &'a Request<'a>,
}

impl<'a> Reducer<'a> {
    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn new(schema: &'a SchemaType, request: &'a Request<'a>) -> Self {
        Self { schema, request }
    }

    /// Runs every visitor over every operation of the request.
    ///
    /// Stops at the first visitor rejecting the request.
    pub fn reduce(&self, visitors: &mut [Box<dyn QueryVisitor + '_>]) -> Result<(), FieldError> {
        for visitor in visitors {
            for op in self.request.operations() {
                let root = match op.item.operation_type {
                    ast::OperationType::Query => self.schema.query_type(),
                    ast::OperationType::Mutation => self.schema.mutation_type(),
                    ast::OperationType::Subscription => None,
                };
                let Some(root) = root.and_then(|r| self.schema.concrete_type_by_name(&r.name))
                else {
                    continue;
                };

                let score =
                    self.reduce_selection_set(&mut **visitor, root, &op.item.selection_set)?;
                tracing::trace!(
                    operation = op.item.name.as_ref().map(|n| n.item),
                    score,
                    "reduced operation",
                );
            }
        }
        Ok(())
    }

    fn reduce_selection_set(
        &self,
        visitor: &mut dyn QueryVisitor,
        parent: &'a MetaType,
        selection_set: &'a [Selection<'a>],
    ) -> Result<i64, FieldError> {
        let mut score = 0i64;
        for selection in selection_set {
            let selection_score = match selection {
                Selection::Field(field) => {
                    if self.request.is_excluded(&field.item.directives) {
                        continue;
                    }
                    self.reduce_field(visitor, parent, field)?
                }
                Selection::FragmentSpread(spread) => {
                    if self.request.is_excluded(&spread.item.directives) {
                        continue;
                    }
                    let Some(fragment) = self.request.fragment_by_name(spread.item.name.item)
                    else {
                        continue;
                    };
                    match self.fragment_type(parent, fragment.type_condition.item) {
                        Some(ty) => {
                            self.reduce_selection_set(visitor, ty, &fragment.selection_set)?
                        }
                        None => 0,
                    }
                }
                Selection::InlineFragment(fragment) => {
                    if self.request.is_excluded(&fragment.item.directives) {
                        continue;
                    }
                    let ty = match &fragment.item.type_condition {
                        Some(cond) => self.fragment_type(parent, cond.item),
                        None => Some(parent),
                    };
                    match ty {
                        Some(ty) => {
                            self.reduce_selection_set(visitor, ty, &fragment.item.selection_set)?
                        }
                        None => 0,
                    }
                }
            };
            score = score.saturating_add(selection_score);
        }
        Ok(score)
    }

    fn reduce_field(
        &self,
        visitor: &mut dyn QueryVisitor,
        parent: &'a MetaType,
        field: &'a Spanning<ast::Field<'a>>,
    ) -> Result<i64, FieldError> {
        // Meta fields cost nothing.
        let Some(meta) = parent.field_by_name(field.item.name.item) else {
            return Ok(0);
        };

        let child_score = match &field.item.selection_set {
            Some(selection_set) => {
                match self
                    .schema
                    .concrete_type_by_name(meta.field_type.innermost_name())
                {
                    Some(ty) => self.reduce_selection_set(visitor, ty, selection_set)?,
                    None => 0,
                }
            }
            None => 0,
        };

        visitor.visit(meta, &field.item, child_score)
    }

    /// Type a fragment with the type condition `condition` is walked with,
    /// if it's walked at all.
    fn fragment_type(&self, parent: &'a MetaType, condition: &str) -> Option<&'a MetaType> {
        match parent {
            MetaType::Object(object) => self
                .schema
                .type_condition_applies(condition, object)
                .then_some(parent),
            _ => self.schema.concrete_type_by_name(condition),
        }
    }
}
