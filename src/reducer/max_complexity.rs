use crate::{ast, executor::FieldError, reducer::QueryVisitor, schema::meta::Field};

/// Rejects requests selecting more than a given number of fields
///
/// Every field costs one, and costs add up over all the operations of a
/// request. A field's score is its own cost plus the score of the fields
/// below it.
#[derive(Clone, Copy, Debug)]
pub struct MaxComplexity {
    max: i64,
    total: i64,
}

impl MaxComplexity {
    /// Allows at most `max` fields.
    pub fn new(max: i64) -> Self {
        Self { max, total: 0 }
    }
}

impl QueryVisitor for MaxComplexity {
    fn visit(
        &mut self,
        _: &Field,
        _: &ast::Field<'_>,
        child_score: i64,
    ) -> Result<i64, FieldError> {
        self.total += 1;
        if self.total > self.max {
            return Err(format!("query exceeded max allowed complexity of {}", self.max).into());
        }
        Ok(child_score.saturating_add(1))
    }
}
