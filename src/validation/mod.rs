//! Query validation related methods and data structures

mod context;
mod multi_visitor;
mod rules;
mod traits;
mod visitor;

#[cfg(test)]
pub(crate) mod test_harness;

pub use self::{
    context::{RuleError, ValidatorContext},
    multi_visitor::{MultiVisitorCons, MultiVisitorNil},
    rules::visit_all_rules,
    traits::Visitor,
    visitor::visit,
};

#[cfg(test)]
pub(crate) use self::test_harness::{expect_fails_rule, expect_passes_rule};
