mod fields_on_correct_type;
mod known_fragment_names;
mod known_type_names;
mod no_fragment_cycles;
mod no_undefined_variables;
mod unique_argument_names;
mod unique_fragment_names;

use crate::{
    ast::Document,
    validation::{MultiVisitorNil, ValidatorContext, visit},
};

#[doc(hidden)]
pub fn visit_all_rules<'a>(ctx: &mut ValidatorContext<'a>, doc: &'a Document<'a>) {
    let mut mv = MultiVisitorNil
        .with(self::fields_on_correct_type::factory())
        .with(self::known_fragment_names::factory())
        .with(self::known_type_names::factory())
        .with(self::no_fragment_cycles::factory())
        .with(self::no_undefined_variables::factory())
        .with(self::unique_argument_names::factory())
        .with(self::unique_fragment_names::factory());

    visit(&mut mv, ctx, doc);
}
