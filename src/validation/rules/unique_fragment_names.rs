use std::collections::HashMap;

use crate::{
    ast::Fragment,
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

/// Reports fragments defined more than once, pointing at the first
/// definition and the repeated one.
pub struct UniqueFragmentNames<'a> {
    first_seen: HashMap<&'a str, SourcePosition>,
}

pub fn factory<'a>() -> UniqueFragmentNames<'a> {
    UniqueFragmentNames {
        first_seen: HashMap::new(),
    }
}

impl<'a> Visitor<'a> for UniqueFragmentNames<'a> {
    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment<'a>>,
    ) {
        let name = &fragment.item.name;
        let first = *self.first_seen.entry(name.item).or_insert(name.start());
        if first != name.start() {
            ctx.report_error(&duplicate_message(name.item), &[first, name.start()]);
        }
    }
}

fn duplicate_message(frag_name: &str) -> String {
    format!(r#"There can only be one fragment named "{frag_name}""#)
}
