use crate::{
    ast::{
        Directive, Document, Field, Fragment, FragmentSpread, InlineFragment, InputValue,
        Operation, VariableDefinition,
    },
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Empty set of rules, the start of a [`MultiVisitorCons`] chain.
#[doc(hidden)]
pub struct MultiVisitorNil;

/// A rule followed by the rest of a set of rules
///
/// Each hook is handed to the rule first, then to the rest.
#[doc(hidden)]
pub struct MultiVisitorCons<A, B>(A, B);

impl MultiVisitorNil {
    pub fn with<V>(self, rule: V) -> MultiVisitorCons<V, Self> {
        MultiVisitorCons(rule, self)
    }
}

impl<A, B> MultiVisitorCons<A, B> {
    pub fn with<V>(self, rule: V) -> MultiVisitorCons<V, Self> {
        MultiVisitorCons(rule, self)
    }
}

impl Visitor<'_> for MultiVisitorNil {}

macro_rules! forward_to_both {
    ($lt:lifetime; $($hook:ident: $node:ty),* $(,)?) => {
        impl<$lt, A: Visitor<$lt>, B: Visitor<$lt>> Visitor<$lt> for MultiVisitorCons<A, B> {
            $(
                fn $hook(&mut self, ctx: &mut ValidatorContext<$lt>, node: $node) {
                    self.0.$hook(ctx, node);
                    self.1.$hook(ctx, node);
                }
            )*
        }
    };
}

forward_to_both! {
    'a;
    enter_operation_definition: &'a Spanning<Operation<'a>>,
    enter_fragment_definition: &'a Spanning<Fragment<'a>>,
    enter_variable_definition: &'a (Spanning<&'a str>, VariableDefinition<'a>),
    enter_directive: &'a Spanning<Directive<'a>>,
    enter_argument: &'a (Spanning<&'a str>, Spanning<InputValue>),
    enter_field: &'a Spanning<Field<'a>>,
    enter_fragment_spread: &'a Spanning<FragmentSpread<'a>>,
    enter_inline_fragment: &'a Spanning<InlineFragment<'a>>,
    exit_document: &'a Document<'a>,
}
