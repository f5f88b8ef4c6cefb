use crate::{
    ast::{Document, Type},
    parser::parse_document_source,
    schema::{
        builder::SchemaBuilder,
        meta::{Argument, Field, InterfaceMeta, ObjectMeta, UnionMeta},
        model::SchemaType,
    },
    validation::{MultiVisitorNil, RuleError, ValidatorContext, Visitor, visit},
};

/// Schema the rules are tested against.
///
/// ```graphql
/// interface Node { id: ID! }
/// type User implements Node { id: ID! name(upper: Boolean): String friends: [User] }
/// type Post implements Node { id: ID! title: String author: User }
/// union SearchResult = User | Post
/// type Query {
///   user(id: Int): User
///   users: [User]
///   node(id: ID!): Node
///   search(term: String): [SearchResult]
/// }
/// type Mutation { rename(id: Int!, name: String!): User }
/// ```
pub(crate) fn test_schema() -> SchemaType {
    SchemaBuilder::new()
        .register(
            InterfaceMeta::new("Node", vec![Field::new("id", Type::non_null_named("ID"))])
                .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "User",
                vec![
                    Field::new("id", Type::non_null_named("ID")),
                    Field::new("name", Type::named("String"))
                        .argument(Argument::new("upper", Type::named("Boolean"))),
                    Field::new("friends", Type::list(Type::named("User"))),
                ],
            )
            .interfaces(&["Node"])
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "Post",
                vec![
                    Field::new("id", Type::non_null_named("ID")),
                    Field::new("title", Type::named("String")),
                    Field::new("author", Type::named("User")),
                ],
            )
            .interfaces(&["Node"])
            .into_meta(),
        )
        .register(UnionMeta::new("SearchResult", &["User", "Post"]).into_meta())
        .register(
            ObjectMeta::new(
                "Query",
                vec![
                    Field::new("user", Type::named("User"))
                        .argument(Argument::new("id", Type::named("Int"))),
                    Field::new("users", Type::list(Type::named("User"))),
                    Field::new("node", Type::named("Node"))
                        .argument(Argument::new("id", Type::non_null_named("ID"))),
                    Field::new("search", Type::list(Type::named("SearchResult")))
                        .argument(Argument::new("term", Type::named("String"))),
                ],
            )
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "Mutation",
                vec![
                    Field::new("rename", Type::named("User"))
                        .argument(Argument::new("id", Type::non_null_named("Int")))
                        .argument(Argument::new("name", Type::non_null_named("String"))),
                ],
            )
            .into_meta(),
        )
        .query("Query")
        .mutation("Mutation")
        .build()
        .expect("valid test schema")
}

/// Runs `visit_fn` over `q`.
///
/// The schema and the document are leaked, so the visitors under test may
/// borrow them for `'static`.
fn validate<F>(q: &'static str, visit_fn: F) -> Vec<RuleError>
where
    F: FnOnce(&mut ValidatorContext<'static>, &'static Document<'static>),
{
    let schema: &'static SchemaType = Box::leak(Box::new(test_schema()));
    let doc: &'static Document<'static> = Box::leak(
        parse_document_source(q)
            .unwrap_or_else(|_| panic!("Parse error on input {q:#?}"))
            .into_boxed_slice(),
    );

    let mut ctx = ValidatorContext::new(schema, doc);
    visit_fn(&mut ctx, doc);
    ctx.into_errors()
}

pub(crate) fn expect_passes_rule<V, F>(factory: F, q: &'static str)
where
    V: Visitor<'static> + 'static,
    F: FnOnce() -> V,
{
    let errs = validate(q, move |ctx, doc| {
        let mut mv = MultiVisitorNil.with(factory());
        visit(&mut mv, ctx, doc);
    });

    if !errs.is_empty() {
        print_errors(&errs);
        panic!("Expected rule to pass, but errors found");
    }
}

pub(crate) fn expect_fails_rule<V, F>(factory: F, q: &'static str, expected_errors: &[RuleError])
where
    V: Visitor<'static> + 'static,
    F: FnOnce() -> V,
{
    let errs = validate(q, move |ctx, doc| {
        let mut mv = MultiVisitorNil.with(factory());
        visit(&mut mv, ctx, doc);
    });

    let mut expected_errors = expected_errors.to_vec();
    expected_errors.sort();

    if errs.is_empty() {
        panic!("Expected rule to fail, but no errors were found");
    } else if errs != expected_errors {
        println!("==> Expected errors:");
        print_errors(&expected_errors);

        println!("\n==> Actual errors:");
        print_errors(&errs);

        panic!("Unexpected set of errors found");
    }
}

fn print_errors(errs: &[RuleError]) {
    for err in errs {
        for p in err.locations() {
            print!("[{:>3},{:>3}]  ", p.line(), p.column());
        }
        println!("{}", err.message());
    }
}
