use pretty_assertions::assert_eq;

use crate::{
    Field, Object, ObjectMeta, Resolved, SchemaBuilder, SchemaType, Type, Variables, graphql_value,
};

fn schema() -> SchemaType {
    SchemaBuilder::new()
        .register(
            ObjectMeta::new(
                "TestType",
                vec![
                    Field::new("a", Type::named("String"))
                        .resolve(|_, _, _| Ok(Resolved::value("a"))),
                    Field::new("b", Type::named("String"))
                        .resolve(|_, _, _| Ok(Resolved::value("b"))),
                ],
            )
            .into_meta(),
        )
        .query("TestType")
        .build()
        .expect("valid schema")
}

fn run_variable_query<F>(query: &str, vars: Variables, f: F)
where
    F: Fn(&Object),
{
    let schema = schema();

    let (result, errs) = crate::execute(query, &schema, &vars, vec![]).expect("Execution failed");

    assert_eq!(errs, []);

    println!("Result: {result:#?}");

    let obj = result
        .as_ref()
        .and_then(|r| r.as_object_value())
        .expect("Result is not an object");

    f(obj);
}

fn run_query<F>(query: &str, f: F)
where
    F: Fn(&Object),
{
    run_variable_query(query, Variables::new(), f);
}

#[test]
fn scalar_include_true() {
    run_query("{ a, b @include(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
    });
}

#[test]
fn scalar_include_false() {
    run_query("{ a, b @include(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn scalar_skip_false() {
    run_query("{ a, b @skip(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
    });
}

#[test]
fn scalar_skip_true() {
    run_query("{ a, b @skip(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn fragment_spread_include_false() {
    run_query(
        "{ a, ...Frag @include(if: false) } fragment Frag on TestType { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    );
}

#[test]
fn fragment_spread_skip_false() {
    run_query(
        "{ a, ...Frag @skip(if: false) } fragment Frag on TestType { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
        },
    );
}

#[test]
fn inline_fragment_include_false() {
    run_query("{ a, ... on TestType @include(if: false) { b } }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn anonymous_inline_fragment_skip_true() {
    run_query("{ a, ... @skip(if: true) { b } }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn skip_wins_over_include() {
    run_query("{ a, b @include(if: true) @skip(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn conditions_from_variables() {
    let query = "query ($skipB: Boolean!, $withA: Boolean = false) { \
                 a @include(if: $withA), b @skip(if: $skipB) }";

    run_variable_query(
        query,
        Variables::from([("skipB".to_owned(), graphql_value!(false))]),
        |result| {
            assert_eq!(result.get_field_value("a"), None);
            assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
        },
    );
    run_variable_query(
        query,
        Variables::from([
            ("skipB".to_owned(), graphql_value!(true)),
            ("withA".to_owned(), graphql_value!(true)),
        ]),
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    );
}
