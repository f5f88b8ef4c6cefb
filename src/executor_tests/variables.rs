use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use pretty_assertions::assert_eq;

use crate::{
    Argument, EnumMeta, EnumValue, ExecutionError, Field, InputObjectMeta, ObjectMeta, Resolved,
    SchemaBuilder, SchemaType, SourcePosition, Type, Value, Variables, graphql_value,
};

fn echo(name: &'static str, ty: Type<'static>) -> Field {
    Field::new(name, ty.clone())
        .argument(Argument::new("value", ty))
        .resolve(|_, args, _| Ok(Resolved::Value(args.get("value").cloned().unwrap_or_default())))
}

fn schema(calls: &Arc<AtomicUsize>) -> SchemaType {
    let calls = calls.clone();
    SchemaBuilder::new()
        .register(
            InputObjectMeta::new(
                "Filter",
                vec![
                    Argument::new("term", Type::named("String")),
                    Argument::new("limit", Type::named("Int")).default_value(10),
                ],
            )
            .into_meta(),
        )
        .register(
            EnumMeta::new(
                "Color",
                vec![EnumValue::new("RED").value(1), EnumValue::new("BLUE").value(2)],
            )
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "Query",
                vec![
                    echo("int", Type::named("Int")),
                    echo("color", Type::named("Color")),
                    echo("ids", Type::list(Type::non_null_named("Int"))),
                    Field::new("search", Type::named("String"))
                        .argument(Argument::new("filter", Type::named("Filter")))
                        .resolve(|_, args, _| {
                            let filter = args.get("filter").and_then(Value::as_object_value);
                            let term = filter
                                .and_then(|f| f.get_field_value("term"))
                                .and_then(Value::as_str)
                                .unwrap_or_default();
                            let limit = filter
                                .and_then(|f| f.get_field_value("limit"))
                                .and_then(Value::as_int);
                            Ok(Resolved::value(format!("term={term} limit={limit:?}")))
                        }),
                    Field::new("user", Type::named("String"))
                        .argument(Argument::new("id", Type::non_null_named("Int")))
                        .resolve(move |_, _, _| {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(Resolved::value("someone"))
                        }),
                ],
            )
            .into_meta(),
        )
        .query("Query")
        .build()
        .expect("valid schema")
}

fn run(query: &str, vars: Variables) -> (Option<Value>, Vec<ExecutionError>) {
    let schema = schema(&Arc::default());
    crate::execute(query, &schema, &vars, vec![]).expect("Execution failed")
}

#[test]
fn supplied_default_and_missing_values() {
    let query = "query ($a: Int, $b: Int = 7, $c: Int) { a: int(value: $a) b: int(value: $b) \
                 c: int(value: $c) }";

    let (result, errs) = run(query, Variables::from([("a".to_owned(), graphql_value!(5))]));

    assert_eq!(errs, []);
    assert_eq!(result, Some(graphql_value!({"a": 5, "b": 7, "c": null})));

    let (result, errs) = run(
        query,
        Variables::from([
            ("b".to_owned(), graphql_value!(1)),
            ("c".to_owned(), graphql_value!(2)),
        ]),
    );

    assert_eq!(errs, []);
    assert_eq!(result, Some(graphql_value!({"a": null, "b": 1, "c": 2})));
}

#[test]
fn required_variable_not_provided() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = schema(&calls);

    let (result, errs) = crate::execute(
        "query ($id: Int!) { user(id: $id) }",
        &schema,
        &Variables::new(),
        vec![],
    )
    .expect("Execution failed");

    assert_eq!(result, None);
    assert_eq!(
        errs,
        [ExecutionError::new(
            SourcePosition::new(0, 7),
            "Variable \"id\" of required type \"Int!\" was not provided.".into(),
        )],
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn mismatching_variable_type_skips_resolver() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = schema(&calls);

    let (result, errs) = crate::execute(
        "query ($id: String) { user(id: $id) }",
        &schema,
        &Variables::from([("id".to_owned(), graphql_value!("1"))]),
        vec![],
    )
    .expect("Execution failed");

    assert_eq!(result, None);
    assert_eq!(
        errs,
        [ExecutionError::new(
            SourcePosition::new(0, 7),
            "Invalid variable \"id\" type, allowed type is \"Int!\"".into(),
        )],
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let (_, errs) = crate::execute(
        "query ($id: Int!) { user(id: $id) }",
        &schema,
        &Variables::from([("id".to_owned(), graphql_value!(1))]),
        vec![],
    )
    .expect("Execution failed");

    assert_eq!(errs, []);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn list_variables() {
    let (result, errs) = run(
        "query ($ids: [Int!]) { ids(value: $ids) }",
        Variables::from([("ids".to_owned(), graphql_value!([1, 2]))]),
    );

    assert_eq!(errs, []);
    assert_eq!(result, Some(graphql_value!({"ids": [1, 2]})));

    let (result, errs) = run(
        "query ($ids: [Int]) { ids(value: $ids) }",
        Variables::from([("ids".to_owned(), graphql_value!([1, 2]))]),
    );

    assert_eq!(result, None);
    assert_eq!(
        errs,
        [ExecutionError::new(
            SourcePosition::new(0, 7),
            "Invalid variable \"ids\" type, allowed type is \"[Int!]\"".into(),
        )],
    );
}

#[test]
fn input_objects() {
    let (result, errs) = run(
        r#"query ($f: Filter) { a: search(filter: {term: "x"}) b: search(filter: $f) }"#,
        Variables::from([("f".to_owned(), graphql_value!({"term": "y", "limit": 3}))]),
    );

    assert_eq!(errs, []);
    assert_eq!(
        result,
        Some(graphql_value!({"a": "term=x limit=Some(10)", "b": "term=y limit=Some(3)"})),
    );
}

#[test]
fn enums_use_internal_values() {
    let (result, errs) = run(
        "query ($c: Color) { a: color(value: BLUE) b: color(value: $c) }",
        Variables::from([("c".to_owned(), graphql_value!("RED"))]),
    );

    assert_eq!(errs, []);
    assert_eq!(result, Some(graphql_value!({"a": "BLUE", "b": "RED"})));
}
