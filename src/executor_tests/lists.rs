use pretty_assertions::assert_eq;

use crate::{
    ExecutionError, Field, ObjectMeta, Resolved, SchemaBuilder, SchemaType, SourcePosition, Type,
    Variables, graphql_value,
};

fn schema() -> SchemaType {
    SchemaBuilder::new()
        .register(
            ObjectMeta::new(
                "Query",
                vec![
                    Field::new("items", Type::list(Type::named("Int"))).resolve(|_, _, _| {
                        Ok(Resolved::List(vec![
                            Resolved::value(1),
                            Resolved::value("two"),
                            Resolved::value(3),
                        ]))
                    }),
                    Field::new("strict", Type::list(Type::non_null_named("Int")))
                        .resolve(|_, _, _| Ok(Resolved::value(graphql_value!([1, null, 3])))),
                    Field::new("matrix", Type::list(Type::list(Type::named("Int"))))
                        .resolve(|_, _, _| {
                            Ok(Resolved::value(graphql_value!([[1, 2], [3], null, []])))
                        }),
                    Field::new("required", Type::non_null_list(Type::named("Int")))
                        .resolve(|_, _, _| Ok(Resolved::value(graphql_value!(null)))),
                    Field::new("scalar", Type::list(Type::named("Int")))
                        .resolve(|_, _, _| Ok(Resolved::value(5))),
                    Field::new("users", Type::list(Type::named("User"))).resolve(|_, _, _| {
                        Ok(Resolved::List(vec![
                            Resolved::value(graphql_value!({"name": "Ann"})),
                            Resolved::deferred(|| Err("not found".into())),
                            Resolved::deferred(|| {
                                Ok(Resolved::value(graphql_value!({"name": "Bob"})))
                            }),
                        ]))
                    }),
                ],
            )
            .into_meta(),
        )
        .register(
            ObjectMeta::new("User", vec![Field::new("name", Type::named("String"))]).into_meta(),
        )
        .query("Query")
        .build()
        .expect("valid schema")
}

fn run(query: &str) -> (Option<crate::Value>, Vec<ExecutionError>) {
    let schema = schema();
    crate::execute(query, &schema, &Variables::new(), vec![]).expect("Execution failed")
}

#[test]
fn failing_items_become_null() {
    let (result, errs) = run("{ items strict }");

    assert_eq!(
        result,
        Some(graphql_value!({"items": [1, null, 3], "strict": [1, null, 3]})),
    );
    assert_eq!(
        errs,
        [
            ExecutionError::new(
                SourcePosition::new(0, 2),
                "Not valid resolved type for field \"items\"".into(),
            ),
            ExecutionError::new(
                SourcePosition::new(0, 8),
                "Cannot return null for non-nullable field \"strict\"".into(),
            ),
        ],
    );
}

#[test]
fn nested_lists() {
    let (result, errs) = run("{ matrix }");

    assert_eq!(errs, []);
    assert_eq!(result, Some(graphql_value!({"matrix": [[1, 2], [3], null, []]})));
}

#[test]
fn lists_of_deferred_objects() {
    let (result, errs) = run("{ users { name } }");

    assert_eq!(
        result,
        Some(graphql_value!({"users": [{"name": "Ann"}, null, {"name": "Bob"}]})),
    );
    assert_eq!(
        errs,
        [ExecutionError::new(SourcePosition::new(0, 2), "not found".into())],
    );
}

#[test]
fn invalid_list_values() {
    let (result, errs) = run("{ required scalar }");

    assert_eq!(result, None);
    assert_eq!(
        errs,
        [
            ExecutionError::new(
                SourcePosition::new(0, 2),
                "Cannot return null for non-nullable field \"required\"".into(),
            ),
            ExecutionError::new(
                SourcePosition::new(0, 11),
                "Not valid resolved type for field \"scalar\"".into(),
            ),
        ],
    );
}
