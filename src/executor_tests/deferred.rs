use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    Argument, ExecutionError, Field, FieldResult, ObjectMeta, Resolved, SchemaBuilder, SchemaType,
    SourcePosition, Type, Value, Variables, graphql_value,
};

type Log = Arc<Mutex<Vec<&'static str>>>;

fn record(log: &Log, entry: &'static str) {
    log.lock().unwrap().push(entry);
}

mod ordering {
    use pretty_assertions::assert_eq;

    use super::*;

    fn schema(log: &Log) -> SchemaType {
        let (user_log, greeting_log, name_log) = (log.clone(), log.clone(), log.clone());
        SchemaBuilder::new()
            .register(
                ObjectMeta::new(
                    "Query",
                    vec![
                        Field::new("user", Type::named("User")).resolve(move |_, _, _| {
                            let log = user_log.clone();
                            Ok(Resolved::deferred(move || {
                                record(&log, "user");
                                Ok(Resolved::value(graphql_value!({"name": "Ann"})))
                            }))
                        }),
                        Field::new("greeting", Type::named("String")).resolve(move |_, _, _| {
                            let log = greeting_log.clone();
                            Ok(Resolved::deferred(move || {
                                record(&log, "greeting");
                                Ok(Resolved::value("hello"))
                            }))
                        }),
                    ],
                )
                .into_meta(),
            )
            .register(
                ObjectMeta::new(
                    "User",
                    vec![Field::new("name", Type::named("String")).resolve(
                        move |parent, _, _| {
                            let log = name_log.clone();
                            let name = parent
                                .as_object_value()
                                .and_then(|o| o.get_field_value("name"))
                                .cloned()
                                .unwrap_or_default();
                            Ok(Resolved::deferred(move || {
                                record(&log, "name");
                                Ok(Resolved::Value(name))
                            }))
                        },
                    )],
                )
                .into_meta(),
            )
            .query("Query")
            .build()
            .expect("valid schema")
    }

    #[test]
    fn composite_values_resolve_before_leaves() {
        let log = Log::default();
        let schema = schema(&log);

        let (result, errs) =
            crate::execute("{ greeting user { name } }", &schema, &Variables::new(), vec![])
                .expect("Execution failed");

        assert_eq!(errs, []);
        assert_eq!(
            result,
            Some(graphql_value!({"greeting": "hello", "user": {"name": "Ann"}})),
        );
        assert_eq!(*log.lock().unwrap(), ["user", "greeting", "name"]);
    }
}

mod batching {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Collects the keys requested during the walk, and fetches all of them
    /// at once when the first deferred value is resolved.
    #[derive(Default)]
    struct Loader {
        pending: Vec<i32>,
        cache: HashMap<i32, Value>,
        batches: Vec<Vec<i32>>,
    }

    impl Loader {
        fn load(loader: &Arc<Mutex<Self>>, id: i32) -> Resolved {
            loader.lock().unwrap().pending.push(id);
            let loader = loader.clone();
            Resolved::deferred(move || {
                let mut loader = loader.lock().unwrap();
                if !loader.pending.is_empty() {
                    let batch = std::mem::take(&mut loader.pending);
                    for &id in &batch {
                        let name = format!("user {id}");
                        loader.cache.insert(id, graphql_value!({"id": id, "name": name}));
                    }
                    loader.batches.push(batch);
                }
                Ok(Resolved::Value(loader.cache.get(&id).cloned().unwrap_or_default()))
            })
        }
    }

    fn schema(loader: &Arc<Mutex<Loader>>) -> SchemaType {
        let (user_loader, users_loader) = (loader.clone(), loader.clone());
        SchemaBuilder::new()
            .register(
                ObjectMeta::new(
                    "Query",
                    vec![
                        Field::new("user", Type::named("User"))
                            .argument(Argument::new("id", Type::non_null_named("Int")))
                            .resolve(move |_, args, _| {
                                let id = args.get("id").and_then(Value::as_int).unwrap_or_default();
                                Ok(Loader::load(&user_loader, id))
                            }),
                        Field::new("users", Type::list(Type::named("User")))
                            .argument(Argument::new("ids", Type::list(Type::non_null_named("Int"))))
                            .resolve(move |_, args, _| {
                                let ids = args
                                    .get("ids")
                                    .and_then(Value::as_list_value)
                                    .into_iter()
                                    .flatten()
                                    .filter_map(Value::as_int);
                                Ok(Resolved::List(
                                    ids.map(|id| Loader::load(&users_loader, id)).collect(),
                                ))
                            }),
                    ],
                )
                .into_meta(),
            )
            .register(
                ObjectMeta::new(
                    "User",
                    vec![
                        Field::new("id", Type::non_null_named("Int")),
                        Field::new("name", Type::named("String")),
                    ],
                )
                .into_meta(),
            )
            .query("Query")
            .build()
            .expect("valid schema")
    }

    #[test]
    fn sibling_fields_are_fetched_together() {
        let loader = Arc::new(Mutex::new(Loader::default()));
        let schema = schema(&loader);

        let (result, errs) = crate::execute(
            "{ a: user(id: 1) { name } b: user(id: 2) { id } users(ids: [3, 4]) { id name } }",
            &schema,
            &Variables::new(),
            vec![],
        )
        .expect("Execution failed");

        assert_eq!(errs, []);
        assert_eq!(
            result,
            Some(graphql_value!({
                "a": {"name": "user 1"},
                "b": {"id": 2},
                "users": [{"id": 3, "name": "user 3"}, {"id": 4, "name": "user 4"}],
            })),
        );
        assert_eq!(loader.lock().unwrap().batches, [vec![1, 2, 3, 4]]);
    }
}

mod chaining {
    use pretty_assertions::assert_eq;

    use super::*;

    fn nested(depth: u8) -> FieldResult<Resolved> {
        if depth == 0 {
            Ok(Resolved::value("bottom"))
        } else {
            Ok(Resolved::deferred(move || nested(depth - 1)))
        }
    }

    fn schema() -> SchemaType {
        SchemaBuilder::new()
            .register(
                ObjectMeta::new(
                    "Query",
                    vec![
                        Field::new("deep", Type::named("String")).resolve(|_, _, _| nested(5)),
                        Field::new("gone", Type::named("String")).resolve(|_, _, _| {
                            Ok(Resolved::deferred(|| Err("gone".into())))
                        }),
                        Field::new("item", Type::named("Item")).resolve(|_, _, _| {
                            Ok(Resolved::deferred(|| {
                                Ok(Resolved::value(graphql_value!({"label": "x"})))
                            }))
                        }),
                        Field::new("items", Type::list(Type::named("String"))).resolve(
                            |_, _, _| {
                                Ok(Resolved::deferred(|| {
                                    Ok(Resolved::List(vec![
                                        Resolved::value("one"),
                                        Resolved::deferred(|| Err("no two".into())),
                                        Resolved::deferred(|| nested(2)),
                                    ]))
                                }))
                            },
                        ),
                    ],
                )
                .into_meta(),
            )
            .register(
                ObjectMeta::new(
                    "Item",
                    vec![
                        Field::new("label", Type::named("String")),
                        Field::new("broken", Type::named("String")).resolve(|_, _, _| {
                            Ok(Resolved::deferred(|| Err("broken".into())))
                        }),
                    ],
                )
                .into_meta(),
            )
            .query("Query")
            .build()
            .expect("valid schema")
    }

    #[test]
    fn deferred_values_resolve_to_deferred_values() {
        let schema = schema();

        let (result, errs) = crate::execute("{ deep }", &schema, &Variables::new(), vec![])
            .expect("Execution failed");

        assert_eq!(errs, []);
        assert_eq!(result, Some(graphql_value!({"deep": "bottom"})));
    }

    #[test]
    fn failing_deferred_values_become_null() {
        let schema = schema();

        let (result, errs) = crate::execute(
            "{ gone item { label broken } items }",
            &schema,
            &Variables::new(),
            vec![],
        )
        .expect("Execution failed");

        assert_eq!(
            result,
            Some(graphql_value!({
                "gone": null,
                "item": {"label": "x", "broken": null},
                "items": ["one", null, "bottom"],
            })),
        );
        assert_eq!(
            errs,
            [
                ExecutionError::new(SourcePosition::new(0, 2), "gone".into()),
                ExecutionError::new(SourcePosition::new(0, 20), "broken".into()),
                ExecutionError::new(SourcePosition::new(0, 29), "no two".into()),
            ],
        );
    }
}
