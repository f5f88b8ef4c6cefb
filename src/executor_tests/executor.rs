mod field_execution {
    use pretty_assertions::assert_eq;

    use crate::{
        Argument, Field, ObjectMeta, Processor, Resolved, SchemaBuilder, SchemaType, Type, Value,
        Variables, graphql_value,
    };

    fn schema() -> SchemaType {
        SchemaBuilder::new()
            .register(
                ObjectMeta::new(
                    "DataType",
                    vec![
                        Field::new("a", Type::named("String")),
                        Field::new("b", Type::named("String")),
                        Field::new("c", Type::named("String")),
                        Field::new("d", Type::named("String")),
                        Field::new("e", Type::named("String")),
                        Field::new("f", Type::named("String")),
                        Field::new("pic", Type::named("String"))
                            .argument(Argument::new("size", Type::named("Int")))
                            .resolve(|_, args, _| {
                                let size = args.get("size").and_then(Value::as_int).unwrap_or(50);
                                Ok(Resolved::value(format!("Pic of size: {size}")))
                            }),
                        Field::new("deep", Type::named("DeepDataType")),
                    ],
                )
                .into_meta(),
            )
            .register(
                ObjectMeta::new(
                    "DeepDataType",
                    vec![
                        Field::new("a", Type::named("String")),
                        Field::new("b", Type::named("String")),
                        Field::new("c", Type::list(Type::named("String"))),
                        Field::new("deeper", Type::list(Type::named("DataType"))),
                    ],
                )
                .into_meta(),
            )
            .query("DataType")
            .build()
            .expect("valid schema")
    }

    fn root_value() -> Value {
        graphql_value!({
            "a": "Apple",
            "b": "Banana",
            "c": "Cookie",
            "d": "Donut",
            "e": "Egg",
            "f": "Fish",
            "deep": {
                "a": "Already Been Done",
                "b": "Boring",
                "c": ["Contrived", null, "Confusing"],
                "deeper": [{"a": "Apple", "b": "Banana"}, null, {"a": "Apple", "b": "Banana"}],
            },
        })
    }

    #[test]
    fn test() {
        let schema = schema();
        let doc = r"
          query Example($size: Int) {
            a,
            b,
            x: c
            ...c
            f
            ...on DataType {
              pic(size: $size)
            }
            deep {
              a
              b
              c
              deeper {
                a
                b
              }
            }
          }

          fragment c on DataType {
            d
            e
          }";

        let vars = Variables::from([("size".to_owned(), graphql_value!(100))]);

        let (result, errs) = Processor::new(&schema)
            .root_value(root_value())
            .execute(doc, &vars, vec![])
            .expect("Execution failed");

        assert_eq!(errs, []);

        println!("Result: {result:#?}");

        assert_eq!(
            result,
            Some(graphql_value!({
                "a": "Apple",
                "b": "Banana",
                "x": "Cookie",
                "d": "Donut",
                "e": "Egg",
                "f": "Fish",
                "pic": "Pic of size: 100",
                "deep": {
                    "a": "Already Been Done",
                    "b": "Boring",
                    "c": ["Contrived", null, "Confusing"],
                    "deeper": [{"a": "Apple", "b": "Banana"}, null, {"a": "Apple", "b": "Banana"}],
                },
            })),
        );
    }

    #[test]
    fn argument_defaults_to_resolver_fallback() {
        let schema = schema();

        let (result, errs) = crate::execute("{ pic }", &schema, &Variables::new(), vec![])
            .expect("Execution failed");

        assert_eq!(errs, []);
        assert_eq!(result, Some(graphql_value!({"pic": "Pic of size: 50"})));
    }
}

mod merge_selections {
    use pretty_assertions::assert_eq;

    use crate::{
        Field, ObjectMeta, Resolved, SchemaBuilder, SchemaType, Type, Variables, graphql_value,
    };

    fn schema() -> SchemaType {
        SchemaBuilder::new()
            .register(
                ObjectMeta::new(
                    "Query",
                    vec![Field::new("user", Type::named("User")).resolve(|_, _, _| {
                        Ok(Resolved::value(graphql_value!({
                            "id": 1,
                            "name": "Ann",
                            "best": {"id": 2, "name": "Bob"},
                            "friends": [{"id": 2, "name": "Bob"}],
                        })))
                    })],
                )
                .into_meta(),
            )
            .register(
                ObjectMeta::new(
                    "User",
                    vec![
                        Field::new("id", Type::named("Int")),
                        Field::new("name", Type::named("String")),
                        Field::new("best", Type::named("User")),
                        Field::new("friends", Type::list(Type::named("User"))),
                    ],
                )
                .into_meta(),
            )
            .query("Query")
            .build()
            .expect("valid schema")
    }

    fn run(query: &str) -> Option<crate::Value> {
        let schema = schema();
        let (result, errs) =
            crate::execute(query, &schema, &Variables::new(), vec![]).expect("Execution failed");
        assert_eq!(errs, []);
        result
    }

    #[test]
    fn same_field_through_fragment_spread() {
        let result = run(r"
          {
            user { id best { id } }
            ...F
          }

          fragment F on Query {
            user { name best { name } }
          }");

        assert_eq!(
            result,
            Some(graphql_value!({
                "user": {"id": 1, "best": {"id": 2, "name": "Bob"}, "name": "Ann"},
            })),
        );
    }

    #[test]
    fn same_field_through_inline_fragment() {
        let result = run("{ user { id } ... on Query { user { name } } }");

        assert_eq!(result, Some(graphql_value!({"user": {"id": 1, "name": "Ann"}})));
    }

    #[test]
    fn later_list_replaces_earlier_one() {
        let result = run("{ user { friends { id } } user { friends { name } } }");

        assert_eq!(result, Some(graphql_value!({"user": {"friends": [{"name": "Bob"}]}})));
    }

    #[test]
    fn aliases_are_kept_apart() {
        let result = run("{ a: user { id } b: user { name } }");

        assert_eq!(
            result,
            Some(graphql_value!({"a": {"id": 1}, "b": {"name": "Ann"}})),
        );
    }
}

mod field_errors {
    use pretty_assertions::assert_eq;

    use crate::{
        ExecutionError, Field, FieldError, ObjectMeta, Resolved, SchemaBuilder, SchemaType,
        SourcePosition, Type, Variables, graphql_value,
    };

    fn schema() -> SchemaType {
        SchemaBuilder::new()
            .register(
                ObjectMeta::new(
                    "Query",
                    vec![
                        Field::new("ok", Type::named("String"))
                            .resolve(|_, _, _| Ok(Resolved::value("yes"))),
                        Field::new("broken", Type::named("String"))
                            .resolve(|_, _, _| Err("boom".into())),
                        Field::new("user", Type::named("User")).resolve(|_, _, _| {
                            Ok(Resolved::value(graphql_value!({"id": 1, "name": null})))
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
                        Field::new("name", Type::non_null_named("String")),
                        Field::new("nick", Type::named("String")).resolve(|_, _, _| {
                            Err(FieldError::new(
                                "no nick",
                                graphql_value!({"code": "NOT_FOUND"}),
                            ))
                        }),
                        Field::new("age", Type::named("Int"))
                            .resolve(|_, _, _| Ok(Resolved::value("old"))),
                    ],
                )
                .into_meta(),
            )
            .query("Query")
            .build()
            .expect("valid schema")
    }

    #[test]
    fn failures_are_isolated() {
        let schema = schema();

        let (result, errs) = crate::execute(
            "{ ok broken user { id name nick age } }",
            &schema,
            &Variables::new(),
            vec![],
        )
        .expect("Execution failed");

        assert_eq!(
            result,
            Some(graphql_value!({
                "ok": "yes",
                "user": {"id": 1, "name": null, "nick": null, "age": null},
            })),
        );
        assert_eq!(
            errs,
            [
                ExecutionError::new(SourcePosition::new(0, 5), "boom".into()),
                ExecutionError::new(
                    SourcePosition::new(0, 22),
                    "Cannot return null for non-nullable field \"name\"".into(),
                ),
                ExecutionError::new(
                    SourcePosition::new(0, 27),
                    FieldError::new("no nick", graphql_value!({"code": "NOT_FOUND"})),
                ),
                ExecutionError::new(
                    SourcePosition::new(0, 32),
                    "Not valid resolved type for field \"age\"".into(),
                ),
            ],
        );
    }

    #[test]
    fn failed_root_fields_leave_no_data() {
        let schema = schema();

        let (result, errs) = crate::execute("{ broken user }", &schema, &Variables::new(), vec![])
            .expect("Execution failed");

        assert_eq!(result, None);
        assert_eq!(
            errs,
            [
                ExecutionError::new(SourcePosition::new(0, 2), "boom".into()),
                ExecutionError::new(
                    SourcePosition::new(0, 9),
                    "You have to specify fields for \"user\"".into(),
                ),
            ],
        );
    }
}

mod operations {
    use pretty_assertions::assert_eq;

    use crate::{
        Argument, ExecutionError, Field, ObjectMeta, Resolved, SchemaBuilder, SchemaType,
        SourcePosition, Type, Variables, graphql_value,
    };

    fn schema(with_mutation: bool) -> SchemaType {
        let builder = SchemaBuilder::new()
            .register(
                ObjectMeta::new(
                    "Query",
                    vec![
                        Field::new("a", Type::named("String"))
                            .resolve(|_, _, _| Ok(Resolved::value("a"))),
                        Field::new("b", Type::named("String"))
                            .resolve(|_, _, _| Ok(Resolved::value("b"))),
                    ],
                )
                .into_meta(),
            )
            .query("Query");
        if !with_mutation {
            return builder.build().expect("valid schema");
        }
        builder
            .register(
                ObjectMeta::new(
                    "Mutation",
                    vec![
                        Field::new("rename", Type::named("String"))
                            .argument(Argument::new("name", Type::non_null_named("String")))
                            .resolve(|_, args, _| {
                                Ok(Resolved::value(args.get("name").cloned().unwrap_or_default()))
                            }),
                    ],
                )
                .into_meta(),
            )
            .mutation("Mutation")
            .build()
            .expect("valid schema")
    }

    fn run(schema: &SchemaType, query: &str) -> (Option<crate::Value>, Vec<ExecutionError>) {
        crate::execute(query, schema, &Variables::new(), vec![]).expect("Execution failed")
    }

    #[test]
    fn typename_of_root() {
        let schema = schema(false);

        let (result, errs) = run(&schema, "{ __typename }");

        assert_eq!(errs, []);
        assert_eq!(result, Some(graphql_value!({"__typename": "Query"})));
    }

    #[test]
    fn every_operation_is_executed() {
        let schema = schema(true);

        let (result, errs) = run(
            &schema,
            r#"
              query A { a }
              query B { b }
              mutation C { rename(name: "x") }"#,
        );

        assert_eq!(errs, []);
        assert_eq!(result, Some(graphql_value!({"a": "a", "b": "b", "rename": "x"})));
    }

    #[test]
    fn mutation_without_mutation_type() {
        let schema = schema(false);

        let (result, errs) = run(&schema, "{ a } mutation { a }");

        assert_eq!(result, Some(graphql_value!({"a": "a"})));
        assert_eq!(
            errs,
            [ExecutionError::new(
                SourcePosition::new(0, 6),
                "Schema is not configured for Mutation operations".into(),
            )],
        );
    }
}

mod resolver_context {
    use pretty_assertions::assert_eq;

    use crate::{
        ExecutionError, Field, ObjectMeta, Processor, Resolved, SchemaBuilder, SchemaType,
        SourcePosition, Type, Variables, graphql_value,
    };

    struct Viewer {
        name: &'static str,
        deprecated_login: bool,
    }

    fn schema() -> SchemaType {
        SchemaBuilder::new()
            .register(
                ObjectMeta::new(
                    "Query",
                    vec![
                        Field::new("me", Type::named("String")).resolve(|_, _, info| {
                            let Some(viewer) = info.context::<Viewer>() else {
                                return Err("not logged in".into());
                            };
                            if viewer.deprecated_login {
                                info.push_error("login method is deprecated");
                                info.push_error_at("see docs", SourcePosition::new_origin());
                            }
                            Ok(Resolved::value(viewer.name))
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
    fn resolvers_read_the_context() {
        let schema = schema();
        let processor = Processor::new(&schema).context(Viewer {
            name: "Ann",
            deprecated_login: false,
        });

        assert_eq!(
            processor.execute("{ me }", &Variables::new(), vec![]),
            Ok((Some(graphql_value!({"me": "Ann"})), vec![])),
        );
    }

    #[test]
    fn resolvers_report_errors_next_to_data() {
        let schema = schema();
        let processor = Processor::new(&schema).context(Viewer {
            name: "Bob",
            deprecated_login: true,
        });

        let (data, errs) = processor
            .execute("{ other: me }", &Variables::new(), vec![])
            .expect("Execution failed");

        assert_eq!(data, Some(graphql_value!({"other": "Bob"})));
        assert_eq!(
            errs,
            [
                ExecutionError::new(
                    SourcePosition::new(0, 2),
                    "login method is deprecated".into(),
                ),
                ExecutionError::new(SourcePosition::new_origin(), "see docs".into()),
            ],
        );
    }

    #[test]
    fn missing_or_mistyped_context_is_none() {
        let schema = schema();

        let (data, errs) = Processor::new(&schema)
            .execute("{ me }", &Variables::new(), vec![])
            .expect("Execution failed");
        assert_eq!(data, None);
        assert_eq!(
            errs,
            [ExecutionError::new(SourcePosition::new(0, 2), "not logged in".into())],
        );

        let (_, errs) = Processor::new(&schema)
            .context(42_i32)
            .execute("{ me }", &Variables::new(), vec![])
            .expect("Execution failed");
        assert_eq!(errs.len(), 1);
    }
}
