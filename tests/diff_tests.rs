//! Configuration and schema diff tests

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use asconfig::diff::{
        ChangeKind, DiffEntry, FlatMap, SchemaDiff, SchemaDiffOptions, diff_documents, diff_flat,
        flatten,
    };
    use asconfig::format::block;
    use asconfig::model::{Scalar, Section, Value};
    use asconfig::normalize::normalize;
    use serde_json::{Value as Json, json};

    fn flat(entries: &[(&str, Scalar)]) -> FlatMap {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect()
    }

    fn canonical(text: &str) -> Section {
        let mut root = block::read(text).unwrap();
        normalize(&mut root).unwrap();
        root
    }

    fn service_schema(properties: Json) -> Json {
        json!({
            "type": "object",
            "properties": {
                "service": {
                    "type": "object",
                    "properties": properties
                }
            }
        })
    }

    #[test]
    fn logging_values_compare_case_insensitively() {
        let left = flat(&[("logging.file.context", Scalar::from("INFO"))]);
        let right = flat(&[("logging.file.context", Scalar::from("info"))]);
        let diff = diff_flat(&left, &right);
        assert!(diff.is_empty());
        assert_eq!(diff.render(), "");
    }

    #[test]
    fn other_values_compare_exactly() {
        let left = flat(&[("service.cluster-name", Scalar::from("Prod"))]);
        let right = flat(&[("service.cluster-name", Scalar::from("prod"))]);
        assert_eq!(
            diff_flat(&left, &right).entries(),
            &[DiffEntry::Changed {
                key: "service.cluster-name".to_owned(),
                left: Scalar::from("Prod"),
                right: Scalar::from("prod"),
            }]
        );
    }

    #[test]
    fn integers_and_strings_are_not_equal() {
        let left = flat(&[("service.proto-fd-max", Scalar::Int(100))]);
        let right = flat(&[("service.proto-fd-max", Scalar::from("100"))]);
        assert_eq!(diff_flat(&left, &right).len(), 1);
    }

    #[test]
    fn report_lists_keys_in_order() {
        let left = flat(&[
            ("a.removed", Scalar::Int(1)),
            ("b.changed", Scalar::Int(1)),
            ("c.same", Scalar::Bool(true)),
        ]);
        let right = flat(&[
            ("b.changed", Scalar::Int(2)),
            ("c.same", Scalar::Bool(true)),
            ("d.added", Scalar::from("x")),
        ]);

        assert_eq!(
            diff_flat(&left, &right).render(),
            "<: a.removed\nb.changed:\n\t<: 1\n\t>: 2\n>: d.added\n"
        );
    }

    #[test]
    fn flatten_addresses_sections_by_identifier() {
        let root = canonical(
            "namespace test {\n    replication-factor 2\n    storage-engine device {\n        file /a.dat\n        file /b.dat\n    }\n}\n",
        );
        let flat = flatten(&root);

        assert_eq!(flat.get("namespaces.test.replication-factor"), Some(&Scalar::Int(2)));
        assert_eq!(flat.get("namespaces.test.name"), Some(&Scalar::from("test")));
        assert_eq!(flat.get("namespaces.test.<index>"), Some(&Scalar::Int(0)));
        assert_eq!(
            flat.get("namespaces.test.storage-engine.type"),
            Some(&Scalar::from("device"))
        );
        assert_eq!(
            flat.get("namespaces.test.storage-engine.files.1"),
            Some(&Scalar::from("/b.dat"))
        );
    }

    #[test]
    fn flatten_is_deterministic() {
        let text = "service {\n    cluster-name prod\n}\nnamespace b {\n    replication-factor 1\n}\nnamespace a {\n    replication-factor 2\n}\n";
        assert_eq!(flatten(&canonical(text)), flatten(&canonical(text)));
    }

    #[test]
    fn list_positions_are_not_reported() {
        let left = Section::new().with(
            "namespaces",
            Value::Sections(vec![
                Section::new().with("name", "a"),
                Section::new().with("name", "b"),
            ]),
        );
        let right = Section::new().with(
            "namespaces",
            Value::Sections(vec![
                Section::new().with("name", "b"),
                Section::new().with("name", "a"),
            ]),
        );
        assert!(diff_documents(&left, &right).is_empty());
    }

    #[test]
    fn equivalent_documents_in_different_formats_have_no_differences() {
        let from_block = canonical(
            "logging {\n    console {\n        context any INFO\n    }\n}\nnamespace test {\n    replication-factor 2\n}\n",
        );
        let mut from_yaml = asconfig::format::yaml::read(
            "namespaces:\n  - name: test\n    replication-factor: 2\nlogging:\n  - name: console\n    any: info\n",
        )
        .unwrap();
        normalize(&mut from_yaml).unwrap();

        assert!(diff_documents(&from_block, &from_yaml).is_empty());
    }

    #[test]
    fn diff_is_symmetric_in_counts() {
        let left = canonical("service {\n    proto-fd-max 100\n    cluster-name a\n}\n");
        let right = canonical("service {\n    proto-fd-max 200\n    service-threads 4\n}\n");

        let forward = diff_documents(&left, &right);
        let backward = diff_documents(&right, &left);
        assert_eq!(forward.len(), backward.len());
        assert_eq!(forward.len(), 3);
    }

    #[test]
    fn schema_addition_is_reported_with_its_attributes() {
        let old = service_schema(json!({"cluster-name": {"type": "string"}}));
        let new = service_schema(json!({
            "cluster-name": {"type": "string"},
            "new-prop": {"type": "string", "default": "new"}
        }));

        let diff = SchemaDiff::compute(
            &old,
            &new,
            &SchemaDiffOptions {
                verbose: true,
                ..SchemaDiffOptions::default()
            },
        );

        assert_eq!(diff.added(), 1);
        assert_eq!(diff.removed(), 0);
        assert_eq!(diff.changed(), 0);
        assert!(
            diff.render()
                .lines()
                .any(|line| line == "+ service.new-prop (type: string, default: new)")
        );
    }

    #[test]
    fn schema_change_is_reported_once() {
        let old = service_schema(json!({"changed-prop": {"type": "integer", "default": 10}}));
        let new = service_schema(json!({"changed-prop": {"type": "integer", "default": 20}}));

        let diff = SchemaDiff::compute(&old, &new, &SchemaDiffOptions::default());
        let rendered = diff.render();

        assert_eq!(rendered.lines().filter(|line| *line == "~ service.changed-prop").count(), 1);
        assert!(rendered.ends_with("\nSummary: 0 added, 0 removed, 1 changed\n"));
        assert_eq!(diff.changes()[0].summary.as_deref(), Some("default: 10 → 20"));
    }

    #[test]
    fn verbose_report_describes_each_kind_of_change() {
        let old = service_schema(json!({
            "p": {"type": "integer"},
            "q": {"type": "string", "enterpriseOnly": true}
        }));
        let new = service_schema(json!({
            "p": {"type": "integer", "default": 5},
            "r": {"type": "string", "enterpriseOnly": true}
        }));

        let diff = SchemaDiff::compute(
            &old,
            &new,
            &SchemaDiffOptions {
                verbose: true,
                ..SchemaDiffOptions::default()
            },
        );
        let rendered = diff.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines.contains(&"~ service.p (default: <none> → 5)"));
        assert!(lines.contains(&"- service.q (was type: string, enterprise-only)"));
        assert!(lines.contains(&"+ service.r (type: string, enterprise-only)"));
        assert!(rendered.ends_with("Summary: 1 added, 1 removed, 1 changed\n"));
    }

    #[test]
    fn paths_reached_twice_are_reported_once() {
        let old = json!({"type": "object", "properties": {}});
        let new = json!({
            "type": "object",
            "properties": {
                "list": {
                    "type": "array",
                    "properties": {"items": {"type": "string"}},
                    "items": {"type": "integer"}
                }
            }
        });

        let diff = SchemaDiff::compute(&old, &new, &SchemaDiffOptions::default());
        let paths: Vec<&str> = diff.changes().iter().map(|change| change.path.as_str()).collect();
        assert_eq!(paths, vec!["list", "list.items"]);
        assert_eq!(diff.added(), 2);
    }

    #[test]
    fn numerically_equal_defaults_are_unchanged() {
        let old = service_schema(json!({"ratio": {"type": "number", "default": 10}}));
        let new = service_schema(json!({"ratio": {"type": "number", "default": 10.0}}));
        assert!(SchemaDiff::compute(&old, &new, &SchemaDiffOptions::default()).is_empty());
    }

    #[test]
    fn reversing_schemas_swaps_added_and_removed() {
        let old = service_schema(json!({
            "a": {"type": "string"},
            "b": {"type": "integer", "default": 1}
        }));
        let new = service_schema(json!({
            "b": {"type": "integer", "default": 2},
            "c": {"type": "boolean"}
        }));

        let forward = SchemaDiff::compute(&old, &new, &SchemaDiffOptions::default());
        let backward = SchemaDiff::compute(&new, &old, &SchemaDiffOptions::default());

        assert_eq!(forward.added(), backward.removed());
        assert_eq!(forward.removed(), backward.added());
        assert_eq!(forward.changed(), backward.changed());
    }

    #[test]
    fn added_subtree_reports_its_descendants() {
        let old = json!({"type": "object", "properties": {}});
        let new = json!({
            "type": "object",
            "properties": {
                "xdr": {
                    "type": "object",
                    "properties": {"src-id": {"type": "integer"}}
                }
            }
        });

        let diff = SchemaDiff::compute(&old, &new, &SchemaDiffOptions::default());
        let paths: Vec<&str> = diff.changes().iter().map(|change| change.path.as_str()).collect();
        assert_eq!(paths, vec!["xdr", "xdr.src-id"]);
        assert!(diff.changes().iter().all(|change| change.kind == ChangeKind::Added));
    }

    #[test]
    fn array_items_are_walked() {
        let old = json!({
            "properties": {
                "namespaces": {
                    "type": "array",
                    "items": {"type": "object", "properties": {"name": {"type": "string"}}}
                }
            }
        });
        let new = json!({
            "properties": {
                "namespaces": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "replication-factor": {"type": "integer", "default": 2}
                        }
                    }
                }
            }
        });

        let diff = SchemaDiff::compute(&old, &new, &SchemaDiffOptions::default());
        assert_eq!(
            diff.render(),
            "+ namespaces.items.replication-factor\n\nSummary: 1 added, 0 removed, 0 changed\n"
        );
    }

    #[test]
    fn filter_path_limits_the_report() {
        let old = json!({
            "properties": {
                "service": {"properties": {"a": {"type": "string"}}},
                "network": {"properties": {"b": {"type": "string"}}}
            }
        });
        let new = json!({
            "properties": {
                "service": {"properties": {"a": {"type": "integer"}}},
                "network": {"properties": {"b": {"type": "integer"}}}
            }
        });

        let diff = SchemaDiff::compute(
            &old,
            &new,
            &SchemaDiffOptions {
                filter_path: Some("network".to_owned()),
                verbose: false,
            },
        );
        assert_eq!(diff.changes().len(), 1);
        assert_eq!(diff.changes()[0].path, "network.b");
    }

    #[test]
    fn identical_schemas_have_an_empty_report() {
        let schema = service_schema(json!({"cluster-name": {"type": "string"}}));
        let diff = SchemaDiff::compute(&schema, &schema, &SchemaDiffOptions::default());
        assert!(diff.is_empty());
        assert_eq!(diff.render(), "\nSummary: 0 added, 0 removed, 0 changed\n");
    }

}
