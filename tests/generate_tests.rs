//! Snapshot-to-configuration generation tests

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use asconfig::error::AsconfigError;
    use asconfig::format::{block, metadata};
    use asconfig::generate::{Generator, parse_snapshot};
    use asconfig::model::{Scalar, Section, Value};
    use asconfig::schema::TypeHints;
    use serde_json::json;

    const SCHEMA_7_0_0: &str = include_str!("fixtures/schemas/7.0.0.json");

    fn hints() -> TypeHints {
        TypeHints::new(serde_json::from_str(SCHEMA_7_0_0).unwrap())
    }

    fn namespaces(root: &Section) -> &[Section] {
        root.get("namespaces").and_then(Value::as_sections).unwrap()
    }

    #[test]
    fn dotted_keys_expand_into_sections() {
        let generated = Generator::new()
            .generate(&json!({
                "network": {
                    "heartbeat.mode": "mesh",
                    "heartbeat.interval": "150",
                    "service.port": 3000
                }
            }))
            .unwrap();

        let root = &generated.document;
        assert_eq!(
            root.get_path(&["network", "heartbeat", "mode"]),
            Some(&Value::from("mesh"))
        );
        assert_eq!(
            root.get_path(&["network", "heartbeat", "interval"]),
            Some(&Value::from(150_i64))
        );
        assert_eq!(
            root.get_path(&["network", "service", "port"]),
            Some(&Value::from(3000_i64))
        );
    }

    #[test]
    fn indexed_keys_become_ordered_lists() {
        let generated = Generator::new()
            .generate(&json!({
                "namespaces": {
                    "test": {
                        "storage-engine": "device",
                        "storage-engine.file[10]": "/opt/k.dat",
                        "storage-engine.file[2]": "/opt/c.dat",
                        "storage-engine.file[0]": "/opt/a.dat"
                    }
                }
            }))
            .unwrap();

        let namespace = &namespaces(&generated.document)[0];
        let Some(Value::Section(engine)) = namespace.get("storage-engine") else {
            panic!("expected a storage engine section");
        };
        assert_eq!(engine.keys().next().map(String::as_str), Some("type"));
        assert_eq!(engine.get("type"), Some(&Value::from("device")));
        assert_eq!(
            engine.get("files"),
            Some(&Value::Scalars(vec![
                Scalar::from("/opt/a.dat"),
                Scalar::from("/opt/c.dat"),
                Scalar::from("/opt/k.dat"),
            ]))
        );
    }

    #[test]
    fn identified_collections_carry_their_names() {
        let generated = Generator::new()
            .generate(&json!({
                "namespaces": {
                    "zeta": {"replication-factor": "1"},
                    "alpha": {"replication-factor": "2", "sets": {"users": {"enable-index": "true"}}}
                },
                "logging": {
                    "console": {"any": "info"}
                }
            }))
            .unwrap();

        let root = &generated.document;
        let names: Vec<_> = namespaces(root)
            .iter()
            .map(|namespace| namespace.get("name").cloned())
            .collect();
        assert_eq!(names, vec![Some(Value::from("alpha")), Some(Value::from("zeta"))]);

        let sets = namespaces(root)[0].get("sets").and_then(Value::as_sections).unwrap();
        assert_eq!(sets[0].keys().next().map(String::as_str), Some("name"));
        assert_eq!(sets[0].get("name"), Some(&Value::from("users")));

        let sinks = root.get("logging").and_then(Value::as_sections).unwrap();
        assert_eq!(sinks[0].get("name"), Some(&Value::from("console")));
    }

    #[test]
    fn build_becomes_server_version_metadata() {
        let generated = Generator::new()
            .generate(&json!({
                "build": "7.0.0.3",
                "service": {"cluster-name": "prod"}
            }))
            .unwrap();

        assert_eq!(
            generated.metadata.get(metadata::SERVER_VERSION).map(String::as_str),
            Some("7.0.0.3")
        );
        assert!(!generated.document.contains_key("build"));
    }

    #[test]
    fn hints_keep_strings_and_type_booleans() {
        let hints = hints();
        let generated = Generator::new()
            .with_hints(&hints)
            .generate(&json!({
                "service": {
                    "cluster-name": "007",
                    "enable-health-check": "true",
                    "proto-fd-max": "15000"
                },
                "namespaces": {
                    "test": {"memory-size": "4G", "storage-engine": "memory"}
                }
            }))
            .unwrap();

        let root = &generated.document;
        assert_eq!(root.get_path(&["service", "cluster-name"]), Some(&Value::from("007")));
        assert_eq!(root.get_path(&["service", "enable-health-check"]), Some(&Value::from(true)));
        assert_eq!(root.get_path(&["service", "proto-fd-max"]), Some(&Value::from(15000_i64)));
        assert_eq!(namespaces(root)[0].get("memory-size"), Some(&Value::from(4_i64 << 30)));
        assert_eq!(
            namespaces(root)[0].get("storage-engine"),
            Some(&Value::Section(Section::new().with("type", "memory")))
        );
    }

    #[test]
    fn generated_document_renders_as_block_text() {
        let generated = Generator::new()
            .generate(&json!({
                "service": {"cluster-name": "prod"},
                "namespaces": {
                    "test": {"replication-factor": 2, "storage-engine": "memory"}
                }
            }))
            .unwrap();

        assert_eq!(
            block::write(&generated.document),
            "namespace test {\n  replication-factor 2\n  storage-engine memory\n}\n\nservice {\n  cluster-name prod\n}\n"
        );
    }

    #[test]
    fn large_unsigned_snapshot_values_stay_exact() {
        let generated = Generator::new()
            .generate(&json!({
                "service": {"big": 18_446_744_073_709_551_615_u64, "token": "18446744073709551615"}
            }))
            .unwrap();

        let root = &generated.document;
        assert_eq!(
            root.get_path(&["service", "big"]),
            Some(&Value::Scalar(Scalar::UInt(u64::MAX)))
        );
        assert_eq!(
            root.get_path(&["service", "token"]),
            Some(&Value::Scalar(Scalar::UInt(u64::MAX)))
        );
        assert_eq!(
            block::write(root),
            "service {\n  big 18446744073709551615\n  token 18446744073709551615\n}\n"
        );
    }

    #[test]
    fn null_values_are_rejected() {
        let err = Generator::new()
            .generate(&json!({"service": {"cluster-name": null}}))
            .unwrap_err();
        assert!(matches!(err, AsconfigError::Parse { .. }));
        assert!(err.to_string().contains("service.cluster-name"));
    }

    #[test]
    fn value_and_section_conflicts_are_rejected() {
        let err = Generator::new()
            .generate(&json!({"service": {"a": "1", "a.b": "2"}}))
            .unwrap_err();
        assert!(err.to_string().contains("service.a"));
    }

    #[test]
    fn snapshot_root_must_be_an_object() {
        assert!(matches!(parse_snapshot("[1, 2]"), Err(AsconfigError::Parse { .. })));
        assert!(matches!(
            parse_snapshot("{ broken"),
            Err(AsconfigError::Parse { line: 1, .. })
        ));
        assert!(parse_snapshot("{\"service\": {}}").unwrap().is_object());
    }

}
