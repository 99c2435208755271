//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA_7_0_0: &str = include_str!("fixtures/schemas/7.0.0.json");
const SCHEMA_6_4_0: &str = include_str!("fixtures/schemas/6.4.0.json");

const BLOCK: &str = "\
service {
    cluster-name prod
}
namespace test {
    replication-factor 2
    storage-engine memory
}
";

/// Temp dir with a `schemas/` directory holding the fixture schemas
fn workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let schemas = temp_dir.path().join("schemas");
    fs::create_dir(&schemas).unwrap();
    fs::write(schemas.join("7.0.0.json"), SCHEMA_7_0_0).unwrap();
    fs::write(schemas.join("6.4.0.json"), SCHEMA_6_4_0).unwrap();
    temp_dir
}

fn asconfig(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin("asconfig").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("ASCONFIG_LOG_LEVEL")
        .arg("--schema-dir")
        .arg(workspace.join("schemas"));
    cmd
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("asconfig").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("asconfig"));
}

#[test]
fn test_help_flag() {
    let mut cmd = Command::cargo_bin("asconfig").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Convert, validate, generate and diff Aerospike configuration files",
        ));
}

#[test]
fn test_convert_to_stdout() {
    let temp_dir = workspace();
    let input = temp_dir.path().join("aerospike.conf");
    fs::write(&input, BLOCK).unwrap();

    asconfig(temp_dir.path())
        .arg("convert")
        .arg(&input)
        .arg("-a")
        .arg("7.0.0")
        .assert()
        .success()
        .stdout(predicate::str::contains("# aerospike-server-version: 7.0.0"))
        .stdout(predicate::str::contains("- name: test"));
}

#[test]
fn test_convert_to_file_and_back() {
    let temp_dir = workspace();
    let input = temp_dir.path().join("aerospike.conf");
    let yaml = temp_dir.path().join("out").join("aerospike.yaml");
    fs::write(&input, BLOCK).unwrap();

    asconfig(temp_dir.path())
        .arg("convert")
        .arg(&input)
        .arg("--aerospike-version")
        .arg("7.0.0")
        .arg("--output")
        .arg(&yaml)
        .assert()
        .success();
    assert!(yaml.exists());

    let block = temp_dir.path().join("roundtrip.conf");
    asconfig(temp_dir.path())
        .arg("convert")
        .arg(&yaml)
        .arg("-o")
        .arg(&block)
        .assert()
        .success();

    let written = fs::read_to_string(&block).unwrap();
    assert!(
        written.contains("namespace test {\n  replication-factor 2\n  storage-engine memory\n}\n")
    );
}

#[test]
fn test_convert_without_version_fails() {
    let temp_dir = workspace();
    let input = temp_dir.path().join("aerospike.conf");
    fs::write(&input, BLOCK).unwrap();

    asconfig(temp_dir.path())
        .arg("convert")
        .arg(&input)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("--aerospike-version"));
}

#[test]
fn test_parse_error_exit_code() {
    let temp_dir = workspace();
    let input = temp_dir.path().join("broken.conf");
    fs::write(&input, "service {\n    proto-fd-max 1\n").unwrap();

    asconfig(temp_dir.path())
        .arg("convert")
        .arg(&input)
        .arg("--force")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("never closed"));
}

#[test]
fn test_missing_file_exit_code() {
    let temp_dir = workspace();

    asconfig(temp_dir.path())
        .arg("validate")
        .arg(temp_dir.path().join("missing.yaml"))
        .assert()
        .failure()
        .code(6);
}

#[test]
fn test_validate_reports_issues() {
    let temp_dir = workspace();
    let input = temp_dir.path().join("bad.conf");
    fs::write(&input, "namespace test {\n    replication-factor 0\n}\n").unwrap();

    asconfig(temp_dir.path())
        .arg("validate")
        .arg(&input)
        .arg("-a")
        .arg("7.0.0")
        .assert()
        .failure()
        .code(4)
        .stdout(predicate::str::contains(
            "context: (root).namespaces.0.replication-factor",
        ));
}

#[test]
fn test_validate_valid_file() {
    let temp_dir = workspace();
    let input = temp_dir.path().join("aerospike.conf");
    fs::write(&input, BLOCK).unwrap();

    asconfig(temp_dir.path())
        .arg("validate")
        .arg(&input)
        .arg("-a")
        .arg("7.0.0")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_diff_files() {
    let temp_dir = workspace();
    let left = temp_dir.path().join("left.conf");
    let right = temp_dir.path().join("right.conf");
    fs::write(&left, BLOCK).unwrap();
    fs::write(&right, BLOCK.replace("prod", "staging")).unwrap();

    asconfig(temp_dir.path())
        .arg("diff")
        .arg("files")
        .arg(&left)
        .arg(&left)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    asconfig(temp_dir.path())
        .arg("diff")
        .arg("files")
        .arg(&left)
        .arg(&right)
        .assert()
        .failure()
        .code(5)
        .stdout("service.cluster-name:\n\t<: prod\n\t>: staging\n");
}

#[test]
fn test_diff_versions() {
    let temp_dir = workspace();

    asconfig(temp_dir.path())
        .arg("diff")
        .arg("versions")
        .arg("6.4.0")
        .arg("7.0.0")
        .arg("--verbose")
        .assert()
        .failure()
        .code(5)
        .stdout(predicate::str::contains(
            "+ service.enable-health-check (type: boolean, default: false)",
        ))
        .stdout(predicate::str::contains("Summary: 1 added, 1 removed, 1 changed"));

    asconfig(temp_dir.path())
        .arg("diff")
        .arg("versions")
        .arg("7.0.0")
        .arg("7.0.0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary: 0 added, 0 removed, 0 changed"));
}

#[test]
fn test_generate_from_snapshot() {
    let temp_dir = workspace();
    let snapshot = temp_dir.path().join("snapshot.json");
    fs::write(
        &snapshot,
        r#"{"build": "7.0.0", "namespaces": {"test": {"replication-factor": "2", "storage-engine": "memory"}}}"#,
    )
    .unwrap();

    asconfig(temp_dir.path())
        .arg("generate")
        .arg(&snapshot)
        .arg("-F")
        .arg("conf")
        .assert()
        .success()
        .stdout(predicate::str::contains("namespace test {"));
}

#[test]
fn test_versions_lists_schemas() {
    let temp_dir = workspace();

    asconfig(temp_dir.path())
        .arg("versions")
        .assert()
        .success()
        .stdout("6.4.0\n7.0.0\n");
}
