use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::io::Write;

const SCHEMA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/redis.yaml");
const BROKEN: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/broken.json");

fn trellis() -> Command {
    Command::new(env!("CARGO_BIN_EXE_trellis"))
}

fn input_file(value: &Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "{value}").unwrap();
    file
}

#[test]
fn describe_prints_descriptor() {
    let output = trellis().arg("describe").arg(SCHEMA).output().unwrap();
    assert!(output.status.success());
    let descriptor: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(descriptor["type"], json!("object"));
    assert_eq!(descriptor["description"], json!("Redis connection"));
    assert_eq!(descriptor["properties"]["option"]["type"], json!("select"));
    assert_eq!(descriptor["properties"]["option"]["value"], json!("uri"));
    assert_eq!(
        descriptor["properties"]["config"]["properties"]["password"]["type"],
        json!("password")
    );
    assert_eq!(
        descriptor["properties"]["config"]["depends_on"][0]["field"],
        json!("option")
    );
}

#[test]
fn check_valid_input_prints_cleaned_output() {
    let input = input_file(&json!({"option": "config", "config": {"host": "cache"}, "extra": 1}));
    let output = trellis()
        .arg("check")
        .arg(SCHEMA)
        .arg(input.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        json!({"option": "config", "config": {"host": "cache", "port": 6379}})
    );
}

#[test]
fn check_reads_stdin() {
    trellis()
        .arg("check")
        .arg(SCHEMA)
        .write_stdin(r#"{"option": "uri", "uri": "redis://cache:6380/1"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("redis://cache:6380/1"));
}

#[test]
fn check_invalid_input_exits_with_one() {
    trellis()
        .arg("check")
        .arg(SCHEMA)
        .write_stdin(r#"{"option": "config", "config": {"host": "", "port": 0}}"#)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("config.host: String is required"))
        .stdout(predicate::str::contains("config.port: Number is too small"));
}

#[test]
fn check_tree_format() {
    let output = trellis()
        .args(["check", SCHEMA, "-", "--format", "tree"])
        .write_stdin(r#"{"option": "uri", "uri": "http://nope"}"#)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let tree: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["uri"]["_errors"], json!(["Not a redis URI"]));
}

#[test]
fn check_json_format() {
    let output = trellis()
        .args(["check", SCHEMA, "--format", "json"])
        .write_stdin(r#"{"option": "sentinel"}"#)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let errors: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(errors[0]["code"], json!("invalid_enum_value"));
    assert_eq!(errors[0]["path"], json!(["option"]));
}

#[test]
fn schema_that_does_not_build_exits_with_two() {
    trellis()
        .args(["check", BROKEN])
        .write_stdin("\"x\"")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("has no values"));
}

#[test]
fn missing_schema_file_exits_with_two() {
    trellis()
        .args(["describe", "does-not-exist.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}
