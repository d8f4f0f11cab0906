//! Integration tests that verify JSON output matches the generated JSON schemas.
//!
//! Each command that supports --json output is validated against the schema
//! the `schema` subcommand prints for it.

use jsonschema::Validator;
use serde_json::Value;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn schema_canvas_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_schema-canvas"))
}

fn load_schema(name: &str) -> Validator {
    let output = schema_canvas_bin()
        .args(["schema", "--command", name])
        .output()
        .expect("Failed to run schema command");
    assert!(output.status.success(), "no schema named {}", name);

    let schema: Value = serde_json::from_slice(&output.stdout).expect("Invalid schema JSON");
    Validator::new(&schema).expect("Failed to compile schema")
}

fn assert_valid(json: &Value, schema_name: &str) {
    let schema = load_schema(schema_name);
    if let Err(error) = schema.validate(json) {
        panic!(
            "JSON doesn't match {} schema:\n  - {}: {}\n\nJSON was:\n{}",
            schema_name,
            error.instance_path(),
            error,
            serde_json::to_string_pretty(json).unwrap()
        );
    }
}

fn validate_json_output(output: &Output, schema_name: &str) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {}\nOutput: {}", e, stdout));
    assert_valid(&json, schema_name);
}

fn write_ddl(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("blog.sql");
    fs::write(
        &path,
        r#"
CREATE TABLE authors (id INT PRIMARY KEY, email VARCHAR(100) UNIQUE);
CREATE TABLE posts (
  id INT PRIMARY KEY,
  author_id INT NOT NULL REFERENCES authors(id),
  title TEXT DEFAULT 'untitled'
);
"#,
    )
    .unwrap();
    path
}

// =============================================================================
// Render Command
// =============================================================================

#[test]
fn test_render_json_matches_schema() {
    let dir = TempDir::new().unwrap();
    let path = write_ddl(&dir);

    let output = schema_canvas_bin()
        .args(["render", path.to_str().unwrap(), "--select", "posts.author_id"])
        .output()
        .unwrap();
    assert!(output.status.success());

    validate_json_output(&output, "render");
}

#[test]
fn test_render_demo_matches_schema() {
    let output = schema_canvas_bin()
        .args(["render", "--demo", "-f", "json", "--dialect", "mysql"])
        .output()
        .unwrap();
    assert!(output.status.success());

    validate_json_output(&output, "render");
}

// =============================================================================
// Search Command
// =============================================================================

#[test]
fn test_search_json_matches_schema() {
    let dir = TempDir::new().unwrap();
    let path = write_ddl(&dir);

    let output = schema_canvas_bin()
        .args(["search", path.to_str().unwrap(), "author", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    validate_json_output(&output, "search");
}

// =============================================================================
// Connection Commands
// =============================================================================

#[test]
fn test_parse_url_json_matches_schema() {
    let output = schema_canvas_bin()
        .args(["parse-url", "mysql://root:pw@[::1]:3307/shop", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    validate_json_output(&output, "parse-url");
}

#[test]
fn test_connection_json_matches_schema() {
    // Missing database fails validation before any network access
    let output = schema_canvas_bin()
        .args(["test-connection", "postgresql://u:p@localhost", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    validate_json_output(&output, "test-connection");
}

// =============================================================================
// Input Documents
// =============================================================================

#[test]
fn test_input_schema_accepts_documents() {
    let document = serde_json::json!({
        "name": "blog",
        "dialect": "postgresql",
        "tables": [
            {"name": "posts", "columns": [
                {"name": "id", "type": "int", "pk": true},
                {"name": "author_id", "type": "int", "fk": true, "default": "1"}
            ]}
        ],
        "relations": [
            {"fromTable": "posts", "fromColumn": "author_id",
             "toTable": "authors", "toColumn": "id", "type": "many-to-one"}
        ]
    });
    assert_valid(&document, "input");
}

#[test]
fn test_input_schema_rejects_unknown_relation_type() {
    let document = serde_json::json!({
        "tables": [],
        "relations": [
            {"fromTable": "a", "fromColumn": "b", "toTable": "c", "toColumn": "d",
             "type": "sideways"}
        ]
    });
    let schema = load_schema("input");
    assert!(schema.validate(&document).is_err());
}

#[test]
fn test_unknown_schema_name() {
    let output = schema_canvas_bin()
        .args(["schema", "--command", "nope"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown schema 'nope'"));
}

#[test]
fn test_output_dir_writes_every_schema() {
    let dir = TempDir::new().unwrap();
    let output = schema_canvas_bin()
        .args(["schema", "-o", dir.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    for name in ["input", "parse-url", "render", "search", "test-connection"] {
        let path = dir.path().join(format!("{}.schema.json", name));
        let content = fs::read_to_string(&path).unwrap();
        let schema: Value = serde_json::from_str(&content).unwrap();
        assert!(Validator::new(&schema).is_ok(), "{} does not compile", name);
    }
}
