//! Schema Definition File Tests
//!
//! - Definitions load from disk and compile into working schemas
//! - Malformed files are data errors, never panics

use std::fs;

use conform::schema::{load_schema_file, SchemaDefError};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const USER_SCHEMA: &str = r#"{
    "type": "object",
    "fields": {
        "username": { "type": "string", "min_len": 5, "max_len": 100 },
        "age": { "type": "number", "gt": 0 },
        "hobby": { "type": "enum", "values": ["chess", "carrom", "cricket"] },
        "friends": { "type": "array", "element": { "type": "string" } },
        "cords": { "type": "tuple", "items": [
            { "type": "number" },
            { "type": "number" },
            { "type": "number", "gt": 4 }
        ]},
        "is_programmer": { "type": "bool", "default": true },
        "birthday": { "type": "datetime", "required": false }
    }
}"#;

fn write_schema(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Loading Tests
// =============================================================================

/// A definition file round-trips into a working schema.
#[test]
fn test_load_and_validate() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(&dir, "user.schema.json", USER_SCHEMA);
    let schema = load_schema_file(&path).unwrap();

    let doc = json!({
        "username": "Hello",
        "age": 1,
        "hobby": "chess",
        "friends": ["Arun"],
        "cords": [1, 1, 6]
    });
    let out = schema.parse(&doc).unwrap();
    assert_eq!(out["is_programmer"], json!(true));

    let bad = json!({
        "username": "ab",
        "age": 1,
        "hobby": "chess",
        "friends": [],
        "cords": [1, 1, 6]
    });
    assert!(!schema.safe_parse(&bad).success());
}

/// Strict mode is expressible in a definition file.
#[test]
fn test_unknown_keys_mode_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(
        &dir,
        "strict.schema.json",
        r#"{
            "type": "object",
            "unknown_keys": "strict",
            "fields": { "name": { "type": "string" } }
        }"#,
    );
    let schema = load_schema_file(&path).unwrap();
    assert!(!schema.safe_parse(&json!({"name": "a", "junk": 1})).success());
}

/// A map definition validates keys and values.
#[test]
fn test_map_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(
        &dir,
        "map.schema.json",
        r#"{
            "type": "map",
            "key": { "type": "string", "min_len": 3 },
            "value": { "type": "object", "fields": { "name": { "type": "string" } } }
        }"#,
    );
    let schema = load_schema_file(&path).unwrap();
    assert!(schema.safe_parse(&json!({"id-1": {"name": "Ramnish"}})).success());
    assert!(!schema.safe_parse(&json!({"x": {"name": "Ramnish"}})).success());
}

// =============================================================================
// Error Tests
// =============================================================================

/// A missing file is an I/O error.
#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = load_schema_file(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(SchemaDefError::Io { .. })));
}

/// Broken JSON is a malformed-schema error carrying the path.
#[test]
fn test_broken_json_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(&dir, "broken.schema.json", "{ not json");
    match load_schema_file(&path) {
        Err(SchemaDefError::Malformed { path: p, .. }) => {
            assert!(p.contains("broken.schema.json"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

/// A structurally invalid definition is rejected at compile time, not at
/// validation time.
#[test]
fn test_invalid_definition_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(
        &dir,
        "empty-union.schema.json",
        r#"{ "type": "union", "alternatives": [] }"#,
    );
    assert!(matches!(
        load_schema_file(&path),
        Err(SchemaDefError::Invalid(_))
    ));
}
