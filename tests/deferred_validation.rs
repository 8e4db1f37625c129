//! Deferred Validation Tests
//!
//! - parse_deferred returns a placeholder without awaiting
//! - Resolving validates the produced value against the inner schema
//! - Source rejections propagate unchanged

use std::io;

use conform::schema::Schema;
use conform::validate::{DeferredError, IssueCode};
use serde_json::{json, Value};

/// The resolved value is validated against the inner schema.
#[tokio::test]
async fn test_resolve_validates_inner() {
    let schema = Schema::deferred(Schema::string());
    let out = schema
        .parse_deferred(async { json!("Ram") })
        .resolve()
        .await
        .unwrap();
    assert_eq!(out, json!("Ram"));
}

/// A non-conforming resolved value fails with ordinary issues.
#[tokio::test]
async fn test_resolve_reports_issues() {
    let schema = Schema::deferred(Schema::string());
    let err = schema
        .parse_deferred(async { json!(42) })
        .resolve()
        .await
        .unwrap_err();
    assert_eq!(err.issues().len(), 1);
    assert_eq!(err.issues()[0].code, IssueCode::TypeMismatch);
}

/// A rejected source propagates unchanged; it is never rewritten into
/// issues.
#[tokio::test]
async fn test_rejection_propagates() {
    let schema = Schema::deferred(Schema::string());
    let source = async {
        Err::<Value, io::Error>(io::Error::new(io::ErrorKind::ConnectionReset, "boom"))
    };
    let err = schema.parse_deferred(source).try_resolve().await.unwrap_err();
    match err {
        DeferredError::Source(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
        DeferredError::Invalid(_) => panic!("rejection was converted into issues"),
    }
}

/// A fallible source that resolves is still validated.
#[tokio::test]
async fn test_try_resolve_validates_resolved_value() {
    let schema = Schema::deferred(Schema::number().gt(0.0));
    let source = async { Ok::<Value, io::Error>(json!(0)) };
    let err = schema.parse_deferred(source).try_resolve().await.unwrap_err();
    match err {
        DeferredError::Invalid(e) => {
            assert_eq!(e.issues()[0].code, IssueCode::TooSmall);
        }
        DeferredError::Source(_) => panic!("validation failure reported as rejection"),
    }
}

/// parse_deferred on a non-deferred schema validates against the schema
/// itself.
#[tokio::test]
async fn test_plain_schema_accepts_deferred_source() {
    let schema = Schema::object([("name", Schema::string())]);
    let out = schema
        .parse_deferred(async { json!({"name": "Ram"}) })
        .resolve()
        .await
        .unwrap();
    assert_eq!(out, json!({"name": "Ram"}));
}

/// The synchronous path rejects a deferred schema.
#[test]
fn test_sync_parse_rejects_deferred_schema() {
    let schema = Schema::deferred(Schema::string());
    let err = schema.parse(&json!("Ram")).unwrap_err();
    assert_eq!(err.issues()[0].code, IssueCode::TypeMismatch);
    assert!(err.issues()[0].message.contains("parse_deferred"));
}
