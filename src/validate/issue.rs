//! Validation issues
//!
//! One issue per violation: where (path), what (code), why (message).
//! Issues are plain data; invalid input never panics.

use std::fmt;

use serde::Serialize;

/// One step into the input value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PathSegment {
    /// Object field name
    Field(String),
    /// Sequence position
    Index(usize),
    /// Map key, in its string form
    Key(String),
}

/// Renders a path as `friends[0]`, `response.status`, `entries["id-1"]`.
/// The empty path renders as `$root`.
pub fn path_string(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        match segment {
            PathSegment::Field(name) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(n) => out.push_str(&format!("[{}]", n)),
            PathSegment::Key(k) => out.push_str(&format!("[\"{}\"]", k)),
        }
    }
    if out.is_empty() {
        out.push_str("$root");
    }
    out
}

/// Violation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// Value's type or format does not match the declared kind
    TypeMismatch,
    /// Below a declared lower bound
    TooSmall,
    /// Above a declared upper bound
    TooLarge,
    /// Not one of the allowed literal values
    InvalidLiteral,
    /// Sequence length differs from declared tuple arity
    ArityMismatch,
    /// Input key not declared by a strict object schema
    UnrecognizedKey,
    /// A caller-supplied refinement predicate returned false
    CustomRefinementFailed,
}

impl IssueCode {
    /// Returns the string code
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::TypeMismatch => "TYPE_MISMATCH",
            IssueCode::TooSmall => "TOO_SMALL",
            IssueCode::TooLarge => "TOO_LARGE",
            IssueCode::InvalidLiteral => "INVALID_LITERAL",
            IssueCode::ArityMismatch => "ARITY_MISMATCH",
            IssueCode::UnrecognizedKey => "UNRECOGNIZED_KEY",
            IssueCode::CustomRefinementFailed => "CUSTOM_REFINEMENT_FAILED",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One structured validation violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Location within the input
    pub path: Vec<PathSegment>,
    /// Violation kind
    pub code: IssueCode,
    /// Human-readable reason
    pub message: String,
}

impl Issue {
    pub fn new(path: Vec<PathSegment>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path,
            code,
            message: message.into(),
        }
    }

    pub fn type_mismatch(path: Vec<PathSegment>, expected: &str, actual: &str) -> Self {
        Self::new(
            path,
            IssueCode::TypeMismatch,
            format!("expected {expected}, got {actual}"),
        )
    }

    /// A required value was absent.
    pub fn missing(path: Vec<PathSegment>, expected: &str) -> Self {
        Self::new(
            path,
            IssueCode::TypeMismatch,
            format!("required {expected} is missing"),
        )
    }

    pub fn too_small(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self::new(path, IssueCode::TooSmall, message)
    }

    pub fn too_large(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self::new(path, IssueCode::TooLarge, message)
    }

    pub fn invalid_literal(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self::new(path, IssueCode::InvalidLiteral, message)
    }

    pub fn arity_mismatch(path: Vec<PathSegment>, expected: usize, actual: usize) -> Self {
        Self::new(
            path,
            IssueCode::ArityMismatch,
            format!("expected {expected} elements, got {actual}"),
        )
    }

    pub fn unrecognized_key(path: Vec<PathSegment>) -> Self {
        Self::new(path, IssueCode::UnrecognizedKey, "unrecognized key")
    }

    pub fn refinement_failed(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self::new(path, IssueCode::CustomRefinementFailed, message)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", path_string(&self.path), self.message)
    }
}
