//! Validation failure types
//!
//! Failures are data: `ValidationError` carries the full ordered issue
//! list. `parse` surfaces it as an `Err`; `safe_parse` returns a tagged
//! outcome and never an `Err` at the call site.

use serde_json::Value;
use thiserror::Error;

use super::issue::Issue;

/// Result type for validation operations
pub type ValidateResult<T> = Result<T, ValidationError>;

/// Aggregated validation failure carrying every issue found, in input
/// order.
#[derive(Debug, Clone, Error)]
#[error("validation failed with {count} issue(s)", count = .issues.len())]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        debug_assert!(!issues.is_empty(), "a validation error carries issues");
        Self { issues }
    }

    /// The issues, in the order they were found.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

/// Tagged outcome of `safe_parse`.
#[derive(Debug, Clone)]
pub enum SafeParse {
    Success { value: Value },
    Failure { error: ValidationError },
}

impl SafeParse {
    /// Whether validation succeeded.
    pub fn success(&self) -> bool {
        matches!(self, SafeParse::Success { .. })
    }

    /// The validated value, if validation succeeded.
    pub fn value(self) -> Option<Value> {
        match self {
            SafeParse::Success { value } => Some(value),
            SafeParse::Failure { .. } => None,
        }
    }

    /// The failure, if validation failed.
    pub fn error(self) -> Option<ValidationError> {
        match self {
            SafeParse::Success { .. } => None,
            SafeParse::Failure { error } => Some(error),
        }
    }

    /// Converts back into a plain result.
    pub fn into_result(self) -> ValidateResult<Value> {
        match self {
            SafeParse::Success { value } => Ok(value),
            SafeParse::Failure { error } => Err(error),
        }
    }
}

impl From<ValidateResult<Value>> for SafeParse {
    fn from(result: ValidateResult<Value>) -> Self {
        match result {
            Ok(value) => SafeParse::Success { value },
            Err(error) => SafeParse::Failure { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::issue::{IssueCode, PathSegment};

    fn sample_error() -> ValidationError {
        ValidationError::new(vec![Issue::new(
            vec![PathSegment::Field("age".into())],
            IssueCode::TooSmall,
            "must be greater than 0, got 0",
        )])
    }

    #[test]
    fn test_display_counts_issues() {
        assert_eq!(
            format!("{}", sample_error()),
            "validation failed with 1 issue(s)"
        );
    }

    #[test]
    fn test_safe_parse_round_trip() {
        let failure = SafeParse::from(Err(sample_error()));
        assert!(!failure.success());
        assert_eq!(failure.into_result().unwrap_err().issues().len(), 1);

        let success = SafeParse::from(Ok(serde_json::json!(1)));
        assert!(success.success());
        assert_eq!(success.value(), Some(serde_json::json!(1)));
    }
}
