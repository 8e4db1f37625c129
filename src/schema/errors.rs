//! Schema definition errors
//!
//! Loader failures are data errors (bad files, bad JSON) and surface as
//! results. Misuse of the construction API is a programming error and
//! panics in the builders instead of aggregating here.

use thiserror::Error;

/// Result type for schema definition operations
pub type SchemaDefResult<T> = Result<T, SchemaDefError>;

/// Errors raised while reading or compiling a schema definition.
#[derive(Debug, Clone, Error)]
pub enum SchemaDefError {
    #[error("failed to read schema file '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("invalid schema JSON in '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("invalid schema definition: {0}")]
    Invalid(String),
}

impl SchemaDefError {
    pub fn io(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_path() {
        let err = SchemaDefError::malformed("schemas/user.json", "expected value");
        let display = format!("{}", err);
        assert!(display.contains("schemas/user.json"));
        assert!(display.contains("expected value"));
    }
}
