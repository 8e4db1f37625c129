//! CLI error types
//!
//! All CLI errors terminate the process with a non-zero exit status.
//! Validation issues are printed on their own channel before the
//! summary error is returned.

use thiserror::Error;

use crate::schema::SchemaDefError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("input is not valid JSON: {0}")]
    BadInput(String),

    #[error(transparent)]
    BadSchema(#[from] SchemaDefError),

    #[error("validation failed with {0} issue(s)")]
    ValidationFailed(usize),
}

impl CliError {
    pub fn io(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_errors_pass_through() {
        let err = CliError::from(SchemaDefError::invalid("enum requires at least one value"));
        assert!(format!("{}", err).contains("enum requires at least one value"));
    }
}
