//! Human-readable issue formatting
//!
//! Collapses an issue list into one readable message for terminals and
//! log fields. The engine itself only produces structured issues; all
//! message joining lives here.

use super::errors::ValidationError;

/// Joins every issue into one `path: message` line, semicolon-separated.
pub fn humanize(error: &ValidationError) -> String {
    let lines: Vec<String> = error.issues().iter().map(|i| i.to_string()).collect();
    format!("Validation error: {}", lines.join("; "))
}
