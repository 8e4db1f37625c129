//! Structured JSON logger
//!
//! - Structured logs (JSON)
//! - Deterministic key ordering
//! - Explicit severity levels
//! - One log line = one event
//! - Synchronous, no buffering

use std::fmt;
use std::io::{self, Write};

use serde_json::{Map, Value};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs one JSON line per event.
///
/// Keys are emitted in deterministic (sorted) order, so log output is
/// byte-stable for identical events.
pub struct Logger;

impl Logger {
    /// Log an event to stdout.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let _ = Self::write_line(&mut io::stdout(), severity, event, fields);
    }

    /// Log an event to stderr (keeps stdout free for command output).
    pub fn log_stderr(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let _ = Self::write_line(&mut io::stderr(), severity, event, fields);
    }

    /// Convenience: info-level event to stdout.
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Convenience: error-level event to stderr.
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log_stderr(Severity::Error, event, fields);
    }

    /// Internal log implementation that writes to a given writer.
    fn write_line<W: Write>(
        w: &mut W,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
    ) -> io::Result<()> {
        // serde_json's Map is ordered by key, which gives both the field
        // map and the envelope a deterministic layout
        let mut field_map = Map::new();
        for (key, value) in fields {
            field_map.insert((*key).to_string(), Value::String((*value).to_string()));
        }
        let mut envelope = Map::new();
        envelope.insert("event".to_string(), Value::String(event.to_string()));
        envelope.insert("fields".to_string(), Value::Object(field_map));
        envelope.insert(
            "severity".to_string(),
            Value::String(severity.as_str().to_string()),
        );
        writeln!(w, "{}", Value::Object(envelope))
    }
}
