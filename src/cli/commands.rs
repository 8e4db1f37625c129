//! CLI command implementations
//!
//! Thin wrappers over the library: load a schema definition, validate a
//! document, report the outcome. Log events go to stderr so stdout
//! stays the command-output channel.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::observability::{Logger, Severity};
use crate::schema::{load_schema_file, Schema};
use crate::validate::{humanize, SafeParse};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parses arguments and dispatches to a command.
pub fn run() -> CliResult<()> {
    match Cli::parse_args().command {
        Command::Validate {
            schema,
            input,
            issues_json,
        } => validate(&schema, &input, issues_json),
        Command::Check { schema } => check(&schema),
    }
}

/// Validates a JSON document against a schema definition file.
///
/// On success the validated (defaulted) document is printed to stdout.
/// On failure the issues are printed to stderr and the returned error
/// carries the issue count.
pub fn validate(schema_path: &Path, input_path: &Path, issues_json: bool) -> CliResult<()> {
    let schema = load(schema_path)?;
    let document = read_document(input_path)?;

    match schema.safe_parse(&document) {
        SafeParse::Success { value } => {
            Logger::log_stderr(
                Severity::Info,
                "VALIDATE_OK",
                &[("input", &input_path.display().to_string())],
            );
            println!("{value:#}");
            Ok(())
        }
        SafeParse::Failure { error } => {
            let count = error.issues().len();
            Logger::log_stderr(
                Severity::Error,
                "VALIDATE_FAILED",
                &[
                    ("input", &input_path.display().to_string()),
                    ("issues", &count.to_string()),
                ],
            );
            if issues_json {
                if let Ok(rendered) = serde_json::to_string_pretty(error.issues()) {
                    eprintln!("{rendered}");
                }
            } else {
                eprintln!("{}", humanize(&error));
            }
            Err(CliError::ValidationFailed(count))
        }
    }
}

/// Compiles a schema definition file and reports well-formedness.
pub fn check(schema_path: &Path) -> CliResult<()> {
    load(schema_path)?;
    println!("ok");
    Ok(())
}

fn load(schema_path: &Path) -> CliResult<Schema> {
    let schema = load_schema_file(schema_path)?;
    Logger::log_stderr(
        Severity::Info,
        "SCHEMA_LOADED",
        &[("schema", &schema_path.display().to_string())],
    );
    Ok(schema)
}

fn read_document(input_path: &Path) -> CliResult<Value> {
    let text = fs::read_to_string(input_path)
        .map_err(|e| CliError::io(input_path.display().to_string(), e))?;
    serde_json::from_str(&text).map_err(|e| CliError::BadInput(e.to_string()))
}
