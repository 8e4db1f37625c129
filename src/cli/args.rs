//! CLI argument definitions using clap
//!
//! Commands:
//! - conform validate --schema <file> <input>
//! - conform check --schema <file>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// conform - a strict, composable schema validation engine
#[derive(Parser, Debug)]
#[command(name = "conform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a JSON document against a schema definition
    Validate {
        /// Path to the schema definition file
        #[arg(long)]
        schema: PathBuf,

        /// Path to the JSON document to validate
        input: PathBuf,

        /// Emit issues as JSON instead of a humanized line
        #[arg(long)]
        issues_json: bool,
    },

    /// Check that a schema definition file compiles
    Check {
        /// Path to the schema definition file
        #[arg(long)]
        schema: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
