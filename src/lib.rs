//! conform - a strict, composable schema validation engine
//!
//! Validates JSON-shaped data against immutable schema trees: objects,
//! arrays, tuples, unions, discriminated unions, enums, maps, deferred
//! values, and optional/default/refinement decorators. Validation is
//! deterministic, collects every issue, and never mutates its input.

pub mod cli;
pub mod observability;
pub mod schema;
pub mod validate;
