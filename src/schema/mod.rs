//! Schema subsystem
//!
//! Declarative descriptions of expected value shapes.
//!
//! # Design Principles
//!
//! - Schema trees are immutable once constructed; composition produces
//!   new trees
//! - Construction misuse panics immediately (programming error);
//!   definition files never panic (data error)
//! - Trees are constructed once and reused across many independent
//!   validation calls

mod build;
mod errors;
mod loader;
mod types;

pub use errors::{SchemaDefError, SchemaDefResult};
pub use loader::{load_schema_file, parse_schema_def, FieldDef, SchemaDef};
pub use types::{
    Constraint, DefaultProvider, DefaultSchema, DiscriminatedSchema, EnumSchema, FieldMap,
    MapSchema, ObjectSchema, PrimitiveKind, PrimitiveSchema, RefinedSchema, Schema, UnknownKeys,
};
