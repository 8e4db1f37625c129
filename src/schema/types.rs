//! Schema node definitions
//!
//! A schema is an immutable tree of nodes. Composition (`extend`,
//! `partial`, decorators) always produces a new tree; validation never
//! mutates a node. Trees are safely shared across threads and across
//! concurrent validation calls.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field mapping for object schemas.
///
/// A BTreeMap keeps field iteration deterministic, so issue order is
/// stable across runs.
pub type FieldMap = BTreeMap<String, Schema>;

/// A validation rule for one node of the input.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Scalar with an ordered constraint list
    Primitive(PrimitiveSchema),
    /// Keyed structure with declared fields
    Object(ObjectSchema),
    /// Homogeneous sequence
    Array(Box<Schema>),
    /// Fixed-arity sequence with positional schemas
    Tuple(Vec<Schema>),
    /// Ordered alternatives; the first full success wins
    Union(Vec<Schema>),
    /// Branch selection by discriminator literal
    Discriminated(DiscriminatedSchema),
    /// Closed set of string literals
    Enum(EnumSchema),
    /// Key/value container over a JSON object
    Map(MapSchema),
    /// Asynchronously produced value
    Deferred(Box<Schema>),
    /// Accepts absence without invoking the inner schema
    Optional(Box<Schema>),
    /// Substitutes a produced value when input is absent
    Default(DefaultSchema),
    /// Narrows validity with a caller-supplied predicate
    Refined(RefinedSchema),
}

impl Schema {
    /// Name of the shape this node expects, for error messages.
    pub fn expected_name(&self) -> &'static str {
        match self {
            Schema::Primitive(p) => p.kind.type_name(),
            Schema::Object(_) => "object",
            Schema::Array(_) => "array",
            Schema::Tuple(_) => "tuple",
            Schema::Union(_) => "union",
            Schema::Discriminated(_) => "object",
            Schema::Enum(_) => "enum",
            Schema::Map(_) => "map",
            Schema::Deferred(_) => "deferred",
            Schema::Optional(inner) => inner.expected_name(),
            Schema::Default(d) => d.inner.expected_name(),
            Schema::Refined(r) => r.inner.expected_name(),
        }
    }
}

/// Scalar kinds
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveKind {
    /// UTF-8 string
    String,
    /// Any JSON number, compared as f64
    Number,
    /// 64-bit integer (floats are not coerced)
    Integer,
    /// Boolean
    Bool,
    /// RFC 3339 timestamp carried as a string
    DateTime,
    /// Exact-equality literal
    Literal(Value),
    /// Accepts any value, including absence
    Unknown,
}

impl PrimitiveKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::DateTime => "datetime",
            PrimitiveKind::Literal(_) => "literal",
            PrimitiveKind::Unknown => "unknown",
        }
    }
}

/// Scalar schema: a kind plus constraints checked in declaration order.
#[derive(Debug, Clone)]
pub struct PrimitiveSchema {
    pub kind: PrimitiveKind,
    pub constraints: Vec<Constraint>,
}

/// One declared constraint on a primitive value.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Minimum string length in characters
    MinLen(usize),
    /// Maximum string length in characters
    MaxLen(usize),
    /// Strictly greater than the bound
    Gt(f64),
    /// Greater than or equal to the bound
    Gte(f64),
    /// Strictly less than the bound
    Lt(f64),
    /// Less than or equal to the bound
    Lte(f64),
    /// String must match the compiled pattern
    Pattern(Regex),
    /// String must parse as a UUID
    Uuid,
}

impl Constraint {
    /// Whether this constraint can be attached to the given kind.
    /// Builders enforce this at construction time.
    pub fn applies_to(&self, kind: &PrimitiveKind) -> bool {
        match self {
            Constraint::MinLen(_) | Constraint::MaxLen(_) | Constraint::Pattern(_) | Constraint::Uuid => {
                matches!(kind, PrimitiveKind::String)
            }
            Constraint::Gt(_) | Constraint::Gte(_) | Constraint::Lt(_) | Constraint::Lte(_) => {
                matches!(kind, PrimitiveKind::Number | PrimitiveKind::Integer)
            }
        }
    }
}

/// Handling of input keys not declared by an object schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKeys {
    /// Ignore and drop from the output (permissive default)
    #[default]
    Strip,
    /// One UnrecognizedKey issue per extra key
    Strict,
    /// Copy extra keys into the output unchanged
    Passthrough,
}

/// Keyed-structure schema.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub fields: FieldMap,
    pub unknown_keys: UnknownKeys,
}

/// Discriminated union: branches indexed by the discriminator's literal
/// value. Exactly one branch is validated per input.
#[derive(Debug, Clone)]
pub struct DiscriminatedSchema {
    pub discriminator: String,
    pub branches: Vec<(Value, ObjectSchema)>,
}

/// Closed set of allowed string literals, in declaration order.
#[derive(Debug, Clone)]
pub struct EnumSchema {
    pub values: Vec<String>,
}

/// Key/value container schema over a JSON object.
#[derive(Debug, Clone)]
pub struct MapSchema {
    pub key: Box<Schema>,
    pub value: Box<Schema>,
}

/// Default decorator: inner schema plus the substitute producer.
#[derive(Debug, Clone)]
pub struct DefaultSchema {
    pub inner: Box<Schema>,
    pub provider: DefaultProvider,
}

/// Producer of substitute values for absent input.
#[derive(Clone)]
pub enum DefaultProvider {
    /// Fixed value, cloned per call
    Constant(Value),
    /// Zero-argument generator, invoked fresh per call, never memoized
    Generator(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultProvider {
    /// Produces the substitute value.
    pub fn produce(&self) -> Value {
        match self {
            DefaultProvider::Constant(v) => v.clone(),
            DefaultProvider::Generator(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultProvider::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            DefaultProvider::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// Refinement decorator: predicate applied after the inner schema
/// succeeds. Predicate panics are not caught.
#[derive(Clone)]
pub struct RefinedSchema {
    pub inner: Box<Schema>,
    pub predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    pub message: String,
}

impl fmt::Debug for RefinedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefinedSchema")
            .field("inner", &self.inner)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
