//! Declarative schema definitions
//!
//! Schemas can be described in JSON and compiled into a `Schema` tree,
//! so the CLI can validate documents without recompiling. File input is
//! untrusted: malformed definitions surface as `SchemaDefError`, never
//! as panics. Closure-bearing features (generator defaults, refinements)
//! are construction-API only; constant defaults are expressible here.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaDefError, SchemaDefResult};
use super::types::{
    Constraint, DefaultProvider, DefaultSchema, DiscriminatedSchema, EnumSchema, MapSchema,
    ObjectSchema, PrimitiveKind, PrimitiveSchema, Schema, UnknownKeys,
};

/// One node of a schema definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaDef {
    String {
        #[serde(default)]
        min_len: Option<usize>,
        #[serde(default)]
        max_len: Option<usize>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        uuid: bool,
    },
    Number {
        #[serde(default)]
        gt: Option<f64>,
        #[serde(default)]
        gte: Option<f64>,
        #[serde(default)]
        lt: Option<f64>,
        #[serde(default)]
        lte: Option<f64>,
    },
    Integer {
        #[serde(default)]
        gt: Option<f64>,
        #[serde(default)]
        gte: Option<f64>,
        #[serde(default)]
        lt: Option<f64>,
        #[serde(default)]
        lte: Option<f64>,
    },
    Bool,
    Datetime,
    Unknown,
    Literal {
        value: Value,
    },
    Enum {
        values: Vec<String>,
    },
    Object {
        fields: BTreeMap<String, FieldDef>,
        #[serde(default)]
        unknown_keys: UnknownKeys,
    },
    Array {
        element: Box<SchemaDef>,
    },
    Tuple {
        items: Vec<SchemaDef>,
    },
    Union {
        alternatives: Vec<SchemaDef>,
    },
    DiscriminatedUnion {
        discriminator: String,
        branches: Vec<SchemaDef>,
    },
    Map {
        key: Box<SchemaDef>,
        value: Box<SchemaDef>,
    },
}

/// A declared object field: its schema plus presence behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(flatten)]
    pub schema: SchemaDef,
    /// Absent fields fail validation unless `required` is false or a
    /// `default` is given.
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

fn default_required() -> bool {
    true
}

impl FieldDef {
    fn compile(&self) -> SchemaDefResult<Schema> {
        let inner = self.schema.compile()?;
        match (&self.default, self.required) {
            (Some(value), _) => Ok(Schema::Default(DefaultSchema {
                inner: Box::new(inner),
                provider: DefaultProvider::Constant(value.clone()),
            })),
            (None, false) => Ok(Schema::Optional(Box::new(inner))),
            (None, true) => Ok(inner),
        }
    }
}

impl SchemaDef {
    /// Compiles the definition into an immutable schema tree.
    pub fn compile(&self) -> SchemaDefResult<Schema> {
        match self {
            SchemaDef::String {
                min_len,
                max_len,
                pattern,
                uuid,
            } => {
                let mut constraints = Vec::new();
                if let Some(n) = min_len {
                    constraints.push(Constraint::MinLen(*n));
                }
                if let Some(n) = max_len {
                    constraints.push(Constraint::MaxLen(*n));
                }
                if let Some(p) = pattern {
                    let re = Regex::new(p)
                        .map_err(|e| SchemaDefError::invalid(format!("bad pattern '{p}': {e}")))?;
                    constraints.push(Constraint::Pattern(re));
                }
                if *uuid {
                    constraints.push(Constraint::Uuid);
                }
                Ok(Schema::Primitive(PrimitiveSchema {
                    kind: PrimitiveKind::String,
                    constraints,
                }))
            }
            SchemaDef::Number { gt, gte, lt, lte } => Ok(Schema::Primitive(PrimitiveSchema {
                kind: PrimitiveKind::Number,
                constraints: numeric_constraints(*gt, *gte, *lt, *lte),
            })),
            SchemaDef::Integer { gt, gte, lt, lte } => Ok(Schema::Primitive(PrimitiveSchema {
                kind: PrimitiveKind::Integer,
                constraints: numeric_constraints(*gt, *gte, *lt, *lte),
            })),
            SchemaDef::Bool => Ok(Schema::boolean()),
            SchemaDef::Datetime => Ok(Schema::datetime()),
            SchemaDef::Unknown => Ok(Schema::unknown()),
            SchemaDef::Literal { value } => Ok(Schema::literal(value.clone())),
            SchemaDef::Enum { values } => {
                if values.is_empty() {
                    return Err(SchemaDefError::invalid("enum requires at least one value"));
                }
                Ok(Schema::Enum(EnumSchema {
                    values: values.clone(),
                }))
            }
            SchemaDef::Object {
                fields,
                unknown_keys,
            } => {
                let mut compiled = BTreeMap::new();
                for (name, field) in fields {
                    compiled.insert(name.clone(), field.compile()?);
                }
                Ok(Schema::Object(ObjectSchema {
                    fields: compiled,
                    unknown_keys: *unknown_keys,
                }))
            }
            SchemaDef::Array { element } => Ok(Schema::Array(Box::new(element.compile()?))),
            SchemaDef::Tuple { items } => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(item.compile()?);
                }
                Ok(Schema::Tuple(out))
            }
            SchemaDef::Union { alternatives } => {
                if alternatives.is_empty() {
                    return Err(SchemaDefError::invalid(
                        "union requires at least one alternative",
                    ));
                }
                let mut out = Vec::with_capacity(alternatives.len());
                for alternative in alternatives {
                    out.push(alternative.compile()?);
                }
                Ok(Schema::Union(out))
            }
            SchemaDef::DiscriminatedUnion {
                discriminator,
                branches,
            } => compile_discriminated(discriminator, branches),
            SchemaDef::Map { key, value } => Ok(Schema::Map(MapSchema {
                key: Box::new(key.compile()?),
                value: Box::new(value.compile()?),
            })),
        }
    }
}

fn numeric_constraints(
    gt: Option<f64>,
    gte: Option<f64>,
    lt: Option<f64>,
    lte: Option<f64>,
) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    if let Some(b) = gt {
        constraints.push(Constraint::Gt(b));
    }
    if let Some(b) = gte {
        constraints.push(Constraint::Gte(b));
    }
    if let Some(b) = lt {
        constraints.push(Constraint::Lt(b));
    }
    if let Some(b) = lte {
        constraints.push(Constraint::Lte(b));
    }
    constraints
}

fn compile_discriminated(
    discriminator: &str,
    branches: &[SchemaDef],
) -> SchemaDefResult<Schema> {
    if branches.is_empty() {
        return Err(SchemaDefError::invalid(
            "discriminated union requires at least one branch",
        ));
    }
    let mut out: Vec<(Value, ObjectSchema)> = Vec::new();
    for branch in branches {
        let object = match branch.compile()? {
            Schema::Object(o) => o,
            _ => {
                return Err(SchemaDefError::invalid(
                    "discriminated union branches must be objects",
                ))
            }
        };
        let tag = match object.fields.get(discriminator) {
            Some(Schema::Primitive(p)) => match &p.kind {
                PrimitiveKind::Literal(v) => v.clone(),
                _ => {
                    return Err(SchemaDefError::invalid(format!(
                        "discriminator field '{discriminator}' must be a literal"
                    )))
                }
            },
            _ => {
                return Err(SchemaDefError::invalid(format!(
                    "branch is missing literal discriminator field '{discriminator}'"
                )))
            }
        };
        if out.iter().any(|(existing, _)| *existing == tag) {
            return Err(SchemaDefError::invalid(format!(
                "duplicate discriminator value {tag}"
            )));
        }
        out.push((tag, object));
    }
    Ok(Schema::Discriminated(DiscriminatedSchema {
        discriminator: discriminator.to_string(),
        branches: out,
    }))
}

/// Parses a schema definition from JSON text and compiles it.
pub fn parse_schema_def(text: &str) -> SchemaDefResult<Schema> {
    let def: SchemaDef =
        serde_json::from_str(text).map_err(|e| SchemaDefError::malformed("<inline>", e))?;
    def.compile()
}

/// Loads and compiles a schema definition file.
pub fn load_schema_file(path: &Path) -> SchemaDefResult<Schema> {
    let text = fs::read_to_string(path)
        .map_err(|e| SchemaDefError::io(path.display().to_string(), e))?;
    let def: SchemaDef = serde_json::from_str(&text)
        .map_err(|e| SchemaDefError::malformed(path.display().to_string(), e))?;
    def.compile()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const USER_DEF: &str = r#"{
        "type": "object",
        "fields": {
            "username": { "type": "string", "min_len": 5, "max_len": 100 },
            "age": { "type": "number", "gt": 0 },
            "hobby": { "type": "enum", "values": ["chess", "carrom", "cricket"] },
            "is_programmer": { "type": "bool", "default": true },
            "nickname": { "type": "string", "required": false }
        }
    }"#;

    #[test]
    fn test_compile_and_validate() {
        let schema = parse_schema_def(USER_DEF).unwrap();
        let doc = json!({
            "username": "Hello",
            "age": 1,
            "hobby": "chess"
        });
        let out = schema.parse(&doc).unwrap();
        assert_eq!(out["is_programmer"], json!(true));
        assert!(out.get("nickname").is_none());
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let result = parse_schema_def("{ not json");
        assert!(matches!(result, Err(SchemaDefError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_tag_is_reported() {
        let result = parse_schema_def(r#"{ "type": "flux" }"#);
        assert!(matches!(result, Err(SchemaDefError::Malformed { .. })));
    }

    #[test]
    fn test_bad_pattern_is_an_error_not_a_panic() {
        let result = parse_schema_def(r#"{ "type": "string", "pattern": "(unclosed" }"#);
        assert!(matches!(result, Err(SchemaDefError::Invalid(_))));
    }

    #[test]
    fn test_empty_enum_rejected() {
        let result = parse_schema_def(r#"{ "type": "enum", "values": [] }"#);
        assert!(matches!(result, Err(SchemaDefError::Invalid(_))));
    }

    #[test]
    fn test_discriminated_union_def() {
        let def = r#"{
            "type": "discriminated_union",
            "discriminator": "status",
            "branches": [
                { "type": "object", "fields": {
                    "status": { "type": "literal", "value": "success" },
                    "data": { "type": "string" }
                }},
                { "type": "object", "fields": {
                    "status": { "type": "literal", "value": "failed" },
                    "error": { "type": "string" }
                }}
            ]
        }"#;
        let schema = parse_schema_def(def).unwrap();
        assert!(schema.parse(&json!({"status": "success", "data": "x"})).is_ok());
        assert!(schema.parse(&json!({"status": "other"})).is_err());
    }

    #[test]
    fn test_discriminated_union_def_missing_literal() {
        let def = r#"{
            "type": "discriminated_union",
            "discriminator": "status",
            "branches": [
                { "type": "object", "fields": { "data": { "type": "string" } } }
            ]
        }"#;
        let result = parse_schema_def(def);
        assert!(matches!(result, Err(SchemaDefError::Invalid(_))));
    }
}
