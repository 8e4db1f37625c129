//! Schema construction API
//!
//! Constructors build each node variant; chainable transforms return new
//! nodes, leaving the receiver's origin untouched (clone before
//! transforming to keep the original). Misuse of the API (a numeric
//! bound on a string schema, `extend` on a non-object, a discriminated
//! union branch without a literal discriminator) is a programming error
//! and panics at construction time. Invalid input data never panics.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use super::types::{
    Constraint, DefaultProvider, DefaultSchema, DiscriminatedSchema, EnumSchema, FieldMap,
    MapSchema, ObjectSchema, PrimitiveKind, PrimitiveSchema, RefinedSchema, Schema, UnknownKeys,
};

impl Schema {
    fn primitive(kind: PrimitiveKind) -> Self {
        Schema::Primitive(PrimitiveSchema {
            kind,
            constraints: Vec::new(),
        })
    }

    /// UTF-8 string.
    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// Any JSON number.
    pub fn number() -> Self {
        Self::primitive(PrimitiveKind::Number)
    }

    /// 64-bit integer. Floats are rejected, not coerced.
    pub fn integer() -> Self {
        Self::primitive(PrimitiveKind::Integer)
    }

    /// Boolean.
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    /// RFC 3339 timestamp carried as a string.
    pub fn datetime() -> Self {
        Self::primitive(PrimitiveKind::DateTime)
    }

    /// Accepts any value, including absence.
    pub fn unknown() -> Self {
        Self::primitive(PrimitiveKind::Unknown)
    }

    /// Exact-equality literal.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::primitive(PrimitiveKind::Literal(value.into()))
    }

    /// Keyed structure with declared fields. Unknown input keys are
    /// stripped unless `strict()` or `passthrough()` is applied.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        let fields = fields.into_iter().map(|(k, s)| (k.into(), s)).collect();
        Schema::Object(ObjectSchema {
            fields,
            unknown_keys: UnknownKeys::Strip,
        })
    }

    /// Homogeneous sequence.
    pub fn array(element: Schema) -> Self {
        Schema::Array(Box::new(element))
    }

    /// Fixed-arity sequence with one schema per position.
    pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Tuple(items.into_iter().collect())
    }

    /// Ordered alternatives, attempted in declaration order.
    ///
    /// # Panics
    /// Panics when given no alternatives.
    pub fn union(alternatives: impl IntoIterator<Item = Schema>) -> Self {
        let alts: Vec<Schema> = alternatives.into_iter().collect();
        assert!(!alts.is_empty(), "union requires at least one alternative");
        Schema::Union(alts)
    }

    /// Closed set of string literals, in declaration order.
    ///
    /// # Panics
    /// Panics when given no values.
    pub fn enumeration<S: AsRef<str>>(values: &[S]) -> Self {
        assert!(!values.is_empty(), "enum requires at least one value");
        Schema::Enum(EnumSchema {
            values: values.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }

    /// Key/value container over a JSON object. Keys are validated as
    /// string values against `key`.
    pub fn map(key: Schema, value: Schema) -> Self {
        Schema::Map(MapSchema {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    /// Asynchronously produced value; validate with `parse_deferred`.
    pub fn deferred(inner: Schema) -> Self {
        Schema::Deferred(Box::new(inner))
    }

    /// Union whose branch is selected by exact match on the
    /// discriminator field's literal value. Only the selected branch is
    /// validated.
    ///
    /// # Panics
    /// Panics when a branch is not an object, lacks a literal
    /// discriminator field, or duplicates another branch's value.
    pub fn discriminated_union(
        discriminator: impl Into<String>,
        branches: impl IntoIterator<Item = Schema>,
    ) -> Self {
        let discriminator = discriminator.into();
        let mut out: Vec<(Value, ObjectSchema)> = Vec::new();
        for branch in branches {
            let object = match branch {
                Schema::Object(o) => o,
                other => panic!(
                    "discriminated union branch must be an object schema, got {}",
                    other.expected_name()
                ),
            };
            let tag = match object.fields.get(&discriminator) {
                Some(Schema::Primitive(p)) => match &p.kind {
                    PrimitiveKind::Literal(v) => v.clone(),
                    _ => panic!("discriminator field '{discriminator}' must be a literal"),
                },
                Some(_) => panic!("discriminator field '{discriminator}' must be a literal"),
                None => {
                    panic!("discriminated union branch is missing discriminator field '{discriminator}'")
                }
            };
            if out.iter().any(|(existing, _)| *existing == tag) {
                panic!("duplicate discriminator value {tag} in discriminated union");
            }
            out.push((tag, object));
        }
        assert!(!out.is_empty(), "discriminated union requires at least one branch");
        Schema::Discriminated(DiscriminatedSchema {
            discriminator,
            branches: out,
        })
    }

    // ---- constraints ----

    fn push_constraint(self, constraint: Constraint) -> Self {
        match self {
            Schema::Primitive(mut p) => {
                assert!(
                    constraint.applies_to(&p.kind),
                    "constraint {:?} does not apply to {} schema",
                    constraint,
                    p.kind.type_name()
                );
                p.constraints.push(constraint);
                Schema::Primitive(p)
            }
            other => panic!(
                "constraint {:?} requires a primitive schema, got {}",
                constraint,
                other.expected_name()
            ),
        }
    }

    /// Minimum string length in characters.
    pub fn min_len(self, bound: usize) -> Self {
        self.push_constraint(Constraint::MinLen(bound))
    }

    /// Maximum string length in characters.
    pub fn max_len(self, bound: usize) -> Self {
        self.push_constraint(Constraint::MaxLen(bound))
    }

    /// Strictly greater than the bound.
    pub fn gt(self, bound: f64) -> Self {
        self.push_constraint(Constraint::Gt(bound))
    }

    /// Greater than or equal to the bound.
    pub fn gte(self, bound: f64) -> Self {
        self.push_constraint(Constraint::Gte(bound))
    }

    /// Strictly less than the bound.
    pub fn lt(self, bound: f64) -> Self {
        self.push_constraint(Constraint::Lt(bound))
    }

    /// Less than or equal to the bound.
    pub fn lte(self, bound: f64) -> Self {
        self.push_constraint(Constraint::Lte(bound))
    }

    /// String must match the pattern.
    ///
    /// # Panics
    /// Panics on an invalid pattern.
    pub fn pattern(self, pattern: &str) -> Self {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => panic!("invalid pattern '{pattern}': {e}"),
        };
        self.push_constraint(Constraint::Pattern(re))
    }

    /// String must parse as a UUID.
    pub fn uuid(self) -> Self {
        self.push_constraint(Constraint::Uuid)
    }

    // ---- decorators ----

    /// Accepts absence without invoking the inner schema.
    pub fn optional(self) -> Self {
        Schema::Optional(Box::new(self))
    }

    /// Substitutes a fixed value when input is absent, then validates it.
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        Schema::Default(DefaultSchema {
            inner: Box::new(self),
            provider: DefaultProvider::Constant(value.into()),
        })
    }

    /// Substitutes a generated value when input is absent. The generator
    /// runs fresh on every validation call; results are never memoized.
    pub fn default_with<F>(self, provider: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Schema::Default(DefaultSchema {
            inner: Box::new(self),
            provider: DefaultProvider::Generator(Arc::new(provider)),
        })
    }

    /// Applies `predicate` after this schema succeeds; a false result
    /// yields one CustomRefinementFailed issue carrying `message`.
    /// Predicate panics are not caught.
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Schema::Refined(RefinedSchema {
            inner: Box::new(self),
            predicate: Arc::new(predicate),
            message: message.into(),
        })
    }

    // ---- object transforms ----

    fn into_object(self, op: &str) -> ObjectSchema {
        match self {
            Schema::Object(o) => o,
            other => panic!("{op} requires an object schema, got {}", other.expected_name()),
        }
    }

    /// Field map of an object schema.
    ///
    /// # Panics
    /// Panics when applied to a non-object schema.
    pub fn shape(&self) -> &FieldMap {
        match self {
            Schema::Object(o) => &o.fields,
            other => panic!("shape requires an object schema, got {}", other.expected_name()),
        }
    }

    /// New object schema with additional fields; additions win on name
    /// collision.
    pub fn extend<K, I>(self, additional: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        let mut object = self.into_object("extend");
        for (name, field) in additional {
            object.fields.insert(name.into(), field);
        }
        Schema::Object(object)
    }

    /// New object schema merging in another object's fields; the other
    /// schema's fields and unknown-key mode win.
    pub fn merge(self, other: Schema) -> Self {
        let mut base = self.into_object("merge");
        let other = other.into_object("merge");
        base.unknown_keys = other.unknown_keys;
        for (name, field) in other.fields {
            base.fields.insert(name, field);
        }
        Schema::Object(base)
    }

    /// New object schema with every field optional. One level only.
    pub fn partial(self) -> Self {
        let mut object = self.into_object("partial");
        object.fields = object
            .fields
            .into_iter()
            .map(|(name, field)| (name, optionalize(field)))
            .collect();
        Schema::Object(object)
    }

    /// New object schema with every field optional, recursing through
    /// nested object fields.
    pub fn deep_partial(self) -> Self {
        let object = self.into_object("deep_partial");
        Schema::Object(deep_partial_object(object))
    }

    /// New object schema rejecting unknown input keys.
    pub fn strict(self) -> Self {
        let mut object = self.into_object("strict");
        object.unknown_keys = UnknownKeys::Strict;
        Schema::Object(object)
    }

    /// New object schema copying unknown input keys into the output.
    pub fn passthrough(self) -> Self {
        let mut object = self.into_object("passthrough");
        object.unknown_keys = UnknownKeys::Passthrough;
        Schema::Object(object)
    }
}

/// Wraps a field as optional unless it already accepts absence.
fn optionalize(field: Schema) -> Schema {
    match field {
        Schema::Optional(inner) => Schema::Optional(inner),
        other => Schema::Optional(Box::new(other)),
    }
}

fn deep_partial_object(object: ObjectSchema) -> ObjectSchema {
    let fields = object
        .fields
        .into_iter()
        .map(|(name, field)| (name, optionalize(deep_partial_node(field))))
        .collect();
    ObjectSchema {
        fields,
        unknown_keys: object.unknown_keys,
    }
}

fn deep_partial_node(field: Schema) -> Schema {
    match field {
        Schema::Object(o) => Schema::Object(deep_partial_object(o)),
        Schema::Optional(inner) => Schema::Optional(Box::new(deep_partial_node(*inner))),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_additions_win() {
        let base = Schema::object([("name", Schema::string()), ("age", Schema::number())]);
        let extended = base.extend([("age", Schema::string())]);
        match extended.shape().get("age") {
            Some(Schema::Primitive(p)) => assert_eq!(p.kind, PrimitiveKind::String),
            other => panic!("unexpected field schema: {:?}", other),
        }
    }

    #[test]
    fn test_extend_leaves_origin_untouched() {
        let base = Schema::object([("name", Schema::string())]);
        let _extended = base.clone().extend([("extra", Schema::number())]);
        assert!(!base.shape().contains_key("extra"));
    }

    #[test]
    fn test_partial_wraps_fields_once() {
        let schema = Schema::object([
            ("name", Schema::string()),
            ("nick", Schema::string().optional()),
        ])
        .partial();
        for field in schema.shape().values() {
            match field {
                Schema::Optional(inner) => {
                    assert!(!matches!(**inner, Schema::Optional(_)));
                }
                other => panic!("field not optional: {:?}", other),
            }
        }
    }

    #[test]
    fn test_deep_partial_recurses_into_objects() {
        let schema = Schema::object([(
            "address",
            Schema::object([("city", Schema::string())]),
        )])
        .deep_partial();
        let address = match schema.shape().get("address") {
            Some(Schema::Optional(inner)) => inner,
            other => panic!("address not optional: {:?}", other),
        };
        match &**address {
            Schema::Object(o) => {
                assert!(matches!(o.fields.get("city"), Some(Schema::Optional(_))));
            }
            other => panic!("address inner not object: {:?}", other),
        }
    }

    #[test]
    fn test_merge_takes_other_unknown_keys_mode() {
        let merged = Schema::object([("a", Schema::string())])
            .merge(Schema::object([("b", Schema::number())]).strict());
        match merged {
            Schema::Object(o) => {
                assert_eq!(o.unknown_keys, UnknownKeys::Strict);
                assert!(o.fields.contains_key("a"));
                assert!(o.fields.contains_key("b"));
            }
            other => panic!("merge did not return an object: {:?}", other),
        }
    }

    #[test]
    #[should_panic(expected = "does not apply")]
    fn test_numeric_bound_on_string_panics() {
        let _ = Schema::string().gt(0.0);
    }

    #[test]
    #[should_panic(expected = "requires an object schema")]
    fn test_extend_on_primitive_panics() {
        let _ = Schema::string().extend([("x", Schema::number())]);
    }

    #[test]
    #[should_panic(expected = "missing discriminator field")]
    fn test_discriminated_branch_without_discriminator_panics() {
        let _ = Schema::discriminated_union(
            "status",
            [Schema::object([("data", Schema::string())])],
        );
    }

    #[test]
    #[should_panic(expected = "duplicate discriminator value")]
    fn test_duplicate_discriminator_value_panics() {
        let branch = || {
            Schema::object([
                ("status", Schema::literal("ok")),
                ("data", Schema::string()),
            ])
        };
        let _ = Schema::discriminated_union("status", [branch(), branch()]);
    }

    #[test]
    #[should_panic(expected = "invalid pattern")]
    fn test_bad_pattern_panics() {
        let _ = Schema::string().pattern("(unclosed");
    }
}
