//! Validation engine
//!
//! Walks a schema tree against an input value and produces either the
//! validated (and defaulted) value or the full issue list.
//!
//! Validation semantics:
//! - All declared fields are checked and every issue is collected;
//!   no short-circuit on the first field failure
//! - A type mismatch suppresses constraint checks for that node only
//! - Validation is deterministic (modulo generator defaults), stateless,
//!   and never mutates the input or the schema

use serde_json::{Map, Value};

use crate::schema::{
    Constraint, DiscriminatedSchema, EnumSchema, MapSchema, ObjectSchema, PrimitiveKind,
    PrimitiveSchema, Schema, UnknownKeys,
};

use super::errors::{SafeParse, ValidateResult, ValidationError};
use super::issue::{Issue, IssueCode, PathSegment};

impl Schema {
    /// Validates `value`, returning the validated value with defaults
    /// applied and unknown keys handled per the schema's mode.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` carrying every issue found.
    pub fn parse(&self, value: &Value) -> ValidateResult<Value> {
        let mut walker = Walker::new();
        match walker.check(self, Some(value)) {
            Checked::Ok(out) => Ok(out),
            Checked::Omitted => Ok(Value::Null),
            Checked::Invalid => Err(ValidationError::new(walker.issues)),
        }
    }

    /// Validates `value` without surfacing an `Err` at the call site.
    pub fn safe_parse(&self, value: &Value) -> SafeParse {
        SafeParse::from(self.parse(value))
    }
}

/// Outcome of checking one node.
enum Checked {
    /// Validated output value
    Ok(Value),
    /// Absent input accepted; the enclosing object omits the field
    Omitted,
    /// One or more issues were recorded
    Invalid,
}

/// One validation call. Owns the issue list and the current path;
/// dropped when the call returns.
struct Walker {
    path: Vec<PathSegment>,
    issues: Vec<Issue>,
}

impl Walker {
    fn new() -> Self {
        Self {
            path: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Checks a possibly-absent value. A missing field and an explicit
    /// null are both treated as absent; only Optional, Default and
    /// `unknown` accept absence.
    fn check(&mut self, schema: &Schema, value: Option<&Value>) -> Checked {
        match schema {
            Schema::Optional(inner) => match value {
                None => Checked::Omitted,
                Some(Value::Null) => Checked::Ok(Value::Null),
                Some(v) => self.check(inner, Some(v)),
            },
            Schema::Default(d) => match value {
                None | Some(Value::Null) => {
                    let produced = d.provider.produce();
                    self.check_present(&d.inner, &produced)
                }
                Some(v) => self.check(&d.inner, Some(v)),
            },
            Schema::Refined(r) => match self.check(&r.inner, value) {
                Checked::Ok(v) => {
                    if (r.predicate)(&v) {
                        Checked::Ok(v)
                    } else {
                        self.issue(Issue::refinement_failed(self.path.clone(), &r.message));
                        Checked::Invalid
                    }
                }
                // absence accepted by the inner schema; the predicate
                // only ever sees a validated value
                Checked::Omitted => Checked::Omitted,
                Checked::Invalid => Checked::Invalid,
            },
            _ => match value {
                None => match schema {
                    Schema::Primitive(p) if p.kind == PrimitiveKind::Unknown => Checked::Omitted,
                    _ => {
                        self.issue(Issue::missing(self.path.clone(), schema.expected_name()));
                        Checked::Invalid
                    }
                },
                Some(v) => self.check_present(schema, v),
            },
        }
    }

    fn check_present(&mut self, schema: &Schema, value: &Value) -> Checked {
        match schema {
            Schema::Primitive(p) => self.check_primitive(p, value),
            Schema::Object(o) => self.check_object(o, value),
            Schema::Array(element) => self.check_array(element, value),
            Schema::Tuple(items) => self.check_tuple(items, value),
            Schema::Union(alternatives) => self.check_union(alternatives, value),
            Schema::Discriminated(d) => self.check_discriminated(d, value),
            Schema::Enum(e) => self.check_enum(e, value),
            Schema::Map(m) => self.check_map(m, value),
            Schema::Deferred(_) => {
                self.issue(Issue::type_mismatch(
                    self.path.clone(),
                    "deferred value (use parse_deferred)",
                    json_type_name(value),
                ));
                Checked::Invalid
            }
            // decorators carry their own absence semantics
            Schema::Optional(_) | Schema::Default(_) | Schema::Refined(_) => {
                self.check(schema, Some(value))
            }
        }
    }

    fn check_primitive(&mut self, p: &PrimitiveSchema, value: &Value) -> Checked {
        match &p.kind {
            PrimitiveKind::String => match value.as_str() {
                Some(s) => self.check_string_constraints(p, s, value),
                None => self.mismatch("string", value),
            },
            PrimitiveKind::Number => match value.as_f64() {
                Some(n) => self.check_numeric_constraints(p, n, value),
                None => self.mismatch("number", value),
            },
            PrimitiveKind::Integer => {
                if value.is_i64() || value.is_u64() {
                    match value.as_f64() {
                        Some(n) => self.check_numeric_constraints(p, n, value),
                        None => self.mismatch("integer", value),
                    }
                } else {
                    self.mismatch("integer", value)
                }
            }
            PrimitiveKind::Bool => {
                if value.is_boolean() {
                    Checked::Ok(value.clone())
                } else {
                    self.mismatch("bool", value)
                }
            }
            PrimitiveKind::DateTime => match value.as_str() {
                Some(s) => match chrono::DateTime::parse_from_rfc3339(s) {
                    Ok(_) => Checked::Ok(value.clone()),
                    Err(e) => {
                        self.issue(Issue::new(
                            self.path.clone(),
                            IssueCode::TypeMismatch,
                            format!("invalid RFC 3339 datetime: {e}"),
                        ));
                        Checked::Invalid
                    }
                },
                None => self.mismatch("datetime", value),
            },
            PrimitiveKind::Literal(expected) => {
                if value == expected {
                    Checked::Ok(value.clone())
                } else {
                    self.issue(Issue::invalid_literal(
                        self.path.clone(),
                        format!("expected literal {expected}, got {value}"),
                    ));
                    Checked::Invalid
                }
            }
            PrimitiveKind::Unknown => Checked::Ok(value.clone()),
        }
    }

    /// String constraints, in declaration order, one issue each.
    fn check_string_constraints(&mut self, p: &PrimitiveSchema, s: &str, value: &Value) -> Checked {
        let before = self.issues.len();
        for constraint in &p.constraints {
            match constraint {
                Constraint::MinLen(min) => {
                    let len = s.chars().count();
                    if len < *min {
                        self.issue(Issue::too_small(
                            self.path.clone(),
                            format!("must contain at least {min} characters, got {len}"),
                        ));
                    }
                }
                Constraint::MaxLen(max) => {
                    let len = s.chars().count();
                    if len > *max {
                        self.issue(Issue::too_large(
                            self.path.clone(),
                            format!("must contain at most {max} characters, got {len}"),
                        ));
                    }
                }
                Constraint::Pattern(re) => {
                    if !re.is_match(s) {
                        self.issue(Issue::new(
                            self.path.clone(),
                            IssueCode::TypeMismatch,
                            format!("does not match pattern {re}"),
                        ));
                    }
                }
                Constraint::Uuid => {
                    if uuid::Uuid::parse_str(s).is_err() {
                        self.issue(Issue::new(
                            self.path.clone(),
                            IssueCode::TypeMismatch,
                            "not a valid UUID",
                        ));
                    }
                }
                // numeric bounds cannot be attached to string schemas
                Constraint::Gt(_) | Constraint::Gte(_) | Constraint::Lt(_) | Constraint::Lte(_) => {}
            }
        }
        if self.issues.len() == before {
            Checked::Ok(value.clone())
        } else {
            Checked::Invalid
        }
    }

    /// Numeric bounds, in declaration order. Gt/Lt are strict; the bound
    /// is carried in the message.
    fn check_numeric_constraints(&mut self, p: &PrimitiveSchema, n: f64, value: &Value) -> Checked {
        let before = self.issues.len();
        for constraint in &p.constraints {
            match constraint {
                Constraint::Gt(bound) => {
                    if !(n > *bound) {
                        self.issue(Issue::too_small(
                            self.path.clone(),
                            format!("must be greater than {bound}, got {n}"),
                        ));
                    }
                }
                Constraint::Gte(bound) => {
                    if n < *bound {
                        self.issue(Issue::too_small(
                            self.path.clone(),
                            format!("must be at least {bound}, got {n}"),
                        ));
                    }
                }
                Constraint::Lt(bound) => {
                    if !(n < *bound) {
                        self.issue(Issue::too_large(
                            self.path.clone(),
                            format!("must be less than {bound}, got {n}"),
                        ));
                    }
                }
                Constraint::Lte(bound) => {
                    if n > *bound {
                        self.issue(Issue::too_large(
                            self.path.clone(),
                            format!("must be at most {bound}, got {n}"),
                        ));
                    }
                }
                // string constraints cannot be attached to numeric schemas
                Constraint::MinLen(_)
                | Constraint::MaxLen(_)
                | Constraint::Pattern(_)
                | Constraint::Uuid => {}
            }
        }
        if self.issues.len() == before {
            Checked::Ok(value.clone())
        } else {
            Checked::Invalid
        }
    }

    fn check_object(&mut self, o: &ObjectSchema, value: &Value) -> Checked {
        let input = match value.as_object() {
            Some(m) => m,
            None => return self.mismatch("object", value),
        };
        let before = self.issues.len();
        let mut output = Map::new();

        for (name, field_schema) in &o.fields {
            self.path.push(PathSegment::Field(name.clone()));
            if let Checked::Ok(v) = self.check(field_schema, input.get(name)) {
                output.insert(name.clone(), v);
            }
            self.path.pop();
        }

        match o.unknown_keys {
            UnknownKeys::Strip => {}
            UnknownKeys::Strict => {
                for key in input.keys() {
                    if !o.fields.contains_key(key) {
                        self.path.push(PathSegment::Field(key.clone()));
                        self.issue(Issue::unrecognized_key(self.path.clone()));
                        self.path.pop();
                    }
                }
            }
            UnknownKeys::Passthrough => {
                for (key, v) in input {
                    if !o.fields.contains_key(key) {
                        output.insert(key.clone(), v.clone());
                    }
                }
            }
        }

        if self.issues.len() == before {
            Checked::Ok(Value::Object(output))
        } else {
            Checked::Invalid
        }
    }

    fn check_array(&mut self, element_schema: &Schema, value: &Value) -> Checked {
        let input = match value.as_array() {
            Some(a) => a,
            None => return self.mismatch("array", value),
        };
        let before = self.issues.len();
        let mut output = Vec::with_capacity(input.len());
        for (i, element) in input.iter().enumerate() {
            self.path.push(PathSegment::Index(i));
            if let Checked::Ok(v) = self.check_present(element_schema, element) {
                output.push(v);
            }
            self.path.pop();
        }
        if self.issues.len() == before {
            Checked::Ok(Value::Array(output))
        } else {
            Checked::Invalid
        }
    }

    /// A length mismatch is a single issue; no per-element validation is
    /// attempted in that case.
    fn check_tuple(&mut self, items: &[Schema], value: &Value) -> Checked {
        let input = match value.as_array() {
            Some(a) => a,
            None => return self.mismatch("tuple", value),
        };
        if input.len() != items.len() {
            self.issue(Issue::arity_mismatch(
                self.path.clone(),
                items.len(),
                input.len(),
            ));
            return Checked::Invalid;
        }
        let before = self.issues.len();
        let mut output = Vec::with_capacity(items.len());
        for (i, (item_schema, element)) in items.iter().zip(input).enumerate() {
            self.path.push(PathSegment::Index(i));
            if let Checked::Ok(v) = self.check_present(item_schema, element) {
                output.push(v);
            }
            self.path.pop();
        }
        if self.issues.len() == before {
            Checked::Ok(Value::Array(output))
        } else {
            Checked::Invalid
        }
    }

    /// Alternatives are attempted in declaration order against a fresh
    /// issue buffer; the first full success wins. On total failure every
    /// alternative's issues are reported, in order.
    fn check_union(&mut self, alternatives: &[Schema], value: &Value) -> Checked {
        let mut collected: Vec<Issue> = Vec::new();
        for alternative in alternatives {
            let mut trial = Walker {
                path: self.path.clone(),
                issues: Vec::new(),
            };
            if let Checked::Ok(v) = trial.check(alternative, Some(value)) {
                return Checked::Ok(v);
            }
            collected.append(&mut trial.issues);
        }
        self.issues.append(&mut collected);
        Checked::Invalid
    }

    /// Reads the discriminator without full validation, then validates
    /// only the selected branch. No fallback to trying all branches.
    fn check_discriminated(&mut self, d: &DiscriminatedSchema, value: &Value) -> Checked {
        let input = match value.as_object() {
            Some(m) => m,
            None => return self.mismatch("object", value),
        };
        let tag = input.get(&d.discriminator);
        let branch = tag.and_then(|t| d.branches.iter().find(|(expected, _)| expected == t));
        match branch {
            Some((_, object)) => self.check_object(object, value),
            None => {
                let allowed = d
                    .branches
                    .iter()
                    .map(|(v, _)| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                let got = tag
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "nothing".to_string());
                self.path.push(PathSegment::Field(d.discriminator.clone()));
                self.issue(Issue::invalid_literal(
                    self.path.clone(),
                    format!("expected one of [{allowed}], got {got}"),
                ));
                self.path.pop();
                Checked::Invalid
            }
        }
    }

    fn check_enum(&mut self, e: &EnumSchema, value: &Value) -> Checked {
        match value.as_str() {
            Some(s) if e.values.iter().any(|v| v == s) => Checked::Ok(value.clone()),
            _ => {
                let allowed = e.values.join(", ");
                self.issue(Issue::invalid_literal(
                    self.path.clone(),
                    format!("expected one of [{allowed}], got {value}"),
                ));
                Checked::Invalid
            }
        }
    }

    fn check_map(&mut self, m: &MapSchema, value: &Value) -> Checked {
        let input = match value.as_object() {
            Some(map) => map,
            None => return self.mismatch("map", value),
        };
        let before = self.issues.len();
        let mut output = Map::new();
        for (key, entry) in input {
            self.path.push(PathSegment::Key(key.clone()));
            let key_value = Value::String(key.clone());
            let key_ok = matches!(self.check_present(&m.key, &key_value), Checked::Ok(_));
            let entry_out = match self.check_present(&m.value, entry) {
                Checked::Ok(v) => Some(v),
                _ => None,
            };
            if key_ok {
                if let Some(v) = entry_out {
                    output.insert(key.clone(), v);
                }
            }
            self.path.pop();
        }
        if self.issues.len() == before {
            Checked::Ok(Value::Object(output))
        } else {
            Checked::Invalid
        }
    }

    fn mismatch(&mut self, expected: &str, value: &Value) -> Checked {
        self.issue(Issue::type_mismatch(
            self.path.clone(),
            expected,
            json_type_name(value),
        ));
        Checked::Invalid
    }

    fn issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
