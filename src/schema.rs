//! Declarative schemas for structured values.
//!
//! A [`Schema`] describes the expected shape of a value: its type, per-node
//! [`Constraint`]s, and for mappings the known fields and whether they are
//! required. Schemas are plain data; build them with the methods below or
//! deserialize them from JSON or YAML with serde.
//!
//! ## Examples
//!
//! ```rust
//! use structured_yaml::Schema;
//!
//! let person = Schema::mapping()
//!     .required("name", Schema::string().min_length(1))
//!     .required("age", Schema::integer().non_negative())
//!     .optional("role", Schema::string().one_of(["admin", "user"]))
//!     .optional("hobbies", Schema::sequence(Schema::string()).max_items(10));
//! assert_eq!(person.type_name(), "mapping");
//! ```
//!
//! The same schema in its serialized form:
//!
//! ```rust
//! use structured_yaml::Schema;
//!
//! let schema: Schema = serde_json::from_str(r#"{
//!     "type": "mapping",
//!     "fields": {
//!         "age": { "schema": { "type": "integer", "rules": ["non-negative"] }, "required": true }
//!     }
//! }"#).unwrap();
//! assert_eq!(schema, Schema::mapping().required("age", Schema::integer().non_negative()));
//! ```

use crate::{Number, StructuredValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The expected shape of a value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schema {
    /// Accepts every value.
    Any,
    Null,
    Bool,
    /// `Integer` or `BigInt` numbers.
    Integer {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        rules: Vec<Constraint>,
    },
    /// Any number, integral or not.
    Number {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        rules: Vec<Constraint>,
    },
    String {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        rules: Vec<Constraint>,
    },
    Sequence {
        items: Box<Schema>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        rules: Vec<Constraint>,
    },
    Mapping {
        #[serde(default)]
        fields: IndexMap<String, Field>,
        /// Reject keys not listed in `fields`.
        #[serde(default)]
        deny_unknown: bool,
    },
    /// `Null` or a value matching `inner`.
    Nullable { inner: Box<Schema> },
}

/// A named entry of a mapping schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub schema: Schema,
    #[serde(default)]
    pub required: bool,
}

/// A rule attached to a scalar or sequence schema.
///
/// The display form is the rule name reported in
/// [`ValidationError::ConstraintViolated`](crate::ValidationError::ConstraintViolated).
///
/// ```rust
/// use structured_yaml::Constraint;
///
/// assert_eq!(Constraint::NonNegative.to_string(), "non-negative");
/// assert_eq!(Constraint::Minimum(3.0).to_string(), "minimum: 3");
/// assert_eq!(
///     Constraint::OneOf(vec!["a".into(), "b".into()]).to_string(),
///     "one-of: [a, b]"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Constraint {
    /// Number `>= 0`.
    NonNegative,
    /// Number `> 0`.
    Positive,
    /// Number `>= bound`.
    Minimum(f64),
    /// Number `<= bound`.
    Maximum(f64),
    /// String with at least this many characters.
    MinLength(usize),
    /// String with at most this many characters.
    MaxLength(usize),
    /// String equal to one of the listed values.
    OneOf(Vec<String>),
    /// Sequence with at least this many items.
    MinItems(usize),
    /// Sequence with at most this many items.
    MaxItems(usize),
}

impl Constraint {
    /// Returns `true` if `value` satisfies the rule.
    ///
    /// A rule applied to a value of the wrong kind (a length rule on a
    /// number, say) is never satisfied.
    #[must_use]
    pub fn is_satisfied_by(&self, value: &StructuredValue) -> bool {
        match (self, value) {
            (Constraint::NonNegative, StructuredValue::Number(n)) => {
                within(n, 0.0, |o| o != Ordering::Less)
            }
            (Constraint::Positive, StructuredValue::Number(n)) => n.is_positive(),
            (Constraint::Minimum(bound), StructuredValue::Number(n)) => {
                within(n, *bound, |o| o != Ordering::Less)
            }
            (Constraint::Maximum(bound), StructuredValue::Number(n)) => {
                within(n, *bound, |o| o != Ordering::Greater)
            }
            (Constraint::MinLength(min), StructuredValue::String(s)) => s.chars().count() >= *min,
            (Constraint::MaxLength(max), StructuredValue::String(s)) => s.chars().count() <= *max,
            (Constraint::OneOf(allowed), StructuredValue::String(s)) => allowed.iter().any(|a| a == s),
            (Constraint::MinItems(min), StructuredValue::Sequence(items)) => items.len() >= *min,
            (Constraint::MaxItems(max), StructuredValue::Sequence(items)) => items.len() <= *max,
            _ => false,
        }
    }
}

/// Compares exactly when both sides are whole and fit `i64`, through `f64`
/// otherwise. NaN never compares.
fn within(n: &Number, bound: f64, accept: fn(Ordering) -> bool) -> bool {
    let whole_bound = bound.fract() == 0.0 && bound >= i64::MIN as f64 && bound < i64::MAX as f64;
    let ordering = match n.as_i64() {
        Some(i) if whole_bound => i.cmp(&(bound as i64)),
        _ => match n.as_f64().partial_cmp(&bound) {
            Some(ordering) => ordering,
            None => return false,
        },
    };
    accept(ordering)
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::NonNegative => f.write_str("non-negative"),
            Constraint::Positive => f.write_str("positive"),
            Constraint::Minimum(bound) => write!(f, "minimum: {}", bound),
            Constraint::Maximum(bound) => write!(f, "maximum: {}", bound),
            Constraint::MinLength(n) => write!(f, "min-length: {}", n),
            Constraint::MaxLength(n) => write!(f, "max-length: {}", n),
            Constraint::OneOf(allowed) => write!(f, "one-of: [{}]", allowed.join(", ")),
            Constraint::MinItems(n) => write!(f, "min-items: {}", n),
            Constraint::MaxItems(n) => write!(f, "max-items: {}", n),
        }
    }
}

impl Schema {
    #[must_use]
    pub fn any() -> Self {
        Schema::Any
    }

    #[must_use]
    pub fn null() -> Self {
        Schema::Null
    }

    #[must_use]
    pub fn bool() -> Self {
        Schema::Bool
    }

    #[must_use]
    pub fn integer() -> Self {
        Schema::Integer { rules: Vec::new() }
    }

    #[must_use]
    pub fn number() -> Self {
        Schema::Number { rules: Vec::new() }
    }

    #[must_use]
    pub fn string() -> Self {
        Schema::String { rules: Vec::new() }
    }

    /// A sequence whose items all match `items`.
    #[must_use]
    pub fn sequence(items: Schema) -> Self {
        Schema::Sequence {
            items: Box::new(items),
            rules: Vec::new(),
        }
    }

    /// A mapping with no declared fields; unknown keys are allowed.
    #[must_use]
    pub fn mapping() -> Self {
        Schema::Mapping {
            fields: IndexMap::new(),
            deny_unknown: false,
        }
    }

    #[must_use]
    pub fn nullable(inner: Schema) -> Self {
        Schema::Nullable {
            inner: Box::new(inner),
        }
    }

    /// Name of the type this schema expects, as reported in `type: ...` violations.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Any => "any",
            Schema::Null => "null",
            Schema::Bool => "bool",
            Schema::Integer { .. } => "integer",
            Schema::Number { .. } => "number",
            Schema::String { .. } => "string",
            Schema::Sequence { .. } => "sequence",
            Schema::Mapping { .. } => "mapping",
            Schema::Nullable { inner } => inner.type_name(),
        }
    }

    /// The rules attached to this schema, if it can carry any.
    #[must_use]
    pub fn rules(&self) -> &[Constraint] {
        match self {
            Schema::Integer { rules }
            | Schema::Number { rules }
            | Schema::String { rules }
            | Schema::Sequence { rules, .. } => rules,
            Schema::Nullable { inner } => inner.rules(),
            _ => &[],
        }
    }

    /// Attaches a rule. Has no effect on `Any`, `Null`, `Bool` and `Mapping`
    /// schemas, which carry no rules.
    #[must_use]
    pub fn with_rule(mut self, constraint: Constraint) -> Self {
        match &mut self {
            Schema::Integer { rules }
            | Schema::Number { rules }
            | Schema::String { rules }
            | Schema::Sequence { rules, .. } => rules.push(constraint),
            Schema::Nullable { inner } => {
                let taken = std::mem::replace(inner.as_mut(), Schema::Any);
                **inner = taken.with_rule(constraint);
            }
            Schema::Any | Schema::Null | Schema::Bool | Schema::Mapping { .. } => {}
        }
        self
    }

    #[must_use]
    pub fn non_negative(self) -> Self {
        self.with_rule(Constraint::NonNegative)
    }

    #[must_use]
    pub fn positive(self) -> Self {
        self.with_rule(Constraint::Positive)
    }

    #[must_use]
    pub fn minimum(self, bound: f64) -> Self {
        self.with_rule(Constraint::Minimum(bound))
    }

    #[must_use]
    pub fn maximum(self, bound: f64) -> Self {
        self.with_rule(Constraint::Maximum(bound))
    }

    #[must_use]
    pub fn min_length(self, n: usize) -> Self {
        self.with_rule(Constraint::MinLength(n))
    }

    #[must_use]
    pub fn max_length(self, n: usize) -> Self {
        self.with_rule(Constraint::MaxLength(n))
    }

    #[must_use]
    pub fn one_of<I, S>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_rule(Constraint::OneOf(allowed.into_iter().map(Into::into).collect()))
    }

    #[must_use]
    pub fn min_items(self, n: usize) -> Self {
        self.with_rule(Constraint::MinItems(n))
    }

    #[must_use]
    pub fn max_items(self, n: usize) -> Self {
        self.with_rule(Constraint::MaxItems(n))
    }

    /// Declares a field that must be present. No effect on non-mapping schemas.
    #[must_use]
    pub fn required(self, name: &str, schema: Schema) -> Self {
        self.field(name, schema, true)
    }

    /// Declares a field that may be absent. No effect on non-mapping schemas.
    #[must_use]
    pub fn optional(self, name: &str, schema: Schema) -> Self {
        self.field(name, schema, false)
    }

    fn field(mut self, name: &str, schema: Schema, required: bool) -> Self {
        if let Schema::Mapping { fields, .. } = &mut self {
            fields.insert(name.to_string(), Field { schema, required });
        }
        self
    }

    /// Makes a mapping schema reject keys it does not declare.
    #[must_use]
    pub fn deny_unknown(mut self) -> Self {
        if let Schema::Mapping { deny_unknown, .. } = &mut self {
            *deny_unknown = true;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_rules() {
        let minus_five = StructuredValue::from(-5);
        assert!(!Constraint::NonNegative.is_satisfied_by(&minus_five));
        assert!(Constraint::NonNegative.is_satisfied_by(&StructuredValue::from(0)));
        assert!(!Constraint::Positive.is_satisfied_by(&StructuredValue::from(0)));
        assert!(Constraint::Minimum(-5.0).is_satisfied_by(&minus_five));
        assert!(!Constraint::Maximum(-6.0).is_satisfied_by(&minus_five));
        assert!(Constraint::Maximum(2.5).is_satisfied_by(&StructuredValue::from(2)));
        assert!(!Constraint::Minimum(2.5).is_satisfied_by(&StructuredValue::from(2)));
    }

    #[test]
    fn test_nan_is_never_non_negative() {
        let nan = StructuredValue::from(f64::NAN);
        assert!(!Constraint::NonNegative.is_satisfied_by(&nan));
        assert!(!Constraint::Positive.is_satisfied_by(&nan));
        assert!(Constraint::NonNegative.is_satisfied_by(&StructuredValue::from(-0.0)));
        assert!(Constraint::NonNegative.is_satisfied_by(&StructuredValue::from(f64::INFINITY)));
    }

    #[test]
    fn test_large_integer_bounds_are_exact() {
        // 2^53 + 1 is not representable as f64.
        let value = StructuredValue::from(9_007_199_254_740_993i64);
        assert!(!Constraint::Maximum(9_007_199_254_740_992.0).is_satisfied_by(&value));
        assert!(Constraint::Minimum(9_007_199_254_740_992.0).is_satisfied_by(&value));
    }

    #[test]
    fn test_string_and_sequence_rules() {
        let name = StructuredValue::from("héllo");
        assert!(Constraint::MaxLength(5).is_satisfied_by(&name));
        assert!(!Constraint::MinLength(6).is_satisfied_by(&name));
        assert!(Constraint::OneOf(vec!["héllo".into()]).is_satisfied_by(&name));

        let items = StructuredValue::Sequence(vec![StructuredValue::Null; 3]);
        assert!(Constraint::MinItems(3).is_satisfied_by(&items));
        assert!(!Constraint::MaxItems(2).is_satisfied_by(&items));
    }

    #[test]
    fn test_misapplied_rule_never_satisfied() {
        assert!(!Constraint::MinLength(0).is_satisfied_by(&StructuredValue::from(1)));
    }

    #[test]
    fn test_builder_ignores_rules_on_mapping() {
        let schema = Schema::mapping().non_negative();
        assert_eq!(schema, Schema::mapping());
        assert!(schema.rules().is_empty());
    }

    #[test]
    fn test_nullable_rule_goes_inside() {
        let schema = Schema::nullable(Schema::integer()).positive();
        assert_eq!(schema.rules(), &[Constraint::Positive]);
        assert_eq!(schema.type_name(), "integer");
    }

    #[test]
    fn test_serde_round_trip() {
        let schema = Schema::mapping()
            .required("tags", Schema::sequence(Schema::string()).min_items(1))
            .optional("score", Schema::number().minimum(0.0).maximum(1.0))
            .deny_unknown();

        let json = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, back);
    }
}
