//! Structural and schema validation.
//!
//! Validation runs in two passes over the tree, both visiting children in
//! their stored order so the first reported violation is always the same:
//!
//! 1. **Structure** (always): nesting stays within the context's depth limit
//!    and floats are finite unless the context allows NaN and infinities.
//! 2. **Schema** (when one is given): types, [`Constraint`](crate::Constraint)s,
//!    required and unknown mapping keys.
//!
//! ```rust
//! use structured_yaml::{structured, validate, Schema, ValidationError};
//!
//! let schema = Schema::mapping().required("age", Schema::integer().non_negative());
//!
//! assert!(validate(&structured!({ "age": 30 }), Some(&schema)).is_ok());
//!
//! let err = validate(&structured!({ "age": (-5) }), Some(&schema)).unwrap_err();
//! assert!(matches!(
//!     err,
//!     ValidationError::ConstraintViolated { ref path, ref rule }
//!         if path == "age" && rule == "non-negative"
//! ));
//! ```

use crate::path::{Path, Segment};
use crate::schema::Field;
use crate::{EncodingContext, Schema, StructuredValue, ValidationError};
use indexmap::IndexMap;

type Result<T> = std::result::Result<T, ValidationError>;

/// Validates `value` with the default [`EncodingContext`].
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate(value: &StructuredValue, schema: Option<&Schema>) -> Result<()> {
    validate_with_context(value, schema, &EncodingContext::default())
}

/// Validates `value` under `ctx`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_with_context(
    value: &StructuredValue,
    schema: Option<&Schema>,
    ctx: &EncodingContext,
) -> Result<()> {
    let mut validator = Validator {
        ctx,
        path: Vec::new(),
    };
    validator.structure(value, 0)?;
    if let Some(schema) = schema {
        validator.schema(schema, value)?;
    }
    Ok(())
}

struct Validator<'a> {
    ctx: &'a EncodingContext,
    /// Segments from the root to the node being visited.
    path: Vec<Segment>,
}

impl Validator<'_> {
    fn here(&self) -> Path {
        Path::from(self.path.clone())
    }

    fn structural(&self, reason: &str) -> ValidationError {
        ValidationError::structural(self.here(), reason)
    }

    fn violated(&self, rule: impl std::fmt::Display) -> ValidationError {
        ValidationError::violated(self.here(), rule)
    }

    fn within<T>(
        &mut self,
        segment: Segment,
        visit: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment);
        let result = visit(self);
        self.path.pop();
        result
    }

    fn structure(&mut self, value: &StructuredValue, depth: usize) -> Result<()> {
        match value {
            StructuredValue::Number(n) if !n.is_finite() && !self.ctx.allow_non_finite => {
                Err(self.structural(&format!("non-finite float {}", n)))
            }
            StructuredValue::Sequence(_) | StructuredValue::Mapping(_)
                if depth >= self.ctx.max_depth =>
            {
                Err(self.structural(&format!(
                    "nesting exceeds depth limit of {}",
                    self.ctx.max_depth
                )))
            }
            StructuredValue::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.within(Segment::Index(index), |v| v.structure(item, depth + 1))?;
                }
                Ok(())
            }
            StructuredValue::Mapping(map) => {
                for (key, item) in map.iter() {
                    self.within(Segment::Key(key.clone()), |v| v.structure(item, depth + 1))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn schema(&mut self, schema: &Schema, value: &StructuredValue) -> Result<()> {
        match (schema, value) {
            (Schema::Any, _) => Ok(()),
            (Schema::Nullable { .. }, StructuredValue::Null) => Ok(()),
            (Schema::Nullable { inner }, _) => self.schema(inner, value),
            (Schema::Null, StructuredValue::Null) | (Schema::Bool, StructuredValue::Bool(_)) => {
                Ok(())
            }
            (Schema::Integer { rules }, StructuredValue::Number(n)) if n.is_integer() => {
                self.rules(rules, value)
            }
            (Schema::Number { rules }, StructuredValue::Number(_))
            | (Schema::String { rules }, StructuredValue::String(_)) => self.rules(rules, value),
            (Schema::Sequence { items, rules }, StructuredValue::Sequence(values)) => {
                self.rules(rules, value)?;
                for (index, item) in values.iter().enumerate() {
                    self.within(Segment::Index(index), |v| v.schema(items, item))?;
                }
                Ok(())
            }
            (
                Schema::Mapping {
                    fields,
                    deny_unknown,
                },
                StructuredValue::Mapping(map),
            ) => self.mapping(fields, *deny_unknown, map),
            _ => Err(self.violated(format_args!("type: {}", schema.type_name()))),
        }
    }

    fn rules(&self, rules: &[crate::Constraint], value: &StructuredValue) -> Result<()> {
        match rules.iter().find(|rule| !rule.is_satisfied_by(value)) {
            Some(rule) => Err(self.violated(rule)),
            None => Ok(()),
        }
    }

    fn mapping(
        &mut self,
        fields: &IndexMap<String, Field>,
        deny_unknown: bool,
        map: &crate::StructuredMap,
    ) -> Result<()> {
        for (key, item) in map.iter() {
            match fields.get(key) {
                Some(field) => {
                    self.within(Segment::Key(key.clone()), |v| v.schema(&field.schema, item))?
                }
                None if deny_unknown => {
                    return self.within(Segment::Key(key.clone()), |v| {
                        Err(v.violated("unknown-field"))
                    });
                }
                None => {}
            }
        }

        for (name, field) in fields {
            if field.required && !map.contains_key(name) {
                return self.within(Segment::Key(name.clone()), |v| Err(v.violated("required")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured;

    fn rule_at(err: ValidationError) -> (String, String) {
        match err {
            ValidationError::ConstraintViolated { path, rule } => (path.to_string(), rule),
            other => panic!("expected constraint violation, got {}", other),
        }
    }

    #[test]
    fn test_no_schema_accepts_plain_tree() {
        let value = structured!({ "a": [1, 2.5, "x", null, {"b": true}] });
        assert!(validate(&value, None).is_ok());
    }

    #[test]
    fn test_non_finite_is_structural() {
        let value = structured!({ "ratio": [1.0, (f64::INFINITY)] });
        let err = validate(&value, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::StructuralError {
                path: Path::from(vec![Segment::key("ratio"), Segment::Index(1)]),
                reason: "non-finite float .inf".to_string(),
            }
        );

        let ctx = EncodingContext::new().with_non_finite(true);
        assert!(validate_with_context(&value, None, &ctx).is_ok());
    }

    #[test]
    fn test_allowed_nan_still_fails_sign_rules() {
        let ctx = EncodingContext::new().with_non_finite(true);
        let schema = Schema::mapping().required("a.b", Schema::number().non_negative());
        let value = structured!({ "a.b": (f64::NAN) });
        let (path, rule) = rule_at(validate_with_context(&value, Some(&schema), &ctx).unwrap_err());
        assert_eq!(path, "[\"a.b\"]");
        assert_eq!(rule, "non-negative");
    }

    #[test]
    fn test_depth_is_structural() {
        let ctx = EncodingContext::new().with_max_depth(1);
        assert!(validate_with_context(&structured!([1, 2]), None, &ctx).is_ok());
        let err = validate_with_context(&structured!([[1]]), None, &ctx).unwrap_err();
        assert_eq!(err.path().to_string(), "[0]");
    }

    #[test]
    fn test_structure_checked_before_schema() {
        let value = structured!({ "age": "old", "score": (f64::NAN) });
        let schema = Schema::mapping().required("age", Schema::integer());
        assert!(matches!(
            validate(&value, Some(&schema)).unwrap_err(),
            ValidationError::StructuralError { .. }
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let schema = Schema::mapping().required("age", Schema::integer());
        let (path, rule) = rule_at(validate(&structured!({ "age": 30.5 }), Some(&schema)).unwrap_err());
        assert_eq!(path, "age");
        assert_eq!(rule, "type: integer");

        let (path, rule) = rule_at(validate(&structured!([1]), Some(&schema)).unwrap_err());
        assert_eq!(path, "<root>");
        assert_eq!(rule, "type: mapping");
    }

    #[test]
    fn test_missing_required_field() {
        let schema = Schema::mapping()
            .required("name", Schema::string())
            .required("age", Schema::integer());
        let (path, rule) = rule_at(validate(&structured!({ "name": "x" }), Some(&schema)).unwrap_err());
        assert_eq!(path, "age");
        assert_eq!(rule, "required");
    }

    #[test]
    fn test_unknown_field() {
        let schema = Schema::mapping().optional("a", Schema::any());
        let value = structured!({ "a": 1, "b": 2 });
        assert!(validate(&value, Some(&schema)).is_ok());

        let (path, rule) =
            rule_at(validate(&value, Some(&schema.deny_unknown())).unwrap_err());
        assert_eq!(path, "b");
        assert_eq!(rule, "unknown-field");
    }

    #[test]
    fn test_first_violation_in_value_order() {
        let schema = Schema::mapping()
            .required("a", Schema::integer().positive())
            .required("b", Schema::integer().positive());
        let value = structured!({ "b": 0, "a": 0 });
        let (path, _) = rule_at(validate(&value, Some(&schema)).unwrap_err());
        assert_eq!(path, "b");
    }

    #[test]
    fn test_nested_sequence_paths() {
        let schema = Schema::mapping().required(
            "users",
            Schema::sequence(
                Schema::mapping().required("role", Schema::string().one_of(["admin", "user"])),
            )
            .max_items(5),
        );
        let value = structured!({
            "users": [{"role": "admin"}, {"role": "root"}]
        });
        let (path, rule) = rule_at(validate(&value, Some(&schema)).unwrap_err());
        assert_eq!(path, "users[1].role");
        assert_eq!(rule, "one-of: [admin, user]");
    }

    #[test]
    fn test_nullable() {
        let schema = Schema::mapping().required("manager", Schema::nullable(Schema::string()));
        assert!(validate(&structured!({ "manager": null }), Some(&schema)).is_ok());
        assert!(validate(&structured!({ "manager": "Ann" }), Some(&schema)).is_ok());
        let (_, rule) = rule_at(validate(&structured!({ "manager": 3 }), Some(&schema)).unwrap_err());
        assert_eq!(rule, "type: string");
    }

    #[test]
    fn test_sequence_rules_before_items() {
        let schema = Schema::sequence(Schema::integer()).min_items(3);
        let (path, rule) = rule_at(validate(&structured!(["x"]), Some(&schema)).unwrap_err());
        assert_eq!(path, "<root>");
        assert_eq!(rule, "min-items: 3");
    }
}
