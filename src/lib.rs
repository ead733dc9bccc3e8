//! # structured_yaml
//!
//! Validate arbitrary Serde data and render it as YAML text.
//!
//! ## Overview
//!
//! Every call runs the same three stages:
//!
//! 1. **Encode**: any `T: Serialize` becomes a [`StructuredValue`], a tagged
//!    tree of null, bool, number, string, sequence and mapping nodes with
//!    mapping keys kept in insertion order.
//! 2. **Validate**: the tree is checked for soundness (depth, finite floats)
//!    and, when a [`Schema`] is given, against its types and constraints.
//! 3. **Render**: the tree is written as YAML block text.
//!
//! A failure stops the pipeline and comes back as a [`PipelineError`] whose
//! [`stage()`](PipelineError::stage) names the stage that failed. Nothing is
//! returned or written on failure.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use structured_yaml::process;
//!
//! #[derive(Serialize)]
//! struct Profile {
//!     name: String,
//!     age: u32,
//!     active: bool,
//!     hobbies: Vec<String>,
//! }
//!
//! let profile = Profile {
//!     name: "John Doe".to_string(),
//!     age: 30,
//!     active: true,
//!     hobbies: vec!["reading".into(), "coding".into(), "hiking".into()],
//! };
//!
//! let yaml = process(&profile, None).unwrap();
//! assert_eq!(
//!     yaml,
//!     "name: John Doe\nage: 30\nactive: true\nhobbies:\n  - reading\n  - coding\n  - hiking\n"
//! );
//! ```
//!
//! ## Schemas
//!
//! ```rust
//! use structured_yaml::{process, structured, Schema, Stage};
//!
//! let schema = Schema::mapping()
//!     .required("name", Schema::string().min_length(1))
//!     .required("age", Schema::integer().non_negative());
//!
//! let err = process(&structured!({ "name": "x", "age": (-5) }), Some(&schema)).unwrap_err();
//! assert_eq!(err.stage(), Stage::Validate);
//! assert_eq!(err.to_string(), "validate stage failed: constraint violated at age: non-negative");
//! ```
//!
//! ## Configuration
//!
//! An [`EncodingContext`] carries the depth limit, float policy and layout
//! options for one call. [`Pipeline`] bundles a context with a schema for
//! reuse.
//!
//! ## Cyclic data
//!
//! Plain Rust values cannot form cycles, but shared object graphs can. The
//! [`host`] module provides [`Node`](host::Node), an `Rc`-based graph whose
//! cycles the encoder reports as [`EncodeError::CyclicReference`].

pub mod context;
pub mod encode;
pub mod error;
pub mod host;
pub mod macros;
pub mod map;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod schema;
pub mod validate;
pub mod value;

pub use context::{EncodingContext, DEFAULT_MAX_DEPTH};
pub use encode::{encode, encode_with_context, ValueSerializer};
pub use error::{EncodeError, PipelineError, RenderError, Result, Stage, ValidationError};
pub use map::StructuredMap;
pub use path::{Path, Segment};
pub use pipeline::Pipeline;
pub use render::{render, render_with_context};
pub use schema::{Constraint, Field, Schema};
pub use validate::{validate, validate_with_context};
pub use value::{Number, StructuredValue};

use serde::Serialize;
use std::io;

/// Encodes, validates and renders `raw` with the default context.
///
/// # Examples
///
/// ```rust
/// use structured_yaml::process;
///
/// let yaml = process(&vec![("a", 1), ("b", 2)], None).unwrap();
/// assert_eq!(yaml, "- - a\n  - 1\n- - b\n  - 2\n");
/// ```
///
/// # Errors
///
/// Returns the first stage failure. See [`PipelineError`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn process<T>(raw: &T, schema: Option<&Schema>) -> Result<String>
where
    T: ?Sized + Serialize,
{
    process_with_context(raw, schema, &EncodingContext::default())
}

/// Encodes, validates and renders `raw` under `ctx`.
///
/// # Examples
///
/// ```rust
/// use structured_yaml::{process_with_context, structured, EncodingContext};
///
/// let ctx = EncodingContext::compact();
/// let yaml = process_with_context(&structured!({ "xs": [1, 2, 3] }), None, &ctx).unwrap();
/// assert_eq!(yaml, "xs: [1, 2, 3]\n");
/// ```
///
/// # Errors
///
/// Returns the first stage failure. See [`PipelineError`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn process_with_context<T>(
    raw: &T,
    schema: Option<&Schema>,
    ctx: &EncodingContext,
) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let value = pipeline::encode_stage(raw, ctx)?;
    pipeline::validate_stage(&value, schema, ctx)?;
    pipeline::render_stage(&value, ctx)
}

/// Encodes and validates `raw` without rendering.
///
/// # Errors
///
/// Returns an encode or validate stage error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn check<T>(raw: &T, schema: Option<&Schema>) -> Result<StructuredValue>
where
    T: ?Sized + Serialize,
{
    let ctx = EncodingContext::default();
    let value = pipeline::encode_stage(raw, &ctx)?;
    pipeline::validate_stage(&value, schema, &ctx)?;
    Ok(value)
}

/// Encodes and renders `raw` without schema validation.
///
/// # Examples
///
/// ```rust
/// use structured_yaml::to_yaml;
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert("on", "yes");
/// assert_eq!(to_yaml(&map).unwrap(), "\"on\": \"yes\"\n");
/// ```
///
/// # Errors
///
/// Returns an encode or render stage error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_yaml<T>(raw: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let ctx = EncodingContext::default();
    let value = pipeline::encode_stage(raw, &ctx)?;
    pipeline::render_stage(&value, &ctx)
}

/// Processes `raw` and writes the YAML text to `writer`.
///
/// Nothing is written when a stage fails.
///
/// # Examples
///
/// ```rust
/// use structured_yaml::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &[1, 2], None).unwrap();
/// assert_eq!(buffer, b"- 1\n- 2\n");
/// ```
///
/// # Errors
///
/// Returns a stage error, or [`PipelineError::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, raw: &T, schema: Option<&Schema>) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = process(raw, schema)?;
    pipeline::write_stage(writer, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Address {
        street: String,
        city: String,
        zip: String,
    }

    #[derive(Serialize)]
    struct Profile {
        name: String,
        age: i64,
        address: Address,
    }

    fn profile(age: i64) -> Profile {
        Profile {
            name: "John Doe".to_string(),
            age,
            address: Address {
                street: "123 Main St".to_string(),
                city: "Anytown".to_string(),
                zip: "12345".to_string(),
            },
        }
    }

    #[test]
    fn test_process_nested_struct() {
        assert_eq!(
            process(&profile(30), None).unwrap(),
            "name: John Doe\nage: 30\naddress:\n  street: 123 Main St\n  city: Anytown\n  zip: \"12345\"\n"
        );
    }

    #[test]
    fn test_check_reports_constraint() {
        let schema = Schema::mapping().required("age", Schema::integer().non_negative());
        assert!(check(&profile(30), Some(&schema)).is_ok());

        match check(&profile(-5), Some(&schema)).unwrap_err() {
            PipelineError::Validate(ValidationError::ConstraintViolated { path, rule }) => {
                assert_eq!(path, "age");
                assert_eq!(rule, "non-negative");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_to_yaml_ignores_schema_rules() {
        assert!(to_yaml(&profile(-5)).unwrap().contains("age: -5\n"));
    }

    #[test]
    fn test_unsupported_key_is_encode_error() {
        let mut map = HashMap::new();
        map.insert(vec![1], "x");
        let err = process(&map, None).unwrap_err();
        assert_eq!(err.stage(), Stage::Encode);
    }

    #[test]
    fn test_to_writer_reports_io() {
        struct Broken;

        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = to_writer(Broken, &1, None).unwrap_err();
        assert_eq!(err.stage(), Stage::Output);
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
