//! Error types for the encode, validate and render stages.
//!
//! Each stage has its own error enum so callers that use a stage directly get
//! a precise type. The pipeline wraps whichever stage failed first in
//! [`PipelineError`], which also reports the failing [`Stage`].
//!
//! ## Error Categories
//!
//! - **Encode**: the input has a shape with no structured form (opaque host
//!   values, non-scalar map keys), a cycle, a duplicate key, or is nested too deeply
//! - **Validate**: the value is structurally unsound (non-finite floats, depth)
//!   or breaks a schema constraint
//! - **Render**: the value has no textual form under the current context
//!
//! All variants carry the [`Path`] of the offending node.
//!
//! ## Examples
//!
//! ```rust
//! use structured_yaml::{process, Schema, Stage};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Person { age: i32 }
//!
//! let schema = Schema::mapping().required("age", Schema::integer().non_negative());
//! let err = process(&Person { age: -5 }, Some(&schema)).unwrap_err();
//! assert_eq!(err.stage(), Stage::Validate);
//! assert!(err.to_string().contains("non-negative"));
//! ```

use crate::path::{Path, Segment};
use std::fmt;
use thiserror::Error;

/// Failure while encoding an input into a [`StructuredValue`](crate::StructuredValue).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// The input contains a value with no structured representation
    #[error("unsupported type at {path}: {kind}")]
    UnsupportedType { path: Path, kind: String },

    /// The input graph refers back to one of its own ancestors
    #[error("cyclic reference at {path}")]
    CyclicReference { path: Path },

    /// A mapping key occurs twice
    #[error("duplicate key {key:?} at {path}")]
    DuplicateKey { path: Path, key: String },

    /// The input nests deeper than the context allows
    #[error("nesting exceeds depth limit of {limit} at {path}")]
    DepthLimitExceeded { path: Path, limit: usize },

    /// Error raised by a `Serialize` implementation
    #[error("{message} (at {path})")]
    Custom { path: Path, message: String },
}

impl EncodeError {
    pub fn unsupported_type(kind: &str) -> Self {
        EncodeError::UnsupportedType {
            path: Path::root(),
            kind: kind.to_string(),
        }
    }

    pub fn cyclic_reference() -> Self {
        EncodeError::CyclicReference { path: Path::root() }
    }

    pub fn duplicate_key(key: &str) -> Self {
        EncodeError::DuplicateKey {
            path: Path::root(),
            key: key.to_string(),
        }
    }

    pub fn depth_limit(limit: usize) -> Self {
        EncodeError::DepthLimitExceeded {
            path: Path::root(),
            limit,
        }
    }

    /// The location of the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            EncodeError::UnsupportedType { path, .. }
            | EncodeError::CyclicReference { path }
            | EncodeError::DuplicateKey { path, .. }
            | EncodeError::DepthLimitExceeded { path, .. }
            | EncodeError::Custom { path, .. } => path,
        }
    }

    /// Prefixes the error's path with `segment`; called by each enclosing
    /// collection as the error propagates outwards.
    #[must_use]
    pub fn at(mut self, segment: Segment) -> Self {
        match &mut self {
            EncodeError::UnsupportedType { path, .. }
            | EncodeError::CyclicReference { path }
            | EncodeError::DuplicateKey { path, .. }
            | EncodeError::DepthLimitExceeded { path, .. }
            | EncodeError::Custom { path, .. } => path.push_front(segment),
        }
        self
    }
}

impl serde::ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::Custom {
            path: Path::root(),
            message: msg.to_string(),
        }
    }
}

/// Failure while validating a [`StructuredValue`](crate::StructuredValue).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The tree is unsound regardless of any schema
    #[error("structural error at {path}: {reason}")]
    StructuralError { path: Path, reason: String },

    /// The tree breaks a schema rule
    #[error("constraint violated at {path}: {rule}")]
    ConstraintViolated { path: Path, rule: String },
}

impl ValidationError {
    pub fn structural(path: Path, reason: &str) -> Self {
        ValidationError::StructuralError {
            path,
            reason: reason.to_string(),
        }
    }

    pub fn violated(path: Path, rule: impl fmt::Display) -> Self {
        ValidationError::ConstraintViolated {
            path,
            rule: rule.to_string(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ValidationError::StructuralError { path, .. }
            | ValidationError::ConstraintViolated { path, .. } => path,
        }
    }
}

/// Failure while rendering a [`StructuredValue`](crate::StructuredValue) to text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The value has no textual mapping under the current context
    #[error("unrepresentable value at {path}: {reason}")]
    UnrepresentableValue { path: Path, reason: String },

    /// The tree nests deeper than the context allows
    #[error("nesting exceeds depth limit of {limit} at {path}")]
    DepthLimitExceeded { path: Path, limit: usize },
}

impl RenderError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            RenderError::UnrepresentableValue { path, .. }
            | RenderError::DepthLimitExceeded { path, .. } => path,
        }
    }
}

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Encode,
    Validate,
    Render,
    /// Writing the rendered text to an `io::Write`.
    Output,
}

impl Stage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Stage::Encode => "encode",
            Stage::Validate => "validate",
            Stage::Render => "render",
            Stage::Output => "output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first failure of a pipeline run, tagged with the stage that produced it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("encode stage failed: {0}")]
    Encode(#[source] EncodeError),

    #[error("validate stage failed: {0}")]
    Validate(#[source] ValidationError),

    #[error("render stage failed: {0}")]
    Render(#[source] RenderError),

    #[error("output stage failed: {0}")]
    Io(#[source] std::io::Error),
}

impl PipelineError {
    /// The stage that failed.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            PipelineError::Encode(_) => Stage::Encode,
            PipelineError::Validate(_) => Stage::Validate,
            PipelineError::Render(_) => Stage::Render,
            PipelineError::Io(_) => Stage::Output,
        }
    }
}

impl From<EncodeError> for PipelineError {
    fn from(err: EncodeError) -> Self {
        PipelineError::Encode(err)
    }
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        PipelineError::Validate(err)
    }
}

impl From<RenderError> for PipelineError {
    fn from(err: RenderError) -> Self {
        PipelineError::Render(err)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
