//! The encode, validate, render pipeline.
//!
//! A [`Pipeline`] bundles an [`EncodingContext`] with an optional [`Schema`]
//! so the same configuration can be reused across calls. It holds no state
//! between runs and is `Send + Sync`, so one pipeline can serve many threads.
//!
//! ```rust
//! use serde::Serialize;
//! use structured_yaml::{Pipeline, Schema, Stage};
//!
//! #[derive(Serialize)]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! let pipeline = Pipeline::new()
//!     .with_schema(Schema::mapping().required("age", Schema::integer().non_negative()));
//!
//! let ok = Person { name: "Ann".into(), age: 41 };
//! assert_eq!(pipeline.run(&ok).unwrap(), "name: Ann\nage: 41\n");
//!
//! let bad = Person { name: "Bob".into(), age: -1 };
//! assert_eq!(pipeline.run(&bad).unwrap_err().stage(), Stage::Validate);
//! ```

use crate::{
    encode::encode_with_context, render::render_with_context, validate::validate_with_context,
    EncodingContext, PipelineError, Result, Schema, StructuredValue,
};
use serde::Serialize;
use std::io;

/// Reusable pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    context: EncodingContext,
    schema: Option<Schema>,
}

impl Pipeline {
    /// A pipeline with the default context and no schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: EncodingContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn context(&self) -> &EncodingContext {
        &self.context
    }

    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Encodes, validates and renders `raw`, returning the YAML text.
    ///
    /// # Errors
    ///
    /// Returns the first failure wrapped in a
    /// [`PipelineError`](crate::PipelineError) naming its stage. Later
    /// stages do not run after a failure.
    pub fn run<T>(&self, raw: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        let value = self.check(raw)?;
        render_stage(&value, &self.context)
    }

    /// Encodes and validates `raw` without rendering it.
    ///
    /// # Errors
    ///
    /// Returns an encode or validate stage error.
    pub fn check<T>(&self, raw: &T) -> Result<StructuredValue>
    where
        T: ?Sized + Serialize,
    {
        let value = encode_stage(raw, &self.context)?;
        validate_stage(&value, self.schema.as_ref(), &self.context)?;
        Ok(value)
    }

    /// Encodes and renders `raw`, skipping validation.
    ///
    /// Non-finite floats still fail at the render stage unless the context
    /// allows them.
    ///
    /// # Errors
    ///
    /// Returns an encode or render stage error.
    pub fn to_yaml<T>(&self, raw: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        let value = encode_stage(raw, &self.context)?;
        render_stage(&value, &self.context)
    }

    /// Runs the pipeline and writes the YAML text to `writer`.
    ///
    /// # Errors
    ///
    /// Returns a stage error, or an output stage error when writing fails.
    pub fn run_to_writer<W, T>(&self, writer: W, raw: &T) -> Result<()>
    where
        W: io::Write,
        T: ?Sized + Serialize,
    {
        let text = self.run(raw)?;
        write_stage(writer, &text)
    }
}

pub(crate) fn encode_stage<T>(raw: &T, ctx: &EncodingContext) -> Result<StructuredValue>
where
    T: ?Sized + Serialize,
{
    let value = encode_with_context(raw, ctx).map_err(|err| failed(err.into()))?;
    tracing::debug!(stage = "encode", kind = value.kind(), "value encoded");
    Ok(value)
}

pub(crate) fn validate_stage(
    value: &StructuredValue,
    schema: Option<&Schema>,
    ctx: &EncodingContext,
) -> Result<()> {
    validate_with_context(value, schema, ctx).map_err(|err| failed(err.into()))?;
    tracing::debug!(stage = "validate", schema = schema.is_some(), "value validated");
    Ok(())
}

pub(crate) fn render_stage(value: &StructuredValue, ctx: &EncodingContext) -> Result<String> {
    let text = render_with_context(value, ctx).map_err(|err| failed(err.into()))?;
    tracing::debug!(stage = "render", bytes = text.len(), "value rendered");
    Ok(text)
}

pub(crate) fn write_stage<W: io::Write>(mut writer: W, text: &str) -> Result<()> {
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|err| failed(err.into()))?;
    tracing::debug!(stage = "output", bytes = text.len(), "text written");
    Ok(())
}

fn failed(err: PipelineError) -> PipelineError {
    tracing::debug!(stage = %err.stage(), error = %err, "pipeline failed");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{host::Node, structured, Stage};

    #[test]
    fn test_pipeline_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }

    #[test]
    fn test_run_without_schema() {
        let pipeline = Pipeline::new();
        assert_eq!(pipeline.run(&vec![1, 2]).unwrap(), "- 1\n- 2\n");
    }

    #[test]
    fn test_stage_of_each_failure() {
        let looped = Node::list();
        looped.push(looped.clone());
        assert_eq!(
            Pipeline::new().run(&looped).unwrap_err().stage(),
            Stage::Encode
        );

        assert_eq!(
            Pipeline::new().run(&f64::NAN).unwrap_err().stage(),
            Stage::Validate
        );

        let strict = Pipeline::new().with_schema(Schema::string());
        assert_eq!(strict.run(&1).unwrap_err().stage(), Stage::Validate);

        let err = Pipeline::new()
            .to_yaml(&structured!([(f64::NAN)]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Render(_)));
    }

    #[test]
    fn test_context_applies_to_every_stage() {
        let pipeline = Pipeline::new().with_context(EncodingContext::new().with_max_depth(1));
        assert_eq!(pipeline.run(&vec![1]).unwrap(), "- 1\n");
        assert_eq!(
            pipeline.run(&vec![vec![1]]).unwrap_err().stage(),
            Stage::Encode
        );
        assert_eq!(
            pipeline.to_yaml(&structured!([[1]])).unwrap_err().stage(),
            Stage::Encode
        );

        let lenient = Pipeline::new().with_context(EncodingContext::new().with_non_finite(true));
        assert_eq!(lenient.run(&f64::INFINITY).unwrap(), ".inf\n");
    }

    #[test]
    fn test_to_yaml_skips_schema() {
        let strict = Pipeline::new().with_schema(Schema::string());
        assert_eq!(strict.to_yaml(&1).unwrap(), "1\n");
    }

    #[test]
    fn test_run_to_writer() {
        let mut out = Vec::new();
        Pipeline::new()
            .run_to_writer(&mut out, &structured!({ "a": 1 }))
            .unwrap();
        assert_eq!(out, b"a: 1\n");
    }

    #[test]
    fn test_check_returns_value() {
        let value = Pipeline::new().check(&("x", 2)).unwrap();
        assert_eq!(value, structured!(["x", 2]));
    }
}
