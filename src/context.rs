//! Call-scoped configuration shared by the encode, validate and render stages.
//!
//! ## Examples
//!
//! ```rust
//! use structured_yaml::{render_with_context, structured, EncodingContext};
//!
//! let value = structured!({ "tags": ["a", "b"] });
//!
//! // Default: block sequences
//! let block = render_with_context(&value, &EncodingContext::new()).unwrap();
//! assert_eq!(block, "tags:\n  - a\n  - b\n");
//!
//! // Compact: short scalar sequences go inline
//! let compact = render_with_context(&value, &EncodingContext::compact()).unwrap();
//! assert_eq!(compact, "tags: [a, b]\n");
//! ```

/// Default nesting limit for all stages.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for one pipeline call.
///
/// A context holds no state between calls; build one per call or share an
/// immutable one between threads.
///
/// # Examples
///
/// ```rust
/// use structured_yaml::EncodingContext;
///
/// let ctx = EncodingContext::new()
///     .with_indent(4)
///     .with_max_depth(16)
///     .with_non_finite(true);
/// assert_eq!(ctx.indent, 4);
/// assert!(ctx.allow_non_finite);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EncodingContext {
    /// Maximum nesting depth accepted by every stage.
    pub max_depth: usize,
    /// Whether NaN and infinite floats are sound values.
    pub allow_non_finite: bool,
    /// Spaces per nesting level in rendered output.
    pub indent: usize,
    /// Sequences of at most this many scalars render inline (`[a, b]`).
    /// `None` renders every non-empty sequence in block style.
    pub flow_sequence_max_items: Option<usize>,
    /// Inline sequences are only used when their line fits this width.
    pub line_width: usize,
}

impl Default for EncodingContext {
    fn default() -> Self {
        EncodingContext {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_non_finite: false,
            indent: 2,
            flow_sequence_max_items: None,
            line_width: 80,
        }
    }
}

impl EncodingContext {
    /// Creates the default context (block style, 2-space indent, finite floats only).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_yaml::EncodingContext;
    ///
    /// let ctx = EncodingContext::new();
    /// assert_eq!(ctx.indent, 2);
    /// assert_eq!(ctx.flow_sequence_max_items, None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that renders short scalar sequences inline.
    #[must_use]
    pub fn compact() -> Self {
        EncodingContext {
            flow_sequence_max_items: Some(8),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the indentation size. Values below 1 are treated as 1.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    #[must_use]
    pub fn with_non_finite(mut self, allow: bool) -> Self {
        self.allow_non_finite = allow;
        self
    }

    /// Enables inline rendering for scalar sequences of at most `max_items` items.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_yaml::EncodingContext;
    ///
    /// let ctx = EncodingContext::new().with_flow_sequences(3);
    /// assert_eq!(ctx.flow_sequence_max_items, Some(3));
    /// ```
    #[must_use]
    pub fn with_flow_sequences(mut self, max_items: usize) -> Self {
        self.flow_sequence_max_items = Some(max_items);
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }
}
