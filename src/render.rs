//! YAML text rendering.
//!
//! The renderer turns a [`StructuredValue`] tree into YAML block style:
//!
//! - **Mappings**: `key: value` lines in insertion order; nested collections
//!   start on the next line, one indentation step deeper
//! - **Sequences**: `- item` lines; a mapping item puts its first key on the
//!   dash line and aligns the rest under it
//! - **Flow sequences**: with [`EncodingContext::with_flow_sequences`], short
//!   sequences of scalars that fit the line width render as `[a, b]`
//! - **Quote minimization**: strings stay plain unless a YAML reader would
//!   see something other than the same string
//!
//! Output always ends with a newline.
//!
//! ```rust
//! use structured_yaml::{render, structured};
//!
//! let value = structured!({
//!     "name": "John Doe",
//!     "zip": "12345",
//!     "tags": [],
//!     "owner": {"id": 7}
//! });
//! assert_eq!(
//!     render(&value).unwrap(),
//!     "name: John Doe\nzip: \"12345\"\ntags: []\nowner:\n  id: 7\n"
//! );
//! ```

use crate::path::{Path, Segment};
use crate::{EncodingContext, RenderError, StructuredMap, StructuredValue};

type Result<T> = std::result::Result<T, RenderError>;

/// Longest key a reader accepts in implicit `key: value` form. Longer keys
/// are written as explicit `? key` entries.
const MAX_IMPLICIT_KEY_CHARS: usize = 1024;

/// Renders `value` with the default [`EncodingContext`].
///
/// # Errors
///
/// See [`render_with_context`].
pub fn render(value: &StructuredValue) -> Result<String> {
    render_with_context(value, &EncodingContext::default())
}

/// Renders `value` as YAML under `ctx`.
///
/// # Errors
///
/// - [`RenderError::UnrepresentableValue`] for a NaN or infinite float when
///   the context does not allow them
/// - [`RenderError::DepthLimitExceeded`] when collections nest to
///   `ctx.max_depth` or deeper
pub fn render_with_context(value: &StructuredValue, ctx: &EncodingContext) -> Result<String> {
    let mut renderer = Renderer {
        out: String::with_capacity(256),
        ctx,
        path: Vec::new(),
    };
    renderer.write_node(value, 0, 0)?;
    renderer.out.push('\n');
    Ok(renderer.out)
}

struct Renderer<'a> {
    out: String,
    ctx: &'a EncodingContext,
    path: Vec<Segment>,
}

impl Renderer<'_> {
    fn here(&self) -> Path {
        Path::from(self.path.clone())
    }

    fn within(
        &mut self,
        segment: Segment,
        write: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.path.push(segment);
        let result = write(self);
        self.path.pop();
        result
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.ctx.max_depth {
            return Err(RenderError::DepthLimitExceeded {
                path: self.here(),
                limit: self.ctx.max_depth,
            });
        }
        Ok(())
    }

    fn newline(&mut self, col: usize) {
        self.out.push('\n');
        self.out.extend(std::iter::repeat(' ').take(col));
    }

    fn line_len(&self) -> usize {
        match self.out.rfind('\n') {
            Some(pos) => self.out[pos + 1..].chars().count(),
            None => self.out.chars().count(),
        }
    }

    /// Writes `value` with the cursor already at column `col` of the current
    /// line.
    fn write_node(&mut self, value: &StructuredValue, col: usize, depth: usize) -> Result<()> {
        match value {
            StructuredValue::Sequence(items) => {
                self.enter(depth)?;
                if items.is_empty() {
                    self.out.push_str("[]");
                } else if let Some(flow) = self.flow_sequence(items, 0)? {
                    self.out.push_str(&flow);
                } else {
                    self.write_block_sequence(items, col, depth)?;
                }
                Ok(())
            }
            StructuredValue::Mapping(map) => {
                self.enter(depth)?;
                if map.is_empty() {
                    self.out.push_str("{}");
                    Ok(())
                } else {
                    self.write_block_mapping(map, col, depth)
                }
            }
            scalar => {
                let text = self.scalar_text(scalar, false)?;
                self.out.push_str(&text);
                Ok(())
            }
        }
    }

    fn write_block_mapping(&mut self, map: &StructuredMap, col: usize, depth: usize) -> Result<()> {
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 {
                self.newline(col);
            }
            let mut key_text = String::new();
            write_string(&mut key_text, key, false);
            if key_text.chars().count() > MAX_IMPLICIT_KEY_CHARS {
                self.out.push_str("? ");
                self.out.push_str(&key_text);
                self.newline(col);
            } else {
                self.out.push_str(&key_text);
            }
            self.out.push(':');
            self.within(Segment::Key(key.clone()), |r| {
                r.write_entry_value(value, col, depth + 1)
            })?;
        }
        Ok(())
    }

    /// Writes a mapping value right after its `key:`.
    fn write_entry_value(&mut self, value: &StructuredValue, col: usize, depth: usize) -> Result<()> {
        let nested = col + self.ctx.indent;
        match value {
            StructuredValue::Sequence(items) if !items.is_empty() => {
                self.enter(depth)?;
                if let Some(flow) = self.flow_sequence(items, 1)? {
                    self.out.push(' ');
                    self.out.push_str(&flow);
                    Ok(())
                } else {
                    self.newline(nested);
                    self.write_block_sequence(items, nested, depth)
                }
            }
            StructuredValue::Mapping(map) if !map.is_empty() => {
                self.enter(depth)?;
                self.newline(nested);
                self.write_block_mapping(map, nested, depth)
            }
            _ => {
                self.out.push(' ');
                self.write_node(value, col, depth)
            }
        }
    }

    fn write_block_sequence(
        &mut self,
        items: &[StructuredValue],
        col: usize,
        depth: usize,
    ) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.newline(col);
            }
            self.out.push_str("- ");
            self.within(Segment::Index(i), |r| r.write_node(item, col + 2, depth + 1))?;
        }
        Ok(())
    }

    /// Returns the inline form of `items` when the context enables flow
    /// sequences, every item is a scalar, and the line stays within
    /// `line_width` after `gap` more characters.
    fn flow_sequence(&mut self, items: &[StructuredValue], gap: usize) -> Result<Option<String>> {
        let Some(max_items) = self.ctx.flow_sequence_max_items else {
            return Ok(None);
        };
        if items.len() > max_items || !items.iter().all(StructuredValue::is_scalar) {
            return Ok(None);
        }

        let mut flow = String::from("[");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                flow.push_str(", ");
            }
            self.path.push(Segment::Index(i));
            let text = self.scalar_text(item, true);
            self.path.pop();
            flow.push_str(&text?);
        }
        flow.push(']');

        if self.line_len() + gap + flow.chars().count() > self.ctx.line_width {
            return Ok(None);
        }
        Ok(Some(flow))
    }

    fn scalar_text(&self, value: &StructuredValue, in_flow: bool) -> Result<String> {
        let mut text = String::new();
        match value {
            StructuredValue::Null => text.push_str("null"),
            StructuredValue::Bool(b) => text.push_str(if *b { "true" } else { "false" }),
            StructuredValue::Number(n) => {
                if !n.is_finite() && !self.ctx.allow_non_finite {
                    return Err(RenderError::UnrepresentableValue {
                        path: self.here(),
                        reason: format!("non-finite float {}", n),
                    });
                }
                text.push_str(&n.to_string());
            }
            StructuredValue::String(s) => write_string(&mut text, s, in_flow),
            // Collections never reach here; `write_node` dispatches them.
            StructuredValue::Sequence(_) | StructuredValue::Mapping(_) => {}
        }
        Ok(text)
    }
}

fn write_string(out: &mut String, s: &str, in_flow: bool) {
    if needs_quotes(s, in_flow) {
        out.push('"');
        for ch in s.chars() {
            match ch {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\0' => out.push_str("\\0"),
                c if needs_escape(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
                c => out.push(c),
            }
        }
        out.push('"');
    } else {
        out.push_str(s);
    }
}

/// Characters outside YAML's printable set, plus line separators and the
/// byte order mark.
#[inline]
fn needs_escape(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{2028}' | '\u{2029}' | '\u{FEFF}' | '\u{FFFE}' | '\u{FFFF}'
        )
}

fn needs_quotes(s: &str, in_flow: bool) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };

    // Surrounding whitespace would be trimmed
    if s.starts_with(' ') || s.ends_with(' ') {
        return true;
    }

    if s.chars().any(needs_escape) {
        return true;
    }

    // Null, booleans (including YAML 1.1 spellings) and merge keys
    if matches!(
        s.to_ascii_lowercase().as_str(),
        "~" | "null" | "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n" | "<<"
    ) {
        return true;
    }

    if looks_numeric(s) {
        return true;
    }

    // Indicator characters cannot start a plain scalar
    if matches!(
        first,
        '-' | '?'
            | ':'
            | ','
            | '['
            | ']'
            | '{'
            | '}'
            | '#'
            | '&'
            | '*'
            | '!'
            | '|'
            | '>'
            | '\''
            | '"'
            | '%'
            | '@'
            | '`'
    ) {
        return true;
    }

    if s.contains(':') || s.contains(" #") {
        return true;
    }

    // Document markers and the YAML 1.1 value key
    if s.starts_with("...") || s == "=" {
        return true;
    }

    in_flow && s.contains([',', '[', ']', '{', '}'])
}

/// Returns `true` for text a YAML reader could resolve to a number: decimal,
/// hex, octal, binary, underscored or sexagesimal integers, floats, and the
/// `.inf`/`.nan` spellings.
fn looks_numeric(s: &str) -> bool {
    if s.parse::<f64>().is_ok() {
        return true;
    }

    let lower = s.to_ascii_lowercase();
    if matches!(lower.as_str(), ".inf" | "+.inf" | "-.inf" | ".nan") {
        return true;
    }

    let unsigned = lower.strip_prefix(['+', '-']).unwrap_or(&lower);
    let unsigned = unsigned.strip_prefix('.').unwrap_or(unsigned);
    unsigned.starts_with(|c: char| c.is_ascii_digit())
        && unsigned
            .chars()
            .all(|c| c.is_ascii_hexdigit() || matches!(c, '_' | ':' | '.' | 'x' | 'o' | '+' | '-'))
}
