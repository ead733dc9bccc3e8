//! Locations inside a value tree.
//!
//! Every error reported by the encoder, validator and renderer carries a
//! [`Path`] pointing at the offending node. Paths display in the familiar
//! dotted/indexed form:
//!
//! ```rust
//! use structured_yaml::{Path, Segment};
//!
//! let path = Path::root()
//!     .child(Segment::key("hobbies"))
//!     .child(Segment::Index(1));
//! assert_eq!(path.to_string(), "hobbies[1]");
//! assert_eq!(Path::root().to_string(), "<root>");
//! ```

use std::fmt;

/// One step from a parent node to a child.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

impl Segment {
    /// Shorthand for `Segment::Key(key.to_string())`.
    pub fn key(key: impl Into<String>) -> Self {
        Segment::Key(key.into())
    }
}

/// A location in a [`StructuredValue`](crate::StructuredValue) tree, outermost segment first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path, pointing at the root of the tree.
    #[must_use]
    pub const fn root() -> Self {
        Path(Vec::new())
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path extended by `segment`.
    #[must_use]
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Path(segments)
    }

    /// Prepends `segment`. Used while unwinding out of nested encoders, where
    /// the innermost location is known first.
    pub fn push_front(&mut self, segment: Segment) {
        self.0.insert(0, segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if is_bare_key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Segment::Key(key) => write!(f, "[{:?}]", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Keys that would read as path syntax are shown bracketed and quoted.
fn is_bare_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['.', '[', ']', '"'])
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path(segments)
    }
}

impl PartialEq<str> for Path {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mixed_segments() {
        let path = Path::from(vec![
            Segment::key("users"),
            Segment::Index(0),
            Segment::key("address"),
            Segment::key("city"),
        ]);
        assert_eq!(path.to_string(), "users[0].address.city");
    }

    #[test]
    fn test_leading_index() {
        let path = Path::root().child(Segment::Index(3)).child(Segment::key("id"));
        assert_eq!(path.to_string(), "[3].id");
    }

    #[test]
    fn test_push_front_builds_outermost_first() {
        let mut path = Path::root().child(Segment::key("zip"));
        path.push_front(Segment::key("address"));
        assert_eq!(path, "address.zip");
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_keys_with_path_syntax_are_bracketed() {
        let dotted = Path::from(vec![Segment::key("a.b"), Segment::key("c")]);
        assert_eq!(dotted.to_string(), "[\"a.b\"].c");

        let nested = Path::from(vec![Segment::key("a"), Segment::key("b"), Segment::key("c")]);
        assert_ne!(nested.to_string(), dotted.to_string());

        let path = Path::from(vec![
            Segment::key("x"),
            Segment::key("x[0]"),
            Segment::key(""),
            Segment::Index(1),
        ]);
        assert_eq!(path.to_string(), "x[\"x[0]\"][\"\"][1]");
    }
}
