//! A dynamic, shared, mutable object graph.
//!
//! Plain Rust data cannot contain cycles, but application object graphs built
//! from `Rc<RefCell<_>>` can. [`Node`] is such a graph: a cheap-to-clone handle
//! to a list, map or scalar whose children are again `Node`s, so a node can be
//! inserted into itself or into one of its descendants.
//!
//! `Node` implements [`Serialize`]. While a node is being serialized it is
//! marked as in progress; meeting it again before it finishes means the graph
//! loops, and the node reports that to the serializer instead of recursing.
//! The encoder turns the report into
//! [`EncodeError::CyclicReference`](crate::EncodeError::CyclicReference).
//! A node shared by two parents without a loop encodes twice, normally.
//!
//! ```rust
//! use structured_yaml::{encode, host::Node, EncodeError};
//!
//! let root = Node::map();
//! root.insert("name", Node::from("loop"));
//! root.insert("self", root.clone());
//!
//! let err = encode(&root).unwrap_err();
//! assert!(matches!(err, EncodeError::CyclicReference { .. }));
//! assert_eq!(err.path().to_string(), "self");
//! ```

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Unit-struct name a node serializes as when it is reached through a cycle.
pub(crate) const CYCLE_TOKEN: &str = "$structured_yaml::private::Cycle";

/// Newtype-struct name an opaque node serializes as; the payload describes it.
pub(crate) const OPAQUE_TOKEN: &str = "$structured_yaml::private::Opaque";

/// The contents of a [`Node`].
#[derive(Debug)]
pub enum NodeData {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Node>),
    /// Entries in insertion order. Keys are not deduplicated here; the encoder
    /// rejects repeats.
    Map(Vec<(String, Node)>),
    /// A host value with no structured form, such as a callback or a handle.
    Opaque(String),
}

struct NodeCell {
    data: RefCell<NodeData>,
    in_progress: Cell<bool>,
}

/// A shared handle to one vertex of a host object graph.
#[derive(Clone)]
pub struct Node(Rc<NodeCell>);

impl Node {
    pub fn new(data: NodeData) -> Self {
        Node(Rc::new(NodeCell {
            data: RefCell::new(data),
            in_progress: Cell::new(false),
        }))
    }

    pub fn null() -> Self {
        Node::new(NodeData::Null)
    }

    /// An empty list node.
    pub fn list() -> Self {
        Node::new(NodeData::List(Vec::new()))
    }

    /// An empty map node.
    pub fn map() -> Self {
        Node::new(NodeData::Map(Vec::new()))
    }

    /// An opaque host value described by `description`.
    pub fn opaque(description: &str) -> Self {
        Node::new(NodeData::Opaque(description.to_string()))
    }

    /// Appends `child` if this node is a list. Returns `false` otherwise.
    pub fn push(&self, child: Node) -> bool {
        match &mut *self.0.data.borrow_mut() {
            NodeData::List(items) => {
                items.push(child);
                true
            }
            _ => false,
        }
    }

    /// Appends an entry if this node is a map. Returns `false` otherwise.
    pub fn insert(&self, key: &str, child: Node) -> bool {
        match &mut *self.0.data.borrow_mut() {
            NodeData::Map(entries) => {
                entries.push((key.to_string(), child));
                true
            }
            _ => false,
        }
    }

    /// Replaces the node's contents, keeping its identity.
    pub fn set(&self, data: NodeData) {
        *self.0.data.borrow_mut() = data;
    }

    /// Returns `true` if both handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Clears the in-progress mark when serialization of a node ends, including
/// on early return through `?`.
struct InProgress<'a>(&'a Cell<bool>);

impl<'a> InProgress<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(InProgress(flag))
        }
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let Some(_guard) = InProgress::enter(&self.0.in_progress) else {
            tracing::trace!("host graph re-entered a node in progress");
            return serializer.serialize_unit_struct(CYCLE_TOKEN);
        };

        match &*self.0.data.borrow() {
            NodeData::Null => serializer.serialize_unit(),
            NodeData::Bool(b) => serializer.serialize_bool(*b),
            NodeData::Int(i) => serializer.serialize_i64(*i),
            NodeData::Float(f) => serializer.serialize_f64(*f),
            NodeData::Str(s) => serializer.serialize_str(s),
            NodeData::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            NodeData::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            NodeData::Opaque(description) => {
                serializer.serialize_newtype_struct(OPAQUE_TOKEN, description)
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printing the contents could loop forever.
        match &*self.0.data.borrow() {
            NodeData::List(items) => write!(f, "Node(list of {})", items.len()),
            NodeData::Map(entries) => write!(f, "Node(map of {})", entries.len()),
            scalar => write!(f, "Node({:?})", scalar),
        }
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::new(NodeData::Bool(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::new(NodeData::Int(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::new(NodeData::Int(value as i64))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::new(NodeData::Float(value))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::new(NodeData::Str(value.to_string()))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::new(NodeData::Str(value))
    }
}
