//! Encoding any `Serialize` value into a [`StructuredValue`].
//!
//! [`ValueSerializer`] is a serde [`Serializer`](serde::Serializer) whose output
//! is a [`StructuredValue`] tree. It maps the serde data model as follows:
//!
//! | serde shape | structured value |
//! |-------------|------------------|
//! | bool | `Bool` |
//! | integers | `Number::Integer`, or `Number::BigInt` outside `i64` |
//! | floats | `Number::Float` |
//! | char, str | `String` |
//! | bytes | `Sequence` of integers |
//! | unit, none, unit struct | `Null` |
//! | some, newtype struct | the inner value |
//! | unit variant | `String` with the variant name |
//! | seq, tuple, tuple struct | `Sequence` |
//! | map, struct | `Mapping` |
//! | newtype, tuple, struct variant | single-entry `Mapping` keyed by variant name |
//!
//! Mapping keys must be strings, chars, integers or bools; anything else is
//! an [`EncodeError::UnsupportedType`]. Errors carry the path of the node that
//! failed.
//!
//! ## Examples
//!
//! ```rust
//! use structured_yaml::{encode, StructuredValue};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! enum Shape { Circle { r: f64 }, Empty }
//!
//! let value = encode(&vec![Shape::Circle { r: 1.5 }, Shape::Empty]).unwrap();
//! let items = value.as_sequence().unwrap();
//! assert_eq!(items[0].get("Circle").and_then(|c| c.get("r")), Some(&StructuredValue::from(1.5)));
//! assert_eq!(items[1], StructuredValue::from("Empty"));
//! ```

use crate::host::{CYCLE_TOKEN, OPAQUE_TOKEN};
use crate::path::Segment;
use crate::{EncodeError, EncodingContext, Number, StructuredMap, StructuredValue};
use serde::{ser, Serialize};

type Result<T> = std::result::Result<T, EncodeError>;

/// Encodes `raw` with the default [`EncodingContext`].
///
/// # Errors
///
/// Returns an [`EncodeError`] if the input contains an unsupported shape, a
/// cycle, a duplicate key, or nests deeper than the depth limit.
pub fn encode<T>(raw: &T) -> Result<StructuredValue>
where
    T: ?Sized + Serialize,
{
    encode_with_context(raw, &EncodingContext::default())
}

/// Encodes `raw` under `ctx`.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_with_context<T>(raw: &T, ctx: &EncodingContext) -> Result<StructuredValue>
where
    T: ?Sized + Serialize,
{
    raw.serialize(ValueSerializer::new(ctx))
}

/// A serializer producing [`StructuredValue`]s.
///
/// The serializer tracks how many collections enclose the value it is
/// producing so it can stop runaway recursion at the context's depth limit.
#[derive(Clone, Copy)]
pub struct ValueSerializer<'a> {
    ctx: &'a EncodingContext,
    depth: usize,
}

impl<'a> ValueSerializer<'a> {
    pub fn new(ctx: &'a EncodingContext) -> Self {
        ValueSerializer { ctx, depth: 0 }
    }

    /// Serializer for the children of a collection opened at this depth.
    fn nested(self) -> Result<ValueSerializer<'a>> {
        if self.depth >= self.ctx.max_depth {
            return Err(EncodeError::depth_limit(self.ctx.max_depth));
        }
        Ok(ValueSerializer {
            ctx: self.ctx,
            depth: self.depth + 1,
        })
    }

    fn seq(self, capacity: usize) -> Result<SerializeVec<'a>> {
        Ok(SerializeVec {
            child: self.nested()?,
            items: Vec::with_capacity(capacity),
        })
    }

    fn map(self, capacity: usize) -> Result<SerializeMap<'a>> {
        Ok(SerializeMap {
            child: self.nested()?,
            map: StructuredMap::with_capacity(capacity),
            current_key: None,
        })
    }

    /// Wraps a variant's payload in a single-entry mapping.
    fn variant(self, variant: &str, payload: StructuredValue) -> StructuredValue {
        let mut map = StructuredMap::with_capacity(1);
        map.insert(variant.to_string(), payload);
        StructuredValue::Mapping(map)
    }

    fn key(self, value: StructuredValue) -> Result<String> {
        match value {
            StructuredValue::String(s) => Ok(s),
            StructuredValue::Number(n) if n.is_integer() => Ok(n.to_string()),
            StructuredValue::Bool(b) => Ok(b.to_string()),
            other => Err(EncodeError::unsupported_type(&format!(
                "{} as mapping key",
                other.kind()
            ))),
        }
    }
}

impl<'a> ser::Serializer for ValueSerializer<'a> {
    type Ok = StructuredValue;
    type Error = EncodeError;

    type SerializeSeq = SerializeVec<'a>;
    type SerializeTuple = SerializeVec<'a>;
    type SerializeTupleStruct = SerializeVec<'a>;
    type SerializeTupleVariant = SerializeTupleVariant<'a>;
    type SerializeMap = SerializeMap<'a>;
    type SerializeStruct = SerializeMap<'a>;
    type SerializeStructVariant = SerializeStructVariant<'a>;

    fn serialize_bool(self, v: bool) -> Result<StructuredValue> {
        Ok(StructuredValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<StructuredValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<StructuredValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<StructuredValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<StructuredValue> {
        Ok(StructuredValue::Number(Number::Integer(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<StructuredValue> {
        Ok(StructuredValue::Number(Number::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<StructuredValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u16(self, v: u16) -> Result<StructuredValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u32(self, v: u32) -> Result<StructuredValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u64(self, v: u64) -> Result<StructuredValue> {
        Ok(StructuredValue::Number(Number::from(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<StructuredValue> {
        Ok(StructuredValue::Number(Number::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<StructuredValue> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<StructuredValue> {
        Ok(StructuredValue::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<StructuredValue> {
        Ok(StructuredValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<StructuredValue> {
        Ok(StructuredValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<StructuredValue> {
        self.nested()?;
        let items = v
            .iter()
            .map(|&b| StructuredValue::Number(Number::Integer(b as i64)))
            .collect();
        Ok(StructuredValue::Sequence(items))
    }

    fn serialize_none(self) -> Result<StructuredValue> {
        Ok(StructuredValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<StructuredValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<StructuredValue> {
        Ok(StructuredValue::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<StructuredValue> {
        if name == CYCLE_TOKEN {
            return Err(EncodeError::cyclic_reference());
        }
        Ok(StructuredValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<StructuredValue> {
        Ok(StructuredValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<StructuredValue>
    where
        T: ?Sized + Serialize,
    {
        if name == OPAQUE_TOKEN {
            let kind = match value.serialize(self)? {
                StructuredValue::String(description) => description,
                other => other.kind().to_string(),
            };
            return Err(EncodeError::UnsupportedType {
                path: crate::Path::root(),
                kind,
            });
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<StructuredValue>
    where
        T: ?Sized + Serialize,
    {
        let payload = value
            .serialize(self.nested()?)
            .map_err(|e| e.at(Segment::key(variant)))?;
        Ok(self.variant(variant, payload))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec<'a>> {
        self.seq(len.unwrap_or(0))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec<'a>> {
        self.seq(len)
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec<'a>> {
        self.seq(len)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant<'a>> {
        // The wrapping mapping is one level, the payload sequence another.
        let items = self.nested()?.seq(len)?;
        Ok(SerializeTupleVariant {
            outer: self,
            variant,
            items,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap<'a>> {
        self.map(len.unwrap_or(0))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap<'a>> {
        self.map(len)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant<'a>> {
        let fields = self.nested()?.map(len)?;
        Ok(SerializeStructVariant {
            outer: self,
            variant,
            fields,
        })
    }
}

pub struct SerializeVec<'a> {
    child: ValueSerializer<'a>,
    items: Vec<StructuredValue>,
}

impl SerializeVec<'_> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let index = self.items.len();
        let item = value
            .serialize(self.child)
            .map_err(|e| e.at(Segment::Index(index)))?;
        self.items.push(item);
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeVec<'_> {
    type Ok = StructuredValue;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<StructuredValue> {
        Ok(StructuredValue::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec<'_> {
    type Ok = StructuredValue;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<StructuredValue> {
        Ok(StructuredValue::Sequence(self.items))
    }
}

impl ser::SerializeTupleStruct for SerializeVec<'_> {
    type Ok = StructuredValue;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<StructuredValue> {
        Ok(StructuredValue::Sequence(self.items))
    }
}

pub struct SerializeMap<'a> {
    child: ValueSerializer<'a>,
    map: StructuredMap,
    current_key: Option<String>,
}

impl SerializeMap<'_> {
    fn entry<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if self.map.contains_key(&key) {
            return Err(EncodeError::duplicate_key(&key));
        }
        let value = value
            .serialize(self.child)
            .map_err(|e| e.at(Segment::Key(key.clone())))?;
        self.map.insert(key, value);
        Ok(())
    }
}

impl ser::SerializeMap for SerializeMap<'_> {
    type Ok = StructuredValue;
    type Error = EncodeError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key_value = key.serialize(self.child)?;
        self.current_key = Some(self.child.key(key_value)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.current_key.take().ok_or_else(|| {
            <EncodeError as ser::Error>::custom("serialize_value called without serialize_key")
        })?;
        self.entry(key, value)
    }

    fn end(self) -> Result<StructuredValue> {
        Ok(StructuredValue::Mapping(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap<'_> {
    type Ok = StructuredValue;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.entry(key.to_string(), value)
    }

    fn end(self) -> Result<StructuredValue> {
        Ok(StructuredValue::Mapping(self.map))
    }
}

pub struct SerializeTupleVariant<'a> {
    outer: ValueSerializer<'a>,
    variant: &'static str,
    items: SerializeVec<'a>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant<'_> {
    type Ok = StructuredValue;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items
            .push(value)
            .map_err(|e| e.at(Segment::key(self.variant)))
    }

    fn end(self) -> Result<StructuredValue> {
        let payload = StructuredValue::Sequence(self.items.items);
        Ok(self.outer.variant(self.variant, payload))
    }
}

pub struct SerializeStructVariant<'a> {
    outer: ValueSerializer<'a>,
    variant: &'static str,
    fields: SerializeMap<'a>,
}

impl ser::SerializeStructVariant for SerializeStructVariant<'_> {
    type Ok = StructuredValue;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields
            .entry(key.to_string(), value)
            .map_err(|e| e.at(Segment::key(self.variant)))
    }

    fn end(self) -> Result<StructuredValue> {
        let payload = StructuredValue::Mapping(self.fields.map);
        Ok(self.outer.variant(self.variant, payload))
    }
}
