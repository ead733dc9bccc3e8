//! The canonical value model.
//!
//! This module provides [`StructuredValue`], the tree every input is encoded
//! into before it is validated and rendered, and [`Number`], its numeric leaf.
//!
//! ## Creating Values
//!
//! ```rust
//! use structured_yaml::{structured, StructuredValue};
//!
//! let null = StructuredValue::Null;
//! let number = StructuredValue::from(42);
//! let text = StructuredValue::from("hello");
//!
//! let obj = structured!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_mapping());
//! ```
//!
//! ## Converting from Rust Types
//!
//! ```rust
//! use structured_yaml::{encode, StructuredValue};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = encode(&Point { x: 10, y: 20 }).unwrap();
//! if let StructuredValue::Mapping(map) = value {
//!     assert_eq!(map.len(), 2);
//! }
//! ```

use crate::StructuredMap;
use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed structured value.
///
/// Values are plain data: once built they are never mutated by the pipeline,
/// and they are `Send + Sync`.
///
/// # Examples
///
/// ```rust
/// use structured_yaml::{Number, StructuredValue};
///
/// let num = StructuredValue::Number(Number::Integer(42));
/// let text = StructuredValue::String("hello".to_string());
///
/// assert!(StructuredValue::Null.is_null());
/// assert!(num.is_number());
/// assert_eq!(text.kind(), "string");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum StructuredValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<StructuredValue>),
    Mapping(StructuredMap),
}

/// A numeric leaf.
///
/// Integers that fit `i64` are stored inline; wider integers (large `u64`,
/// `i128`, `u128`) are kept exact as [`BigInt`].
///
/// # Examples
///
/// ```rust
/// use structured_yaml::Number;
///
/// assert!(Number::Integer(42).is_integer());
/// assert_eq!(Number::Float(3.5).as_f64(), 3.5);
/// assert_eq!(Number::from(u64::MAX).to_string(), "18446744073709551615");
/// assert_eq!(Number::Float(3.0).to_string(), "3.0");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    BigInt(BigInt),
    Float(f64),
}

impl Number {
    /// Returns `true` for `Integer` and `BigInt`.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::BigInt(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns `false` only for NaN and infinite floats.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    /// Returns `true` if the number is strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Number::Integer(i) => *i < 0,
            Number::BigInt(bi) => bi.sign() == Sign::Minus,
            Number::Float(f) => *f < 0.0,
        }
    }

    /// Returns `true` if the number is strictly above zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match self {
            Number::Integer(i) => *i > 0,
            Number::BigInt(bi) => bi.sign() == Sign::Plus,
            Number::Float(f) => *f > 0.0,
        }
    }

    /// Converts to `i64` when the value is an integer in range or a whole float.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_yaml::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::BigInt(bi) => i64::try_from(bi).ok(),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Converts to `f64`, rounding wide integers.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            // Decimal text always parses; the result saturates to infinity
            // only beyond f64 range.
            Number::BigInt(bi) => bi.to_string().parse().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
        }
    }
}

/// Canonical text: decimal integers, shortest round-trip floats that always
/// carry a `.` or an exponent, and YAML spellings for non-finite floats.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::BigInt(bi) => write!(f, "{}", bi),
            Number::Float(fl) => f.write_str(&format_float(*fl)),
        }
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        return ".nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { ".inf" } else { "-.inf" }.to_string();
    }

    // `{:?}` is the shortest text that parses back to the same bits: "3.0",
    // "0.1", "1e16", "1.5e-7".
    let text = format!("{:?}", value);
    match text.find('e') {
        Some(pos) => {
            let (mantissa, exponent) = text.split_at(pos);
            let exponent = &exponent[1..];
            let mantissa = if mantissa.contains('.') {
                mantissa.to_string()
            } else {
                format!("{}.0", mantissa)
            };
            if exponent.starts_with('-') {
                format!("{}e{}", mantissa, exponent)
            } else {
                format!("{}e+{}", mantissa, exponent)
            }
        }
        None => text,
    }
}

impl From<i8> for Number {
    fn from(value: i8) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i16> for Number {
    fn from(value: i16) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<u8> for Number {
    fn from(value: u8) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<u16> for Number {
    fn from(value: u16) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(BigInt::from(value)),
        }
    }
}

impl From<i128> for Number {
    fn from(value: i128) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(BigInt::from(value)),
        }
    }
}

impl From<u128> for Number {
    fn from(value: u128) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        match i64::try_from(&value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(value),
        }
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(value as f64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl StructuredValue {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, StructuredValue::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, StructuredValue::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, StructuredValue::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, StructuredValue::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, StructuredValue::Sequence(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, StructuredValue::Mapping(_))
    }

    /// Returns `true` for null, bool, number and string values.
    #[inline]
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, StructuredValue::Sequence(_) | StructuredValue::Mapping(_))
    }

    /// Name of the variant as used in error messages and schema rules.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_yaml::StructuredValue;
    ///
    /// assert_eq!(StructuredValue::from(1).kind(), "integer");
    /// assert_eq!(StructuredValue::from(1.5).kind(), "float");
    /// assert_eq!(StructuredValue::Sequence(vec![]).kind(), "sequence");
    /// ```
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            StructuredValue::Null => "null",
            StructuredValue::Bool(_) => "bool",
            StructuredValue::Number(Number::Float(_)) => "float",
            StructuredValue::Number(_) => "integer",
            StructuredValue::String(_) => "string",
            StructuredValue::Sequence(_) => "sequence",
            StructuredValue::Mapping(_) => "mapping",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StructuredValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            StructuredValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is an integer in `i64` range or a whole float, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StructuredValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StructuredValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StructuredValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Vec<StructuredValue>> {
        match self {
            StructuredValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_mapping(&self) -> Option<&StructuredMap> {
        match self {
            StructuredValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a mapping entry. Returns `None` for non-mappings.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl Serialize for StructuredValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            StructuredValue::Null => serializer.serialize_unit(),
            StructuredValue::Bool(b) => serializer.serialize_bool(*b),
            StructuredValue::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            StructuredValue::Number(Number::BigInt(bi)) => {
                if let Ok(i) = i128::try_from(bi) {
                    serializer.serialize_i128(i)
                } else if let Ok(u) = u128::try_from(bi) {
                    serializer.serialize_u128(u)
                } else {
                    serializer.serialize_str(&bi.to_string())
                }
            }
            StructuredValue::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            StructuredValue::String(s) => serializer.serialize_str(s),
            StructuredValue::Sequence(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            StructuredValue::Mapping(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for StructuredValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct StructuredValueVisitor;

        impl<'de> Visitor<'de> for StructuredValueVisitor {
            type Value = StructuredValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any structured value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(StructuredValue::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(StructuredValue::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(StructuredValue::Number(Number::from(value)))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(StructuredValue::Number(Number::from(value)))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(StructuredValue::Number(Number::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(StructuredValue::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(StructuredValue::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(StructuredValue::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(StructuredValue::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(StructuredValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(StructuredValue::Sequence(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = StructuredMap::new();
                while let Some((key, value)) = map.next_entry::<String, StructuredValue>()? {
                    if values.contains_key(&key) {
                        return Err(de::Error::custom(format!("duplicate key {:?}", key)));
                    }
                    values.insert(key, value);
                }
                Ok(StructuredValue::Mapping(values))
            }
        }

        deserializer.deserialize_any(StructuredValueVisitor)
    }
}

impl From<bool> for StructuredValue {
    fn from(value: bool) -> Self {
        StructuredValue::Bool(value)
    }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StructuredValue {
                fn from(value: $ty) -> Self {
                    StructuredValue::Number(Number::from(value))
                }
            }
        )*
    };
}

from_number!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64, BigInt);

impl From<Number> for StructuredValue {
    fn from(value: Number) -> Self {
        StructuredValue::Number(value)
    }
}

impl From<String> for StructuredValue {
    fn from(value: String) -> Self {
        StructuredValue::String(value)
    }
}

impl From<&str> for StructuredValue {
    fn from(value: &str) -> Self {
        StructuredValue::String(value.to_string())
    }
}

impl From<Vec<StructuredValue>> for StructuredValue {
    fn from(value: Vec<StructuredValue>) -> Self {
        StructuredValue::Sequence(value)
    }
}

impl From<StructuredMap> for StructuredValue {
    fn from(value: StructuredMap) -> Self {
        StructuredValue::Mapping(value)
    }
}

impl<T: Into<StructuredValue>> From<Option<T>> for StructuredValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StructuredValue::Null, Into::into)
    }
}
