//! The codec-native value tree produced by encoding and consumed by decoding.

mod canonical;
mod json;
mod serde_impls;

pub use canonical::{CanonicalStyle, to_canonical_json};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::codec::Codec;
use crate::error::{ValueError, ValueErrorKind};
use crate::path::FieldPath;

/// String-keyed map with deterministic key order.
pub type ValueMap = BTreeMap<String, Value>;

/// A codec-native value.
///
/// [`Codec::Json`] trees contain only `Null`, `Bool`, `Int`, `Float`, `Str`,
/// `List` and `Map`. [`Codec::Firestore`] trees may additionally contain
/// `Bytes` and `DateTime`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Bytes),
    DateTime(DateTime<Utc>),
    List(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    /// Short lowercase name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Returns `true` if this value and all of its children can be stored by `codec`.
    pub fn is_legal_for(&self, codec: Codec) -> bool {
        match self {
            Value::Bytes(_) => codec.native_bytes(),
            Value::DateTime(_) => codec.native_datetime(),
            Value::List(items) => items.iter().all(|v| v.is_legal_for(codec)),
            Value::Map(map) => map.values().all(|v| v.is_legal_for(codec)),
            _ => true,
        }
    }

    /// Like [`Value::is_legal_for`], but reports the first illegal value with its path.
    pub fn check_legal(&self, codec: Codec, path: &FieldPath<'_>) -> Result<(), ValueError> {
        let illegal = || {
            ValueError::new(
                path,
                ValueErrorKind::NotCodecLegal {
                    codec,
                    found: self.kind_name(),
                },
            )
        };

        match self {
            Value::Bytes(_) if !codec.native_bytes() => Err(illegal()),
            Value::DateTime(_) if !codec.native_datetime() => Err(illegal()),
            Value::List(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(i, v)| v.check_legal(codec, &path.index(i))),
            Value::Map(map) => map
                .iter()
                .try_for_each(|(k, v)| v.check_legal(codec, &path.key(k))),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this is a map.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Total order between values of the natively ordered kinds
    /// (`bool`, `int`, `float`, `str`, `datetime` and the JSON datetime
    /// component lists).
    ///
    /// Values of different kinds order by kind; floats use
    /// [`f64::total_cmp`].
    pub(crate) fn native_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.native_cmp(y))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    const fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Str(_) => 4,
            Value::Bytes(_) => 5,
            Value::DateTime(_) => 6,
            Value::List(_) => 7,
            Value::Map(_) => 8,
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($($ty:ty => $variant:ident $(via $conv:path)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant($($conv)?(value))
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i64 => Int,
    i32 => Int via i64::from,
    u32 => Int via i64::from,
    f64 => Float,
    String => Str,
    Bytes => Bytes,
    DateTime<Utc> => DateTime,
    Vec<Value> => List,
    ValueMap => Map,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn codec_legality() {
        let dt = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let tree: Value = [
            ("a", Value::Int(1)),
            ("b", Value::List(vec![Value::Null, Value::DateTime(dt)])),
        ]
        .into_iter()
        .collect();

        assert!(!tree.is_legal_for(Codec::Json));
        assert!(tree.is_legal_for(Codec::Firestore));

        let err = tree.check_legal(Codec::Json, &FieldPath::ROOT).unwrap_err();
        assert_eq!(err.path, "b.1");
        assert!(matches!(
            err.kind,
            ValueErrorKind::NotCodecLegal { found: "datetime", .. }
        ));

        assert!(Value::Bytes(Bytes::from_static(b"x")).is_legal_for(Codec::Firestore));
        assert!(!Value::Bytes(Bytes::from_static(b"x")).is_legal_for(Codec::Json));
    }

    #[test]
    fn native_order() {
        let mut items = vec![Value::from("b"), Value::from("c"), Value::from("a")];
        items.sort_by(Value::native_cmp);
        assert_eq!(items, vec![Value::from("a"), Value::from("b"), Value::from("c")]);

        let mut floats = vec![Value::Float(2.5), Value::Float(-1.0), Value::Float(0.0)];
        floats.sort_by(Value::native_cmp);
        assert_eq!(floats[0], Value::Float(-1.0));

        let early = Value::List(vec![Value::Int(2020), Value::Int(1)]);
        let late = Value::List(vec![Value::Int(2020), Value::Int(2)]);
        assert_eq!(early.native_cmp(&late), Ordering::Less);
    }

    #[test]
    fn accessors() {
        let map: Value = [("x", 1_i64)].into_iter().collect();
        assert_eq!(map.get("x").and_then(Value::as_i64), Some(1));
        assert_eq!(map.get("y"), None);
        assert_eq!(Value::from(Option::<i64>::None), Value::Null);
        assert_eq!(Value::from(Some("s")).as_str(), Some("s"));
    }
}
