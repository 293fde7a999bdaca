use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::de::Inputter;
use crate::error::IoError;
use crate::io::{Io, IoKey, IoRef, IoType};
use crate::path::FieldPath;
use crate::schema::Shape;
use crate::value::Value;

fn decode_items<T: IoType, C: FromIterator<T>>(
    input: &mut Inputter,
    value: Value,
    expected: &'static str,
    path: &FieldPath<'_>,
) -> Result<C, IoError> {
    let items = match value {
        Value::List(items) => items,
        other => return Err(Inputter::mismatch(expected, &other, path)),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| T::from_io(input, item, &path.index(i)))
        .collect()
}

fn decode_entries<K: IoKey, V: IoType, C: FromIterator<(K, V)>>(
    input: &mut Inputter,
    value: Value,
    path: &FieldPath<'_>,
) -> Result<C, IoError> {
    let map = match value {
        Value::Map(map) => map,
        other => return Err(Inputter::mismatch("dict", &other, path)),
    };

    map.into_iter()
        .map(|(key, item)| {
            let child = path.key(&key);
            let k = K::from_key(input, &key, &child)?;
            let v = V::from_io(input, item, &child)?;
            Ok((k, v))
        })
        .collect()
}

// -----------------------------------------------------------------------------
// Vec

impl<T: Io> Io for Vec<T> {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Seq(Box::new(self.iter().map(|item| item as &dyn Io)))
    }
}

impl<T: IoType> IoType for Vec<T> {
    #[inline]
    fn shape() -> Shape {
        Shape::List(Box::new(T::shape()))
    }

    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        decode_items(input, value, "list", path)
    }
}

// -----------------------------------------------------------------------------
// Sets

impl<T: Io, S: 'static> Io for HashSet<T, S> {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Seq(Box::new(self.iter().map(|item| item as &dyn Io)))
    }
}

impl<T, S> IoType for HashSet<T, S>
where
    T: IoType + Eq + Hash,
    S: BuildHasher + Default + 'static,
{
    #[inline]
    fn shape() -> Shape {
        Shape::Set(Box::new(T::shape()))
    }

    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        decode_items(input, value, "set", path)
    }
}

impl<T: Io> Io for BTreeSet<T> {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Seq(Box::new(self.iter().map(|item| item as &dyn Io)))
    }
}

impl<T: IoType + Ord> IoType for BTreeSet<T> {
    #[inline]
    fn shape() -> Shape {
        Shape::Set(Box::new(T::shape()))
    }

    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        decode_items(input, value, "set", path)
    }
}

// -----------------------------------------------------------------------------
// Maps

impl<K: IoKey, V: Io, S: 'static> Io for HashMap<K, V, S> {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Map(Box::new(
            self.iter().map(|(k, v)| (k.key_ref(), v as &dyn Io)),
        ))
    }
}

impl<K, V, S> IoType for HashMap<K, V, S>
where
    K: IoKey + Eq + Hash,
    V: IoType,
    S: BuildHasher + Default + 'static,
{
    #[inline]
    fn shape() -> Shape {
        Shape::Dict(K::key_shape(), Box::new(V::shape()))
    }

    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        decode_entries(input, value, path)
    }
}

impl<K: IoKey, V: Io> Io for BTreeMap<K, V> {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Map(Box::new(
            self.iter().map(|(k, v)| (k.key_ref(), v as &dyn Io)),
        ))
    }
}

impl<K: IoKey + Ord, V: IoType> IoType for BTreeMap<K, V> {
    #[inline]
    fn shape() -> Shape {
        Shape::Dict(K::key_shape(), Box::new(V::shape()))
    }

    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        decode_entries(input, value, path)
    }
}
