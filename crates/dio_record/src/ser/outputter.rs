use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use super::EncodeOptions;
use super::set_order::sort_set_items;
use crate::attrs::IoAttrs;
use crate::codec::{
    bytes_to_base64, check_datetime_precision, datetime_to_components, timedelta_to_components,
};
use crate::decoded::Decoded;
use crate::error::{IoError, ValueErrorKind};
use crate::io::{IoRef, IoType, KeyRef, MapIter, MultiRef, Record, SeqIter};
use crate::path::FieldPath;
use crate::prep::PrepSession;
use crate::schema::{KeyShape, RecordSchema, Shape};
use crate::type_stack::TypeStack;
use crate::value::{Value, ValueMap};

/// Encodes records into codec-native [`Value`] trees.
///
/// Each value is checked against its declared [`Shape`] while it is
/// converted; every error carries the dotted path of the offending value.
///
/// # Examples
///
/// ```
/// use dio_record::{Codec, EncodeOptions, Outputter, Record, Value};
///
/// #[derive(Record)]
/// struct Reading {
///     ratio: f64,
///     tags: Vec<String>,
/// }
///
/// let reading = Reading { ratio: 0.5, tags: vec!["a".into()] };
/// let out = Outputter::new(EncodeOptions::new(Codec::Json)).run(&reading).unwrap();
///
/// assert_eq!(out.get("ratio"), Some(&Value::Float(0.5)));
/// assert_eq!(out.get("tags"), Some(&Value::List(vec![Value::from("a")])));
/// ```
pub struct Outputter {
    options: EncodeOptions,
    stack: TypeStack,
}

impl Outputter {
    #[inline]
    pub const fn new(options: EncodeOptions) -> Self {
        Self {
            options,
            stack: TypeStack::new(),
        }
    }

    #[inline]
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes a record or multi-type value.
    ///
    /// The type is prepared first; schema errors are reported before any
    /// value is looked at.
    pub fn run<T: IoType>(&mut self, value: &T) -> Result<Value, IoError> {
        let shape = T::shape();
        if !shape.is_root() {
            return Err(IoError::NotARecord(core::any::type_name::<T>()));
        }
        PrepSession::prep::<T>()?;

        self.encode(&shape, value.io_ref(), None, &FieldPath::ROOT)
    }

    /// Encodes a decoded value, refusing lossy ones.
    pub fn run_decoded<T: IoType>(&mut self, decoded: &Decoded<T>) -> Result<Value, IoError> {
        match decoded {
            Decoded::Exact(value) => self.run(value),
            Decoded::Lossy { reasons, .. } => Err(IoError::LossyOutput(reasons.len())),
        }
    }

    fn encode(
        &mut self,
        shape: &Shape,
        value: IoRef<'_>,
        attrs: Option<&IoAttrs>,
        path: &FieldPath<'_>,
    ) -> Result<Value, IoError> {
        let codec = self.options.codec;

        match (shape, value) {
            (Shape::Optional(_), IoRef::Null) => Ok(Value::Null),
            (Shape::Optional(inner), value) => self.encode(inner, value, attrs, path),
            (Shape::Any, IoRef::Value(value)) => {
                value.check_legal(codec, path)?;
                Ok(value.clone())
            }
            (Shape::Bool, IoRef::Bool(b)) => Ok(Value::Bool(b)),
            (Shape::Int, IoRef::Int(i)) => Ok(Value::Int(i)),
            (Shape::Float, IoRef::Float(f)) => Ok(Value::Float(f)),
            // Only reachable from hand-written `Io` impls.
            (Shape::Float, IoRef::Int(i)) if self.options.coerce_to_float => {
                Ok(Value::Float(i as f64))
            }
            (Shape::Str, IoRef::Str(s)) => Ok(Value::Str(s.to_owned())),
            (Shape::Bytes, IoRef::Bytes(b)) => Ok(if codec.native_bytes() {
                Value::Bytes(Bytes::copy_from_slice(b))
            } else {
                Value::Str(bytes_to_base64(b))
            }),
            (Shape::DateTime, IoRef::DateTime(dt)) => self.encode_datetime(&dt, attrs, path),
            (Shape::TimeDelta, IoRef::TimeDelta(td)) => encode_timedelta(&td, path),
            (Shape::Tuple(items), IoRef::Seq(seq)) => self.encode_tuple(items, seq, attrs, path),
            (Shape::List(element), IoRef::Seq(seq)) => self
                .encode_items(element, seq, attrs, path)
                .map(Value::List),
            (Shape::Set(element), IoRef::Seq(seq)) => {
                let mut items = self.encode_items(element, seq, attrs, path)?;
                sort_set_items(element, &mut items);
                Ok(Value::List(items))
            }
            (Shape::Dict(key, element), IoRef::Map(entries)) => {
                self.encode_dict(key, element, entries, attrs, path)
            }
            (Shape::Record(schema), IoRef::Record(record))
                if record.record_schema().type_id() == schema().type_id() =>
            {
                self.encode_record(record, path)
            }
            (Shape::Enum(schema), IoRef::Enum(found, index))
                if found.type_id() == schema().type_id() =>
            {
                found
                    .variant(index)
                    .map(|variant| variant.value().to_value())
                    .ok_or_else(|| {
                        IoError::Consistency(format!(
                            "`{}` has no variant at index {index}",
                            found.type_path()
                        ))
                    })
            }
            (Shape::Multi(family), IoRef::Multi(multi))
                if multi.family.type_id() == family().type_id() =>
            {
                self.encode_multi(multi, path)
            }
            (shape, value) => Err(IoError::value(
                path,
                ValueErrorKind::TypeMismatch {
                    expected: shape.to_string(),
                    found: value.kind_name(),
                },
            )),
        }
    }

    fn encode_datetime(
        &mut self,
        dt: &DateTime<FixedOffset>,
        attrs: Option<&IoAttrs>,
        path: &FieldPath<'_>,
    ) -> Result<Value, IoError> {
        let offset_seconds = dt.offset().local_minus_utc();
        if offset_seconds != 0 {
            return Err(IoError::value(
                path,
                ValueErrorKind::NonUtcDateTime { offset_seconds },
            ));
        }

        let utc = dt.with_timezone(&Utc);
        if let Some(granularity) = attrs.and_then(IoAttrs::granularity) {
            granularity
                .check(&utc)
                .map_err(|kind| IoError::value(path, kind))?;
        }

        if self.options.codec.native_datetime() {
            check_datetime_precision(&utc).map_err(|kind| IoError::value(path, kind))?;
            Ok(Value::DateTime(utc))
        } else {
            let parts = datetime_to_components(&utc).map_err(|kind| IoError::value(path, kind))?;
            Ok(Value::List(parts.into_iter().map(Value::Int).collect()))
        }
    }

    fn encode_tuple(
        &mut self,
        shapes: &[Shape],
        seq: SeqIter<'_>,
        attrs: Option<&IoAttrs>,
        path: &FieldPath<'_>,
    ) -> Result<Value, IoError> {
        if seq.len() != shapes.len() {
            return Err(IoError::value(
                path,
                ValueErrorKind::TupleLength {
                    expected: shapes.len(),
                    found: seq.len(),
                },
            ));
        }

        shapes
            .iter()
            .zip(seq)
            .enumerate()
            .map(|(i, (shape, item))| self.encode(shape, item.io_ref(), attrs, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }

    fn encode_items(
        &mut self,
        element: &Shape,
        seq: SeqIter<'_>,
        attrs: Option<&IoAttrs>,
        path: &FieldPath<'_>,
    ) -> Result<Vec<Value>, IoError> {
        seq.enumerate()
            .map(|(i, item)| self.encode(element, item.io_ref(), attrs, &path.index(i)))
            .collect()
    }

    fn encode_dict(
        &mut self,
        key_shape: &KeyShape,
        element: &Shape,
        entries: MapIter<'_>,
        attrs: Option<&IoAttrs>,
        path: &FieldPath<'_>,
    ) -> Result<Value, IoError> {
        let mut out = ValueMap::new();
        for (key, item) in entries {
            let key = encode_key(key_shape, key, path)?;
            let encoded = self.encode(element, item.io_ref(), attrs, &path.key(&key))?;
            out.insert(key, encoded);
        }
        Ok(Value::Map(out))
    }

    fn encode_multi(&mut self, multi: MultiRef<'_>, path: &FieldPath<'_>) -> Result<Value, IoError> {
        let Some(member) = multi.member else {
            return Err(IoError::value(
                path,
                ValueErrorKind::FallbackOutput {
                    family: multi.family.type_path(),
                },
            ));
        };

        let schema = member.record_schema();
        match schema.membership() {
            Some(membership) if membership.family().type_id() == multi.family.type_id() => {}
            _ => {
                return Err(IoError::Consistency(format!(
                    "`{}` is held by `{}` but is not one of its members",
                    schema.type_path(),
                    multi.family.type_path()
                )));
            }
        }

        self.encode_record(member, path)
    }

    fn encode_record(&mut self, record: &dyn Record, path: &FieldPath<'_>) -> Result<Value, IoError> {
        let schema = record.record_schema();

        self.stack.push(schema.type_path());
        let result = self
            .encode_record_fields(record, schema, path)
            .map_err(|e| e.with_type_stack(|| self.stack.render()));
        self.stack.pop();

        result
    }

    fn encode_record_fields(
        &mut self,
        record: &dyn Record,
        schema: &'static RecordSchema,
        path: &FieldPath<'_>,
    ) -> Result<Value, IoError> {
        let mut out = ValueMap::new();

        for (index, field) in schema.fields().iter().enumerate() {
            let attrs = field.attrs();
            let child = path.field(field.name());

            if attrs.has_validator() {
                record
                    .validate_field(index)
                    .map_err(|msg| IoError::value(&child, ValueErrorKind::Validation(msg)))?;
            }

            if !attrs.store_default() && record.field_is_default(index) {
                continue;
            }

            let value = record.field_io(index).ok_or_else(|| {
                IoError::Consistency(format!(
                    "`{}` has no field at index {index}",
                    schema.type_path()
                ))
            })?;

            let encoded = self.encode(field.shape(), value.io_ref(), Some(attrs), &child)?;
            out.insert(field.storage_name().to_owned(), encoded);
        }

        if !self.options.discard_extra_attrs
            && let Some(extra) = record.extra_attrs()
        {
            for (key, value) in extra.iter() {
                let child = path.key(key);
                value.check_legal(self.options.codec, &child)?;
                if out.contains_key(key) || schema.field_by_storage_name(key).is_some() {
                    return Err(IoError::value(
                        &child,
                        ValueErrorKind::ExtraAttrCollision(key.clone()),
                    ));
                }
                out.insert(key.clone(), value.clone());
            }
        }

        if let Some(membership) = schema.membership() {
            let family = membership.family();

            match family.member_by_id(membership.type_id()) {
                Some(member) if member.record().type_id() == schema.type_id() => {}
                _ => {
                    return Err(IoError::Consistency(format!(
                        "`{}` reports type id {} but `{}` maps it to another type",
                        schema.type_path(),
                        membership.type_id(),
                        family.type_path()
                    )));
                }
            }

            if out.contains_key(family.tag()) {
                return Err(IoError::value(
                    &path.key(family.tag()),
                    ValueErrorKind::ExtraAttrCollision(family.tag().to_owned()),
                ));
            }
            out.insert(family.tag().to_owned(), membership.type_id().to_value());
        }

        Ok(Value::Map(out))
    }
}

fn encode_timedelta(td: &TimeDelta, path: &FieldPath<'_>) -> Result<Value, IoError> {
    let parts = timedelta_to_components(td).map_err(|kind| IoError::value(path, kind))?;
    Ok(Value::List(parts.into_iter().map(Value::Int).collect()))
}

fn encode_key(key_shape: &KeyShape, key: KeyRef<'_>, path: &FieldPath<'_>) -> Result<String, IoError> {
    match (key_shape, key) {
        (KeyShape::Str, KeyRef::Str(s)) => Ok(s.to_owned()),
        (KeyShape::Int, KeyRef::Int(i)) => Ok(i.to_string()),
        (KeyShape::Enum(schema), KeyRef::Enum(found, index))
            if found.type_id() == schema().type_id() =>
        {
            found
                .variant(index)
                .map(|variant| variant.value().key_string())
                .ok_or_else(|| {
                    IoError::Consistency(format!(
                        "`{}` has no variant at index {index}",
                        found.type_path()
                    ))
                })
        }
        (expected, found) => Err(IoError::value(
            path,
            ValueErrorKind::TypeMismatch {
                expected: format!("{expected} dict key"),
                found: format!("{} dict key", found.kind_name()),
            },
        )),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::*;
    use crate::codec::Codec;
    use crate::io::Io;

    fn encode_one(shape: &Shape, value: &dyn Io, codec: Codec) -> Result<Value, IoError> {
        Outputter::new(EncodeOptions::new(codec)).encode(shape, value.io_ref(), None, &FieldPath::ROOT)
    }

    #[test]
    fn datetime_forms() {
        let dt = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();

        let json = encode_one(&Shape::DateTime, &dt, Codec::Json).unwrap();
        assert_eq!(
            json,
            Value::List([2021, 3, 4, 5, 6, 7, 0].into_iter().map(Value::Int).collect())
        );

        let native = encode_one(&Shape::DateTime, &dt, Codec::Firestore).unwrap();
        assert_eq!(native, Value::DateTime(dt));

        let shifted = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2021, 3, 4, 5, 6, 7)
            .unwrap();
        let err = encode_one(&Shape::DateTime, &shifted, Codec::Json).unwrap_err();
        assert!(matches!(
            err.as_value_error().map(|e| &e.kind),
            Some(ValueErrorKind::NonUtcDateTime { offset_seconds: 3600 })
        ));
    }

    #[test]
    fn bytes_forms() {
        let data = Bytes::from_static(b"\x00\x01");
        assert_eq!(
            encode_one(&Shape::Bytes, &data, Codec::Json).unwrap(),
            Value::from("AAE=")
        );
        assert_eq!(
            encode_one(&Shape::Bytes, &data, Codec::Firestore).unwrap(),
            Value::Bytes(data)
        );
    }

    #[test]
    fn mismatch_reports_shapes() {
        let err = encode_one(&Shape::Str, &5_i64, Codec::Json).unwrap_err();
        assert_eq!(err.to_string(), "expected str, found int");

        let items = vec![1_i64, 2];
        let err = encode_one(&Shape::Tuple(vec![Shape::Int]), &items, Codec::Json).unwrap_err();
        assert!(matches!(
            err.as_value_error().map(|e| &e.kind),
            Some(ValueErrorKind::TupleLength { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn float_coercion() {
        let mut strict = Outputter::new(EncodeOptions::new(Codec::Json).with_coerce_to_float(false));
        assert!(
            strict
                .encode(&Shape::Float, IoRef::Int(3), None, &FieldPath::ROOT)
                .is_err()
        );

        let mut lenient = Outputter::new(EncodeOptions::new(Codec::Json));
        assert_eq!(
            lenient
                .encode(&Shape::Float, IoRef::Int(3), None, &FieldPath::ROOT)
                .unwrap(),
            Value::Float(3.0)
        );
    }
}
