use core::fmt;

use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};

use super::{DecodeOptions, RecordReader};
use crate::attrs::{ExtraAttrs, IoAttrs};
use crate::codec::{
    Codec, bytes_from_base64, check_datetime_precision, datetime_from_components,
    timedelta_from_components,
};
use crate::decoded::{Decoded, LossyKind, LossyReason};
use crate::error::{IoError, ValueErrorKind};
use crate::io::IoType;
use crate::path::FieldPath;
use crate::prep::PrepSession;
use crate::schema::{EnumSchema, MultiTypeSchema, RecordSchema, describe_value};
use crate::type_stack::TypeStack;
use crate::value::{Value, ValueMap};

/// Decodes codec-native [`Value`] trees into typed values.
///
/// The `Inputter` is threaded through every [`IoType::from_io`] call. It
/// carries the [`DecodeOptions`], the attrs of the field being decoded, and
/// the substitutions made so far, which end up in [`Decoded::Lossy`].
///
/// # Examples
///
/// ```
/// use dio_record::{Codec, DecodeOptions, Inputter, Record, Value};
///
/// #[derive(Record, Debug, PartialEq)]
/// struct Reading {
///     ratio: f64,
/// }
///
/// let raw: Value = [("ratio", Value::Int(2))].into_iter().collect();
/// let decoded = Inputter::new(DecodeOptions::new(Codec::Json))
///     .run::<Reading>(raw)
///     .unwrap();
///
/// assert_eq!(decoded.into_exact().unwrap(), Reading { ratio: 2.0 });
/// ```
pub struct Inputter {
    options: DecodeOptions,
    attrs: Option<IoAttrs>,
    lossy: Vec<LossyReason>,
    pub(super) stack: TypeStack,
}

impl Inputter {
    #[inline]
    pub const fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            attrs: None,
            lossy: Vec::new(),
            stack: TypeStack::new(),
        }
    }

    #[inline]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    #[inline]
    pub fn codec(&self) -> Codec {
        self.options.codec
    }

    /// Attrs of the record field currently being decoded.
    ///
    /// Containers pass their field's attrs down to their elements.
    #[inline]
    pub fn field_attrs(&self) -> Option<&IoAttrs> {
        self.attrs.as_ref()
    }

    /// Decodes a record or multi-type value.
    pub fn run<T: IoType>(&mut self, value: Value) -> Result<Decoded<T>, IoError> {
        if !T::shape().is_root() {
            return Err(IoError::NotARecord(core::any::type_name::<T>()));
        }
        PrepSession::prep::<T>()?;

        self.lossy.clear();
        self.attrs = None;
        let value = T::from_io(self, value, &FieldPath::ROOT)?;
        Ok(Decoded::new(value, core::mem::take(&mut self.lossy)))
    }

    pub(crate) fn with_attrs<R>(&mut self, attrs: IoAttrs, f: impl FnOnce(&mut Self) -> R) -> R {
        let prev = self.attrs.replace(attrs);
        let result = f(self);
        self.attrs = prev;
        result
    }

    // -------------------------------------------------------------------------
    // Errors

    /// A type mismatch at `path`.
    pub fn mismatch(expected: impl fmt::Display, found: &Value, path: &FieldPath<'_>) -> IoError {
        IoError::value(
            path,
            ValueErrorKind::TypeMismatch {
                expected: expected.to_string(),
                found: found.kind_name().to_owned(),
            },
        )
    }

    fn substitute(&mut self, path: &FieldPath<'_>, kind: LossyKind) {
        let reason = LossyReason {
            path: path.to_string(),
            kind,
        };
        log::warn!("lossy decode, substituting fallback: {reason}");
        self.lossy.push(reason);
    }

    // -------------------------------------------------------------------------
    // Leaf values

    pub fn decode_float(&self, value: Value, path: &FieldPath<'_>) -> Result<f64, IoError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) if self.options.coerce_to_float => Ok(i as f64),
            other => Err(Self::mismatch("float", &other, path)),
        }
    }

    pub fn decode_bytes(&self, value: Value, path: &FieldPath<'_>) -> Result<Bytes, IoError> {
        match value {
            Value::Bytes(b) if self.codec().native_bytes() => Ok(b),
            Value::Str(s) if !self.codec().native_bytes() => bytes_from_base64(&s)
                .map(Bytes::from)
                .map_err(|kind| IoError::value(path, kind)),
            other => Err(Self::mismatch("bytes", &other, path)),
        }
    }

    pub fn decode_datetime(&self, value: Value, path: &FieldPath<'_>) -> Result<DateTime<Utc>, IoError> {
        let dt = match value {
            Value::DateTime(dt) if self.codec().native_datetime() => {
                check_datetime_precision(&dt).map_err(|kind| IoError::value(path, kind))?;
                dt
            }
            Value::List(items) if !self.codec().native_datetime() => {
                let parts = int_components(&items, "datetime", path)?;
                datetime_from_components(&parts).map_err(|kind| IoError::value(path, kind))?
            }
            other => return Err(Self::mismatch("datetime", &other, path)),
        };

        if let Some(granularity) = self.attrs.as_ref().and_then(IoAttrs::granularity) {
            granularity
                .check(&dt)
                .map_err(|kind| IoError::value(path, kind))?;
        }
        Ok(dt)
    }

    pub fn decode_timedelta(&self, value: Value, path: &FieldPath<'_>) -> Result<TimeDelta, IoError> {
        match value {
            Value::List(items) => {
                let parts = int_components(&items, "timedelta", path)?;
                timedelta_from_components(&parts).map_err(|kind| IoError::value(path, kind))
            }
            other => Err(Self::mismatch("timedelta", &other, path)),
        }
    }

    /// Accepts any value legal under the current codec.
    pub fn decode_any(&self, value: Value, path: &FieldPath<'_>) -> Result<Value, IoError> {
        value.check_legal(self.codec(), path)?;
        Ok(value)
    }

    // -------------------------------------------------------------------------
    // Enums and multi-types

    /// Finds the variant of `schema` stored as `value`.
    ///
    /// Unknown values select the declared fallback (recorded as lossy) when
    /// lossy decoding is allowed.
    pub fn enum_index(
        &mut self,
        schema: &'static EnumSchema,
        value: &Value,
        path: &FieldPath<'_>,
    ) -> Result<usize, IoError> {
        if let Some(index) = schema.find(value) {
            return Ok(index);
        }
        self.enum_fallback(schema, value.clone(), path)
    }

    /// Like [`Inputter::enum_index`], for a value in dict-key form.
    pub fn enum_key_index(
        &mut self,
        schema: &'static EnumSchema,
        key: &str,
        path: &FieldPath<'_>,
    ) -> Result<usize, IoError> {
        if let Some(index) = schema.find_key(key) {
            return Ok(index);
        }
        self.enum_fallback(schema, Value::from(key), path)
    }

    fn enum_fallback(
        &mut self,
        schema: &'static EnumSchema,
        value: Value,
        path: &FieldPath<'_>,
    ) -> Result<usize, IoError> {
        match schema.fallback() {
            Some(fallback) if self.options.allow_lossy => {
                self.substitute(
                    path,
                    LossyKind::UnknownEnumValue {
                        enum_path: schema.type_path(),
                        value,
                    },
                );
                Ok(fallback)
            }
            _ => Err(IoError::value(
                path,
                ValueErrorKind::UnknownEnumValue {
                    enum_path: schema.type_path(),
                    value: describe_value(&value),
                },
            )),
        }
    }

    /// Selects the member of `family` that `value` encodes.
    ///
    /// Returns the index into [`MultiTypeSchema::members`], or `None` when
    /// the type id is unknown and the family's fallback variant applies
    /// (recorded as lossy).
    pub fn multi_member(
        &mut self,
        family: &'static MultiTypeSchema,
        value: &Value,
        path: &FieldPath<'_>,
    ) -> Result<Option<usize>, IoError> {
        let Value::Map(map) = value else {
            return Err(Self::mismatch(
                format_args!("map for `{}`", family.type_path()),
                value,
                path,
            ));
        };

        let Some(id) = map.get(family.tag()) else {
            return Err(IoError::value(
                path,
                ValueErrorKind::MissingTypeId {
                    family: family.type_path(),
                    tag: family.tag(),
                },
            ));
        };

        if let Some(index) = family.member_index(id) {
            return Ok(Some(index));
        }

        if family.fallback().is_some() && self.options.allow_lossy {
            self.substitute(
                path,
                LossyKind::UnknownTypeId {
                    family: family.type_path(),
                    value: id.clone(),
                },
            );
            return Ok(None);
        }

        Err(IoError::value(
            path,
            ValueErrorKind::UnknownTypeId {
                family: family.type_path(),
                value: describe_value(id),
            },
        ))
    }

    // -------------------------------------------------------------------------
    // Records

    /// Starts decoding a record: checks the input is a map, runs the
    /// `will_input` hook, verifies and strips a member's type id and sorts
    /// out unknown keys.
    ///
    /// Must be paired with [`RecordReader::finish`].
    pub fn begin_record<'p>(
        &mut self,
        schema: &'static RecordSchema,
        value: Value,
        path: &'p FieldPath<'p>,
    ) -> Result<RecordReader<'p>, IoError> {
        self.stack.push(schema.type_path());

        match self.split_record_input(schema, value, path) {
            Ok((map, extra)) => Ok(RecordReader::new(schema, map, extra, path)),
            Err(e) => {
                let e = e.with_type_stack(|| self.stack.render());
                self.stack.pop();
                Err(e)
            }
        }
    }

    fn split_record_input(
        &mut self,
        schema: &'static RecordSchema,
        value: Value,
        path: &FieldPath<'_>,
    ) -> Result<(ValueMap, ExtraAttrs), IoError> {
        let mut map = match value {
            Value::Map(map) => map,
            other => {
                return Err(Self::mismatch(
                    format_args!("map for `{}`", schema.type_path()),
                    &other,
                    path,
                ));
            }
        };

        if let Some(hook) = schema.will_input() {
            hook(&mut map);
        }

        if let Some(membership) = schema.membership()
            && let Some(found) = map.remove(membership.family().tag())
            && !membership.type_id().matches(&found)
        {
            return Err(IoError::value(
                path,
                ValueErrorKind::TypeIdMismatch {
                    member: schema.type_path(),
                    expected: membership.type_id().to_string(),
                    found: describe_value(&found),
                },
            ));
        }

        let unknown: Vec<String> = map
            .keys()
            .filter(|key| schema.field_by_storage_name(key).is_none())
            .cloned()
            .collect();

        let mut extra = ExtraAttrs::new();
        for key in unknown {
            let Some(raw) = map.remove(&key) else {
                continue;
            };

            if !self.options.allow_unknown_attrs {
                return Err(IoError::value(
                    &path.key(&key),
                    ValueErrorKind::UnknownAttr(key.clone()),
                ));
            }
            if self.options.discard_unknown_attrs {
                continue;
            }
            if schema.extra_slot().is_none() {
                log::debug!(
                    "discarding unknown attribute `{key}` of `{}`: no extra attrs slot",
                    schema.type_path()
                );
                continue;
            }
            extra.insert(key, raw);
        }

        Ok((map, extra))
    }
}

fn int_components(
    items: &[Value],
    what: &'static str,
    path: &FieldPath<'_>,
) -> Result<Vec<i64>, IoError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_i64()
                .ok_or_else(|| Inputter::mismatch(format_args!("int {what} component"), item, &path.index(i)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::attrs::Granularity;

    fn json() -> Inputter {
        Inputter::new(DecodeOptions::new(Codec::Json))
    }

    #[test]
    fn floats() {
        let root = FieldPath::ROOT;
        assert_eq!(json().decode_float(Value::Int(3), &root).unwrap(), 3.0);

        let strict = Inputter::new(DecodeOptions::new(Codec::Json).with_coerce_to_float(false));
        assert!(strict.decode_float(Value::Int(3), &root).is_err());
        assert!(strict.decode_float(Value::from("3"), &root).is_err());
    }

    #[test]
    fn datetimes() {
        let root = FieldPath::ROOT;
        let parts = Value::List([2020, 1, 2, 3, 0, 0, 0].into_iter().map(Value::Int).collect());
        let expected = Utc.with_ymd_and_hms(2020, 1, 2, 3, 0, 0).unwrap();

        let mut input = json();
        assert_eq!(input.decode_datetime(parts.clone(), &root).unwrap(), expected);

        let hours = IoAttrs::new().with_granularity(Granularity::Hours);
        let days = IoAttrs::new().with_granularity(Granularity::Days);
        assert!(input.with_attrs(hours, |i| i.decode_datetime(parts.clone(), &root)).is_ok());
        assert!(input.with_attrs(days, |i| i.decode_datetime(parts.clone(), &root)).is_err());
        assert!(input.field_attrs().is_none());

        // JSON never carries native datetimes.
        assert!(input.decode_datetime(Value::DateTime(expected), &root).is_err());

        let native = Inputter::new(DecodeOptions::new(Codec::Firestore));
        assert_eq!(native.decode_datetime(Value::DateTime(expected), &root).unwrap(), expected);
        assert!(native.decode_datetime(parts, &root).is_err());
    }

    #[test]
    fn bad_components_have_paths() {
        let root = FieldPath::ROOT;
        let when = root.field("when");
        let parts = Value::List(vec![Value::Int(2020), Value::from("x")]);
        let err = json().decode_datetime(parts, &when).unwrap_err();
        assert_eq!(err.as_value_error().unwrap().path, "when.1");
    }

    #[test]
    fn bytes() {
        let root = FieldPath::ROOT;
        assert_eq!(
            json().decode_bytes(Value::from("aGk="), &root).unwrap(),
            Bytes::from_static(b"hi")
        );
        assert!(json().decode_bytes(Value::from("!!"), &root).is_err());
    }
}
