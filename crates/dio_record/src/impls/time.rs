use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::de::Inputter;
use crate::error::IoError;
use crate::io::{Io, IoRef, IoType};
use crate::path::FieldPath;
use crate::schema::Shape;
use crate::value::Value;

impl Io for DateTime<Utc> {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::DateTime(self.fixed_offset())
    }
}

impl IoType for DateTime<Utc> {
    #[inline]
    fn shape() -> Shape {
        Shape::DateTime
    }

    #[inline]
    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        input.decode_datetime(value, path)
    }
}

/// Only UTC values (offset zero) can be encoded; decoded values always have
/// offset zero.
impl Io for DateTime<FixedOffset> {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::DateTime(*self)
    }
}

impl IoType for DateTime<FixedOffset> {
    #[inline]
    fn shape() -> Shape {
        Shape::DateTime
    }

    #[inline]
    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        input.decode_datetime(value, path).map(|dt| dt.fixed_offset())
    }
}

impl Io for TimeDelta {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::TimeDelta(*self)
    }
}

impl IoType for TimeDelta {
    #[inline]
    fn shape() -> Shape {
        Shape::TimeDelta
    }

    #[inline]
    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        input.decode_timedelta(value, path)
    }
}
