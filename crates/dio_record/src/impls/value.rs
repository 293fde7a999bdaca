use bytes::Bytes;

use crate::de::Inputter;
use crate::error::IoError;
use crate::io::{Io, IoRef, IoType};
use crate::path::FieldPath;
use crate::schema::Shape;
use crate::value::Value;

impl Io for Value {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Value(self)
    }
}

impl IoType for Value {
    #[inline]
    fn shape() -> Shape {
        Shape::Any
    }

    #[inline]
    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        input.decode_any(value, path)
    }
}

impl Io for Bytes {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Bytes(self)
    }
}

impl IoType for Bytes {
    #[inline]
    fn shape() -> Shape {
        Shape::Bytes
    }

    #[inline]
    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        input.decode_bytes(value, path)
    }
}
