use crate::de::Inputter;
use crate::error::{IoError, ValueErrorKind};
use crate::io::{Io, IoKey, IoRef, IoType, KeyRef};
use crate::path::FieldPath;
use crate::schema::{KeyShape, Shape};
use crate::value::Value;

impl Io for bool {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Bool(*self)
    }
}

impl IoType for bool {
    #[inline]
    fn shape() -> Shape {
        Shape::Bool
    }

    fn from_io(_: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Inputter::mismatch("bool", &other, path)),
        }
    }
}

fn int_from_value<T: TryFrom<i64>>(
    value: Value,
    target: &'static str,
    path: &FieldPath<'_>,
) -> Result<T, IoError> {
    match value {
        Value::Int(i) => T::try_from(i)
            .map_err(|_| IoError::value(path, ValueErrorKind::IntOutOfRange { value: i, target })),
        other => Err(Inputter::mismatch("int", &other, path)),
    }
}

macro_rules! impl_int {
    ($($ty:ident),*) => {
        $(
            impl Io for $ty {
                #[inline]
                fn io_ref(&self) -> IoRef<'_> {
                    IoRef::Int(i64::from(*self))
                }
            }

            impl IoType for $ty {
                #[inline]
                fn shape() -> Shape {
                    Shape::Int
                }

                #[inline]
                fn from_io(_: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
                    int_from_value(value, stringify!($ty), path)
                }
            }
        )*
    };
}

impl_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_int_key {
    ($($ty:ident),*) => {
        $(
            impl IoKey for $ty {
                #[inline]
                fn key_shape() -> KeyShape {
                    KeyShape::Int
                }

                #[inline]
                fn key_ref(&self) -> KeyRef<'_> {
                    KeyRef::Int(i64::from(*self))
                }

                fn from_key(_: &mut Inputter, key: &str, path: &FieldPath<'_>) -> Result<Self, IoError> {
                    key.parse::<$ty>().map_err(|_| {
                        IoError::value(
                            path,
                            ValueErrorKind::InvalidKey {
                                key: key.to_owned(),
                                expected: concat!(stringify!($ty), " key").to_owned(),
                            },
                        )
                    })
                }
            }
        )*
    };
}

impl_int_key!(i32, i64, u32);

impl Io for f64 {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Float(*self)
    }
}

impl IoType for f64 {
    #[inline]
    fn shape() -> Shape {
        Shape::Float
    }

    #[inline]
    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        input.decode_float(value, path)
    }
}

impl Io for f32 {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Float(f64::from(*self))
    }
}

impl IoType for f32 {
    #[inline]
    fn shape() -> Shape {
        Shape::Float
    }

    #[inline]
    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        input.decode_float(value, path).map(|f| f as f32)
    }
}

impl Io for String {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        IoRef::Str(self)
    }
}

impl IoType for String {
    #[inline]
    fn shape() -> Shape {
        Shape::Str
    }

    fn from_io(_: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(Inputter::mismatch("str", &other, path)),
        }
    }
}

impl IoKey for String {
    #[inline]
    fn key_shape() -> KeyShape {
        KeyShape::Str
    }

    #[inline]
    fn key_ref(&self) -> KeyRef<'_> {
        KeyRef::Str(self)
    }

    #[inline]
    fn from_key(_: &mut Inputter, key: &str, _: &FieldPath<'_>) -> Result<Self, IoError> {
        Ok(key.to_owned())
    }
}

impl<T: Io> Io for Option<T> {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        match self {
            Some(value) => value.io_ref(),
            None => IoRef::Null,
        }
    }
}

impl<T: IoType> IoType for Option<T> {
    #[inline]
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }

    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_io(input, other, path).map(Some),
        }
    }
}

impl<T: Io> Io for Box<T> {
    #[inline]
    fn io_ref(&self) -> IoRef<'_> {
        (**self).io_ref()
    }
}

impl<T: IoType> IoType for Box<T> {
    #[inline]
    fn shape() -> Shape {
        T::shape()
    }

    #[inline]
    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
        T::from_io(input, value, path).map(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::de::DecodeOptions;

    fn input() -> Inputter {
        Inputter::new(DecodeOptions::new(Codec::Json))
    }

    #[test]
    fn ints_range_checked() {
        let root = FieldPath::ROOT;
        assert_eq!(u8::from_io(&mut input(), Value::Int(255), &root).unwrap(), 255);

        let err = u8::from_io(&mut input(), Value::Int(256), &root).unwrap_err();
        assert!(matches!(
            err.as_value_error().map(|e| &e.kind),
            Some(ValueErrorKind::IntOutOfRange { value: 256, target: "u8" })
        ));

        assert!(i32::from_io(&mut input(), Value::Float(1.0), &root).is_err());
    }

    #[test]
    fn int_keys() {
        let root = FieldPath::ROOT;
        assert_eq!(i64::from_key(&mut input(), "-7", &root).unwrap(), -7);
        assert!(u32::from_key(&mut input(), "-7", &root).is_err());
        assert!(i32::from_key(&mut input(), "seven", &root).is_err());
    }

    #[test]
    fn options_and_boxes() {
        let root = FieldPath::ROOT;
        assert_eq!(
            Option::<String>::from_io(&mut input(), Value::Null, &root).unwrap(),
            None
        );
        assert_eq!(
            Option::<Box<String>>::from_io(&mut input(), Value::from("s"), &root).unwrap(),
            Some(Box::new("s".to_owned()))
        );
        assert!(matches!(Option::<bool>::shape(), Shape::Optional(_)));
        assert!(matches!(Some(3_i8).io_ref(), IoRef::Int(3)));
        assert!(matches!(Option::<i8>::None.io_ref(), IoRef::Null));
    }
}
