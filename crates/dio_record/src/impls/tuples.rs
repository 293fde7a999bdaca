use crate::de::Inputter;
use crate::error::{IoError, ValueErrorKind};
use crate::io::{Io, IoRef, IoType};
use crate::path::FieldPath;
use crate::schema::Shape;
use crate::value::Value;

macro_rules! impl_tuple {
    ($len:literal: $($name:ident $index:tt),+) => {
        impl<$($name: Io),+> Io for ($($name,)+) {
            #[inline]
            fn io_ref(&self) -> IoRef<'_> {
                IoRef::Seq(Box::new([$(&self.$index as &dyn Io),+].into_iter()))
            }
        }

        impl<$($name: IoType),+> IoType for ($($name,)+) {
            fn shape() -> Shape {
                Shape::Tuple(vec![$($name::shape()),+])
            }

            fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError> {
                let items = match value {
                    Value::List(items) => items,
                    other => return Err(Inputter::mismatch(concat!("tuple of ", $len), &other, path)),
                };
                if items.len() != $len {
                    return Err(IoError::value(
                        path,
                        ValueErrorKind::TupleLength { expected: $len, found: items.len() },
                    ));
                }

                let mut items = items.into_iter();
                Ok(($(
                    {
                        let item = items.next().unwrap_or_default();
                        $name::from_io(input, item, &path.index($index))?
                    },
                )+))
            }
        }
    };
}

impl_tuple!(1: A 0);
impl_tuple!(2: A 0, B 1);
impl_tuple!(3: A 0, B 1, C 2);
impl_tuple!(4: A 0, B 1, C 2, D 3);
impl_tuple!(5: A 0, B 1, C 2, D 3, E 4);
impl_tuple!(6: A 0, B 1, C 2, D 3, E 4, F 5);
impl_tuple!(7: A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_tuple!(8: A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::de::DecodeOptions;

    #[test]
    fn length_checked() {
        let mut input = Inputter::new(DecodeOptions::new(Codec::Json));
        let root = FieldPath::ROOT;

        let raw = Value::List(vec![Value::Int(1), Value::from("a")]);
        let pair = <(i32, String)>::from_io(&mut input, raw, &root).unwrap();
        assert_eq!(pair, (1, "a".to_owned()));

        let short = Value::List(vec![Value::Int(1)]);
        let err = <(i32, String)>::from_io(&mut input, short, &root).unwrap_err();
        assert!(matches!(
            err.as_value_error().map(|e| &e.kind),
            Some(ValueErrorKind::TupleLength { expected: 2, found: 1 })
        ));

        assert!(matches!((1_i64, true).io_ref(), IoRef::Seq(seq) if seq.len() == 2));
    }
}
