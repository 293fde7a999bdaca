use core::fmt;

use super::{EnumSchema, MultiTypeSchema, RecordSchema};

/// Declared key type of a dict.
#[derive(Clone, Copy)]
pub enum KeyShape {
    Str,
    Int,
    Enum(fn() -> &'static EnumSchema),
}

/// The declared type of a field, as seen by the encoder and decoder.
///
/// Every [`IoType`](crate::IoType) reports its shape; compound shapes nest.
/// Schema-bearing shapes hold a function returning the static schema so
/// recursive types can describe themselves without building the schema
/// eagerly.
#[derive(Clone)]
pub enum Shape {
    /// Any codec-legal [`Value`](crate::Value).
    Any,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    DateTime,
    TimeDelta,
    /// `T | None`.
    Optional(Box<Shape>),
    Tuple(Vec<Shape>),
    List(Box<Shape>),
    Set(Box<Shape>),
    Dict(KeyShape, Box<Shape>),
    Record(fn() -> &'static RecordSchema),
    Enum(fn() -> &'static EnumSchema),
    Multi(fn() -> &'static MultiTypeSchema),
}

impl Shape {
    /// Set elements with a native total order.
    ///
    /// Sets of any other (hashable) shape are ordered by the canonical JSON
    /// text of their encoded elements.
    pub fn is_natively_ordered(&self) -> bool {
        matches!(
            self,
            Shape::Str | Shape::Int | Shape::Float | Shape::Bool | Shape::DateTime
        )
    }

    /// Shapes allowed as set elements.
    pub fn is_set_element(&self) -> bool {
        match self {
            Shape::Any | Shape::List(_) | Shape::Dict(..) | Shape::Set(_) => false,
            Shape::Optional(inner) => inner.is_set_element(),
            Shape::Tuple(items) => items.iter().all(Shape::is_set_element),
            _ => true,
        }
    }

    /// Returns `true` if a datetime can appear directly or through
    /// optional or container layers.
    pub fn contains_datetime(&self) -> bool {
        match self {
            Shape::DateTime => true,
            Shape::Optional(inner) | Shape::List(inner) | Shape::Set(inner) => {
                inner.contains_datetime()
            }
            Shape::Dict(_, value) => value.contains_datetime(),
            Shape::Tuple(items) => items.iter().any(Shape::contains_datetime),
            _ => false,
        }
    }

    /// Returns `true` for shapes that may be a top-level value.
    #[inline]
    pub fn is_root(&self) -> bool {
        matches!(self, Shape::Record(_) | Shape::Multi(_))
    }
}

impl fmt::Display for KeyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyShape::Str => f.write_str("str"),
            KeyShape::Int => f.write_str("int"),
            KeyShape::Enum(schema) => f.write_str(schema().type_path()),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Any => f.write_str("any"),
            Shape::Bool => f.write_str("bool"),
            Shape::Int => f.write_str("int"),
            Shape::Float => f.write_str("float"),
            Shape::Str => f.write_str("str"),
            Shape::Bytes => f.write_str("bytes"),
            Shape::DateTime => f.write_str("datetime"),
            Shape::TimeDelta => f.write_str("timedelta"),
            Shape::Optional(inner) => write!(f, "{inner} | None"),
            Shape::Tuple(items) => {
                f.write_str("tuple[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Shape::List(inner) => write!(f, "list[{inner}]"),
            Shape::Set(inner) => write!(f, "set[{inner}]"),
            Shape::Dict(key, value) => write!(f, "dict[{key}, {value}]"),
            Shape::Record(schema) => f.write_str(schema().type_path()),
            Shape::Enum(schema) => f.write_str(schema().type_path()),
            Shape::Multi(schema) => f.write_str(schema().type_path()),
        }
    }
}

impl fmt::Debug for KeyShape {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Debug for Shape {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyShape, Shape};

    #[test]
    fn set_elements() {
        assert!(Shape::Str.is_set_element());
        assert!(Shape::Tuple(vec![Shape::Int, Shape::Str]).is_set_element());
        assert!(!Shape::Any.is_set_element());
        assert!(!Shape::List(Box::new(Shape::Int)).is_set_element());
        assert!(!Shape::Optional(Box::new(Shape::Set(Box::new(Shape::Int)))).is_set_element());

        assert!(Shape::Float.is_natively_ordered());
        assert!(!Shape::Optional(Box::new(Shape::Int)).is_natively_ordered());
    }

    #[test]
    fn datetime_reachability() {
        let shape = Shape::Dict(
            KeyShape::Str,
            Box::new(Shape::List(Box::new(Shape::Optional(Box::new(Shape::DateTime))))),
        );
        assert!(shape.contains_datetime());
        assert!(!Shape::TimeDelta.contains_datetime());
    }

    #[test]
    fn display() {
        let shape = Shape::Dict(
            KeyShape::Int,
            Box::new(Shape::Tuple(vec![Shape::Str, Shape::Optional(Box::new(Shape::Float))])),
        );
        assert_eq!(shape.to_string(), "dict[int, tuple[str, float | None]]");
    }
}
