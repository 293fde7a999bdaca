use core::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta};

use super::{Io, Record};
use crate::schema::{EnumSchema, MultiTypeSchema};
use crate::value::Value;

/// Iterator over the elements of a sequence or set.
pub type SeqIter<'a> = Box<dyn ExactSizeIterator<Item = &'a dyn Io> + 'a>;

/// Iterator over the entries of a dict.
pub type MapIter<'a> = Box<dyn Iterator<Item = (KeyRef<'a>, &'a dyn Io)> + 'a>;

/// A borrowed, runtime view of a value.
///
/// The encoder checks each view against the declared
/// [`Shape`](crate::Shape) of the field it came from.
pub enum IoRef<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    Bytes(&'a [u8]),
    DateTime(DateTime<FixedOffset>),
    TimeDelta(TimeDelta),
    Seq(SeqIter<'a>),
    Map(MapIter<'a>),
    Record(&'a dyn Record),
    /// A variant of an [`IoEnum`](crate::IoEnum), by index into its schema.
    Enum(&'static EnumSchema, usize),
    Multi(MultiRef<'a>),
    /// An untyped [`Value`], legal under some codec.
    Value(&'a Value),
}

/// A multi-type family value: a member record, or the fallback variant.
#[derive(Clone, Copy)]
pub struct MultiRef<'a> {
    pub family: &'static MultiTypeSchema,
    /// `None` for the fallback variant.
    pub member: Option<&'a dyn Record>,
}

/// A borrowed dict key.
#[derive(Debug, Clone, Copy)]
pub enum KeyRef<'a> {
    Str(&'a str),
    Int(i64),
    Enum(&'static EnumSchema, usize),
}

impl IoRef<'_> {
    /// Short name of the runtime kind, used in error messages.
    pub fn kind_name(&self) -> String {
        match self {
            IoRef::Null => "None".into(),
            IoRef::Bool(_) => "bool".into(),
            IoRef::Int(_) => "int".into(),
            IoRef::Float(_) => "float".into(),
            IoRef::Str(_) => "str".into(),
            IoRef::Bytes(_) => "bytes".into(),
            IoRef::DateTime(_) => "datetime".into(),
            IoRef::TimeDelta(_) => "timedelta".into(),
            IoRef::Seq(_) => "sequence".into(),
            IoRef::Map(_) => "dict".into(),
            IoRef::Record(r) => r.record_schema().type_path().into(),
            IoRef::Enum(schema, _) => schema.type_path().into(),
            IoRef::Multi(m) => m.family.type_path().into(),
            IoRef::Value(v) => format!("{} value", v.kind_name()),
        }
    }
}

impl KeyRef<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            KeyRef::Str(_) => "str",
            KeyRef::Int(_) => "int",
            KeyRef::Enum(schema, _) => schema.type_path(),
        }
    }
}

impl fmt::Debug for IoRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoRef::Null => f.write_str("Null"),
            IoRef::Bool(b) => write!(f, "Bool({b})"),
            IoRef::Int(i) => write!(f, "Int({i})"),
            IoRef::Float(x) => write!(f, "Float({x})"),
            IoRef::Str(s) => write!(f, "Str({s:?})"),
            IoRef::Bytes(b) => write!(f, "Bytes(len = {})", b.len()),
            IoRef::DateTime(dt) => write!(f, "DateTime({dt})"),
            IoRef::TimeDelta(td) => write!(f, "TimeDelta({td})"),
            IoRef::Value(v) => write!(f, "Value({v:?})"),
            other => write!(f, "{}", other.kind_name()),
        }
    }
}
