use core::any::Any;

use super::{IoRef, KeyRef};
use crate::attrs::ExtraAttrs;
use crate::de::Inputter;
use crate::error::IoError;
use crate::path::FieldPath;
use crate::schema::{EnumSchema, KeyShape, MultiTypeSchema, RecordSchema, Shape};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Io

/// A value the [`Outputter`](crate::Outputter) can walk.
///
/// Object safe; compound views hand out `&dyn Io` children.
pub trait Io: Any {
    /// Borrowed runtime view of this value.
    fn io_ref(&self) -> IoRef<'_>;
}

/// A type with a declared [`Shape`] that can be rebuilt from a [`Value`].
///
/// Implemented for the supported primitive, time and container types and
/// by the derives. Decoding goes through the [`Inputter`], which carries the
/// options and the attrs of the field being decoded.
pub trait IoType: Io + Sized {
    /// The declared shape of values of this type.
    fn shape() -> Shape;

    /// Builds a value from its encoded form.
    ///
    /// `path` locates `value` for error messages.
    fn from_io(input: &mut Inputter, value: Value, path: &FieldPath<'_>) -> Result<Self, IoError>;
}

// -----------------------------------------------------------------------------
// Record

/// A struct with a [`RecordSchema`]. Use `#[derive(Record)]`.
///
/// Field indices refer to [`RecordSchema::fields`].
pub trait Record: Io {
    fn record_schema(&self) -> &'static RecordSchema;

    /// The value of the field at `index`.
    fn field_io(&self, index: usize) -> Option<&dyn Io>;

    /// Returns `true` if the field at `index` equals its default value.
    ///
    /// Only consulted for fields with `store_default = false`. The default
    /// is resolved in the order of [`DefaultSource`](crate::DefaultSource).
    fn field_is_default(&self, index: usize) -> bool {
        let _ = index;
        false
    }

    /// Runs the validator declared on the field at `index`, if any.
    fn validate_field(&self, index: usize) -> Result<(), String> {
        let _ = index;
        Ok(())
    }

    /// Attributes carried over from input that matched no field.
    fn extra_attrs(&self) -> Option<&ExtraAttrs> {
        None
    }
}

/// Static access to a record's schema.
pub trait RecordType: Record + IoType {
    fn schema() -> &'static RecordSchema;
}

// -----------------------------------------------------------------------------
// IoEnum

/// A fieldless enum stored as its variants' primitive values.
/// Use `#[derive(IoEnum)]`.
pub trait IoEnum: IoType {
    fn enum_schema() -> &'static EnumSchema;

    fn variant_index(&self) -> usize;

    fn from_variant_index(index: usize) -> Option<Self>;
}

// -----------------------------------------------------------------------------
// MultiType

/// A closed family of record types distinguished by a stored type id.
/// Use `#[derive(MultiType)]` on an enum wrapping the member records.
pub trait MultiType: IoType {
    fn family() -> &'static MultiTypeSchema;
}

// -----------------------------------------------------------------------------
// IoKey

/// A type usable as a dict key.
///
/// Keys are always stored as strings; see [`KeyShape`].
pub trait IoKey: Sized + 'static {
    fn key_shape() -> KeyShape;

    fn key_ref(&self) -> KeyRef<'_>;

    /// Parses a stored key. `path` locates the dict.
    fn from_key(input: &mut Inputter, key: &str, path: &FieldPath<'_>) -> Result<Self, IoError>;
}
