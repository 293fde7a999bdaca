//! Static descriptions of records, enums and multi-type families.
//!
//! Schemas are built once per type (see [`SchemaCell`] and
//! [`GenericSchemaCell`]) and then only read.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod enums;
mod multi;
mod record;
mod shape;
mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericSchemaCell, SchemaCell};
pub use enums::{EnumSchema, EnumVariantSchema};
pub use multi::{DEFAULT_TAG, MemberSchema, MultiTypeSchema};
pub use record::{FieldSchema, Membership, RecordSchema};
pub use shape::{KeyShape, Shape};
pub use tag::TagValue;

pub(crate) use tag::describe_value;
