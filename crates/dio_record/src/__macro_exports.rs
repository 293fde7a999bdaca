//! Items used by the derive macros. Not public API.

#[cfg(feature = "auto_register")]
pub use inventory;

pub use crate::attrs::{DefaultSource, Granularity, IoAttrs};
pub use crate::schema::{
    DEFAULT_TAG, EnumSchema, EnumVariantSchema, FieldSchema, GenericSchemaCell, KeyShape,
    MemberSchema, MultiTypeSchema, RecordSchema, SchemaCell, Shape, TagValue,
};
