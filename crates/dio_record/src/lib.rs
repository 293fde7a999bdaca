//! Schema-driven encoding and decoding of record types.
//!
//! A *record* is a struct with a fixed set of named, typed fields. Deriving
//! [`Record`](derive::Record) builds a static [`RecordSchema`] for it: field
//! names, storage names, declared [`Shape`]s and per-field [`IoAttrs`].
//! Records, [`IoEnum`] enums and [`MultiType`] families are converted to and
//! from a codec-native [`Value`] tree.
//!
//! # Overview
//!
//! - [`PrepSession`] validates a type's schema once (union shapes, default
//!   sources, enum values, multi-type registries) and caches the result per
//!   [`TypeId`](core::any::TypeId).
//! - [`Outputter`] walks a live value against its declared shape and produces
//!   a [`Value`], applying default omission, type-id injection for multi-type
//!   members and codec-specific representations.
//! - [`Inputter`] is the dual. It rebuilds typed values, tolerating unknown
//!   enum values and unknown multi-type ids through declared fallbacks, and
//!   reports such substitutions through [`Decoded::Lossy`].
//!
//! # Example
//!
//! ```
//! use dio_record::{Codec, Record, Value, decode, encode};
//!
//! #[derive(Record, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     #[io(storage_name = "l", store_default = false, default)]
//!     label: String,
//! }
//!
//! let point = Point { x: 1, y: 2, label: String::new() };
//! let encoded = encode(&point, Codec::Json).unwrap();
//!
//! // `label` equals its default and is omitted.
//! assert_eq!(encoded.as_map().unwrap().len(), 2);
//! assert_eq!(encoded.get("x"), Some(&Value::Int(1)));
//!
//! let decoded = decode::<Point>(encoded, Codec::Json).unwrap();
//! assert_eq!(decoded.into_exact().unwrap(), point);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macros emit `::dio_record::...` paths; this alias makes them
// resolve inside the crate's own tests as well.
extern crate self as dio_record;

// -----------------------------------------------------------------------------
// Modules

mod api;
mod attrs;
mod codec;
mod decoded;
mod error;
mod impls;
mod path;
mod type_stack;

pub mod de;
pub mod io;
pub mod prep;
pub mod schema;
pub mod ser;
pub mod value;

#[cfg(feature = "auto_register")]
pub mod registry;

#[doc(hidden)]
pub mod __macro_exports;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use api::{
    JsonStyle, decode, decode_with, encode, encode_with, from_json, record_hash, to_json, validate,
};
pub use attrs::{DefaultSource, ExtraAttrs, Granularity, IoAttrs};
pub use codec::Codec;
pub use de::{DecodeOptions, Inputter, RecordReader};
pub use decoded::{Decoded, LossyKind, LossyReason};
pub use error::{IoError, SchemaError, ValueError, ValueErrorKind};
pub use io::{Io, IoEnum, IoKey, IoType, MultiType, Record, RecordType};
pub use path::FieldPath;
pub use prep::PrepSession;
pub use schema::{EnumSchema, FieldSchema, MultiTypeSchema, RecordSchema, Shape};
pub use ser::{EncodeOptions, Outputter};
pub use value::{Value, ValueMap};

pub use dio_record_derive as derive;
pub use dio_record_derive::{IoEnum, MultiType, Record};
