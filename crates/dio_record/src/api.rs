use sha2::{Digest, Sha256};

use crate::codec::Codec;
use crate::de::{DecodeOptions, Inputter};
use crate::decoded::Decoded;
use crate::error::IoError;
use crate::io::IoType;
use crate::ser::{EncodeOptions, Outputter};
use crate::value::{CanonicalStyle, Value, to_canonical_json};

/// Layout of [`to_json`] output. Keys are sorted either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    Compact,
    Pretty,
}

/// Encodes a record or multi-type value for `codec` with default options.
#[inline]
pub fn encode<T: IoType>(value: &T, codec: Codec) -> Result<Value, IoError> {
    Outputter::new(EncodeOptions::new(codec)).run(value)
}

/// Encodes a record or multi-type value.
#[inline]
pub fn encode_with<T: IoType>(value: &T, options: &EncodeOptions) -> Result<Value, IoError> {
    Outputter::new(*options).run(value)
}

/// Decodes a record or multi-type value produced for `codec`.
#[inline]
pub fn decode<T: IoType>(value: Value, codec: Codec) -> Result<Decoded<T>, IoError> {
    Inputter::new(DecodeOptions::new(codec)).run(value)
}

/// Decodes a record or multi-type value.
#[inline]
pub fn decode_with<T: IoType>(value: Value, options: &DecodeOptions) -> Result<Decoded<T>, IoError> {
    Inputter::new(*options).run(value)
}

/// Checks that `value` can be encoded for `codec`, discarding the output.
#[inline]
pub fn validate<T: IoType>(value: &T, codec: Codec) -> Result<(), IoError> {
    encode(value, codec).map(drop)
}

/// Encodes a value as JSON text.
///
/// ```
/// use dio_record::{JsonStyle, Record, to_json};
///
/// #[derive(Record)]
/// struct Pair {
///     b: i32,
///     a: i32,
/// }
///
/// assert_eq!(to_json(&Pair { b: 2, a: 1 }, JsonStyle::Compact).unwrap(), r#"{"a":1,"b":2}"#);
/// ```
pub fn to_json<T: IoType>(value: &T, style: JsonStyle) -> Result<String, IoError> {
    let encoded = encode(value, Codec::Json)?;
    let text = match style {
        JsonStyle::Compact => serde_json::to_string(&encoded)?,
        JsonStyle::Pretty => serde_json::to_string_pretty(&encoded)?,
    };
    Ok(text)
}

/// Decodes a value from JSON text.
pub fn from_json<T: IoType>(text: &str) -> Result<Decoded<T>, IoError> {
    let value: Value = serde_json::from_str(text)?;
    decode(value, Codec::Json)
}

/// Stable content hash of a value: the hex SHA-256 of its compact,
/// key-sorted, ASCII-escaped JSON encoding.
///
/// ```
/// use dio_record::{Record, record_hash};
///
/// #[derive(Record)]
/// struct Pair {
///     a: i32,
///     b: String,
/// }
///
/// let one = record_hash(&Pair { a: 1, b: "x".into() }).unwrap();
/// let two = record_hash(&Pair { a: 1, b: "x".into() }).unwrap();
/// let other = record_hash(&Pair { a: 2, b: "x".into() }).unwrap();
///
/// assert_eq!(one, two);
/// assert_ne!(one, other);
/// assert_eq!(one.len(), 64);
/// ```
pub fn record_hash<T: IoType>(value: &T) -> Result<String, IoError> {
    let encoded = encode(value, Codec::Json)?;
    let text = to_canonical_json(&encoded, CanonicalStyle::Compact);
    Ok(hex::encode(Sha256::digest(text.as_bytes())))
}
