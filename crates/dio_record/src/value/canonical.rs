use std::io;

use serde_core::Serialize;
use serde_json::ser::{Formatter, Serializer};

use super::Value;

/// Separator style of [`to_canonical_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalStyle {
    /// `", "` and `": "` separators.
    Spaced,
    /// `","` and `":"` separators.
    Compact,
}

/// Renders `value` as canonical JSON text.
///
/// Keys are sorted (maps are ordered by construction), non-ASCII characters
/// are written as lowercase `\uXXXX` escapes (surrogate pairs outside the
/// BMP), and separators follow `style`. The spaced form is the sort key for
/// set elements without a native order; the compact form is what
/// [`record_hash`](crate::record_hash) digests.
///
/// # Examples
///
/// ```
/// use dio_record::Value;
/// use dio_record::value::{CanonicalStyle, to_canonical_json};
///
/// let value: Value = [("b", Value::from("é")), ("a", Value::Int(1))].into_iter().collect();
///
/// assert_eq!(to_canonical_json(&value, CanonicalStyle::Spaced), r#"{"a": 1, "b": "\u00e9"}"#);
/// assert_eq!(to_canonical_json(&value, CanonicalStyle::Compact), r#"{"a":1,"b":"\u00e9"}"#);
/// ```
pub fn to_canonical_json(value: &Value, style: CanonicalStyle) -> String {
    let mut out = Vec::with_capacity(64);
    let mut ser = Serializer::with_formatter(&mut out, CanonicalFormatter { style });
    // Writing into a Vec cannot fail and `Value` has no fallible impls.
    if value.serialize(&mut ser).is_err() {
        return String::new();
    }
    // Every byte written is ASCII.
    String::from_utf8(out).unwrap_or_default()
}

struct CanonicalFormatter {
    style: CanonicalStyle,
}

impl CanonicalFormatter {
    #[inline]
    fn item_separator(&self) -> &'static [u8] {
        match self.style {
            CanonicalStyle::Spaced => b", ",
            CanonicalStyle::Compact => b",",
        }
    }

    #[inline]
    fn key_separator(&self) -> &'static [u8] {
        match self.style {
            CanonicalStyle::Spaced => b": ",
            CanonicalStyle::Compact => b":",
        }
    }
}

impl Formatter for CanonicalFormatter {
    #[inline]
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(self.item_separator())
        }
    }

    #[inline]
    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(self.item_separator())
        }
    }

    #[inline]
    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.key_separator())
    }

    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0_u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}
