use crate::codec::Codec;

/// Options of one encode call.
///
/// ```
/// use dio_record::{Codec, EncodeOptions};
///
/// const STRICT: EncodeOptions = EncodeOptions::new(Codec::Firestore)
///     .with_coerce_to_float(false)
///     .with_discard_extra_attrs(true);
///
/// assert_eq!(STRICT.codec, Codec::Firestore);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub codec: Codec,
    /// Accept integers for float-declared fields, emitting them as floats.
    ///
    /// Derived records always report `f64` fields as floats; this only affects
    /// hand-written [`Io`](crate::io::Io) impls that expose an integer where
    /// the shape says [`Shape::Float`](crate::schema::Shape::Float).
    pub coerce_to_float: bool,
    /// Drop extra attributes instead of emitting them.
    pub discard_extra_attrs: bool,
}

impl EncodeOptions {
    #[inline]
    pub const fn new(codec: Codec) -> Self {
        Self {
            codec,
            coerce_to_float: true,
            discard_extra_attrs: false,
        }
    }

    #[inline]
    pub const fn with_coerce_to_float(mut self, coerce: bool) -> Self {
        self.coerce_to_float = coerce;
        self
    }

    #[inline]
    pub const fn with_discard_extra_attrs(mut self, discard: bool) -> Self {
        self.discard_extra_attrs = discard;
        self
    }
}

impl Default for EncodeOptions {
    #[inline]
    fn default() -> Self {
        Self::new(Codec::Json)
    }
}
