use crate::codec::Codec;

/// Options of one decode call.
///
/// ```
/// use dio_record::{Codec, DecodeOptions};
///
/// let strict = DecodeOptions::new(Codec::Json)
///     .with_allow_unknown_attrs(false)
///     .with_allow_lossy(false);
///
/// assert!(strict.coerce_to_float);
/// assert!(!strict.allow_unknown_attrs);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub codec: Codec,
    /// Accept integers for float-declared fields.
    pub coerce_to_float: bool,
    /// When `false`, input keys matching no field are an error.
    pub allow_unknown_attrs: bool,
    /// Drop unknown keys instead of keeping them as extra attributes.
    pub discard_unknown_attrs: bool,
    /// When `false`, unknown enum values and type ids are errors even if a
    /// fallback is declared.
    pub allow_lossy: bool,
}

impl DecodeOptions {
    #[inline]
    pub const fn new(codec: Codec) -> Self {
        Self {
            codec,
            coerce_to_float: true,
            allow_unknown_attrs: true,
            discard_unknown_attrs: false,
            allow_lossy: true,
        }
    }

    #[inline]
    pub const fn with_coerce_to_float(mut self, coerce: bool) -> Self {
        self.coerce_to_float = coerce;
        self
    }

    #[inline]
    pub const fn with_allow_unknown_attrs(mut self, allow: bool) -> Self {
        self.allow_unknown_attrs = allow;
        self
    }

    #[inline]
    pub const fn with_discard_unknown_attrs(mut self, discard: bool) -> Self {
        self.discard_unknown_attrs = discard;
        self
    }

    #[inline]
    pub const fn with_allow_lossy(mut self, allow: bool) -> Self {
        self.allow_lossy = allow;
        self
    }
}

impl Default for DecodeOptions {
    #[inline]
    fn default() -> Self {
        Self::new(Codec::Json)
    }
}
