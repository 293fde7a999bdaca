use core::fmt;

use crate::value::Value;

/// What was substituted while decoding.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LossyKind {
    /// An enum value not among the declared variants; the fallback variant
    /// was used.
    UnknownEnumValue {
        enum_path: &'static str,
        value: Value,
    },
    /// A multi-type id not in the family's registry; the fallback variant
    /// was used.
    UnknownTypeId {
        family: &'static str,
        value: Value,
    },
}

/// One substitution made while decoding, with the path of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct LossyReason {
    pub path: String,
    pub kind: LossyKind,
}

impl fmt::Display for LossyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.path.is_empty() { "<root>" } else { self.path.as_str() };
        match &self.kind {
            LossyKind::UnknownEnumValue { enum_path, value } => {
                write!(f, "{at}: unknown `{enum_path}` value {value:?}")
            }
            LossyKind::UnknownTypeId { family, value } => {
                write!(f, "{at}: unknown `{family}` type id {value:?}")
            }
        }
    }
}

/// Result of a decode: either an exact reconstruction of the input or a
/// lossy one where unknown values were replaced by declared fallbacks.
///
/// Lossy values must not be written back: re-encoding them would silently
/// replace the unknown data with the fallback. [`Outputter::run_decoded`]
/// refuses them, and getting the value out of a lossy result requires the
/// explicit [`Decoded::into_lossy_value`].
///
/// [`Outputter::run_decoded`]: crate::Outputter::run_decoded
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Exact(T),
    Lossy { value: T, reasons: Vec<LossyReason> },
}

impl<T> Decoded<T> {
    pub(crate) fn new(value: T, reasons: Vec<LossyReason>) -> Self {
        if reasons.is_empty() {
            Decoded::Exact(value)
        } else {
            Decoded::Lossy { value, reasons }
        }
    }

    #[inline]
    pub fn is_lossy(&self) -> bool {
        matches!(self, Decoded::Lossy { .. })
    }

    /// Read access to the decoded value, lossy or not.
    #[inline]
    pub fn value(&self) -> &T {
        match self {
            Decoded::Exact(value) | Decoded::Lossy { value, .. } => value,
        }
    }

    /// The substitutions made; empty for exact results.
    #[inline]
    pub fn reasons(&self) -> &[LossyReason] {
        match self {
            Decoded::Exact(_) => &[],
            Decoded::Lossy { reasons, .. } => reasons,
        }
    }

    /// Returns the value if it is exact, or gives back `self`.
    pub fn into_exact(self) -> Result<T, Self> {
        match self {
            Decoded::Exact(value) => Ok(value),
            lossy => Err(lossy),
        }
    }

    /// Returns the value even if it is lossy.
    ///
    /// The caller takes responsibility for not writing it back. The encoder
    /// only catches part of that: a multi-type fallback variant is refused
    /// with [`IoError::FallbackOutput`](crate::IoError::FallbackOutput), but
    /// an enum fallback variant is an ordinary variant with a declared value
    /// and encodes without error, replacing whatever value was read.
    #[inline]
    pub fn into_lossy_value(self) -> T {
        match self {
            Decoded::Exact(value) | Decoded::Lossy { value, .. } => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_lossy() {
        let exact = Decoded::new(1, Vec::new());
        assert!(!exact.is_lossy());
        assert_eq!(exact.into_exact(), Ok(1));

        let reason = LossyReason {
            path: "shape".into(),
            kind: LossyKind::UnknownTypeId {
                family: "Shape",
                value: Value::from("triangle"),
            },
        };
        let lossy = Decoded::new(2, vec![reason.clone()]);
        assert!(lossy.is_lossy());
        assert_eq!(lossy.reasons(), &[reason]);
        assert_eq!(*lossy.value(), 2);

        let lossy = lossy.into_exact().unwrap_err();
        assert_eq!(lossy.into_lossy_value(), 2);
    }
}
