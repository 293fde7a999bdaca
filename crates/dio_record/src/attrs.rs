use core::ops::{Deref, DerefMut};

use chrono::{DateTime, Timelike, Utc};

use crate::error::ValueErrorKind;
use crate::value::ValueMap;

// -----------------------------------------------------------------------------
// DefaultSource

/// Where a field's default value comes from, in order of precedence.
///
/// A field may declare several; the first one in this order is used for
/// both default omission and filling missing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DefaultSource {
    /// `soft_default = expr`: an input-only default that the type itself does
    /// not carry.
    SoftDefault,
    /// `soft_default_factory = path`.
    SoftDefaultFactory,
    /// `default` or `default = expr`.
    Default,
    /// `default_factory = path`.
    DefaultFactory,
}

impl DefaultSource {
    pub const fn attr_name(self) -> &'static str {
        match self {
            DefaultSource::SoftDefault => "soft_default",
            DefaultSource::SoftDefaultFactory => "soft_default_factory",
            DefaultSource::Default => "default",
            DefaultSource::DefaultFactory => "default_factory",
        }
    }
}

// -----------------------------------------------------------------------------
// Granularity

/// Whole-unit constraint on a datetime field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Days,
    Hours,
    Minutes,
}

impl Granularity {
    pub const fn attr_name(self) -> &'static str {
        match self {
            Granularity::Days => "whole_days",
            Granularity::Hours => "whole_hours",
            Granularity::Minutes => "whole_minutes",
        }
    }

    const fn unit(self) -> &'static str {
        match self {
            Granularity::Days => "days",
            Granularity::Hours => "hours",
            Granularity::Minutes => "minutes",
        }
    }

    pub(crate) fn check(self, dt: &DateTime<Utc>) -> Result<(), ValueErrorKind> {
        let whole = dt.nanosecond() == 0
            && dt.second() == 0
            && match self {
                Granularity::Days => dt.hour() == 0 && dt.minute() == 0,
                Granularity::Hours => dt.minute() == 0,
                Granularity::Minutes => true,
            };

        if whole {
            Ok(())
        } else {
            Err(ValueErrorKind::NotWhole { unit: self.unit() })
        }
    }
}

// -----------------------------------------------------------------------------
// IoAttrs

/// Per-field storage options.
///
/// Built by the derive from `#[io(...)]` field attributes, or by hand with
/// the `const` builder methods.
///
/// # Examples
///
/// ```
/// use dio_record::{DefaultSource, IoAttrs};
///
/// const ATTRS: IoAttrs = IoAttrs::new()
///     .with_storage_name("n")
///     .with_store_default(false)
///     .with_default_source(DefaultSource::Default);
///
/// assert_eq!(ATTRS.storage_name(), Some("n"));
/// assert!(!ATTRS.store_default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoAttrs {
    storage_name: Option<&'static str>,
    store_default: bool,
    default_source: Option<DefaultSource>,
    granularity: Option<Granularity>,
    validated: bool,
}

impl Default for IoAttrs {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl IoAttrs {
    /// Attrs of a plain field: stored under its own name, defaults stored.
    pub const fn new() -> Self {
        Self {
            storage_name: None,
            store_default: true,
            default_source: None,
            granularity: None,
            validated: false,
        }
    }

    #[inline]
    pub const fn with_storage_name(mut self, name: &'static str) -> Self {
        self.storage_name = Some(name);
        self
    }

    /// When `false`, a field whose value equals its default is omitted
    /// from the output.
    #[inline]
    pub const fn with_store_default(mut self, store_default: bool) -> Self {
        self.store_default = store_default;
        self
    }

    #[inline]
    pub const fn with_default_source(mut self, source: DefaultSource) -> Self {
        self.default_source = Some(source);
        self
    }

    #[inline]
    pub const fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    #[inline]
    pub const fn with_validator(mut self) -> Self {
        self.validated = true;
        self
    }

    #[inline]
    pub const fn storage_name(&self) -> Option<&'static str> {
        self.storage_name
    }

    #[inline]
    pub const fn store_default(&self) -> bool {
        self.store_default
    }

    #[inline]
    pub const fn default_source(&self) -> Option<DefaultSource> {
        self.default_source
    }

    #[inline]
    pub const fn granularity(&self) -> Option<Granularity> {
        self.granularity
    }

    #[inline]
    pub const fn has_validator(&self) -> bool {
        self.validated
    }
}

// -----------------------------------------------------------------------------
// ExtraAttrs

/// Unrecognized attributes carried through a decode/encode cycle.
///
/// A record opts in with a field of this type marked `#[io(extra)]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraAttrs(ValueMap);

impl ExtraAttrs {
    #[inline]
    pub const fn new() -> Self {
        Self(ValueMap::new())
    }

    #[inline]
    pub fn into_inner(self) -> ValueMap {
        self.0
    }
}

impl From<ValueMap> for ExtraAttrs {
    #[inline]
    fn from(map: ValueMap) -> Self {
        Self(map)
    }
}

impl Deref for ExtraAttrs {
    type Target = ValueMap;

    #[inline]
    fn deref(&self) -> &ValueMap {
        &self.0
    }
}

impl DerefMut for ExtraAttrs {
    #[inline]
    fn deref_mut(&mut self) -> &mut ValueMap {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn granularity() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let hour = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
        let minute = Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 1).unwrap();

        assert!(Granularity::Days.check(&midnight).is_ok());
        assert!(Granularity::Days.check(&hour).is_err());
        assert!(Granularity::Hours.check(&hour).is_ok());
        assert!(Granularity::Hours.check(&minute).is_err());
        assert!(Granularity::Minutes.check(&minute).is_ok());
        assert_eq!(
            Granularity::Minutes.check(&second),
            Err(ValueErrorKind::NotWhole { unit: "minutes" })
        );
    }

    #[test]
    fn default_precedence_order() {
        assert!(DefaultSource::SoftDefault < DefaultSource::SoftDefaultFactory);
        assert!(DefaultSource::SoftDefaultFactory < DefaultSource::Default);
        assert!(DefaultSource::Default < DefaultSource::DefaultFactory);
    }
}
