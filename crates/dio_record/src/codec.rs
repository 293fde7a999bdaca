use core::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Timelike, Utc};

use crate::error::ValueErrorKind;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// The output format a [`Value`](crate::Value) tree is built for.
///
/// Selected once per encode/decode call and never switched mid-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Codec {
    /// JSON-compatible values only: bytes become base64 strings and
    /// datetimes become component arrays.
    #[default]
    Json,
    /// Document-store values: bytes and datetimes are kept native.
    Firestore,
}

impl Codec {
    /// Returns `true` if raw [`Bytes`](bytes::Bytes) values are stored as-is.
    #[inline]
    pub const fn native_bytes(self) -> bool {
        matches!(self, Codec::Firestore)
    }

    /// Returns `true` if datetimes are stored as native
    /// [`Value::DateTime`](crate::Value::DateTime).
    #[inline]
    pub const fn native_datetime(self) -> bool {
        matches!(self, Codec::Firestore)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Codec::Json => "json",
            Codec::Firestore => "firestore",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// Datetime

/// Rejects datetimes that neither codec can store exactly.
///
/// Both forms hold microseconds at most, so leap seconds and
/// sub-microsecond nanoseconds are errors rather than being truncated.
pub(crate) fn check_datetime_precision(dt: &DateTime<Utc>) -> Result<(), ValueErrorKind> {
    let nanos = dt.nanosecond();
    if nanos >= 1_000_000_000 {
        return Err(ValueErrorKind::InvalidDateTime(format!(
            "leap second `{dt}` cannot be stored"
        )));
    }
    if nanos % 1_000 != 0 {
        return Err(ValueErrorKind::InvalidDateTime(format!(
            "`{dt}` is finer than a microsecond"
        )));
    }
    Ok(())
}

/// Splits a UTC datetime into `[year, month, day, hour, minute, second, microsecond]`.
pub(crate) fn datetime_to_components(dt: &DateTime<Utc>) -> Result<[i64; 7], ValueErrorKind> {
    check_datetime_precision(dt)?;
    let micros = dt.nanosecond() / 1_000;
    Ok([
        i64::from(dt.year()),
        i64::from(dt.month()),
        i64::from(dt.day()),
        i64::from(dt.hour()),
        i64::from(dt.minute()),
        i64::from(dt.second()),
        i64::from(micros),
    ])
}

pub(crate) fn datetime_from_components(parts: &[i64]) -> Result<DateTime<Utc>, ValueErrorKind> {
    let invalid = || ValueErrorKind::InvalidDateTime(format!("invalid datetime components {parts:?}"));

    let &[year, month, day, hour, minute, second, micros] = parts else {
        return Err(ValueErrorKind::InvalidDateTime(format!(
            "expected 7 datetime components, found {}",
            parts.len()
        )));
    };

    let narrow = |v: i64| u32::try_from(v).map_err(|_| invalid());
    let year = i32::try_from(year).map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, narrow(month)?, narrow(day)?)
        .and_then(|date| {
            date.and_hms_micro_opt(
                narrow(hour).ok()?,
                narrow(minute).ok()?,
                narrow(second).ok()?,
                narrow(micros).ok()?,
            )
        })
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}

// -----------------------------------------------------------------------------
// Timedelta

/// Normalizes a duration into `[days, seconds, microseconds]` with
/// `0 <= seconds < 86400` and `0 <= microseconds < 1_000_000`.
///
/// Only `days` may be negative. Durations finer than a microsecond are
/// rejected.
pub(crate) fn timedelta_to_components(td: &TimeDelta) -> Result<[i64; 3], ValueErrorKind> {
    if td.subsec_nanos() % 1_000 != 0 {
        return Err(ValueErrorKind::InvalidTimeDelta(format!(
            "`{td}` is finer than a microsecond"
        )));
    }
    let total = td
        .num_microseconds()
        .ok_or_else(|| ValueErrorKind::InvalidTimeDelta(format!("`{td}` overflows microseconds")))?;

    let days = total.div_euclid(MICROS_PER_DAY);
    let rest = total.rem_euclid(MICROS_PER_DAY);
    Ok([days, rest / MICROS_PER_SECOND, rest % MICROS_PER_SECOND])
}

pub(crate) fn timedelta_from_components(parts: &[i64]) -> Result<TimeDelta, ValueErrorKind> {
    let &[days, seconds, micros] = parts else {
        return Err(ValueErrorKind::InvalidTimeDelta(format!(
            "expected 3 timedelta components, found {}",
            parts.len()
        )));
    };

    days.checked_mul(MICROS_PER_DAY)
        .and_then(|d| seconds.checked_mul(MICROS_PER_SECOND).and_then(|s| d.checked_add(s)))
        .and_then(|t| t.checked_add(micros))
        .map(TimeDelta::microseconds)
        .ok_or_else(|| {
            ValueErrorKind::InvalidTimeDelta(format!("timedelta components {parts:?} overflow"))
        })
}

// -----------------------------------------------------------------------------
// Bytes

#[inline]
pub(crate) fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn bytes_from_base64(text: &str) -> Result<Vec<u8>, ValueErrorKind> {
    STANDARD
        .decode(text)
        .map_err(|e| ValueErrorKind::InvalidBase64(e.to_string()))
}

// -----------------------------------------------------------------------------
// Tests
