//! Traits connecting Rust types to the encoder and decoder.
//!
//! - [`Io`] is the object-safe side: a borrowed [`IoRef`] view of a value,
//!   walked by the [`Outputter`](crate::Outputter).
//! - [`IoType`] is the typed side: the declared [`Shape`](crate::Shape) and
//!   construction from a [`Value`](crate::Value) through the
//!   [`Inputter`](crate::Inputter).
//! - [`Record`], [`IoEnum`] and [`MultiType`] are implemented by the derives.

// -----------------------------------------------------------------------------
// Modules

mod io_ref;
mod traits;

// -----------------------------------------------------------------------------
// Exports

pub use io_ref::{IoRef, KeyRef, MapIter, MultiRef, SeqIter};
pub use traits::{Io, IoEnum, IoKey, IoType, MultiType, Record, RecordType};
