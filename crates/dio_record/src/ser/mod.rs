//! Encoding typed values into codec-native [`Value`](crate::Value) trees.

// -----------------------------------------------------------------------------
// Modules

mod options;
mod outputter;
mod set_order;

// -----------------------------------------------------------------------------
// Exports

pub use options::EncodeOptions;
pub use outputter::Outputter;
