//! Decoding codec-native [`Value`](crate::Value) trees into typed values.

// -----------------------------------------------------------------------------
// Modules

mod inputter;
mod options;
mod record_reader;

// -----------------------------------------------------------------------------
// Exports

pub use inputter::Inputter;
pub use options::DecodeOptions;
pub use record_reader::RecordReader;
