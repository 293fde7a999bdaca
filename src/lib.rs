//! Facade over the `dio_*` crates.
//!
//! - [`record`]: schema-driven record encoding and decoding.
//! - [`utils`]: hash containers shared by the workspace.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use dio_record as record;
pub use dio_utils as utils;
