//! `Io` / `IoType` implementations for supported foreign types.

mod collections;
mod primitives;
mod time;
mod tuples;
mod value;
