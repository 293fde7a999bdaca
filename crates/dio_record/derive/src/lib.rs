//! See following macros:
//!
//! - [`Record`]
//! - [`IoEnum`]
//! - [`MultiType`]
#![cfg_attr(docsrs, feature(doc_cfg))]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static IO_ATTRIBUTE_NAME: &str = "io";

// -----------------------------------------------------------------------------
// Modules

mod attrs;
mod auto_register;
mod io_enum;
mod multi_type;
mod path;
mod record;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Record Derivation
///
/// `#[derive(Record)]` implements `Io`, `Record`, `RecordType` and `IoType`
/// for a struct with named fields. Every field type must implement `IoType`.
///
/// ## Field Attributes
///
/// ```rust, ignore
/// #[derive(Record)]
/// struct Event {
///     // Stored under the key `n` instead of `name`.
///     #[io(storage_name = "n")]
///     name: String,
///
///     // Omitted from the output while it equals its default.
///     #[io(store_default = false, default)]
///     tags: Vec<String>,
///
///     // Filled in when the key is missing from the input.
///     #[io(soft_default = 1)]
///     version: i64,
///
///     // Must fall on a whole hour in UTC.
///     #[io(whole_hours)]
///     start: DateTime<Utc>,
///
///     // Checked before output and after input.
///     #[io(validate = check_score)]
///     score: f64,
///
///     // Receives input keys that match no field.
///     #[io(extra)]
///     extra: ExtraAttrs,
/// }
///
/// fn check_score(score: &f64) -> Result<(), String> {
///     if score.is_finite() { Ok(()) } else { Err("score must be finite".into()) }
/// }
/// ```
///
/// Available field keys:
///
/// - `storage_name = "..."`
/// - `store_default = false`: requires one of the default sources below.
/// - `soft_default = <expr>`, `soft_default_factory = <path>`
/// - `default`, `default = <expr>`, `default_factory = <path>`
/// - `whole_days`, `whole_hours`, `whole_minutes`: `DateTime` fields only.
/// - `validate = <path>`: a `fn(&T) -> Result<(), String>`.
/// - `extra`: the field must be an `ExtraAttrs`. At most one per record.
///
/// When several default sources are given, the first of `soft_default`,
/// `soft_default_factory`, `default`, `default_factory` is used, both to
/// decide omission and to fill in missing input.
///
/// ## Type Attributes
///
/// - `multi_type = <path>, type_id = <lit>`: membership of a
///   [`MultiType`] family. The record then carries the family's tag when
///   encoded on its own.
/// - `will_input = <path>`: a `fn(&mut ValueMap)` run on the raw input map
///   before any field is read.
/// - `handle_input_error = <path>`: a `fn(&IoError) -> Option<Self>`. When it
///   returns `Some`, the value replaces the failed decode.
/// - `auto_register`: adds the type to `registry::prep_registered`.
///   Not supported on generic types.
#[proc_macro_derive(Record, attributes(io))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    record::derive_record(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// # Enum Derivation
///
/// `#[derive(IoEnum)]` implements `Io`, `IoEnum`, `IoType` and `IoKey` for
/// a fieldless enum. Each variant is stored as a primitive value, by default
/// its name.
///
/// ```rust, ignore
/// #[derive(IoEnum)]
/// enum Color {
///     #[io(value = "red")]
///     Red,
///     #[io(value = "blue")]
///     Blue,
///     // Used for values no variant declares. Marks the decode as lossy.
///     #[io(value = "unknown", fallback)]
///     Unknown,
/// }
/// ```
///
/// Values are either all strings or all integers (`#[io(value = 3)]`).
#[proc_macro_derive(IoEnum, attributes(io))]
pub fn derive_io_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    io_enum::derive_io_enum(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// # Multi-Type Family Derivation
///
/// `#[derive(MultiType)]` implements `Io`, `MultiType` and `IoType` for an
/// enum whose variants each wrap one member record.
///
/// ```rust, ignore
/// #[derive(MultiType)]
/// #[io(tag = "_t")]
/// enum Shape {
///     #[io(id = "c")]
///     Circle(Circle),
///     #[io(id = "s")]
///     Square(Square),
///     // Decoded from unknown ids. Cannot be encoded.
///     #[io(fallback)]
///     Unknown,
/// }
///
/// #[derive(Record)]
/// #[io(multi_type = Shape, type_id = "c")]
/// struct Circle {
///     radius: f64,
/// }
/// ```
///
/// The tag defaults to `"_dciotype"`. A fallback variant is either a unit
/// or holds a single `Default` value.
#[proc_macro_derive(MultiType, attributes(io))]
pub fn derive_multi_type(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    multi_type::derive_multi_type(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
