//! Paths into `dio_record` used by the generated code.
//!
//! Every generated item is fully qualified, so user types named `Shape` or
//! `Value` cannot shadow anything.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `dio_record` crate.
///
/// 1. For crates that depend on `dio_record`, `::dio_record` is returned.
/// 2. For crates that depend on `dio_core`, `::dio_core::record` is returned.
/// 3. For other situations, `::dio_record` is returned.
///
/// Reading the manifest is not free, so the path is resolved once per derive
/// and passed around.
pub(crate) fn dio_record() -> syn::Path {
    dio_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("dio_record"))
}

// -----------------------------------------------------------------------------
// Internal API

#[inline(always)]
pub(crate) fn macro_exports_(dio_record_path: &syn::Path) -> TokenStream {
    quote! {
        #dio_record_path::__macro_exports
    }
}

#[inline(always)]
pub(crate) fn io_(dio_record_path: &syn::Path) -> TokenStream {
    quote! {
        #dio_record_path::io
    }
}

#[inline(always)]
pub(crate) fn io_error_(dio_record_path: &syn::Path) -> TokenStream {
    quote! {
        #dio_record_path::IoError
    }
}

#[inline(always)]
pub(crate) fn inputter_(dio_record_path: &syn::Path) -> TokenStream {
    quote! {
        #dio_record_path::Inputter
    }
}

#[inline(always)]
pub(crate) fn field_path_(dio_record_path: &syn::Path) -> TokenStream {
    quote! {
        #dio_record_path::FieldPath
    }
}

#[inline(always)]
pub(crate) fn value_(dio_record_path: &syn::Path) -> TokenStream {
    quote! {
        #dio_record_path::Value
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn registry_(dio_record_path: &syn::Path) -> TokenStream {
    quote! {
        #dio_record_path::registry
    }
}
