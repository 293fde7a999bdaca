use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Type, parse_quote};

/// Copies `generics`, requiring `'static` on every type parameter and
/// `IoType` on every listed field type.
///
/// Non-generic types are returned unchanged.
pub(crate) fn with_io_bounds<'a>(
    generics: &Generics,
    field_types: impl IntoIterator<Item = &'a Type>,
    io_path: &TokenStream,
) -> Generics {
    let mut generics = generics.clone();
    if generics.params.is_empty() {
        return generics;
    }

    let params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote! { #param: 'static });
    }
    for ty in field_types {
        where_clause
            .predicates
            .push(parse_quote! { #ty: #io_path::IoType });
    }

    generics
}

/// Tokens for a `Vec` literal without relying on the prelude.
pub(crate) fn vec_of(items: impl IntoIterator<Item = TokenStream>) -> TokenStream {
    let items = items.into_iter();
    quote! { ::std::vec![#(#items),*] }
}
