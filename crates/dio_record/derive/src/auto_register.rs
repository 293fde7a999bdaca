use proc_macro2::{Span, TokenStream};

/// Generate the `inventory` submission for `#[io(auto_register)]`.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(
    dio_record_path: &syn::Path,
    ast: &syn::DeriveInput,
    span: Option<Span>,
) -> syn::Result<TokenStream> {
    use quote::quote_spanned;

    let Some(span) = span else {
        return Ok(TokenStream::new());
    };

    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new(
            span,
            "`auto_register` is not supported on generic types",
        ));
    }

    let exports = crate::path::macro_exports_(dio_record_path);
    let registry = crate::path::registry_(dio_record_path);
    let ident = &ast.ident;

    Ok(quote_spanned! { span =>
        #exports::inventory::submit! {
            #registry::AutoRegistration::new(
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident)),
                #dio_record_path::PrepSession::prep::<#ident>,
            )
        }
    })
}

/// Generate the `inventory` submission for `#[io(auto_register)]`.
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(
    _: &syn::Path,
    _: &syn::DeriveInput,
    _: Option<Span>,
) -> syn::Result<TokenStream> {
    Ok(TokenStream::new())
}
