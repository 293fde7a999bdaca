use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, LitStr};

use crate::attrs::{TagLit, UnionAttrs, VariantAttrs};
use crate::path;

/// Expands `#[derive(IoEnum)]`.
pub(crate) fn derive_io_enum(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &ast.data else {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`IoEnum` can only be derived for enums",
        ));
    };
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new(
            ast.generics.span(),
            "`IoEnum` cannot be derived for generic enums",
        ));
    }

    if data.variants.is_empty() {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`IoEnum` requires at least one variant",
        ));
    }

    let type_attrs = UnionAttrs::parse_attrs(&ast.attrs, false)?;

    let mut variants = Vec::with_capacity(data.variants.len());
    let mut fallback: Option<(usize, Span)> = None;
    for (index, variant) in data.variants.iter().enumerate() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.fields.span(),
                "`IoEnum` variants cannot have fields",
            ));
        }

        let attrs = VariantAttrs::parse_attrs(&variant.attrs, "value")?;
        if let Some(span) = attrs.fallback {
            if fallback.is_some() {
                return Err(syn::Error::new(span, "an enum can have only one `fallback`"));
            }
            fallback = Some((index, span));
        }

        let value = attrs
            .value
            .unwrap_or_else(|| TagLit::from_ident(&variant.ident.unraw()));
        variants.push((&variant.ident, value));
    }

    let dio = path::dio_record();
    let exports = path::macro_exports_(&dio);
    let io = path::io_(&dio);
    let io_error = path::io_error_(&dio);
    let inputter = path::inputter_(&dio);
    let field_path = path::field_path_(&dio);
    let value = path::value_(&dio);

    let ident = &ast.ident;

    let variant_schemas = variants.iter().map(|(variant, value)| {
        let name = LitStr::new(&variant.unraw().to_string(), variant.span());
        let value = value.to_tag_value(&exports);
        quote! { #exports::EnumVariantSchema::new(#name, #value) }
    });
    let variant_schemas = crate::utils::vec_of(variant_schemas);
    let with_fallback = fallback.map(|(index, _)| quote! { .with_fallback(#index) });

    let to_index = variants.iter().enumerate().map(|(index, (variant, _))| {
        quote! { Self::#variant => #index, }
    });
    let from_index = variants.iter().enumerate().map(|(index, (variant, _))| {
        quote! { #index => ::core::option::Option::Some(Self::#variant), }
    });

    let auto_register =
        crate::auto_register::get_auto_register_impl(&dio, ast, type_attrs.auto_register)?;

    Ok(quote! {
        impl #io::Io for #ident {
            #[inline]
            fn io_ref(&self) -> #io::IoRef<'_> {
                #io::IoRef::Enum(
                    <Self as #io::IoEnum>::enum_schema(),
                    <Self as #io::IoEnum>::variant_index(self),
                )
            }
        }

        impl #io::IoEnum for #ident {
            fn enum_schema() -> &'static #exports::EnumSchema {
                static CELL: #exports::SchemaCell<#exports::EnumSchema> =
                    #exports::SchemaCell::new();
                CELL.get_or_init(|| {
                    #exports::EnumSchema::new::<Self>(#variant_schemas) #with_fallback
                })
            }

            #[inline]
            fn variant_index(&self) -> usize {
                match self {
                    #(#to_index)*
                }
            }

            #[inline]
            fn from_variant_index(index: usize) -> ::core::option::Option<Self> {
                match index {
                    #(#from_index)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #io::IoType for #ident {
            #[inline]
            fn shape() -> #exports::Shape {
                #exports::Shape::Enum(<Self as #io::IoEnum>::enum_schema)
            }

            fn from_io(
                __input: &mut #inputter,
                __value: #value,
                __path: &#field_path<'_>,
            ) -> ::core::result::Result<Self, #io_error> {
                let __schema = <Self as #io::IoEnum>::enum_schema();
                let __index = __input.enum_index(__schema, &__value, __path)?;
                <Self as #io::IoEnum>::from_variant_index(__index)
                    .ok_or_else(|| #io_error::missing_variant(__schema.type_path(), __index))
            }
        }

        impl #io::IoKey for #ident {
            #[inline]
            fn key_shape() -> #exports::KeyShape {
                #exports::KeyShape::Enum(<Self as #io::IoEnum>::enum_schema)
            }

            #[inline]
            fn key_ref(&self) -> #io::KeyRef<'_> {
                #io::KeyRef::Enum(
                    <Self as #io::IoEnum>::enum_schema(),
                    <Self as #io::IoEnum>::variant_index(self),
                )
            }

            fn from_key(
                __input: &mut #inputter,
                __key: &str,
                __path: &#field_path<'_>,
            ) -> ::core::result::Result<Self, #io_error> {
                let __schema = <Self as #io::IoEnum>::enum_schema();
                let __index = __input.enum_key_index(__schema, __key, __path)?;
                <Self as #io::IoEnum>::from_variant_index(__index)
                    .ok_or_else(|| #io_error::missing_variant(__schema.type_path(), __index))
            }
        }

        #auto_register
    })
}
