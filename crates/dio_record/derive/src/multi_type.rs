use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type};

use crate::attrs::{TagLit, UnionAttrs, VariantAttrs};
use crate::path;

struct Member<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    id: TagLit,
}

enum Fallback<'a> {
    Unit(&'a Ident),
    Payload(&'a Ident),
}

impl Fallback<'_> {
    fn ident(&self) -> &Ident {
        match self {
            Fallback::Unit(ident) | Fallback::Payload(ident) => ident,
        }
    }
}

/// Expands `#[derive(MultiType)]`.
pub(crate) fn derive_multi_type(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &ast.data else {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`MultiType` can only be derived for enums",
        ));
    };
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new(
            ast.generics.span(),
            "`MultiType` cannot be derived for generic enums",
        ));
    }

    let type_attrs = UnionAttrs::parse_attrs(&ast.attrs, true)?;

    let mut members = Vec::with_capacity(data.variants.len());
    let mut fallback: Option<Fallback> = None;
    for variant in &data.variants {
        let attrs = VariantAttrs::parse_attrs(&variant.attrs, "id")?;

        if let Some(span) = attrs.fallback {
            if fallback.is_some() {
                return Err(syn::Error::new(span, "a family can have only one `fallback`"));
            }
            if let Some(id) = &attrs.value {
                return Err(syn::Error::new(id.span(), "a `fallback` variant has no `id`"));
            }
            fallback = Some(match &variant.fields {
                Fields::Unit => Fallback::Unit(&variant.ident),
                Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                    Fallback::Payload(&variant.ident)
                }
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "a `fallback` variant must be a unit or hold one `Default` value",
                    ));
                }
            });
            continue;
        }

        let ty = match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => &fields.unnamed[0].ty,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "family variants must hold exactly one record, e.g. `Circle(Circle)`",
                ));
            }
        };
        let Some(id) = attrs.value else {
            return Err(syn::Error::new(
                variant.ident.span(),
                "family variants require `#[io(id = ...)]`",
            ));
        };

        members.push(Member {
            ident: &variant.ident,
            ty,
            id,
        });
    }

    if members.is_empty() {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`MultiType` requires at least one member variant",
        ));
    }

    let dio = path::dio_record();
    let exports = path::macro_exports_(&dio);
    let io = path::io_(&dio);
    let io_error = path::io_error_(&dio);
    let inputter = path::inputter_(&dio);
    let field_path = path::field_path_(&dio);
    let value = path::value_(&dio);

    let ident = &ast.ident;

    // ---------------------------------------------------------------------
    // Schema

    let tag = match &type_attrs.tag {
        Some(tag) => quote! { #tag },
        None => quote! { #exports::DEFAULT_TAG },
    };
    let member_schemas = members.iter().map(|member| {
        let ty = member.ty;
        let name = LitStr::new(&member.ident.unraw().to_string(), member.ident.span());
        let id = member.id.to_tag_value(&exports);
        quote! { #exports::MemberSchema::new::<#ty>(#name, #id) }
    });
    let member_schemas = crate::utils::vec_of(member_schemas);
    let with_fallback = fallback.as_ref().map(|fallback| {
        let ident = fallback.ident();
        let name = LitStr::new(&ident.unraw().to_string(), ident.span());
        quote! { .with_fallback(#name) }
    });

    // ---------------------------------------------------------------------
    // Io

    let member_refs = members.iter().map(|member| {
        let variant = member.ident;
        quote! {
            Self::#variant(__member) => ::core::option::Option::Some(
                __member as &dyn #io::Record
            ),
        }
    });
    let fallback_ref = fallback.as_ref().map(|fallback| {
        let variant = fallback.ident();
        quote! { Self::#variant { .. } => ::core::option::Option::None, }
    });

    // ---------------------------------------------------------------------
    // Decoding

    let member_arms = members.iter().enumerate().map(|(index, member)| {
        let variant = member.ident;
        let ty = member.ty;
        quote! {
            ::core::option::Option::Some(#index) => ::core::result::Result::Ok(
                Self::#variant(<#ty as #io::IoType>::from_io(__input, __value, __path)?)
            ),
        }
    });
    let fallback_arm = match &fallback {
        Some(Fallback::Unit(variant)) => quote! {
            ::core::option::Option::None => ::core::result::Result::Ok(Self::#variant),
        },
        Some(Fallback::Payload(variant)) => quote! {
            ::core::option::Option::None => ::core::result::Result::Ok(
                Self::#variant(::core::default::Default::default())
            ),
        },
        None => quote! {
            ::core::option::Option::None => ::core::result::Result::Err(
                #io_error::Consistency(::std::format!(
                    "`{}` has no fallback variant",
                    __family.type_path()
                ))
            ),
        },
    };

    let auto_register =
        crate::auto_register::get_auto_register_impl(&dio, ast, type_attrs.auto_register)?;

    Ok(quote! {
        impl #io::Io for #ident {
            fn io_ref(&self) -> #io::IoRef<'_> {
                let member = match self {
                    #(#member_refs)*
                    #fallback_ref
                };
                #io::IoRef::Multi(#io::MultiRef {
                    family: <Self as #io::MultiType>::family(),
                    member,
                })
            }
        }

        impl #io::MultiType for #ident {
            fn family() -> &'static #exports::MultiTypeSchema {
                static CELL: #exports::SchemaCell<#exports::MultiTypeSchema> =
                    #exports::SchemaCell::new();
                CELL.get_or_init(|| {
                    #exports::MultiTypeSchema::new::<Self>(#tag, #member_schemas) #with_fallback
                })
            }
        }

        impl #io::IoType for #ident {
            #[inline]
            fn shape() -> #exports::Shape {
                #exports::Shape::Multi(<Self as #io::MultiType>::family)
            }

            fn from_io(
                __input: &mut #inputter,
                __value: #value,
                __path: &#field_path<'_>,
            ) -> ::core::result::Result<Self, #io_error> {
                let __family = <Self as #io::MultiType>::family();
                match __input.multi_member(__family, &__value, __path)? {
                    #(#member_arms)*
                    ::core::option::Option::Some(__index) => ::core::result::Result::Err(
                        #io_error::missing_variant(__family.type_path(), __index)
                    ),
                    #fallback_arm
                }
            }
        }

        #auto_register
    })
}
