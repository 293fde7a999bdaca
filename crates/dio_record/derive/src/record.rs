use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type};

use crate::attrs::{FieldAttrs, RecordAttrs};
use crate::path;

struct RecordField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    attrs: FieldAttrs,
}

/// Expands `#[derive(Record)]`.
pub(crate) fn derive_record(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &ast.data else {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`Record` can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new(
            data.fields.span(),
            "`Record` requires named fields",
        ));
    };

    let type_attrs = RecordAttrs::parse_attrs(&ast.attrs)?;

    let mut fields = Vec::with_capacity(named.named.len());
    let mut extra: Option<&Ident> = None;
    for field in &named.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = FieldAttrs::parse_attrs(&field.attrs)?;

        if let Some(span) = attrs.extra {
            if attrs.has_io_options() {
                return Err(syn::Error::new(
                    span,
                    "`extra` cannot be combined with other `io` attributes",
                ));
            }
            if extra.is_some() {
                return Err(syn::Error::new(span, "a record can have only one `extra` field"));
            }
            extra = Some(ident);
            continue;
        }

        fields.push(RecordField {
            ident,
            ty: &field.ty,
            attrs,
        });
    }

    let dio = path::dio_record();
    let exports = path::macro_exports_(&dio);
    let io = path::io_(&dio);
    let io_error = path::io_error_(&dio);
    let inputter = path::inputter_(&dio);
    let field_path = path::field_path_(&dio);
    let value = path::value_(&dio);

    let ident = &ast.ident;
    let generics = crate::utils::with_io_bounds(&ast.generics, fields.iter().map(|f| f.ty), &io);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let is_generic = !ast.generics.params.is_empty();

    // ---------------------------------------------------------------------
    // Schema

    let field_schemas = fields.iter().map(|field| {
        let ty = field.ty;
        let name = LitStr::new(&field.ident.unraw().to_string(), field.ident.span());
        let attrs = field.attrs.io_attrs(ty, &exports);
        quote! {
            #exports::FieldSchema::new::<#ty>(#name).with_attrs(#attrs)
        }
    });
    let field_schemas = crate::utils::vec_of(field_schemas);

    let mut schema_builder = quote! {
        #exports::RecordSchema::new::<Self>(#field_schemas)
    };
    if let Some(extra) = extra {
        let name = LitStr::new(&extra.unraw().to_string(), extra.span());
        schema_builder.extend(quote! { .with_extra_slot(#name) });
    }
    if let (Some(family), Some(type_id)) = (&type_attrs.multi_type, &type_attrs.type_id) {
        let type_id = type_id.to_tag_value(&exports);
        schema_builder.extend(quote! {
            .with_membership(<#family as #io::MultiType>::family, #type_id)
        });
    }
    if let Some(hook) = &type_attrs.will_input {
        schema_builder.extend(quote! { .with_will_input(#hook) });
    }

    let schema_body = if is_generic {
        quote! {
            static CELL: #exports::GenericSchemaCell<#exports::RecordSchema> =
                #exports::GenericSchemaCell::new();
            CELL.get_or_insert::<Self, _>(|| #schema_builder)
        }
    } else {
        quote! {
            static CELL: #exports::SchemaCell<#exports::RecordSchema> =
                #exports::SchemaCell::new();
            CELL.get_or_init(|| #schema_builder)
        }
    };

    // ---------------------------------------------------------------------
    // Record

    let field_io_arms = fields.iter().enumerate().map(|(index, field)| {
        let field_ident = field.ident;
        quote! {
            #index => ::core::option::Option::Some(&self.#field_ident as &dyn #io::Io),
        }
    });

    let is_default_arms: Vec<_> = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.attrs.store_default())
        .filter_map(|(index, field)| {
            let field_ident = field.ident;
            let (default, _) = field.attrs.default_value(field.ty)?;
            Some(quote! {
                #index => self.#field_ident == (#default),
            })
        })
        .collect();
    let field_is_default = if is_default_arms.is_empty() {
        TokenStream::new()
    } else {
        quote! {
            fn field_is_default(&self, index: usize) -> bool {
                match index {
                    #(#is_default_arms)*
                    _ => false,
                }
            }
        }
    };

    let validate_arms: Vec<_> = fields
        .iter()
        .enumerate()
        .filter_map(|(index, field)| {
            let check = field.attrs.validate.as_ref()?;
            let field_ident = field.ident;
            Some(quote! {
                #index => #check(&self.#field_ident),
            })
        })
        .collect();
    let validate_field = if validate_arms.is_empty() {
        TokenStream::new()
    } else {
        quote! {
            fn validate_field(
                &self,
                index: usize,
            ) -> ::core::result::Result<(), ::std::string::String> {
                match index {
                    #(#validate_arms)*
                    _ => ::core::result::Result::Ok(()),
                }
            }
        }
    };

    let extra_attrs = match extra {
        Some(extra) => quote! {
            #[inline]
            fn extra_attrs(&self) -> ::core::option::Option<&#dio::ExtraAttrs> {
                ::core::option::Option::Some(&self.#extra)
            }
        },
        None => TokenStream::new(),
    };

    // ---------------------------------------------------------------------
    // Decoding

    let bindings: Vec<_> = (0..fields.len()).map(|i| format_ident!("__field_{i}")).collect();
    let reads = fields.iter().enumerate().map(|(index, field)| {
        let ty = field.ty;
        let read = match field.attrs.default_value(ty) {
            Some((default, _)) => quote! {
                __reader.field_or_else::<#ty>(__input, #index, || #default)?
            },
            None => quote! {
                __reader.field::<#ty>(__input, #index)?
            },
        };
        match &field.attrs.validate {
            Some(check) => quote! {
                {
                    let __read = #read;
                    __reader.validate(#index, __read, #check)?
                }
            },
            None => read,
        }
    });
    let field_idents = fields.iter().map(|f| f.ident);
    let extra_init = extra.map(|extra| quote! { #extra: __reader.take_extra(), });

    let reader_mut = (!fields.is_empty() || extra.is_some()).then(|| quote! { mut });
    let decode = quote! {
        let #reader_mut __reader = #inputter::begin_record(
            __input,
            <Self as #io::RecordType>::schema(),
            __value,
            __path,
        )?;
        let __fields = (|| -> ::core::result::Result<Self, #io_error> {
            #( let #bindings = #reads; )*
            ::core::result::Result::Ok(Self {
                #( #field_idents: #bindings, )*
                #extra_init
            })
        })();
        __reader.finish(__input, __fields)
    };

    let from_io_body = match &type_attrs.handle_input_error {
        Some(handler) => quote! {
            let __decoded = (|| -> ::core::result::Result<Self, #io_error> { #decode })();
            match __decoded {
                ::core::result::Result::Err(__error) => match #handler(&__error) {
                    ::core::option::Option::Some(__substitute) => {
                        ::core::result::Result::Ok(__substitute)
                    }
                    ::core::option::Option::None => ::core::result::Result::Err(__error),
                },
                __ok => __ok,
            }
        },
        None => decode,
    };

    let auto_register = crate::auto_register::get_auto_register_impl(
        &dio,
        ast,
        type_attrs.auto_register,
    )?;

    Ok(quote! {
        impl #impl_generics #io::Io for #ident #ty_generics #where_clause {
            #[inline]
            fn io_ref(&self) -> #io::IoRef<'_> {
                #io::IoRef::Record(self)
            }
        }

        impl #impl_generics #io::Record for #ident #ty_generics #where_clause {
            #[inline]
            fn record_schema(&self) -> &'static #exports::RecordSchema {
                <Self as #io::RecordType>::schema()
            }

            fn field_io(&self, index: usize) -> ::core::option::Option<&dyn #io::Io> {
                match index {
                    #(#field_io_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #field_is_default

            #validate_field

            #extra_attrs
        }

        impl #impl_generics #io::RecordType for #ident #ty_generics #where_clause {
            fn schema() -> &'static #exports::RecordSchema {
                #schema_body
            }
        }

        impl #impl_generics #io::IoType for #ident #ty_generics #where_clause {
            #[inline]
            fn shape() -> #exports::Shape {
                #exports::Shape::Record(<Self as #io::RecordType>::schema)
            }

            fn from_io(
                __input: &mut #inputter,
                __value: #value,
                __path: &#field_path<'_>,
            ) -> ::core::result::Result<Self, #io_error> {
                #from_io_body
            }
        }

        #auto_register
    })
}
