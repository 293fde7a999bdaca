//! Parsing of `#[io(...)]` attributes.
//!
//! Each position (record type, record field, enum, enum variant, family,
//! family variant) accepts its own set of keys; anything else is a compile
//! error pointing at the offending key.

use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, ExprLit, ExprUnary, Lit, LitBool, LitStr, Path, Token, UnOp};

use crate::IO_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Helpers

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        let name = meta.path.to_token_stream().to_string();
        return Err(meta.error(format!("duplicate `{name}` attribute")));
    }
    *slot = Some(value);
    Ok(())
}

fn for_each_io_attr(
    attrs: &[Attribute],
    mut logic: impl FnMut(ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident(IO_ATTRIBUTE_NAME) {
            attr.parse_nested_meta(&mut logic)?;
        }
    }
    Ok(())
}

fn unknown(meta: &ParseNestedMeta, position: &str) -> syn::Error {
    let name = meta.path.to_token_stream().to_string();
    meta.error(format!("unknown `io` attribute `{name}` on {position}"))
}

// -----------------------------------------------------------------------------
// TagLit

/// A string or integer literal identifying an enum variant or family member.
#[derive(Clone)]
pub(crate) enum TagLit {
    Str(LitStr),
    Int(i64, Span),
}

impl TagLit {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let expr: Expr = meta.value()?.parse()?;
        match &expr {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => Ok(TagLit::Str(lit.clone())),
            Expr::Lit(ExprLit {
                lit: Lit::Int(lit), ..
            }) => Ok(TagLit::Int(lit.base10_parse()?, lit.span())),
            Expr::Unary(ExprUnary {
                op: UnOp::Neg(_),
                expr: inner,
                ..
            }) => match &**inner {
                Expr::Lit(ExprLit {
                    lit: Lit::Int(lit), ..
                }) => Ok(TagLit::Int(-lit.base10_parse::<i64>()?, expr.span())),
                _ => Err(syn::Error::new(expr.span(), "expected a string or integer literal")),
            },
            _ => Err(syn::Error::new(expr.span(), "expected a string or integer literal")),
        }
    }

    pub(crate) fn span(&self) -> Span {
        match self {
            TagLit::Str(lit) => lit.span(),
            TagLit::Int(_, span) => *span,
        }
    }

    pub(crate) fn from_ident(ident: &syn::Ident) -> Self {
        TagLit::Str(LitStr::new(&ident.to_string(), ident.span()))
    }

    /// Tokens for a `TagValue` constant.
    pub(crate) fn to_tag_value(&self, exports: &TokenStream) -> TokenStream {
        match self {
            TagLit::Str(lit) => quote! { #exports::TagValue::Str(#lit) },
            TagLit::Int(value, _) => quote! { #exports::TagValue::Int(#value) },
        }
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// Explicit default of a field: `default` or `default = <expr>`.
pub(crate) enum DefaultExpr {
    Trait,
    Expr(Expr),
}

#[derive(Clone, Copy)]
pub(crate) enum GranularityAttr {
    Days,
    Hours,
    Minutes,
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub storage_name: Option<LitStr>,
    pub store_default: Option<LitBool>,
    pub soft_default: Option<Expr>,
    pub soft_default_factory: Option<Path>,
    pub default: Option<DefaultExpr>,
    pub default_factory: Option<Path>,
    pub granularity: Option<GranularityAttr>,
    pub validate: Option<Path>,
    pub extra: Option<Span>,
}

impl FieldAttrs {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for_each_io_attr(attrs, |meta| {
            if meta.path.is_ident("storage_name") {
                let lit: LitStr = meta.value()?.parse()?;
                set_once(&mut this.storage_name, lit, &meta)
            } else if meta.path.is_ident("store_default") {
                let lit: LitBool = meta.value()?.parse()?;
                set_once(&mut this.store_default, lit, &meta)
            } else if meta.path.is_ident("soft_default") {
                let expr: Expr = meta.value()?.parse()?;
                set_once(&mut this.soft_default, expr, &meta)
            } else if meta.path.is_ident("soft_default_factory") {
                let path: Path = meta.value()?.parse()?;
                set_once(&mut this.soft_default_factory, path, &meta)
            } else if meta.path.is_ident("default") {
                let default = if meta.input.peek(Token![=]) {
                    DefaultExpr::Expr(meta.value()?.parse()?)
                } else {
                    DefaultExpr::Trait
                };
                set_once(&mut this.default, default, &meta)
            } else if meta.path.is_ident("default_factory") {
                let path: Path = meta.value()?.parse()?;
                set_once(&mut this.default_factory, path, &meta)
            } else if meta.path.is_ident("whole_days") {
                set_once(&mut this.granularity, GranularityAttr::Days, &meta)
            } else if meta.path.is_ident("whole_hours") {
                set_once(&mut this.granularity, GranularityAttr::Hours, &meta)
            } else if meta.path.is_ident("whole_minutes") {
                set_once(&mut this.granularity, GranularityAttr::Minutes, &meta)
            } else if meta.path.is_ident("validate") {
                let path: Path = meta.value()?.parse()?;
                set_once(&mut this.validate, path, &meta)
            } else if meta.path.is_ident("extra") {
                set_once(&mut this.extra, meta.path.span(), &meta)
            } else {
                Err(unknown(&meta, "a record field"))
            }
        })?;

        Ok(this)
    }

    /// Returns `true` if anything other than `extra` was given.
    pub fn has_io_options(&self) -> bool {
        self.storage_name.is_some()
            || self.store_default.is_some()
            || self.soft_default.is_some()
            || self.soft_default_factory.is_some()
            || self.default.is_some()
            || self.default_factory.is_some()
            || self.granularity.is_some()
            || self.validate.is_some()
    }

    pub fn store_default(&self) -> bool {
        self.store_default.as_ref().is_none_or(LitBool::value)
    }

    /// The default used both for omission and for missing input: the first
    /// declared of soft_default, soft_default_factory, default,
    /// default_factory.
    pub fn default_value(&self, ty: &syn::Type) -> Option<(TokenStream, &'static str)> {
        if let Some(expr) = &self.soft_default {
            return Some((quote! { #expr }, "SoftDefault"));
        }
        if let Some(path) = &self.soft_default_factory {
            return Some((quote! { #path() }, "SoftDefaultFactory"));
        }
        match &self.default {
            Some(DefaultExpr::Expr(expr)) => return Some((quote! { #expr }, "Default")),
            Some(DefaultExpr::Trait) => {
                return Some((
                    quote! { <#ty as ::core::default::Default>::default() },
                    "Default",
                ));
            }
            None => {}
        }
        self.default_factory
            .as_ref()
            .map(|path| (quote! { #path() }, "DefaultFactory"))
    }

    /// Tokens for the field's `IoAttrs`.
    pub fn io_attrs(&self, ty: &syn::Type, exports: &TokenStream) -> TokenStream {
        let mut tokens = quote! { #exports::IoAttrs::new() };

        if let Some(name) = &self.storage_name {
            tokens.extend(quote! { .with_storage_name(#name) });
        }
        if !self.store_default() {
            tokens.extend(quote! { .with_store_default(false) });
        }
        if let Some((_, source)) = self.default_value(ty) {
            let source = syn::Ident::new(source, Span::call_site());
            tokens.extend(quote! { .with_default_source(#exports::DefaultSource::#source) });
        }
        if let Some(granularity) = self.granularity {
            let variant = match granularity {
                GranularityAttr::Days => quote! { Days },
                GranularityAttr::Hours => quote! { Hours },
                GranularityAttr::Minutes => quote! { Minutes },
            };
            tokens.extend(quote! { .with_granularity(#exports::Granularity::#variant) });
        }
        if self.validate.is_some() {
            tokens.extend(quote! { .with_validator() });
        }

        tokens
    }
}

// -----------------------------------------------------------------------------
// Record attributes

#[derive(Default)]
pub(crate) struct RecordAttrs {
    pub multi_type: Option<Path>,
    pub type_id: Option<TagLit>,
    pub will_input: Option<Path>,
    pub handle_input_error: Option<Path>,
    pub auto_register: Option<Span>,
}

impl RecordAttrs {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for_each_io_attr(attrs, |meta| {
            if meta.path.is_ident("multi_type") {
                let path: Path = meta.value()?.parse()?;
                set_once(&mut this.multi_type, path, &meta)
            } else if meta.path.is_ident("type_id") {
                let lit = TagLit::parse(&meta)?;
                set_once(&mut this.type_id, lit, &meta)
            } else if meta.path.is_ident("will_input") {
                let path: Path = meta.value()?.parse()?;
                set_once(&mut this.will_input, path, &meta)
            } else if meta.path.is_ident("handle_input_error") {
                let path: Path = meta.value()?.parse()?;
                set_once(&mut this.handle_input_error, path, &meta)
            } else if meta.path.is_ident("auto_register") {
                set_once(&mut this.auto_register, meta.path.span(), &meta)
            } else {
                Err(unknown(&meta, "a record"))
            }
        })?;

        let misuse = match (&this.multi_type, &this.type_id) {
            (Some(path), None) => Some((path.span(), "`multi_type` requires `type_id`")),
            (None, Some(lit)) => Some((lit.span(), "`type_id` requires `multi_type`")),
            _ => None,
        };
        match misuse {
            Some((span, msg)) => Err(syn::Error::new(span, msg)),
            None => Ok(this),
        }
    }
}

// -----------------------------------------------------------------------------
// Enum and family attributes

/// Type-level attributes of `IoEnum` and `MultiType` derives.
#[derive(Default)]
pub(crate) struct UnionAttrs {
    pub tag: Option<LitStr>,
    pub auto_register: Option<Span>,
}

impl UnionAttrs {
    pub fn parse_attrs(attrs: &[Attribute], allow_tag: bool) -> syn::Result<Self> {
        let mut this = Self::default();

        for_each_io_attr(attrs, |meta| {
            if allow_tag && meta.path.is_ident("tag") {
                let lit: LitStr = meta.value()?.parse()?;
                set_once(&mut this.tag, lit, &meta)
            } else if meta.path.is_ident("auto_register") {
                set_once(&mut this.auto_register, meta.path.span(), &meta)
            } else if allow_tag {
                Err(unknown(&meta, "a multi-type family"))
            } else {
                Err(unknown(&meta, "an enum"))
            }
        })?;

        Ok(this)
    }
}

/// Variant-level attributes: `value` for enums, `id` for families, and
/// `fallback` for both.
#[derive(Default)]
pub(crate) struct VariantAttrs {
    pub value: Option<TagLit>,
    pub fallback: Option<Span>,
}

impl VariantAttrs {
    pub fn parse_attrs(attrs: &[Attribute], value_key: &str) -> syn::Result<Self> {
        let mut this = Self::default();

        for_each_io_attr(attrs, |meta| {
            if meta.path.is_ident(value_key) {
                let lit = TagLit::parse(&meta)?;
                set_once(&mut this.value, lit, &meta)
            } else if meta.path.is_ident("fallback") {
                set_once(&mut this.fallback, meta.path.span(), &meta)
            } else {
                Err(unknown(&meta, "a variant"))
            }
        })?;

        Ok(this)
    }
}
