use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::{Attribute, Data, DeriveInput, ItemFn, Lit, LitStr, Meta, MetaNameValue};

const STRUCT_CASE: &str = "camelCase";
const ENUM_CASE: &str = "SCREAMING_SNAKE_CASE";

/// Expands `#[api_model]` for structs and unit enums.
pub fn expand_api_model(args: TokenStream, input: DeriveInput) -> TokenStream {
    let args = match ModelArgs::parse(args) {
        Ok(args) => args,
        Err(err) => return err,
    };
    let existing = match SerdeAttrs::collect(&input.attrs) {
        Ok(existing) => existing,
        Err(err) => return err,
    };
    let derives = derive_names(&input.attrs);

    let is_enum = match &input.data {
        Data::Struct(_) => false,
        Data::Enum(_) => true,
        Data::Union(_) => {
            return syn::Error::new_spanned(&input.ident, "api_model does not support unions")
                .to_compile_error();
        },
    };

    if is_enum && args.deny_unknown_fields == Some(true) {
        return syn::Error::new_spanned(
            &input.ident,
            "deny_unknown_fields only applies to structs",
        )
        .to_compile_error();
    }

    let default_case = if is_enum { ENUM_CASE } else { STRUCT_CASE };
    let rename = match rename_attr(args.rename_all, &existing, default_case) {
        Ok(attr) => attr,
        Err(err) => return err,
    };
    let deny = if is_enum {
        quote! {}
    } else {
        match deny_attr(args.deny_unknown_fields, &existing, &input) {
            Ok(attr) => attr,
            Err(err) => return err,
        }
    };

    let derive = missing_derives(&derives);
    let schema = if derives.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };

    quote! {
        #derive
        #schema
        #rename
        #deny
        #input
    }
}

/// Expands `#[api_handler]`: the handler is unchanged, the `OpenAPI` metadata is
/// only attached for `server` builds.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

#[derive(Default)]
struct ModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

impl ModelArgs {
    fn parse(args: TokenStream) -> Result<Self, TokenStream> {
        let metas = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated
            .parse2(args)
            .map_err(|err| err.to_compile_error())?;

        let mut parsed = Self::default();
        for meta in metas {
            let Meta::NameValue(nv) = meta else {
                return Err(syn::Error::new_spanned(
                    meta,
                    "expected `rename_all = \"...\"` or `deny_unknown_fields = bool`",
                )
                .to_compile_error());
            };

            if nv.path.is_ident("rename_all") {
                if parsed.rename_all.is_some() {
                    return Err(duplicate(&nv));
                }
                parsed.rename_all = Some(str_literal(&nv)?);
            } else if nv.path.is_ident("deny_unknown_fields") {
                if parsed.deny_unknown_fields.is_some() {
                    return Err(duplicate(&nv));
                }
                parsed.deny_unknown_fields = Some(bool_literal(&nv)?);
            } else {
                return Err(syn::Error::new_spanned(
                    nv.path,
                    "unsupported argument; expected rename_all or deny_unknown_fields",
                )
                .to_compile_error());
            }
        }

        Ok(parsed)
    }
}

fn duplicate(nv: &MetaNameValue) -> TokenStream {
    syn::Error::new_spanned(nv, "duplicate argument").to_compile_error()
}

fn literal(nv: &MetaNameValue) -> Option<&Lit> {
    match &nv.value {
        syn::Expr::Lit(expr) => Some(&expr.lit),
        _ => None,
    }
}

fn str_literal(nv: &MetaNameValue) -> Result<LitStr, TokenStream> {
    match literal(nv) {
        Some(Lit::Str(lit)) => Ok(lit.clone()),
        _ => Err(syn::Error::new_spanned(&nv.value, "expected a string literal").to_compile_error()),
    }
}

fn bool_literal(nv: &MetaNameValue) -> Result<bool, TokenStream> {
    match literal(nv) {
        Some(Lit::Bool(lit)) => Ok(lit.value),
        _ => {
            Err(syn::Error::new_spanned(&nv.value, "expected a boolean literal").to_compile_error())
        },
    }
}

struct SerdeAttrs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

impl SerdeAttrs {
    fn collect(attrs: &[Attribute]) -> Result<Self, TokenStream> {
        let mut found = Self { rename_all: None, deny_unknown_fields: false };

        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    found.rename_all = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("deny_unknown_fields") {
                    found.deny_unknown_fields = true;
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                }
                Ok(())
            })
            .map_err(|err| err.to_compile_error())?;
        }

        Ok(found)
    }
}

fn rename_attr(
    requested: Option<LitStr>,
    existing: &SerdeAttrs,
    default_case: &str,
) -> Result<TokenStream, TokenStream> {
    let wanted = requested.unwrap_or_else(|| LitStr::new(default_case, Span::call_site()));

    match &existing.rename_all {
        Some(current) if current.value() != wanted.value() => Err(syn::Error::new_spanned(
            current,
            "conflicting serde rename_all; drop it or pass the same value to api_model",
        )
        .to_compile_error()),
        Some(_) => Ok(quote! {}),
        None => Ok(quote! { #[serde(rename_all = #wanted)] }),
    }
}

fn deny_attr(
    requested: Option<bool>,
    existing: &SerdeAttrs,
    input: &DeriveInput,
) -> Result<TokenStream, TokenStream> {
    let deny = requested.unwrap_or(true);
    match (existing.deny_unknown_fields, deny) {
        (true, false) => Err(syn::Error::new_spanned(
            &input.ident,
            "deny_unknown_fields is already set via serde; remove it before disabling",
        )
        .to_compile_error()),
        (true, true) | (false, false) => Ok(quote! {}),
        (false, true) => Ok(quote! { #[serde(deny_unknown_fields)] }),
    }
}

fn missing_derives(present: &FxHashSet<String>) -> TokenStream {
    let tokens: Vec<TokenStream> = [
        ("Debug", quote! { Debug }),
        ("Serialize", quote! { ::serde::Serialize }),
        ("Deserialize", quote! { ::serde::Deserialize }),
    ]
    .into_iter()
    .filter(|(name, _)| !present.contains(*name))
    .map(|(_, tokens)| tokens)
    .collect();

    if tokens.is_empty() { quote! {} } else { quote! { #[derive(#(#tokens),*)] } }
}

fn derive_names(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(seg) = meta.path.segments.last() {
                names.insert(seg.ident.to_string());
            }
            Ok(())
        });
    }
    names
}
