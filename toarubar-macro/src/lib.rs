//! Procedural macros for use in toarubar.

use proc_macro2::{TokenStream, Span};

use syn::{parse_macro_input, DeriveInput, Data, Fields, Field, FieldsNamed, Meta, LitStr};
use quote::quote;

/// Derives the `ConfigSection` trait.
///
/// Each field tagged with `#[key]` is exposed under its own name.
/// A field whose configuration key is not a valid Rust identifier
/// can be renamed with `#[key(name = "...")]`.
///
/// ## Example
///
/// ```ignore
/// #[derive(ConfigSection)]
/// pub struct SomeSection {
///     #[key] // exposed as "bar_height".
///     bar_height: i64,
///     #[key(name = "col.text")] // exposed as "col.text".
///     text_color: Color,
///
///     #[subsection] // gets exposed as a subsection on the configuration.
///     section: SomeSubSection,
///
///     other_field: u32 // fields with no attribute tags do not get exposed.
/// }
/// ```
#[proc_macro_derive(ConfigSection, attributes(key, subsection))]
pub fn configsection_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_configsection(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_configsection(input: DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(datastruct) = input.data else {
        return Err(syn::Error::new(
            Span::call_site(), "ConfigSection can only be derived on structs"))
    };

    let Fields::Named(fields) = datastruct.fields else {
        return Err(syn::Error::new(
            Span::call_site(), "ConfigSection cannot be derived on structs with unnamed fields"))
    };

    let keys = exposed_fields(&fields, "key")?;
    let subsections = exposed_fields(&fields, "subsection")?;

    let key_arms = match_arms(&keys);
    let subsection_arms = match_arms(&subsections);
    let key_names = keys.iter().map(|(name, _)| name);

    let name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let tokens = quote! {
        impl #impl_generics ConfigSection for #name #ty_generics #where_clause {
            fn get_key(&self, name: &str) -> Option<&dyn std::any::Any> {
                #key_arms
            }

            fn subsection(&self, name: &str) -> Option<&dyn ConfigSection> {
                #subsection_arms
            }

            fn keys(&self) -> &'static [&'static str] {
                &[#(#key_names),*]
            }
        }
    };

    Ok(tokens)
}

fn match_arms(fields: &[(String, syn::Ident)]) -> TokenStream {
    if fields.is_empty() {
        return quote! { { let _ = name; None } }
    }

    let mut arms = TokenStream::new();

    for (name, ident) in fields {
        arms.extend(quote! { #name => Some(&self.#ident), });
    }

    quote! {
        match name {
            #arms
            _ => None
        }
    }
}

/// Collects the (exposed name, field ident) pairs of all fields tagged with `helper`.
fn exposed_fields(fields: &FieldsNamed, helper: &str) -> syn::Result<Vec<(String, syn::Ident)>> {
    let mut ret = Vec::new();

    for field in fields.named.iter() {
        let Some(ident) = field.ident.clone() else {
            continue
        };
        if let Some(rename) = field_helper(field, helper)? {
            let exposed = rename.unwrap_or_else(|| ident.to_string());
            ret.push((exposed, ident));
        }
    }

    Ok(ret)
}

/// Looks for `#[helper]` or `#[helper(name = "...")]` on a given Field.
///
/// Returns `Some(None)` for the bare form and `Some(Some(name))` for a rename.
fn field_helper(field: &Field, helper: &str) -> syn::Result<Option<Option<String>>> {
    for attr in field.attrs.iter() {
        if !attr.path().is_ident(helper) {
            continue
        }
        match &attr.meta {
            Meta::Path(_) => return Ok(Some(None)),
            Meta::List(_) => {
                let mut rename = None;
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        let lit: LitStr = meta.value()?.parse()?;
                        rename = Some(lit.value());
                        Ok(())
                    } else {
                        Err(meta.error("expected `name = \"...\"`"))
                    }
                })?;
                return Ok(Some(rename))
            }
            Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(nv, "use #[key(name = \"...\")] to rename a key"))
            }
        }
    }

    Ok(None)
}
