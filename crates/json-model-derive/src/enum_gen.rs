use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields};

use crate::attrs::{parse_enum_attrs, parse_variant_attrs};

pub fn generate_enum_impl(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream> {
    let enum_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "JsonEnum cannot be derived for generic types",
        ));
    }

    let enum_attrs = parse_enum_attrs(&input.attrs)?;
    let display_name = enum_attrs
        .name
        .clone()
        .unwrap_or_else(|| enum_name.to_string());

    let mut members = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "JsonEnum can only be derived for unit enums",
            ));
        }
        let attrs = parse_variant_attrs(&variant.attrs)?;
        let ident = &variant.ident;
        let name = attrs
            .rename
            .unwrap_or_else(|| enum_attrs.rename_all.apply(&ident.to_string()));
        members.push(quote! {
            .member_with(
                #name,
                || #enum_name::#ident,
                |value: &#enum_name| ::core::matches!(value, #enum_name::#ident),
            )
        });
    }

    let case_insensitive = if enum_attrs.case_insensitive {
        quote! { .case_insensitive() }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl ::json_model::JsonType for #enum_name {
            fn declared_type() -> ::json_model::DeclaredType {
                ::json_model::DeclaredType::enumeration::<Self>()
            }
        }

        impl ::json_model::JsonEnum for #enum_name {
            fn declaration() -> ::json_model::EnumDeclaration {
                ::json_model::EnumDeclaration::new::<Self>()
                    .named(#display_name)
                    #(#members)*
                    #case_insensitive
            }
        }
    })
}
