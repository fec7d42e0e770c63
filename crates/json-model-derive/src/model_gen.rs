use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields, Ident, Type};

use crate::attrs::{DefaultSpec, FieldAttrs, StructAttrs, is_option_type, parse_field_attrs, parse_struct_attrs};

struct FieldInfo {
    ident: Ident,
    ty: Type,
    /// Parameter name: the field name without any `r#` prefix.
    name: String,
    attrs: FieldAttrs,
}

impl FieldInfo {
    fn from_field(field: &syn::Field) -> syn::Result<Self> {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "JsonModel requires named fields"));
        };
        let name = ident.to_string().trim_start_matches("r#").to_string();
        Ok(Self {
            ident,
            ty: field.ty.clone(),
            name,
            attrs: parse_field_attrs(field)?,
        })
    }

    fn param(&self) -> TokenStream {
        let ty = &self.ty;
        let name = &self.name;
        let default = match &self.attrs.default {
            Some(DefaultSpec::Function(path)) => quote! { .default_with(#path) },
            Some(DefaultSpec::Trait) => quote! { .default_with(<#ty as ::core::default::Default>::default) },
            None if is_option_type(ty) => {
                quote! { .default_with(<#ty as ::core::default::Default>::default) }
            }
            None => quote! {},
        };
        quote! {
            .param(::json_model::ParamDecl::of::<#ty>(#name) #default)
        }
    }
}

fn generate_metadata(struct_attrs: &StructAttrs, fields: &[&FieldInfo]) -> TokenStream {
    let naming = if struct_attrs.rename_all_explicit {
        let rule = struct_attrs.rename_all;
        quote! { .naming(#rule) }
    } else {
        quote! {}
    };
    let omit = match struct_attrs.omit {
        Some(mode) => quote! { .omit(#mode) },
        None => quote! {},
    };
    let deny_unknown = match struct_attrs.deny_unknown {
        Some(deny) => quote! { .deny_unknown(#deny) },
        None => quote! {},
    };
    let renames = fields.iter().filter_map(|field| {
        let name = &field.name;
        field
            .attrs
            .rename
            .as_ref()
            .map(|rename| quote! { .rename(#name, #rename) })
    });
    let inlines = fields.iter().filter(|field| field.attrs.inline).map(|field| {
        let name = &field.name;
        quote! { .inline(#name) }
    });

    quote! {
        ::json_model::TypeMetadata::new()
            #naming
            #omit
            #deny_unknown
            #(#renames)*
            #(#inlines)*
    }
}

pub fn generate_model_impl(input: &DeriveInput, data: &DataStruct) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "JsonModel cannot be derived for generic types",
        ));
    }

    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "JsonModel can only be derived for structs with named fields",
        ));
    };

    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let display_name = struct_attrs
        .name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());

    let mut all_fields = Vec::with_capacity(named.named.len());
    for field in &named.named {
        all_fields.push(FieldInfo::from_field(field)?);
    }
    let fields: Vec<&FieldInfo> = all_fields.iter().filter(|field| !field.attrs.skip).collect();

    let params = fields.iter().map(|field| field.param());

    // Struct literal in declaration order so `take` sees parameters in order.
    let initializers = all_fields.iter().map(|field| {
        let ident = &field.ident;
        if field.attrs.skip {
            quote! { #ident: ::core::default::Default::default() }
        } else {
            quote! { #ident: __args.take()? }
        }
    });

    let accessor_arms = fields.iter().map(|field| {
        let ident = &field.ident;
        let name = &field.name;
        quote! { #name => ::core::option::Option::Some(&__this.#ident as &dyn ::core::any::Any), }
    });

    let metadata = generate_metadata(&struct_attrs, &fields);

    Ok(quote! {
        impl ::json_model::JsonType for #struct_name {
            fn declared_type() -> ::json_model::DeclaredType {
                ::json_model::DeclaredType::object::<Self>()
            }
        }

        impl ::json_model::JsonModel for #struct_name {
            fn declaration() -> ::json_model::TypeDeclaration {
                fn __json_model_field<'a>(
                    instance: &'a dyn ::core::any::Any,
                    name: &str,
                ) -> ::core::option::Option<&'a dyn ::core::any::Any> {
                    let __this = instance.downcast_ref::<#struct_name>()?;
                    match name {
                        #(#accessor_arms)*
                        _ => ::core::option::Option::None,
                    }
                }

                ::json_model::TypeDeclaration::new::<Self>()
                    .named(#display_name)
                    #(#params)*
                    .constructor(|__args: &mut ::json_model::Arguments| {
                        ::core::result::Result::Ok(#struct_name {
                            #(#initializers,)*
                        })
                    })
                    .accessor(__json_model_field)
                    .metadata(#metadata)
            }
        }
    })
}
