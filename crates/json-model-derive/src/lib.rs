mod attrs;
mod enum_gen;
mod model_gen;

use proc_macro::TokenStream;
use syn::{Data, DeriveInput, parse_macro_input};

/// Declare a named-field struct as a JSON object type.
///
/// Struct attributes: `rename_all = "..."`, `omit = "never|null|default"`,
/// `deny_unknown`, `name = "..."`. Field attributes: `rename = "..."`,
/// `default`, `default = "path"`, `inline`, `skip`. `Option<T>` fields are
/// optional with a `None` default.
#[proc_macro_derive(JsonModel, attributes(json))]
pub fn derive_json_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let result = match &input.data {
        Data::Struct(data) => model_gen::generate_model_impl(&input, data),
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "JsonModel can only be derived for structs; use JsonEnum for unit enums",
        )),
    };
    match result {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Declare a unit enum as a JSON string enumeration.
///
/// Enum attributes: `rename_all = "..."`, `case_insensitive`, `name = "..."`.
/// Variant attribute: `rename = "..."`.
#[proc_macro_derive(JsonEnum, attributes(json))]
pub fn derive_json_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let result = match &input.data {
        Data::Enum(data) => enum_gen::generate_enum_impl(&input, data),
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "JsonEnum can only be derived for unit enums",
        )),
    };
    match result {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
