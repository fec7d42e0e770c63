//! Attribute value types shared by struct and enum derives.

use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

/// `rename_all` strategy. Mirrors `json_model::NamingRule` minus `Custom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenameStrategy {
    #[default]
    None,
    CamelCase,
    PascalCase,
    SnakeCase,
    KebabCase,
    ScreamingSnakeCase,
    Lowercase,
    Uppercase,
}

impl RenameStrategy {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "camelCase" => Some(Self::CamelCase),
            "PascalCase" => Some(Self::PascalCase),
            "snake_case" => Some(Self::SnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "lowercase" => Some(Self::Lowercase),
            "UPPERCASE" => Some(Self::Uppercase),
            _ => None,
        }
    }

    /// Used for enum members, whose names are fixed at compile time.
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::None => name.to_string(),
            Self::CamelCase => name.to_case(Case::Camel),
            Self::PascalCase => name.to_case(Case::Pascal),
            Self::SnakeCase => name.to_case(Case::Snake),
            Self::KebabCase => name.to_case(Case::Kebab),
            Self::ScreamingSnakeCase => name.to_case(Case::UpperSnake),
            Self::Lowercase => name.to_lowercase(),
            Self::Uppercase => name.to_uppercase(),
        }
    }
}

impl ToTokens for RenameStrategy {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let variant = match self {
            Self::None => quote! { Identity },
            Self::CamelCase => quote! { CamelCase },
            Self::PascalCase => quote! { PascalCase },
            Self::SnakeCase => quote! { SnakeCase },
            Self::KebabCase => quote! { KebabCase },
            Self::ScreamingSnakeCase => quote! { ScreamingSnakeCase },
            Self::Lowercase => quote! { Lowercase },
            Self::Uppercase => quote! { Uppercase },
        };
        tokens.extend(quote! { ::json_model::NamingRule::#variant });
    }
}

pub const RENAME_ALL_VALUES: &str =
    "none, camelCase, PascalCase, snake_case, kebab-case, SCREAMING_SNAKE_CASE, lowercase, UPPERCASE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmitMode {
    Never,
    Null,
    Default,
}

impl OmitMode {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "never" => Some(Self::Never),
            "null" => Some(Self::Null),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

impl ToTokens for OmitMode {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let variant = match self {
            Self::Never => quote! { Never },
            Self::Null => quote! { Null },
            Self::Default => quote! { Default },
        };
        tokens.extend(quote! { ::json_model::OmitPolicy::#variant });
    }
}

/// Where an optional field's default comes from.
#[derive(Debug, Clone)]
pub enum DefaultSpec {
    /// `Default::default()`; also used implicitly for `Option<T>` fields.
    Trait,
    /// `#[json(default = "path::to::fn")]`
    Function(syn::ExprPath),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_strategies_apply_to_variant_names() {
        assert_eq!(RenameStrategy::SnakeCase.apply("DarkRed"), "dark_red");
        assert_eq!(RenameStrategy::KebabCase.apply("DarkRed"), "dark-red");
        assert_eq!(RenameStrategy::CamelCase.apply("DarkRed"), "darkRed");
        assert_eq!(RenameStrategy::ScreamingSnakeCase.apply("DarkRed"), "DARK_RED");
        assert_eq!(RenameStrategy::Lowercase.apply("DarkRed"), "darkred");
        assert_eq!(RenameStrategy::None.apply("DarkRed"), "DarkRed");
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(RenameStrategy::from_name("snake"), None);
        assert_eq!(OmitMode::from_name("always"), None);
        assert_eq!(OmitMode::from_name("null"), Some(OmitMode::Null));
    }
}
