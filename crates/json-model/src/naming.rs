use std::fmt;
use std::sync::Arc;

use convert_case::{Case, Casing};

/// Maps a declared field name to the key it uses in JSON.
#[derive(Clone, Default)]
pub enum NamingRule {
    #[default]
    Identity,
    CamelCase,
    PascalCase,
    SnakeCase,
    KebabCase,
    ScreamingSnakeCase,
    Lowercase,
    Uppercase,
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl NamingRule {
    pub fn custom(rule: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(rule))
    }

    /// Parse the names accepted by `#[json(rename_all = "...")]`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::Identity),
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

    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Identity => name.to_string(),
            Self::CamelCase => name.to_case(Case::Camel),
            Self::PascalCase => name.to_case(Case::Pascal),
            Self::SnakeCase => name.to_case(Case::Snake),
            Self::KebabCase => name.to_case(Case::Kebab),
            Self::ScreamingSnakeCase => name.to_case(Case::UpperSnake),
            Self::Lowercase => name.to_lowercase(),
            Self::Uppercase => name.to_uppercase(),
            Self::Custom(rule) => rule(name),
        }
    }
}

impl fmt::Debug for NamingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "Identity"),
            Self::CamelCase => write!(f, "CamelCase"),
            Self::PascalCase => write!(f, "PascalCase"),
            Self::SnakeCase => write!(f, "SnakeCase"),
            Self::KebabCase => write!(f, "KebabCase"),
            Self::ScreamingSnakeCase => write!(f, "ScreamingSnakeCase"),
            Self::Lowercase => write!(f, "Lowercase"),
            Self::Uppercase => write!(f, "Uppercase"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
