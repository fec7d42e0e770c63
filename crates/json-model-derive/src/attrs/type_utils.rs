//! Type analysis utilities for field types.

use syn::{Type, TypePath};

/// Check if a type is `Option<T>`.
pub fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(TypePath { qself: None, path }) => path
            .segments
            .last()
            .is_some_and(|s| s.ident == "Option"),
        _ => false,
    }
}
