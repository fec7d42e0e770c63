//! Attribute parsing functions.
//!
//! Uses manual `parse_nested_meta` for all `#[json(...)]` attributes, with
//! `#[serde(rename_all/rename)]` honoured as a fallback.

use syn::spanned::Spanned;
use syn::{Attribute, Expr, ExprLit, Field, Lit, LitStr};

use super::container::{EnumAttrs, StructAttrs};
use super::field::{FieldAttrs, VariantAttrs};
use super::types::{DefaultSpec, OmitMode, RENAME_ALL_VALUES, RenameStrategy};

fn string_value(meta: &syn::meta::ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s),
        other => Err(syn::Error::new(
            other.span(),
            format!("expected string literal for `{key}`"),
        )),
    }
}

/// `flag` or `flag = true|false`.
fn flag_value(meta: &syn::meta::ParseNestedMeta) -> syn::Result<bool> {
    if !meta.input.peek(syn::Token![=]) {
        return Ok(true);
    }
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Lit(ExprLit {
            lit: Lit::Bool(b), ..
        }) => Ok(b.value),
        other => Err(syn::Error::new(other.span(), "expected `true` or `false`")),
    }
}

fn rename_strategy(lit: &LitStr) -> syn::Result<RenameStrategy> {
    RenameStrategy::from_name(&lit.value()).ok_or_else(|| {
        syn::Error::new_spanned(
            lit,
            format!("invalid rename_all value, expected one of: {RENAME_ALL_VALUES}"),
        )
    })
}

/// Parse struct-level attributes from `#[json(...)]`.
pub fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut result = StructAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|meta| parse_struct_meta(&meta, &mut result))?;
    }

    if !result.rename_all_explicit {
        if let Some(strategy) = serde_rename_all_from_attrs(attrs)? {
            result.rename_all = strategy;
            result.rename_all_explicit = true;
        }
    }

    Ok(result)
}

fn parse_struct_meta(meta: &syn::meta::ParseNestedMeta, result: &mut StructAttrs) -> syn::Result<()> {
    let ident = meta.path.get_ident().map(|i| i.to_string());

    match ident.as_deref() {
        Some("name") => {
            result.name = Some(string_value(meta, "name")?.value());
        }
        Some("rename_all") => {
            let lit = string_value(meta, "rename_all")?;
            result.rename_all = rename_strategy(&lit)?;
            result.rename_all_explicit = true;
        }
        Some("omit") => {
            let lit = string_value(meta, "omit")?;
            result.omit = Some(OmitMode::from_name(&lit.value()).ok_or_else(|| {
                syn::Error::new_spanned(&lit, "invalid omit value, expected one of: never, null, default")
            })?);
        }
        Some("deny_unknown") => {
            result.deny_unknown = Some(flag_value(meta)?);
        }
        Some("allow_unknown") => {
            result.deny_unknown = Some(!flag_value(meta)?);
        }
        _ => {
            return Err(syn::Error::new(meta.path.span(), "unknown struct attribute for JsonModel"));
        }
    }

    Ok(())
}

/// Parse field-level attributes from `#[json(...)]`.
pub fn parse_field_attrs(field: &Field) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|meta| parse_field_meta(&meta, &mut result))?;
    }

    if result.rename.is_none() {
        result.rename = serde_rename_from_attrs(&field.attrs)?;
    }

    if result.skip && (result.inline || result.rename.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "`skip` cannot be combined with `inline` or `rename`",
        ));
    }

    Ok(result)
}

fn parse_field_meta(meta: &syn::meta::ParseNestedMeta, result: &mut FieldAttrs) -> syn::Result<()> {
    let ident = meta.path.get_ident().map(|i| i.to_string());

    match ident.as_deref() {
        Some("rename") => {
            result.rename = Some(string_value(meta, "rename")?.value());
        }
        Some("default") => {
            if meta.input.peek(syn::Token![=]) {
                let lit = string_value(meta, "default")?;
                let path: syn::ExprPath = lit.parse()?;
                result.default = Some(DefaultSpec::Function(path));
            } else {
                result.default = Some(DefaultSpec::Trait);
            }
        }
        Some("inline") | Some("flatten") => {
            result.inline = flag_value(meta)?;
        }
        Some("skip") => {
            result.skip = flag_value(meta)?;
        }
        _ => {
            return Err(syn::Error::new(meta.path.span(), "unknown field attribute for JsonModel"));
        }
    }

    Ok(())
}

pub fn parse_enum_attrs(attrs: &[Attribute]) -> syn::Result<EnumAttrs> {
    let mut result = EnumAttrs::default();
    let mut rename_all_explicit = false;

    for attr in attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let ident = meta.path.get_ident().map(|i| i.to_string());
            match ident.as_deref() {
                Some("name") => {
                    result.name = Some(string_value(&meta, "name")?.value());
                }
                Some("rename_all") => {
                    result.rename_all = rename_strategy(&string_value(&meta, "rename_all")?)?;
                    rename_all_explicit = true;
                }
                Some("case_insensitive") => {
                    result.case_insensitive = flag_value(&meta)?;
                }
                _ => {
                    return Err(syn::Error::new(meta.path.span(), "unknown enum attribute for JsonEnum"));
                }
            }
            Ok(())
        })?;
    }

    if !rename_all_explicit {
        if let Some(strategy) = serde_rename_all_from_attrs(attrs)? {
            result.rename_all = strategy;
        }
    }

    Ok(result)
}

pub fn parse_variant_attrs(attrs: &[Attribute]) -> syn::Result<VariantAttrs> {
    let mut result = VariantAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                result.rename = Some(string_value(&meta, "rename")?.value());
                Ok(())
            } else {
                Err(syn::Error::new(meta.path.span(), "unknown variant attribute for JsonEnum"))
            }
        })?;
    }

    if result.rename.is_none() {
        result.rename = serde_rename_from_attrs(attrs)?;
    }

    Ok(result)
}

/// `rename` / `rename_all` read from `#[serde(...)]`, used when `#[json(...)]`
/// does not say otherwise.
#[derive(Default)]
struct SerdeNames {
    rename: Option<String>,
    rename_all: Option<RenameStrategy>,
}

fn serde_names(attrs: &[Attribute]) -> syn::Result<SerdeNames> {
    let mut names = SerdeNames::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if let Some(name) = serde_name(&meta)? {
                    names.rename.get_or_insert(name);
                }
            } else if meta.path.is_ident("rename_all") {
                if let Some(strategy) = serde_name(&meta)?.as_deref().and_then(RenameStrategy::from_name) {
                    names.rename_all = Some(strategy);
                }
            } else {
                skip_meta(meta)?;
            }
            Ok(())
        })?;
    }
    Ok(names)
}

fn serde_rename_all_from_attrs(attrs: &[Attribute]) -> syn::Result<Option<RenameStrategy>> {
    Ok(serde_names(attrs)?.rename_all)
}

fn serde_rename_from_attrs(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    Ok(serde_names(attrs)?.rename)
}

// Consume an item we do not interpret so the rest of the list still parses.
fn skip_meta(meta: syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(skip_meta)?;
    }
    Ok(())
}

/// `= "name"` or `(serialize = "a", deserialize = "b")`; the serialize side wins.
fn serde_name(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(syn::Token![=]) {
        return Ok(match meta.value()?.parse::<Expr>()? {
            Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) => Some(lit.value()),
            _ => None,
        });
    }
    if !meta.input.peek(syn::token::Paren) {
        return Ok(None);
    }

    let mut serialize = None;
    let mut deserialize = None;
    meta.parse_nested_meta(|side| {
        if side.path.is_ident("serialize") {
            serialize = serde_name(&side)?;
        } else if side.path.is_ident("deserialize") {
            deserialize = serde_name(&side)?;
        } else {
            skip_meta(side)?;
        }
        Ok(())
    })?;
    Ok(serialize.or(deserialize))
}
