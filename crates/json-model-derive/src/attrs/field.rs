//! Field- and variant-level attribute definitions.

use super::types::DefaultSpec;

/// Field attributes, parsed from `#[json(...)]` on struct fields.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Explicit JSON key; bypasses `rename_all`.
    pub rename: Option<String>,
    pub default: Option<DefaultSpec>,
    /// Flatten the nested object's keys into the parent object.
    pub inline: bool,
    /// Leave the field out of the model; it is filled with `Default::default()`.
    pub skip: bool,
}

#[derive(Debug, Default)]
pub struct VariantAttrs {
    pub rename: Option<String>,
}
