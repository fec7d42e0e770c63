//! Attribute parsing for the json-model derive macros.
//!
//! # Module Structure
//!
//! - `types` - Enum definitions for attribute values
//! - `container` - Struct/enum-level attribute definitions
//! - `field` - Field/variant-level attribute definitions
//! - `type_utils` - Type analysis utilities
//! - `parse` - Parsing entry points using `parse_nested_meta`

mod container;
mod field;
mod parse;
mod type_utils;
mod types;

pub use container::{EnumAttrs, StructAttrs};
pub use field::{FieldAttrs, VariantAttrs};
pub use parse::{parse_enum_attrs, parse_field_attrs, parse_struct_attrs, parse_variant_attrs};
pub use type_utils::is_option_type;
pub use types::DefaultSpec;
