//! Container-level (struct/enum) attribute definitions.

use super::types::{OmitMode, RenameStrategy};

/// Struct-level attributes, parsed from `#[json(...)]` on structs.
#[derive(Debug, Default)]
pub struct StructAttrs {
    /// Display name used in errors; defaults to the struct name.
    pub name: Option<String>,
    /// Naming rule applied to every field without an explicit rename.
    pub rename_all: RenameStrategy,
    /// Whether rename_all was explicitly set (otherwise the registry default applies).
    pub rename_all_explicit: bool,
    pub omit: Option<OmitMode>,
    pub deny_unknown: Option<bool>,
}

/// Enum-level attributes, parsed from `#[json(...)]` on unit enums.
#[derive(Debug, Default)]
pub struct EnumAttrs {
    pub name: Option<String>,
    pub rename_all: RenameStrategy,
    pub case_insensitive: bool,
}
