use crate::naming::NamingRule;

/// Which optional attributes the serializer leaves out of the output object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OmitPolicy {
    /// Every attribute is written.
    #[default]
    Never,
    /// Optional attributes that serialize to `null` are skipped.
    Null,
    /// Optional attributes whose value serializes the same as their declared default are skipped.
    Default,
}

impl OmitPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "never" => Some(Self::Never),
            "null" => Some(Self::Null),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

/// Registry-wide defaults, overridden per type by `TypeMetadata`.
#[derive(Debug, Clone, Default)]
pub struct CodecConfig {
    pub naming: NamingRule,
    pub omit: OmitPolicy,
    pub deny_unknown: bool,
}

impl CodecConfig {
    pub fn with_naming(mut self, naming: NamingRule) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_omit(mut self, omit: OmitPolicy) -> Self {
        self.omit = omit;
        self
    }

    pub fn with_deny_unknown(mut self, deny_unknown: bool) -> Self {
        self.deny_unknown = deny_unknown;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeOverrides {
    pub naming: Option<NamingRule>,
    pub omit: Option<OmitPolicy>,
    pub deny_unknown: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub naming: NamingRule,
    pub omit: OmitPolicy,
    pub deny_unknown: bool,
}

pub fn resolve_type(config: &CodecConfig, overrides: TypeOverrides) -> EffectiveConfig {
    EffectiveConfig {
        naming: overrides.naming.unwrap_or_else(|| config.naming.clone()),
        omit: overrides.omit.unwrap_or(config.omit),
        deny_unknown: overrides.deny_unknown.unwrap_or(config.deny_unknown),
    }
}
