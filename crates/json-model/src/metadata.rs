use std::any::Any;
use std::collections::{HashMap, HashSet};

use crate::config::{OmitPolicy, TypeOverrides};
use crate::naming::NamingRule;
use crate::types::{DeclaredType, ListType};

/// Per-type policy captured when the type is declared. Read-only once registered.
#[derive(Debug, Clone, Default)]
pub struct TypeMetadata {
    naming: Option<NamingRule>,
    renames: HashMap<String, String>,
    list_elements: HashMap<String, ListType>,
    inline: HashSet<String>,
    case_insensitive: bool,
    omit: Option<OmitPolicy>,
    deny_unknown: Option<bool>,
}

impl TypeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn naming(mut self, rule: NamingRule) -> Self {
        self.naming = Some(rule);
        self
    }

    /// Give one parameter an explicit wire name, bypassing the naming rule.
    pub fn rename(mut self, param: impl Into<String>, wire_name: impl Into<String>) -> Self {
        self.renames.insert(param.into(), wire_name.into());
        self
    }

    /// Element type for a parameter declared as a bare list.
    pub fn list_element(mut self, param: impl Into<String>, list: ListType) -> Self {
        self.list_elements.insert(param.into(), list);
        self
    }

    /// Element type resolved through `provider` when the model is built, for
    /// element types that are not declared yet.
    pub fn lazy_list_element<E: Any + Send>(
        self,
        param: impl Into<String>,
        provider: impl Fn() -> DeclaredType + Send + Sync + 'static,
    ) -> Self {
        self.list_element(param, ListType::lazy::<E>(provider))
    }

    pub fn inline(mut self, param: impl Into<String>) -> Self {
        self.inline.insert(param.into());
        self
    }

    /// Enum members match JSON strings regardless of case.
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn omit(mut self, policy: OmitPolicy) -> Self {
        self.omit = Some(policy);
        self
    }

    pub fn deny_unknown(mut self, deny: bool) -> Self {
        self.deny_unknown = Some(deny);
        self
    }

    pub fn naming_rule(&self) -> Option<&NamingRule> {
        self.naming.as_ref()
    }

    pub fn renamed(&self, param: &str) -> Option<&str> {
        self.renames.get(param).map(String::as_str)
    }

    pub fn list_element_for(&self, param: &str) -> Option<&ListType> {
        self.list_elements.get(param)
    }

    pub fn is_inline(&self, param: &str) -> bool {
        self.inline.contains(param)
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn overrides(&self) -> TypeOverrides {
        TypeOverrides {
            naming: self.naming.clone(),
            omit: self.omit,
            deny_unknown: self.deny_unknown,
        }
    }
}
