use std::collections::HashMap;

use crate::error::{JsonModelError, Result};

/// Member-name lookup for one enum type, optionally folding case.
#[derive(Debug, Clone)]
pub struct EnumTable {
    names: Vec<String>,
    exact: HashMap<String, usize>,
    folded: Option<HashMap<String, usize>>,
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl EnumTable {
    /// Fails when two members share a name, or collide after folding when
    /// `case_insensitive` is set.
    pub fn new(type_name: &str, names: Vec<String>, case_insensitive: bool) -> Result<Self> {
        let mut exact = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if exact.insert(name.clone(), index).is_some() {
                return Err(JsonModelError::shape(
                    type_name,
                    format!("enum member '{name}' is declared twice"),
                ));
            }
        }

        let folded = if case_insensitive {
            let mut folded = HashMap::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                if let Some(previous) = folded.insert(fold(name), index) {
                    return Err(JsonModelError::shape(
                        type_name,
                        format!(
                            "enum members '{}' and '{name}' are indistinguishable without case",
                            names[previous]
                        ),
                    ));
                }
            }
            Some(folded)
        } else {
            None
        };

        Ok(Self {
            names,
            exact,
            folded,
        })
    }

    pub fn lookup(&self, value: &str) -> Option<usize> {
        if let Some(index) = self.exact.get(value) {
            return Some(*index);
        }
        self.folded.as_ref()?.get(&fold(value)).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.folded.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_lookup_is_case_sensitive_by_default() {
        let table = EnumTable::new("Color", names(&["a", "b"]), false).unwrap();
        assert_eq!(table.lookup("a"), Some(0));
        assert_eq!(table.lookup("A"), None);
    }

    #[test]
    fn folded_lookup_ignores_case() {
        let table = EnumTable::new("Color", names(&["a", "Blue"]), true).unwrap();
        assert_eq!(table.lookup("A"), Some(0));
        assert_eq!(table.lookup("BLUE"), Some(1));
        assert_eq!(table.lookup("blue"), Some(1));
        assert_eq!(table.lookup("c"), None);
    }

    #[test]
    fn duplicate_members_are_rejected() {
        assert!(EnumTable::new("Color", names(&["a", "a"]), false).unwrap_err().is_shape());
        assert!(EnumTable::new("Color", names(&["a", "A"]), false).is_ok());
        assert!(EnumTable::new("Color", names(&["a", "A"]), true).unwrap_err().is_shape());
    }
}
