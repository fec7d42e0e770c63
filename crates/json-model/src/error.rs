use std::fmt;

use crate::path::JsonPath;

pub type Result<T, E = JsonModelError> = std::result::Result<T, E>;

/// Closest candidate to `input` by edit distance, if it is within two edits
/// and shorter than `input` itself.
pub fn suggest_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, edit_distance(input, candidate)))
        .filter(|&(_, distance)| distance > 0 && distance <= 2 && distance < input.len())
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

fn edit_distance(from: &str, to: &str) -> usize {
    let to: Vec<char> = to.chars().collect();
    let mut row: Vec<usize> = (0..=to.len()).collect();
    for (i, source) in from.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, target) in to.iter().enumerate() {
            let substitution = diagonal + usize::from(source != *target);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[to.len()]
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!("; did you mean '{s}'?"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// A declaration or a JSON container does not have the shape the model expects.
    #[error("shape error: {0}")]
    Shape(String),
    #[error("required field is missing")]
    MissingField,
    #[error(
        "unknown enum member '{value}', expected one of: {}{}",
        .valid.join(", "),
        did_you_mean(.suggestion)
    )]
    UnknownEnumMember {
        value: String,
        valid: Vec<String>,
        suggestion: Option<String>,
    },
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },
    #[error("unknown field '{key}'{}", did_you_mean(.suggestion))]
    UnknownField {
        key: String,
        suggestion: Option<String>,
    },
    #[error("type is already declared")]
    AlreadyDeclared,
    #[error("construction failed: {0}")]
    Construct(String),
    #[error("invalid JSON text: {0}")]
    Json(String),
}

#[derive(Debug, Clone)]
pub struct JsonModelError {
    pub type_name: String,
    pub field_name: Option<String>,
    pub wire_key: Option<String>,
    pub path: JsonPath,
    pub kind: ErrorKind,
}

impl fmt::Display for JsonModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error in {}", self.type_name)?;

        if let Some(ref field) = self.field_name {
            write!(f, " field '{field}'")?;
        }

        if let Some(ref key) = self.wire_key {
            if self.field_name.as_deref() != Some(key.as_str()) {
                write!(f, " (json key: '{key}')")?;
            }
        }

        if !self.path.is_root() {
            write!(f, " at {}", self.path)?;
        }

        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for JsonModelError {}

impl JsonModelError {
    pub fn new(type_name: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: None,
            wire_key: None,
            path: JsonPath::root(),
            kind,
        }
    }

    pub fn shape(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(type_name, ErrorKind::Shape(message.into()))
    }

    pub fn missing_field(
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        wire_key: impl Into<String>,
    ) -> Self {
        Self::new(type_name, ErrorKind::MissingField).with_field(field_name, wire_key)
    }

    pub fn unknown_member(
        type_name: impl Into<String>,
        value: impl Into<String>,
        valid: &[String],
    ) -> Self {
        let value = value.into();
        let candidates: Vec<&str> = valid.iter().map(String::as_str).collect();
        let suggestion = suggest_similar(&value, &candidates).map(String::from);
        Self::new(
            type_name,
            ErrorKind::UnknownEnumMember {
                value,
                valid: valid.to_vec(),
                suggestion,
            },
        )
    }

    pub fn type_mismatch(
        type_name: impl Into<String>,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(
            type_name,
            ErrorKind::TypeMismatch {
                expected,
                actual: actual.into(),
            },
        )
    }

    pub fn unknown_field(type_name: impl Into<String>, key: impl Into<String>, valid: &[&str]) -> Self {
        let key = key.into();
        let suggestion = suggest_similar(&key, valid).map(String::from);
        let mut err = Self::new(
            type_name,
            ErrorKind::UnknownField {
                key: key.clone(),
                suggestion,
            },
        );
        err.wire_key = Some(key);
        err
    }

    pub fn already_declared(type_name: impl Into<String>) -> Self {
        Self::new(type_name, ErrorKind::AlreadyDeclared)
    }

    pub fn construct(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(type_name, ErrorKind::Construct(message.into()))
    }

    pub fn json(type_name: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::new(type_name, ErrorKind::Json(err.to_string()))
    }

    /// Attach the failing attribute, keeping any attribute recorded closer to the failure.
    pub fn with_field(mut self, field_name: impl Into<String>, wire_key: impl Into<String>) -> Self {
        if self.field_name.is_none() {
            self.field_name = Some(field_name.into());
            self.wire_key = Some(wire_key.into());
        }
        self
    }

    pub fn at_key(mut self, key: impl Into<String>) -> Self {
        self.path.push_front_key(key);
        self
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.path.push_front_index(index);
        self
    }

    pub fn is_shape(&self) -> bool {
        matches!(self.kind, ErrorKind::Shape(_))
    }

    pub fn is_missing_field(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingField)
    }

    pub fn is_unknown_member(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownEnumMember { .. })
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_names_only() {
        assert_eq!(suggest_similar("colour", &["color", "size"]), Some("color"));
        assert_eq!(suggest_similar("zzz", &["color", "size"]), None);
        assert_eq!(suggest_similar("a", &["b"]), None);
    }

    #[test]
    fn display_includes_field_key_and_path() {
        let err = JsonModelError::type_mismatch("Order", "i64", "string")
            .with_field("itemCount", "item_count")
            .at_key("item_count")
            .at_index(3)
            .at_key("orders");
        let rendered = err.to_string();
        assert_eq!(
            rendered,
            "error in Order field 'itemCount' (json key: 'item_count') at $.orders[3].item_count: \
             type mismatch: expected i64, found string"
        );
    }

    #[test]
    fn innermost_field_wins() {
        let err = JsonModelError::missing_field("Inner", "id", "id").with_field("inner", "inner");
        assert_eq!(err.field_name.as_deref(), Some("id"));
    }

    #[test]
    fn unknown_member_message_lists_members() {
        let err = JsonModelError::unknown_member("Color", "gren", &["red".into(), "green".into()]);
        assert_eq!(
            err.kind.to_string(),
            "unknown enum member 'gren', expected one of: red, green; did you mean 'green'?"
        );
    }
}
