//! Parse engine: JSON object to instance, one attribute at a time.

use serde_json::{Map, Value};

use crate::declare::Arguments;
use crate::error::{JsonModelError, Result};
use crate::model::{AttributeDescriptor, Model};
use crate::primitive::json_type_name;
use crate::registry::Registry;
use crate::resolve::ModelCell;
use crate::types::Instance;

pub(crate) fn parse_model(registry: &Registry, model: &Model, value: &Value) -> Result<Instance> {
    let Value::Object(object) = value else {
        return Err(JsonModelError::shape(
            model.type_name(),
            format!("expected object, found {}", json_type_name(value)),
        ));
    };

    model.check_inline(registry)?;
    if model.config().deny_unknown {
        reject_unknown(registry, model, object)?;
    }
    parse_fields(registry, model, object)
}

fn parse_fields(registry: &Registry, model: &Model, object: &Map<String, Value>) -> Result<Instance> {
    let mut slots = Vec::with_capacity(model.attributes().len());
    for attribute in model.attributes() {
        let value = match attribute.inline_model() {
            Some(inline) => parse_inline(registry, attribute, inline, object)?,
            None => parse_attribute(registry, model, attribute, object)?,
        };
        slots.push((attribute.source_name().to_string(), value));
    }
    (model.constructor())(Arguments::new(model.type_name(), slots))
}

fn parse_attribute(
    registry: &Registry,
    model: &Model,
    attribute: &AttributeDescriptor,
    object: &Map<String, Value>,
) -> Result<Instance> {
    let source = attribute.source_name();
    let wire = attribute.wire_name();
    match object.get(wire) {
        Some(value) => attribute
            .parse(registry, value)
            .map_err(|err| err.with_field(source, wire).at_key(wire)),
        None => attribute
            .default_value()
            .ok_or_else(|| JsonModelError::missing_field(model.type_name(), source, wire)),
    }
}

// The sub-model reads its keys from the parent object. An optional inline
// attribute none of whose keys are present takes its default.
fn parse_inline(
    registry: &Registry,
    attribute: &AttributeDescriptor,
    inline: &ModelCell,
    object: &Map<String, Value>,
) -> Result<Instance> {
    let sub = inline.get(registry)?;
    if attribute.is_optional() {
        let claimed = sub.claimed_keys(registry)?;
        if !claimed.iter().any(|key| object.contains_key(key)) {
            if let Some(default) = attribute.default_value() {
                return Ok(default);
            }
        }
    }
    parse_fields(registry, &sub, object)
}

fn reject_unknown(registry: &Registry, model: &Model, object: &Map<String, Value>) -> Result<()> {
    let claimed = model.claimed_keys(registry)?;
    for key in object.keys() {
        if !claimed.contains(key) {
            let valid: Vec<&str> = claimed.iter().map(String::as_str).collect();
            return Err(JsonModelError::unknown_field(model.type_name(), key, &valid));
        }
    }
    Ok(())
}
