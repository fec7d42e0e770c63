//! Serialize engine: instance to JSON object, in attribute order.

use std::any::Any;

use serde_json::{Map, Value};

use crate::config::OmitPolicy;
use crate::error::{JsonModelError, Result};
use crate::model::{AttributeDescriptor, Model};
use crate::registry::Registry;

pub(crate) fn serialize_model(
    registry: &Registry,
    model: &Model,
    instance: &dyn Any,
) -> Result<Map<String, Value>> {
    let Some(accessor) = model.accessor() else {
        return Err(JsonModelError::shape(
            model.type_name(),
            "type declares no field accessor and cannot be serialized",
        ));
    };

    model.check_inline(registry)?;

    let mut out = Map::new();
    for attribute in model.attributes() {
        let source = attribute.source_name();
        let wire = attribute.wire_name();
        let Some(field) = accessor(instance, source) else {
            return Err(JsonModelError::shape(
                model.type_name(),
                format!("instance has no readable field '{source}'"),
            ));
        };

        if let Some(inline) = attribute.inline_model() {
            let sub = inline.get(registry)?;
            for (key, value) in serialize_model(registry, &sub, field)? {
                insert(model, &mut out, key, value)?;
            }
            continue;
        }

        let value = attribute
            .serialize(registry, field)
            .map_err(|err| err.with_field(source, wire).at_key(wire))?;
        if omitted(registry, model, attribute, &value)? {
            continue;
        }
        insert(model, &mut out, wire.to_string(), value)?;
    }
    Ok(out)
}

fn insert(model: &Model, out: &mut Map<String, Value>, key: String, value: Value) -> Result<()> {
    if out.contains_key(&key) {
        return Err(JsonModelError::shape(
            model.type_name(),
            format!("json key '{key}' is written by more than one attribute"),
        ));
    }
    out.insert(key, value);
    Ok(())
}

fn omitted(
    registry: &Registry,
    model: &Model,
    attribute: &AttributeDescriptor,
    value: &Value,
) -> Result<bool> {
    if !attribute.is_optional() {
        return Ok(false);
    }
    match model.config().omit {
        OmitPolicy::Never => Ok(false),
        OmitPolicy::Null => Ok(value.is_null()),
        OmitPolicy::Default => {
            let Some(default) = attribute.default_value() else {
                return Ok(false);
            };
            let default = attribute.serialize(registry, &*default)?;
            Ok(default == *value)
        }
    }
}
