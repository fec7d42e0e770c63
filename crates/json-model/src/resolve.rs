//! Type resolver: turns a [`DeclaredType`] into a matched parser/serializer pair.
//!
//! Containers recurse into their element type when they are resolved. Object
//! and enum types do not: their parsers hold a cell that is filled from the
//! registry the first time they actually run, which is what lets a type refer
//! to itself, or to a type declared after it.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{JsonModelError, Result};
use crate::model::Model;
use crate::parse::parse_model;
use crate::primitive::json_type_name;
use crate::registry::{EnumEntry, Registry};
use crate::serialize::serialize_model;
use crate::types::{DeclaredType, EnumRef, Instance, ObjectRef, TypeKey};

pub type Parser = Arc<dyn Fn(&Registry, &Value) -> Result<Instance> + Send + Sync>;
pub type Serializer = Arc<dyn Fn(&Registry, &dyn Any) -> Result<Value> + Send + Sync>;

/// Where a type is being resolved; used for diagnostics only.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub owner: &'a str,
    pub attribute: &'a str,
}

impl<'a> ResolveContext<'a> {
    pub fn new(owner: &'a str, attribute: &'a str) -> Self {
        Self { owner, attribute }
    }

    pub fn root(owner: &'a str) -> Self {
        Self {
            owner,
            attribute: "",
        }
    }
}

fn parser(f: impl Fn(&Registry, &Value) -> Result<Instance> + Send + Sync + 'static) -> Parser {
    Arc::new(f)
}

fn serializer(f: impl Fn(&Registry, &dyn Any) -> Result<Value> + Send + Sync + 'static) -> Serializer {
    Arc::new(f)
}

/// An object type's model, fetched from the registry on first use.
#[derive(Clone)]
pub(crate) struct ModelCell {
    object: ObjectRef,
    model: Arc<OnceCell<Arc<Model>>>,
}

impl ModelCell {
    pub(crate) fn new(object: ObjectRef) -> Self {
        Self {
            object,
            model: Arc::new(OnceCell::new()),
        }
    }

    pub(crate) fn key(&self) -> TypeKey {
        self.object.key()
    }

    pub(crate) fn get(&self, registry: &Registry) -> Result<Arc<Model>> {
        self.model
            .get_or_try_init(|| registry.model_for(&self.object))
            .cloned()
    }
}

#[derive(Clone)]
struct EnumCell {
    enumeration: EnumRef,
    entry: Arc<OnceCell<Arc<EnumEntry>>>,
}

impl EnumCell {
    fn new(enumeration: EnumRef) -> Self {
        Self {
            enumeration,
            entry: Arc::new(OnceCell::new()),
        }
    }

    fn get(&self, registry: &Registry) -> Result<Arc<EnumEntry>> {
        self.entry
            .get_or_try_init(|| registry.enum_for(&self.enumeration))
            .cloned()
    }
}

fn value_mismatch(owner: &str, expected: &str) -> JsonModelError {
    JsonModelError::shape(owner, format!("value does not hold the declared {expected}"))
}

pub fn resolve_parser(ty: &DeclaredType, ctx: ResolveContext<'_>) -> Parser {
    trace!(
        owner = ctx.owner,
        attribute = ctx.attribute,
        ty = %ty.describe(),
        "resolving parser"
    );
    let owner = ctx.owner.to_string();

    match ty {
        DeclaredType::Primitive(primitive) => {
            let primitive = *primitive;
            parser(move |_, value| {
                primitive.decode(value).ok_or_else(|| {
                    JsonModelError::type_mismatch(&owner, primitive.name(), json_type_name(value))
                })
            })
        }
        DeclaredType::Object(object) => {
            let cell = ModelCell::new(*object);
            parser(move |registry, value| {
                let model = cell.get(registry)?;
                parse_model(registry, &model, value)
            })
        }
        DeclaredType::Enum(enumeration) => {
            let cell = EnumCell::new(*enumeration);
            parser(move |registry, value| {
                let entry = cell.get(registry)?;
                match value {
                    Value::String(text) => entry.parse_member(text),
                    other => Err(JsonModelError::type_mismatch(
                        entry.name(),
                        "string",
                        json_type_name(other),
                    )),
                }
            })
        }
        DeclaredType::List(list) => {
            let element = resolve_parser(&list.element_type(), ctx);
            let list = list.clone();
            parser(move |registry, value| {
                let Value::Array(items) = value else {
                    return Err(JsonModelError::shape(
                        &owner,
                        format!("expected array, found {}", json_type_name(value)),
                    ));
                };
                let mut parsed = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    parsed.push(element(registry, item).map_err(|err| err.at_index(index))?);
                }
                list.collect(parsed)
                    .ok_or_else(|| value_mismatch(&owner, "list element type"))
            })
        }
        DeclaredType::Map(map) => {
            let element = resolve_parser(&map.value_type(), ctx);
            let map = map.clone();
            parser(move |registry, value| {
                let Value::Object(entries) = value else {
                    return Err(JsonModelError::shape(
                        &owner,
                        format!("expected object, found {}", json_type_name(value)),
                    ));
                };
                let mut parsed = Vec::with_capacity(entries.len());
                for (key, item) in entries {
                    let item = element(registry, item).map_err(|err| err.at_key(key))?;
                    parsed.push((key.clone(), item));
                }
                map.collect(parsed)
                    .ok_or_else(|| value_mismatch(&owner, "map value type"))
            })
        }
        DeclaredType::Nullable(nullable) => {
            let inner = resolve_parser(nullable.inner(), ctx);
            let nullable = nullable.clone();
            parser(move |registry, value| {
                let parsed = match value {
                    Value::Null => None,
                    other => Some(inner(registry, other)?),
                };
                nullable
                    .wrap(parsed)
                    .ok_or_else(|| value_mismatch(&owner, "optional type"))
            })
        }
        DeclaredType::Boxed(boxed) => {
            let inner = resolve_parser(boxed.inner(), ctx);
            let boxed = boxed.clone();
            parser(move |registry, value| {
                let parsed = inner(registry, value)?;
                boxed
                    .wrap(parsed)
                    .ok_or_else(|| value_mismatch(&owner, "boxed type"))
            })
        }
    }
}

pub fn resolve_serializer(ty: &DeclaredType, ctx: ResolveContext<'_>) -> Serializer {
    trace!(
        owner = ctx.owner,
        attribute = ctx.attribute,
        ty = %ty.describe(),
        "resolving serializer"
    );
    let owner = ctx.owner.to_string();

    match ty {
        DeclaredType::Primitive(primitive) => {
            let primitive = *primitive;
            serializer(move |_, value| {
                primitive
                    .encode(value)
                    .ok_or_else(|| value_mismatch(&owner, primitive.name()))
            })
        }
        DeclaredType::Object(object) => {
            let cell = ModelCell::new(*object);
            serializer(move |registry, value| {
                let model = cell.get(registry)?;
                serialize_model(registry, &model, value).map(Value::Object)
            })
        }
        DeclaredType::Enum(enumeration) => {
            let cell = EnumCell::new(*enumeration);
            serializer(move |registry, value| {
                let entry = cell.get(registry)?;
                entry
                    .member_name(value)
                    .map(|name| Value::String(name.to_string()))
                    .ok_or_else(|| JsonModelError::shape(entry.name(), "value is not a declared member"))
            })
        }
        DeclaredType::List(list) => {
            let element = resolve_serializer(&list.element_type(), ctx);
            let list = list.clone();
            serializer(move |registry, value| {
                let items = list
                    .items(value)
                    .ok_or_else(|| value_mismatch(&owner, "list type"))?;
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| element(registry, item).map_err(|err| err.at_index(index)))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            })
        }
        DeclaredType::Map(map) => {
            let element = resolve_serializer(&map.value_type(), ctx);
            let map = map.clone();
            serializer(move |registry, value| {
                let entries = map
                    .entries(value)
                    .ok_or_else(|| value_mismatch(&owner, "map type"))?;
                let mut out = Map::new();
                for (key, item) in entries {
                    let item = element(registry, item).map_err(|err| err.at_key(key))?;
                    out.insert(key.to_string(), item);
                }
                Ok(Value::Object(out))
            })
        }
        DeclaredType::Nullable(nullable) => {
            let inner = resolve_serializer(nullable.inner(), ctx);
            let nullable = nullable.clone();
            serializer(move |registry, value| match nullable.unwrap(value) {
                Some(Some(item)) => inner(registry, item),
                Some(None) => Ok(Value::Null),
                None => Err(value_mismatch(&owner, "optional type")),
            })
        }
        DeclaredType::Boxed(boxed) => {
            let inner = resolve_serializer(boxed.inner(), ctx);
            let boxed = boxed.clone();
            serializer(move |registry, value| {
                let item = boxed
                    .unwrap(value)
                    .ok_or_else(|| value_mismatch(&owner, "boxed type"))?;
                inner(registry, item)
            })
        }
    }
}
