//! Model builder: turns a [`TypeDeclaration`] into an immutable [`Model`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::debug;

use crate::config::{CodecConfig, EffectiveConfig, resolve_type};
use crate::declare::{Constructor, DefaultProvider, FieldAccessor, ParamKind, ParamType, TypeDeclaration};
use crate::error::{JsonModelError, Result};
use crate::registry::Registry;
use crate::resolve::{ModelCell, Parser, ResolveContext, Serializer, resolve_parser, resolve_serializer};
use crate::types::{DeclaredType, Instance, TypeKey};

/// How one constructor parameter maps to one JSON key.
#[derive(Clone)]
pub struct AttributeDescriptor {
    source_name: String,
    wire_name: String,
    declared_type: DeclaredType,
    default: Option<DefaultProvider>,
    inline: Option<ModelCell>,
    parser: Parser,
    serializer: Serializer,
}

impl AttributeDescriptor {
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_inline(&self) -> bool {
        self.inline.is_some()
    }

    pub fn default_value(&self) -> Option<Instance> {
        self.default.as_ref().map(|provider| provider())
    }

    pub fn parse(&self, registry: &Registry, value: &Value) -> Result<Instance> {
        (self.parser)(registry, value)
    }

    pub fn serialize(&self, registry: &Registry, value: &dyn Any) -> Result<Value> {
        (self.serializer)(registry, value)
    }

    pub(crate) fn inline_model(&self) -> Option<&ModelCell> {
        self.inline.as_ref()
    }
}

impl fmt::Debug for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDescriptor")
            .field("source_name", &self.source_name)
            .field("wire_name", &self.wire_name)
            .field("declared_type", &self.declared_type.describe())
            .field("optional", &self.is_optional())
            .field("inline", &self.is_inline())
            .finish()
    }
}

pub struct Model {
    key: TypeKey,
    attributes: Vec<AttributeDescriptor>,
    constructor: Constructor,
    accessor: Option<FieldAccessor>,
    config: EffectiveConfig,
    claimed: OnceCell<Vec<String>>,
}

impl Model {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn type_name(&self) -> &'static str {
        self.key.name()
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    pub fn attribute(&self, source_name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.source_name == source_name)
    }

    pub fn attribute_by_wire_name(&self, wire_name: &str) -> Option<&AttributeDescriptor> {
        self.attributes
            .iter()
            .find(|a| !a.is_inline() && a.wire_name == wire_name)
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    pub(crate) fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    pub(crate) fn accessor(&self) -> Option<FieldAccessor> {
        self.accessor
    }

    /// Walk the inline attributes, rejecting inline cycles and keys claimed twice.
    /// Models without inline attributes were fully checked when they were built.
    pub(crate) fn check_inline(&self, registry: &Registry) -> Result<()> {
        if self.attributes.iter().any(AttributeDescriptor::is_inline) {
            self.claimed_keys(registry)?;
        }
        Ok(())
    }

    /// Every JSON key this model reads, including keys read through inline attributes.
    pub fn claimed_keys(&self, registry: &Registry) -> Result<&[String]> {
        self.claimed
            .get_or_try_init(|| {
                let mut keys = Vec::new();
                collect_claimed(registry, self, &mut vec![self.key], &mut keys)?;
                Ok::<_, JsonModelError>(keys)
            })
            .map(Vec::as_slice)
    }
}

fn collect_claimed(
    registry: &Registry,
    model: &Model,
    stack: &mut Vec<TypeKey>,
    keys: &mut Vec<String>,
) -> Result<()> {
    for attribute in &model.attributes {
        let Some(inline) = attribute.inline_model() else {
            if keys.contains(&attribute.wire_name) {
                return Err(JsonModelError::shape(
                    model.type_name(),
                    format!(
                        "json key '{}' of attribute '{}' is claimed by more than one attribute",
                        attribute.wire_name, attribute.source_name
                    ),
                ));
            }
            keys.push(attribute.wire_name.clone());
            continue;
        };
        if stack.contains(&inline.key()) {
            return Err(JsonModelError::shape(
                model.type_name(),
                format!(
                    "inline attribute '{}' inlines {} into itself",
                    attribute.source_name,
                    inline.key().name()
                ),
            ));
        }
        let sub = inline.get(registry)?;
        stack.push(sub.key);
        collect_claimed(registry, &sub, stack, keys)?;
        stack.pop();
    }
    Ok(())
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("key", &self.key)
            .field("attributes", &self.attributes)
            .field("serializable", &self.accessor.is_some())
            .field("config", &self.config)
            .finish()
    }
}

fn kind_name(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::Named => "named",
        ParamKind::PositionalOnly => "positional-only",
        ParamKind::Variadic => "variadic",
    }
}

/// Build the model for one declaration.
///
/// Nested object and enum types are not visited here; their parsers look the
/// type up on first use. That keeps building cheap and lets declarations refer
/// to types that are declared later.
pub fn build_model(config: &CodecConfig, declaration: &TypeDeclaration) -> Result<Model> {
    let type_name = declaration.name();
    let metadata = declaration.type_metadata();
    let Some(constructor) = declaration.constructor_fn().cloned() else {
        return Err(JsonModelError::shape(type_name, "type declares no usable constructor"));
    };
    let effective = resolve_type(config, metadata.overrides());

    let mut attributes = Vec::with_capacity(declaration.params().len());
    let mut wire_names: HashMap<String, String> = HashMap::new();

    for param in declaration.params() {
        let source = param.name();
        if param.param_kind() != ParamKind::Named {
            return Err(JsonModelError::shape(
                type_name,
                format!(
                    "parameter '{source}' is {}; only named parameters are supported",
                    kind_name(param.param_kind())
                ),
            ));
        }

        let declared_type = match (param.param_type(), metadata.list_element_for(source)) {
            (ParamType::Untyped, _) => {
                return Err(JsonModelError::shape(
                    type_name,
                    format!("parameter '{source}' has no declared type"),
                ));
            }
            (ParamType::BareList, None) => {
                return Err(JsonModelError::shape(
                    type_name,
                    format!("list parameter '{source}' declares no element type"),
                ));
            }
            (ParamType::BareList | ParamType::Declared(DeclaredType::List(_)), Some(list)) => {
                DeclaredType::List(list.clone())
            }
            (ParamType::Declared(ty), Some(_)) => {
                return Err(JsonModelError::shape(
                    type_name,
                    format!(
                        "parameter '{source}' has a list element override but is a {}",
                        ty.describe()
                    ),
                ));
            }
            (ParamType::Declared(ty), None) => ty.clone(),
        };

        let wire_name = match metadata.renamed(source) {
            Some(renamed) => renamed.to_string(),
            None => effective.naming.apply(source),
        };

        let inline = if metadata.is_inline(source) {
            match &declared_type {
                DeclaredType::Object(object) => Some(ModelCell::new(*object)),
                other => {
                    return Err(JsonModelError::shape(
                        type_name,
                        format!(
                            "inline parameter '{source}' must be an object type, found {}",
                            other.describe()
                        ),
                    ));
                }
            }
        } else {
            if let Some(previous) = wire_names.insert(wire_name.clone(), source.to_string()) {
                return Err(JsonModelError::shape(
                    type_name,
                    format!("parameters '{previous}' and '{source}' both map to json key '{wire_name}'"),
                ));
            }
            None
        };

        let ctx = ResolveContext::new(type_name, source);
        attributes.push(AttributeDescriptor {
            source_name: source.to_string(),
            parser: resolve_parser(&declared_type, ctx),
            serializer: resolve_serializer(&declared_type, ctx),
            wire_name,
            declared_type,
            default: param.default_provider().cloned(),
            inline,
        });
    }

    debug!(
        type_name,
        attributes = attributes.len(),
        naming = ?effective.naming,
        "built model"
    );

    Ok(Model {
        key: declaration.key(),
        attributes,
        constructor,
        accessor: declaration.accessor_fn(),
        config: effective,
        claimed: OnceCell::new(),
    })
}
