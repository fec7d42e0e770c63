//! Process-wide store of declarations and the models built from them.
//!
//! Entries are inserted once and never replaced. A type's model is built the
//! first time it is needed and published through a `OnceCell`, so threads that
//! race on first use all observe the same `Arc<Model>`.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::JsonType;
use crate::config::CodecConfig;
use crate::declare::{EnumDeclaration, EnumMember, TypeDeclaration};
use crate::enums::EnumTable;
use crate::error::{JsonModelError, Result};
use crate::model::{Model, build_model};
use crate::parse::parse_model;
use crate::resolve::{ResolveContext, resolve_parser, resolve_serializer};
use crate::serialize::serialize_model;
use crate::types::{DeclaredType, EnumRef, Instance, ObjectRef, TypeKey, short_type_name};
use crate::{JsonEnum, JsonModel};

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::default);

struct TypeEntry {
    declaration: TypeDeclaration,
    model: OnceCell<Arc<Model>>,
}

impl TypeEntry {
    fn new(declaration: TypeDeclaration) -> Self {
        Self {
            declaration,
            model: OnceCell::new(),
        }
    }

    // A failed build is not cached; every later use reports the same error.
    fn model(&self, config: &CodecConfig) -> Result<Arc<Model>> {
        self.model
            .get_or_try_init(|| build_model(config, &self.declaration).map(Arc::new))
            .cloned()
    }
}

pub(crate) struct EnumEntry {
    declaration: EnumDeclaration,
    table: EnumTable,
}

impl EnumEntry {
    fn new(declaration: EnumDeclaration) -> Result<Self> {
        let names = declaration
            .members()
            .iter()
            .map(|member| member.name().to_string())
            .collect();
        let table = EnumTable::new(
            declaration.name(),
            names,
            declaration.type_metadata().is_case_insensitive(),
        )?;
        Ok(Self { declaration, table })
    }

    pub(crate) fn name(&self) -> &'static str {
        self.declaration.name()
    }

    pub(crate) fn parse_member(&self, text: &str) -> Result<Instance> {
        self.table
            .lookup(text)
            .and_then(|index| self.declaration.members().get(index))
            .map(EnumMember::make)
            .ok_or_else(|| JsonModelError::unknown_member(self.name(), text, self.table.names()))
    }

    pub(crate) fn member_name(&self, value: &dyn Any) -> Option<&str> {
        self.declaration
            .members()
            .iter()
            .find(|member| member.matches(value))
            .map(EnumMember::name)
    }
}

pub struct Registry {
    config: CodecConfig,
    types: RwLock<HashMap<TypeKey, Arc<TypeEntry>>>,
    enums: RwLock<HashMap<TypeKey, Arc<EnumEntry>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl Registry {
    /// The registry behind the crate-level `parse`/`serialize` functions.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// An isolated registry; its models use `config` for anything a type does not override.
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            types: RwLock::new(HashMap::new()),
            enums: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn declare(&self, declaration: TypeDeclaration) -> Result<()> {
        let key = declaration.key();
        let mut types = self.types.write();
        if types.contains_key(&key) {
            return Err(JsonModelError::already_declared(key.name()));
        }
        debug!(
            type_name = key.name(),
            params = declaration.params().len(),
            "declared type"
        );
        types.insert(key, Arc::new(TypeEntry::new(declaration)));
        Ok(())
    }

    pub fn declare_enum(&self, declaration: EnumDeclaration) -> Result<()> {
        let key = declaration.key();
        let entry = EnumEntry::new(declaration)?;
        let mut enums = self.enums.write();
        if enums.contains_key(&key) {
            return Err(JsonModelError::already_declared(key.name()));
        }
        debug!(
            type_name = key.name(),
            members = entry.table.names().len(),
            case_insensitive = entry.table.is_case_insensitive(),
            "declared enum"
        );
        enums.insert(key, Arc::new(entry));
        Ok(())
    }

    pub fn register<T: JsonModel>(&self) -> Result<()> {
        self.declare(T::declaration())
    }

    pub fn register_enum<T: JsonEnum>(&self) -> Result<()> {
        self.declare_enum(T::declaration())
    }

    pub fn is_declared<T: Any>(&self) -> bool {
        let key = TypeKey::of::<T>();
        self.types.read().contains_key(&key) || self.enums.read().contains_key(&key)
    }

    /// The model for `T`, building it on first use.
    pub fn model<T: JsonType>(&self) -> Result<Arc<Model>> {
        match T::declared_type() {
            DeclaredType::Object(object) => {
                let model = self.model_for(&object)?;
                model.check_inline(self)?;
                Ok(model)
            }
            other => Err(JsonModelError::shape(
                short_type_name::<T>(),
                format!("{} is not an object type", other.describe()),
            )),
        }
    }

    /// The model for an explicitly declared type.
    pub fn model_of(&self, key: TypeKey) -> Result<Arc<Model>> {
        let entry = self.types.read().get(&key).cloned();
        match entry {
            Some(entry) => {
                let model = entry.model(&self.config)?;
                model.check_inline(self)?;
                Ok(model)
            }
            None => Err(JsonModelError::shape(key.name(), "type is not declared")),
        }
    }

    pub(crate) fn model_for(&self, object: &ObjectRef) -> Result<Arc<Model>> {
        let key = object.key();
        let existing = self.types.read().get(&key).cloned();
        let entry = match existing {
            Some(entry) => entry,
            None => {
                let Some(declare) = object.declaration() else {
                    return Err(JsonModelError::shape(key.name(), "type is not declared"));
                };
                let declaration = declare();
                self.types
                    .write()
                    .entry(key)
                    .or_insert_with(|| {
                        debug!(type_name = key.name(), "declared type on first use");
                        Arc::new(TypeEntry::new(declaration))
                    })
                    .clone()
            }
        };
        entry.model(&self.config)
    }

    pub(crate) fn enum_for(&self, enumeration: &EnumRef) -> Result<Arc<EnumEntry>> {
        let key = enumeration.key();
        if let Some(entry) = self.enums.read().get(&key).cloned() {
            return Ok(entry);
        }
        let Some(declare) = enumeration.declaration() else {
            return Err(JsonModelError::shape(key.name(), "enum is not declared"));
        };
        let entry = Arc::new(EnumEntry::new(declare())?);
        let entry = self
            .enums
            .write()
            .entry(key)
            .or_insert_with(|| {
                debug!(type_name = key.name(), "declared enum on first use");
                entry
            })
            .clone();
        Ok(entry)
    }

    /// Parse any supported type, including top-level lists, maps and options.
    pub fn parse<T: JsonType>(&self, value: &Value) -> Result<T> {
        let ty = T::declared_type();
        let name = ty.describe();
        let parser = resolve_parser(&ty, ResolveContext::root(&name));
        downcast(parser(self, value)?, &name)
    }

    pub fn serialize<T: JsonType>(&self, value: &T) -> Result<Value> {
        let ty = T::declared_type();
        let name = ty.describe();
        let serializer = resolve_serializer(&ty, ResolveContext::root(&name));
        serializer(self, value as &dyn Any)
    }

    /// Parse a type that was declared by hand and has no `JsonType` impl.
    pub fn parse_declared<T: Any + Send>(&self, value: &Value) -> Result<T> {
        let model = self.model_of(TypeKey::of::<T>())?;
        downcast(parse_model(self, &model, value)?, model.type_name())
    }

    pub fn serialize_declared<T: Any>(&self, value: &T) -> Result<Value> {
        let model = self.model_of(TypeKey::of::<T>())?;
        serialize_model(self, &model, value).map(Value::Object)
    }

    pub fn from_str<T: JsonType>(&self, text: &str) -> Result<T> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| JsonModelError::json(short_type_name::<T>(), &err))?;
        self.parse(&value)
    }

    pub fn to_string<T: JsonType>(&self, value: &T) -> Result<String> {
        let json = self.serialize(value)?;
        serde_json::to_string(&json).map_err(|err| JsonModelError::json(short_type_name::<T>(), &err))
    }

    pub fn to_string_pretty<T: JsonType>(&self, value: &T) -> Result<String> {
        let json = self.serialize(value)?;
        serde_json::to_string_pretty(&json)
            .map_err(|err| JsonModelError::json(short_type_name::<T>(), &err))
    }
}

fn downcast<T: Any>(instance: Instance, name: &str) -> Result<T> {
    instance.downcast::<T>().map(|value| *value).map_err(|_| {
        JsonModelError::construct(
            name,
            format!("parsed value is not a {}", std::any::type_name::<T>()),
        )
    })
}
