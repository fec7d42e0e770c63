//! Declarations: the constructor-like parameter lists the model builder consumes.
//!
//! A declaration is either emitted by `#[derive(JsonModel)]` / `#[derive(JsonEnum)]`
//! or written by hand with the builders below and handed to
//! [`Registry::declare`](crate::Registry::declare).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::JsonType;
use crate::error::{JsonModelError, Result};
use crate::metadata::TypeMetadata;
use crate::types::{DeclaredType, Instance, TypeKey};

pub type Constructor = Arc<dyn Fn(Arguments) -> Result<Instance> + Send + Sync>;

/// Reads a field off an instance by its declared name.
pub type FieldAccessor = for<'a> fn(&'a dyn Any, &str) -> Option<&'a dyn Any>;

pub type DefaultProvider = Arc<dyn Fn() -> Instance + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Named,
    PositionalOnly,
    Variadic,
}

#[derive(Debug, Clone)]
pub enum ParamType {
    Declared(DeclaredType),
    /// A list with no element type; needs a `TypeMetadata::list_element` entry.
    BareList,
    Untyped,
}

#[derive(Clone)]
pub struct ParamDecl {
    name: String,
    ty: ParamType,
    kind: ParamKind,
    default: Option<DefaultProvider>,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self::with_type(name, ParamType::Declared(ty))
    }

    pub fn of<T: JsonType>(name: impl Into<String>) -> Self {
        Self::new(name, T::declared_type())
    }

    pub fn bare_list(name: impl Into<String>) -> Self {
        Self::with_type(name, ParamType::BareList)
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self::with_type(name, ParamType::Untyped)
    }

    fn with_type(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: ParamKind::Named,
            default: None,
        }
    }

    pub fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the parameter optional; `default` supplies its value when the key is absent.
    pub fn default_with<T, F>(mut self, default: F) -> Self
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(move || Box::new(default()) as Instance));
        self
    }

    pub fn default_value<T: Any + Send + Sync + Clone>(self, value: T) -> Self {
        self.default_with(move || value.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_type(&self) -> &ParamType {
        &self.ty
    }

    pub fn param_kind(&self) -> ParamKind {
        self.kind
    }

    pub fn default_provider(&self) -> Option<&DefaultProvider> {
        self.default.as_ref()
    }
}

impl fmt::Debug for ParamDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamDecl")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("kind", &self.kind)
            .field("optional", &self.default.is_some())
            .finish()
    }
}

/// Parsed or defaulted values handed to a constructor, one slot per parameter
/// in declaration order.
pub struct Arguments {
    type_name: String,
    slots: std::vec::IntoIter<(String, Instance)>,
}

impl Arguments {
    pub(crate) fn new(type_name: impl Into<String>, slots: Vec<(String, Instance)>) -> Self {
        Self {
            type_name: type_name.into(),
            slots: slots.into_iter(),
        }
    }

    /// Take the next positional value.
    pub fn take<T: Any>(&mut self) -> Result<T> {
        let Some((name, value)) = self.slots.next() else {
            return Err(JsonModelError::construct(
                &self.type_name,
                "constructor takes more arguments than the type declares",
            ));
        };
        value.downcast::<T>().map(|value| *value).map_err(|_| {
            JsonModelError::construct(
                &self.type_name,
                format!(
                    "argument '{name}' does not hold a {}",
                    std::any::type_name::<T>()
                ),
            )
            .with_field(name.clone(), name)
        })
    }

    pub fn remaining(&self) -> usize {
        self.slots.len()
    }

    /// Every declared parameter must have been taken by the constructor.
    pub(crate) fn finish(&self) -> Result<()> {
        let unread: Vec<&str> = self.slots.as_slice().iter().map(|(name, _)| name.as_str()).collect();
        if unread.is_empty() {
            return Ok(());
        }
        Err(JsonModelError::construct(
            &self.type_name,
            format!("constructor did not take arguments: {}", unread.join(", ")),
        ))
    }
}

#[derive(Clone)]
pub struct TypeDeclaration {
    key: TypeKey,
    params: Vec<ParamDecl>,
    constructor: Option<Constructor>,
    accessor: Option<FieldAccessor>,
    metadata: TypeMetadata,
}

impl TypeDeclaration {
    pub fn new<T: Any + Send>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            params: Vec::new(),
            constructor: None,
            accessor: None,
            metadata: TypeMetadata::default(),
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.key = self.key.with_name(name);
        self
    }

    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    /// Build an instance from the slots in `Arguments`. `T` must be the declared type.
    pub fn constructor<T, F>(mut self, constructor: F) -> Self
    where
        T: Any + Send,
        F: Fn(&mut Arguments) -> Result<T> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move |mut args: Arguments| {
            let value = constructor(&mut args)?;
            args.finish()?;
            Ok(Box::new(value) as Instance)
        }));
        self
    }

    pub fn accessor(mut self, accessor: FieldAccessor) -> Self {
        self.accessor = Some(accessor);
        self
    }

    pub fn metadata(mut self, metadata: TypeMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    pub fn params(&self) -> &[ParamDecl] {
        &self.params
    }

    pub fn constructor_fn(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    pub fn accessor_fn(&self) -> Option<FieldAccessor> {
        self.accessor
    }

    pub fn type_metadata(&self) -> &TypeMetadata {
        &self.metadata
    }
}

impl fmt::Debug for TypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDeclaration")
            .field("key", &self.key)
            .field("params", &self.params)
            .field("constructor", &self.constructor.is_some())
            .field("accessor", &self.accessor.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[derive(Clone)]
pub struct EnumMember {
    name: String,
    make: Arc<dyn Fn() -> Instance + Send + Sync>,
    matches: Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>,
}

impl EnumMember {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn make(&self) -> Instance {
        (self.make)()
    }

    pub(crate) fn matches(&self, value: &dyn Any) -> bool {
        (self.matches)(value)
    }
}

#[derive(Clone)]
pub struct EnumDeclaration {
    key: TypeKey,
    members: Vec<EnumMember>,
    metadata: TypeMetadata,
}

impl EnumDeclaration {
    pub fn new<T: Any + Send>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            members: Vec::new(),
            metadata: TypeMetadata::default(),
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.key = self.key.with_name(name);
        self
    }

    pub fn member<T>(self, name: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync + Clone + PartialEq,
    {
        let probe = value.clone();
        self.member_with(name, move || value.clone(), move |candidate: &T| *candidate == probe)
    }

    /// Add a member without requiring `Clone` or `PartialEq` on the enum.
    pub fn member_with<T, M, P>(mut self, name: impl Into<String>, make: M, is: P) -> Self
    where
        T: Any + Send,
        M: Fn() -> T + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.members.push(EnumMember {
            name: name.into(),
            make: Arc::new(move || Box::new(make()) as Instance),
            matches: Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().is_some_and(&is)),
        });
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.metadata = self.metadata.case_insensitive();
        self
    }

    pub fn metadata(mut self, metadata: TypeMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    pub fn type_metadata(&self) -> &TypeMetadata {
        &self.metadata
    }
}

impl fmt::Debug for EnumDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.members.iter().map(EnumMember::name).collect();
        f.debug_struct("EnumDeclaration")
            .field("key", &self.key)
            .field("members", &names)
            .field("case_insensitive", &self.metadata.is_case_insensitive())
            .finish()
    }
}
