//! Type-level descriptions of everything a model attribute can hold.
//!
//! A [`DeclaredType`] is the semantic type of one constructor parameter. Values
//! travel between the resolver and the constructor as type-erased [`Instance`]s;
//! the container descriptors carry the monomorphized functions that rebuild
//! the concrete Rust container (`Vec<E>`, `Option<T>`, ...) from erased parts.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde_json::Value;

use crate::declare::{EnumDeclaration, TypeDeclaration};
use crate::primitive::Primitive;
use crate::{JsonEnum, JsonModel};

/// A type-erased value produced by a parser or consumed by a constructor.
pub type Instance = Box<dyn Any + Send>;

/// Identity of a declared type. Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    if full.contains('<') {
        full
    } else {
        full.rsplit("::").next().unwrap_or(full)
    }
}

#[derive(Clone, Debug)]
pub enum DeclaredType {
    Primitive(PrimitiveType),
    Object(ObjectRef),
    List(ListType),
    Enum(EnumRef),
    Map(MapType),
    Nullable(NullableType),
    Boxed(BoxedType),
}

impl DeclaredType {
    pub fn primitive<T: Primitive>() -> Self {
        Self::Primitive(PrimitiveType::of::<T>())
    }

    /// An object type that declares itself on first use.
    pub fn object<T: JsonModel>() -> Self {
        Self::Object(ObjectRef {
            key: TypeKey::of::<T>(),
            declaration: Some(T::declaration),
        })
    }

    /// An object type that must be declared on the registry before it is parsed.
    pub fn declared_object<T: Any + Send>() -> Self {
        Self::Object(ObjectRef {
            key: TypeKey::of::<T>(),
            declaration: None,
        })
    }

    pub fn enumeration<T: JsonEnum>() -> Self {
        Self::Enum(EnumRef {
            key: TypeKey::of::<T>(),
            declaration: Some(T::declaration),
        })
    }

    pub fn declared_enum<T: Any + Send>() -> Self {
        Self::Enum(EnumRef {
            key: TypeKey::of::<T>(),
            declaration: None,
        })
    }

    pub fn list<E: Any + Send>(element: DeclaredType) -> Self {
        Self::List(ListType::of::<E>(element))
    }

    /// Short human description used in logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Primitive(p) => p.name().to_string(),
            Self::Object(o) => o.key.name().to_string(),
            Self::Enum(e) => e.key.name().to_string(),
            Self::List(l) => format!("list<{}>", l.element.describe()),
            Self::Map(m) => format!("map<{}>", m.value.describe()),
            Self::Nullable(n) => format!("nullable<{}>", n.inner.describe()),
            Self::Boxed(b) => b.inner.describe(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct PrimitiveType {
    name: &'static str,
    decode: fn(&Value) -> Option<Instance>,
    encode: fn(&dyn Any) -> Option<Value>,
}

fn decode_as<T: Primitive>(value: &Value) -> Option<Instance> {
    T::decode(value).map(|v| Box::new(v) as Instance)
}

fn encode_as<T: Primitive>(value: &dyn Any) -> Option<Value> {
    value.downcast_ref::<T>().map(T::encode)
}

impl PrimitiveType {
    pub fn of<T: Primitive>() -> Self {
        Self {
            name: T::TYPE_NAME,
            decode: decode_as::<T>,
            encode: encode_as::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn decode(&self, value: &Value) -> Option<Instance> {
        (self.decode)(value)
    }

    pub fn encode(&self, value: &dyn Any) -> Option<Value> {
        (self.encode)(value)
    }
}

impl fmt::Debug for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primitive({})", self.name)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ObjectRef {
    key: TypeKey,
    declaration: Option<fn() -> TypeDeclaration>,
}

impl ObjectRef {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn declaration(&self) -> Option<fn() -> TypeDeclaration> {
        self.declaration
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EnumRef {
    key: TypeKey,
    declaration: Option<fn() -> EnumDeclaration>,
}

impl EnumRef {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn declaration(&self) -> Option<fn() -> EnumDeclaration> {
        self.declaration
    }
}

/// Element type of a container: either known up front or produced on demand.
#[derive(Clone)]
pub enum ElementType {
    Known(Box<DeclaredType>),
    Lazy(Arc<dyn Fn() -> DeclaredType + Send + Sync>),
}

impl ElementType {
    /// Read the element type. A lazy provider runs on every read and is never cached.
    pub fn get(&self) -> DeclaredType {
        match self {
            Self::Known(ty) => (**ty).clone(),
            Self::Lazy(provider) => provider(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    fn describe(&self) -> String {
        match self {
            Self::Known(ty) => ty.describe(),
            Self::Lazy(_) => "..".to_string(),
        }
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(ty) => f.debug_tuple("Known").field(ty).finish(),
            Self::Lazy(_) => write!(f, "Lazy(..)"),
        }
    }
}

/// Sequence of `E`, backed by `Vec<E>`.
#[derive(Clone, Debug)]
pub struct ListType {
    element: ElementType,
    collect: fn(Vec<Instance>) -> Option<Instance>,
    items: fn(&dyn Any) -> Option<Vec<&dyn Any>>,
}

fn collect_vec<E: Any + Send>(items: Vec<Instance>) -> Option<Instance> {
    let items = items
        .into_iter()
        .map(|item| item.downcast::<E>().ok().map(|item| *item))
        .collect::<Option<Vec<E>>>()?;
    Some(Box::new(items) as Instance)
}

fn vec_items<E: Any>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    let items = value.downcast_ref::<Vec<E>>()?;
    Some(items.iter().map(|item| item as &dyn Any).collect())
}

impl ListType {
    pub fn of<E: Any + Send>(element: DeclaredType) -> Self {
        Self {
            element: ElementType::Known(Box::new(element)),
            collect: collect_vec::<E>,
            items: vec_items::<E>,
        }
    }

    /// A list whose element type is looked up through `provider` whenever it is read.
    pub fn lazy<E: Any + Send>(provider: impl Fn() -> DeclaredType + Send + Sync + 'static) -> Self {
        Self {
            element: ElementType::Lazy(Arc::new(provider)),
            collect: collect_vec::<E>,
            items: vec_items::<E>,
        }
    }

    pub fn element_type(&self) -> DeclaredType {
        self.element.get()
    }

    pub fn is_lazy(&self) -> bool {
        self.element.is_lazy()
    }

    pub(crate) fn collect(&self, items: Vec<Instance>) -> Option<Instance> {
        (self.collect)(items)
    }

    pub(crate) fn items<'a>(&self, value: &'a dyn Any) -> Option<Vec<&'a dyn Any>> {
        (self.items)(value)
    }
}

/// JSON object with arbitrary string keys, backed by `BTreeMap` or `HashMap`.
#[derive(Clone, Debug)]
pub struct MapType {
    value: ElementType,
    collect: fn(Vec<(String, Instance)>) -> Option<Instance>,
    entries: fn(&dyn Any) -> Option<Vec<(&str, &dyn Any)>>,
}

fn collect_btree<V: Any + Send>(entries: Vec<(String, Instance)>) -> Option<Instance> {
    let map = entries
        .into_iter()
        .map(|(key, value)| value.downcast::<V>().ok().map(|value| (key, *value)))
        .collect::<Option<BTreeMap<String, V>>>()?;
    Some(Box::new(map) as Instance)
}

fn btree_entries<V: Any>(value: &dyn Any) -> Option<Vec<(&str, &dyn Any)>> {
    let map = value.downcast_ref::<BTreeMap<String, V>>()?;
    Some(map.iter().map(|(k, v)| (k.as_str(), v as &dyn Any)).collect())
}

fn collect_hash<V: Any + Send>(entries: Vec<(String, Instance)>) -> Option<Instance> {
    let map = entries
        .into_iter()
        .map(|(key, value)| value.downcast::<V>().ok().map(|value| (key, *value)))
        .collect::<Option<HashMap<String, V>>>()?;
    Some(Box::new(map) as Instance)
}

// Sorted so output does not depend on hasher state.
fn hash_entries<V: Any>(value: &dyn Any) -> Option<Vec<(&str, &dyn Any)>> {
    let map = value.downcast_ref::<HashMap<String, V>>()?;
    let mut entries: Vec<(&str, &dyn Any)> =
        map.iter().map(|(k, v)| (k.as_str(), v as &dyn Any)).collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    Some(entries)
}

impl MapType {
    pub fn btree<V: Any + Send>(value: ElementType) -> Self {
        Self {
            value,
            collect: collect_btree::<V>,
            entries: btree_entries::<V>,
        }
    }

    pub fn hash<V: Any + Send>(value: ElementType) -> Self {
        Self {
            value,
            collect: collect_hash::<V>,
            entries: hash_entries::<V>,
        }
    }

    pub fn value_type(&self) -> DeclaredType {
        self.value.get()
    }

    pub(crate) fn collect(&self, entries: Vec<(String, Instance)>) -> Option<Instance> {
        (self.collect)(entries)
    }

    pub(crate) fn entries<'a>(&self, value: &'a dyn Any) -> Option<Vec<(&'a str, &'a dyn Any)>> {
        (self.entries)(value)
    }
}

/// `Option<T>`: JSON `null` maps to `None`.
#[derive(Clone, Debug)]
pub struct NullableType {
    inner: Box<DeclaredType>,
    wrap: fn(Option<Instance>) -> Option<Instance>,
    unwrap: fn(&dyn Any) -> Option<Option<&dyn Any>>,
}

fn wrap_option<T: Any + Send>(value: Option<Instance>) -> Option<Instance> {
    match value {
        None => Some(Box::new(None::<T>) as Instance),
        Some(value) => value
            .downcast::<T>()
            .ok()
            .map(|value| Box::new(Some(*value)) as Instance),
    }
}

fn unwrap_option<T: Any>(value: &dyn Any) -> Option<Option<&dyn Any>> {
    value
        .downcast_ref::<Option<T>>()
        .map(|value| value.as_ref().map(|inner| inner as &dyn Any))
}

impl NullableType {
    pub fn of<T: Any + Send>(inner: DeclaredType) -> Self {
        Self {
            inner: Box::new(inner),
            wrap: wrap_option::<T>,
            unwrap: unwrap_option::<T>,
        }
    }

    pub fn inner(&self) -> &DeclaredType {
        &self.inner
    }

    pub(crate) fn wrap(&self, value: Option<Instance>) -> Option<Instance> {
        (self.wrap)(value)
    }

    pub(crate) fn unwrap<'a>(&self, value: &'a dyn Any) -> Option<Option<&'a dyn Any>> {
        (self.unwrap)(value)
    }
}

/// `Box<T>`: transparent on the wire.
#[derive(Clone, Debug)]
pub struct BoxedType {
    inner: Box<DeclaredType>,
    wrap: fn(Instance) -> Option<Instance>,
    unwrap: fn(&dyn Any) -> Option<&dyn Any>,
}

fn wrap_box<T: Any + Send>(value: Instance) -> Option<Instance> {
    value.downcast::<T>().ok().map(|value| Box::new(value) as Instance)
}

fn unwrap_box<T: Any>(value: &dyn Any) -> Option<&dyn Any> {
    value.downcast_ref::<Box<T>>().map(|value| &**value as &dyn Any)
}

impl BoxedType {
    pub fn of<T: Any + Send>(inner: DeclaredType) -> Self {
        Self {
            inner: Box::new(inner),
            wrap: wrap_box::<T>,
            unwrap: unwrap_box::<T>,
        }
    }

    pub fn inner(&self) -> &DeclaredType {
        &self.inner
    }

    pub(crate) fn wrap(&self, value: Instance) -> Option<Instance> {
        (self.wrap)(value)
    }

    pub(crate) fn unwrap<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.unwrap)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_collects_into_vec() {
        let list = ListType::of::<i64>(DeclaredType::primitive::<i64>());
        let items: Vec<Instance> = vec![Box::new(1i64), Box::new(2i64)];
        let collected = list.collect(items).expect("collect");
        assert_eq!(*collected.downcast::<Vec<i64>>().expect("vec"), vec![1, 2]);
    }

    #[test]
    fn list_collect_rejects_foreign_elements() {
        let list = ListType::of::<i64>(DeclaredType::primitive::<i64>());
        let items: Vec<Instance> = vec![Box::new("x".to_string())];
        assert!(list.collect(items).is_none());
    }

    #[test]
    fn lazy_provider_runs_on_every_read() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static READS: AtomicUsize = AtomicUsize::new(0);

        let list = ListType::lazy::<String>(|| {
            READS.fetch_add(1, Ordering::SeqCst);
            DeclaredType::primitive::<String>()
        });
        assert_eq!(READS.load(Ordering::SeqCst), 0);
        list.element_type();
        list.element_type();
        assert_eq!(READS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn option_round_trips_through_erasure() {
        let nullable = NullableType::of::<String>(DeclaredType::primitive::<String>());
        let none = nullable.wrap(None).expect("wrap");
        assert_eq!(*none.downcast::<Option<String>>().expect("option"), None);

        let value: Option<String> = Some("a".into());
        let inner = nullable.unwrap(&value).expect("option").expect("some");
        assert_eq!(inner.downcast_ref::<String>().map(String::as_str), Some("a"));
    }

    #[test]
    fn type_keys_compare_by_identity() {
        assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>().with_name("Text"));
        assert_ne!(TypeKey::of::<String>(), TypeKey::of::<i64>());
        assert_eq!(TypeKey::of::<String>().name(), "String");
    }
}
