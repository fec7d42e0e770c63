#![allow(clippy::result_large_err)]

//! Declarative JSON (de)serialization.
//!
//! A type is described once, as a constructor-like parameter list with a
//! semantic type per parameter. From that declaration the registry builds a
//! [`Model`] (wire names, required/optional policy, per-attribute parser and
//! serializer) and caches it for the life of the registry.
//!
//! ```ignore
//! #[derive(JsonModel)]
//! #[json(rename_all = "camelCase")]
//! struct Order {
//!     order_id: String,
//!     lines: Vec<Line>,
//!     note: Option<String>,
//! }
//!
//! let order: Order = json_model::from_str(r#"{"orderId": "a1", "lines": []}"#)?;
//! ```

pub mod config;
pub mod declare;
pub mod enums;
pub mod error;
pub mod metadata;
pub mod model;
pub mod naming;
pub mod path;
pub mod primitive;
pub mod registry;
pub mod resolve;
pub mod types;
mod impls;
mod parse;
mod serialize;

use std::sync::Arc;

use serde_json::Value;

pub use config::{CodecConfig, EffectiveConfig, OmitPolicy, TypeOverrides, resolve_type};
pub use declare::{
    Arguments, EnumDeclaration, EnumMember, ParamDecl, ParamKind, ParamType, TypeDeclaration,
};
pub use error::{ErrorKind, JsonModelError, Result, suggest_similar};
pub use metadata::TypeMetadata;
pub use model::{AttributeDescriptor, Model, build_model};
pub use naming::NamingRule;
pub use path::{JsonPath, PathSegment};
pub use primitive::Primitive;
pub use registry::Registry;
pub use resolve::{Parser, ResolveContext, Serializer, resolve_parser, resolve_serializer};
pub use types::{
    BoxedType, DeclaredType, ElementType, Instance, ListType, MapType, NullableType, TypeKey,
};

/// A Rust type with a place in the JSON type system.
pub trait JsonType: std::any::Any + Send + Sized {
    fn declared_type() -> DeclaredType;
}

/// An object type that supplies its own declaration; declared on first use.
pub trait JsonModel: JsonType {
    fn declaration() -> TypeDeclaration;
}

/// An enum type that supplies its own member list; declared on first use.
pub trait JsonEnum: JsonType {
    fn declaration() -> EnumDeclaration;
}

pub fn parse<T: JsonType>(value: &Value) -> Result<T> {
    Registry::global().parse(value)
}

pub fn serialize<T: JsonType>(value: &T) -> Result<Value> {
    Registry::global().serialize(value)
}

pub fn from_str<T: JsonType>(text: &str) -> Result<T> {
    Registry::global().from_str(text)
}

pub fn to_string<T: JsonType>(value: &T) -> Result<String> {
    Registry::global().to_string(value)
}

pub fn to_string_pretty<T: JsonType>(value: &T) -> Result<String> {
    Registry::global().to_string_pretty(value)
}

pub fn declare(declaration: TypeDeclaration) -> Result<()> {
    Registry::global().declare(declaration)
}

pub fn declare_enum(declaration: EnumDeclaration) -> Result<()> {
    Registry::global().declare_enum(declaration)
}

pub fn model<T: JsonType>() -> Result<Arc<Model>> {
    Registry::global().model::<T>()
}

// Re-export derive macros so users only need to depend on `json-model`
pub use json_model_derive::{JsonEnum, JsonModel};
