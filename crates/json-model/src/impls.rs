use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;

use crate::JsonType;
use crate::types::{BoxedType, DeclaredType, ElementType, ListType, MapType, NullableType};

macro_rules! primitive_json_type {
    ($($ty:ty),* $(,)?) => {
        $(
            impl JsonType for $ty {
                fn declared_type() -> DeclaredType {
                    DeclaredType::primitive::<$ty>()
                }
            }
        )*
    };
}

primitive_json_type!(
    String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, Value,
);

// Element types are looked up lazily so `Vec<Self>` inside `Self` resolves.
impl<T: JsonType> JsonType for Vec<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::List(ListType::lazy::<T>(T::declared_type))
    }
}

impl<T: JsonType> JsonType for Option<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::Nullable(NullableType::of::<T>(T::declared_type()))
    }
}

impl<T: JsonType> JsonType for Box<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::Boxed(BoxedType::of::<T>(T::declared_type()))
    }
}

impl<T: JsonType> JsonType for BTreeMap<String, T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::Map(MapType::btree::<T>(ElementType::Lazy(Arc::new(T::declared_type))))
    }
}

impl<T: JsonType> JsonType for HashMap<String, T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::Map(MapType::hash::<T>(ElementType::Lazy(Arc::new(T::declared_type))))
    }
}
