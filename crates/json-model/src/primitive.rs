use std::any::Any;

use serde_json::Value;

/// Scalar codec between a JSON value and a Rust value.
pub trait Primitive: Any + Send + Sized {
    const TYPE_NAME: &'static str;
    fn decode(value: &Value) -> Option<Self>;
    fn encode(&self) -> Value;
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Primitive for String {
    const TYPE_NAME: &'static str = "string";

    fn decode(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn encode(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Primitive for bool {
    const TYPE_NAME: &'static str = "bool";

    fn decode(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn encode(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! signed_primitive {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const TYPE_NAME: &'static str = $name;

                fn decode(value: &Value) -> Option<Self> {
                    value.as_i64().and_then(|n| <$ty>::try_from(n).ok())
                }

                fn encode(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

macro_rules! unsigned_primitive {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const TYPE_NAME: &'static str = $name;

                fn decode(value: &Value) -> Option<Self> {
                    value.as_u64().and_then(|n| <$ty>::try_from(n).ok())
                }

                fn encode(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

signed_primitive!(i8 => "i8", i16 => "i16", i32 => "i32", i64 => "i64", isize => "isize");
unsigned_primitive!(u8 => "u8", u16 => "u16", u32 => "u32", u64 => "u64", usize => "usize");

impl Primitive for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn decode(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    // Non-finite floats have no JSON form and encode as null.
    fn encode(&self) -> Value {
        Value::from(*self)
    }
}

impl Primitive for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn decode(value: &Value) -> Option<Self> {
        // JSON numbers are finite; one that overflows f32 has no faithful value.
        value.as_f64().map(|n| n as f32).filter(|n| n.is_finite())
    }

    fn encode(&self) -> Value {
        Value::from(*self)
    }
}

/// Passthrough for untyped JSON payloads.
impl Primitive for Value {
    const TYPE_NAME: &'static str = "json";

    fn decode(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn encode(&self) -> Value {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_reject_out_of_range() {
        assert_eq!(u8::decode(&json!(255)), Some(255));
        assert_eq!(u8::decode(&json!(256)), None);
        assert_eq!(i32::decode(&json!(-5)), Some(-5));
        assert_eq!(u32::decode(&json!(-5)), None);
        assert_eq!(i64::decode(&json!(1.5)), None);
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::decode(&json!(3)), Some(3.0));
        assert_eq!(f64::NAN.encode(), Value::Null);
    }

    #[test]
    fn f32_rejects_numbers_beyond_its_range() {
        assert_eq!(f32::decode(&json!(1e300)), None);
        assert_eq!(f32::decode(&json!(-1e300)), None);
        assert_eq!(f32::decode(&json!(1.5)), Some(1.5));
    }

    #[test]
    fn strings_and_bools_are_strict() {
        assert_eq!(String::decode(&json!(1)), None);
        assert_eq!(bool::decode(&json!("true")), None);
        assert_eq!(bool::decode(&json!(true)), Some(true));
    }
}
