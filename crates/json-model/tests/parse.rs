use json_model::{ErrorKind, JsonEnum, JsonModel, JsonModelError, Registry, CodecConfig};
use serde_json::json;

#[derive(Debug, PartialEq, JsonModel)]
struct Foo {
    bar: String,
}

#[derive(Debug, PartialEq, JsonModel)]
struct Tags {
    bar: Vec<String>,
}

#[derive(Debug, PartialEq, JsonModel)]
struct WithOptional {
    bar: i64,
    baz: Option<String>,
}

#[derive(Debug, PartialEq, JsonEnum)]
#[json(case_insensitive)]
enum Letter {
    #[json(rename = "a")]
    A,
    #[json(rename = "b")]
    B,
}

#[derive(Debug, PartialEq, JsonEnum)]
enum StrictLetter {
    #[json(rename = "a")]
    A,
}

#[derive(Debug, PartialEq, JsonModel)]
struct Holder {
    letter: Letter,
}

#[derive(Debug, PartialEq, JsonModel)]
struct StrictHolder {
    letter: StrictLetter,
}

#[derive(Debug, PartialEq, JsonModel)]
#[json(rename_all = "camelCase")]
struct Customer {
    customer_id: u32,
    address: Address,
    orders: Vec<Order>,
}

#[derive(Debug, PartialEq, JsonModel)]
struct Address {
    city: String,
    zip: Option<String>,
}

#[derive(Debug, PartialEq, JsonModel)]
struct Order {
    sku: String,
    qty: u16,
}

fn expect_err<T: std::fmt::Debug>(result: json_model::Result<T>) -> JsonModelError {
    match result {
        Ok(value) => panic!("expected an error, got {value:?}"),
        Err(err) => err,
    }
}

#[test]
fn parses_simple_object() {
    let foo: Foo = json_model::parse(&json!({"bar": "hello"})).expect("parse");
    assert_eq!(foo, Foo { bar: "hello".into() });
}

#[test]
fn parses_list_of_strings() {
    let tags: Tags = json_model::parse(&json!({"bar": ["a", "b"]})).expect("parse");
    assert_eq!(tags.bar, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn non_array_for_list_field_is_a_shape_error() {
    let err = expect_err(json_model::parse::<Tags>(&json!({"bar": "a"})));
    assert!(err.is_shape(), "got {err}");
    assert_eq!(err.field_name.as_deref(), Some("bar"));
    assert_eq!(err.path.to_string(), "$.bar");
}

#[test]
fn missing_optional_field_takes_default() {
    let parsed: WithOptional = json_model::parse(&json!({"bar": 1})).expect("parse");
    assert_eq!(parsed, WithOptional { bar: 1, baz: None });

    let parsed: WithOptional = json_model::parse(&json!({"bar": 1, "baz": "x"})).expect("parse");
    assert_eq!(parsed.baz.as_deref(), Some("x"));
}

#[test]
fn explicit_null_for_optional_field_is_none() {
    let parsed: WithOptional = json_model::parse(&json!({"bar": 1, "baz": null})).expect("parse");
    assert_eq!(parsed.baz, None);
}

#[test]
fn missing_required_field_names_field_and_type() {
    let err = expect_err(json_model::parse::<WithOptional>(&json!({"baz": "x"})));
    assert!(err.is_missing_field());
    assert_eq!(err.type_name, "WithOptional");
    assert_eq!(err.field_name.as_deref(), Some("bar"));
    assert_eq!(err.wire_key.as_deref(), Some("bar"));
    assert!(err.to_string().contains("required field is missing"));
}

#[test]
fn case_insensitive_enum_accepts_any_case() {
    let holder: Holder = json_model::parse(&json!({"letter": "A"})).expect("parse");
    assert_eq!(holder.letter, Letter::A);
    let holder: Holder = json_model::parse(&json!({"letter": "b"})).expect("parse");
    assert_eq!(holder.letter, Letter::B);
}

#[test]
fn case_sensitive_enum_rejects_other_case() {
    let err = expect_err(json_model::parse::<StrictHolder>(&json!({"letter": "A"})));
    assert!(err.is_unknown_member(), "got {err}");
    match &err.kind {
        ErrorKind::UnknownEnumMember { value, valid, .. } => {
            assert_eq!(value, "A");
            assert_eq!(valid, &vec!["a".to_string()]);
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert_eq!(err.path.to_string(), "$.letter");
}

#[test]
fn enum_member_must_be_a_string() {
    let err = expect_err(json_model::parse::<Holder>(&json!({"letter": 1})));
    assert!(err.is_type_mismatch());
}

#[test]
fn unknown_member_suggests_close_name() {
    #[derive(Debug, PartialEq, JsonEnum)]
    #[json(rename_all = "lowercase")]
    enum Color {
        Green,
        Red,
    }

    let err = expect_err(json_model::parse::<Color>(&json!("gren")));
    assert!(err.to_string().contains("did you mean 'green'"), "{err}");
}

#[test]
fn parses_nested_objects_and_lists() {
    let customer: Customer = json_model::parse(&json!({
        "customerId": 7,
        "address": {"city": "Oslo"},
        "orders": [{"sku": "a-1", "qty": 2}, {"sku": "b-2", "qty": 1}]
    }))
    .expect("parse");

    assert_eq!(customer.customer_id, 7);
    assert_eq!(customer.address, Address { city: "Oslo".into(), zip: None });
    assert_eq!(customer.orders.len(), 2);
    assert_eq!(customer.orders[1], Order { sku: "b-2".into(), qty: 1 });
}

#[test]
fn nested_type_mismatch_reports_full_path() {
    let err = expect_err(json_model::parse::<Customer>(&json!({
        "customerId": 7,
        "address": {"city": "Oslo"},
        "orders": [{"sku": "a-1", "qty": 2}, {"sku": "b-2", "qty": "one"}]
    })));

    assert!(err.is_type_mismatch(), "got {err}");
    assert_eq!(err.path.to_string(), "$.orders[1].qty");
    assert_eq!(err.field_name.as_deref(), Some("qty"));
    assert_eq!(err.type_name, "Order");
}

#[test]
fn integer_out_of_range_is_a_type_mismatch() {
    let err = expect_err(json_model::parse::<Order>(&json!({"sku": "a", "qty": 70000})));
    assert!(err.is_type_mismatch());
    assert!(err.to_string().contains("expected u16, found number"), "{err}");
}

#[test]
fn non_object_input_is_a_shape_error() {
    let err = expect_err(json_model::parse::<Foo>(&json!(["bar"])));
    assert!(err.is_shape());
    assert!(err.to_string().contains("expected object, found array"), "{err}");
}

#[test]
fn top_level_containers_parse() {
    let orders: Vec<Order> =
        json_model::parse(&json!([{"sku": "a", "qty": 1}])).expect("parse list");
    assert_eq!(orders, vec![Order { sku: "a".into(), qty: 1 }]);

    let missing: Option<Order> = json_model::parse(&json!(null)).expect("parse null");
    assert_eq!(missing, None);
}

#[test]
fn maps_parse_from_objects() {
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, JsonModel)]
    struct Inventory {
        stock: BTreeMap<String, u32>,
    }

    let inventory: Inventory =
        json_model::parse(&json!({"stock": {"apple": 3, "pear": 0}})).expect("parse");
    assert_eq!(inventory.stock.get("apple"), Some(&3));

    let err = expect_err(json_model::parse::<Inventory>(&json!({"stock": {"apple": -1}})));
    assert_eq!(err.path.to_string(), "$.stock.apple");
}

#[test]
fn extra_keys_are_ignored_by_default() {
    let foo: Foo = json_model::parse(&json!({"bar": "x", "other": 1})).expect("parse");
    assert_eq!(foo.bar, "x");
}

#[test]
fn deny_unknown_rejects_extra_keys_with_suggestion() {
    #[derive(Debug, JsonModel)]
    #[json(deny_unknown)]
    struct Strict {
        name: String,
    }

    let err = expect_err(json_model::parse::<Strict>(&json!({"name": "x", "nmae": "y"})));
    match &err.kind {
        ErrorKind::UnknownField { key, suggestion } => {
            assert_eq!(key, "nmae");
            assert_eq!(suggestion.as_deref(), Some("name"));
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn registry_wide_deny_unknown_applies_to_every_type() {
    let registry = Registry::new(CodecConfig::default().with_deny_unknown(true));
    let err = expect_err(registry.parse::<Foo>(&json!({"bar": "x", "baz": 1})));
    assert!(matches!(err.kind, ErrorKind::UnknownField { .. }));
    assert!(json_model::parse::<Foo>(&json!({"bar": "x", "baz": 1})).is_ok());
}

#[test]
fn from_str_reports_invalid_json_text() {
    let err = expect_err(json_model::from_str::<Foo>("{\"bar\": "));
    assert!(matches!(err.kind, ErrorKind::Json(_)));

    let foo: Foo = json_model::from_str(r#"{"bar": "ok"}"#).expect("parse");
    assert_eq!(foo.bar, "ok");
}
