use json_model::{
    CodecConfig, DeclaredType, JsonEnum, JsonModel, NamingRule, OmitPolicy, ParamDecl, Registry,
    TypeDeclaration, TypeMetadata,
};
use serde_json::json;

#[derive(Debug, PartialEq)]
struct Counter {
    foo_bar: i64,
}

fn counter_field<'a>(instance: &'a dyn std::any::Any, name: &str) -> Option<&'a dyn std::any::Any> {
    let counter = instance.downcast_ref::<Counter>()?;
    match name {
        "fooBar" => Some(&counter.foo_bar as &dyn std::any::Any),
        _ => None,
    }
}

fn counter_declaration() -> TypeDeclaration {
    TypeDeclaration::new::<Counter>()
        .named("Counter")
        .param(ParamDecl::new("fooBar", DeclaredType::primitive::<i64>()))
        .constructor(|args| Ok(Counter { foo_bar: args.take()? }))
        .accessor(counter_field)
        .metadata(TypeMetadata::new().naming(NamingRule::SnakeCase))
}

#[test]
fn naming_rule_maps_declared_name_to_wire_name() {
    let registry = Registry::default();
    registry.declare(counter_declaration()).expect("declare");

    let value = registry
        .serialize_declared(&Counter { foo_bar: 1 })
        .expect("serialize");
    assert_eq!(value, json!({"foo_bar": 1}));

    let parsed: Counter = registry.parse_declared(&json!({"foo_bar": 1})).expect("parse");
    assert_eq!(parsed.foo_bar, 1);
}

#[derive(Debug, PartialEq, JsonModel)]
#[json(rename_all = "camelCase")]
struct Profile {
    display_name: String,
    #[json(rename = "mail")]
    email_address: String,
    login_count: u32,
}

#[test]
fn rename_all_and_field_rename() {
    let profile = Profile {
        display_name: "Ada".into(),
        email_address: "ada@example.com".into(),
        login_count: 3,
    };
    let value = json_model::serialize(&profile).expect("serialize");
    assert_eq!(
        value,
        json!({"displayName": "Ada", "mail": "ada@example.com", "loginCount": 3})
    );
}

#[test]
fn output_follows_declaration_order() {
    let profile = Profile {
        display_name: "Ada".into(),
        email_address: "a@b".into(),
        login_count: 0,
    };
    let text = json_model::to_string(&profile).expect("to_string");
    assert_eq!(text, r#"{"displayName":"Ada","mail":"a@b","loginCount":0}"#);
}

#[derive(Debug, PartialEq, JsonEnum)]
#[json(rename_all = "snake_case", case_insensitive)]
enum Status {
    InProgress,
    Done,
}

#[derive(Debug, PartialEq, JsonModel)]
struct Task {
    title: String,
    status: Status,
}

#[test]
fn enums_serialize_declared_member_name() {
    let task = Task {
        title: "write".into(),
        status: Status::InProgress,
    };
    assert_eq!(
        json_model::serialize(&task).expect("serialize"),
        json!({"title": "write", "status": "in_progress"})
    );

    let parsed: Task = json_model::parse(&json!({"title": "w", "status": "IN_PROGRESS"})).expect("parse");
    assert_eq!(parsed.status, Status::InProgress);
    assert_eq!(
        json_model::serialize(&parsed).expect("serialize")["status"],
        json!("in_progress")
    );
}

fn default_priority() -> u8 {
    3
}

#[derive(Debug, PartialEq, JsonModel)]
struct Ticket {
    id: u32,
    note: Option<String>,
    #[json(default = "default_priority")]
    priority: u8,
}

#[test]
fn omit_never_writes_every_attribute() {
    let ticket = Ticket {
        id: 1,
        note: None,
        priority: 3,
    };
    assert_eq!(
        json_model::serialize(&ticket).expect("serialize"),
        json!({"id": 1, "note": null, "priority": 3})
    );
}

#[test]
fn omit_null_skips_optional_nulls() {
    let registry = Registry::new(CodecConfig::default().with_omit(OmitPolicy::Null));
    let ticket = Ticket {
        id: 1,
        note: None,
        priority: 3,
    };
    assert_eq!(
        registry.serialize(&ticket).expect("serialize"),
        json!({"id": 1, "priority": 3})
    );
}

#[test]
fn omit_default_skips_values_equal_to_default() {
    let registry = Registry::new(CodecConfig::default().with_omit(OmitPolicy::Default));
    let ticket = Ticket {
        id: 1,
        note: None,
        priority: 3,
    };
    assert_eq!(registry.serialize(&ticket).expect("serialize"), json!({"id": 1}));

    let ticket = Ticket {
        id: 1,
        note: Some("n".into()),
        priority: 5,
    };
    assert_eq!(
        registry.serialize(&ticket).expect("serialize"),
        json!({"id": 1, "note": "n", "priority": 5})
    );

    let parsed: Ticket = registry.parse(&json!({"id": 1})).expect("parse");
    assert_eq!(parsed.priority, 3);
}

#[test]
fn type_level_omit_overrides_registry_default() {
    #[derive(Debug, JsonModel)]
    #[json(omit = "null")]
    struct Sparse {
        a: Option<u8>,
        b: Option<u8>,
    }

    let value = json_model::serialize(&Sparse { a: Some(1), b: None }).expect("serialize");
    assert_eq!(value, json!({"a": 1}));
}

#[derive(Debug, PartialEq, JsonModel)]
struct Audit {
    created_by: String,
    revision: u32,
}

#[derive(Debug, PartialEq, JsonModel)]
struct Document {
    title: String,
    #[json(inline)]
    audit: Audit,
}

#[test]
fn inline_attribute_splices_fields_into_parent() {
    let document = Document {
        title: "notes".into(),
        audit: Audit {
            created_by: "ada".into(),
            revision: 2,
        },
    };
    let value = json_model::serialize(&document).expect("serialize");
    assert_eq!(value, json!({"title": "notes", "created_by": "ada", "revision": 2}));

    let parsed: Document = json_model::parse(&value).expect("parse");
    assert_eq!(parsed, document);
}

#[test]
fn inline_fields_missing_from_parent_are_reported() {
    let err = json_model::parse::<Document>(&json!({"title": "notes", "created_by": "ada"}))
        .expect_err("revision missing");
    assert!(err.is_missing_field());
    assert_eq!(err.type_name, "Audit");
    assert_eq!(err.field_name.as_deref(), Some("revision"));
}

#[test]
fn inline_key_collision_is_a_shape_error() {
    #[derive(Debug, JsonModel)]
    struct Clashing {
        revision: u32,
        #[json(inline)]
        audit: Audit,
    }

    let clashing = Clashing {
        revision: 1,
        audit: Audit {
            created_by: "x".into(),
            revision: 2,
        },
    };
    let err = json_model::serialize(&clashing).expect_err("collision");
    assert!(err.is_shape());
    assert!(err.to_string().contains("'revision'"), "{err}");

    let err = json_model::model::<Clashing>().expect_err("collision");
    assert!(err.is_shape(), "{err}");

    let err = json_model::parse::<Clashing>(&json!({"revision": 7, "created_by": "x"}))
        .expect_err("collision");
    assert!(err.is_shape(), "{err}");
    assert!(err.to_string().contains("'revision'"), "{err}");
}

#[test]
fn pretty_output_is_indented() {
    let text = json_model::to_string_pretty(&Audit {
        created_by: "ada".into(),
        revision: 1,
    })
    .expect("pretty");
    assert_eq!(text, "{\n  \"created_by\": \"ada\",\n  \"revision\": 1\n}");
}
