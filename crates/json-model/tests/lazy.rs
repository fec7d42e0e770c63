use json_model::{
    DeclaredType, JsonModel, ListType, ParamDecl, Registry, TypeDeclaration, TypeMetadata,
};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, PartialEq, JsonModel)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

#[test]
fn self_referential_list_resolves() {
    init_tracing();
    let input = json!({
        "label": "root",
        "children": [
            {"label": "a", "children": []},
            {"label": "b", "children": [{"label": "b1", "children": []}]}
        ]
    });

    let tree: TreeNode = json_model::parse(&input).expect("parse");
    assert_eq!(tree.children[1].children[0].label, "b1");
    assert_eq!(json_model::serialize(&tree).expect("serialize"), input);
}

#[test]
fn deep_nesting_reports_innermost_path() {
    let err = json_model::parse::<TreeNode>(&json!({
        "label": "root",
        "children": [{"label": "a", "children": [{"children": []}]}]
    }))
    .expect_err("missing label");
    assert!(err.is_missing_field());
    assert_eq!(err.path.to_string(), "$.children[0].children[0]");
}

#[derive(Debug, PartialEq, JsonModel)]
struct Employee {
    name: String,
    manager: Option<Box<Employee>>,
    team: Option<Box<Team>>,
}

#[derive(Debug, PartialEq, JsonModel)]
struct Team {
    title: String,
    members: Vec<Employee>,
}

#[test]
fn mutually_recursive_types_round_trip() {
    init_tracing();
    let input = json!({
        "name": "ada",
        "manager": {"name": "grace", "manager": null, "team": null},
        "team": {
            "title": "compilers",
            "members": [{"name": "alan", "manager": null, "team": null}]
        }
    });

    let employee: Employee = json_model::parse(&input).expect("parse");
    let manager = employee.manager.as_deref().expect("manager");
    assert_eq!(manager.name, "grace");
    assert_eq!(employee.team.as_ref().expect("team").members[0].name, "alan");
    assert_eq!(json_model::serialize(&employee).expect("serialize"), input);
}

#[derive(Debug, PartialEq)]
struct Playlist {
    name: String,
    tracks: Vec<Track>,
}

#[derive(Debug, PartialEq)]
struct Track {
    title: String,
    seconds: u32,
}

fn playlist_field<'a>(instance: &'a dyn std::any::Any, name: &str) -> Option<&'a dyn std::any::Any> {
    let playlist = instance.downcast_ref::<Playlist>()?;
    match name {
        "name" => Some(&playlist.name as &dyn std::any::Any),
        "tracks" => Some(&playlist.tracks as &dyn std::any::Any),
        _ => None,
    }
}

fn track_field<'a>(instance: &'a dyn std::any::Any, name: &str) -> Option<&'a dyn std::any::Any> {
    let track = instance.downcast_ref::<Track>()?;
    match name {
        "title" => Some(&track.title as &dyn std::any::Any),
        "seconds" => Some(&track.seconds as &dyn std::any::Any),
        _ => None,
    }
}

#[test]
fn list_element_may_name_a_type_declared_later() {
    init_tracing();
    let registry = Registry::default();

    // Playlist is declared before Track exists in the registry.
    registry
        .declare(
            TypeDeclaration::new::<Playlist>()
                .named("Playlist")
                .param(ParamDecl::of::<String>("name"))
                .param(ParamDecl::bare_list("tracks"))
                .constructor(|args| {
                    Ok(Playlist {
                        name: args.take()?,
                        tracks: args.take()?,
                    })
                })
                .accessor(playlist_field)
                .metadata(TypeMetadata::new().list_element(
                    "tracks",
                    ListType::lazy::<Track>(DeclaredType::declared_object::<Track>),
                )),
        )
        .expect("declare playlist");

    let input = json!({"name": "mix", "tracks": [{"title": "intro", "seconds": 61}]});
    let err = registry
        .parse_declared::<Playlist>(&input)
        .expect_err("track is not declared yet");
    assert!(err.is_shape());
    assert_eq!(err.type_name, "Track");

    registry
        .declare(
            TypeDeclaration::new::<Track>()
                .named("Track")
                .param(ParamDecl::of::<String>("title"))
                .param(ParamDecl::of::<u32>("seconds"))
                .constructor(|args| {
                    Ok(Track {
                        title: args.take()?,
                        seconds: args.take()?,
                    })
                })
                .accessor(track_field),
        )
        .expect("declare track");

    let playlist: Playlist = registry.parse_declared(&input).expect("parse");
    assert_eq!(
        playlist.tracks,
        vec![Track {
            title: "intro".into(),
            seconds: 61
        }]
    );
    assert_eq!(registry.serialize_declared(&playlist).expect("serialize"), input);
}

#[test]
fn empty_list_of_undeclared_type_still_parses() {
    let registry = Registry::default();
    let items: Vec<Track> = {
        let parser = json_model::resolve_parser(
            &DeclaredType::List(ListType::lazy::<Track>(DeclaredType::declared_object::<Track>)),
            json_model::ResolveContext::root("tracks"),
        );
        let instance = parser(&registry, &json!([])).expect("parse");
        *instance.downcast::<Vec<Track>>().expect("vec of tracks")
    };
    assert!(items.is_empty());
}
