//! Test that the `resource` attribute declares the actions defined in the impl block.

#![cfg(feature = "derive")]

use axum::response::IntoResponse;
use http::StatusCode;
use restology::{
    Action, ActionRequest, ActionSet, Resource, ResourceRouteBuilder, Response, RouteShape,
};

#[derive(Clone)]
struct UserView;

#[restology::resource]
impl Resource for UserView {
    async fn create(&self, _request: ActionRequest) -> Response {
        StatusCode::CREATED.into_response()
    }

    async fn list(&self, _request: ActionRequest) -> Response {
        "users".into_response()
    }
}

#[derive(Clone)]
struct ClassView {
    names: Vec<String>,
}

#[restology::resource(name = "class")]
impl Resource for ClassView {
    async fn create(&self, _request: ActionRequest) -> Response {
        StatusCode::CREATED.into_response()
    }

    async fn list(&self, _request: ActionRequest) -> Response {
        self.names.join(",").into_response()
    }

    async fn retrieve(&self, _request: ActionRequest) -> Response {
        StatusCode::OK.into_response()
    }

    async fn destroy(&self, _request: ActionRequest) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

fn summary<R>(view: &R, template: &str) -> Vec<(String, Vec<String>, String)>
where
    R: Resource,
{
    ResourceRouteBuilder::new(template)
        .build(view)
        .into_iter()
        .map(|r| {
            (
                r.uri,
                r.methods.iter().map(ToString::to_string).collect(),
                r.name,
            )
        })
        .collect()
}

#[test]
fn test_declared_actions() {
    assert_eq!(
        UserView::actions(),
        ActionSet::from([Action::Create, Action::List])
    );
    assert_eq!(UserView::name(), "UserView");

    assert_eq!(
        ClassView::actions(),
        ActionSet::from([
            Action::Create,
            Action::List,
            Action::Retrieve,
            Action::Destroy
        ])
    );
    assert_eq!(ClassView::name(), "class");
}

#[test]
fn test_collection_only_resource() {
    assert_eq!(
        summary(&UserView, "/user"),
        vec![(
            "/user".to_string(),
            vec!["GET".to_string(), "POST".to_string()],
            "UserView~collection".to_string()
        )]
    );
}

#[test]
fn test_collection_and_item_resource() {
    let view = ClassView {
        names: vec!["maths".to_string()],
    };

    assert_eq!(
        summary(&view, "/class/<class_id:int>"),
        vec![
            (
                "/class".to_string(),
                vec!["GET".to_string(), "POST".to_string()],
                "class~collection".to_string()
            ),
            (
                "/class/<class_id:int>".to_string(),
                vec!["GET".to_string(), "DELETE".to_string()],
                "class~item".to_string()
            ),
        ]
    );
}

#[test]
fn test_handlers_are_isolated() {
    let view = ClassView {
        names: vec!["maths".to_string()],
    };

    let mut first = ResourceRouteBuilder::new("/class/<class_id:int>").build(&view);
    let second = ResourceRouteBuilder::new("/class/<class_id:int>").build(&view);

    assert_eq!(first[0].handler.shape(), RouteShape::Collection);
    assert_eq!(first[1].handler.shape(), RouteShape::Item);

    first[0]
        .handler
        .view_mut()
        .names
        .push("physics".to_string());

    assert_eq!(first[0].handler.view().names, vec!["maths", "physics"]);
    assert_eq!(first[1].handler.view().names, vec!["maths"]);
    assert_eq!(second[0].handler.view().names, vec!["maths"]);
    assert_eq!(view.names, vec!["maths"]);

    assert_eq!(first[0].uri, second[0].uri);
    assert_eq!(first[0].methods, second[0].methods);
    assert_eq!(first[0].name, second[0].name);
}
