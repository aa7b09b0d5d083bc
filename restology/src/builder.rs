//! Resource route building.
//!
//! Turns a resource view and a URI template into at most two route registrations: one for the
//! collection and one for the item.

use crate::{
    Binding, IsolatedHandler, Resource, RouteShape,
    uri::{ResourceUris, split_uri_template},
};

/// A route registration, ready to be installed in a router.
#[derive(Debug, Clone)]
pub struct RouteRegistration<R> {
    /// The URI template of the route.
    pub uri: String,

    /// The HTTP methods the route answers.
    pub methods: Vec<http::Method>,

    /// The handler answering the route.
    pub handler: IsolatedHandler<R>,

    /// The name of the route.
    pub name: String,
}

/// Builds the route registrations of a resource.
#[derive(Debug, Clone)]
pub struct ResourceRouteBuilder {
    template: String,
    name: Option<String>,
    only_shape: Option<RouteShape>,
}

impl ResourceRouteBuilder {
    /// Create a new builder for the specified URI template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            name: None,
            only_shape: None,
        }
    }

    /// Set the name of the view, used to name the routes.
    ///
    /// Defaults to [`Resource::name`].
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Only build the routes for the specified shape.
    pub fn only_shape(mut self, shape: RouteShape) -> Self {
        self.only_shape = Some(shape);
        self
    }

    /// Build the route registrations for the specified view.
    ///
    /// Shapes with an empty URI or without any implemented action are skipped. Calling this twice
    /// yields equivalent registrations with distinct handlers: deduplication is up to the router.
    pub fn build<R: Resource>(&self, view: &R) -> Vec<RouteRegistration<R>> {
        let uris = split_uri_template(&self.template);
        let view_name = self.name.as_deref().unwrap_or_else(|| R::name());

        RouteShape::ALL
            .into_iter()
            .filter(|shape| self.only_shape.is_none_or(|only| only == *shape))
            .filter_map(|shape| Self::build_shape(view, view_name, &uris, shape))
            .collect()
    }

    fn build_shape<R: Resource>(
        view: &R,
        view_name: &str,
        uris: &ResourceUris,
        shape: RouteShape,
    ) -> Option<RouteRegistration<R>> {
        let uri = uris.uri(shape)?;
        let bindings = shape_bindings::<R>(shape);

        if bindings.is_empty() {
            tracing::debug!(
                "Resource `{view_name}` implements no {shape} action: not registering `{uri}`."
            );

            return None;
        }

        let name = format!("{view_name}~{shape}");
        let handler = IsolatedHandler::isolate(view, shape, name.clone(), bindings);
        let methods = handler.methods().cloned().collect();

        Some(RouteRegistration {
            uri: uri.to_string(),
            methods,
            handler,
            name,
        })
    }
}

/// Get the method bindings of a resource for a shape.
///
/// Each action of the shape is bound if the resource declares it. The shape's `GET` falls back to
/// the baseline responder when the resource allows it.
pub fn shape_bindings<R: Resource>(shape: RouteShape) -> Vec<(http::Method, Binding)> {
    let declared = R::actions();
    let mut bindings = Vec::new();

    for &action in shape.actions() {
        if declared.contains(action) {
            bindings.push((action.method(), Binding::Action(action)));
        } else if R::BASELINE_GET && action == shape.get_action() {
            bindings.push((action.method(), Binding::Baseline));
        }
    }

    bindings
}

/// Build the route registrations of a resource.
///
/// A shorthand for [`ResourceRouteBuilder`].
pub fn build_resource_routes<R: Resource>(
    view: &R,
    template: &str,
    name: Option<&str>,
    only_shape: Option<RouteShape>,
) -> Vec<RouteRegistration<R>> {
    let mut builder = ResourceRouteBuilder::new(template);

    if let Some(name) = name {
        builder = builder.name(name);
    }

    if let Some(shape) = only_shape {
        builder = builder.only_shape(shape);
    }

    builder.build(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, ActionRequest, ActionSet, Response};

    #[derive(Clone)]
    struct UserView;

    impl Resource for UserView {
        fn actions() -> ActionSet {
            ActionSet::from([Action::Create, Action::List])
        }

        async fn create(&self, _request: ActionRequest) -> Response {
            Response::default()
        }

        async fn list(&self, _request: ActionRequest) -> Response {
            Response::default()
        }
    }

    #[derive(Clone)]
    struct StudentView;

    impl Resource for StudentView {
        fn actions() -> ActionSet {
            ActionSet::from([
                Action::Create,
                Action::List,
                Action::Retrieve,
                Action::Destroy,
            ])
        }
    }

    #[derive(Clone)]
    struct ReadOnlyView;

    impl Resource for ReadOnlyView {
        fn actions() -> ActionSet {
            ActionSet::EMPTY
        }
    }

    #[derive(Clone)]
    struct SilentView;

    impl Resource for SilentView {
        const BASELINE_GET: bool = false;

        fn actions() -> ActionSet {
            ActionSet::from([Action::Update])
        }
    }

    fn summary<R>(registrations: &[RouteRegistration<R>]) -> Vec<(&str, Vec<&str>, &str)> {
        registrations
            .iter()
            .map(|r| {
                (
                    r.uri.as_str(),
                    r.methods.iter().map(http::Method::as_str).collect(),
                    r.name.as_str(),
                )
            })
            .collect()
    }

    #[test]
    fn test_collection_only() {
        let registrations = ResourceRouteBuilder::new("/user").build(&UserView);

        assert_eq!(
            summary(&registrations),
            vec![("/user", vec!["GET", "POST"], "UserView~collection")]
        );
    }

    #[test]
    fn test_collection_and_item() {
        let registrations = ResourceRouteBuilder::new("/class/<class_id:int>")
            .name("student")
            .build(&StudentView);

        assert_eq!(
            summary(&registrations),
            vec![
                ("/class", vec!["GET", "POST"], "student~collection"),
                ("/class/<class_id:int>", vec!["GET", "DELETE"], "student~item"),
            ]
        );
        assert_eq!(registrations[1].handler.shape(), RouteShape::Item);
    }

    #[test]
    fn test_only_shape() {
        let registrations = ResourceRouteBuilder::new("/class/<class_id:int>")
            .only_shape(RouteShape::Item)
            .build(&StudentView);

        assert_eq!(
            summary(&registrations),
            vec![(
                "/class/<class_id:int>",
                vec!["GET", "DELETE"],
                "StudentView~item"
            )]
        );
    }

    #[test]
    fn test_baseline_get() {
        assert_eq!(
            shape_bindings::<ReadOnlyView>(RouteShape::Collection),
            vec![(http::Method::GET, Binding::Baseline)]
        );
        assert_eq!(
            shape_bindings::<ReadOnlyView>(RouteShape::Item),
            vec![(http::Method::GET, Binding::Baseline)]
        );
    }

    #[test]
    fn test_empty_shapes_are_skipped() {
        let registrations = ResourceRouteBuilder::new("/silent/<id>").build(&SilentView);

        assert_eq!(
            summary(&registrations),
            vec![("/silent/<id>", vec!["PUT"], "SilentView~item")]
        );

        let registrations = ResourceRouteBuilder::new("/silent").build(&SilentView);
        assert!(registrations.is_empty());
    }

    #[test]
    fn test_empty_template() {
        assert!(ResourceRouteBuilder::new("").build(&UserView).is_empty());
    }

    #[test]
    fn test_builds_are_not_deduplicated() {
        let first = build_resource_routes(&StudentView, "/s/<id>", Some("s"), None);
        let second = build_resource_routes(&StudentView, "/s/<id>", Some("s"), None);

        assert_eq!(summary(&first), summary(&second));
        assert_eq!(first.len(), 2);
    }
}
