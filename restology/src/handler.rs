//! Isolated route handlers.

use axum::response::IntoResponse;

use crate::{Action, ActionRequest, Resource, Response, RouteShape};

/// What answers a given HTTP method on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// A declared action.
    Action(Action),

    /// The baseline `GET` responder of the resource.
    Baseline,
}

/// A per-route handler, owning its own copy of a resource view.
///
/// Handlers are created at registration time, one per route shape, and only expose the HTTP
/// methods bound to that shape. Since every handler owns a clone of the view it was isolated from,
/// two handlers isolated from the same view never share state, unless the view itself holds shared
/// references.
#[derive(Debug, Clone)]
pub struct IsolatedHandler<R> {
    name: String,
    shape: RouteShape,
    bindings: Vec<(http::Method, Binding)>,
    view: R,
}

impl<R: Resource> IsolatedHandler<R> {
    /// Isolate a handler from a view.
    ///
    /// Bindings for the same method are only kept once, the first one winning.
    pub fn isolate(
        view: &R,
        shape: RouteShape,
        name: impl Into<String>,
        bindings: impl IntoIterator<Item = (http::Method, Binding)>,
    ) -> Self {
        let mut unique: Vec<(http::Method, Binding)> = Vec::new();

        for (method, binding) in bindings {
            if !unique.iter().any(|(m, _)| *m == method) {
                unique.push((method, binding));
            }
        }

        Self {
            name: name.into(),
            shape,
            bindings: unique,
            view: view.clone(),
        }
    }

    /// Get the name of the handler.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the name of the view, as it was registered.
    ///
    /// This is the part of the handler name before the `~` separator, or the whole name if there
    /// is none.
    pub fn view_name(&self) -> &str {
        self.name
            .rsplit_once('~')
            .map_or(self.name.as_str(), |(view_name, _)| view_name)
    }

    /// Get the shape of the route this handler answers.
    pub fn shape(&self) -> RouteShape {
        self.shape
    }

    /// Get the view owned by this handler.
    pub fn view(&self) -> &R {
        &self.view
    }

    /// Get a mutable reference to the view owned by this handler.
    ///
    /// Once registered, the handler sits behind an `Arc` and its view is only reachable through
    /// shared references.
    pub fn view_mut(&mut self) -> &mut R {
        &mut self.view
    }

    /// Get the HTTP methods this handler answers, in binding order.
    pub fn methods(&self) -> impl Iterator<Item = &http::Method> {
        self.bindings.iter().map(|(method, _)| method)
    }

    /// Get what answers the specified method, if anything.
    ///
    /// `HEAD` is answered like `GET`.
    pub fn binding(&self, method: &http::Method) -> Option<Binding> {
        let is_head = method == http::Method::HEAD;

        self.bindings
            .iter()
            .find(|(m, _)| m == method || (is_head && m == http::Method::GET))
            .map(|(_, binding)| *binding)
    }

    /// Dispatch a request to the action bound to its method.
    pub async fn dispatch(&self, request: ActionRequest) -> Response {
        let request = request.with_view_name(self.view_name());

        match self.binding(&request.parts.method) {
            Some(Binding::Action(action)) => self.invoke(action, request).await,
            Some(Binding::Baseline) => self.view.respond(request).await,
            None => self.method_not_allowed(),
        }
    }

    async fn invoke(&self, action: Action, request: ActionRequest) -> Response {
        match action {
            Action::Create => self.view.create(request).await,
            Action::List => self.view.list(request).await,
            Action::Retrieve => self.view.retrieve(request).await,
            Action::Update => self.view.update(request).await,
            Action::PartialUpdate => self.view.partial_update(request).await,
            Action::Destroy => self.view.destroy(request).await,
        }
    }

    fn method_not_allowed(&self) -> Response {
        let allow = self
            .methods()
            .map(http::Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        (
            http::StatusCode::METHOD_NOT_ALLOWED,
            [(http::header::ALLOW, allow)],
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{ActionSet, PathParams};

    #[derive(Clone, Default)]
    struct ClassView {
        tags: Vec<String>,
        hits: Arc<Mutex<u32>>,
    }

    impl Resource for ClassView {
        fn actions() -> ActionSet {
            ActionSet::from([Action::Retrieve, Action::Destroy])
        }

        async fn retrieve(&self, _request: ActionRequest) -> Response {
            *self.hits.lock().unwrap() += 1;

            format!("retrieve {}", self.tags.join(",")).into_response()
        }

        async fn destroy(&self, _request: ActionRequest) -> Response {
            http::StatusCode::NO_CONTENT.into_response()
        }
    }

    fn item_handler(view: &ClassView) -> IsolatedHandler<ClassView> {
        IsolatedHandler::isolate(
            view,
            RouteShape::Item,
            "class~item",
            [
                (http::Method::GET, Binding::Action(Action::Retrieve)),
                (http::Method::DELETE, Binding::Action(Action::Destroy)),
            ],
        )
    }

    fn request(method: http::Method) -> ActionRequest {
        let (parts, body) = http::Request::builder()
            .method(method)
            .uri("/class/1")
            .body(axum::body::Body::empty())
            .unwrap()
            .into_parts();

        ActionRequest::new(parts, PathParams::default(), body)
    }

    #[test]
    fn test_isolated_handlers_do_not_share_state() {
        let view = ClassView {
            tags: vec!["base".to_string()],
            ..Default::default()
        };

        let mut first = item_handler(&view);
        let second = item_handler(&view);

        first.view_mut().tags.push("first".to_string());

        assert_eq!(first.view().tags, vec!["base", "first"]);
        assert_eq!(second.view().tags, vec!["base"]);
        assert_eq!(view.tags, vec!["base"]);
    }

    #[test]
    fn test_bindings() {
        let handler = IsolatedHandler::isolate(
            &ClassView::default(),
            RouteShape::Item,
            "class~item",
            [
                (http::Method::GET, Binding::Action(Action::Retrieve)),
                (http::Method::GET, Binding::Baseline),
            ],
        );

        assert_eq!(handler.methods().collect::<Vec<_>>(), vec![http::Method::GET]);
        assert_eq!(
            handler.binding(&http::Method::HEAD),
            Some(Binding::Action(Action::Retrieve))
        );
        assert_eq!(handler.binding(&http::Method::PUT), None);
        assert_eq!(handler.name(), "class~item");
        assert_eq!(handler.view_name(), "class");
        assert_eq!(handler.shape(), RouteShape::Item);
    }

    #[tokio::test]
    async fn test_dispatch() {
        let view = ClassView {
            tags: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        let handler = item_handler(&view);

        let response = handler.dispatch(request(http::Method::GET)).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(*view.hits.lock().unwrap(), 1);

        let response = handler.dispatch(request(http::Method::DELETE)).await;
        assert_eq!(response.status(), http::StatusCode::NO_CONTENT);

        let response = handler.dispatch(request(http::Method::PUT)).await;
        assert_eq!(response.status(), http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[http::header::ALLOW], "GET, DELETE");
    }
}
