//! Run with
//!
//! ```not_rust
//! cargo run -p restology --example resources --features demos
//! ```
//!
//! Then try:
//!
//! ```not_rust
//! curl -X POST localhost:3000/bpa/user -d 'alice'
//! curl localhost:3000/bpa/user
//! curl localhost:3000/bpb/class/1
//! curl -X DELETE localhost:3000/bpb/student/1
//! ```

use restology::{ResourceOptions, ResourceRouter, RouterOptions, Server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    info!("Starting example `{}`...", env!("CARGO_BIN_NAME"));

    let model = model::Model::default();
    let router_options = RouterOptions::from_env()?;

    // Users only have a collection route: `/bpa/user`.
    let mut bpa = ResourceRouter::new("Blueprint_A")
        .with_url_prefix("/bpa")
        .with_options(router_options.clone());

    bpa.add_resource(
        views::UserView::new(model.clone()),
        "/user",
        ResourceOptions::default().view_name("user"),
    )?;

    // Classes and students have both routes. Students cannot be updated, so their item route
    // only answers `GET` and `DELETE`.
    let mut bpb = ResourceRouter::new("Blueprint_B")
        .with_url_prefix("/bpb")
        .with_options(router_options);

    bpb.add_resource(
        views::ClassView,
        "/class/<class_id:int>",
        ResourceOptions::default().view_name("class"),
    )?
    .add_resource(
        views::StudentView,
        "/student/<student_id:int>",
        ResourceOptions::default().view_name("student"),
    )?;

    for route in bpa.routes().iter().chain(bpb.routes()) {
        info!(
            "Route `{}`: {} {}",
            route.name,
            route
                .methods
                .iter()
                .map(http::Method::as_str)
                .collect::<Vec<_>>()
                .join(","),
            route.uri
        );
    }

    let router = axum::Router::new().merge(bpa).merge(bpb);

    Server::builder_with_auto_reload("127.0.0.1:3000")
        .await?
        .with_options_from_env()?
        .build()
        .serve(router)
        .await
        .map_err(Into::into)
}

/// The model.
///
/// Shared between the collection and item routes of the user resource, hence the `Arc`.
mod model {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    #[derive(Debug, Clone, Default)]
    pub(super) struct Model {
        pub users: Arc<Mutex<Vec<String>>>,
    }
}

/// The resource views.
mod views {
    use axum::response::IntoResponse;
    use http::StatusCode;
    use restology::{ActionRequest, Resource, Response};

    use super::model::Model;

    #[derive(Clone)]
    pub(super) struct UserView {
        model: Model,
    }

    impl UserView {
        pub fn new(model: Model) -> Self {
            Self { model }
        }
    }

    #[restology::resource]
    impl Resource for UserView {
        async fn create(&self, request: ActionRequest) -> Response {
            let name = match axum::body::to_bytes(request.body, 1024).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
                Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            };

            self.model.users.lock().await.push(name);

            StatusCode::CREATED.into_response()
        }

        async fn list(&self, _request: ActionRequest) -> Response {
            axum::Json(self.model.users.lock().await.clone()).into_response()
        }
    }

    #[derive(Clone)]
    pub(super) struct ClassView;

    #[restology::resource]
    impl Resource for ClassView {
        async fn create(&self, _request: ActionRequest) -> Response {
            (StatusCode::CREATED, "create method").into_response()
        }

        async fn list(&self, _request: ActionRequest) -> Response {
            "list method".into_response()
        }

        async fn retrieve(&self, request: ActionRequest) -> Response {
            match request.params.get::<u64>("class_id") {
                Ok(class_id) => format!("retrieve method, class_id={class_id}").into_response(),
                Err(response) => response,
            }
        }

        async fn update(&self, _request: ActionRequest) -> Response {
            "put method".into_response()
        }

        async fn partial_update(&self, _request: ActionRequest) -> Response {
            "patch method".into_response()
        }

        async fn destroy(&self, _request: ActionRequest) -> Response {
            "delete method".into_response()
        }
    }

    /// Students have no `list` nor `retrieve`: `GET` is answered by the baseline responder.
    #[derive(Clone)]
    pub(super) struct StudentView;

    #[restology::resource]
    impl Resource for StudentView {
        async fn create(&self, _request: ActionRequest) -> Response {
            (StatusCode::CREATED, "create method").into_response()
        }

        async fn destroy(&self, _request: ActionRequest) -> Response {
            "delete method".into_response()
        }
    }
}
