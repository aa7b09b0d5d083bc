//! The resource trait.

use std::{collections::BTreeMap, future::Future, str::FromStr, sync::Arc};

use axum::response::IntoResponse;

use crate::{Action, ActionSet, ServerInfo};

/// A resource view: the application-supplied implementation of some of the six canonical actions.
///
/// A resource declares which actions it implements through [`Resource::actions`]. Only the HTTP
/// methods of the declared actions get routed to it. The `resource` attribute macro (with the
/// `derive` feature) computes that set from the action methods defined in the `impl` block.
///
/// Resources are cloned once per route shape when registered, so that the collection and item
/// routes each own an independent copy. Shared state that must be visible from both routes has to
/// be put behind an `Arc` explicitly.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone)]
/// struct UserView {
///     db: Arc<Database>,
/// }
///
/// #[restology::resource(name = "user")]
/// impl Resource for UserView {
///     async fn list(&self, request: ActionRequest) -> Response {
///         Json(self.db.users().await).into_response()
///     }
///
///     async fn create(&self, request: ActionRequest) -> Response {
///         // ...
///     }
/// }
/// ```
pub trait Resource: Clone + Send + Sync + 'static {
    /// Whether `GET` is always answered, falling back to [`Resource::respond`] when the list or
    /// retrieve action is not implemented.
    const BASELINE_GET: bool = true;

    /// The set of actions this resource implements.
    fn actions() -> ActionSet;

    /// The default name of the resource, used to name its routes.
    ///
    /// Defaults to the bare name of the type.
    fn name() -> &'static str {
        bare_type_name::<Self>()
    }

    /// Create a new item in the collection.
    fn create(&self, request: ActionRequest) -> impl Future<Output = Response> + Send {
        std::future::ready(not_implemented(Self::name(), Action::Create, request))
    }

    /// List the items of the collection.
    fn list(&self, request: ActionRequest) -> impl Future<Output = Response> + Send {
        std::future::ready(not_implemented(Self::name(), Action::List, request))
    }

    /// Retrieve a single item.
    fn retrieve(&self, request: ActionRequest) -> impl Future<Output = Response> + Send {
        std::future::ready(not_implemented(Self::name(), Action::Retrieve, request))
    }

    /// Replace a single item.
    fn update(&self, request: ActionRequest) -> impl Future<Output = Response> + Send {
        std::future::ready(not_implemented(Self::name(), Action::Update, request))
    }

    /// Partially update a single item.
    fn partial_update(&self, request: ActionRequest) -> impl Future<Output = Response> + Send {
        std::future::ready(not_implemented(
            Self::name(),
            Action::PartialUpdate,
            request,
        ))
    }

    /// Destroy a single item.
    fn destroy(&self, request: ActionRequest) -> impl Future<Output = Response> + Send {
        std::future::ready(not_implemented(Self::name(), Action::Destroy, request))
    }

    /// The baseline `GET` responder, used when the list or retrieve action is not implemented.
    ///
    /// Answers with a list-style body when there are no path parameters, and a retrieve-style body
    /// otherwise. The body names the resource as it was registered.
    fn respond(&self, request: ActionRequest) -> impl Future<Output = Response> + Send {
        std::future::ready(baseline_response(
            request.view_name().unwrap_or(Self::name()),
            &request.params,
        ))
    }
}

/// The response type of resource actions.
pub type Response = axum::response::Response;

/// A request, as handed to a resource action.
#[derive(Debug)]
pub struct ActionRequest {
    /// The request parts.
    pub parts: http::request::Parts,

    /// The path parameters, already checked against their declared types.
    pub params: PathParams,

    /// The request body.
    pub body: axum::body::Body,

    view_name: Option<String>,
}

impl ActionRequest {
    /// Create a new action request.
    pub fn new(parts: http::request::Parts, params: PathParams, body: axum::body::Body) -> Self {
        Self {
            parts,
            params,
            body,
            view_name: None,
        }
    }

    /// Set the name the resource was registered under.
    pub fn with_view_name(mut self, view_name: impl Into<String>) -> Self {
        self.view_name = Some(view_name.into());
        self
    }

    /// Get the name the resource was registered under, if the request went through a route.
    pub fn view_name(&self) -> Option<&str> {
        self.view_name.as_deref()
    }

    /// Get the server information, if the request went through a [`crate::Server`].
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.parts
            .extensions
            .get::<Arc<ServerInfo>>()
            .map(AsRef::as_ref)
    }
}

/// The path parameters of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct PathParams(BTreeMap<String, String>);

impl PathParams {
    /// Get a raw parameter.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Get and parse a parameter.
    ///
    /// A missing or unparsable parameter results in a `400 Bad Request` response.
    pub fn get<T>(&self, name: &str) -> Result<T, Response>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.get_str(name).ok_or_else(|| {
            (
                http::StatusCode::BAD_REQUEST,
                format!("missing path parameter `{name}`"),
            )
                .into_response()
        })?;

        value.parse().map_err(|err| {
            (
                http::StatusCode::BAD_REQUEST,
                format!("error while parsing path parameter `{name}`: {err}"),
            )
                .into_response()
        })
    }

    /// Check whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the parameters, by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn bare_type_name<T: ?Sized>() -> &'static str {
    let name = std::any::type_name::<T>();
    let name = name.split('<').next().unwrap_or(name);

    name.rsplit("::").next().unwrap_or(name)
}

fn not_implemented(name: &str, action: Action, request: ActionRequest) -> Response {
    tracing::warn!(
        "Resource `{name}` declares action `{action}` but does not implement it (requested `{} {}`).",
        request.parts.method,
        request.parts.uri.path(),
    );

    (
        http::StatusCode::METHOD_NOT_ALLOWED,
        format!("action `{action}` is not implemented"),
    )
        .into_response()
}

fn baseline_response(name: &str, params: &PathParams) -> Response {
    let body = if params.is_empty() {
        serde_json::json!({
            "resource": name,
            "action": Action::List.as_str(),
        })
    } else {
        serde_json::json!({
            "resource": name,
            "action": Action::Retrieve.as_str(),
            "params": params,
        })
    };

    axum::Json(body).into_response()
}
