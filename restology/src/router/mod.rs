//! The resource router.
//!
//! Installs the routes of resources into an axum router.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Router,
    extract::{FromRequestParts, Path, Request},
    response::IntoResponse,
    routing::{MethodFilter, MethodRouter},
};

mod options;

pub use options::{ResourceOptions, RouteOptions, RouterOptions};

use crate::{
    ActionRequest, IsolatedHandler, PathParams, Resource, ResourceRouteBuilder, Response,
    RouteRegistration,
    uri::{ParamKind, TemplateError, UriTemplate},
};

/// An error that can occur when registering a resource.
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// The URI template of a route is invalid.
    #[error("invalid URI template for route `{name}`: {err}")]
    Template {
        /// The name of the route.
        name: String,

        /// The template error.
        #[source]
        err: TemplateError,
    },

    /// A route with the same name was already registered.
    #[error("a route named `{name}` is already registered")]
    DuplicateName {
        /// The name of the route.
        name: String,
    },

    /// A route for the same path and method was already registered.
    #[error("route `{name}` conflicts with `{existing}` on `{method} {path}`")]
    DuplicateRoute {
        /// The name of the route being registered.
        name: String,

        /// The name of the route already registered.
        existing: String,

        /// The conflicting path.
        path: String,

        /// The conflicting method.
        method: http::Method,
    },

    /// A method cannot be routed.
    #[error("method `{method}` of route `{name}` cannot be routed")]
    UnsupportedMethod {
        /// The name of the route.
        name: String,

        /// The method.
        method: http::Method,
    },
}

/// Information about an installed route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// The fully-qualified name of the route.
    pub name: String,

    /// The URI template of the route.
    pub uri: String,

    /// The axum paths the route is installed at.
    pub paths: Vec<String>,

    /// The methods the route answers.
    pub methods: Vec<http::Method>,
}

/// A named group of resources, sharing a URL prefix.
///
/// Resources are added with [`ResourceRouter::add_resource`], which derives their collection and
/// item routes. The result converts into an `axum::Router`.
#[derive(Debug)]
pub struct ResourceRouter<S = ()> {
    name: String,
    url_prefix: String,
    options: RouterOptions,
    router: Router<S>,
    routes: Vec<RouteInfo>,
}

impl<S> ResourceRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create a new resource router.
    ///
    /// The name qualifies the names of all the routes of the router.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_prefix: String::new(),
            options: RouterOptions::default(),
            router: Router::new(),
            routes: Vec::new(),
        }
    }

    /// Set the URL prefix of all the routes subsequently added.
    pub fn with_url_prefix(mut self, url_prefix: impl AsRef<str>) -> Self {
        let url_prefix = url_prefix.as_ref().trim_end_matches('/');

        self.url_prefix = if url_prefix.is_empty() || url_prefix.starts_with('/') {
            url_prefix.to_string()
        } else {
            format!("/{url_prefix}")
        };

        self
    }

    /// Set the options of the router.
    pub fn with_options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the name of the router.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the routes installed so far.
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// Add a resource.
    ///
    /// Derives the collection and item routes of the resource from the URI template and installs
    /// them. A URI that does not start with a `/` gets one.
    ///
    /// All the routes of the resource are checked before any of them is installed: on error, the
    /// router is left unchanged. Errors indicate a mistake in the resource declaration and should
    /// abort the startup.
    pub fn add_resource<R: Resource>(
        &mut self,
        view: R,
        uri: &str,
        options: ResourceOptions,
    ) -> Result<&mut Self, RegisterError> {
        let uri = if uri.is_empty() || uri.starts_with('/') {
            uri.to_string()
        } else {
            format!("/{uri}")
        };

        let mut builder = ResourceRouteBuilder::new(uri);

        if let Some(view_name) = options.view_name {
            builder = builder.name(view_name);
        }

        if let Some(shape) = options.only_shape {
            builder = builder.only_shape(shape);
        }

        let mut pending = Vec::new();

        for registration in builder.build(&view) {
            if let Some(route) = self.prepare(registration, &options.route, &pending)? {
                pending.push(route);
            }
        }

        for route in pending {
            self.install(route, &options.route);
        }

        Ok(self)
    }

    fn prepare<R: Resource>(
        &self,
        registration: RouteRegistration<R>,
        options: &RouteOptions,
        pending: &[PendingRoute<R>],
    ) -> Result<Option<PendingRoute<R>>, RegisterError> {
        let known = || {
            self.routes
                .iter()
                .chain(pending.iter().map(|route| &route.info))
        };

        let name = format!("{}.{}", self.name, registration.name);

        if known().any(|route| route.name == name) {
            return Err(RegisterError::DuplicateName { name });
        }

        let uri = self.full_uri(&registration.uri, options);
        let template = UriTemplate::parse(&uri).map_err(|err| RegisterError::Template {
            name: name.clone(),
            err,
        })?;

        let mut paths = vec![template.to_axum_path()];

        if !options.strict_slashes.unwrap_or(self.options.strict_slashes) && paths[0] != "/" {
            let alternate = match paths[0].strip_suffix('/') {
                Some(path) => path.to_string(),
                None => format!("{}/", paths[0]),
            };

            paths.push(alternate);
        }

        let methods: Vec<http::Method> = registration.handler.methods().cloned().collect();
        let mut filter: Option<MethodFilter> = None;

        for method in &methods {
            for path in &paths {
                if let Some(existing) = known().find(|route| conflicts(route, path, method)) {
                    return Err(RegisterError::DuplicateRoute {
                        name,
                        existing: existing.name.clone(),
                        path: path.clone(),
                        method: method.clone(),
                    });
                }
            }

            let method_filter = MethodFilter::try_from(method.clone()).map_err(|_| {
                RegisterError::UnsupportedMethod {
                    name: name.clone(),
                    method: method.clone(),
                }
            })?;

            filter = Some(match filter {
                Some(filter) => filter.or(method_filter),
                None => method_filter,
            });
        }

        Ok(filter.map(|filter| PendingRoute {
            handler: registration.handler,
            template,
            filter,
            info: RouteInfo {
                name,
                uri,
                paths,
                methods,
            },
        }))
    }

    fn install<R: Resource>(&mut self, route: PendingRoute<R>, options: &RouteOptions) {
        let PendingRoute {
            handler,
            template,
            filter,
            info,
        } = route;

        let method_router = Self::method_router(handler, &template, options, filter);
        let mut router = self.router.clone();

        for path in &info.paths {
            tracing::debug!(
                "Registering route `{}` at `{path}` for {}.",
                info.name,
                info.methods
                    .iter()
                    .map(http::Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            router = router.route(path, method_router.clone());
        }

        self.router = router;
        self.routes.push(info);
    }

    fn full_uri(&self, uri: &str, options: &RouteOptions) -> String {
        let version = match &options.version {
            Some(version) => {
                let prefix = options
                    .version_prefix
                    .as_deref()
                    .unwrap_or(&self.options.version_prefix);

                format!("/{}{version}", prefix.trim_matches('/'))
            }
            None => String::new(),
        };

        format!("{version}{}{uri}", self.url_prefix)
    }

    fn method_router<R: Resource>(
        handler: IsolatedHandler<R>,
        template: &UriTemplate,
        options: &RouteOptions,
        filter: MethodFilter,
    ) -> MethodRouter<S> {
        let route = Arc::new(InstalledRoute {
            handler,
            params: template
                .params()
                .map(|(name, kind)| (name.to_string(), kind))
                .collect(),
            hosts: options
                .hosts
                .iter()
                .map(|host| host.to_ascii_lowercase())
                .collect(),
        });

        axum::routing::on(filter, move |request: Request| {
            let route = Arc::clone(&route);

            async move { route.handle(request).await }
        })
    }

    /// Get the underlying axum router.
    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

impl<S> From<ResourceRouter<S>> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn from(resource_router: ResourceRouter<S>) -> Self {
        resource_router.into_router()
    }
}

/// A route that passed all the checks, ready to be installed.
struct PendingRoute<R> {
    handler: IsolatedHandler<R>,
    template: UriTemplate,
    filter: MethodFilter,
    info: RouteInfo,
}

/// Check whether installing `method` at `path` conflicts with an installed route.
///
/// Axum refuses two paths that only differ by the names of their captures, whatever their methods.
fn conflicts(route: &RouteInfo, path: &str, method: &http::Method) -> bool {
    let pattern = path_pattern(path);

    route.paths.iter().any(|existing| {
        path_pattern(existing) == pattern && (existing != path || route.methods.contains(method))
    })
}

/// Get a path with its capture names erased.
fn path_pattern(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// A handler, as installed in the router.
struct InstalledRoute<R> {
    handler: IsolatedHandler<R>,
    params: Vec<(String, ParamKind)>,
    hosts: Vec<String>,
}

impl<R: Resource> InstalledRoute<R> {
    async fn handle(&self, request: Request) -> Response {
        let (mut parts, body) = request.into_parts();

        if !self.accepts_host(&parts.headers) {
            return http::StatusCode::NOT_FOUND.into_response();
        }

        let params = if self.params.is_empty() {
            PathParams::default()
        } else {
            let Path(captured) =
                match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &()).await {
                    Ok(captured) => captured,
                    Err(rejection) => return rejection.into_response(),
                };

            for (name, kind) in &self.params {
                match captured.get(name) {
                    Some(value) if kind.accepts(value) => {}
                    _ => return http::StatusCode::NOT_FOUND.into_response(),
                }
            }

            captured.into_iter().collect()
        };

        self.handler
            .dispatch(ActionRequest::new(parts, params, body))
            .await
    }

    fn accepts_host(&self, headers: &http::HeaderMap) -> bool {
        if self.hosts.is_empty() {
            return true;
        }

        let Some(host) = headers
            .get(http::header::HOST)
            .and_then(|host| host.to_str().ok())
            .map(str::to_ascii_lowercase)
        else {
            return false;
        };

        let hostname = host.split(':').next().unwrap_or(&host);

        self.hosts
            .iter()
            .any(|expected| *expected == host || expected == hostname)
    }
}
