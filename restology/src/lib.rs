//! Restology
//!
//! RESTful resource routing for Rust, using Axum.
//!
//! A resource declares which of the six canonical actions (create, list, retrieve, update,
//! partial update, destroy) it implements. Restology derives the collection route and the item
//! route of the resource from a single URI template, and binds only the HTTP methods of the
//! implemented actions:
//!
//! ```rust,ignore
//! let mut router = ResourceRouter::new("api").with_url_prefix("/api");
//!
//! // GET, POST /api/class
//! // GET, PUT, PATCH, DELETE /api/class/{class_id}
//! router.add_resource(ClassView::default(), "/class/<class_id:int>", ResourceOptions::default())?;
//! ```
//!
//! # Features
//!
//! - `derive`: The `resource` attribute macro, which declares the actions of a resource from the
//!   methods of its `Resource` implementation. **Not enabled by default.**
//! - `auto-reload`: Take the server listener from `listenfd`, for seamless reloads during
//!   development. **Not enabled by default.**

mod action;
mod builder;
mod env;
mod handler;
mod resource;
mod router;
mod server;
pub mod uri;

pub use action::{Action, ActionSet, RouteShape, UnknownActionError};
pub use builder::{ResourceRouteBuilder, RouteRegistration, build_resource_routes, shape_bindings};
pub use env::FromEnvError;
pub use handler::{Binding, IsolatedHandler};
pub use resource::{ActionRequest, PathParams, Resource, Response};
pub use router::{
    RegisterError, ResourceOptions, ResourceRouter, RouteInfo, RouteOptions, RouterOptions,
};
#[cfg(feature = "auto-reload")]
pub use server::{NewWithAutoReloadError, auto_reload};
pub use server::{ServeError, Server, ServerBuilder, ServerInfo, ServerOptions};

#[cfg(feature = "derive")]
pub use restology_macros::resource;
