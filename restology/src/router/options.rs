//! Router and route options.

use crate::{
    RouteShape,
    env::{self, Flag, FromEnvError},
};

/// The default options of a [`super::ResourceRouter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterOptions {
    /// Whether routes only answer their exact path, trailing slash included.
    ///
    /// When `false`, routes also answer with or without a trailing slash.
    ///
    /// If `RESTOLOGY_STRICT_SLASHES` is set in the environment, it will be read and used when
    /// calling `RouterOptions::from_env`.
    pub strict_slashes: bool,

    /// The prefix put before versions, as in `/v1/users`.
    ///
    /// If `RESTOLOGY_VERSION_PREFIX` is set in the environment, it will be read and used when
    /// calling `RouterOptions::from_env`.
    pub version_prefix: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            strict_slashes: true,
            version_prefix: "/v".to_string(),
        }
    }
}

impl RouterOptions {
    /// The environment variable name for strict slashes.
    pub const RESTOLOGY_STRICT_SLASHES: &'static str = "RESTOLOGY_STRICT_SLASHES";

    /// The environment variable name for the version prefix.
    pub const RESTOLOGY_VERSION_PREFIX: &'static str = "RESTOLOGY_VERSION_PREFIX";

    /// Get the router options from the environment.
    ///
    /// Unset variables keep their default value.
    pub fn from_env() -> Result<Self, FromEnvError> {
        tracing::info!("Reading router options from the environment...");

        let mut options = Self::default();

        if let Some(Flag(strict_slashes)) = env::parse_var(Self::RESTOLOGY_STRICT_SLASHES)? {
            options.strict_slashes = strict_slashes;
        }

        if let Some(version_prefix) = env::var(Self::RESTOLOGY_VERSION_PREFIX)? {
            options.version_prefix = version_prefix;
        }

        tracing::info!(
            "Router options: strict slashes {}, version prefix `{}`.",
            if options.strict_slashes { "on" } else { "off" },
            options.version_prefix,
        );

        Ok(options)
    }
}

/// Options passed through to the routes of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// The hosts the routes answer to. Empty means any host.
    pub hosts: Vec<String>,

    /// Override the router's strict slashes setting.
    pub strict_slashes: Option<bool>,

    /// The version of the routes, prefixing their paths.
    pub version: Option<String>,

    /// Override the router's version prefix.
    pub version_prefix: Option<String>,
}

impl RouteOptions {
    /// Answer only to the specified host. Can be called several times.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.hosts.push(host.into());
        self
    }

    /// Set the strict slashes setting.
    pub fn strict_slashes(mut self, strict_slashes: bool) -> Self {
        self.strict_slashes = Some(strict_slashes);
        self
    }

    /// Set the version.
    pub fn version(mut self, version: impl ToString) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Set the version prefix.
    pub fn version_prefix(mut self, version_prefix: impl Into<String>) -> Self {
        self.version_prefix = Some(version_prefix.into());
        self
    }
}

/// Options for registering a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    /// The name of the view, used to name the routes. Defaults to the resource name.
    pub view_name: Option<String>,

    /// Only register the routes of this shape.
    pub only_shape: Option<RouteShape>,

    /// Options passed through to the routes.
    pub route: RouteOptions,
}

impl ResourceOptions {
    /// Set the name of the view.
    pub fn view_name(mut self, view_name: impl Into<String>) -> Self {
        self.view_name = Some(view_name.into());
        self
    }

    /// Only register the routes of the specified shape.
    pub fn only_shape(mut self, shape: RouteShape) -> Self {
        self.only_shape = Some(shape);
        self
    }

    /// Set the route options.
    pub fn route(mut self, route: RouteOptions) -> Self {
        self.route = route;
        self
    }
}
