//! Server options.

use crate::env::{self, FromEnvError};

/// The options for the server.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// The base HTTP URL of the server, as seen by clients.
    ///
    /// If the server is running behind a reverse proxy, this should be set to the base URL of the
    /// proxy. If unset, it is derived from the TCP listener address.
    ///
    /// If `RESTOLOGY_BASE_URL` is set in the environment, it will be read and used as the base URL
    /// when calling `ServerOptions::from_env`.
    pub base_url: Option<http::Uri>,
}

impl ServerOptions {
    /// The environment variable name for the base URL.
    pub const RESTOLOGY_BASE_URL: &'static str = "RESTOLOGY_BASE_URL";

    /// Get the server options from the environment.
    pub fn from_env() -> Result<Self, FromEnvError> {
        tracing::info!("Reading server options from the environment...");

        let base_url: Option<http::Uri> = env::parse_var(Self::RESTOLOGY_BASE_URL)?;

        match &base_url {
            Some(base_url) => tracing::info!(
                "{} was set: using `{base_url}` as the base URL.",
                Self::RESTOLOGY_BASE_URL
            ),
            None => tracing::warn!(
                "{} was not set: base URL will be derived from the TCP listener address.",
                Self::RESTOLOGY_BASE_URL
            ),
        }

        Ok(Self { base_url })
    }
}
