use std::{future::Future, net::SocketAddr, pin::Pin, sync::Arc};

#[cfg(feature = "auto-reload")]
pub mod auto_reload;

mod options;

use axum::Router;
pub use options::ServerOptions;

/// The server information.
///
/// This information is made available to resource actions through request extensions.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// The base URL of the server.
    pub base_url: http::Uri,
}

/// A server builder.
pub struct ServerBuilder {
    /// The TCP listener that the server is using.
    listener: tokio::net::TcpListener,

    /// The graceful shutdown signal.
    graceful_shutdown: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,

    /// The options for the server.
    options: ServerOptions,
}

/// A server, serving the routes of resource routers.
///
/// All the resources must be added to their routers before serving: routes cannot be added once
/// the server accepts requests.
pub struct Server {
    listener: tokio::net::TcpListener,
    graceful_shutdown: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,
    options: ServerOptions,
}

/// An error that can occur when instantiating a server with auto-reload features.
#[cfg(feature = "auto-reload")]
#[derive(Debug, thiserror::Error)]
pub enum NewWithAutoReloadError {
    /// An error occurred while trying to get a TCP listener.
    #[error("failed to get a TCP listener: {0}")]
    GetTcpListener(#[from] auto_reload::GetTcpListenerError),
}

/// An error that can occur when trying to serve the application.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// An error occurred while trying to serve the application.
    #[error("failed to serve the application: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while trying to get the local address of the listener.
    #[error("failed to get the local address of the listener: {0}")]
    LocalAddr(std::io::Error),
}

impl ServerBuilder {
    /// Set the options on the server.
    pub fn with_options(mut self, options: ServerOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the options on the server from the environment.
    pub fn with_options_from_env(mut self) -> Result<Self, crate::FromEnvError> {
        self.options = ServerOptions::from_env()?;

        Ok(self)
    }

    /// Set the graceful shutdown signal.
    pub fn with_graceful_shutdown(
        mut self,
        signal: impl Future<Output = ()> + Send + 'static,
    ) -> Self {
        self.graceful_shutdown = Some(Box::pin(signal));
        self
    }

    /// Set the graceful shutdown signal to `ctrl-c`.
    #[cfg(feature = "auto-reload")]
    pub fn with_ctrl_c_graceful_shutdown(self) -> Self {
        self.with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to register for `ctrl-c` signal: {err}");
            }

            tracing::info!("Received `ctrl-c` signal, shutting down gracefully.");
        })
    }

    /// Build the server.
    pub fn build(self) -> Server {
        Server {
            listener: self.listener,
            graceful_shutdown: self.graceful_shutdown,
            options: self.options,
        }
    }
}

impl Server {
    /// Get a builder for the server.
    pub fn builder(listener: tokio::net::TcpListener) -> ServerBuilder {
        ServerBuilder {
            listener,
            graceful_shutdown: None,
            options: Default::default(),
        }
    }

    /// Get a builder for a development server.
    ///
    /// Takes the TCP listener passed through `listenfd` if any, falling back to binding to `addr`,
    /// and shuts down gracefully on `ctrl-c`.
    #[cfg(feature = "auto-reload")]
    pub async fn builder_with_auto_reload(
        addr: impl tokio::net::ToSocketAddrs,
    ) -> Result<ServerBuilder, NewWithAutoReloadError> {
        let listener = auto_reload::get_or_bind_tcp_listener(addr).await?;

        Ok(Self::builder(listener).with_ctrl_c_graceful_shutdown())
    }

    /// Serve the specified router.
    ///
    /// Accepts a [`crate::ResourceRouter`] as well as any axum router, typically the merge of
    /// several resource routers.
    pub async fn serve(self, router: impl Into<Router>) -> Result<(), ServeError> {
        let local_addr = self.listener.local_addr().map_err(ServeError::LocalAddr)?;

        tracing::info!("Server listening on TCP/{local_addr}.");

        let base_url = match self.options.base_url {
            Some(base_url) => base_url,
            None => Self::base_url_from(local_addr),
        };

        let server_info = Arc::new(ServerInfo { base_url });

        tracing::info!("Now serving resources at `{}`...", server_info.base_url);

        let router: Router = router.into();
        let router = router.layer(axum::extract::Extension(server_info));

        let serve = axum::serve(self.listener, router);

        match self.graceful_shutdown {
            Some(signal) => serve.with_graceful_shutdown(signal).await,
            None => serve.await,
        }
        .map_err(Into::into)
    }

    /// Derive the base URL from the local address.
    fn base_url_from(local_addr: SocketAddr) -> http::Uri {
        let url = if local_addr.ip().is_unspecified() {
            tracing::warn!(
                "Local address `{local_addr}` is unspecified, using `localhost` for the base URL."
            );

            format!("http://localhost:{}", local_addr.port())
        } else {
            format!("http://{local_addr}")
        };

        url.parse().expect("URL built from a socket address is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_from() {
        assert_eq!(
            Server::base_url_from("127.0.0.1:3000".parse().unwrap()).to_string(),
            "http://127.0.0.1:3000/"
        );
        assert_eq!(
            Server::base_url_from("0.0.0.0:8080".parse().unwrap()).to_string(),
            "http://localhost:8080/"
        );
        assert_eq!(
            Server::base_url_from("[::1]:8080".parse().unwrap()).to_string(),
            "http://[::1]:8080/"
        );
    }
}
