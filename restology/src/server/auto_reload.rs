//! Listener hand-off for auto-reloading development servers.
//!
//! Works with [systemfd](https://github.com/mitsuhiko/systemfd), which keeps the socket open across
//! restarts and passes it through [listenfd](https://github.com/mitsuhiko/listenfd).

use listenfd::ListenFd;
use tokio::net::{TcpListener, ToSocketAddrs};

/// An error that can occur when trying to get a TCP listener.
#[derive(Debug, thiserror::Error)]
pub enum GetTcpListenerError {
    /// The listener passed by `listenfd` could not be taken.
    #[error("failed to take the listener passed by `listenfd`: {0}")]
    ListenFd(#[source] std::io::Error),

    /// The listener passed by `listenfd` could not be turned into a Tokio listener.
    #[error("failed to use the listener passed by `listenfd`: {0}")]
    Convert(#[source] std::io::Error),

    /// Binding to the fallback address failed.
    #[error("failed to bind to a local address: {0}")]
    Bind(#[source] std::io::Error),
}

/// Take the TCP listener passed by `listenfd`, or bind to `addr` if there is none.
pub async fn get_or_bind_tcp_listener(
    addr: impl ToSocketAddrs,
) -> Result<TcpListener, GetTcpListenerError> {
    let inherited = ListenFd::from_env()
        .take_tcp_listener(0)
        .map_err(GetTcpListenerError::ListenFd)?;

    let Some(listener) = inherited else {
        tracing::debug!("No listener passed by `listenfd`, binding instead.");

        return TcpListener::bind(addr)
            .await
            .map_err(GetTcpListenerError::Bind);
    };

    tracing::debug!("Using the listener passed by `listenfd`.");

    listener
        .set_nonblocking(true)
        .and_then(|()| TcpListener::from_std(listener))
        .map_err(GetTcpListenerError::Convert)
}
