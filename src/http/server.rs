//! HTTP server that binds the router to a TCP socket.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::engine::Engine;
use crate::http::error::HttpTransportError;
use crate::http::router::{build_router, AppState};
use crate::signal::shutdown_signal;

/// Axum-based HTTP server over a shared [`Engine`].
pub struct HttpServer {
    addr: SocketAddr,
    state: AppState,
}

impl HttpServer {
    /// Creates a server that will listen on `addr`.
    #[must_use]
    pub fn new(engine: Arc<Engine>, addr: SocketAddr) -> Self {
        Self {
            addr,
            state: AppState { engine },
        }
    }

    /// Address the server binds to.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves until SIGINT/SIGTERM, then drains in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run(self) -> Result<(), HttpTransportError> {
        self.run_until(async {
            match shutdown_signal().await {
                Ok(name) => info!(signal = name, "Received shutdown signal, draining HTTP server"),
                Err(e) => {
                    error!(error = %e, "Failed to install signal handlers; serving until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await
    }

    /// Serves until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), HttpTransportError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| HttpTransportError::Bind {
                addr: self.addr.to_string(),
                source: e,
            })?;

        let local = listener.local_addr().unwrap_or(self.addr);
        info!(addr = %local, "HTTP server ready");

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(HttpTransportError::Serve)?;

        info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Registry;

    fn engine() -> Arc<Engine> {
        Arc::new(Engine::new(Registry::empty()))
    }

    #[test]
    fn new_keeps_address() {
        let addr: SocketAddr = "127.0.0.1:3000".parse().unwrap();
        let server = HttpServer::new(engine(), addr);
        assert_eq!(server.addr(), addr);
    }

    #[tokio::test]
    async fn stops_when_shutdown_resolves() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let result = HttpServer::new(engine(), addr).run_until(async {}).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn occupied_port_is_bind_error() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();

        let err = HttpServer::new(engine(), addr)
            .run_until(async {})
            .await
            .unwrap_err();
        assert!(matches!(err, HttpTransportError::Bind { .. }));
    }
}
