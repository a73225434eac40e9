//! # CTN Register Sandbox
//!
//! An in-memory stand-in for the register REST API, built on `Axum` with `OpenAPI` docs served
//! by Scalar at `/api`. The portal's end-to-end suite and local development run against it.
//!
//! ## Example
//! ```no_run
//! use ctn_sandbox::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(4583)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

pub mod error;
pub mod extract;
mod handlers;
pub mod register;
pub mod router;
mod seed;
pub mod state;

use anyhow::{Context, Result};
use axum_server::Handle;
use ctn::domain::config::SandboxConfig;
use state::SandboxState;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: SandboxConfig,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: SandboxConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// `0` binds an ephemeral port; see [`Server::spawn`].
    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    pub fn seed(mut self, seed: bool) -> Self {
        self.cfg.seed = seed;
        self
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let metadata = ssl.key.metadata()?;
                if metadata.permissions().mode() & 0o077 != 0 {
                    tracing::warn!(
                        "SECURITY: SSL Private Key {} has insecure permissions (should be 600)",
                        ssl.key.display()
                    );
                }
            }
        }
        Ok(())
    }

    /// Consumes the builder and loads the register.
    ///
    /// # Errors
    /// * SSL certificate/key files are missing.
    /// * A fixture fails to load.
    #[allow(clippy::unused_async)]
    pub async fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;

        info!(
            address = %self.cfg.server.address,
            port = self.cfg.server.port,
            seed = self.cfg.seed,
            "Initializing sandbox"
        );

        let state = SandboxState::new(self.cfg).context("Failed to load register fixtures")?;
        Ok(Server { state })
    }
}

/// A fully initialized server bound to its address.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: SandboxState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Starts serving and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Serving fails or the TLS certificates cannot be loaded.
    pub async fn run(self) -> Result<()> {
        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        self.serve(handle).await
    }

    /// Serves in the background and resolves once the listener is bound.
    ///
    /// Port `0` picks a free port; the returned address carries the real one. Stop the server
    /// through the returned handle.
    ///
    /// # Errors
    /// The listener could not be bound.
    pub async fn spawn(self) -> Result<(SocketAddr, Handle<SocketAddr>)> {
        let handle = Handle::<SocketAddr>::new();
        let serving = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = self.serve(serving).await {
                error!("Sandbox stopped: {e:#}");
            }
        });

        let address = handle.listening().await.context("Sandbox failed to bind")?;
        Ok((address, handle))
    }

    /// Serves until `handle` shuts the server down.
    ///
    /// # Errors
    /// Serving fails or the TLS certificates cannot be loaded.
    pub async fn serve(self, handle: Handle<SocketAddr>) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        let app = router::init(self.state);

        if let Some(ssl_config) = &cfg.server.ssl {
            info!("Starting HTTPS sandbox on https://{address}");

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &ssl_config.cert,
                &ssl_config.key,
            )
            .await
            .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Starting HTTP sandbox on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }

        info!("Sandbox shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &SandboxState {
        &self.state
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
