//! `OxgridServer` builder and accept loop.
//!
//! This is the entry point for running a coordinator. It ties together
//! all the layers: transport → protocol → engine.

use std::sync::Arc;

use oxgrid_engine::RoomRegistry;
use oxgrid_protocol::{Codec, JsonCodec};
use oxgrid_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::OxgridError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry mutex guards only the name → room map; per-room work runs
/// inside each room's own actor task without holding it.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a coordinator.
///
/// # Example
///
/// ```rust,no_run
/// use oxgrid::OxgridServer;
/// use oxgrid_protocol::JsonCodec;
///
/// # async fn run() -> Result<(), oxgrid::OxgridError> {
/// let server = OxgridServer::<JsonCodec>::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct OxgridServerBuilder {
    bind_addr: String,
}

impl OxgridServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Builds the server, binding the listener.
    ///
    /// Uses `JsonCodec` over `WebSocketTransport`.
    pub async fn build(self) -> Result<OxgridServer<JsonCodec>, OxgridError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new()),
            codec: JsonCodec,
        });

        Ok(OxgridServer { transport, state })
    }
}

impl Default for OxgridServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running coordinator.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct OxgridServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C> OxgridServer<C>
where
    C: Codec + Clone,
{
    /// Creates a new builder.
    pub fn builder() -> OxgridServerBuilder {
        OxgridServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), OxgridError> {
        tracing::info!("oxgrid server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
