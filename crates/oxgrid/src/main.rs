//! Coordinator binary: bind, listen, run until terminated.

use oxgrid::{OxgridError, OxgridServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), OxgridError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("OXGRID_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let server = OxgridServer::<oxgrid_protocol::JsonCodec>::builder()
        .bind(&addr)
        .build()
        .await?;
    tracing::info!(%addr, "oxgrid listening");
    server.run().await
}
