//! # oxgrid
//!
//! Real-time two-player tic-tac-toe session coordinator.
//!
//! Clients connect over WebSocket, rendezvous in named rooms, and play
//! server-authoritative games: the coordinator assigns roles, validates
//! moves, detects wins and draws, and brokers rematches. All state is
//! in-memory and scoped to live connections.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oxgrid::OxgridServer;
//! use oxgrid_protocol::JsonCodec;
//!
//! # async fn run() -> Result<(), oxgrid::OxgridError> {
//! let server = OxgridServer::<JsonCodec>::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::OxgridError;
pub use server::{OxgridServer, OxgridServerBuilder};

pub use oxgrid_engine::{GameSession, RoomError, RoomRegistry, WIN_LINES};
pub use oxgrid_protocol::{
    ClientEvent, ClientId, GameSnapshot, Mark, RoomName, Seats, ServerEvent,
    Winner,
};
pub use oxgrid_transport::{TransportError, WebSocketTransport};
