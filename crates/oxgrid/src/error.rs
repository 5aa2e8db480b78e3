//! Unified error type for the oxgrid server.

use oxgrid_engine::RoomError;
use oxgrid_protocol::ProtocolError;
use oxgrid_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum OxgridError {
    /// A transport-level error (accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (full, already joined, empty name).
    #[error(transparent)]
    Room(#[from] RoomError),
}
