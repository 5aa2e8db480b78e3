//! Error types for the room layer.
//!
//! The `Display` strings double as the human-readable reasons carried
//! by `room-join-error` events, so they are phrased for end users.

use oxgrid_protocol::RoomName;

/// Errors that can occur during room operations.
///
/// Only join attempts surface errors to clients; every other invalid
/// event is silently dropped as stale.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room identifier was empty after normalization.
    #[error("Room ID is required.")]
    EmptyRoomName,

    /// The connection already holds a seat in this exact room.
    #[error("You are already in this room.")]
    AlreadyInRoom(RoomName),

    /// Both seats are held — no third occupant.
    #[error("Room is full.")]
    RoomFull(RoomName),

    /// The room's command channel is closed or full.
    #[error("Room {0} is unavailable.")]
    Unavailable(RoomName),
}
