//! The event vocabulary spoken between clients and the coordinator.
//!
//! Both enums are internally tagged (`{"type": "join-room", ...}`) with
//! kebab-case tags, so a browser client can switch on `msg.type`
//! directly. Inbound room identifiers stay raw `String`s — they are
//! normalized by the registry, not the codec — while every outbound
//! event carries already-normalized [`RoomName`]s.

use serde::{Deserialize, Serialize};

use crate::{GameSnapshot, Mark, RoomName, Seats};

/// An inbound event from a client. The sender's [`ClientId`] is implied
/// by the connection the event arrived on, never carried in the payload.
///
/// [`ClientId`]: crate::ClientId
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join (or create) the room with this raw identifier.
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },

    /// Leave the current room, if any.
    LeaveRoom,

    /// Place a marker at `index` (row-major, 0–8) in the named room.
    ///
    /// `index` is deliberately wide: out-of-range values must reach the
    /// engine so it can drop them silently instead of failing decode.
    #[serde(rename_all = "camelCase")]
    PlayerMove { room_id: String, index: i64 },

    /// Offer a rematch to the opponent. Informational only.
    RequestRematch,

    /// Accept a rematch: reset the room and start a fresh game.
    AcceptRematch,
}

/// An outbound event from the coordinator to one or more room members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Sent to the joiner only: its assigned role and the seat map.
    #[serde(rename_all = "camelCase")]
    JoinedRoom {
        room_id: RoomName,
        role: Mark,
        players: Seats,
    },

    /// Sent to the sender only when a join is rejected.
    RoomJoinError { message: String },

    /// Room-wide: one seat is still vacant.
    WaitingForPlayer(GameSnapshot),

    /// Room-wide: both seats filled, a fresh game is underway.
    GameStarted(GameSnapshot),

    /// Room-wide: the authoritative state after an accepted move.
    GameState(GameSnapshot),

    /// Sent to the remaining occupant when its opponent departs.
    OpponentLeft,

    /// Sent to the other occupant when a rematch is offered.
    RematchRequested,
}
