//! Core wire types shared by the engine, transport, and server layers.
//!
//! Everything here either travels on the wire (snapshots, ids, marks)
//! or describes where an outbound event should be delivered
//! ([`Recipient`]).

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A transient identity for one connected client.
///
/// Assigned by the transport when a connection is accepted, and valid
/// only for the lifetime of that connection. This handle is the whole
/// identity story — there is no account or token behind it.
///
/// `#[serde(transparent)]` makes `ClientId(42)` serialize as plain `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// A normalized room identifier.
///
/// Two raw identifiers that normalize identically name the same room,
/// so a `RoomName` is only ever constructed through [`RoomName::parse`]:
/// surrounding whitespace is trimmed, internal whitespace runs collapse
/// to a single `-`, and the result is lowercased. An identifier that is
/// empty after normalization does not name a room at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    /// Normalizes a raw client-supplied identifier.
    ///
    /// Returns `None` if nothing remains after normalization.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// Returns the normalized identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Marks and outcomes
// ---------------------------------------------------------------------------

/// A player's role marker. `X` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::O => f.write_str("O"),
        }
    }
}

/// The terminal outcome of a game: a winning mark, or a draw.
///
/// Serialized as `"X"`, `"O"`, or `"draw"` — the lowercase draw marker
/// is part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    X,
    O,
    #[serde(rename = "draw")]
    Draw,
}

impl From<Mark> for Winner {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

// ---------------------------------------------------------------------------
// Seats
// ---------------------------------------------------------------------------

/// The role → connection mapping for one room.
///
/// Each seat is either vacant or held by exactly one connection. The
/// serialized form uses the mark letters as keys (`{"X": 1, "O": null}`),
/// which is exactly what room members already see in snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    #[serde(rename = "X")]
    pub x: Option<ClientId>,
    #[serde(rename = "O")]
    pub o: Option<ClientId>,
}

impl Seats {
    /// Returns the connection holding the given seat, if any.
    pub fn occupant(&self, mark: Mark) -> Option<ClientId> {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Returns the seat held by the given connection, if any.
    pub fn mark_of(&self, client: ClientId) -> Option<Mark> {
        if self.x == Some(client) {
            Some(Mark::X)
        } else if self.o == Some(client) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Seats the connection in the first vacant seat, X before O.
    ///
    /// Returns `None` when both seats are held; nothing changes.
    pub fn assign(&mut self, client: ClientId) -> Option<Mark> {
        if self.x.is_none() {
            self.x = Some(client);
            Some(Mark::X)
        } else if self.o.is_none() {
            self.o = Some(client);
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Vacates whichever seat the connection holds.
    ///
    /// Returns the seat it held, or `None` if it held neither.
    pub fn vacate(&mut self, client: ClientId) -> Option<Mark> {
        match self.mark_of(client)? {
            Mark::X => {
                self.x = None;
                Some(Mark::X)
            }
            Mark::O => {
                self.o = None;
                Some(Mark::O)
            }
        }
    }

    /// Returns `true` when both seats are held.
    pub fn both_held(&self) -> bool {
        self.x.is_some() && self.o.is_some()
    }

    /// Returns `true` when neither seat is held.
    pub fn is_vacant(&self) -> bool {
        self.x.is_none() && self.o.is_none()
    }
}

// ---------------------------------------------------------------------------
// GameSnapshot
// ---------------------------------------------------------------------------

/// An immutable, sanitized projection of one room's session state.
///
/// This is the payload of every room-wide broadcast. It never exposes
/// anything beyond what room members may see: the board, whose turn it
/// is, the outcome, and the two seat assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// The normalized room identifier.
    pub room_id: RoomName,
    /// The 9 cells in row-major order, index 0 top-left.
    pub board: [Option<Mark>; 9],
    /// The mark whose move is currently accepted.
    pub turn: Mark,
    /// The outcome, once terminal. Frozen until a rematch resets it.
    pub winner: Option<Winner>,
    /// The winning triple's cell indices. Never set for a draw.
    pub winning_line: Option<[usize; 3]>,
    /// The seat assignments.
    pub players: Seats,
    /// Index of the most recently placed cell, for UI highlighting.
    pub last_move: Option<usize>,
}

// ---------------------------------------------------------------------------
// Recipient — who should receive an outbound event?
// ---------------------------------------------------------------------------

/// Delivery target for an outbound event.
///
/// The engine emits `(Recipient, ServerEvent)` pairs; the server layer
/// fans each one out to the matching connections. Never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connection in the room.
    All,
    /// One specific connection.
    Client(ClientId),
    /// Every connection in the room except one.
    AllExcept(ClientId),
}
