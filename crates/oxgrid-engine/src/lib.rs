//! Session coordination core for oxgrid.
//!
//! Two layers, both free of any I/O beyond channel sends:
//!
//! - [`GameSession`] — the pure per-room state machine: seating, move
//!   validation, turn alternation, win/draw detection, rematch reset.
//! - [`RoomRegistry`] + room actors — room lifecycle and the per-room
//!   serialization point. Each room is one tokio task; the registry
//!   resolves normalized names to handles, creates rooms lazily, and
//!   evicts them as soon as they are vacated.
//!
//! Outbound side effects are expressed as
//! [`ServerEvent`](oxgrid_protocol::ServerEvent)s queued on per-member
//! channels; the server layer delivers them.

mod error;
mod game;
mod registry;
mod room;

pub use error::RoomError;
pub use game::{GameSession, WIN_LINES};
pub use registry::RoomRegistry;
pub use room::{EventSender, RoomHandle};
