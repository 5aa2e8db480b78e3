//! Wire protocol for oxgrid.
//!
//! This crate defines the language that clients and the coordinator
//! speak:
//!
//! - **Types** ([`ClientId`], [`RoomName`], [`Mark`], [`GameSnapshot`],
//!   etc.) — identities and the sanitized session projection.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — the inbound and
//!   outbound event vocabulary, plus [`Recipient`] delivery targets.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are
//!   converted to and from bytes.
//!
//! The protocol layer knows nothing about connections or rooms — it
//! only defines shapes and how to (de)serialize them.

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent};
pub use types::{ClientId, GameSnapshot, Mark, Recipient, RoomName, Seats, Winner};
