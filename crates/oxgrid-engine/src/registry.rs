//! Room registry: resolves normalized room names to live room actors.
//!
//! The registry is the single owner of all rooms. Rooms are created
//! lazily on first join and evicted the moment the last seat is
//! vacated — an empty room never outlives the operation that emptied
//! it. It also tracks which room each connection occupies, which is
//! what makes implicit migration and disconnect cleanup possible.

use std::collections::HashMap;

use oxgrid_protocol::{ClientId, Mark, RoomName};

use crate::room::{EventSender, RoomHandle, spawn_room};
use crate::RoomError;

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Owns every live room and the connection → room index.
///
/// Not internally synchronized: callers serialize access (the server
/// keeps it behind a mutex). Each room still has its own serialization
/// point — its actor task — so unrelated rooms never contend on game
/// state, only on this map.
#[derive(Default)]
pub struct RoomRegistry {
    /// Live rooms, keyed by normalized name.
    rooms: HashMap<RoomName, RoomHandle>,

    /// The room each connection currently occupies. A connection is in
    /// at most one room at a time (key invariant).
    memberships: HashMap<ClientId, RoomName>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins a connection to the room named by `raw`, normalizing the
    /// identifier and creating the room if it does not exist yet.
    ///
    /// A connection already seated in a *different* room is first fully
    /// removed from it, exactly as if it had sent an explicit leave —
    /// it can never occupy two rooms at once. Joining the room it is
    /// already in is rejected without any state change.
    ///
    /// On success the room has already queued the join confirmation and
    /// the resulting broadcast on the members' channels; the returned
    /// pair is for the caller's own bookkeeping.
    pub async fn join(
        &mut self,
        client: ClientId,
        raw: &str,
        sender: EventSender,
    ) -> Result<(RoomName, Mark), RoomError> {
        let name = RoomName::parse(raw).ok_or(RoomError::EmptyRoomName)?;

        if let Some(current) = self.memberships.get(&client) {
            if *current == name {
                return Err(RoomError::AlreadyInRoom(name));
            }
            self.leave(client).await;
        }

        let handle = self
            .rooms
            .entry(name.clone())
            .or_insert_with(|| spawn_room(name.clone(), DEFAULT_CHANNEL_SIZE))
            .clone();

        match handle.join(client, sender).await {
            Ok(mark) => {
                self.memberships.insert(client, name.clone());
                Ok((name, mark))
            }
            Err(err) => {
                if matches!(err, RoomError::Unavailable(_)) {
                    // Stale handle from a dead actor: drop it so the
                    // next join recreates the room.
                    self.evict(&name);
                }
                Err(err)
            }
        }
    }

    /// Removes a connection from its current room, if any.
    ///
    /// Used for explicit `leave-room` events and transport disconnects
    /// alike. Evicts the room when this vacates its last reachable
    /// occupant.
    pub async fn leave(&mut self, client: ClientId) {
        let Some(name) = self.memberships.remove(&client) else {
            return;
        };
        let Some(handle) = self.rooms.get(&name) else {
            return;
        };

        let vacated = handle.leave(client).await.unwrap_or(true);
        if vacated {
            self.evict(&name);
            tracing::info!(room = %name, "room evicted");
        }
    }

    /// Routes a move attempt to the room named by `raw`.
    ///
    /// An empty or unknown room name means the move references nothing
    /// and is dropped silently, like every other stale move.
    pub async fn play(&self, client: ClientId, raw: &str, index: i64) {
        let Some(name) = RoomName::parse(raw) else {
            return;
        };
        let Some(handle) = self.rooms.get(&name) else {
            return;
        };
        let _ = handle.play(client, index).await;
    }

    /// Routes a rematch offer to the sender's current room, if any.
    pub async fn request_rematch(&self, client: ClientId) {
        if let Some(handle) = self.room_of(client) {
            let _ = handle.request_rematch(client).await;
        }
    }

    /// Routes a rematch acceptance to the sender's current room, if any.
    pub async fn accept_rematch(&self, client: ClientId) {
        if let Some(handle) = self.room_of(client) {
            let _ = handle.accept_rematch(client).await;
        }
    }

    /// Returns the room the connection currently occupies.
    pub fn membership(&self, client: ClientId) -> Option<&RoomName> {
        self.memberships.get(&client)
    }

    /// Returns `true` if a room with this normalized name is live.
    pub fn contains(&self, name: &RoomName) -> bool {
        self.rooms.contains_key(name)
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn room_of(&self, client: ClientId) -> Option<&RoomHandle> {
        self.memberships
            .get(&client)
            .and_then(|name| self.rooms.get(name))
    }

    /// Drops a room handle and every membership pointing at it.
    /// Closing the command channel stops the actor.
    fn evict(&mut self, name: &RoomName) {
        self.rooms.remove(name);
        self.memberships.retain(|_, room| room != name);
    }
}
