//! Room actor: an isolated tokio task that owns one game session.
//!
//! Every room runs in its own task and is driven purely through an mpsc
//! command channel, so all joins, leaves, moves, and rematch events for
//! one room are linearized — no two operations ever interleave their
//! reads and writes of the same session, and two connections racing to
//! join resolve deterministically by arrival order on the channel.

use std::collections::HashMap;

use oxgrid_protocol::{ClientId, Mark, Recipient, RoomName, ServerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::{GameSession, RoomError};

/// Channel sender carrying outbound events to one connection.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Seat a connection and register its outbound channel.
    Join {
        client: ClientId,
        sender: EventSender,
        reply: oneshot::Sender<Result<Mark, RoomError>>,
    },

    /// Vacate a connection's seat. The reply reports whether the room
    /// is now fully vacated and should be evicted from the registry.
    Leave {
        client: ClientId,
        reply: oneshot::Sender<bool>,
    },

    /// A move attempt. Fire-and-forget: invalid moves are dropped.
    Move { client: ClientId, index: i64 },

    /// Offer a rematch to the other occupant.
    RequestRematch { client: ClientId },

    /// Accept a rematch: reset the board and restart play.
    AcceptRematch { client: ClientId },
}

/// Handle to a running room actor. Cheap to clone; the registry holds
/// one per room.
#[derive(Clone)]
pub struct RoomHandle {
    name: RoomName,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's normalized name.
    pub fn name(&self) -> &RoomName {
        &self.name
    }

    /// Sends a join request and waits for the seat assignment.
    pub async fn join(
        &self,
        client: ClientId,
        sender: EventSender,
    ) -> Result<Mark, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                client,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))?
    }

    /// Sends a leave request. Returns `true` if the room is now fully
    /// vacated.
    pub async fn leave(&self, client: ClientId) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                client,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))
    }

    /// Delivers a move attempt (fire-and-forget).
    pub async fn play(&self, client: ClientId, index: i64) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Move { client, index })
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))
    }

    /// Delivers a rematch offer (fire-and-forget).
    pub async fn request_rematch(&self, client: ClientId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::RequestRematch { client })
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))
    }

    /// Delivers a rematch acceptance (fire-and-forget).
    pub async fn accept_rematch(&self, client: ClientId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::AcceptRematch { client })
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))
    }
}

/// The internal room actor state. Runs inside a tokio task.
struct RoomActor {
    session: GameSession,
    /// Per-member outbound channels.
    senders: HashMap<ClientId, EventSender>,
    receiver: mpsc::Receiver<RoomCommand>,
    name: RoomName,
}

impl RoomActor {
    /// Runs the actor loop until the room is vacated or the registry
    /// drops the handle.
    async fn run(mut self) {
        tracing::debug!(room = %self.name, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    client,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(client, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { client, reply } => {
                    let vacated = self.handle_leave(client);
                    let _ = reply.send(vacated);
                    if vacated {
                        break;
                    }
                }
                RoomCommand::Move { client, index } => {
                    self.handle_move(client, index);
                }
                RoomCommand::RequestRematch { client } => {
                    self.handle_request_rematch(client);
                }
                RoomCommand::AcceptRematch { client } => {
                    self.handle_accept_rematch(client);
                }
            }
        }

        tracing::debug!(room = %self.name, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        client: ClientId,
        sender: EventSender,
    ) -> Result<Mark, RoomError> {
        if self.session.mark_of(client).is_some() {
            return Err(RoomError::AlreadyInRoom(self.name.clone()));
        }
        let Some(mark) = self.session.seat(client) else {
            return Err(RoomError::RoomFull(self.name.clone()));
        };
        self.senders.insert(client, sender);
        tracing::info!(room = %self.name, %client, role = %mark, "player joined");

        // The joiner's confirmation goes through the same queue as the
        // broadcasts below, so it is always observed first.
        self.emit(
            Recipient::Client(client),
            ServerEvent::JoinedRoom {
                room_id: self.name.clone(),
                role: mark,
                players: self.session.seats(),
            },
        );

        if self.session.started() {
            tracing::info!(room = %self.name, "game started");
            self.emit(Recipient::All, ServerEvent::GameStarted(self.session.snapshot()));
            self.emit(Recipient::All, ServerEvent::GameState(self.session.snapshot()));
        } else {
            self.emit(
                Recipient::All,
                ServerEvent::WaitingForPlayer(self.session.snapshot()),
            );
        }

        Ok(mark)
    }

    /// Vacates the connection's seat. Returns `true` when the room is
    /// fully vacated — either no seat is held anymore, or the remaining
    /// occupant's channel is already closed and it can never hear the
    /// notification.
    fn handle_leave(&mut self, client: ClientId) -> bool {
        let Some(mark) = self.session.vacate(client) else {
            return self.session.is_vacant();
        };
        self.senders.remove(&client);
        tracing::info!(room = %self.name, %client, role = %mark, "player left");

        let remaining = self.session.seats().occupant(mark.other());
        let reachable = remaining
            .and_then(|other| self.senders.get(&other))
            .is_some_and(|sender| !sender.is_closed());

        if let (Some(other), true) = (remaining, reachable) {
            self.emit(Recipient::Client(other), ServerEvent::OpponentLeft);
            self.emit(
                Recipient::All,
                ServerEvent::WaitingForPlayer(self.session.snapshot()),
            );
            false
        } else {
            true
        }
    }

    fn handle_move(&mut self, client: ClientId, index: i64) {
        if self.session.apply_move(client, index) {
            self.emit(Recipient::All, ServerEvent::GameState(self.session.snapshot()));
        } else {
            tracing::debug!(room = %self.name, %client, index, "move dropped");
        }
    }

    fn handle_request_rematch(&mut self, client: ClientId) {
        if self.session.mark_of(client).is_none() {
            return;
        }
        // Informational only: tell the other occupant, mutate nothing.
        self.emit(Recipient::AllExcept(client), ServerEvent::RematchRequested);
    }

    fn handle_accept_rematch(&mut self, client: ClientId) {
        if self.session.mark_of(client).is_none() {
            return;
        }
        self.session.reset();
        tracing::info!(room = %self.name, "game started");
        self.emit(Recipient::All, ServerEvent::GameStarted(self.session.snapshot()));
        self.emit(Recipient::All, ServerEvent::GameState(self.session.snapshot()));
    }

    /// Delivers an event to the matching member channels. A closed
    /// channel just drops the event — the member is mid-disconnect.
    fn emit(&self, recipient: Recipient, event: ServerEvent) {
        match recipient {
            Recipient::All => {
                for sender in self.senders.values() {
                    let _ = sender.send(event.clone());
                }
            }
            Recipient::Client(client) => {
                if let Some(sender) = self.senders.get(&client) {
                    let _ = sender.send(event);
                }
            }
            Recipient::AllExcept(excluded) => {
                for (client, sender) in &self.senders {
                    if *client != excluded {
                        let _ = sender.send(event.clone());
                    }
                }
            }
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(name: RoomName, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        session: GameSession::new(name.clone()),
        senders: HashMap::new(),
        receiver: rx,
        name: name.clone(),
    };

    tokio::spawn(actor.run());

    RoomHandle { name, sender: tx }
}
