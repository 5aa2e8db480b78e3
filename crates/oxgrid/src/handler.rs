//! Per-connection handler: decode, dispatch, deliver.
//!
//! Each accepted connection gets its own tokio task running this
//! handler. Outbound events arrive on an unbounded per-connection
//! channel — room actors only ever queue, never touch the socket — and
//! one `select!` loop both drains that queue and reads inbound frames,
//! so the connection is driven from a single task.

use std::sync::Arc;

use oxgrid_engine::EventSender;
use oxgrid_protocol::{ClientEvent, ClientId, Codec, ServerEvent};
use oxgrid_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::OxgridError;
use crate::server::ServerState;

/// Drop guard that removes a connection from its room when the handler
/// exits, however it exits.
///
/// Covers abrupt socket loss and clean closes alike: the departure path
/// is identical to an explicit `leave-room`. Since `Drop` is
/// synchronous, the async registry work runs in a fire-and-forget task.
struct LeaveGuard<C: Codec> {
    client: ClientId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for LeaveGuard<C> {
    fn drop(&mut self) {
        let client = self.client;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.registry.lock().await.leave(client).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), OxgridError> {
    let client = conn.id();
    tracing::debug!(%client, "handling new connection");

    // All outbound events for this connection funnel through one queue.
    // The room actor and the error replies below share it, so a client
    // always observes its join confirmation before any broadcast.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let _guard = LeaveGuard {
        client,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            outbound = rx.recv() => {
                // The sender half lives in this scope, so the queue can
                // never yield `None` here; guard anyway.
                let Some(event) = outbound else { break };
                let bytes = state.codec.encode(&event)?;
                if let Err(e) = conn.send(&bytes).await {
                    tracing::debug!(%client, error = %e, "send failed");
                    break;
                }
            }

            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%client, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%client, error = %e, "recv error");
                        break;
                    }
                };

                let event: ClientEvent = match state.codec.decode(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        // Malformed frames never kill the connection.
                        tracing::debug!(
                            %client, error = %e, "failed to decode event"
                        );
                        continue;
                    }
                };

                dispatch(&state, client, &tx, event).await;
            }
        }
    }

    // _guard drops here → room departure fires.
    Ok(())
}

/// Routes one decoded client event into the engine.
///
/// Only join failures produce a reply; every other invalid event is
/// dropped inside the engine without a response.
async fn dispatch<C: Codec>(
    state: &Arc<ServerState<C>>,
    client: ClientId,
    tx: &EventSender,
    event: ClientEvent,
) {
    match event {
        ClientEvent::JoinRoom { room_id } => {
            let result = {
                let mut registry = state.registry.lock().await;
                registry.join(client, &room_id, tx.clone()).await
            };
            if let Err(e) = result {
                tracing::debug!(%client, error = %e, "join rejected");
                let _ = tx.send(ServerEvent::RoomJoinError {
                    message: e.to_string(),
                });
            }
        }

        ClientEvent::LeaveRoom => {
            state.registry.lock().await.leave(client).await;
        }

        ClientEvent::PlayerMove { room_id, index } => {
            state
                .registry
                .lock()
                .await
                .play(client, &room_id, index)
                .await;
        }

        ClientEvent::RequestRematch => {
            state.registry.lock().await.request_rematch(client).await;
        }

        ClientEvent::AcceptRematch => {
            state.registry.lock().await.accept_rematch(client).await;
        }
    }
}
