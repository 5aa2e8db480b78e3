//! Integration tests for the server, handler, and full connection flow,
//! driven through real WebSocket clients.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use oxgrid::{ClientEvent, Mark, OxgridServerBuilder, ServerEvent, Winner};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns the address.
async fn start_server() -> String {
    let server = OxgridServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send_event(ws: &mut ClientWs, event: &ClientEvent) {
    let bytes = serde_json::to_vec(event).expect("encode");
    ws.send(Message::Binary(bytes.into())).await.expect("send");
}

/// Receives and decodes the next server event, with a timeout.
async fn recv_event(ws: &mut ClientWs) -> ServerEvent {
    let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("timed out waiting for event")
        .expect("stream ended")
        .expect("recv");
    serde_json::from_slice(&msg.into_data()).expect("decode")
}

async fn join(ws: &mut ClientWs, room_id: &str) {
    send_event(
        ws,
        &ClientEvent::JoinRoom {
            room_id: room_id.into(),
        },
    )
    .await;
}

async fn play(ws: &mut ClientWs, room_id: &str, index: i64) {
    send_event(
        ws,
        &ClientEvent::PlayerMove {
            room_id: room_id.into(),
            index,
        },
    )
    .await;
}

/// Connects two players to `room`, drains their setup events, and
/// returns them game-started, X first.
async fn start_game(addr: &str, room: &str) -> (ClientWs, ClientWs) {
    let mut ws1 = connect(addr).await;
    join(&mut ws1, room).await;
    assert!(matches!(
        recv_event(&mut ws1).await,
        ServerEvent::JoinedRoom { role: Mark::X, .. }
    ));
    assert!(matches!(
        recv_event(&mut ws1).await,
        ServerEvent::WaitingForPlayer(_)
    ));

    let mut ws2 = connect(addr).await;
    join(&mut ws2, room).await;
    assert!(matches!(
        recv_event(&mut ws2).await,
        ServerEvent::JoinedRoom { role: Mark::O, .. }
    ));

    for ws in [&mut ws1, &mut ws2] {
        assert!(matches!(recv_event(ws).await, ServerEvent::GameStarted(_)));
        assert!(matches!(recv_event(ws).await, ServerEvent::GameState(_)));
    }
    (ws1, ws2)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_first_join_confirms_and_waits() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    join(&mut ws, "  My  Game ").await;

    match recv_event(&mut ws).await {
        ServerEvent::JoinedRoom { room_id, role, .. } => {
            assert_eq!(room_id.as_str(), "my-game");
            assert_eq!(role, Mark::X);
        }
        other => panic!("expected joined-room, got {other:?}"),
    }
    match recv_event(&mut ws).await {
        ServerEvent::WaitingForPlayer(snapshot) => {
            assert_eq!(snapshot.board, [None; 9]);
            assert!(snapshot.players.o.is_none());
        }
        other => panic!("expected waiting-for-player, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_room_id_rejected() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    join(&mut ws, "   ").await;

    match recv_event(&mut ws).await {
        ServerEvent::RoomJoinError { message } => {
            assert_eq!(message, "Room ID is required.");
        }
        other => panic!("expected room-join-error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_second_join_starts_the_game() {
    let addr = start_server().await;
    let (_ws1, _ws2) = start_game(&addr, "r1").await;
}

#[tokio::test]
async fn test_third_join_gets_room_full() {
    let addr = start_server().await;
    let (_ws1, _ws2) = start_game(&addr, "r1").await;

    let mut ws3 = connect(&addr).await;
    join(&mut ws3, "r1").await;

    match recv_event(&mut ws3).await {
        ServerEvent::RoomJoinError { message } => {
            assert_eq!(message, "Room is full.");
        }
        other => panic!("expected room-join-error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejoining_same_room_rejected() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;
    join(&mut ws, "r1").await;
    recv_event(&mut ws).await; // joined
    recv_event(&mut ws).await; // waiting

    join(&mut ws, "R1").await;
    match recv_event(&mut ws).await {
        ServerEvent::RoomJoinError { message } => {
            assert_eq!(message, "You are already in this room.");
        }
        other => panic!("expected room-join-error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_moves_alternate_and_broadcast() {
    let addr = start_server().await;
    let (mut ws1, mut ws2) = start_game(&addr, "r1").await;

    play(&mut ws1, "r1", 4).await;
    for ws in [&mut ws1, &mut ws2] {
        match recv_event(ws).await {
            ServerEvent::GameState(snapshot) => {
                assert_eq!(snapshot.board[4], Some(Mark::X));
                assert_eq!(snapshot.turn, Mark::O);
                assert_eq!(snapshot.last_move, Some(4));
            }
            other => panic!("expected game-state, got {other:?}"),
        }
    }

    play(&mut ws2, "r1", 0).await;
    for ws in [&mut ws1, &mut ws2] {
        match recv_event(ws).await {
            ServerEvent::GameState(snapshot) => {
                assert_eq!(snapshot.board[0], Some(Mark::O));
                assert_eq!(snapshot.turn, Mark::X);
            }
            other => panic!("expected game-state, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_out_of_turn_move_ignored() {
    let addr = start_server().await;
    let (mut ws1, mut ws2) = start_game(&addr, "r1").await;

    // O tries to move first: dropped without any reply.
    play(&mut ws2, "r1", 0).await;

    // X's move still lands on an empty board, proving the drop.
    play(&mut ws1, "r1", 4).await;
    match recv_event(&mut ws1).await {
        ServerEvent::GameState(snapshot) => {
            assert_eq!(snapshot.board[0], None);
            assert_eq!(snapshot.board[4], Some(Mark::X));
        }
        other => panic!("expected game-state, got {other:?}"),
    }
    recv_event(&mut ws2).await;
}

#[tokio::test]
async fn test_win_detected_and_reported() {
    let addr = start_server().await;
    let (mut ws1, mut ws2) = start_game(&addr, "r1").await;

    // X takes the 0-4-8 diagonal.
    let mut last = None;
    for (x_turn, index) in [(true, 4), (false, 1), (true, 0), (false, 2), (true, 8)] {
        if x_turn {
            play(&mut ws1, "r1", index).await;
        } else {
            play(&mut ws2, "r1", index).await;
        }
        recv_event(&mut ws1).await;
        last = Some(recv_event(&mut ws2).await);
    }

    match last {
        Some(ServerEvent::GameState(snapshot)) => {
            assert_eq!(snapshot.winner, Some(Winner::X));
            assert_eq!(snapshot.winning_line, Some([0, 4, 8]));
            assert_eq!(snapshot.last_move, Some(8));
        }
        other => panic!("expected winning game-state, got {other:?}"),
    }
}

#[tokio::test]
async fn test_disconnect_notifies_opponent() {
    let addr = start_server().await;
    let (ws1, mut ws2) = start_game(&addr, "r1").await;

    drop(ws1);

    assert!(matches!(recv_event(&mut ws2).await, ServerEvent::OpponentLeft));
    match recv_event(&mut ws2).await {
        ServerEvent::WaitingForPlayer(snapshot) => {
            assert!(snapshot.players.x.is_none());
            assert!(snapshot.players.o.is_some());
        }
        other => panic!("expected waiting-for-player, got {other:?}"),
    }
}

#[tokio::test]
async fn test_explicit_leave_notifies_opponent() {
    let addr = start_server().await;
    let (mut ws1, mut ws2) = start_game(&addr, "r1").await;

    send_event(&mut ws1, &ClientEvent::LeaveRoom).await;

    assert!(matches!(recv_event(&mut ws2).await, ServerEvent::OpponentLeft));
    assert!(matches!(
        recv_event(&mut ws2).await,
        ServerEvent::WaitingForPlayer(_)
    ));
}

#[tokio::test]
async fn test_rematch_flow() {
    let addr = start_server().await;
    let (mut ws1, mut ws2) = start_game(&addr, "r1").await;

    // Play X to a quick top-row win.
    for (first, index) in [(true, 0), (false, 3), (true, 1), (false, 4), (true, 2)] {
        if first {
            play(&mut ws1, "r1", index).await;
        } else {
            play(&mut ws2, "r1", index).await;
        }
        recv_event(&mut ws1).await;
        recv_event(&mut ws2).await;
    }

    // Loser offers a rematch: only the opponent hears it.
    send_event(&mut ws2, &ClientEvent::RequestRematch).await;
    assert!(matches!(
        recv_event(&mut ws1).await,
        ServerEvent::RematchRequested
    ));

    // Winner accepts: both see a fresh board.
    send_event(&mut ws1, &ClientEvent::AcceptRematch).await;
    for ws in [&mut ws1, &mut ws2] {
        match recv_event(ws).await {
            ServerEvent::GameStarted(snapshot) => {
                assert_eq!(snapshot.board, [None; 9]);
                assert_eq!(snapshot.turn, Mark::X);
                assert_eq!(snapshot.winner, None);
            }
            other => panic!("expected game-started, got {other:?}"),
        }
        assert!(matches!(recv_event(ws).await, ServerEvent::GameState(_)));
    }

    // X moves first again.
    play(&mut ws1, "r1", 8).await;
    match recv_event(&mut ws2).await {
        ServerEvent::GameState(snapshot) => {
            assert_eq!(snapshot.board[8], Some(Mark::X));
        }
        other => panic!("expected game-state, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_frame_skipped() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    ws.send(Message::Binary(b"not json".to_vec().into()))
        .await
        .expect("send");

    // The connection survives: a valid join still works.
    join(&mut ws, "r1").await;
    assert!(matches!(
        recv_event(&mut ws).await,
        ServerEvent::JoinedRoom { .. }
    ));
}

#[tokio::test]
async fn test_text_frames_accepted() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    ws.send(Message::Text(
        r#"{"type": "join-room", "roomId": "Textual"}"#.into(),
    ))
    .await
    .expect("send");

    match recv_event(&mut ws).await {
        ServerEvent::JoinedRoom { room_id, .. } => {
            assert_eq!(room_id.as_str(), "textual");
        }
        other => panic!("expected joined-room, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rooms_are_independent() {
    let addr = start_server().await;
    let (mut a1, _a2) = start_game(&addr, "alpha").await;
    let (mut b1, mut b2) = start_game(&addr, "beta").await;

    play(&mut b1, "beta", 4).await;
    match recv_event(&mut b2).await {
        ServerEvent::GameState(snapshot) => {
            assert_eq!(snapshot.room_id.as_str(), "beta");
            assert_eq!(snapshot.board[4], Some(Mark::X));
        }
        other => panic!("expected game-state, got {other:?}"),
    }

    // Nothing leaks into alpha; its X can still open normally.
    play(&mut a1, "alpha", 0).await;
    match recv_event(&mut a1).await {
        ServerEvent::GameState(snapshot) => {
            assert_eq!(snapshot.room_id.as_str(), "alpha");
            assert_eq!(snapshot.board.iter().filter(|c| c.is_some()).count(), 1);
        }
        other => panic!("expected game-state, got {other:?}"),
    }
}
