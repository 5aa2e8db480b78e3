//! The per-room game session: board, turn order, and terminal outcomes.
//!
//! `GameSession` is a pure state machine — it performs no I/O and knows
//! nothing about connections beyond the opaque [`ClientId`] handles
//! seated in it. The room actor drives it and turns its transitions
//! into outbound events.

use oxgrid_protocol::{ClientId, GameSnapshot, Mark, RoomName, Seats, Winner};

/// The 8 winning triples, checked in exactly this order. The first
/// matching triple decides the winner; later triples are never examined.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// One room's authoritative session state.
///
/// Invariants upheld here:
/// - a non-empty cell never reverts except through [`reset`](Self::reset);
/// - `turn` alternates strictly between accepted moves and freezes once
///   the outcome is set;
/// - `winning_line` is only ever one of [`WIN_LINES`] and never set for
///   a draw;
/// - `started` is true only while both seats are held (or after a
///   rematch reset, until a seat is vacated).
#[derive(Debug, Clone)]
pub struct GameSession {
    room_id: RoomName,
    board: [Option<Mark>; 9],
    turn: Mark,
    winner: Option<Winner>,
    winning_line: Option<[usize; 3]>,
    players: Seats,
    last_move: Option<usize>,
    started: bool,
}

impl GameSession {
    /// Creates a fresh, unseated session for the given room.
    pub fn new(room_id: RoomName) -> Self {
        Self {
            room_id,
            board: [None; 9],
            turn: Mark::X,
            winner: None,
            winning_line: None,
            players: Seats::default(),
            last_move: None,
            started: false,
        }
    }

    /// Seats a connection in the first vacant seat, X before O.
    ///
    /// Starts the game when this fills the second seat. Returns `None`
    /// without mutating anything when both seats are already held.
    pub fn seat(&mut self, client: ClientId) -> Option<Mark> {
        let mark = self.players.assign(client)?;
        if self.players.both_held() {
            self.started = true;
        }
        Some(mark)
    }

    /// Vacates whichever seat the connection holds and suspends play.
    ///
    /// Returns the vacated seat, or `None` if the connection held none.
    pub fn vacate(&mut self, client: ClientId) -> Option<Mark> {
        let mark = self.players.vacate(client)?;
        self.started = false;
        Some(mark)
    }

    /// Attempts to place the current turn's marker at `index` on behalf
    /// of `client`.
    ///
    /// Returns `true` and mutates the session only when every condition
    /// holds: the game has started, no outcome is set, the index is a
    /// cell on the board, that cell is empty, and `client` holds the
    /// seat whose turn it is. Anything else is a stale or out-of-turn
    /// message and is dropped without any state change.
    pub fn apply_move(&mut self, client: ClientId, index: i64) -> bool {
        if !self.started || self.winner.is_some() {
            return false;
        }
        let Ok(index) = usize::try_from(index) else {
            return false;
        };
        if index > 8 || self.board[index].is_some() {
            return false;
        }
        if self.players.occupant(self.turn) != Some(client) {
            return false;
        }

        self.board[index] = Some(self.turn);
        self.last_move = Some(index);
        self.evaluate();
        if self.winner.is_none() {
            self.turn = self.turn.other();
        }
        true
    }

    /// Resets the board for a rematch.
    ///
    /// Afterwards the session is indistinguishable from a freshly
    /// created one with the same two seats: empty board, X to move, no
    /// outcome, and play underway.
    pub fn reset(&mut self) {
        self.board = [None; 9];
        self.turn = Mark::X;
        self.winner = None;
        self.winning_line = None;
        self.last_move = None;
        self.started = true;
    }

    /// Checks the fixed triples in order and records the first match as
    /// the outcome; a full board with no match is a draw.
    fn evaluate(&mut self) {
        for line in WIN_LINES {
            let [a, b, c] = line;
            if let Some(mark) = self.board[a] {
                if self.board[b] == Some(mark) && self.board[c] == Some(mark) {
                    self.winner = Some(mark.into());
                    self.winning_line = Some(line);
                    return;
                }
            }
        }
        if self.board.iter().all(Option::is_some) {
            self.winner = Some(Winner::Draw);
        }
    }

    /// Returns the seat held by the connection, if any.
    pub fn mark_of(&self, client: ClientId) -> Option<Mark> {
        self.players.mark_of(client)
    }

    /// Returns the current seat assignments.
    pub fn seats(&self) -> Seats {
        self.players
    }

    /// Returns `true` while both seats are held and play is underway.
    pub fn started(&self) -> bool {
        self.started
    }

    /// Returns `true` when no connection holds a seat.
    pub fn is_vacant(&self) -> bool {
        self.players.is_vacant()
    }

    /// Produces the sanitized projection broadcast to room members.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            room_id: self.room_id.clone(),
            board: self.board,
            turn: self.turn,
            winner: self.winner,
            winning_line: self.winning_line,
            players: self.players,
            last_move: self.last_move,
        }
    }
}
