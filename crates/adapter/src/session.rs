//! Per-connection session: one `GameState` driven by protocol messages
//!
//! The session is transport-free so it can be tested without sockets; the
//! server feeds it lines and writes back whatever it returns.

use crate::core::{EngineError, GameState, Outcome};
use crate::protocol::*;

/// One connection's game and its most recent `moves` list
pub struct Session {
    session_id: u64,
    base_seed: Option<u32>,
    state: Option<GameState>,
    last_moves: Vec<Outcome>,
}

impl Session {
    pub fn new(session_id: u64, base_seed: Option<u32>) -> Self {
        Self {
            session_id,
            base_seed,
            state: None,
            last_moves: Vec::new(),
        }
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Handle one raw line; `None` for blank lines
    pub fn handle_line(&mut self, line: &str) -> Option<ServerMessage> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match parse_message(line) {
            Ok(msg) => Some(self.handle(msg)),
            Err(e) => Some(ServerMessage::Error(create_error(
                extract_seq(line),
                ErrorCode::InvalidJson,
                &e.to_string(),
            ))),
        }
    }

    pub fn handle(&mut self, msg: ParsedMessage) -> ServerMessage {
        let msg = match msg {
            ParsedMessage::Hello(hello) => return self.on_hello(hello),
            ParsedMessage::Unknown { seq, msg_type } => {
                return error(seq, ErrorCode::InvalidCommand, &format!("unknown type {}", msg_type))
            }
            other => other,
        };

        let Some(state) = self.state.as_mut() else {
            return error(
                message_seq(&msg),
                ErrorCode::HandshakeRequired,
                "send hello first",
            );
        };

        match msg {
            ParsedMessage::Moves(m) => match state.possible_moves() {
                Ok(moves) => {
                    let views = moves
                        .iter()
                        .enumerate()
                        .map(|(i, o)| MoveView::from_outcome(i, o))
                        .collect();
                    let generation = state.generation();
                    self.last_moves = moves;
                    ServerMessage::Moves(MovesMessage {
                        msg_type: MovesType::Moves,
                        seq: m.seq,
                        generation,
                        moves: views,
                    })
                }
                Err(e) => engine_error(m.seq, &e),
            },
            ParsedMessage::Commit(c) => {
                if state.game_over() {
                    return error(Some(c.seq), ErrorCode::GameOver, "episode is over; send reset");
                }
                if c.generation != state.generation() {
                    return error(
                        Some(c.seq),
                        ErrorCode::StaleOutcome,
                        &format!(
                            "generation {} is stale, session is at {}",
                            c.generation,
                            state.generation()
                        ),
                    );
                }
                let Some(outcome) = self.last_moves.get(c.index) else {
                    return error(
                        Some(c.seq),
                        ErrorCode::UnknownMove,
                        &format!("no move at index {}", c.index),
                    );
                };
                match state.commit(outcome) {
                    Ok(()) => {
                        self.last_moves.clear();
                        ServerMessage::Ack(create_ack(c.seq, state.generation()))
                    }
                    Err(e) => engine_error(c.seq, &e),
                }
            }
            ParsedMessage::Garbage(g) => {
                state.add_pending_garbage(g.amount);
                ServerMessage::Ack(create_ack(g.seq, state.generation()))
            }
            ParsedMessage::Reset(r) => {
                match r.seed {
                    Some(seed) => state.reset_with_seed(seed),
                    None => state.reset(),
                }
                self.last_moves.clear();
                ServerMessage::Ack(create_ack(r.seq, state.generation()))
            }
            ParsedMessage::Observe(o) => {
                ServerMessage::Observation(ObservationMessage::from_snapshot(o.seq, &state.snapshot()))
            }
            ParsedMessage::Hello(_) | ParsedMessage::Unknown { .. } => {
                error(None, ErrorCode::Internal, "unreachable message")
            }
        }
    }

    fn on_hello(&mut self, hello: HelloMessage) -> ServerMessage {
        let state = match hello.seed.or_else(|| self.derived_seed()) {
            Some(seed) => GameState::new(seed),
            None => GameState::from_entropy(),
        };
        let seed = state.seed();
        self.state = Some(state);
        self.last_moves.clear();
        ServerMessage::Welcome(create_welcome(hello.seq, self.session_id, seed))
    }

    fn derived_seed(&self) -> Option<u32> {
        self.base_seed
            .map(|base| base.wrapping_add(self.session_id as u32))
    }
}

fn message_seq(msg: &ParsedMessage) -> Option<u64> {
    match msg {
        ParsedMessage::Hello(m) => Some(m.seq),
        ParsedMessage::Moves(m) => Some(m.seq),
        ParsedMessage::Commit(m) => Some(m.seq),
        ParsedMessage::Garbage(m) => Some(m.seq),
        ParsedMessage::Reset(m) => Some(m.seq),
        ParsedMessage::Observe(m) => Some(m.seq),
        ParsedMessage::Unknown { seq, .. } => *seq,
    }
}

fn error(seq: Option<u64>, code: ErrorCode, message: &str) -> ServerMessage {
    ServerMessage::Error(create_error(seq, code, message))
}

fn engine_error(seq: u64, err: &EngineError) -> ServerMessage {
    let code = match err {
        EngineError::StaleOutcome { .. } => ErrorCode::StaleOutcome,
        _ => ErrorCode::Internal,
    };
    error(Some(seq), code, &err.to_string())
}
