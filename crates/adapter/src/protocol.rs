//! Protocol module - JSON message types for trainer sessions
//!
//! Line-delimited JSON: every message is one object on one line with a `type`
//! field and a client-chosen `seq` that the server echoes back.

use serde::{Deserialize, Serialize};

use crate::core::codec::{board_to_flat, queue_to_indices};
use crate::core::{GameSnapshot, Outcome};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, NEXT_QUEUE_LEN};

pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Server Messages ==============

/// Client hello message (first message on every connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    pub client: ClientInfo,
    /// Seed for the session; the server picks one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Request the placements available right now
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovesRequest {
    pub seq: u64,
}

/// Commit one entry of the most recent `moves` list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitMessage {
    pub seq: u64,
    pub index: usize,
    pub generation: u64,
}

/// Incoming garbage from an opponent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarbageMessage {
    pub seq: u64,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetMessage {
    pub seq: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserveMessage {
    pub seq: u64,
}

/// A decoded client line
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Moves(MovesRequest),
    Commit(CommitMessage),
    Garbage(GarbageMessage),
    Reset(ResetMessage),
    Observe(ObserveMessage),
    /// Well-formed JSON with a `type` the server does not know
    Unknown {
        seq: Option<u64>,
        msg_type: String,
    },
}

/// Parse one line from the client
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum InboundMessage {
        Hello(HelloMessage),
        Moves(MovesRequest),
        Commit(CommitMessage),
        Garbage(GarbageMessage),
        Reset(ResetMessage),
        Observe(ObserveMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Moves(m)) => Ok(ParsedMessage::Moves(m)),
        Ok(InboundMessage::Commit(m)) => Ok(ParsedMessage::Commit(m)),
        Ok(InboundMessage::Garbage(m)) => Ok(ParsedMessage::Garbage(m)),
        Ok(InboundMessage::Reset(m)) => Ok(ParsedMessage::Reset(m)),
        Ok(InboundMessage::Observe(m)) => Ok(ParsedMessage::Observe(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type {
                Some(t) if !KNOWN_TYPES.contains(&t.as_str()) => Ok(ParsedMessage::Unknown {
                    seq: envelope.seq,
                    msg_type: t,
                }),
                _ => Err(e),
            }
        }
    }
}

const KNOWN_TYPES: [&str; 6] = ["hello", "moves", "commit", "garbage", "reset", "observe"];

/// Best-effort `seq` from a line that failed to parse
pub fn extract_seq(json: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(json)
        .ok()?
        .get("seq")?
        .as_u64()
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovesType {
    #[serde(rename = "moves")]
    Moves,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidCommand,
    HandshakeRequired,
    UnknownMove,
    StaleOutcome,
    GameOver,
    Internal,
}

/// Piece kind as a lowercase letter on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKindLower {
    T,
    Z,
    S,
    I,
    O,
    L,
    J,
}

impl From<PieceKind> for PieceKindLower {
    fn from(value: PieceKind) -> Self {
        match value {
            PieceKind::T => PieceKindLower::T,
            PieceKind::Z => PieceKindLower::Z,
            PieceKind::S => PieceKindLower::S,
            PieceKind::I => PieceKindLower::I,
            PieceKind::O => PieceKindLower::O,
            PieceKind::L => PieceKindLower::L,
            PieceKind::J => PieceKindLower::J,
        }
    }
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub protocol_version: String,
    pub session_id: u64,
    pub seed: u32,
}

/// One placement as seen by the trainer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveView {
    pub index: usize,
    pub piece: PieceKindLower,
    pub x: i8,
    pub y: i8,
    pub rotation: u8,
    /// camelCase action names ending with `hardDrop`
    pub path: Vec<String>,
    pub lines_cleared: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spin: Option<String>,
    pub score: u32,
    pub attack: u32,
    pub pending_garbage: u32,
    pub combo: i32,
    pub back_to_back: bool,
    pub game_over: bool,
    pub used_hold: bool,
    pub used_soft_drop: bool,
    /// 400 row-major cells in {0,1}
    pub board: Vec<u8>,
    /// Piece indices into `[t, z, s, i, o, l, j]`, `-1` for unknown
    pub next_queue_after: [i32; NEXT_QUEUE_LEN],
}

impl MoveView {
    pub fn from_outcome(index: usize, outcome: &Outcome) -> Self {
        Self {
            index,
            piece: outcome.kind.into(),
            x: outcome.x,
            y: outcome.y,
            rotation: outcome.rotation.index(),
            path: outcome.path.iter().map(|a| a.as_str().to_string()).collect(),
            lines_cleared: outcome.lines_cleared,
            spin: outcome.spin.as_str().map(str::to_string),
            score: outcome.score,
            attack: outcome.attack,
            pending_garbage: outcome.pending_garbage,
            combo: outcome.combo,
            back_to_back: outcome.back_to_back,
            game_over: outcome.game_over,
            used_hold: outcome.used_hold,
            used_soft_drop: outcome.used_soft_drop,
            board: flat_cells(&outcome.board),
            next_queue_after: queue_to_indices(&outcome.next_queue_after),
        }
    }
}

fn flat_cells(board: &crate::core::Board) -> Vec<u8> {
    board_to_flat(board).into_iter().map(|v| v as u8).collect()
}

/// Response to a `moves` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovesMessage {
    #[serde(rename = "type")]
    pub msg_type: MovesType,
    pub seq: u64,
    /// Echo this back in `commit`
    pub generation: u64,
    pub moves: Vec<MoveView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    /// Rows from the floor up to the highest filled cell
    pub stack_height: u8,
    pub cells: Vec<u8>,
}

/// Full session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub playable: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub seed: u32,
    pub generation: u64,
    pub board: BoardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<PieceKindLower>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold: Option<PieceKindLower>,
    pub next_queue: [i32; NEXT_QUEUE_LEN],
    pub can_hold: bool,
    pub score: u64,
    pub combo: i32,
    pub back_to_back: bool,
    pub pending_garbage: u32,
}

impl ObservationMessage {
    pub fn from_snapshot(seq: u64, snap: &GameSnapshot) -> Self {
        Self {
            msg_type: ObservationType::Observation,
            seq,
            playable: snap.playable(),
            game_over: snap.game_over,
            episode_id: snap.episode_id,
            seed: snap.seed,
            generation: snap.generation,
            board: BoardSnapshot {
                width: BOARD_WIDTH,
                height: BOARD_HEIGHT,
                stack_height: snap.board.stack_height(),
                cells: flat_cells(&snap.board),
            },
            current: snap.current.map(Into::into),
            hold: snap.hold.map(Into::into),
            next_queue: queue_to_indices(&snap.next_queue),
            can_hold: snap.can_hold,
            score: snap.score,
            combo: snap.combo,
            back_to_back: snap.back_to_back,
            pending_garbage: snap.pending_garbage,
        }
    }
}

/// Acknowledgment for commit, garbage and reset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub status: AckStatus,
    /// Session generation after the command
    pub generation: u64,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    pub code: ErrorCode,
    pub message: String,
}

/// Anything the server writes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    Moves(MovesMessage),
    Observation(ObservationMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
}

pub fn create_welcome(seq: u64, session_id: u64, seed: u32) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        protocol_version: PROTOCOL_VERSION.to_string(),
        session_id,
        seed,
    }
}

pub fn create_ack(seq: u64, generation: u64) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        status: AckStatus::Ok,
        generation,
    }
}

pub fn create_error(seq: Option<u64>, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        code,
        message: message.to_string(),
    }
}
