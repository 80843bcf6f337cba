//! Engine errors
//!
//! In-game conditions (lockout, spawn collision, garbage overflow) are never
//! errors; they surface as game-over state. Only boundary failures and broken
//! internal invariants end up here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown piece kind: {0}")]
    UnknownPieceKind(String),

    #[error("outcome belongs to generation {found}, session is at {expected}")]
    StaleOutcome { expected: u64, found: u64 },

    #[error("search state ({x}, {y}, rot {rotation}, grounded {grounded}) has no parent link")]
    BrokenSearchPath {
        x: i8,
        y: i8,
        rotation: u8,
        grounded: bool,
    },

    #[error("malformed {what}: {reason}")]
    MalformedBuffer { what: &'static str, reason: String },
}

impl EngineError {
    /// Stable snake_case code for hosts and the wire protocol
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::UnknownPieceKind(_) => "unknown_piece_kind",
            EngineError::StaleOutcome { .. } => "stale_outcome",
            EngineError::BrokenSearchPath { .. } => "broken_search_path",
            EngineError::MalformedBuffer { .. } => "malformed_buffer",
        }
    }
}
