use crate::board::Board;
use crate::types::{PieceKind, NEXT_QUEUE_LEN};

/// Read-only copy of every observable session field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub current: Option<PieceKind>,
    pub hold: Option<PieceKind>,
    pub next_queue: [Option<PieceKind>; NEXT_QUEUE_LEN],
    pub can_hold: bool,
    pub game_over: bool,
    pub score: u64,
    pub combo: i32,
    pub back_to_back: bool,
    pub pending_garbage: u32,
    pub generation: u64,
    pub episode_id: u32,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && self.current.is_some()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: Board::new(),
            current: None,
            hold: None,
            next_queue: [None; NEXT_QUEUE_LEN],
            can_hold: true,
            game_over: false,
            score: 0,
            combo: -1,
            back_to_back: false,
            pending_garbage: 0,
            generation: 0,
            episode_id: 0,
            seed: 0,
        }
    }
}
