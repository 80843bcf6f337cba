//! Host marshalling for boards and queues
//!
//! | Form | Board | Queue |
//! |------|-------|-------|
//! | integers | 400 values in {0,1}, row-major | 5 piece indices, `-1` for none |
//! | bytes | 1600 bytes, little-endian `i32` | 20 bytes, little-endian `i32` |
//!
//! Piece indices follow [`PieceKind::ALL`]: T, Z, S, I, O, L, J.

use crate::board::Board;
use crate::error::EngineError;
use crate::types::{PieceKind, BOARD_CELLS, NEXT_QUEUE_LEN, NO_PIECE_INDEX};

const I32_BYTES: usize = std::mem::size_of::<i32>();

/// Board as 400 row-major integers
pub fn board_to_flat(board: &Board) -> Vec<i32> {
    board.cells().iter().map(|&c| i32::from(c)).collect()
}

/// Board from 400 row-major integers in {0,1}
pub fn board_from_flat(values: &[i32]) -> Result<Board, EngineError> {
    if values.len() != BOARD_CELLS {
        return Err(EngineError::MalformedBuffer {
            what: "board",
            reason: format!("expected {} cells, got {}", BOARD_CELLS, values.len()),
        });
    }
    let mut cells = [false; BOARD_CELLS];
    for (i, (&v, cell)) in values.iter().zip(cells.iter_mut()).enumerate() {
        *cell = match v {
            0 => false,
            1 => true,
            other => {
                return Err(EngineError::MalformedBuffer {
                    what: "board",
                    reason: format!("cell {} holds {}", i, other),
                })
            }
        };
    }
    Ok(Board::from_cells(cells))
}

/// Queue entries as piece indices, `-1` for unknown slots
pub fn queue_to_indices(queue: &[Option<PieceKind>]) -> [i32; NEXT_QUEUE_LEN] {
    let mut out = [NO_PIECE_INDEX; NEXT_QUEUE_LEN];
    for (slot, kind) in out.iter_mut().zip(queue.iter()) {
        if let Some(kind) = kind {
            *slot = kind.index() as i32;
        }
    }
    out
}

pub fn board_to_bytes(board: &Board) -> Vec<u8> {
    board_to_flat(board)
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect()
}

pub fn board_from_bytes(bytes: &[u8]) -> Result<Board, EngineError> {
    if bytes.len() != BOARD_CELLS * I32_BYTES {
        return Err(EngineError::MalformedBuffer {
            what: "board bytes",
            reason: format!(
                "expected {} bytes, got {}",
                BOARD_CELLS * I32_BYTES,
                bytes.len()
            ),
        });
    }
    let values: Vec<i32> = bytes
        .chunks_exact(I32_BYTES)
        .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    board_from_flat(&values)
}

pub fn queue_to_bytes(queue: &[Option<PieceKind>]) -> Vec<u8> {
    queue_to_indices(queue)
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect()
}
