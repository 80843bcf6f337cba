//! Move search - breadth-first enumeration of reachable placements
//!
//! Nodes are `(x, y, rotation, grounded)` search states. The search starts at
//! the spawn position and expands, in order, left, right, soft drop,
//! counter-clockwise and clockwise rotation. Each state is visited once, so
//! the first path to reach it is a shortest one.
//!
//! When a state is dequeued:
//! - a grounded state is recorded as a placement as-is (tucks and spins)
//! - an airborne state is hard-dropped and recorded the first time its
//!   `(x, final_y, rotation)` landing is seen
//!
//! Parent links live in a dense arena indexed by a packed state key, so the
//! search allocates a fixed amount per call regardless of board shape.

use std::collections::VecDeque;

use crate::board::Board;
use crate::error::EngineError;
use crate::outcome::{evaluate, Landing, MoveContext, Outcome};
use crate::pieces::{get_shape, try_rotate};
use crate::types::{GameAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_X, SPAWN_Y};

/// Margin added to pivot coordinates so every valid pivot packs to a
/// non-negative key
const PAD: i16 = 2;
const KEY_COLS: usize = 16;
const KEY_ROWS: usize = 48;
const KEY_ROTS: usize = 4;
/// Distinct `(x, y, rotation)` triples
const LANDING_SLOTS: usize = KEY_COLS * KEY_ROWS * KEY_ROTS;
/// Distinct search states
const STATE_SLOTS: usize = LANDING_SLOTS * 2;

const _: () = assert!(BOARD_WIDTH as usize + 2 * PAD as usize <= KEY_COLS);
const _: () = assert!(BOARD_HEIGHT as usize + 2 * PAD as usize <= KEY_ROWS);

/// Out-edges in expansion order
const EXPANSION: [GameAction; 5] = [
    GameAction::MoveLeft,
    GameAction::MoveRight,
    GameAction::SoftDrop,
    GameAction::RotateCcw,
    GameAction::RotateCw,
];

/// A BFS node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchState {
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
    /// The piece cannot move one row down
    pub grounded: bool,
}

impl SearchState {
    fn at(board: &Board, kind: PieceKind, x: i8, y: i8, rotation: Rotation) -> Self {
        let shape = get_shape(kind, rotation);
        Self {
            x,
            y,
            rotation,
            grounded: !board.fits(&shape, x, y + 1),
        }
    }

    fn landing_key(&self) -> Option<usize> {
        landing_key(self.x, self.y, self.rotation)
    }

    fn key(&self) -> Option<usize> {
        self.landing_key()
            .map(|k| k * 2 + usize::from(self.grounded))
    }

    fn from_key(key: usize) -> Self {
        let grounded = key % 2 == 1;
        let k = key / 2;
        let rotation = Rotation::from_index((k % KEY_ROTS) as i32);
        let k = k / KEY_ROTS;
        let y = (k % KEY_ROWS) as i16 - PAD;
        let x = (k / KEY_ROWS) as i16 - PAD;
        Self {
            x: x as i8,
            y: y as i8,
            rotation,
            grounded,
        }
    }
}

fn landing_key(x: i8, y: i8, rotation: Rotation) -> Option<usize> {
    let col = usize::try_from(x as i16 + PAD).ok()?;
    let row = usize::try_from(y as i16 + PAD).ok()?;
    if col >= KEY_COLS || row >= KEY_ROWS {
        return None;
    }
    Some((col * KEY_ROWS + row) * KEY_ROTS + rotation.index() as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Unseen,
    Start,
    Step { parent: u16, action: GameAction },
}

/// Where the piece enters the board: `(4, 20)`, or one row up if that collides
pub fn spawn_position(board: &Board, kind: PieceKind) -> Option<(i8, i8)> {
    let shape = get_shape(kind, Rotation::North);
    [SPAWN_Y, SPAWN_Y - 1]
        .into_iter()
        .find(|&y| board.fits(&shape, SPAWN_X, y))
        .map(|y| (SPAWN_X, y))
}

/// Enumerate every reachable placement of `kind` on `board`
///
/// Returns a single game-over outcome when the piece cannot spawn.
pub fn find_moves(
    board: &Board,
    kind: PieceKind,
    ctx: &MoveContext,
) -> Result<Vec<Outcome>, EngineError> {
    let Some((spawn_x, spawn_y)) = spawn_position(board, kind) else {
        return Ok(vec![Outcome::spawn_blocked(board, kind, ctx)]);
    };

    let mut links = vec![Link::Unseen; STATE_SLOTS];
    let mut landed = vec![false; LANDING_SLOTS];
    let mut queue = VecDeque::new();
    let mut outcomes = Vec::new();

    // The spawn state gets a real grounded flag: a piece spawning on the stack
    // is recorded once as a grounded state, not also as an airborne landing.
    let start = SearchState::at(board, kind, spawn_x, spawn_y, Rotation::North);
    if let Some(key) = start.key() {
        links[key] = Link::Start;
        queue.push_back((start, key, None));
    }

    while let Some((state, key, last_action)) = queue.pop_front() {
        let y = if state.grounded {
            Some(state.y)
        } else {
            let final_y = board.drop_y(&get_shape(kind, state.rotation), state.x, state.y);
            match landing_key(state.x, final_y, state.rotation) {
                Some(lk) if !landed[lk] => {
                    landed[lk] = true;
                    Some(final_y)
                }
                _ => None,
            }
        };

        if let Some(y) = y {
            let (mut path, used_soft_drop) = rebuild_path(&links, key)?;
            path.push(GameAction::HardDrop);
            let landing = Landing {
                kind,
                x: state.x,
                y,
                rotation: state.rotation,
                last_action,
            };
            outcomes.push(evaluate(board, &landing, path, used_soft_drop, ctx));
        }

        for action in EXPANSION {
            let Some(next) = expand(board, kind, &state, action) else {
                continue;
            };
            let Some(next_key) = next.key() else {
                continue;
            };
            if links[next_key] != Link::Unseen {
                continue;
            }
            links[next_key] = Link::Step {
                parent: key as u16,
                action,
            };
            queue.push_back((next, next_key, Some(action)));
        }
    }

    Ok(outcomes)
}

/// Successor of `state` under `action`, if the move is legal
fn expand(
    board: &Board,
    kind: PieceKind,
    state: &SearchState,
    action: GameAction,
) -> Option<SearchState> {
    let shape = get_shape(kind, state.rotation);
    let (x, y, rotation) = match action {
        GameAction::MoveLeft | GameAction::MoveRight => {
            let dx = if action == GameAction::MoveLeft { -1 } else { 1 };
            if !board.fits(&shape, state.x + dx, state.y) {
                return None;
            }
            (state.x + dx, state.y, state.rotation)
        }
        GameAction::SoftDrop => {
            if state.grounded {
                return None;
            }
            (state.x, state.y + 1, state.rotation)
        }
        GameAction::RotateCw | GameAction::RotateCcw => {
            let clockwise = action == GameAction::RotateCw;
            let (_, rotation, (dx, dy)) = try_rotate(
                kind,
                state.rotation,
                state.x,
                state.y,
                clockwise,
                |cx, cy| board.is_valid(cx, cy),
            )?;
            (state.x + dx, state.y + dy, rotation)
        }
        GameAction::HardDrop => return None,
    };
    Some(SearchState::at(board, kind, x, y, rotation))
}

/// Walk parent links back to the start; reports whether a soft drop was used
fn rebuild_path(links: &[Link], key: usize) -> Result<(Vec<GameAction>, bool), EngineError> {
    let mut path = Vec::new();
    let mut current = key;
    loop {
        match links.get(current).copied().unwrap_or(Link::Unseen) {
            Link::Start => break,
            Link::Step { parent, action } => {
                path.push(action);
                current = parent as usize;
            }
            Link::Unseen => {
                let state = SearchState::from_key(current);
                return Err(EngineError::BrokenSearchPath {
                    x: state.x,
                    y: state.y,
                    rotation: state.rotation.index(),
                    grounded: state.grounded,
                });
            }
        }
        if path.len() > STATE_SLOTS {
            let state = SearchState::from_key(key);
            return Err(EngineError::BrokenSearchPath {
                x: state.x,
                y: state.y,
                rotation: state.rotation.index(),
                grounded: state.grounded,
            });
        }
    }
    path.reverse();
    let used_soft_drop = path.contains(&GameAction::SoftDrop);
    Ok((path, used_soft_drop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NEXT_QUEUE_LEN;

    fn ctx() -> MoveContext {
        MoveContext {
            combo: -1,
            back_to_back: false,
            pending_garbage: 0,
            used_hold: false,
            next_queue_after: [None; NEXT_QUEUE_LEN],
            generation: 0,
        }
    }

    #[test]
    fn key_roundtrip() {
        let state = SearchState {
            x: -1,
            y: 41,
            rotation: Rotation::West,
            grounded: true,
        };
        let key = state.key().unwrap();
        assert!(key < STATE_SLOTS);
        assert_eq!(SearchState::from_key(key), state);
    }

    #[test]
    fn o_piece_on_empty_board_has_nine_columns() {
        let moves = find_moves(&Board::new(), PieceKind::O, &ctx()).unwrap();
        let mut xs: Vec<i8> = moves.iter().filter(|m| m.y == 38).map(|m| m.x).collect();
        xs.sort();
        xs.dedup();
        assert_eq!(xs, (0..=8).collect::<Vec<i8>>());
        assert!(moves.iter().all(|m| m.path.last() == Some(&GameAction::HardDrop)));
    }

    #[test]
    fn spawn_drop_needs_no_inputs() {
        let moves = find_moves(&Board::new(), PieceKind::T, &ctx()).unwrap();
        let first = &moves[0];
        assert_eq!(first.path, vec![GameAction::HardDrop]);
        assert_eq!((first.x, first.y, first.rotation), (4, 39, Rotation::North));
        assert!(!first.used_soft_drop);
    }

    #[test]
    fn grounded_spawn_is_recorded_once() {
        let mut board = Board::new();
        board.set(4, 21, true);
        let moves = find_moves(&board, PieceKind::T, &ctx()).unwrap();
        assert_eq!(moves[0].path, vec![GameAction::HardDrop]);
        assert_eq!((moves[0].x, moves[0].y), (4, 20));
        let at_spawn = moves
            .iter()
            .filter(|m| (m.x, m.y, m.rotation) == (4, 20, Rotation::North))
            .count();
        assert_eq!(at_spawn, 1);
    }

    #[test]
    fn blocked_spawn_is_single_game_over() {
        let mut board = Board::new();
        // Fill the spawn rows around the pivot.
        for y in 18..21 {
            for x in 3..6 {
                board.set(x, y, true);
            }
        }
        let moves = find_moves(&board, PieceKind::T, &ctx()).unwrap();
        assert_eq!(moves.len(), 1);
        assert!(moves[0].game_over);
        assert!(moves[0].path.is_empty());
    }

    #[test]
    fn spawn_retries_one_row_up() {
        let mut board = Board::new();
        board.set(4, 20, true);
        assert_eq!(spawn_position(&board, PieceKind::T), Some((4, 19)));
    }

    #[test]
    fn broken_link_is_an_error() {
        let mut links = vec![Link::Unseen; STATE_SLOTS];
        links[10] = Link::Step {
            parent: 4,
            action: GameAction::MoveLeft,
        };
        assert!(matches!(
            rebuild_path(&links, 10),
            Err(EngineError::BrokenSearchPath { .. })
        ));
    }
}
