//! Property tests for the move search and session transitions.
//!
//! Invariants covered:
//! - Replaying an outcome's path from spawn reaches its `(x, y, rotation)`.
//! - Every non-game-over placement fits the pre-move board.
//! - Landings are reported at most twice (once airborne, once grounded).
//! - Committing keeps score monotonic, bumps the generation and never leaves
//!   a full row behind.

use std::collections::HashMap;

use proptest::prelude::*;

use obseris::core::search::spawn_position;
use obseris::core::{get_shape, try_rotate, Board, GameState, Outcome};
use obseris::types::{GameAction, PieceKind, Rotation, BOARD_HEIGHT};

/// Walk `path` from spawn; `None` if any input is illegal on `board`
fn replay(board: &Board, kind: PieceKind, path: &[GameAction]) -> Option<(i8, i8, Rotation)> {
    let (mut x, mut y) = spawn_position(board, kind)?;
    let mut rotation = Rotation::North;

    for &action in path {
        let shape = get_shape(kind, rotation);
        match action {
            GameAction::MoveLeft | GameAction::MoveRight => {
                let dx = if action == GameAction::MoveLeft { -1 } else { 1 };
                if !board.fits(&shape, x + dx, y) {
                    return None;
                }
                x += dx;
            }
            GameAction::SoftDrop => {
                if !board.fits(&shape, x, y + 1) {
                    return None;
                }
                y += 1;
            }
            GameAction::RotateCw | GameAction::RotateCcw => {
                let cw = action == GameAction::RotateCw;
                let (_, next, (dx, dy)) =
                    try_rotate(kind, rotation, x, y, cw, |cx, cy| board.is_valid(cx, cy))?;
                rotation = next;
                x += dx;
                y += dy;
            }
            GameAction::HardDrop => {
                y = board.drop_y(&shape, x, y);
                return Some((x, y, rotation));
            }
        }
    }
    None
}

fn check_outcomes(board: &Board, moves: &[Outcome]) -> Result<(), TestCaseError> {
    let mut seen: HashMap<(bool, PieceKind, i8, i8, Rotation), usize> = HashMap::new();
    for m in moves {
        if m.path.is_empty() {
            prop_assert!(m.game_over);
            continue;
        }
        let end = replay(board, m.kind, &m.path);
        prop_assert_eq!(end, Some((m.x, m.y, m.rotation)));
        prop_assert!(board.fits(&get_shape(m.kind, m.rotation), m.x, m.y));
        *seen
            .entry((m.used_hold, m.kind, m.x, m.y, m.rotation))
            .or_default() += 1;
    }
    prop_assert!(seen.values().all(|&n| n <= 2));
    Ok(())
}

#[test]
fn first_moves_replay_for_every_seed_in_a_range() {
    for seed in 0..16u32 {
        let game = GameState::new(seed);
        let moves = game.possible_moves().unwrap();
        assert!(!moves.is_empty());
        check_outcomes(game.board(), &moves).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn generated_rollout_respects_core_invariants(
        seed in any::<u32>(),
        steps in 1usize..30,
        garbage in 0i32..4,
    ) {
        let mut game = GameState::new(seed);

        for i in 0..steps {
            if game.game_over() {
                break;
            }
            if i % 7 == 3 {
                game.add_pending_garbage(garbage);
            }

            let moves = game.possible_moves().unwrap();
            prop_assert!(!moves.is_empty());
            check_outcomes(game.board(), &moves)?;

            let pick = ((seed as usize).wrapping_add(i * 31)) % moves.len();
            let before_score = game.score();
            let before_gen = game.generation();

            game.commit(&moves[pick]).unwrap();

            prop_assert!(game.score() >= before_score);
            prop_assert!(game.generation() > before_gen);
            for y in 0..BOARD_HEIGHT as usize {
                prop_assert!(!game.board().is_row_full(y));
            }
        }
    }
}
