//! T-spin detection based on corner occupancy
//!
//! The four diagonal neighbours of the T pivot are inspected on the board
//! after the piece is merged but before any line is cleared. Off-grid corners
//! count as occupied.

use crate::board::Board;
use crate::types::{GameAction, PieceKind, Rotation, TSpinKind};

const CORNERS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// The two corners on the side the T points to
fn front_corners(rotation: Rotation) -> [(i8, i8); 2] {
    match rotation {
        Rotation::North => [(-1, -1), (1, -1)],
        Rotation::East => [(1, -1), (1, 1)],
        Rotation::South => [(-1, 1), (1, 1)],
        Rotation::West => [(-1, -1), (-1, 1)],
    }
}

/// Classify a locked placement
///
/// Only a T whose last input was a rotation can spin. Three or more blocked
/// corners make a spin; it is `Full` when both front corners are among them.
pub fn classify(
    board: &Board,
    kind: PieceKind,
    x: i8,
    y: i8,
    rotation: Rotation,
    last_action: Option<GameAction>,
) -> TSpinKind {
    if kind != PieceKind::T || !last_action.is_some_and(|a| a.is_rotation()) {
        return TSpinKind::None;
    }

    let blocked = |&(dx, dy): &(i8, i8)| board.is_blocked(x + dx, y + dy);

    if CORNERS.iter().filter(|c| blocked(c)).count() < 3 {
        return TSpinKind::None;
    }

    if front_corners(rotation).iter().all(blocked) {
        TSpinKind::Full
    } else {
        TSpinKind::Mini
    }
}
