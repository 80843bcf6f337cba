//! Pieces module - Tetromino shapes and SRS rotation system
//!
//! Shapes are given as offsets from the piece pivot with `y` growing downward.
//! Kick offsets are stored in the same orientation, so they are added to the
//! pivot position unchanged.
//! Reference: https://tetris.wiki/SRS

use crate::error::EngineError;
use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to the piece pivot
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the pivot
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind.index()][rotation.index() as usize]
}

const SHAPES: [[PieceShape; 4]; 7] = [
    // T
    [
        [(-1, 0), (0, 0), (1, 0), (0, -1)],
        [(0, -1), (0, 0), (0, 1), (1, 0)],
        [(-1, 0), (0, 0), (1, 0), (0, 1)],
        [(0, -1), (0, 0), (0, 1), (-1, 0)],
    ],
    // Z
    [
        [(-1, -1), (0, -1), (0, 0), (1, 0)],
        [(1, -1), (1, 0), (0, 0), (0, 1)],
        [(-1, 0), (0, 0), (0, 1), (1, 1)],
        [(-1, 1), (-1, 0), (0, 0), (0, -1)],
    ],
    // S
    [
        [(-1, 0), (0, 0), (0, -1), (1, -1)],
        [(0, -1), (0, 0), (1, 0), (1, 1)],
        [(-1, 1), (0, 1), (0, 0), (1, 0)],
        [(-1, -1), (-1, 0), (0, 0), (0, 1)],
    ],
    // I
    [
        [(-1, 0), (0, 0), (1, 0), (2, 0)],
        [(1, -1), (1, 0), (1, 1), (1, 2)],
        [(-1, 1), (0, 1), (1, 1), (2, 1)],
        [(0, -1), (0, 0), (0, 1), (0, 2)],
    ],
    // O
    [
        [(0, 0), (1, 0), (0, 1), (1, 1)],
        [(0, 0), (1, 0), (0, 1), (1, 1)],
        [(0, 0), (1, 0), (0, 1), (1, 1)],
        [(0, 0), (1, 0), (0, 1), (1, 1)],
    ],
    // L
    [
        [(-1, 0), (0, 0), (1, 0), (1, -1)],
        [(0, -1), (0, 0), (0, 1), (1, 1)],
        [(-1, 1), (-1, 0), (0, 0), (1, 0)],
        [(-1, -1), (0, -1), (0, 0), (0, 1)],
    ],
    // J
    [
        [(-1, -1), (-1, 0), (0, 0), (1, 0)],
        [(1, -1), (0, -1), (0, 0), (0, 1)],
        [(-1, 0), (0, 0), (1, 0), (1, 1)],
        [(-1, 1), (0, 1), (0, 0), (0, -1)],
    ],
];

/// The eight rotation transitions that carry kick data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickTransition {
    NorthToEast,
    EastToNorth,
    EastToSouth,
    SouthToEast,
    SouthToWest,
    WestToSouth,
    WestToNorth,
    NorthToWest,
}

impl KickTransition {
    /// Transition for a rotation pair, `None` for 180° or identity turns
    pub fn between(from: Rotation, to: Rotation) -> Option<Self> {
        use Rotation::*;
        match (from, to) {
            (North, East) => Some(KickTransition::NorthToEast),
            (East, North) => Some(KickTransition::EastToNorth),
            (East, South) => Some(KickTransition::EastToSouth),
            (South, East) => Some(KickTransition::SouthToEast),
            (South, West) => Some(KickTransition::SouthToWest),
            (West, South) => Some(KickTransition::WestToSouth),
            (West, North) => Some(KickTransition::WestToNorth),
            (North, West) => Some(KickTransition::NorthToWest),
            _ => None,
        }
    }

    fn row(self) -> usize {
        match self {
            KickTransition::NorthToEast => 0,
            KickTransition::EastToNorth => 1,
            KickTransition::EastToSouth => 2,
            KickTransition::SouthToEast => 3,
            KickTransition::SouthToWest => 4,
            KickTransition::WestToSouth => 5,
            KickTransition::WestToNorth => 6,
            KickTransition::NorthToWest => 7,
        }
    }
}

/// SRS wall kick data, one row of 5 candidates per [`KickTransition`]
pub type KickTable = [[(i8, i8); 5]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
];

const NO_KICK: [(i8, i8); 1] = [(0, 0)];

/// Get kick table for a piece kind, `None` for O
pub fn get_kick_table(kind: PieceKind) -> Option<&'static KickTable> {
    match kind {
        PieceKind::O => None,
        PieceKind::I => Some(&I_KICKS),
        _ => Some(&JLSTZ_KICKS),
    }
}

/// Ordered kick candidates for a rotation; the first valid one wins
pub fn kick_tests(kind: PieceKind, from: Rotation, to: Rotation) -> &'static [(i8, i8)] {
    match (get_kick_table(kind), KickTransition::between(from, to)) {
        (Some(table), Some(transition)) => &table[transition.row()],
        _ => &NO_KICK,
    }
}

/// Try to rotate a piece with wall kicks
///
/// Returns `Some((new_shape, new_rotation, kick_offset))` for the first kick
/// candidate whose cells all satisfy `is_valid`, `None` if every kick fails.
/// The O piece does not turn: it keeps its rotation and offset.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    is_valid: impl Fn(i8, i8) -> bool,
) -> Option<(PieceShape, Rotation, (i8, i8))> {
    if kind == PieceKind::O {
        let shape = get_shape(kind, rotation);
        let fits = shape.iter().all(|&(mx, my)| is_valid(x + mx, y + my));
        return fits.then_some((shape, rotation, (0, 0)));
    }

    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };
    let new_shape = get_shape(kind, new_rotation);

    for &(dx, dy) in kick_tests(kind, rotation, new_rotation) {
        let new_x = x + dx;
        let new_y = y + dy;
        let valid = new_shape
            .iter()
            .all(|&(mx, my)| is_valid(new_x + mx, new_y + my));
        if valid {
            return Some((new_shape, new_rotation, (dx, dy)));
        }
    }

    None
}

/// Piece kind for a host index into `[T, Z, S, I, O, L, J]`
pub fn kind_from_index(index: i32) -> Result<PieceKind, EngineError> {
    PieceKind::from_index(index).ok_or_else(|| EngineError::UnknownPieceKind(index.to_string()))
}

/// Piece kind for a letter or host shape name
pub fn kind_from_name(name: &str) -> Result<PieceKind, EngineError> {
    PieceKind::from_str(name).ok_or_else(|| EngineError::UnknownPieceKind(name.to_string()))
}
