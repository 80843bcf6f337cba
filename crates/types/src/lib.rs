//! Shared types - board geometry, piece vocabulary and rule constants
//!
//! This crate defines the vocabulary shared by the engine and the host adapter.
//! All types are plain data with no external dependencies, so they can be used
//! from the search engine, the session orchestrator and the wire protocol alike.
//!
//! # Board Geometry
//!
//! The playfield is 10 columns by 40 rows. Row 0 is the top of the board and
//! `y` grows downwards:
//!
//! | Rows | Role |
//! |------|------|
//! | 0..20 | Hidden spawn buffer |
//! | 20..40 | Visible playfield |
//!
//! Every piece spawns with its pivot at ([`SPAWN_X`], [`SPAWN_Y`]), i.e. on the
//! boundary between the hidden buffer and the visible field.
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LINE_SCORES` | 0/100/300/500/800 | Plain line clears (0-4 lines) |
//! | `LINE_ATTACK` | 0/0/1/2/4 | Plain line clear attack (0-4 lines) |
//! | `COMBO_BASE` | 50 | Points per combo step |
//! | `COMBO_ATTACK` | 0,0,1,1,2,2,3,3,4,4,4 | Combo attack bonus, capped at 5 |
//! | `PERFECT_CLEAR_ATTACK` | 10 | Extra attack for emptying the board |
//! | `PERFECT_CLEAR_SCORE` | 3000 | Extra points for emptying the board |
//!
//! # Examples
//!
//! ```
//! use obseris_types::{GameAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.index(), 0);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::from_index(-1), Rotation::West);
//!
//! assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 40);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Total board height in cells, hidden buffer included (40 rows)
pub const BOARD_HEIGHT: u8 = 40;

/// Height of the visible playfield (20 rows)
pub const VISIBLE_HEIGHT: u8 = 20;

/// Rows above the visible playfield used as spawn buffer (20 rows)
pub const HIDDEN_ROWS: u8 = BOARD_HEIGHT - VISIBLE_HEIGHT;

/// Number of cells on the board (400)
pub const BOARD_CELLS: usize = BOARD_WIDTH as usize * BOARD_HEIGHT as usize;

/// Spawn column of the piece pivot
pub const SPAWN_X: i8 = 4;

/// Spawn row of the piece pivot (first visible row)
pub const SPAWN_Y: i8 = HIDDEN_ROWS as i8;

/// Length of the lookahead view exposed to callers
pub const NEXT_QUEUE_LEN: usize = 5;

/// Number of pieces in one randomizer bag
pub const BAG_SIZE: usize = 7;

/// Maximum garbage rows raised by a single garbage application
pub const MAX_GARBAGE_PER_APPLY: u32 = 10;

/// Wire index used for "no piece" in marshalled queues
pub const NO_PIECE_INDEX: i32 = -1;

/// Plain line clear points, indexed by lines cleared (0-4)
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Plain line clear attack, indexed by lines cleared (0-4)
pub const LINE_ATTACK: [u32; 5] = [0, 0, 1, 2, 4];

/// Full T-spin points for 1, 2 and 3 lines
pub const TSPIN_SCORES: [u32; 3] = [800, 1200, 1600];

/// Full T-spin points for any other line count
pub const TSPIN_FALLBACK_SCORE: u32 = 400;

/// Full T-spin attack for 1, 2 and 3 lines
pub const TSPIN_ATTACK: [u32; 3] = [2, 4, 6];

/// Mini T-spin points for 1 and 2 lines
pub const TSPIN_MINI_SCORES: [u32; 2] = [200, 400];

/// Mini T-spin points for any other line count
pub const TSPIN_MINI_FALLBACK_SCORE: u32 = 100;

/// Combo scoring base value (50 points per combo step)
pub const COMBO_BASE: u32 = 50;

/// Combo attack bonus indexed by combo count
pub const COMBO_ATTACK: [u32; 11] = [0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 4];

/// Combo attack bonus for combo counts past the table
pub const COMBO_ATTACK_CAP: u32 = 5;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// Attack added when a clear leaves the board empty
pub const PERFECT_CLEAR_ATTACK: u32 = 10;

/// Points added when a clear leaves the board empty
pub const PERFECT_CLEAR_SCORE: u32 = 3000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_constants_are_consistent() {
        assert_eq!(HIDDEN_ROWS, 20);
        assert_eq!(BOARD_CELLS, 400);
        assert_eq!(SPAWN_Y, 20);
        assert_eq!(BOARD_HEIGHT, HIDDEN_ROWS + VISIBLE_HEIGHT);
    }

    #[test]
    fn piece_index_roundtrip() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(PieceKind::from_index(i as i32), Some(*kind));
        }
        assert_eq!(PieceKind::from_index(7), None);
        assert_eq!(PieceKind::from_index(NO_PIECE_INDEX), None);
    }

    #[test]
    fn host_names_parse() {
        assert_eq!(PieceKind::from_str("LineShape"), Some(PieceKind::I));
        assert_eq!(PieceKind::from_str("MirroredLShape"), Some(PieceKind::J));
        assert_eq!(PieceKind::from_str("NoShape"), None);
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.host_name()), Some(kind));
        }
    }
}

/// The seven tetromino piece kinds
///
/// Declaration order is the wire order used by hosts: the index of a kind in
/// [`PieceKind::ALL`] is the integer written into marshalled queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    T,
    Z,
    S,
    I,
    O,
    L,
    J,
}

impl PieceKind {
    /// All kinds in wire order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::I,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
    ];

    /// Wire index of this kind
    pub fn index(&self) -> usize {
        match self {
            PieceKind::T => 0,
            PieceKind::Z => 1,
            PieceKind::S => 2,
            PieceKind::I => 3,
            PieceKind::O => 4,
            PieceKind::L => 5,
            PieceKind::J => 6,
        }
    }

    /// Kind for a wire index, `None` when out of range
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// Accepts single letters as well as the host names (`"TShape"`,
    /// `"LineShape"`, `"MirroredLShape"`, ...).
    ///
    /// ```
    /// use obseris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("SquareShape"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "t" | "tshape" => Some(PieceKind::T),
            "z" | "zshape" => Some(PieceKind::Z),
            "s" | "sshape" => Some(PieceKind::S),
            "i" | "lineshape" => Some(PieceKind::I),
            "o" | "squareshape" => Some(PieceKind::O),
            "l" | "lshape" => Some(PieceKind::L),
            "j" | "mirroredlshape" => Some(PieceKind::J),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::T => "t",
            PieceKind::Z => "z",
            PieceKind::S => "s",
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::L => "l",
            PieceKind::J => "j",
        }
    }

    /// Name used by the game client
    pub fn host_name(&self) -> &'static str {
        match self {
            PieceKind::T => "TShape",
            PieceKind::Z => "ZShape",
            PieceKind::S => "SShape",
            PieceKind::I => "LineShape",
            PieceKind::O => "SquareShape",
            PieceKind::L => "LShape",
            PieceKind::J => "MirroredLShape",
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (0° rotation)
/// - **East**: Rotated 90° clockwise
/// - **South**: Rotated 180°
/// - **West**: Rotated 90° counter-clockwise (270° clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use obseris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// ```
    /// use obseris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Numeric rotation index (North = 0, clockwise)
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation for an index, taken modulo 4
    pub fn from_index(index: i32) -> Self {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// Inputs that make up a placement path
///
/// Paths produced by the move search only contain these actions. Every path
/// ends with exactly one [`GameAction::HardDrop`], which locks the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down
    SoftDrop,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Drop to the lowest valid row and lock
    HardDrop,
}

impl GameAction {
    /// Parse action from string (for the wire protocol)
    ///
    /// ```
    /// use obseris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "rotateccw" => Some(GameAction::RotateCcw),
            "rotatecw" => Some(GameAction::RotateCw),
            "harddrop" => Some(GameAction::HardDrop),
            _ => None,
        }
    }

    /// Convert to camelCase string for the wire protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::RotateCw => "rotateCw",
            GameAction::HardDrop => "hardDrop",
        }
    }

    pub fn is_rotation(&self) -> bool {
        matches!(self, GameAction::RotateCw | GameAction::RotateCcw)
    }
}

/// T-Spin detection result
///
/// - **None**: Not a T-spin
/// - **Mini**: 3+ corners filled but not both front corners
/// - **Full**: 3+ corners filled and both front corners filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl TSpinKind {
    /// Convert to optional string representation
    ///
    /// Returns `None` for `TSpinKind::None`, `Some("mini")` for Mini,
    /// and `Some("full")` for Full.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TSpinKind::None => None,
            TSpinKind::Mini => Some("mini"),
            TSpinKind::Full => Some("full"),
        }
    }

    pub fn is_spin(&self) -> bool {
        !matches!(self, TSpinKind::None)
    }
}
