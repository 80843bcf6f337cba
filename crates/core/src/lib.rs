//! Core engine - move enumeration and rules, pure and deterministic
//!
//! This crate contains the placement search, the game rules and session
//! state. It has **zero dependencies** on networking or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical sessions (for AI training)
//! - **Testable**: Every rule table is covered by unit tests
//! - **Shareable**: Sessions own their state; only `const` tables are shared
//!
//! # Module Structure
//!
//! - [`pieces`]: Tetromino shapes and SRS kick tables
//! - [`board`]: 10x40 board with collision, gravity, line clears and garbage
//! - [`spin`]: Corner-rule T-spin classification
//! - [`scoring`]: Score, attack, combo, back-to-back and garbage cancellation
//! - [`rng`]: Seeded 7-bag queue with a 5-piece view
//! - [`search`]: Breadth-first enumeration of every reachable placement
//! - [`outcome`]: Placement records and their evaluation
//! - [`game_state`]: Session orchestration (enumerate, commit, garbage, hold)
//! - [`codec`]: Host marshalling of boards and queues
//!
//! # Example
//!
//! ```
//! use obseris_core::GameState;
//!
//! let mut game = GameState::new(12345);
//!
//! // Enumerate every placement of the current piece (and of the hold piece).
//! let moves = game.possible_moves().unwrap();
//! assert!(!moves.is_empty());
//!
//! // Commit the one with the best score.
//! let best = moves.iter().max_by_key(|m| m.score).unwrap();
//! game.commit(best).unwrap();
//!
//! // The outcomes from before the commit are now stale.
//! assert!(game.commit(&moves[0]).is_err());
//! ```

pub mod board;
pub mod codec;
pub mod error;
pub mod game_state;
pub mod outcome;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod search;
pub mod snapshot;
pub mod spin;

pub use obseris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use error::EngineError;
pub use game_state::GameState;
pub use outcome::{MoveContext, Outcome};
pub use pieces::{get_shape, kick_tests, kind_from_index, kind_from_name, try_rotate};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{evaluate_clear, ClearResult};
pub use search::{find_moves, SearchState};
pub use snapshot::GameSnapshot;
