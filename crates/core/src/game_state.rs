//! Game state module - owns one session
//!
//! Ties together the board, the piece queue, hold and the scoring counters.
//! The session changes only through [`GameState::commit`],
//! [`GameState::add_pending_garbage`], [`GameState::reset`] and
//! [`GameState::set_board`]; each of those bumps the generation stamp so that
//! outcomes enumerated earlier can no longer be committed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::board::Board;
use crate::error::EngineError;
use crate::outcome::{MoveContext, Outcome};
use crate::pieces::get_shape;
use crate::rng::{PieceQueue, SimpleRng};
use crate::search::find_moves;
use crate::snapshot::GameSnapshot;
use crate::types::{PieceKind, Rotation, BOARD_WIDTH, MAX_GARBAGE_PER_APPLY, SPAWN_X, SPAWN_Y};

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current: Option<PieceKind>,
    hold: Option<PieceKind>,
    queue: PieceQueue,
    /// Separate stream so garbage holes do not perturb the piece sequence
    garbage_rng: SimpleRng,
    can_hold: bool,
    score: u64,
    combo: i32,
    back_to_back: bool,
    pending_garbage: u32,
    game_over: bool,
    generation: u64,
    episode_id: u32,
    seed: u32,
}

fn garbage_seed(seed: u32) -> u32 {
    seed.rotate_left(16) ^ 0x9e37_79b9
}

impl GameState {
    /// Create a new session with the given RNG seed and spawn the first piece
    pub fn new(seed: u32) -> Self {
        let mut state = Self {
            board: Board::new(),
            current: None,
            hold: None,
            queue: PieceQueue::new(seed),
            garbage_rng: SimpleRng::new(garbage_seed(seed)),
            can_hold: true,
            score: 0,
            combo: -1,
            back_to_back: false,
            pending_garbage: 0,
            game_over: false,
            generation: 0,
            episode_id: 0,
            seed,
        };
        state.spawn_piece();
        state
    }

    /// Create a session seeded from wall-clock time and thread identity.
    ///
    /// Two sessions created this way are not reproducible; use
    /// [`GameState::new`] whenever a run has to be replayed.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        nanos.hash(&mut hasher);
        let h = hasher.finish();
        Self::new((h ^ (h >> 32)) as u32)
    }

    /// Start a new episode, continuing the current RNG streams
    pub fn reset(&mut self) {
        self.queue.restart();
        self.begin_episode();
    }

    /// Start a new episode from a fresh seed
    pub fn reset_with_seed(&mut self, seed: u32) {
        self.seed = seed;
        self.queue = PieceQueue::new(seed);
        self.garbage_rng = SimpleRng::new(garbage_seed(seed));
        self.begin_episode();
    }

    fn begin_episode(&mut self) {
        self.board.clear();
        self.current = None;
        self.hold = None;
        self.can_hold = true;
        self.score = 0;
        self.combo = -1;
        self.back_to_back = false;
        self.pending_garbage = 0;
        self.game_over = false;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.generation += 1;
        self.spawn_piece();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<PieceKind> {
        self.current
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    /// The five visible upcoming pieces, front spawns next
    pub fn next_queue(&self) -> &[PieceKind] {
        self.queue.view()
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Combo counter, `-1` when no chain is running
    pub fn combo(&self) -> i32 {
        self.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn pending_garbage(&self) -> u32 {
        self.pending_garbage
    }

    /// Stamp carried by outcomes; bumped on every state change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board = self.board.clone();
        out.current = self.current;
        out.hold = self.hold;
        out.next_queue = self.queue.preview(0);
        out.can_hold = self.can_hold;
        out.game_over = self.game_over;
        out.score = self.score;
        out.combo = self.combo;
        out.back_to_back = self.back_to_back;
        out.pending_garbage = self.pending_garbage;
        out.generation = self.generation;
        out.episode_id = self.episode_id;
        out.seed = self.seed;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Replace the board with a host-supplied one
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
        self.generation += 1;
    }

    fn move_context(&self, used_hold: bool, queue_offset: usize) -> MoveContext {
        MoveContext {
            combo: self.combo,
            back_to_back: self.back_to_back,
            pending_garbage: self.pending_garbage,
            used_hold,
            next_queue_after: self.queue.preview(queue_offset),
            generation: self.generation,
        }
    }

    /// Every placement of the current piece, then (if hold is available)
    /// every placement of the piece hold would bring in
    pub fn possible_moves(&self) -> Result<Vec<Outcome>, EngineError> {
        if self.game_over {
            return Ok(Vec::new());
        }
        let Some(current) = self.current else {
            return Ok(Vec::new());
        };

        let mut moves = find_moves(&self.board, current, &self.move_context(false, 0))?;

        if self.can_hold {
            let exposed = match self.hold {
                Some(held) => Some((held, 0)),
                None => self.queue.view().first().map(|&front| (front, 1)),
            };
            if let Some((kind, offset)) = exposed {
                moves.extend(find_moves(&self.board, kind, &self.move_context(true, offset))?);
            }
        }

        Ok(moves)
    }

    /// Apply an outcome returned by [`GameState::possible_moves`]
    ///
    /// A no-op once the game is over. Outcomes from an earlier generation are
    /// rejected and leave the session untouched.
    pub fn commit(&mut self, outcome: &Outcome) -> Result<(), EngineError> {
        if self.game_over {
            return Ok(());
        }
        if outcome.generation != self.generation {
            return Err(EngineError::StaleOutcome {
                expected: self.generation,
                found: outcome.generation,
            });
        }
        self.generation += 1;

        if outcome.game_over {
            self.game_over = true;
            return Ok(());
        }

        self.board = outcome.board.clone();
        self.score = self.score.saturating_add(u64::from(outcome.score));
        self.combo = outcome.combo;
        self.back_to_back = outcome.back_to_back;
        self.pending_garbage = outcome.pending_garbage;

        if outcome.used_hold {
            if self.hold.is_none() {
                // The placed piece came off the front of the view.
                self.queue.advance();
            }
            self.hold = self.current;
            self.can_hold = false;
        } else {
            self.can_hold = true;
        }
        self.current = None;

        if self.pending_garbage > 0 && self.apply_garbage() {
            self.game_over = true;
            return Ok(());
        }

        self.spawn_piece();
        Ok(())
    }

    /// Queue incoming garbage; non-positive amounts are ignored
    pub fn add_pending_garbage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.pending_garbage = self.pending_garbage.saturating_add(amount as u32);
        self.generation += 1;
    }

    /// Raise up to ten pending garbage rows; returns true on overflow
    fn apply_garbage(&mut self) -> bool {
        let lines = self.pending_garbage.min(MAX_GARBAGE_PER_APPLY);
        self.pending_garbage -= lines;

        if self.board.garbage_overflows(lines as usize) {
            return true;
        }

        let hole = self.garbage_rng.next_range(BOARD_WIDTH as u32) as u8;
        self.board.push_garbage(lines as usize, hole);
        false
    }

    /// Take the next piece from the queue; a blocked spawn ends the game
    fn spawn_piece(&mut self) {
        let kind = self.queue.advance();
        self.current = Some(kind);
        if !self
            .board
            .fits(&get_shape(kind, Rotation::North), SPAWN_X, SPAWN_Y)
        {
            self.game_over = true;
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
