//! Outcome records - one per reachable placement
//!
//! An [`Outcome`] carries everything the caller needs to pick a move and
//! everything [`GameState::commit`](crate::GameState::commit) needs to apply
//! it, so committing never re-runs the rules.

use crate::board::Board;
use crate::pieces::get_shape;
use crate::scoring::evaluate_clear;
use crate::spin;
use crate::types::{
    GameAction, PieceKind, Rotation, TSpinKind, NEXT_QUEUE_LEN, SPAWN_X, SPAWN_Y, VISIBLE_HEIGHT,
};

/// Session values a placement is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveContext {
    pub combo: i32,
    pub back_to_back: bool,
    pub pending_garbage: u32,
    pub used_hold: bool,
    pub next_queue_after: [Option<PieceKind>; NEXT_QUEUE_LEN],
    pub generation: u64,
}

/// A landing square found by the search, before evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
    /// Input that produced the search state this landing came from
    pub last_action: Option<GameAction>,
}

/// A reachable final placement and its consequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Board after placement and line clear (unplaced on lockout)
    pub board: Board,
    /// Inputs from spawn, ending with one `HardDrop`
    pub path: Vec<GameAction>,
    pub lines_cleared: u32,
    pub spin: TSpinKind,
    pub score: u32,
    pub attack: u32,
    pub pending_garbage: u32,
    pub combo: i32,
    pub back_to_back: bool,
    pub game_over: bool,
    pub used_hold: bool,
    pub used_soft_drop: bool,
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
    pub kind: PieceKind,
    /// Upcoming pieces once this outcome is committed, front spawns next
    pub next_queue_after: [Option<PieceKind>; NEXT_QUEUE_LEN],
    /// Session generation this outcome was computed against
    pub generation: u64,
}

impl Outcome {
    /// Game-over outcome for a piece that cannot enter the board
    pub fn spawn_blocked(board: &Board, kind: PieceKind, ctx: &MoveContext) -> Self {
        Self {
            board: board.clone(),
            path: Vec::new(),
            lines_cleared: 0,
            spin: TSpinKind::None,
            score: 0,
            attack: 0,
            pending_garbage: ctx.pending_garbage,
            combo: ctx.combo,
            back_to_back: ctx.back_to_back,
            game_over: true,
            used_hold: ctx.used_hold,
            used_soft_drop: false,
            x: SPAWN_X,
            y: SPAWN_Y,
            rotation: Rotation::North,
            kind,
            next_queue_after: ctx.next_queue_after,
            generation: ctx.generation,
        }
    }
}

/// Every cell of the piece sits in the hidden buffer
pub fn is_lockout(kind: PieceKind, y: i8, rotation: Rotation) -> bool {
    get_shape(kind, rotation)
        .iter()
        .all(|&(_, dy)| y + dy < VISIBLE_HEIGHT as i8)
}

/// Apply the rules to a landing: lockout, merge, spin, clear, scoring
pub fn evaluate(
    board: &Board,
    landing: &Landing,
    path: Vec<GameAction>,
    used_soft_drop: bool,
    ctx: &MoveContext,
) -> Outcome {
    let Landing {
        kind,
        x,
        y,
        rotation,
        last_action,
    } = *landing;

    let mut outcome = Outcome {
        board: board.clone(),
        path,
        lines_cleared: 0,
        spin: TSpinKind::None,
        score: 0,
        attack: 0,
        pending_garbage: ctx.pending_garbage,
        combo: ctx.combo,
        back_to_back: ctx.back_to_back,
        game_over: false,
        used_hold: ctx.used_hold,
        used_soft_drop,
        x,
        y,
        rotation,
        kind,
        next_queue_after: ctx.next_queue_after,
        generation: ctx.generation,
    };

    if is_lockout(kind, y, rotation) {
        outcome.game_over = true;
        return outcome;
    }

    let placed = board.place(&get_shape(kind, rotation), x, y);
    let spin = spin::classify(&placed, kind, x, y, rotation, last_action);
    let (cleared, lines) = placed.clear_lines();
    let result = evaluate_clear(
        lines,
        spin,
        ctx.combo,
        ctx.back_to_back,
        ctx.pending_garbage,
        lines > 0 && cleared.is_empty(),
    );

    outcome.board = cleared;
    outcome.lines_cleared = lines;
    outcome.spin = spin;
    outcome.score = result.score;
    outcome.attack = result.attack_sent;
    outcome.pending_garbage = result.pending_garbage;
    outcome.combo = result.combo;
    outcome.back_to_back = result.back_to_back;
    outcome
}
