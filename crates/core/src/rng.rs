//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each piece, shuffled. A new bag is appended to the
//! sequence whenever seven or fewer pieces remain, so the sequence always
//! holds at least one full bag ahead of the 5-piece view.
//!
//! Also provides a simple LCG for deterministic testing.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::types::{PieceKind, BAG_SIZE, NEXT_QUEUE_LEN};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece sequence with a fixed 5-piece lookahead view
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Pieces not yet shown in the view
    sequence: VecDeque<PieceKind>,
    /// The pieces the player can see, front spawns next
    view: ArrayVec<PieceKind, NEXT_QUEUE_LEN>,
    rng: SimpleRng,
}

impl PieceQueue {
    /// Create a queue with two bags queued and the view filled
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            sequence: VecDeque::with_capacity(BAG_SIZE * 3),
            view: ArrayVec::new(),
            rng: SimpleRng::new(seed),
        };
        queue.restart();
        queue
    }

    /// Drop every queued piece and start over with the current RNG state
    pub fn restart(&mut self) {
        self.sequence.clear();
        self.view.clear();
        self.push_bag();
        self.push_bag();
        while !self.view.is_full() {
            let next = self.pull();
            self.view.push(next);
        }
    }

    fn push_bag(&mut self) {
        let mut bag = PieceKind::ALL;
        self.rng.shuffle(&mut bag);
        self.sequence.extend(bag);
    }

    /// Take the sequence front, topping up with a new bag first when low
    fn pull(&mut self) -> PieceKind {
        if self.sequence.len() <= BAG_SIZE {
            self.push_bag();
        }
        // Never empty: a bag was just pushed if it was short.
        self.sequence.pop_front().unwrap_or(PieceKind::T)
    }

    /// Pop the view front and refill the view from the sequence
    pub fn advance(&mut self) -> PieceKind {
        let next = self.pull();
        let front = self.view.remove(0);
        self.view.push(next);
        front
    }

    /// The five visible pieces, front spawns next
    pub fn view(&self) -> &[PieceKind] {
        &self.view
    }

    /// Five pieces starting `offset` places into view + sequence
    ///
    /// Offset 1 shows the queue as it stands after holding into an empty slot.
    pub fn preview(&self, offset: usize) -> [Option<PieceKind>; NEXT_QUEUE_LEN] {
        let mut out = [None; NEXT_QUEUE_LEN];
        let mut upcoming = self.view.iter().chain(self.sequence.iter()).skip(offset);
        for slot in &mut out {
            *slot = upcoming.next().copied();
        }
        out
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
