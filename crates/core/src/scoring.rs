//! Scoring module - score, attack and garbage bookkeeping for one placement
//!
//! Rules:
//! - Spin clears use the T-spin tables instead of the plain line tables.
//! - Back-to-back continues when the previous clear was difficult (any spin or
//!   four lines) and this one is too. It adds +1 attack and a 3/2 multiplier
//!   on the base points.
//! - The combo counter is `-1` with no chain, `0` for the first clear of a
//!   chain, and counts up from there.
//! - Attack cancels pending garbage before anything is sent. The perfect clear
//!   bonus is added after cancellation.

use crate::types::{
    TSpinKind, B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_ATTACK, COMBO_ATTACK_CAP, COMBO_BASE,
    LINE_ATTACK, LINE_SCORES, PERFECT_CLEAR_ATTACK, PERFECT_CLEAR_SCORE, TSPIN_ATTACK,
    TSPIN_FALLBACK_SCORE, TSPIN_MINI_FALLBACK_SCORE, TSPIN_MINI_SCORES, TSPIN_SCORES,
};

/// Consequences of locking a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearResult {
    /// Points gained (B2B multiplier, combo bonus and perfect clear included)
    pub score: u32,
    /// Attack sent after cancelling pending garbage
    pub attack_sent: u32,
    pub pending_garbage: u32,
    pub combo: i32,
    pub back_to_back: bool,
    /// Whether this clear continued a back-to-back chain
    pub b2b_applied: bool,
}

/// Base attack before B2B and combo bonuses
pub fn base_attack(spin: TSpinKind, lines: u32) -> u32 {
    match spin {
        TSpinKind::Full => match lines {
            1..=3 => TSPIN_ATTACK[lines as usize - 1],
            _ => 0,
        },
        TSpinKind::Mini => {
            if lines == 2 {
                2
            } else {
                1
            }
        }
        TSpinKind::None => LINE_ATTACK.get(lines as usize).copied().unwrap_or(0),
    }
}

/// Base points before the B2B multiplier
pub fn base_score(spin: TSpinKind, lines: u32) -> u32 {
    match spin {
        TSpinKind::Full => match lines {
            1..=3 => TSPIN_SCORES[lines as usize - 1],
            _ => TSPIN_FALLBACK_SCORE,
        },
        TSpinKind::Mini => match lines {
            1..=2 => TSPIN_MINI_SCORES[lines as usize - 1],
            _ => TSPIN_MINI_FALLBACK_SCORE,
        },
        TSpinKind::None => LINE_SCORES.get(lines as usize).copied().unwrap_or(0),
    }
}

/// Combo attack bonus; nothing below a combo of 1
pub fn combo_attack(combo: i32) -> u32 {
    if combo < 1 {
        return 0;
    }
    COMBO_ATTACK
        .get(combo as usize)
        .copied()
        .unwrap_or(COMBO_ATTACK_CAP)
}

/// Calculate combo bonus points: `COMBO_BASE * combo` when combo > 0
pub fn calculate_combo_bonus(combo: i32) -> u32 {
    if combo <= 0 {
        return 0;
    }
    COMBO_BASE.saturating_mul(combo as u32)
}

/// A clear that keeps back-to-back alive
pub fn is_difficult(spin: TSpinKind, lines: u32) -> bool {
    lines > 0 && (spin.is_spin() || lines == 4)
}

/// Apply the B2B multiplier (3/2) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points
        .saturating_mul(B2B_NUMERATOR)
        .saturating_div(B2B_DENOMINATOR)
}

/// Cancel `attack` against `pending`; returns `(sent, pending_after)`
pub fn offset_garbage(attack: u32, pending: u32) -> (u32, u32) {
    if attack == 0 {
        return (0, pending);
    }
    if pending >= attack {
        (0, pending - attack)
    } else {
        (attack - pending, 0)
    }
}

/// Evaluate a lock that cleared `lines` rows
///
/// `perfect_clear` is true when the board is empty after the clear.
pub fn evaluate_clear(
    lines: u32,
    spin: TSpinKind,
    combo_before: i32,
    b2b_before: bool,
    pending_before: u32,
    perfect_clear: bool,
) -> ClearResult {
    if lines == 0 {
        return ClearResult {
            score: 0,
            attack_sent: 0,
            pending_garbage: pending_before,
            combo: -1,
            back_to_back: b2b_before,
            b2b_applied: false,
        };
    }

    let combo = combo_before.saturating_add(1);
    let difficult = is_difficult(spin, lines);
    let b2b_applied = b2b_before && difficult;

    let mut attack = base_attack(spin, lines);
    if b2b_applied && attack > 0 {
        attack += 1;
    }
    attack += combo_attack(combo);

    let (mut attack_sent, pending_garbage) = offset_garbage(attack, pending_before);

    let mut score = base_score(spin, lines);
    if b2b_applied {
        score = apply_b2b_multiplier(score);
    }
    score = score.saturating_add(calculate_combo_bonus(combo));

    if perfect_clear {
        attack_sent += PERFECT_CLEAR_ATTACK;
        score = score.saturating_add(PERFECT_CLEAR_SCORE);
    }

    ClearResult {
        score,
        attack_sent,
        pending_garbage,
        combo,
        back_to_back: difficult,
        b2b_applied,
    }
}
