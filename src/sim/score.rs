//! Score engine
//!
//! Score, combo multiplier and the lit target set. Every operation takes the
//! previous state by reference and returns the next one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::{COMBO_MULTIPLIER_CAP, COMBO_WINDOW_MS, MAX_MULTIPLIER};

/// Score and multiplier state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    /// Always in `1..=MAX_MULTIPLIER`
    pub multiplier: u32,
    /// Timestamp (ms) of the last scoring hit, 0 before the first
    pub last_hit_at: f64,
    /// Targets hit since the set was last completed
    pub targets_lit: BTreeSet<u8>,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            score: 0,
            multiplier: 1,
            last_hit_at: 0.0,
            targets_lit: BTreeSet::new(),
        }
    }

    /// True while a hit at `now` would extend the combo
    pub fn combo_active(&self, now: f64) -> bool {
        self.last_hit_at > 0.0 && now - self.last_hit_at <= COMBO_WINDOW_MS
    }
}

/// Score a hit worth `points` at time `now`
pub fn register_hit(state: &ScoreState, points: u64, now: f64) -> ScoreState {
    let multiplier = if state.combo_active(now) {
        (state.multiplier + 1).min(COMBO_MULTIPLIER_CAP)
    } else {
        1
    };
    ScoreState {
        score: state.score + points * multiplier as u64,
        multiplier,
        last_hit_at: now,
        targets_lit: state.targets_lit.clone(),
    }
}

/// Score a standup target and light it. Lighting all `target_count` targets
/// pays `mission_bonus` times the multiplier, bumps the multiplier and
/// clears the set.
pub fn register_target(
    state: &ScoreState,
    target_id: u8,
    target_count: usize,
    target_points: u64,
    mission_bonus: u64,
    now: f64,
) -> ScoreState {
    let mut next = register_hit(state, target_points, now);
    next.targets_lit.insert(target_id);
    if next.targets_lit.len() >= target_count {
        next.score += mission_bonus * next.multiplier as u64;
        next.multiplier = (next.multiplier + 1).min(MAX_MULTIPLIER);
        next.targets_lit.clear();
    }
    next
}

/// Add points as-is, without touching the combo
pub fn award_bonus(state: &ScoreState, points: u64) -> ScoreState {
    ScoreState {
        score: state.score + points,
        ..state.clone()
    }
}

/// Raise the multiplier by `by`, capped at [`MAX_MULTIPLIER`]
pub fn boost_multiplier(state: &ScoreState, by: u32) -> ScoreState {
    ScoreState {
        multiplier: state.multiplier.saturating_add(by).clamp(1, MAX_MULTIPLIER),
        ..state.clone()
    }
}
