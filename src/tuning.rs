//! Data-driven game balance
//!
//! Every field has a default matching the stock table, so a tuning file only
//! needs the values it overrides.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PinballError;

/// Playfield and physics feel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardTuning {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub restitution: f32,
    pub friction: f32,
    pub air_friction: f32,
    /// Ball speed cap (px per reference step)
    pub max_speed: f32,
    /// Physics sub-steps per fixed step
    pub substeps: u32,
    pub launch_max_force: f32,
    /// Flipper angular velocity while held
    pub flipper_power: f32,
    /// Where the ball waits for launch
    pub ball_start: Vec2,
    pub ball_radius: f32,
    /// Launch force only applies while the ball is right of / below these
    pub plunger_lane_min_x: f32,
    pub plunger_lane_min_y: f32,
    /// Ball past this y (below the board) is drained
    pub drain_margin: f32,
    /// Ramp exit
    pub ramp_exit_position: Vec2,
    pub ramp_exit_velocity: Vec2,
    /// Ejection force applied by each kicker
    pub kicker_alpha_force: Vec2,
    pub kicker_beta_force: Vec2,
}

impl Default for BoardTuning {
    fn default() -> Self {
        Self {
            width: 540.0,
            height: 840.0,
            gravity: 1.02,
            restitution: 0.74,
            friction: 0.001,
            air_friction: 0.01,
            max_speed: 23.0,
            substeps: 2,
            launch_max_force: 0.09,
            flipper_power: 0.26,
            ball_start: Vec2::new(524.0, 738.0),
            ball_radius: 11.0,
            plunger_lane_min_x: 508.0,
            plunger_lane_min_y: 600.0,
            drain_margin: 20.0,
            ramp_exit_position: Vec2::new(390.0, 150.0),
            ramp_exit_velocity: Vec2::new(-6.0, 2.0),
            kicker_alpha_force: Vec2::new(-0.03, -0.05),
            kicker_beta_force: Vec2::new(0.03, -0.05),
        }
    }
}

impl BoardTuning {
    /// y below which the ball counts as drained
    pub fn drain_y(&self) -> f32 {
        self.height + self.drain_margin
    }

    /// Ball is sitting in the plunger lane
    pub fn in_plunger_lane(&self, position: Vec2) -> bool {
        position.x >= self.plunger_lane_min_x && position.y >= self.plunger_lane_min_y
    }
}

/// Point values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    pub bumper: u64,
    pub sling: u64,
    pub target: u64,
    /// Awarded (times multiplier) when every target is lit
    pub mission_bonus: u64,
    pub orbit_bonus: u64,
    pub spinner: u64,
    pub kicker: u64,
    pub rollover: u64,
    pub rollover_cycle_bonus: u64,
    /// Bumper points are multiplied by this while the jackpot window is open
    pub jackpot_factor: u64,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            bumper: 220,
            sling: 140,
            target: 350,
            mission_bonus: 3500,
            orbit_bonus: 500,
            spinner: 25,
            kicker: 750,
            rollover: 50,
            rollover_cycle_bonus: 2500,
            jackpot_factor: 2,
        }
    }
}

/// Cooldowns and delays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    pub spinner_cooldown_ms: f64,
    pub kicker_cooldown_ms: f64,
    pub kicker_eject_delay_ms: f64,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            spinner_cooldown_ms: 60.0,
            kicker_cooldown_ms: 900.0,
            kicker_eject_delay_ms: 120.0,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub board: BoardTuning,
    pub scoring: ScoreTuning,
    pub timing: TimingTuning,
}

impl Tuning {
    /// Parse tuning JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, PinballError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Read a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PinballError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Clamp values that would stall the loop
    fn sanitized(mut self) -> Self {
        self.board.substeps = self.board.substeps.clamp(1, 16);
        self.board.max_speed = self.board.max_speed.max(1.0);
        self.scoring.jackpot_factor = self.scoring.jackpot_factor.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"scoring": {"bumper": 500}}"#).unwrap();
        assert_eq!(tuning.scoring.bumper, 500);
        assert_eq!(tuning.scoring.sling, 140);
        assert_eq!(tuning.board, BoardTuning::default());
    }

    #[test]
    fn test_substeps_clamped() {
        let tuning = Tuning::from_json(r#"{"board": {"substeps": 0}}"#).unwrap();
        assert_eq!(tuning.board.substeps, 1);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            Tuning::from_json("{not json"),
            Err(PinballError::Tuning(_))
        ));
    }
}
