//! Pinball Lab - An arcade pinball game-logic core
//!
//! Core modules:
//! - `sim`: Game logic (score, missions, phase, collision routing, session)
//! - `physics`: Rigid-body collaborator trait and a small built-in world
//! - `platform`: Key-value storage abstraction
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod highscore;
pub mod physics;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::PinballError;
pub use highscore::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum fixed steps per frame to prevent spiral of death
    pub const MAX_STEPS_PER_FRAME: u32 = 8;

    /// Hits closer together than this keep the combo going
    pub const COMBO_WINDOW_MS: f64 = 3500.0;
    /// Multiplier cap reachable through combo hits alone
    pub const COMBO_MULTIPLIER_CAP: u32 = 6;
    /// Multiplier cap for target-set completion and mission rewards
    pub const MAX_MULTIPLIER: u32 = 8;

    /// Balls at the start of a game
    pub const START_BALLS: u8 = 3;
    /// Extra-ball rewards never push the count above this
    pub const MAX_BALLS: u8 = 5;

    /// Center-target chain window (mission engine)
    pub const CENTER_CHAIN_WINDOW_MS: f64 = 1800.0;
    /// Left-then-right sling pairing window (mission engine)
    pub const SLING_PAIR_WINDOW_MS: f64 = 2000.0;

    /// Pointer presses below this screen y control the launcher
    pub const POINTER_LAUNCH_ZONE_Y: f32 = 760.0;
    /// Launch charge added per key-repeat of the launch key
    pub const LAUNCH_CHARGE_STEP: f32 = 0.08;
    /// Weakest launch force, even with no charge
    pub const MIN_LAUNCH_FORCE: f32 = 0.012;

    /// Transient popup lifetime
    pub const POPUP_MS: f64 = 1400.0;
}
