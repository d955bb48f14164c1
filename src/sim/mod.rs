//! Game logic
//!
//! Engines (score, missions, phase) are pure functions over plain state
//! values. The session owns one of each, feeds them from collision routing
//! and input, and drives the physics world on a fixed timestep:
//! - Fixed timestep only
//! - Body roles assigned at layout time, never parsed from labels
//! - No rendering or platform dependencies

pub mod input;
pub mod layout;
pub mod mission;
pub mod router;
pub mod score;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timers;

pub use input::{InputEvent, InputLatches, InputOutcome, Key};
pub use layout::{BodyRole, KickerId, Side, Table, TableElement, TargetGroup, stock_layout};
pub use mission::{
    MISSIONS, MissionAdvance, MissionDefinition, MissionEvent, MissionReward, MissionState,
    current_mission, next_missions, register_mission_event,
};
pub use router::{Effect, RouterState, route_batch};
pub use score::{ScoreState, award_bonus, boost_multiplier, register_hit, register_target};
pub use session::{Popup, Session};
pub use snapshot::{FrameSnapshot, MissionView};
pub use state::{
    GamePhase, GameState, award_extra_balls, lose_ball, next_ball, restart_game, start_game,
    toggle_pause,
};
pub use tick::FrameClock;
