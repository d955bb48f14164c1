//! Collision routing
//!
//! Turns collision-start pairs into gameplay effects. Routing only decides
//! *what* happens; the session applies the effects to the engines, the
//! physics world and the timer list.

use std::collections::BTreeSet;

use glam::Vec2;

use super::layout::{BodyRole, KickerId, Side, Table, TargetGroup};
use super::mission::MissionEvent;
use crate::physics::CollisionPair;
use crate::tuning::Tuning;

/// Something a collision asks the session to do
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Combo-scored hit
    Hit { points: u64 },
    /// Combo-scored standup target
    Target { index: u8 },
    /// Feed the mission engine
    Mission(MissionEvent),
    /// Flat points outside the combo
    Bonus { points: u64 },
    Shake,
    Popup(&'static str),
    /// Move the ball and set its velocity
    Teleport { position: Vec2, velocity: Vec2 },
    /// Push the ball after a delay
    Eject { force: Vec2, delay_ms: f64 },
}

/// Router bookkeeping that outlives a single batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouterState {
    /// Right-bank slots hit since the bank last completed
    pub right_targets_lit: BTreeSet<u8>,
    /// Rollover lanes lit since the last full cycle
    pub rollovers_lit: BTreeSet<u8>,
    pub last_spinner_at: Option<f64>,
    /// Shared by both kickers
    pub last_kicker_at: Option<f64>,
}

impl RouterState {
    pub fn new() -> Self {
        Self::default()
    }
}

fn cooled_down(last: Option<f64>, now: f64, cooldown_ms: f64) -> bool {
    last.is_none_or(|at| now - at >= cooldown_ms)
}

/// Route every pair in a batch. Pairs without the ball are ignored.
pub fn route_batch(
    state: &mut RouterState,
    table: &Table,
    tuning: &Tuning,
    pairs: &[CollisionPair],
    now: f64,
    jackpot_active: bool,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    for pair in pairs {
        let Some(other) = pair.other(table.ball) else {
            continue;
        };
        if let Some(role) = table.role(other) {
            route_role(state, table, tuning, role, now, jackpot_active, &mut effects);
        }
    }
    effects
}

/// Effects of the ball touching a body with `role`
pub fn route_role(
    state: &mut RouterState,
    table: &Table,
    tuning: &Tuning,
    role: BodyRole,
    now: f64,
    jackpot_active: bool,
    effects: &mut Vec<Effect>,
) {
    let scoring = &tuning.scoring;
    let timing = &tuning.timing;

    match role {
        BodyRole::Bumper => {
            let factor = if jackpot_active { scoring.jackpot_factor } else { 1 };
            effects.push(Effect::Hit {
                points: scoring.bumper * factor,
            });
            effects.push(Effect::Shake);
        }
        BodyRole::Sling(side) => {
            effects.push(Effect::Hit {
                points: scoring.sling,
            });
            effects.push(Effect::Mission(match side {
                Side::Left => MissionEvent::SlingLeft,
                Side::Right => MissionEvent::SlingRight,
            }));
        }
        BodyRole::OrbitSensor => {
            effects.push(Effect::Mission(MissionEvent::OrbitPass));
            effects.push(Effect::Bonus {
                points: scoring.orbit_bonus,
            });
        }
        BodyRole::RampSensor => {
            effects.push(Effect::Teleport {
                position: tuning.board.ramp_exit_position,
                velocity: tuning.board.ramp_exit_velocity,
            });
            effects.push(Effect::Popup("RAMP!"));
        }
        BodyRole::Spinner => {
            if cooled_down(state.last_spinner_at, now, timing.spinner_cooldown_ms) {
                state.last_spinner_at = Some(now);
                effects.push(Effect::Mission(MissionEvent::SpinnerTick));
                effects.push(Effect::Bonus {
                    points: scoring.spinner,
                });
            }
        }
        BodyRole::Target { group, slot, index } => {
            effects.push(Effect::Target { index });
            match group {
                TargetGroup::Center => {
                    effects.push(Effect::Mission(MissionEvent::CenterTargetHit));
                }
                TargetGroup::Right => {
                    state.right_targets_lit.insert(slot);
                    if state.right_targets_lit.len() >= table.right_target_count {
                        state.right_targets_lit.clear();
                        log::debug!("Right target bank complete");
                        effects.push(Effect::Mission(MissionEvent::RightTargetGroupComplete));
                    }
                }
                TargetGroup::Upper => {}
            }
        }
        BodyRole::Rollover { lane } => {
            state.rollovers_lit.insert(lane);
            effects.push(Effect::Mission(MissionEvent::UpperLane));
            effects.push(Effect::Bonus {
                points: scoring.rollover,
            });
            if state.rollovers_lit.len() >= table.rollover_count {
                state.rollovers_lit.clear();
                log::debug!("Rollover cycle complete");
                effects.push(Effect::Mission(MissionEvent::RolloverCycle));
                effects.push(Effect::Bonus {
                    points: scoring.rollover_cycle_bonus,
                });
            }
        }
        BodyRole::Kicker(kicker) => {
            if cooled_down(state.last_kicker_at, now, timing.kicker_cooldown_ms) {
                state.last_kicker_at = Some(now);
                let (event, force) = match kicker {
                    KickerId::Alpha => (MissionEvent::KickerAlpha, tuning.board.kicker_alpha_force),
                    KickerId::Beta => (MissionEvent::KickerBeta, tuning.board.kicker_beta_force),
                };
                effects.push(Effect::Mission(event));
                effects.push(Effect::Bonus {
                    points: scoring.kicker,
                });
                effects.push(Effect::Eject {
                    force,
                    delay_ms: timing.kicker_eject_delay_ms,
                });
            }
        }
        BodyRole::Ball | BodyRole::Flipper(_) | BodyRole::Plunger | BodyRole::Wall => {}
    }
}
