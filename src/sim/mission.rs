//! Mission engine
//!
//! Eight missions are played strictly in order. Each needs a number of
//! occurrences of one gameplay event; two of them carry time-window rules
//! (the center-target chain and the left-then-right sling pair). Completing a
//! mission hands its definition back to the caller, who applies the reward.

use serde::{Deserialize, Serialize};

use crate::consts::{CENTER_CHAIN_WINDOW_MS, SLING_PAIR_WINDOW_MS};

/// Typed gameplay events the missions listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionEvent {
    UpperLane,
    RightTargetGroupComplete,
    CenterTargetHit,
    SlingLeft,
    SlingRight,
    KickerAlpha,
    KickerBeta,
    RolloverCycle,
    SpinnerTick,
    OrbitPass,
}

impl MissionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionEvent::UpperLane => "upper_lane",
            MissionEvent::RightTargetGroupComplete => "right_target_group_complete",
            MissionEvent::CenterTargetHit => "center_target_hit",
            MissionEvent::SlingLeft => "sling_left",
            MissionEvent::SlingRight => "sling_right",
            MissionEvent::KickerAlpha => "kicker_alpha",
            MissionEvent::KickerBeta => "kicker_beta",
            MissionEvent::RolloverCycle => "rollover_cycle",
            MissionEvent::SpinnerTick => "spinner_tick",
            MissionEvent::OrbitPass => "orbit_pass",
        }
    }

    fn is_sling(&self) -> bool {
        matches!(self, MissionEvent::SlingLeft | MissionEvent::SlingRight)
    }
}

/// What completing a mission pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MissionReward {
    /// Scaled by the multiplier when applied
    pub score_bonus: Option<u64>,
    pub multiplier_boost: Option<u32>,
    pub ball_save_ms: Option<u32>,
    pub jackpot_ms: Option<u32>,
    pub extra_ball: Option<u8>,
}

impl MissionReward {
    const NONE: MissionReward = MissionReward {
        score_bonus: None,
        multiplier_boost: None,
        ball_save_ms: None,
        jackpot_ms: None,
        extra_ball: None,
    };
}

/// One mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissionDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Occurrences of `event` needed
    pub target: u32,
    pub event: MissionEvent,
    pub reward: MissionReward,
}

/// The mission ladder, in play order
pub static MISSIONS: [MissionDefinition; 8] = [
    MissionDefinition {
        id: "orbit-setup",
        title: "M1 ORBIT SETUP",
        description: "Pass the outer orbit 3 times",
        target: 3,
        event: MissionEvent::OrbitPass,
        reward: MissionReward {
            multiplier_boost: Some(1),
            score_bonus: Some(1200),
            ..MissionReward::NONE
        },
    },
    MissionDefinition {
        id: "target-sweep-a",
        title: "M2 TARGET SWEEP A",
        description: "Light the right target bank twice",
        target: 2,
        event: MissionEvent::RightTargetGroupComplete,
        reward: MissionReward {
            score_bonus: Some(1800),
            ..MissionReward::NONE
        },
    },
    MissionDefinition {
        id: "target-sweep-b",
        title: "M3 TARGET SWEEP B",
        description: "Hit the center targets 4 times in a row",
        target: 4,
        event: MissionEvent::CenterTargetHit,
        reward: MissionReward {
            jackpot_ms: Some(8000),
            score_bonus: Some(2300),
            ..MissionReward::NONE
        },
    },
    MissionDefinition {
        id: "lane-charge",
        title: "M4 LANE CHARGE",
        description: "Roll through the upper lanes 5 times",
        target: 5,
        event: MissionEvent::UpperLane,
        reward: MissionReward {
            multiplier_boost: Some(1),
            score_bonus: Some(2200),
            ..MissionReward::NONE
        },
    },
    MissionDefinition {
        id: "spinner-rush",
        title: "M5 SPINNER RUSH",
        description: "Spin the spinner 60 times",
        target: 60,
        event: MissionEvent::SpinnerTick,
        reward: MissionReward {
            score_bonus: Some(2500),
            ..MissionReward::NONE
        },
    },
    MissionDefinition {
        id: "bumper-heat",
        title: "M6 BUMPER HEAT",
        description: "Bounce left then right off the slings 8 times",
        target: 8,
        event: MissionEvent::SlingLeft,
        reward: MissionReward {
            ball_save_ms: Some(12000),
            score_bonus: Some(2800),
            ..MissionReward::NONE
        },
    },
    MissionDefinition {
        id: "kicker-delivery",
        title: "M7 KICKER DELIVERY",
        description: "Feed the alpha kicker twice",
        target: 2,
        event: MissionEvent::KickerAlpha,
        reward: MissionReward {
            score_bonus: Some(3000),
            multiplier_boost: Some(1),
            ..MissionReward::NONE
        },
    },
    MissionDefinition {
        id: "jackpot-build",
        title: "M8 JACKPOT BUILD",
        description: "Feed the beta kicker twice for an extra ball",
        target: 2,
        event: MissionEvent::KickerBeta,
        reward: MissionReward {
            extra_ball: Some(1),
            score_bonus: Some(5000),
            jackpot_ms: Some(12000),
            ..MissionReward::NONE
        },
    },
];

/// Mission progression state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionState {
    /// Index of the current mission; `MISSIONS.len()` once all are done
    pub index: usize,
    /// Count toward the current mission's target
    pub progress: u32,
    /// Ids of completed missions, in completion order
    pub completed: Vec<&'static str>,
    pub center_chain_window_until: f64,
    pub slings_pair_window_until: f64,
    pub pending_left_sling: bool,
}

impl Default for MissionState {
    fn default() -> Self {
        Self::new()
    }
}

impl MissionState {
    pub fn new() -> Self {
        Self {
            index: 0,
            progress: 0,
            completed: Vec::new(),
            center_chain_window_until: 0.0,
            slings_pair_window_until: 0.0,
            pending_left_sling: false,
        }
    }

    /// All missions complete
    pub fn is_terminal(&self) -> bool {
        self.index >= MISSIONS.len()
    }
}

/// Result of feeding one event to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct MissionAdvance {
    pub state: MissionState,
    /// Set when this event finished the current mission
    pub completed: Option<&'static MissionDefinition>,
}

impl MissionAdvance {
    fn unchanged(state: MissionState) -> Self {
        Self {
            state,
            completed: None,
        }
    }
}

/// Feed one gameplay event at time `now`
pub fn register_mission_event(
    state: &MissionState,
    event: MissionEvent,
    now: f64,
) -> MissionAdvance {
    let Some(current) = current_mission(state) else {
        return MissionAdvance::unchanged(state.clone());
    };
    let mut next = state.clone();

    // Window bookkeeping runs whichever mission is current
    if event == MissionEvent::CenterTargetHit {
        if now > next.center_chain_window_until {
            // Chain broken by time
            next.progress = 0;
        }
        next.center_chain_window_until = now + CENTER_CHAIN_WINDOW_MS;
    }
    if event.is_sling() {
        if now > next.slings_pair_window_until {
            next.pending_left_sling = false;
        }
        next.slings_pair_window_until = now + SLING_PAIR_WINDOW_MS;
    }

    let counts = if current.event == MissionEvent::SlingLeft {
        // Paired rule: left arms, right scores
        match event {
            MissionEvent::SlingLeft => {
                next.pending_left_sling = true;
                return MissionAdvance::unchanged(next);
            }
            MissionEvent::SlingRight if next.pending_left_sling => {
                next.pending_left_sling = false;
                true
            }
            _ => false,
        }
    } else {
        event == current.event
    };

    if !counts {
        return MissionAdvance::unchanged(next);
    }

    next.progress += 1;
    if next.progress < current.target {
        return MissionAdvance::unchanged(next);
    }

    next.completed.push(current.id);
    next.index += 1;
    next.progress = 0;
    MissionAdvance {
        state: next,
        completed: Some(current),
    }
}

/// The mission being played, `None` once all are complete
pub fn current_mission(state: &MissionState) -> Option<&'static MissionDefinition> {
    MISSIONS.get(state.index)
}

/// Up to `count` missions after the current one
pub fn next_missions(state: &MissionState, count: usize) -> &'static [MissionDefinition] {
    let start = (state.index + 1).min(MISSIONS.len());
    let end = (start + count).min(MISSIONS.len());
    &MISSIONS[start..end]
}
