//! Game phase state machine
//!
//! Phase plus balls remaining. Transitions are pure functions returning the
//! next state.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_BALLS, START_BALLS};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Ball on the plunger, waiting for the first launch
    Ready,
    /// Active gameplay
    Playing,
    /// Ball drained, more balls left
    BallLost,
    /// Ball reset on the plunger, waiting for launch
    NextBall,
    /// Out of balls; only a restart leaves this phase
    GameOver,
    /// Game is paused
    Paused,
}

impl GamePhase {
    /// Label shown by the HUD
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::BallLost => "ball_lost",
            GamePhase::NextBall => "next_ball",
            GamePhase::GameOver => "game_over",
            GamePhase::Paused => "paused",
        }
    }

    /// Waiting on the plunger for a launch
    pub fn awaiting_launch(&self) -> bool {
        matches!(self, GamePhase::Ready | GamePhase::NextBall)
    }
}

/// Phase and balls remaining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub balls_left: u8,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Ready,
            balls_left: START_BALLS,
        }
    }
}

/// Enter play from any phase
pub fn start_game(state: &GameState) -> GameState {
    GameState {
        phase: GamePhase::Playing,
        ..*state
    }
}

/// Drain one ball; the last one ends the game
pub fn lose_ball(state: &GameState) -> GameState {
    let balls_left = state.balls_left.saturating_sub(1);
    GameState {
        phase: if balls_left == 0 {
            GamePhase::GameOver
        } else {
            GamePhase::BallLost
        },
        balls_left,
    }
}

/// Ball reset, waiting for the next launch
pub fn next_ball(state: &GameState) -> GameState {
    GameState {
        phase: GamePhase::NextBall,
        ..*state
    }
}

/// Flip between playing and paused. Any other phase is returned unchanged,
/// so a pause always resumes into play.
pub fn toggle_pause(state: &GameState) -> GameState {
    let phase = match state.phase {
        GamePhase::Playing => GamePhase::Paused,
        GamePhase::Paused => GamePhase::Playing,
        other => other,
    };
    GameState { phase, ..*state }
}

/// Fresh game, regardless of the current phase
pub fn restart_game() -> GameState {
    GameState::new()
}

/// Add extra balls, capped at [`MAX_BALLS`]
pub fn award_extra_balls(state: &GameState, count: u8) -> GameState {
    GameState {
        balls_left: state.balls_left.saturating_add(count).min(MAX_BALLS),
        ..*state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_phase() -> impl Strategy<Value = GamePhase> {
        prop_oneof![
            Just(GamePhase::Ready),
            Just(GamePhase::Playing),
            Just(GamePhase::BallLost),
            Just(GamePhase::NextBall),
            Just(GamePhase::GameOver),
            Just(GamePhase::Paused),
        ]
    }

    #[test]
    fn test_start_to_playing() {
        let started = start_game(&GameState::new());
        assert_eq!(started.phase, GamePhase::Playing);
        assert_eq!(started.balls_left, START_BALLS);
        assert_eq!(start_game(&started), started);
    }

    #[test]
    fn test_lose_last_ball_is_game_over() {
        let state = GameState {
            phase: GamePhase::Playing,
            balls_left: 1,
        };
        let result = lose_ball(&state);
        assert_eq!(result.phase, GamePhase::GameOver);
        assert_eq!(result.balls_left, 0);
    }

    #[test]
    fn test_lose_ball_with_spares() {
        let state = GameState {
            phase: GamePhase::Playing,
            balls_left: 3,
        };
        let result = lose_ball(&state);
        assert_eq!(result.phase, GamePhase::BallLost);
        assert_eq!(result.balls_left, 2);
        assert_eq!(next_ball(&result).phase, GamePhase::NextBall);
    }

    #[test]
    fn test_lose_ball_floors_at_zero() {
        let state = GameState {
            phase: GamePhase::GameOver,
            balls_left: 0,
        };
        assert_eq!(lose_ball(&state).balls_left, 0);
    }

    #[test]
    fn test_pause_toggles_and_restart_resets() {
        let playing = GameState {
            phase: GamePhase::Playing,
            balls_left: 2,
        };
        let paused = toggle_pause(&playing);
        assert_eq!(paused.phase, GamePhase::Paused);
        assert_eq!(toggle_pause(&paused), playing);
        assert_eq!(next_ball(&paused).phase, GamePhase::NextBall);
        assert_eq!(
            restart_game(),
            GameState {
                phase: GamePhase::Ready,
                balls_left: 3
            }
        );
    }

    #[test]
    fn test_pause_ignored_outside_play() {
        for phase in [
            GamePhase::Ready,
            GamePhase::BallLost,
            GamePhase::NextBall,
            GamePhase::GameOver,
        ] {
            let state = GameState {
                phase,
                balls_left: 2,
            };
            assert_eq!(toggle_pause(&state), state);
        }
    }

    #[test]
    fn test_extra_balls_capped() {
        let state = GameState {
            phase: GamePhase::Playing,
            balls_left: 4,
        };
        assert_eq!(award_extra_balls(&state, 1).balls_left, 5);
        assert_eq!(award_extra_balls(&state, 3).balls_left, MAX_BALLS);
    }

    proptest! {
        #[test]
        fn prop_pause_round_trip(phase in any_phase(), balls in 0u8..=5) {
            let state = GameState { phase, balls_left: balls };
            let twice = toggle_pause(&toggle_pause(&state));
            prop_assert_eq!(twice, state);
            prop_assert_eq!(toggle_pause(&state).balls_left, balls);
        }

        #[test]
        fn prop_game_over_iff_last_ball(phase in any_phase(), balls in 1u8..=5) {
            let result = lose_ball(&GameState { phase, balls_left: balls });
            prop_assert_eq!(result.balls_left, balls - 1);
            prop_assert_eq!(result.phase == GamePhase::GameOver, balls == 1);
        }
    }
}
