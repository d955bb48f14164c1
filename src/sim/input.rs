//! Player input
//!
//! Hosts translate their native key and pointer events into [`InputEvent`]s.
//! Key codes follow the DOM `KeyboardEvent.code` names so browser and native
//! hosts share one mapping.

use glam::Vec2;

use super::session::Session;
use super::state::toggle_pause;
use crate::consts::{LAUNCH_CHARGE_STEP, POINTER_LAUNCH_ZONE_Y};
use crate::physics::PhysicsWorld;
use crate::platform::KeyValueStore;

/// Game action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    LeftFlipper,
    RightFlipper,
    Launch,
    Pause,
    Restart,
}

impl Key {
    /// Map a key code; unbound keys give `None`
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::LeftFlipper),
            "ArrowRight" | "KeyL" => Some(Key::RightFlipper),
            "Space" => Some(Key::Launch),
            "KeyP" => Some(Key::Pause),
            "KeyR" => Some(Key::Restart),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Sent again for every key repeat
    KeyDown(Key),
    KeyUp(Key),
    /// Board coordinates
    PointerDown(Vec2),
    PointerUp(Vec2),
}

/// What the host should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Handled,
    /// Ask the player to confirm, then call [`Session::restart`]
    RestartRequested,
}

/// Held controls
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputLatches {
    pub left: bool,
    pub right: bool,
    /// 0..=1
    pub launch_charge: f32,
    /// When a pointer launch press started
    pub pointer_launch_at: Option<f64>,
}

fn in_launch_zone(position: Vec2) -> bool {
    position.y > POINTER_LAUNCH_ZONE_Y
}

impl<W: PhysicsWorld, S: KeyValueStore> Session<W, S> {
    /// Apply one input event at time `now`
    pub fn handle_input(&mut self, event: InputEvent, now: f64) -> InputOutcome {
        match event {
            InputEvent::KeyDown(key) => match key {
                Key::LeftFlipper => self.input.left = true,
                Key::RightFlipper => self.input.right = true,
                Key::Launch => {
                    let charge = self.input.launch_charge + LAUNCH_CHARGE_STEP;
                    self.input.launch_charge = charge.min(1.0);
                }
                Key::Pause => {
                    self.game = toggle_pause(&self.game);
                    log::info!("Phase: {}", self.game.phase.as_str());
                }
                Key::Restart => return InputOutcome::RestartRequested,
            },
            InputEvent::KeyUp(key) => match key {
                Key::LeftFlipper => self.input.left = false,
                Key::RightFlipper => self.input.right = false,
                Key::Launch => self.fire(),
                Key::Pause | Key::Restart => {}
            },
            InputEvent::PointerDown(position) => {
                if in_launch_zone(position) {
                    self.input.pointer_launch_at = Some(now);
                } else if position.x < self.tuning.board.width / 2.0 {
                    self.input.left = true;
                } else {
                    self.input.right = true;
                }
            }
            InputEvent::PointerUp(position) => {
                let started = self.input.pointer_launch_at.take();
                if in_launch_zone(position) {
                    if let Some(started) = started {
                        let held_s = (now - started) / 1000.0;
                        self.input.launch_charge = held_s.clamp(0.0, 1.0) as f32;
                    }
                    self.fire();
                }
                self.input.left = false;
                self.input.right = false;
            }
        }
        InputOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::scripted::ScriptedWorld;
    use crate::platform::MemoryStore;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    fn session() -> Session<ScriptedWorld, MemoryStore> {
        Session::new(ScriptedWorld::new(), MemoryStore::new(), Tuning::default()).unwrap()
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("KeyA"), Some(Key::LeftFlipper));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::RightFlipper));
        assert_eq!(Key::from_code("Space"), Some(Key::Launch));
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn test_flipper_latches() {
        let mut s = session();
        s.handle_input(InputEvent::KeyDown(Key::LeftFlipper), 0.0);
        assert!(s.input().left);
        s.handle_input(InputEvent::KeyUp(Key::LeftFlipper), 0.0);
        assert!(!s.input().left);
    }

    #[test]
    fn test_charge_caps_and_launch_fires() {
        let mut s = session();
        for _ in 0..20 {
            s.handle_input(InputEvent::KeyDown(Key::Launch), 0.0);
        }
        assert_eq!(s.input().launch_charge, 1.0);
        s.handle_input(InputEvent::KeyUp(Key::Launch), 0.0);
        assert_eq!(s.input().launch_charge, 0.0);
        assert_eq!(s.game().phase, GamePhase::Playing);

        let ball = s.table().ball;
        let (id, force) = s.world().forces[0];
        assert_eq!(id, ball);
        assert!((force.y + 0.09).abs() < 1e-6);
    }

    #[test]
    fn test_restart_needs_confirmation() {
        let mut s = session();
        s.handle_input(InputEvent::KeyUp(Key::Launch), 0.0);
        let outcome = s.handle_input(InputEvent::KeyDown(Key::Restart), 0.0);
        assert_eq!(outcome, InputOutcome::RestartRequested);
        assert_eq!(s.game().phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_key() {
        let mut s = session();
        s.handle_input(InputEvent::KeyUp(Key::Launch), 0.0);
        s.handle_input(InputEvent::KeyDown(Key::Pause), 0.0);
        assert_eq!(s.game().phase, GamePhase::Paused);
        s.handle_input(InputEvent::KeyDown(Key::Pause), 0.0);
        assert_eq!(s.game().phase, GamePhase::Playing);
    }

    #[test]
    fn test_pointer_halves_and_release() {
        let mut s = session();
        s.handle_input(InputEvent::PointerDown(Vec2::new(100.0, 400.0)), 0.0);
        assert!(s.input().left && !s.input().right);
        s.handle_input(InputEvent::PointerDown(Vec2::new(400.0, 400.0)), 0.0);
        assert!(s.input().right);
        s.handle_input(InputEvent::PointerUp(Vec2::new(400.0, 400.0)), 0.0);
        assert!(!s.input().left && !s.input().right);
        assert_eq!(s.game().phase, GamePhase::Ready);
    }

    #[test]
    fn test_pointer_launch_charges_by_hold_time() {
        let mut s = session();
        s.handle_input(InputEvent::PointerDown(Vec2::new(500.0, 800.0)), 1000.0);
        s.handle_input(InputEvent::PointerUp(Vec2::new(500.0, 800.0)), 1500.0);
        assert_eq!(s.game().phase, GamePhase::Playing);
        let (_, force) = s.world().forces[0];
        assert!((force.y + 0.045).abs() < 1e-6);
    }
}
