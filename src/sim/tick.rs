//! Fixed timestep simulation tick
//!
//! Frames arrive at whatever rate the host manages; the accumulator turns
//! them into whole fixed steps of [`SIM_DT_MS`].

use super::layout::{FLIPPER_RAISED_ANGLE, FLIPPER_REST_ANGLE};
use super::router::route_batch;
use super::session::Session;
use super::state::{GamePhase, lose_ball, next_ball};
use crate::consts::{MAX_STEPS_PER_FRAME, SIM_DT_MS};
use crate::physics::PhysicsWorld;
use crate::platform::KeyValueStore;

/// Longest frame gap fed to the accumulator (ms)
const MAX_FRAME_MS: f64 = 100.0;

/// Frame-time accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last_frame_at: Option<f64>,
    accumulator: f64,
}

impl FrameClock {
    /// Feed a frame timestamp, returning how many fixed steps to run
    pub fn advance(&mut self, now: f64) -> u32 {
        let dt = match self.last_frame_at {
            Some(last) => (now - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_frame_at = Some(now);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT_MS && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= SIM_DT_MS;
            steps += 1;
        }
        // Drop the backlog rather than spiral
        if steps == MAX_STEPS_PER_FRAME {
            self.accumulator = self.accumulator.min(SIM_DT_MS);
        }
        steps
    }
}

impl<W: PhysicsWorld, S: KeyValueStore> Session<W, S> {
    /// Run one host frame at time `now`. Returns the fixed steps taken.
    pub fn advance_frame(&mut self, now: f64) -> u32 {
        let steps = self.clock.advance(now);
        for _ in 0..steps {
            self.step(now);
        }
        self.stats.record_frame(now);
        steps
    }

    /// Advance the game by one fixed step
    pub fn step(&mut self, now: f64) {
        if matches!(self.game.phase, GamePhase::Paused | GamePhase::GameOver) {
            return;
        }

        // Decay screen shake
        self.screen_shake *= 0.9;
        if self.screen_shake < 0.01 {
            self.screen_shake = 0.0;
        }

        for action in self.timers.take_due(now) {
            self.run_timer(action);
        }

        self.update_flippers();

        let substeps = self.tuning.board.substeps.max(1);
        let sub_dt = SIM_DT_MS / substeps as f64;
        for _ in 0..substeps {
            let pairs = self.world.advance(sub_dt);
            if pairs.is_empty() {
                continue;
            }
            self.stats.record_collisions(pairs.len());
            let jackpot = self.jackpot_active(now);
            let effects = route_batch(
                &mut self.router,
                &self.table,
                &self.tuning,
                &pairs,
                now,
                jackpot,
            );
            if !effects.is_empty() {
                log::debug!("{} collisions -> {} effects", pairs.len(), effects.len());
            }
            self.apply_effects(effects, now);
            self.persist_high_score();
        }

        let ball = self.table.ball;
        let velocity = self.world.velocity(ball);
        let max_speed = self.tuning.board.max_speed;
        if velocity.length() > max_speed {
            self.world.set_velocity(ball, velocity.normalize() * max_speed);
        }

        if self.world.position(ball).y > self.tuning.board.drain_y() {
            self.handle_drain(now);
        }
    }

    fn update_flippers(&mut self) {
        let power = self.tuning.board.flipper_power;
        let (left, right) = (self.input.left, self.input.right);

        let left_angle = if left { -FLIPPER_RAISED_ANGLE } else { -FLIPPER_REST_ANGLE };
        let right_angle = if right { FLIPPER_RAISED_ANGLE } else { FLIPPER_REST_ANGLE };
        self.world.set_angle(self.table.left_flipper, left_angle);
        self.world.set_angle(self.table.right_flipper, right_angle);
        self.world
            .set_angular_velocity(self.table.left_flipper, if left { -power } else { 0.0 });
        self.world
            .set_angular_velocity(self.table.right_flipper, if right { power } else { 0.0 });
    }

    fn handle_drain(&mut self, now: f64) {
        if self.ball_save_active(now) {
            self.reset_ball();
            self.show_popup("BALL SAVED", now);
            log::info!("Ball saved");
            return;
        }

        self.game = lose_ball(&self.game);
        if self.game.phase == GamePhase::GameOver {
            self.persist_high_score();
            log::info!(
                "Game over: score {} (best {})",
                self.score.score,
                self.high_score.best
            );
            return;
        }
        log::info!("Ball lost, {} left", self.game.balls_left);
        self.game = next_ball(&self.game);
        self.reset_ball();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ArcadeWorld;
    use crate::physics::scripted::ScriptedWorld;
    use crate::platform::MemoryStore;
    use crate::tuning::Tuning;

    fn arcade_session() -> Session<ArcadeWorld, MemoryStore> {
        Session::new(ArcadeWorld::new(), MemoryStore::new(), Tuning::default()).unwrap()
    }

    #[test]
    fn test_clock_first_frame_runs_nothing() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(5000.0), 0);
        assert_eq!(clock.advance(5020.0), 1);
    }

    #[test]
    fn test_clock_accumulates_partial_frames() {
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        assert_eq!(clock.advance(10.0), 0);
        assert_eq!(clock.advance(20.0), 1);
    }

    #[test]
    fn test_clock_caps_steps_per_frame() {
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        // A long stall is clamped to MAX_FRAME_MS
        assert!(clock.advance(10_000.0) <= 6);
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        clock.accumulator = 50.0 * SIM_DT_MS;
        assert_eq!(clock.advance(0.0), MAX_STEPS_PER_FRAME);
        assert!(clock.accumulator <= SIM_DT_MS);
    }

    #[test]
    fn test_frame_runs_substeps() {
        let mut s =
            Session::new(ScriptedWorld::new(), MemoryStore::new(), Tuning::default()).unwrap();
        s.advance_frame(0.0);
        let steps = s.advance_frame(3.0 * SIM_DT_MS + 1.0);
        assert_eq!(steps, 3);
        assert_eq!(s.world().advances, 3 * 2);
    }

    #[test]
    fn test_waiting_ball_stays_on_plunger() {
        let mut s = arcade_session();
        let start = s.tuning().board.ball_start;
        let ball = s.table().ball;
        for frame in 0..120 {
            s.advance_frame(frame as f64 * SIM_DT_MS);
        }
        let rest = s.world().position(ball);
        assert!((rest.x - start.x).abs() < 1.0);
        assert!(rest.y < start.y + 3.0);
        assert_eq!(s.game().phase, GamePhase::Ready);
    }

    #[test]
    fn test_launched_ball_reaches_playfield_and_scores() {
        let mut s = arcade_session();
        let ball = s.table().ball;
        let lane_min_x = s.tuning().board.plunger_lane_min_x;
        s.advance_frame(0.0);
        s.input.launch_charge = 1.0;
        s.fire();

        let mut min_x = f32::MAX;
        for frame in 1..=300 {
            s.advance_frame(frame as f64 * SIM_DT_MS);
            min_x = min_x.min(s.world().position(ball).x);
        }
        assert!(min_x < lane_min_x, "ball never left the plunger lane");
        assert!(s.score().score > 0, "no scoring collision");
        // Untouched flippers let the ball drain
        assert_eq!(s.game().balls_left, crate::consts::START_BALLS - 1);
    }

    #[test]
    fn test_weakest_autopilot_launch_clears_divider() {
        let mut s = arcade_session();
        let ball = s.table().ball;
        s.advance_frame(0.0);
        s.input.launch_charge = 0.48;
        s.fire();
        for frame in 1..=120 {
            s.advance_frame(frame as f64 * SIM_DT_MS);
        }
        assert!(!s.tuning().board.in_plunger_lane(s.world().position(ball)));
    }
}
