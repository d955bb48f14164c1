//! Session controller
//!
//! Owns the engines' states, the physics world and the persisted records.
//! Collision effects and mission rewards are applied here; the fixed-step
//! loop lives in `tick.rs` and input handling in `input.rs`.

use glam::Vec2;

use super::input::InputLatches;
use super::layout::{Table, TableElement, stock_layout};
use super::mission::{
    MissionDefinition, MissionState, current_mission, next_missions, register_mission_event,
};
use super::router::{Effect, RouterState};
use super::score::{ScoreState, award_bonus, boost_multiplier, register_hit, register_target};
use super::snapshot::{FrameSnapshot, FrameStats, MissionView};
use super::state::{GamePhase, GameState, award_extra_balls, restart_game, start_game};
use super::tick::FrameClock;
use super::timers::{TimedAction, TimerQueue};
use crate::consts::{MIN_LAUNCH_FORCE, POPUP_MS};
use crate::error::PinballError;
use crate::highscore::HighScore;
use crate::physics::PhysicsWorld;
use crate::platform::KeyValueStore;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Transient on-screen message
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub text: String,
    pub until: f64,
}

/// One game table in play
pub struct Session<W: PhysicsWorld, S: KeyValueStore> {
    pub(super) world: W,
    pub(super) store: S,
    pub(super) tuning: Tuning,
    pub(super) table: Table,
    pub(super) score: ScoreState,
    pub(super) missions: MissionState,
    pub(super) game: GameState,
    pub(super) router: RouterState,
    pub(super) input: InputLatches,
    pub(super) timers: TimerQueue,
    pub(super) settings: Settings,
    pub(super) high_score: HighScore,
    pub(super) ball_save_until: f64,
    pub(super) jackpot_until: f64,
    pub(super) popup: Option<Popup>,
    /// Shake intensity, decays each step
    pub(super) screen_shake: f32,
    pub(super) clock: FrameClock,
    pub(super) stats: FrameStats,
}

impl<W: PhysicsWorld, S: KeyValueStore> Session<W, S> {
    /// Build the stock table in `world` and load the persisted records
    pub fn new(world: W, store: S, tuning: Tuning) -> Result<Self, PinballError> {
        let layout = stock_layout(&tuning.board);
        Self::with_layout(world, store, tuning, layout)
    }

    /// Same as [`Session::new`] with a custom table
    pub fn with_layout(
        mut world: W,
        store: S,
        tuning: Tuning,
        layout: Vec<TableElement>,
    ) -> Result<Self, PinballError> {
        let table = Table::build(&mut world, layout)?;
        world.set_gravity(Vec2::new(0.0, tuning.board.gravity));

        let settings = Settings::load(&store);
        let high_score = HighScore::load(&store);
        log::info!("Session ready: {} bodies", table.body_count());

        Ok(Self {
            world,
            store,
            tuning,
            table,
            score: ScoreState::new(),
            missions: MissionState::new(),
            game: GameState::new(),
            router: RouterState::new(),
            input: InputLatches::default(),
            timers: TimerQueue::new(),
            settings,
            high_score,
            ball_save_until: 0.0,
            jackpot_until: 0.0,
            popup: None,
            screen_shake: 0.0,
            clock: FrameClock::default(),
            stats: FrameStats::default(),
        })
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn missions(&self) -> &MissionState {
        &self.missions
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn input(&self) -> &InputLatches {
        &self.input
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn jackpot_active(&self, now: f64) -> bool {
        now < self.jackpot_until
    }

    pub fn ball_save_active(&self, now: f64) -> bool {
        now < self.ball_save_until
    }

    /// Launch: leaves ready/next-ball and pushes the ball up the plunger lane
    pub fn fire(&mut self) {
        if self.game.phase.awaiting_launch() {
            self.game = start_game(&self.game);
            log::info!("Ball launched");
        }
        let ball = self.table.ball;
        if self.game.phase == GamePhase::Playing
            && self.tuning.board.in_plunger_lane(self.world.position(ball))
        {
            let force = (self.input.launch_charge * self.tuning.board.launch_max_force)
                .max(MIN_LAUNCH_FORCE);
            self.world.apply_force(ball, Vec2::new(0.0, -force));
        }
        self.input.launch_charge = 0.0;
    }

    /// Start over from a fresh game; the high score is kept
    pub fn restart(&mut self) {
        self.score = ScoreState::new();
        self.missions = MissionState::new();
        self.game = restart_game();
        self.router = RouterState::new();
        self.input = InputLatches::default();
        self.timers.clear();
        self.ball_save_until = 0.0;
        self.jackpot_until = 0.0;
        self.popup = None;
        self.screen_shake = 0.0;
        self.reset_ball();
        log::info!("Game restarted");
    }

    /// Change settings and persist them
    pub fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
        change(&mut self.settings);
        self.settings.save(&mut self.store);
    }

    /// Back to the plunger, at rest. Pending timers are dropped.
    pub(super) fn reset_ball(&mut self) {
        let ball = self.table.ball;
        self.world.set_position(ball, self.tuning.board.ball_start);
        self.world.set_velocity(ball, Vec2::ZERO);
        self.world.set_angular_velocity(ball, 0.0);
        self.timers.clear();
    }

    pub(super) fn show_popup(&mut self, text: impl Into<String>, now: f64) {
        self.popup = Some(Popup {
            text: text.into(),
            until: now + POPUP_MS,
        });
    }

    pub(super) fn persist_high_score(&mut self) {
        if self.high_score.record(self.score.score) {
            self.high_score.save(&mut self.store);
        }
    }

    /// Apply routed collision effects in order
    pub(super) fn apply_effects(&mut self, effects: Vec<Effect>, now: f64) {
        for effect in effects {
            self.apply_effect(effect, now);
        }
    }

    fn apply_effect(&mut self, effect: Effect, now: f64) {
        let scoring = &self.tuning.scoring;
        match effect {
            Effect::Hit { points } => {
                self.score = register_hit(&self.score, points, now);
            }
            Effect::Target { index } => {
                self.score = register_target(
                    &self.score,
                    index,
                    self.table.target_count,
                    scoring.target,
                    scoring.mission_bonus,
                    now,
                );
            }
            Effect::Mission(event) => {
                let advance = register_mission_event(&self.missions, event, now);
                self.missions = advance.state;
                if let Some(mission) = advance.completed {
                    self.apply_reward(mission, now);
                }
            }
            Effect::Bonus { points } => {
                self.score = award_bonus(&self.score, points);
            }
            Effect::Shake => {
                if self.settings.effective_shake() {
                    self.screen_shake = 1.0;
                }
            }
            Effect::Popup(text) => self.show_popup(text, now),
            Effect::Teleport { position, velocity } => {
                let ball = self.table.ball;
                self.world.set_position(ball, position);
                self.world.set_velocity(ball, velocity);
            }
            Effect::Eject { force, delay_ms } => {
                self.timers.schedule(now + delay_ms, TimedAction::Eject { force });
            }
        }
    }

    /// Pay out a completed mission
    pub(super) fn apply_reward(&mut self, mission: &MissionDefinition, now: f64) {
        let reward = &mission.reward;
        if let Some(bonus) = reward.score_bonus {
            self.score = award_bonus(&self.score, bonus * self.score.multiplier as u64);
        }
        if let Some(boost) = reward.multiplier_boost {
            self.score = boost_multiplier(&self.score, boost);
        }
        if let Some(ms) = reward.ball_save_ms {
            self.ball_save_until = self.ball_save_until.max(now + ms as f64);
        }
        if let Some(ms) = reward.jackpot_ms {
            self.jackpot_until = self.jackpot_until.max(now + ms as f64);
        }
        if let Some(balls) = reward.extra_ball {
            self.game = award_extra_balls(&self.game, balls);
        }
        self.show_popup(format!("{} CLEAR", mission.title), now);
        log::info!("Mission complete: {} ({})", mission.id, mission.title);
    }

    pub(super) fn run_timer(&mut self, action: TimedAction) {
        match action {
            TimedAction::Eject { force } => self.world.apply_force(self.table.ball, force),
        }
    }

    /// Compose the read-only view for this frame
    pub fn snapshot(&self, now: f64) -> FrameSnapshot {
        let mission = current_mission(&self.missions).map(|m| MissionView {
            title: m.title,
            description: m.description,
            progress: self.missions.progress,
            target: m.target,
        });
        let debug = self.settings.debug_on.then(|| {
            let speed = self.world.velocity(self.table.ball).length();
            self.stats.debug_line(speed, self.tuning.board.substeps)
        });

        FrameSnapshot {
            score: self.score.score,
            multiplier: self.score.multiplier,
            balls_left: self.game.balls_left,
            high_score: self.high_score.best,
            phase: self.game.phase.as_str(),
            mission,
            next_missions: next_missions(&self.missions, 2).iter().map(|m| m.title).collect(),
            completed_missions: self.missions.completed.len(),
            left_flipper: self.input.left,
            right_flipper: self.input.right,
            targets_lit: self.score.targets_lit.iter().copied().collect(),
            jackpot_active: self.jackpot_active(now),
            ball_save_active: self.ball_save_active(now),
            popup: self
                .popup
                .as_ref()
                .filter(|p| now < p.until)
                .map(|p| p.text.clone()),
            shake: self.screen_shake > 0.0,
            debug,
        }
    }
}
