//! Pinball Lab entry point
//!
//! Native builds play a headless attract-mode game on the built-in physics
//! world and print the final frame snapshot as JSON.
//!
//! Usage: `pinball-lab [tuning.json]`. The tuning path may also come from
//! `PINBALL_TUNING`; `PINBALL_SEED`, `PINBALL_FRAMES` and `PINBALL_STORE`
//! override the autopilot seed, frame budget and record file.

#[cfg(not(target_arch = "wasm32"))]
mod attract {
    use std::env;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use pinball_lab::consts::SIM_DT_MS;
    use pinball_lab::physics::{ArcadeWorld, PhysicsWorld};
    use pinball_lab::platform::FileStore;
    use pinball_lab::sim::{GamePhase, InputEvent, Key, Session};
    use pinball_lab::{PinballError, Tuning};

    type AttractSession = Session<ArcadeWorld, FileStore>;

    /// Five minutes at 60 Hz
    const DEFAULT_FRAMES: u64 = 60 * 60 * 5;
    const DEFAULT_STORE: &str = "pinball-lab.json";
    /// Ball closer than this to a flipper triggers a flip
    const FLIP_RANGE: f32 = 70.0;
    /// Below this speed a ball in the plunger lane counts as waiting
    const RESTING_SPEED: f32 = 0.5;

    /// Plays the table the way a bored arcade visitor would
    struct Autopilot {
        rng: Pcg32,
        charge_presses: u32,
        flip_hold: [u32; 2],
    }

    impl Autopilot {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed),
                charge_presses: 0,
                flip_hold: [0; 2],
            }
        }

        fn drive(&mut self, session: &mut AttractSession, now: f64) {
            let table = session.table();
            let (ball_id, left_id, right_id) =
                (table.ball, table.left_flipper, table.right_flipper);
            let world = session.world();
            let ball = world.position(ball_id);
            let velocity = world.velocity(ball_id);
            let flippers = [
                (Key::LeftFlipper, world.position(left_id)),
                (Key::RightFlipper, world.position(right_id)),
            ];

            let phase = session.game().phase;
            let resting_in_lane = phase == GamePhase::Playing
                && session.tuning().board.in_plunger_lane(ball)
                && velocity.length() < RESTING_SPEED;

            // Charge the plunger over several key repeats, then let go
            if phase.awaiting_launch() || resting_in_lane {
                if self.charge_presses == 0 {
                    self.charge_presses = self.rng.random_range(6..=13);
                }
                session.handle_input(InputEvent::KeyDown(Key::Launch), now);
                self.charge_presses -= 1;
                if self.charge_presses == 0 {
                    session.handle_input(InputEvent::KeyUp(Key::Launch), now);
                }
                return;
            }

            // Flip when the ball drops toward a flipper
            for (hold, (key, pivot)) in self.flip_hold.iter_mut().zip(flippers) {
                if *hold > 0 {
                    *hold -= 1;
                    if *hold == 0 {
                        session.handle_input(InputEvent::KeyUp(key), now);
                    }
                } else if velocity.y > 0.0
                    && ball.distance(pivot) < FLIP_RANGE
                    && self.rng.random_bool(0.8)
                {
                    *hold = self.rng.random_range(6..12);
                    session.handle_input(InputEvent::KeyDown(key), now);
                }
            }
        }
    }

    fn env_number(name: &str) -> Option<u64> {
        let raw = env::var(name).ok()?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring {}={:?}: not a number", name, raw);
                None
            }
        }
    }

    pub fn run() -> Result<(), PinballError> {
        let tuning = match env::args().nth(1).or_else(|| env::var("PINBALL_TUNING").ok()) {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = env_number("PINBALL_SEED").unwrap_or(0x5eed);
        let frames = env_number("PINBALL_FRAMES").unwrap_or(DEFAULT_FRAMES);
        let store_path = env::var("PINBALL_STORE").unwrap_or_else(|_| DEFAULT_STORE.into());
        let store = FileStore::open(store_path);

        let mut session = Session::new(ArcadeWorld::new(), store, tuning)?;
        let mut autopilot = Autopilot::new(seed);
        log::info!(
            "Attract mode: seed {:#x}, up to {} frames, records in {}",
            seed,
            frames,
            session.store().path().display()
        );

        let mut now = 0.0;
        for frame in 0..frames {
            now = frame as f64 * SIM_DT_MS;
            autopilot.drive(&mut session, now);
            session.advance_frame(now);
            if session.game().phase == GamePhase::GameOver {
                log::info!("Game over after {} frames", frame + 1);
                break;
            }
        }

        match serde_json::to_string_pretty(&session.snapshot(now)) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pinball Lab (native) starting...");

    if let Err(e) = attract::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly
}
