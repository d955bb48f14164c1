//! Read-only per-frame view for the presentation layer

use serde::Serialize;

/// Everything a HUD or renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub score: u64,
    pub multiplier: u32,
    pub balls_left: u8,
    pub high_score: u64,
    pub phase: &'static str,
    pub mission: Option<MissionView>,
    pub next_missions: Vec<&'static str>,
    pub completed_missions: usize,
    pub left_flipper: bool,
    pub right_flipper: bool,
    pub targets_lit: Vec<u8>,
    pub jackpot_active: bool,
    pub ball_save_active: bool,
    pub popup: Option<String>,
    pub shake: bool,
    /// Present only with the debug overlay on
    pub debug: Option<String>,
}

/// Current mission as shown on the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionView {
    pub title: &'static str,
    pub description: &'static str,
    pub progress: u32,
    pub target: u32,
}

/// Rolling once-a-second counters for the debug line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    window_start: Option<f64>,
    frames: u32,
    collisions: u32,
    pub fps: u32,
    pub hits_per_sec: u32,
}

impl FrameStats {
    pub fn record_frame(&mut self, now: f64) {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        if now - start >= 1000.0 {
            self.fps = self.frames;
            self.hits_per_sec = self.collisions;
            self.frames = 0;
            self.collisions = 0;
            self.window_start = Some(now);
        }
    }

    pub fn record_collisions(&mut self, count: usize) {
        self.collisions += count as u32;
    }

    pub fn debug_line(&self, speed: f32, substeps: u32) -> String {
        format!(
            "FPS:{} SPEED:{:.2} HIT/s:{} STEP:{}",
            self.fps, speed, self.hits_per_sec, substeps
        )
    }
}
