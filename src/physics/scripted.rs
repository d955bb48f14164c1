//! Scripted physics double for session tests
//!
//! Bodies never move on their own. Tests queue the collision batches that
//! the next advances should report and inspect every write the session made.

use std::collections::VecDeque;

use glam::Vec2;

use super::{BodyDesc, BodyId, CollisionPair, PhysicsWorld};

#[derive(Debug, Default)]
pub struct ScriptedWorld {
    pub descs: Vec<BodyDesc>,
    pub positions: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
    pub angles: Vec<f32>,
    pub angular_velocities: Vec<f32>,
    /// Every force applied, in order
    pub forces: Vec<(BodyId, Vec2)>,
    pub gravity: Vec2,
    /// Batches returned by successive advances
    pub batches: VecDeque<Vec<CollisionPair>>,
    pub advances: usize,
}

impl ScriptedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a body by its debug label
    pub fn find(&self, label: &str) -> BodyId {
        let index = self
            .descs
            .iter()
            .position(|d| d.label == label)
            .unwrap_or_else(|| panic!("no body labelled {label}"));
        BodyId(index as u32)
    }

    /// Queue a batch containing one pair per label, each against `ball`
    pub fn queue_hits(&mut self, ball: BodyId, labels: &[&str]) {
        let batch = labels
            .iter()
            .map(|label| CollisionPair::new(ball, self.find(label)))
            .collect();
        self.batches.push_back(batch);
    }
}

impl PhysicsWorld for ScriptedWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.descs.len() as u32);
        self.positions.push(desc.position);
        self.velocities.push(Vec2::ZERO);
        self.angles.push(desc.angle);
        self.angular_velocities.push(0.0);
        self.descs.push(desc);
        id
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn advance(&mut self, _dt_ms: f64) -> Vec<CollisionPair> {
        self.advances += 1;
        self.batches.pop_front().unwrap_or_default()
    }

    fn position(&self, id: BodyId) -> Vec2 {
        self.positions[id.0 as usize]
    }

    fn velocity(&self, id: BodyId) -> Vec2 {
        self.velocities[id.0 as usize]
    }

    fn set_position(&mut self, id: BodyId, position: Vec2) {
        self.positions[id.0 as usize] = position;
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        self.velocities[id.0 as usize] = velocity;
    }

    fn set_angle(&mut self, id: BodyId, angle: f32) {
        self.angles[id.0 as usize] = angle;
    }

    fn set_angular_velocity(&mut self, id: BodyId, angular_velocity: f32) {
        self.angular_velocities[id.0 as usize] = angular_velocity;
    }

    fn apply_force(&mut self, id: BodyId, force: Vec2) {
        self.forces.push((id, force));
    }
}
