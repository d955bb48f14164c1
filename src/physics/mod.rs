//! Rigid-body physics collaborator
//!
//! The game logic never integrates motion itself. It talks to a world through
//! [`PhysicsWorld`]: bodies are registered once at table build time, the
//! session advances the world in fixed sub-steps, and each advance hands back
//! the collision-start pairs for that step.

pub mod arcade;
pub mod sdf;

#[cfg(test)]
pub mod scripted;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use arcade::ArcadeWorld;

/// Stable handle for a registered body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collision geometry, in body-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
    /// Convex polygon, vertices relative to the body position
    Polygon { vertices: Vec<Vec2> },
}

/// How a body moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves
    #[default]
    Static,
    /// Moved only by explicit writes (flippers)
    Kinematic,
    /// Integrated by the world (the ball)
    Dynamic,
}

/// Everything needed to register a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Debug label, never used for gameplay classification
    pub label: String,
    pub shape: Shape,
    pub position: Vec2,
    pub angle: f32,
    pub kind: BodyKind,
    /// Sensors report contacts but do not push the ball
    pub sensor: bool,
    pub restitution: f32,
    pub friction: f32,
    pub air_friction: f32,
}

impl BodyDesc {
    pub fn new(label: impl Into<String>, shape: Shape, position: Vec2) -> Self {
        Self {
            label: label.into(),
            shape,
            position,
            angle: 0.0,
            kind: BodyKind::Static,
            sensor: false,
            restitution: 0.0,
            friction: 0.1,
            air_friction: 0.0,
        }
    }

    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }
}

/// Two bodies that started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionPair {
    pub a: BodyId,
    pub b: BodyId,
}

impl CollisionPair {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        Self { a, b }
    }

    /// The other body, if `id` takes part in this pair
    pub fn other(&self, id: BodyId) -> Option<BodyId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn involves(&self, id: BodyId) -> bool {
        self.a == id || self.b == id
    }
}

/// Rigid-body world used by the session
///
/// Velocities are in pixels per reference step (1000/60 ms), matching the
/// feel constants in [`crate::tuning::BoardTuning`].
pub trait PhysicsWorld {
    /// Register a body and return its handle
    fn add_body(&mut self, desc: BodyDesc) -> BodyId;

    fn set_gravity(&mut self, gravity: Vec2);

    /// Advance by `dt_ms` and return the pairs that started touching
    fn advance(&mut self, dt_ms: f64) -> Vec<CollisionPair>;

    fn position(&self, id: BodyId) -> Vec2;
    fn velocity(&self, id: BodyId) -> Vec2;

    fn set_position(&mut self, id: BodyId, position: Vec2);
    fn set_velocity(&mut self, id: BodyId, velocity: Vec2);
    fn set_angle(&mut self, id: BodyId, angle: f32);
    fn set_angular_velocity(&mut self, id: BodyId, angular_velocity: f32);

    /// Queue a force, applied during the next advance
    fn apply_force(&mut self, id: BodyId, force: Vec2);
}
