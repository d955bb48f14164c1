//! Small built-in physics world
//!
//! Enough rigid-body behaviour to run a table headless: one or more dynamic
//! circles moving under gravity, bouncing off static and kinematic shapes
//! found through signed distance fields. Sensor bodies report contacts
//! without pushing back.

use std::collections::BTreeSet;

use glam::Vec2;

use super::sdf::{bounce, check_sdf_collision, sd_shape};
use super::{BodyDesc, BodyId, BodyKind, CollisionPair, PhysicsWorld, Shape};

/// Duration that velocities are expressed against
pub const REFERENCE_STEP_MS: f64 = 1000.0 / 60.0;
/// Mass per square pixel
const DENSITY: f32 = 0.001;
/// Force units to px per reference step, per unit mass
const FORCE_SCALE: f32 = (REFERENCE_STEP_MS * REFERENCE_STEP_MS) as f32;
/// Gravity units to px per reference step squared
const GRAVITY_SCALE: f32 = 0.001 * FORCE_SCALE;
/// Largest move per collision sub-step, as a fraction of the ball radius
const MAX_MOVE_FRACTION: f32 = 0.5;
/// Upper bound on collision sub-steps per advance
const MAX_COLLISION_STEPS: usize = 20;

#[derive(Debug, Clone)]
struct Body {
    id: BodyId,
    shape: Shape,
    kind: BodyKind,
    sensor: bool,
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    angular_velocity: f32,
    restitution: f32,
    friction: f32,
    air_friction: f32,
    mass: f32,
    pending_force: Vec2,
}

impl Body {
    fn distance(&self, p: Vec2) -> f32 {
        sd_shape(p, &self.shape, self.position, self.angle)
    }

    /// Velocity of this body's surface at a world point
    fn surface_velocity(&self, p: Vec2) -> Vec2 {
        match self.kind {
            BodyKind::Kinematic => {
                let r = p - self.position;
                self.velocity + Vec2::new(-r.y, r.x) * self.angular_velocity
            }
            _ => self.velocity,
        }
    }
}

fn shape_area(shape: &Shape) -> f32 {
    match shape {
        Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
        Shape::Rect { width, height } => width * height,
        Shape::Polygon { vertices } => {
            let n = vertices.len();
            let twice: f32 = (0..n)
                .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
                .sum();
            (twice * 0.5).abs()
        }
    }
}

/// SDF rigid-body world
#[derive(Debug, Clone, Default)]
pub struct ArcadeWorld {
    bodies: Vec<Body>,
    gravity: Vec2,
    /// Pairs in contact at the end of the previous advance
    touching: BTreeSet<(BodyId, BodyId)>,
}

impl ArcadeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0 as usize)
    }

    /// Move one dynamic body through the step, resolving contacts.
    /// Returns every body it touched.
    fn step_dynamic(&mut self, index: usize, k: f32) -> Vec<BodyId> {
        let mut ball = self.bodies[index].clone();
        let radius = match ball.shape {
            Shape::Circle { radius } => radius,
            // Non-circular dynamic bodies are not simulated
            _ => return Vec::new(),
        };

        // Forces and gravity
        if ball.pending_force != Vec2::ZERO {
            ball.velocity += ball.pending_force / ball.mass.max(f32::EPSILON) * FORCE_SCALE;
            ball.pending_force = Vec2::ZERO;
        }
        ball.velocity += self.gravity * GRAVITY_SCALE * k;
        ball.velocity *= (1.0 - ball.air_friction * k).max(0.0);

        let move_dist = ball.velocity.length() * k;
        let step_size = radius * MAX_MOVE_FRACTION;
        let num_steps = ((move_dist / step_size).ceil() as usize).clamp(1, MAX_COLLISION_STEPS);
        let step_k = k / num_steps as f32;

        let mut touched = Vec::new();
        for _ in 0..num_steps {
            ball.position += ball.velocity * step_k;

            for other in &self.bodies {
                if other.id == ball.id || other.kind == BodyKind::Dynamic {
                    continue;
                }
                let hit = check_sdf_collision(ball.position, radius, |p| other.distance(p));
                if !hit.hit {
                    continue;
                }
                if !touched.contains(&other.id) {
                    touched.push(other.id);
                }
                if other.sensor || hit.normal == Vec2::ZERO {
                    continue;
                }

                // Push out, then bounce relative to the surface
                ball.position += hit.normal * hit.penetration;
                let surface = other.surface_velocity(ball.position);
                let restitution = ball.restitution.max(other.restitution);
                let friction = (ball.friction + other.friction).min(1.0);
                let relative = bounce(ball.velocity - surface, hit.normal, restitution, friction);
                ball.velocity = relative + surface;
            }
        }

        self.bodies[index] = ball;
        touched
    }
}

impl PhysicsWorld for ArcadeWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        let mass = shape_area(&desc.shape) * DENSITY;
        self.bodies.push(Body {
            id,
            shape: desc.shape,
            kind: desc.kind,
            sensor: desc.sensor,
            position: desc.position,
            velocity: Vec2::ZERO,
            angle: desc.angle,
            angular_velocity: 0.0,
            restitution: desc.restitution,
            friction: desc.friction,
            air_friction: desc.air_friction,
            mass,
            pending_force: Vec2::ZERO,
        });
        id
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn advance(&mut self, dt_ms: f64) -> Vec<CollisionPair> {
        let k = (dt_ms / REFERENCE_STEP_MS) as f32;

        let mut now_touching = BTreeSet::new();
        for index in 0..self.bodies.len() {
            if self.bodies[index].kind != BodyKind::Dynamic {
                continue;
            }
            let id = self.bodies[index].id;
            for other in self.step_dynamic(index, k) {
                now_touching.insert((id, other));
            }
        }

        let started = now_touching
            .difference(&self.touching)
            .map(|&(a, b)| CollisionPair::new(a, b))
            .collect();
        self.touching = now_touching;
        started
    }

    fn position(&self, id: BodyId) -> Vec2 {
        self.body(id).map(|b| b.position).unwrap_or(Vec2::ZERO)
    }

    fn velocity(&self, id: BodyId) -> Vec2 {
        self.body(id).map(|b| b.velocity).unwrap_or(Vec2::ZERO)
    }

    fn set_position(&mut self, id: BodyId, position: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.position = position;
        }
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.velocity = velocity;
        }
    }

    fn set_angle(&mut self, id: BodyId, angle: f32) {
        if let Some(body) = self.body_mut(id) {
            body.angle = angle;
        }
    }

    fn set_angular_velocity(&mut self, id: BodyId, angular_velocity: f32) {
        if let Some(body) = self.body_mut(id) {
            body.angular_velocity = angular_velocity;
        }
    }

    fn apply_force(&mut self, id: BodyId, force: Vec2) {
        if let Some(body) = self.body_mut(id) {
            if body.kind == BodyKind::Dynamic {
                body.pending_force += force;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_desc(position: Vec2) -> BodyDesc {
        let mut desc = BodyDesc::new("ball", Shape::Circle { radius: 10.0 }, position)
            .with_kind(BodyKind::Dynamic);
        desc.restitution = 0.5;
        desc.friction = 0.0;
        desc
    }

    #[test]
    fn test_ball_falls_under_gravity() {
        let mut world = ArcadeWorld::new();
        let ball = world.add_body(ball_desc(Vec2::new(100.0, 100.0)));
        world.set_gravity(Vec2::new(0.0, 1.0));

        for _ in 0..10 {
            world.advance(REFERENCE_STEP_MS);
        }
        assert!(world.position(ball).y > 100.0);
        assert!(world.velocity(ball).y > 0.0);
    }

    #[test]
    fn test_floor_bounces_and_reports_once() {
        let mut world = ArcadeWorld::new();
        let ball = world.add_body(ball_desc(Vec2::new(100.0, 100.0)));
        let mut floor_desc = BodyDesc::new(
            "floor",
            Shape::Rect {
                width: 400.0,
                height: 20.0,
            },
            Vec2::new(100.0, 125.0),
        );
        floor_desc.friction = 0.0;
        let floor = world.add_body(floor_desc);
        world.set_velocity(ball, Vec2::new(0.0, 6.0));

        let pairs = world.advance(REFERENCE_STEP_MS);
        assert_eq!(pairs, vec![CollisionPair::new(ball, floor)]);
        assert!(world.velocity(ball).y < 0.0, "ball should bounce up");
        // Ball pushed out of the floor
        assert!(world.position(ball).y <= 105.0 + 1e-3);
    }

    #[test]
    fn test_sensor_reports_without_response() {
        let mut world = ArcadeWorld::new();
        let ball = world.add_body(ball_desc(Vec2::new(0.0, 0.0)));
        let sensor = world.add_body(
            BodyDesc::new("gate", Shape::Circle { radius: 5.0 }, Vec2::new(12.0, 0.0)).sensor(),
        );
        world.set_velocity(ball, Vec2::new(1.0, 0.0));

        let pairs = world.advance(REFERENCE_STEP_MS);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].involves(sensor));
        assert!(world.velocity(ball).x > 0.0, "sensor must not push");

        // Still overlapping: no new start
        let pairs = world.advance(REFERENCE_STEP_MS);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_force_applied_once() {
        let mut world = ArcadeWorld::new();
        let ball = world.add_body(ball_desc(Vec2::ZERO));
        world.apply_force(ball, Vec2::new(0.0, -0.01));
        world.advance(REFERENCE_STEP_MS);
        let after_first = world.velocity(ball);
        assert!(after_first.y < 0.0);
        world.advance(REFERENCE_STEP_MS);
        assert_eq!(world.velocity(ball), after_first);
    }

    #[test]
    fn test_static_body_ignores_force() {
        let mut world = ArcadeWorld::new();
        let post = world.add_body(BodyDesc::new(
            "post",
            Shape::Circle { radius: 5.0 },
            Vec2::ZERO,
        ));
        world.apply_force(post, Vec2::new(1.0, 1.0));
        world.advance(REFERENCE_STEP_MS);
        assert_eq!(world.position(post), Vec2::ZERO);
    }
}
