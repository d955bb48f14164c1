//! Table layout and body roles
//!
//! Every body gets a tagged [`BodyRole`] when the table is built. Collision
//! routing looks roles up by [`BodyId`]; labels exist only for debugging.
//!
//! Playfield features are authored in normalized coordinates (fractions of
//! board width/height) and scaled when the layout is generated. Walls,
//! flippers, plunger and ball are authored in pixels.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PinballError;
use crate::physics::{BodyDesc, BodyId, BodyKind, PhysicsWorld, Shape};
use crate::tuning::BoardTuning;

/// Left or right side of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Standup target bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetGroup {
    Upper,
    Center,
    Right,
}

/// Saucer kickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KickerId {
    Alpha,
    Beta,
}

/// Gameplay meaning of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRole {
    Ball,
    Flipper(Side),
    Plunger,
    /// Passive geometry, never scores
    Wall,
    Bumper,
    Sling(Side),
    /// `index` is unique across all banks, `slot` is the position in its bank
    Target {
        group: TargetGroup,
        slot: u8,
        index: u8,
    },
    Rollover {
        lane: u8,
    },
    Kicker(KickerId),
    Spinner,
    OrbitSensor,
    RampSensor,
}

impl BodyRole {
    /// Short name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            BodyRole::Ball => "ball",
            BodyRole::Flipper(Side::Left) => "left flipper",
            BodyRole::Flipper(Side::Right) => "right flipper",
            BodyRole::Plunger => "plunger",
            BodyRole::Wall => "wall",
            BodyRole::Bumper => "bumper",
            BodyRole::Sling(Side::Left) => "left sling",
            BodyRole::Sling(Side::Right) => "right sling",
            BodyRole::Target { .. } => "target",
            BodyRole::Rollover { .. } => "rollover",
            BodyRole::Kicker(KickerId::Alpha) => "kicker alpha",
            BodyRole::Kicker(KickerId::Beta) => "kicker beta",
            BodyRole::Spinner => "spinner",
            BodyRole::OrbitSensor => "orbit sensor",
            BodyRole::RampSensor => "ramp sensor",
        }
    }

    /// Roles the session drives directly; exactly one body each
    const UNIQUE: [BodyRole; 4] = [
        BodyRole::Ball,
        BodyRole::Flipper(Side::Left),
        BodyRole::Flipper(Side::Right),
        BodyRole::Plunger,
    ];
}

/// One body to place on the table
#[derive(Debug, Clone, PartialEq)]
pub struct TableElement {
    pub role: BodyRole,
    pub desc: BodyDesc,
}

/// Top of the plunger lane divider (px). The ball leaves the lane through
/// the gap between it and the deflector.
const LANE_DIVIDER_TOP: f32 = 145.0;
/// Deflector turning launched balls onto the playfield (px)
const LANE_DEFLECTOR_Y: f32 = 90.0;

/// Flipper rest/raised angles (radians)
pub const FLIPPER_REST_ANGLE: f32 = 0.25;
pub const FLIPPER_RAISED_ANGLE: f32 = 0.8;

/// Scales normalized authoring coordinates to pixels
struct Scale {
    width: f32,
    height: f32,
}

impl Scale {
    fn point(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x * self.width, y * self.height)
    }

    fn circle(&self, role: BodyRole, label: &str, x: f32, y: f32, r: f32) -> TableElement {
        TableElement {
            role,
            desc: BodyDesc::new(label, Shape::Circle { radius: r * self.width }, self.point(x, y)),
        }
    }

    fn rect(&self, role: BodyRole, label: &str, x: f32, y: f32, w: f32, h: f32) -> TableElement {
        let shape = Shape::Rect {
            width: w * self.width,
            height: h * self.height,
        };
        TableElement {
            role,
            desc: BodyDesc::new(label, shape, self.point(x, y)),
        }
    }

    fn sling(&self, side: Side, label: &str, x: f32, y: f32) -> TableElement {
        let vertices = [(-0.07, 0.035), (0.07, 0.035), (0.0, -0.045)]
            .into_iter()
            .map(|(vx, vy)| self.point(vx, vy))
            .collect();
        TableElement {
            role: BodyRole::Sling(side),
            desc: BodyDesc::new(label, Shape::Polygon { vertices }, self.point(x, y)),
        }
    }
}

fn wall(label: &str, x: f32, y: f32, width: f32, height: f32, angle: f32) -> TableElement {
    TableElement {
        role: BodyRole::Wall,
        desc: BodyDesc::new(label, Shape::Rect { width, height }, Vec2::new(x, y))
            .with_angle(angle),
    }
}

fn sensor(mut element: TableElement) -> TableElement {
    element.desc = element.desc.sensor();
    element
}

/// The stock table
pub fn stock_layout(board: &BoardTuning) -> Vec<TableElement> {
    let s = Scale {
        width: board.width,
        height: board.height,
    };
    let (w, h) = (board.width, board.height);
    let lane_wall_x = board.plunger_lane_min_x - 5.0;

    let mut elements = vec![
        // Outer walls
        wall("wall-top", w / 2.0, -10.0, w, 20.0, 0.0),
        wall("wall-left", -10.0, h / 2.0, 20.0, h, 0.0),
        wall("wall-right", w + 10.0, h / 2.0, 20.0, h, 0.0),
        // Plunger lane divider and the deflector above it
        wall(
            "wall-lane",
            lane_wall_x,
            (LANE_DIVIDER_TOP + h) / 2.0,
            10.0,
            h - LANE_DIVIDER_TOP,
            0.0,
        ),
        wall("wall-lane-top", w - 35.0, LANE_DEFLECTOR_Y, 100.0, 16.0, 0.6),
    ];

    for (i, (x, y, r)) in [
        (0.26, 0.27, 0.048),
        (0.5, 0.23, 0.056),
        (0.74, 0.27, 0.048),
        (0.5, 0.37, 0.042),
        (0.2, 0.43, 0.036),
        (0.8, 0.43, 0.036),
    ]
    .into_iter()
    .enumerate()
    {
        let mut bumper = s.circle(BodyRole::Bumper, &format!("bumper-{i}"), x, y, r);
        bumper.desc.restitution = 1.1;
        elements.push(bumper);
    }

    let banks: [(TargetGroup, &str, &[(f32, f32, f32, f32)]); 3] = [
        (
            TargetGroup::Upper,
            "u",
            &[
                (0.16, 0.2, 0.05, 0.018),
                (0.26, 0.15, 0.05, 0.018),
                (0.38, 0.12, 0.05, 0.018),
                (0.62, 0.12, 0.05, 0.018),
                (0.74, 0.15, 0.05, 0.018),
                (0.84, 0.2, 0.05, 0.018),
            ],
        ),
        (
            TargetGroup::Center,
            "c",
            &[(0.4, 0.5, 0.045, 0.018), (0.5, 0.47, 0.045, 0.018), (0.6, 0.5, 0.045, 0.018)],
        ),
        (
            TargetGroup::Right,
            "r",
            &[(0.9, 0.3, 0.03, 0.024), (0.9, 0.36, 0.03, 0.024), (0.9, 0.42, 0.03, 0.024)],
        ),
    ];
    let mut index = 0u8;
    for (group, tag, targets) in banks {
        for (slot, &(x, y, tw, th)) in targets.iter().enumerate() {
            let role = BodyRole::Target {
                group,
                slot: slot as u8,
                index,
            };
            elements.push(s.rect(role, &format!("target-{tag}{slot}"), x, y, tw, th));
            index += 1;
        }
    }

    for (lane, (x, y, r)) in [
        (0.14, 0.11, 0.02),
        (0.28, 0.095, 0.02),
        (0.5, 0.085, 0.02),
        (0.72, 0.095, 0.02),
        (0.86, 0.11, 0.02),
        (0.5, 0.63, 0.019),
    ]
    .into_iter()
    .enumerate()
    {
        let role = BodyRole::Rollover { lane: lane as u8 };
        elements.push(sensor(s.circle(role, &format!("rollover-{lane}"), x, y, r)));
    }

    elements.push(sensor(s.circle(
        BodyRole::Kicker(KickerId::Alpha),
        "kicker-alpha",
        0.8,
        0.62,
        0.034,
    )));
    elements.push(sensor(s.circle(
        BodyRole::Kicker(KickerId::Beta),
        "kicker-beta",
        0.2,
        0.62,
        0.034,
    )));

    let mut spinner = sensor(s.rect(BodyRole::Spinner, "spinner", 0.5, 0.33, 0.09, 0.012));
    spinner.desc.angle = 0.15;
    elements.push(spinner);

    elements.push(s.sling(Side::Left, "sling-left", 0.24, 0.77));
    elements.push(s.sling(Side::Right, "sling-right", 0.76, 0.77));

    elements.push(sensor(s.rect(BodyRole::OrbitSensor, "sensor-orbit", 0.5, 0.08, 0.42, 0.02)));
    elements.push(sensor(s.rect(BodyRole::RampSensor, "sensor-ramp", 0.83, 0.28, 0.03, 0.26)));

    // Flippers, plunger, ball
    for (side, label, x, angle) in [
        (Side::Left, "flipper-left", 175.0, -FLIPPER_REST_ANGLE),
        (Side::Right, "flipper-right", 365.0, FLIPPER_REST_ANGLE),
    ] {
        let shape = Shape::Rect {
            width: 100.0,
            height: 20.0,
        };
        elements.push(TableElement {
            role: BodyRole::Flipper(side),
            desc: BodyDesc::new(label, shape, Vec2::new(x, 710.0))
                .with_kind(BodyKind::Kinematic)
                .with_angle(angle),
        });
    }
    let plunger_top = board.ball_start.y + board.ball_radius + 1.0;
    elements.push(TableElement {
        role: BodyRole::Plunger,
        desc: BodyDesc::new(
            "plunger",
            Shape::Rect { width: 30.0, height: 60.0 },
            Vec2::new(board.ball_start.x, plunger_top + 30.0),
        ),
    });

    let mut ball = BodyDesc::new(
        "ball",
        Shape::Circle {
            radius: board.ball_radius,
        },
        board.ball_start,
    )
    .with_kind(BodyKind::Dynamic);
    ball.restitution = board.restitution;
    ball.friction = board.friction;
    ball.air_friction = board.air_friction;
    elements.push(TableElement {
        role: BodyRole::Ball,
        desc: ball,
    });

    elements
}

/// Bodies registered in a world, with their roles
#[derive(Debug, Clone)]
pub struct Table {
    roles: HashMap<BodyId, BodyRole>,
    pub ball: BodyId,
    pub left_flipper: BodyId,
    pub right_flipper: BodyId,
    pub plunger: BodyId,
    /// Targets across every bank
    pub target_count: usize,
    pub right_target_count: usize,
    pub rollover_count: usize,
}

impl Table {
    /// Check the layout, then register every element with the world
    pub fn build(
        world: &mut impl PhysicsWorld,
        elements: Vec<TableElement>,
    ) -> Result<Self, PinballError> {
        for role in BodyRole::UNIQUE {
            match elements.iter().filter(|e| e.role == role).count() {
                0 => return Err(PinballError::MissingBody(role)),
                1 => {}
                _ => return Err(PinballError::DuplicateBody(role)),
            }
        }

        let target_count = elements
            .iter()
            .filter(|e| matches!(e.role, BodyRole::Target { .. }))
            .count();
        let right_target_count = elements
            .iter()
            .filter(|e| {
                matches!(
                    e.role,
                    BodyRole::Target {
                        group: TargetGroup::Right,
                        ..
                    }
                )
            })
            .count();
        let rollover_count = elements
            .iter()
            .filter(|e| matches!(e.role, BodyRole::Rollover { .. }))
            .count();

        let mut roles = HashMap::with_capacity(elements.len());
        let mut unique = HashMap::new();
        for element in elements {
            let role = element.role;
            let id = world.add_body(element.desc);
            roles.insert(id, role);
            if BodyRole::UNIQUE.contains(&role) {
                unique.insert(role, id);
            }
        }

        let id_of = |role: BodyRole| {
            unique
                .get(&role)
                .copied()
                .ok_or(PinballError::MissingBody(role))
        };
        let table = Self {
            ball: id_of(BodyRole::Ball)?,
            left_flipper: id_of(BodyRole::Flipper(Side::Left))?,
            right_flipper: id_of(BodyRole::Flipper(Side::Right))?,
            plunger: id_of(BodyRole::Plunger)?,
            roles,
            target_count,
            right_target_count,
            rollover_count,
        };

        log::debug!(
            "Table built: {} bodies, {} targets, {} rollovers",
            table.roles.len(),
            table.target_count,
            table.rollover_count
        );
        Ok(table)
    }

    pub fn role(&self, id: BodyId) -> Option<BodyRole> {
        self.roles.get(&id).copied()
    }

    pub fn body_count(&self) -> usize {
        self.roles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::scripted::ScriptedWorld;

    fn stock() -> Vec<TableElement> {
        stock_layout(&BoardTuning::default())
    }

    #[test]
    fn test_stock_table_builds() {
        let mut world = ScriptedWorld::new();
        let table = Table::build(&mut world, stock()).unwrap();
        assert_eq!(table.target_count, 12);
        assert_eq!(table.right_target_count, 3);
        assert_eq!(table.rollover_count, 6);
        assert_eq!(table.body_count(), world.descs.len());
        assert_eq!(table.role(table.ball), Some(BodyRole::Ball));
        assert_eq!(world.find("ball"), table.ball);
    }

    #[test]
    fn test_target_indices_unique() {
        let mut indices: Vec<u8> = stock()
            .iter()
            .filter_map(|e| match e.role {
                BodyRole::Target { index, .. } => Some(index),
                _ => None,
            })
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..12).collect::<Vec<u8>>());
    }

    #[test]
    fn test_missing_flipper_rejected() {
        let elements: Vec<_> = stock()
            .into_iter()
            .filter(|e| e.role != BodyRole::Flipper(Side::Right))
            .collect();
        let err = Table::build(&mut ScriptedWorld::new(), elements).unwrap_err();
        assert!(matches!(
            err,
            PinballError::MissingBody(BodyRole::Flipper(Side::Right))
        ));
        assert_eq!(err.to_string(), "table layout has no right flipper body");
    }

    #[test]
    fn test_duplicate_ball_rejected() {
        let mut elements = stock();
        let extra = elements
            .iter()
            .find(|e| e.role == BodyRole::Ball)
            .cloned()
            .unwrap();
        elements.push(extra);
        let mut world = ScriptedWorld::new();
        assert!(matches!(
            Table::build(&mut world, elements),
            Err(PinballError::DuplicateBody(BodyRole::Ball))
        ));
        // Nothing registered on failure
        assert!(world.descs.is_empty());
    }

    #[test]
    fn test_unknown_body_has_no_role() {
        let mut world = ScriptedWorld::new();
        let table = Table::build(&mut world, stock()).unwrap();
        assert_eq!(table.role(BodyId(9999)), None);
    }

    #[test]
    fn test_ball_rests_in_plunger_lane() {
        let board = BoardTuning::default();
        assert!(board.in_plunger_lane(board.ball_start));
        let layout = stock_layout(&board);
        let lane = layout.iter().find(|e| e.desc.label == "wall-lane").unwrap();
        assert!(lane.desc.position.x + 5.0 <= board.ball_start.x - board.ball_radius);
    }
}
