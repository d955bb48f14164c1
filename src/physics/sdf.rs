//! SDF-based collision detection
//!
//! Uses signed distance fields for accurate collision detection and response.

use glam::Vec2;

use super::Shape;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box centered at the origin
#[inline]
pub fn sd_box(p: Vec2, half_extents: Vec2) -> f32 {
    let d = p.abs() - half_extents;
    d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

/// Signed distance to a polygon (vertices in winding order)
pub fn sd_polygon(p: Vec2, vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    if n == 0 {
        return f32::MAX;
    }

    let mut d = (p - vertices[0]).length_squared();
    let mut sign = 1.0;
    let mut j = n - 1;
    for i in 0..n {
        let e = vertices[j] - vertices[i];
        let w = p - vertices[i];
        let t = if e.length_squared() > 0.0 {
            (w.dot(e) / e.length_squared()).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let b = w - e * t;
        d = d.min(b.length_squared());

        // Winding test for inside/outside
        let c1 = p.y >= vertices[i].y;
        let c2 = p.y < vertices[j].y;
        let c3 = e.x * w.y > e.y * w.x;
        if (c1 && c2 && c3) || (!c1 && !c2 && !c3) {
            sign = -sign;
        }
        j = i;
    }

    sign * d.sqrt()
}

/// Signed distance to a shape placed at `position`, rotated by `angle`
pub fn sd_shape(p: Vec2, shape: &Shape, position: Vec2, angle: f32) -> f32 {
    // Work in the shape's local frame
    let local = Vec2::from_angle(-angle).rotate(p - position);
    match shape {
        Shape::Circle { radius } => sd_circle(local, Vec2::ZERO, *radius),
        Shape::Rect { width, height } => sd_box(local, Vec2::new(width * 0.5, height * 0.5)),
        Shape::Polygon { vertices } => sd_polygon(local, vertices),
    }
}

/// Compute SDF gradient (surface normal) using central differences
pub fn sdf_gradient<F>(p: Vec2, sdf: F) -> Vec2
where
    F: Fn(Vec2) -> f32,
{
    let eps = 0.5;
    let dx = sdf(p + Vec2::new(eps, 0.0)) - sdf(p - Vec2::new(eps, 0.0));
    let dy = sdf(p + Vec2::new(0.0, eps)) - sdf(p - Vec2::new(0.0, eps));
    Vec2::new(dx, dy).normalize_or_zero()
}

/// Result of SDF collision check
#[derive(Debug, Clone)]
pub struct SdfCollision {
    pub hit: bool,
    pub normal: Vec2,
    pub penetration: f32,
}

impl SdfCollision {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between ball and an SDF shape
pub fn check_sdf_collision<F>(ball_pos: Vec2, ball_radius: f32, sdf: F) -> SdfCollision
where
    F: Fn(Vec2) -> f32,
{
    let dist = sdf(ball_pos);

    if dist < ball_radius {
        let normal = sdf_gradient(ball_pos, &sdf);
        SdfCollision {
            hit: true,
            normal,
            penetration: ball_radius - dist,
        }
    } else {
        SdfCollision::miss()
    }
}

/// Bounce a velocity off a surface, keeping `restitution` of the normal part
/// and losing `friction` of the tangential part
#[inline]
pub fn bounce(vel: Vec2, normal: Vec2, restitution: f32, friction: f32) -> Vec2 {
    let vn = vel.dot(normal);
    if vn >= 0.0 {
        // Already separating
        return vel;
    }
    let normal_part = normal * vn;
    let tangent_part = vel - normal_part;
    tangent_part * (1.0 - friction) - normal_part * restitution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sd_circle() {
        assert!((sd_circle(Vec2::new(10.0, 0.0), Vec2::ZERO, 4.0) - 6.0).abs() < 1e-5);
        assert!(sd_circle(Vec2::ZERO, Vec2::ZERO, 4.0) < 0.0);
    }

    #[test]
    fn test_sd_box() {
        let half = Vec2::new(5.0, 2.0);
        assert!((sd_box(Vec2::new(8.0, 0.0), half) - 3.0).abs() < 1e-5);
        assert!((sd_box(Vec2::new(0.0, 4.0), half) - 2.0).abs() < 1e-5);
        assert!(sd_box(Vec2::ZERO, half) < 0.0);
    }

    #[test]
    fn test_sd_polygon_triangle() {
        let tri = [
            Vec2::new(-10.0, 5.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(0.0, -8.0),
        ];
        assert!(sd_polygon(Vec2::new(0.0, 0.0), &tri) < 0.0);
        let below = sd_polygon(Vec2::new(0.0, 9.0), &tri);
        assert!((below - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_sd_shape_rotated_rect() {
        let shape = Shape::Rect {
            width: 20.0,
            height: 2.0,
        };
        // Rotated 90 degrees, the long axis points along y
        let d = sd_shape(
            Vec2::new(0.0, 9.0),
            &shape,
            Vec2::ZERO,
            std::f32::consts::FRAC_PI_2,
        );
        assert!(d < 0.0);
    }

    #[test]
    fn test_check_sdf_collision_normal() {
        let hit = check_sdf_collision(Vec2::new(12.0, 0.0), 3.0, |p| {
            sd_circle(p, Vec2::ZERO, 10.0)
        });
        assert!(hit.hit);
        assert!((hit.penetration - 1.0).abs() < 1e-3);
        assert!((hit.normal - Vec2::X).length() < 1e-3);
    }

    #[test]
    fn test_bounce() {
        let v = bounce(Vec2::new(0.0, -10.0), Vec2::Y, 0.5, 0.0);
        assert!((v - Vec2::new(0.0, 5.0)).length() < 1e-5);

        // Separating velocity untouched
        let v = bounce(Vec2::new(1.0, 3.0), Vec2::Y, 0.5, 0.0);
        assert_eq!(v, Vec2::new(1.0, 3.0));
    }
}
