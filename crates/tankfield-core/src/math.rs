//! Geometry helpers shared by movement and projectile systems.

use glam::DVec2;

use crate::types::{Position, Rect};

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics; callers guarantee `min <= max`
/// and a reversed range collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Distance between two points.
pub fn distance(a: &Position, b: &Position) -> f64 {
    a.distance_to(b)
}

/// Unit vector pointing from `from` to `to`. Zero when the points coincide.
pub fn direction(from: &Position, to: &Position) -> DVec2 {
    (to.as_vec() - from.as_vec()).normalize_or_zero()
}

/// Closest point on (or inside) `rect` to `point`.
pub fn closest_point_on_rect(point: DVec2, rect: &Rect) -> DVec2 {
    DVec2::new(
        clamp(point.x, rect.x, rect.right()),
        clamp(point.y, rect.y, rect.bottom()),
    )
}

/// Circle vs axis-aligned rectangle overlap test.
///
/// The circle's centre is clamped onto the rectangle to find the nearest
/// point; the shapes overlap when that point is strictly closer than `radius`.
pub fn circle_intersects_rect(center: DVec2, radius: f64, rect: &Rect) -> bool {
    let nearest = closest_point_on_rect(center, rect);
    center.distance_squared(nearest) < radius * radius
}

/// Wrap an angle difference in degrees into (-180, 180].
pub fn normalize_degrees(mut diff: f64) -> f64 {
    diff = diff.rem_euclid(360.0);
    if diff > 180.0 {
        diff -= 360.0;
    }
    diff
}
