//! Collision queries and the wall-contact response.

use glam::DVec2;
use hecs::{Entity, World};

use tankfield_core::components::{Body, CollisionTarget};
use tankfield_core::math::{circle_intersects_rect, closest_point_on_rect};
use tankfield_core::types::{Position, Rect, Velocity};

/// Bounds of every collision target, gathered once per tick.
pub fn target_bounds(world: &World) -> Vec<(Entity, Rect)> {
    world
        .query::<(&Position, &Body, &CollisionTarget)>()
        .iter()
        .map(|(entity, (pos, body, _))| (entity, body.bounds(pos)))
        .collect()
}

/// Push a mover back out of every target it overlaps.
///
/// For each contact, velocity loses `push` along the direction from the
/// mover to the target's centre. Returns the heading change to apply: one
/// `rotation_kick` per contact, signed by `rotation_speed`.
pub fn wall_response(
    center: DVec2,
    radius: f64,
    velocity: &mut Velocity,
    rotation_speed: f64,
    targets: &[(Entity, Rect)],
    push: f64,
    rotation_kick: f64,
) -> f64 {
    let mut heading_change = 0.0;
    for (_, rect) in targets {
        if !circle_intersects_rect(center, radius, rect) {
            continue;
        }
        let to_wall = rect.center() - center;
        let angle = to_wall.y.atan2(to_wall.x);
        velocity.x -= angle.cos() * push;
        velocity.y -= angle.sin() * push;
        heading_change += sign(rotation_speed) * rotation_kick;
    }
    heading_change
}

/// Remove the into-target part of `movement` for every target the circle
/// would overlap after moving.
pub fn friction_response(
    center: DVec2,
    radius: f64,
    movement: DVec2,
    targets: &[(Entity, Rect)],
    friction: f64,
) -> DVec2 {
    if friction == 0.0 {
        return movement;
    }
    let mut adjusted = movement;
    let tentative = center + movement;
    for (_, rect) in targets {
        if !circle_intersects_rect(tentative, radius, rect) {
            continue;
        }
        let normal = (tentative - closest_point_on_rect(tentative, rect)).normalize_or_zero();
        let into = adjusted.dot(normal);
        if into < 0.0 {
            adjusted -= normal * into * friction;
        }
    }
    adjusted
}

/// -1, 0 or 1. Unlike `f64::signum`, zero maps to zero.
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
