//! Pointer-seeking physics: accelerate toward the pointer, ease heading
//! toward it along the shortest arc.

use hecs::{Entity, World};

use tankfield_core::components::{Body, Heading};
use tankfield_core::math::{direction, normalize_degrees};
use tankfield_core::tuning::PointerTuning;
use tankfield_core::types::{Position, Velocity};

use crate::systems::collision;

#[derive(Debug, Default)]
pub struct PointerController {
    registered: Vec<Entity>,
    tuning: PointerTuning,
}

impl PointerController {
    pub fn new(tuning: PointerTuning) -> Self {
        Self {
            registered: Vec::new(),
            tuning,
        }
    }

    pub fn register(&mut self, entity: Entity) {
        if !self.registered.contains(&entity) {
            self.registered.push(entity);
        }
    }

    pub fn deregister(&mut self, entity: Entity) {
        self.registered.retain(|e| *e != entity);
    }

    pub fn release_all(&mut self) {
        self.registered.clear();
    }

    pub fn registered(&self) -> &[Entity] {
        &self.registered
    }

    /// Move registered actors toward `pointer` (world coordinates).
    /// Nothing moves until the pointer has a position.
    pub fn update(&mut self, world: &mut World, pointer: Option<Position>, delta: f64) {
        let Some(target) = pointer else {
            return;
        };
        if self.registered.is_empty() {
            return;
        }
        self.registered.retain(|e| world.contains(*e));

        let targets = collision::target_bounds(world);
        let t = self.tuning;

        for &entity in &self.registered {
            let Ok((pos, vel, heading, body)) = world
                .query_one_mut::<(&mut Position, &mut Velocity, &mut Heading, &Body)>(entity)
            else {
                continue;
            };

            if pos.distance_to(&target) < t.min_distance() {
                continue;
            }

            let dir = direction(pos, &target);
            let mut v = vel.as_vec() + dir * t.acceleration * t.easing * delta;
            if v.length() > t.max_speed {
                v = v.normalize_or_zero() * t.max_speed;
            }
            *vel = Velocity::from(v);

            let movement = collision::friction_response(
                body.center(pos),
                body.radius(),
                v * delta,
                &targets,
                t.wall_friction,
            );
            pos.x += movement.x;
            pos.y += movement.y;

            rotate_towards(heading, pos, &target, delta, &t);
        }
    }
}

/// Ease `heading` toward the bearing from `from` to `target`.
///
/// The target angle is the bearing plus `heading_offset_degrees`; the
/// difference is wrapped to (-180°, 180°] so the turn takes the short way.
pub fn rotate_towards(
    heading: &mut Heading,
    from: &Position,
    target: &Position,
    delta: f64,
    tuning: &PointerTuning,
) {
    let wanted = from.bearing_to(target).to_degrees() + tuning.heading_offset_degrees;
    let diff = normalize_degrees(wanted - heading.0.to_degrees());
    let step = diff * tuning.rotation_easing * delta / 1000.0;
    heading.0 += step.to_radians();
}
