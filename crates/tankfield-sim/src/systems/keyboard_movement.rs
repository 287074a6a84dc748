//! Keyboard-driven tank physics.
//!
//! Order per actor: turn, accelerate, lateral friction, wall response, drag,
//! rotation drag, velocity clamp, integrate, position clamp. Position is
//! integrated by velocity directly; `delta` scales only the accelerations.

use hecs::{Entity, World};

use tankfield_core::components::{Body, Heading};
use tankfield_core::enums::ControlKey;
use tankfield_core::math::clamp;
use tankfield_core::tuning::KeyboardTuning;
use tankfield_core::types::{Position, Velocity};

use crate::input::KeyboardState;
use crate::systems::collision;

/// Drives registered actors from the keyboard state.
///
/// Rotation speed is shared by every registered actor.
#[derive(Debug, Default)]
pub struct KeyboardController {
    registered: Vec<Entity>,
    rotation_speed: f64,
    tuning: KeyboardTuning,
}

impl KeyboardController {
    pub fn new(tuning: KeyboardTuning) -> Self {
        Self {
            registered: Vec::new(),
            rotation_speed: 0.0,
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

    /// Forget every actor and stop turning.
    pub fn release_all(&mut self) {
        self.registered.clear();
        self.rotation_speed = 0.0;
    }

    pub fn registered(&self) -> &[Entity] {
        &self.registered
    }

    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    pub fn tuning(&self) -> &KeyboardTuning {
        &self.tuning
    }

    /// Advance every registered actor one tick inside a `world_size` arena.
    pub fn update(
        &mut self,
        world: &mut World,
        keys: &KeyboardState,
        delta: f64,
        world_size: (f64, f64),
    ) {
        if self.registered.is_empty() {
            return;
        }
        // Actors despawned elsewhere drop out here.
        self.registered.retain(|e| world.contains(*e));

        let targets = collision::target_bounds(world);
        let t = self.tuning;

        for &entity in &self.registered {
            let Ok((pos, vel, heading, body)) = world
                .query_one_mut::<(&mut Position, &mut Velocity, &mut Heading, &Body)>(entity)
            else {
                continue;
            };

            let turn = if keys.is_down(ControlKey::Left) {
                -1.0
            } else if keys.is_down(ControlKey::Right) {
                1.0
            } else {
                0.0
            };
            if turn != 0.0 {
                self.rotation_speed += turn * t.rotation_acceleration * delta;
                self.rotation_speed *= (vel.speed() / t.max_speed) * t.turn_speed_coupling;
                self.rotation_speed =
                    clamp(self.rotation_speed, -t.max_rotation_speed, t.max_rotation_speed);
            }

            let thrust = if keys.is_down(ControlKey::Accelerate) {
                1.0
            } else if keys.is_down(ControlKey::Brake) {
                -1.0
            } else {
                0.0
            };
            if thrust != 0.0 {
                vel.x += thrust * heading.0.cos() * t.acceleration;
                vel.y += thrust * heading.0.sin() * t.acceleration;
            }

            vel.scale(t.lateral_friction);
            heading.0 += collision::wall_response(
                body.center(pos),
                body.radius(),
                vel,
                self.rotation_speed,
                &targets,
                t.acceleration * t.wall_push_factor,
                t.wall_rotation_kick,
            );
            vel.scale(t.drag);

            self.rotation_speed *= t.rotation_drag;
            heading.0 += self.rotation_speed;

            vel.x = clamp(vel.x, -t.max_speed, t.max_speed);
            vel.y = clamp(vel.y, -t.max_speed, t.max_speed);
            pos.x += vel.x;
            pos.y += vel.y;

            let half_w = body.width / 2.0;
            let half_h = body.height / 2.0;
            pos.x = clamp(pos.x, half_w, world_size.0 - half_w);
            pos.y = clamp(pos.y, half_h, world_size.1 - half_h);
        }
    }
}
