//! Projectile spawning, flight, hit resolution and cleanup.
//!
//! The reload cooldown belongs to the system instance, so each scene has its
//! own. Hits and removals are reported as [`ProjectileEvent`]s; the world is
//! the canonical actor collection and is mutated in place.

use hecs::{Entity, World};
use tracing::{debug, trace};

use tankfield_core::components::{Body, Damage, Life};
use tankfield_core::enums::ActorKind;
use tankfield_core::events::ProjectileEvent;
use tankfield_core::math::circle_intersects_rect;
use tankfield_core::tuning::{HitDamage, ProjectileTuning};
use tankfield_core::types::{Position, Velocity};

use crate::actors;
use crate::render::Renderer;
use crate::systems::collision;

#[derive(Debug, Default)]
pub struct ProjectileSystem {
    cooldown: f64,
    tuning: ProjectileTuning,
    projectiles: Vec<Entity>,
    despawn_buffer: Vec<Entity>,
}

impl ProjectileSystem {
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            cooldown: 0.0,
            tuning,
            projectiles: Vec::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Remaining reload time. Fire is allowed once this is `<= 0`.
    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    pub fn projectiles(&self) -> &[Entity] {
        &self.projectiles
    }

    /// Spawn a projectile at `at` heading `angle_degrees`.
    ///
    /// Returns `None` while reloading. A shot with `triggers_reload` starts
    /// the cooldown; shots without it can follow in the same tick.
    pub fn fire(
        &mut self,
        world: &mut World,
        renderer: &mut dyn Renderer,
        at: Position,
        angle_degrees: f64,
        triggers_reload: bool,
        damage: f64,
    ) -> Option<Entity> {
        if self.cooldown > 0.0 {
            return None;
        }

        let entity = actors::spawn_projectile(
            world,
            renderer,
            at,
            angle_degrees.to_radians(),
            self.tuning.bullet_speed,
            self.tuning.bullet_life,
            damage,
        );
        self.projectiles.push(entity);
        if triggers_reload {
            self.cooldown = self.tuning.reload_cooldown;
        }
        trace!(x = at.x, y = at.y, angle = angle_degrees, damage, "projectile_fired");
        Some(entity)
    }

    /// Advance all projectiles by `delta` inside a `world_size` arena.
    pub fn update(
        &mut self,
        world: &mut World,
        renderer: &mut dyn Renderer,
        delta: f64,
        world_size: (f64, f64),
    ) -> Vec<ProjectileEvent> {
        // Gated on `> 0` only; the counter may go negative.
        self.cooldown -= delta;

        let mut events = Vec::new();
        self.projectiles.retain(|e| world.contains(*e));
        if self.projectiles.is_empty() {
            return events;
        }

        let targets = collision::target_bounds(world);
        let mut hits: Vec<(Entity, f64)> = Vec::new();

        for &entity in &self.projectiles {
            let Ok((pos, vel, life, damage, body)) = world
                .query_one_mut::<(&mut Position, &Velocity, &mut Life, &Damage, &Body)>(entity)
            else {
                continue;
            };

            pos.x += vel.x * delta;
            pos.y += vel.y * delta;
            life.damage(delta);

            let center = body.center(pos);
            let radius = body.radius();
            let amount = match self.tuning.hit_damage {
                HitDamage::Fixed(amount) => amount,
                HitDamage::FromProjectile => damage.0,
            };
            for (target, rect) in &targets {
                if circle_intersects_rect(center, radius, rect) {
                    life.deplete();
                    hits.push((*target, amount));
                }
            }

            if pos.x < 0.0 || pos.x > world_size.0 || pos.y < 0.0 || pos.y > world_size.1 {
                life.deplete();
            }
        }

        for (target, amount) in hits.drain(..) {
            let Ok((pos, life, kind)) =
                world.query_one_mut::<(&Position, &mut Life, &ActorKind)>(target)
            else {
                continue;
            };
            life.damage(amount);
            events.push(ProjectileEvent::TargetHit {
                kind: *kind,
                position: *pos,
                remaining: life.value(),
            });
        }

        // Expired projectiles.
        self.despawn_buffer.clear();
        for &entity in &self.projectiles {
            if let Ok(mut query) = world.query_one::<(&Position, &Life)>(entity) {
                if let Some((pos, life)) = query.get() {
                    if life.is_depleted() {
                        events.push(ProjectileEvent::ProjectileExpired { position: *pos });
                        self.despawn_buffer.push(entity);
                    }
                }
            }
        }
        for entity in self.despawn_buffer.drain(..) {
            actors::despawn(world, renderer, entity);
        }
        self.projectiles.retain(|e| world.contains(*e));

        // Destroyed targets.
        for (target, _) in &targets {
            if let Ok(mut query) = world.query_one::<(&Position, &Life, &ActorKind)>(*target) {
                if let Some((pos, life, kind)) = query.get() {
                    if life.is_depleted() {
                        debug!(?kind, x = pos.x, y = pos.y, "target_destroyed");
                        events.push(ProjectileEvent::TargetDestroyed {
                            kind: *kind,
                            position: *pos,
                        });
                        self.despawn_buffer.push(*target);
                    }
                }
            }
        }
        for entity in self.despawn_buffer.drain(..) {
            actors::despawn(world, renderer, entity);
        }

        events
    }

    /// Despawn every live projectile and reset the cooldown.
    pub fn clear(&mut self, world: &mut World, renderer: &mut dyn Renderer) {
        for entity in self.projectiles.drain(..) {
            actors::despawn(world, renderer, entity);
        }
        self.cooldown = 0.0;
    }
}
