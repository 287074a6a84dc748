//! Actor spawning and despawning.
//!
//! Every actor is a hecs entity carrying `Position`, `Velocity`, `Heading`,
//! `Life`, `Damage`, `Body`, `ActorKind` and exactly one `Visual`. The
//! visual node is destroyed only through [`despawn`], which removes the
//! `Visual` component first so a second call cannot free the node again.

use hecs::{Entity, World};

use tankfield_core::components::{Anchor, Body, CollisionTarget, Damage, Heading, Life, Visual};
use tankfield_core::enums::{ActorKind, TankType};
use tankfield_core::types::{Position, Velocity};

use crate::render::{DrawOrder, Renderer};

pub const TANK_TEXTURE: &str = "tank";
pub const WALL_TEXTURE: &str = "rocks";
pub const DESTRUCTIBLE_TEXTURE: &str = "hay";
pub const FLOOR_TEXTURE: &str = "tile";
pub const BULLET_TEXTURE: &str = "bullet";
pub const TIRE_MARK_TEXTURE: &str = "tire_mark";

/// Spawn the player tank, centred on `at`, in front of the grid.
pub fn spawn_player(
    world: &mut World,
    renderer: &mut dyn Renderer,
    at: Position,
    tank: TankType,
    scale: f64,
) -> Entity {
    let node = renderer.create_node(TANK_TEXTURE);
    renderer.set_scale(node, scale);
    renderer.set_tint(node, tank.tint());
    renderer.set_position(node, at.x, at.y);
    renderer.attach(node, DrawOrder::Front);
    let (width, height) = renderer.node_size(node);

    world.spawn((
        at,
        Velocity::default(),
        Heading::default(),
        Life::Infinite,
        Damage(0.0),
        Body::new(width, height, Anchor::Center),
        ActorKind::Player,
        Visual(node),
    ))
}

/// Spawn a wall or destructible obstacle with its top-left corner at `origin`.
/// Obstacles are collision targets.
pub fn spawn_obstacle(
    world: &mut World,
    renderer: &mut dyn Renderer,
    kind: ActorKind,
    origin: Position,
    life: Life,
) -> Entity {
    let texture = match kind {
        ActorKind::Wall => WALL_TEXTURE,
        _ => DESTRUCTIBLE_TEXTURE,
    };
    let node = renderer.create_node(texture);
    renderer.set_position(node, origin.x, origin.y);
    renderer.attach(node, DrawOrder::Front);
    let (width, height) = renderer.node_size(node);

    world.spawn((
        origin,
        Velocity::default(),
        Heading::default(),
        life,
        Damage(0.0),
        Body::new(width, height, Anchor::TopLeft),
        kind,
        Visual(node),
        CollisionTarget,
    ))
}

/// Spawn a projectile centred on `at`, travelling along `angle` radians.
/// Its node goes behind everything already on stage.
pub fn spawn_projectile(
    world: &mut World,
    renderer: &mut dyn Renderer,
    at: Position,
    angle: f64,
    speed: f64,
    life: f64,
    damage: f64,
) -> Entity {
    let node = renderer.create_node(BULLET_TEXTURE);
    renderer.set_position(node, at.x, at.y);
    renderer.set_rotation(node, angle);
    renderer.attach(node, DrawOrder::Back);
    let (width, height) = renderer.node_size(node);

    world.spawn((
        at,
        Velocity::new(angle.cos() * speed, angle.sin() * speed),
        Heading(angle),
        Life::Finite(life),
        Damage(damage),
        Body::new(width, height, Anchor::Center),
        ActorKind::Projectile,
        Visual(node),
    ))
}

/// Destroy an actor's visual node and remove the entity.
///
/// Returns `false` if the entity was already gone. The node is freed at most
/// once no matter how often this is called.
pub fn despawn(world: &mut World, renderer: &mut dyn Renderer, entity: Entity) -> bool {
    if let Ok(Visual(node)) = world.remove_one::<Visual>(entity) {
        renderer.destroy_node(node);
    }
    world.despawn(entity).is_ok()
}

/// Despawn every actor in the world.
pub fn despawn_all(world: &mut World, renderer: &mut dyn Renderer) {
    let entities: Vec<Entity> = world.iter().map(|e| e.entity()).collect();
    for entity in entities {
        despawn(world, renderer, entity);
    }
}

/// Push position and heading of every actor to its node.
pub fn sync_visuals(world: &World, renderer: &mut dyn Renderer) {
    for (_entity, (pos, heading, visual)) in world.query::<(&Position, &Heading, &Visual)>().iter() {
        renderer.set_position(visual.0, pos.x, pos.y);
        renderer.set_rotation(visual.0, heading.0);
    }
}
