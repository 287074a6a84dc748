//! Events emitted by the simulation for the caller to react to.

use serde::{Deserialize, Serialize};

use crate::enums::{ActorKind, SceneState};
use crate::types::Position;

/// Outcome of one projectile update pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProjectileEvent {
    /// A projectile struck a target. `remaining` is the target's life after
    /// the hit (infinite for walls).
    TargetHit {
        kind: ActorKind,
        position: Position,
        remaining: f64,
    },
    /// A target's life reached zero; it has been despawned.
    TargetDestroyed { kind: ActorKind, position: Position },
    /// A projectile hit something, left the world, or aged out.
    ProjectileExpired { position: Position },
}

/// Scene-level notifications surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SceneEvent {
    StateChanged {
        scene: String,
        from: SceneState,
        to: SceneState,
    },
    Switched { from: String, to: String },
}
