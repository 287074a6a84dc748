//! Arena snapshot: the visible simulation state after a tick.

use serde::{Deserialize, Serialize};

use crate::enums::{SceneState, TankType};
use crate::types::{Position, SimTime, Velocity};

/// Compact view of the arena for logging and determinism checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub time: SimTime,
    pub scene_state: SceneState,
    pub player: Option<PlayerView>,
    pub walls: usize,
    pub destructibles: usize,
    pub projectiles: usize,
    pub tire_marks: usize,
    pub reload_remaining: f64,
}

/// Player kinematics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub velocity: Velocity,
    pub heading: f64,
    pub tank: TankType,
}
