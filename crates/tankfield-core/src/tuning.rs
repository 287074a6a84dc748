//! Tunable parameters.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON file only
//! needs the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::ControlScheme;
use crate::types::Position;

/// Keyboard-driven tank physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardTuning {
    pub max_speed: f64,
    pub max_rotation_speed: f64,
    pub acceleration: f64,
    pub rotation_acceleration: f64,
    pub lateral_friction: f64,
    pub rotation_drag: f64,
    pub drag: f64,
    pub turn_speed_coupling: f64,
    pub wall_push_factor: f64,
    pub wall_rotation_kick: f64,
}

impl Default for KeyboardTuning {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            max_rotation_speed: MAX_ROTATION_SPEED,
            acceleration: ACCELERATION,
            rotation_acceleration: ROTATION_ACCELERATION,
            lateral_friction: LATERAL_FRICTION,
            rotation_drag: ROTATION_DRAG,
            drag: DRAG,
            turn_speed_coupling: TURN_SPEED_COUPLING,
            wall_push_factor: WALL_PUSH_FACTOR,
            wall_rotation_kick: WALL_ROTATION_KICK,
        }
    }
}

/// Pointer-seeking physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerTuning {
    pub max_speed: f64,
    pub acceleration: f64,
    pub easing: f64,
    /// Below this distance to the pointer the actor is left alone.
    /// Unset means twice `max_speed`; see [`PointerTuning::min_distance`].
    pub min_distance: Option<f64>,
    pub rotation_easing: f64,
    pub heading_offset_degrees: f64,
    /// Fraction of into-wall movement removed on contact. 0 disables.
    pub wall_friction: f64,
}

impl Default for PointerTuning {
    fn default() -> Self {
        Self {
            max_speed: POINTER_MAX_SPEED,
            acceleration: POINTER_ACCELERATION,
            easing: POINTER_EASING,
            min_distance: None,
            rotation_easing: POINTER_ROTATION_EASING,
            heading_offset_degrees: POINTER_HEADING_OFFSET_DEGREES,
            wall_friction: POINTER_WALL_FRICTION,
        }
    }
}

impl PointerTuning {
    /// Jitter threshold, following `max_speed` unless set explicitly.
    pub fn min_distance(&self) -> f64 {
        self.min_distance.unwrap_or(self.max_speed * 2.0)
    }
}

/// Where a projectile's hit damage comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "amount")]
pub enum HitDamage {
    /// Every hit removes the same amount.
    Fixed(f64),
    /// Each hit removes the projectile's own `Damage`.
    FromProjectile,
}

impl Default for HitDamage {
    fn default() -> Self {
        HitDamage::Fixed(BULLET_HIT_DAMAGE)
    }
}

/// Projectile spawning and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub bullet_life: f64,
    pub bullet_speed: f64,
    pub reload_cooldown: f64,
    pub hit_damage: HitDamage,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            bullet_life: BULLET_LIFE,
            bullet_speed: BULLET_SPEED,
            reload_cooldown: RELOAD_COOLDOWN,
            hit_damage: HitDamage::default(),
        }
    }
}

/// Arena layout and cosmetic parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub tile_width: f64,
    pub tile_height: f64,
    /// Required grid dimensions `(columns, rows)`. `None` accepts any
    /// rectangular grid.
    pub grid_size: Option<(usize, usize)>,
    pub control: ControlScheme,
    pub destructible_life: f64,
    pub spawn_point: Position,
    pub player_scale: f64,
    pub bullet_spread: f64,
    pub tire_mark_fade: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            grid_size: Some((GRID_X_COUNT, GRID_Y_COUNT)),
            control: ControlScheme::default(),
            destructible_life: DESTRUCTIBLE_LIFE,
            spawn_point: Position::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            player_scale: PLAYER_SCALE,
            bullet_spread: BULLET_SPREAD,
            tire_mark_fade: TIRE_MARK_FADE,
        }
    }
}

/// Everything a game scene needs, bundled for loading from one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub keyboard: KeyboardTuning,
    pub pointer: PointerTuning,
    pub projectiles: ProjectileTuning,
    pub arena: ArenaConfig,
}
