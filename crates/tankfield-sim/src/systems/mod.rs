//! Per-tick systems operating on a scene's hecs world.
//!
//! Controllers and the projectile system keep their own registration lists
//! and counters; actor data lives in components.

pub mod collision;
pub mod keyboard_movement;
pub mod pointer_movement;
pub mod projectiles;
pub mod tire_marks;
