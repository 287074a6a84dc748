//! Simulation kernel for TANKFIELD.
//!
//! Owns the scene lifecycle, per-scene hecs worlds, movement controllers,
//! projectiles and collisions. Drawing goes through the [`render::Renderer`]
//! trait; the kernel never touches a real graphics backend.

pub mod actors;
pub mod engine;
pub mod error;
pub mod input;
pub mod level;
pub mod render;
pub mod scene;
pub mod scenes;
pub mod systems;
pub mod transition;

pub use engine::{SceneDescriptor, SceneEngine};
pub use tankfield_core as core;

#[cfg(test)]
mod tests;
