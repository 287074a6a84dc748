//! Concrete scenes.

pub mod arena;
pub mod menu;

pub use arena::{ArenaScene, LevelSource};
pub use menu::MenuScene;
