//! TANKFIELD headless host.
//!
//! Wires the simulation crates together: builds the scene engine on its own
//! thread, feeds it input over a channel, and publishes arena snapshots.

pub mod config;
pub mod game_loop;
pub mod host;
pub mod state;

pub use tankfield_core as core;
