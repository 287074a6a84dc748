//! Core types and definitions for the TANKFIELD simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, input events, tuning, level data, snapshots, and constants.
//! It has no dependency on any renderer or runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod level;
pub mod math;
pub mod state;
pub mod tuning;
pub mod types;
