//! Raw input events delivered to the simulation.
//!
//! Events are queued and applied at the next tick boundary, last write wins.

use serde::{Deserialize, Serialize};

/// Input collaborator contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    /// A key went down. `key` is the raw identifier (`"ArrowUp"`, `"w"`, `" "`).
    KeyDown { key: String },
    /// A key was released.
    KeyUp { key: String },
    /// Pointer moved, in client (viewport) coordinates.
    PointerMove { x: f64, y: f64 },
    /// A named on-screen button was pressed (`"play"`, `"back"`).
    ButtonPressed { id: String },
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        InputEvent::KeyDown { key: key.into() }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        InputEvent::KeyUp { key: key.into() }
    }

    pub fn button(id: impl Into<String>) -> Self {
        InputEvent::ButtonPressed { id: id.into() }
    }
}
