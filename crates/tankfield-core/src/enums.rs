//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Scene lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneState {
    /// Entering transition running.
    #[default]
    Load,
    /// Gameplay running, no transition.
    Process,
    /// Leaving transition running.
    Finalize,
    /// Leaving transition complete. Terminal for the scene instance.
    Done,
}

/// A cell of the level grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CellCode {
    #[default]
    Empty,
    Wall,
    Destructible,
}

impl CellCode {
    pub fn code(self) -> u8 {
        match self {
            CellCode::Empty => 0,
            CellCode::Wall => 1,
            CellCode::Destructible => 2,
        }
    }
}

impl TryFrom<u8> for CellCode {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CellCode::Empty),
            1 => Ok(CellCode::Wall),
            2 => Ok(CellCode::Destructible),
            other => Err(format!("unknown cell code {other}")),
        }
    }
}

impl From<CellCode> for u8 {
    fn from(cell: CellCode) -> Self {
        cell.code()
    }
}

/// What an actor is. One entity shape, tagged by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Wall,
    Destructible,
    Projectile,
}

/// Overlay fade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Overlay starts opaque and fades away (alpha 1 → 0).
    FadeOut,
    /// Overlay starts clear and fades to black (alpha 0 → 1).
    FadeIn,
}

/// Result of polling a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionStatus {
    /// Not initialized yet.
    #[default]
    Idle,
    Running,
    Completed,
}

/// Player tank loadout. Cycled in order by the change-tank key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankType {
    /// Two angled shots.
    #[default]
    Twin,
    /// One heavy shot.
    Heavy,
    /// Three-way spread.
    Spread,
}

impl TankType {
    pub fn next(self) -> Self {
        match self {
            TankType::Twin => TankType::Heavy,
            TankType::Heavy => TankType::Spread,
            TankType::Spread => TankType::Twin,
        }
    }

    /// Tint applied to the player node for this loadout.
    pub fn tint(self) -> u32 {
        match self {
            TankType::Twin => 0xff0000,
            TankType::Heavy => 0x0000ff,
            TankType::Spread => 0x00ff00,
        }
    }
}

/// Which movement controller drives the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlScheme {
    /// Tank physics on the arrow/WASD keys.
    #[default]
    Keyboard,
    /// Chase the pointer.
    Pointer,
}

/// Logical control keys. Several raw key identifiers map to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKey {
    Left,
    Right,
    Accelerate,
    Brake,
    Fire,
    ChangeTank,
}

impl ControlKey {
    /// Map a raw key identifier (DOM-style `key` value) to a control key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" => Some(ControlKey::Left),
            "ArrowRight" | "d" => Some(ControlKey::Right),
            "ArrowUp" | "w" => Some(ControlKey::Accelerate),
            "ArrowDown" | "s" => Some(ControlKey::Brake),
            " " | "Space" => Some(ControlKey::Fire),
            "t" => Some(ControlKey::ChangeTank),
            _ => None,
        }
    }
}
