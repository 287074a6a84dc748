//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in systems; the only methods
//! here are small accessors that keep the `Life` and `Body` invariants in
//! one place.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::types::{NodeId, Position, Rect};

/// Orientation in radians (0 = +x, clockwise on screen).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading(pub f64);

/// Remaining hit points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Life {
    /// Cannot be destroyed (walls).
    Infinite,
    Finite(f64),
}

impl Life {
    /// Subtract `amount`. Infinite life is unaffected.
    pub fn damage(&mut self, amount: f64) {
        if let Life::Finite(hp) = self {
            *hp -= amount;
        }
    }

    /// Set to zero (finite actors only).
    pub fn deplete(&mut self) {
        if let Life::Finite(hp) = self {
            *hp = 0.0;
        }
    }

    pub fn is_depleted(&self) -> bool {
        match self {
            Life::Infinite => false,
            Life::Finite(hp) => *hp <= 0.0,
        }
    }

    /// Remaining hit points; `f64::INFINITY` for indestructible actors.
    pub fn value(&self) -> f64 {
        match self {
            Life::Infinite => f64::INFINITY,
            Life::Finite(hp) => *hp,
        }
    }
}

/// Damage this actor deals on contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Damage(pub f64);

/// Where the actor's position sits within its body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// Position is the top-left corner (grid tiles).
    #[default]
    TopLeft,
    /// Position is the centre (tank, projectiles).
    Center,
}

/// On-screen extent of an actor, read from the renderer at spawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub width: f64,
    pub height: f64,
    pub anchor: Anchor,
}

impl Body {
    pub fn new(width: f64, height: f64, anchor: Anchor) -> Self {
        Self {
            width,
            height,
            anchor,
        }
    }

    /// Collision radius used when this actor is the moving circle.
    pub fn radius(&self) -> f64 {
        self.width / 2.0
    }

    /// Bounding rectangle at `pos`.
    pub fn bounds(&self, pos: &Position) -> Rect {
        match self.anchor {
            Anchor::TopLeft => Rect::new(pos.x, pos.y, self.width, self.height),
            Anchor::Center => Rect::new(
                pos.x - self.width / 2.0,
                pos.y - self.height / 2.0,
                self.width,
                self.height,
            ),
        }
    }

    /// Centre of the body at `pos`.
    pub fn center(&self, pos: &Position) -> DVec2 {
        self.bounds(pos).center()
    }
}

/// The renderer node this actor exclusively owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visual(pub NodeId);

/// Marks an actor that blocks movement and takes projectile hits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CollisionTarget;
