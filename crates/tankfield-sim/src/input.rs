//! Per-scene input state.
//!
//! Each scene owns an [`InputState`]. Tracking is explicit: events are only
//! recorded between `start()` and `stop()`, and `stop()` clears held keys so
//! a scene that is closed mid-press never sees a stuck key when it returns.

use std::collections::HashSet;

use tankfield_core::commands::InputEvent;
use tankfield_core::enums::ControlKey;
use tankfield_core::types::Position;

/// Set of currently held control keys plus this tick's fresh presses.
#[derive(Debug, Default)]
pub struct KeyboardState {
    tracking: bool,
    held: HashSet<ControlKey>,
    pressed: Vec<ControlKey>,
}

impl KeyboardState {
    pub fn start(&mut self) {
        self.tracking = true;
    }

    pub fn stop(&mut self) {
        self.tracking = false;
        self.held.clear();
        self.pressed.clear();
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn key_down(&mut self, key: &str) {
        if !self.tracking {
            return;
        }
        if let Some(control) = ControlKey::from_key(key) {
            if self.held.insert(control) {
                self.pressed.push(control);
            }
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if !self.tracking {
            return;
        }
        if let Some(control) = ControlKey::from_key(key) {
            self.held.remove(&control);
        }
    }

    pub fn is_down(&self, key: ControlKey) -> bool {
        self.held.contains(&key)
    }

    /// Keys that went down since the last call, in press order.
    pub fn take_presses(&mut self) -> Vec<ControlKey> {
        std::mem::take(&mut self.pressed)
    }
}

/// Last known pointer position in client coordinates.
#[derive(Debug, Default)]
pub struct PointerTracker {
    tracking: bool,
    position: Option<Position>,
}

impl PointerTracker {
    pub fn start(&mut self) {
        self.tracking = true;
    }

    /// Stop tracking. The last position is forgotten.
    pub fn stop(&mut self) {
        self.tracking = false;
        self.position = None;
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        if self.tracking {
            self.position = Some(Position::new(x, y));
        }
    }

    /// `None` until the first move after `start()`.
    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

/// Keyboard, pointer, and button presses for one scene.
#[derive(Debug, Default)]
pub struct InputState {
    tracking: bool,
    pub keyboard: KeyboardState,
    pub pointer: PointerTracker,
    buttons: Vec<String>,
}

impl InputState {
    pub fn start(&mut self) {
        self.tracking = true;
        self.keyboard.start();
        self.pointer.start();
        self.buttons.clear();
    }

    pub fn stop(&mut self) {
        self.tracking = false;
        self.keyboard.stop();
        self.pointer.stop();
        self.buttons.clear();
    }

    /// Record one raw event.
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key } => self.keyboard.key_down(key),
            InputEvent::KeyUp { key } => self.keyboard.key_up(key),
            InputEvent::PointerMove { x, y } => self.pointer.move_to(*x, *y),
            InputEvent::ButtonPressed { id } => {
                if self.tracking {
                    self.buttons.push(id.clone());
                }
            }
        }
    }

    /// Buttons pressed since the last call.
    pub fn take_buttons(&mut self) -> Vec<String> {
        std::mem::take(&mut self.buttons)
    }
}

/// Stage transform from world to client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl DisplayTransform {
    /// Fit a grid of `world_width` into the viewport and centre it horizontally.
    pub fn fit(viewport_width: f64, world_width: f64, scale: f64) -> Self {
        Self {
            scale,
            offset_x: (viewport_width - world_width * scale) / 2.0,
            offset_y: 0.0,
        }
    }

    pub fn to_client(&self, world: &Position) -> Position {
        Position::new(
            world.x * self.scale + self.offset_x,
            world.y * self.scale + self.offset_y,
        )
    }

    pub fn to_world(&self, client: &Position) -> Position {
        if self.scale == 0.0 {
            return *client;
        }
        Position::new(
            (client.x - self.offset_x) / self.scale,
            (client.y - self.offset_y) / self.scale,
        )
    }
}

/// Display scale that fits a `grid_width × grid_height` world into a viewport.
pub fn display_scale(viewport: (f64, f64), grid_width: f64, grid_height: f64) -> f64 {
    (viewport.0 / grid_width).min(viewport.1 / grid_height)
}
