//! State shared between the host API and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use tankfield_core::commands::InputEvent;
use tankfield_core::state::ArenaSnapshot;

/// Messages sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Raw input to queue for the next tick.
    Input(InputEvent),
    /// Viewport changed size.
    Resize { width: f64, height: f64 },
    /// Close the active scene and stop the thread.
    Shutdown,
}

/// Handles owned by the host.
///
/// `mpsc::Sender` is not `Sync`, so it sits behind a `Mutex` like the
/// snapshot and the running flag.
pub struct AppState {
    /// `None` until the loop is started.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Written by the loop after every tick.
    pub latest_snapshot: Arc<Mutex<Option<ArenaSnapshot>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
