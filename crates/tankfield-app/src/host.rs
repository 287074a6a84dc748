//! Host API over the game loop thread.
//!
//! These functions bridge an input source (stdin, a window backend) to the
//! loop thread via its command channel.

use std::thread::JoinHandle;

use thiserror::Error;

use tankfield_core::commands::InputEvent;
use tankfield_core::state::ArenaSnapshot;

use crate::game_loop::{self, LoopSetup};
use crate::state::{AppState, GameLoopCommand};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop has stopped")]
    Disconnected,
    #[error("shared state lock poisoned")]
    Poisoned,
}

/// Start the loop thread. Fails if it is already running.
pub fn start_simulation(state: &AppState, setup: LoopSetup) -> Result<JoinHandle<u64>, HostError> {
    let mut running = state.running.lock().map_err(|_| HostError::Poisoned)?;
    if *running {
        return Err(HostError::AlreadyRunning);
    }

    let (cmd_tx, handle) = game_loop::spawn_game_loop(setup, state.latest_snapshot.clone());

    let mut tx_lock = state.command_tx.lock().map_err(|_| HostError::Poisoned)?;
    *tx_lock = Some(cmd_tx);
    *running = true;

    Ok(handle)
}

fn send(state: &AppState, command: GameLoopCommand) -> Result<(), HostError> {
    let tx_lock = state.command_tx.lock().map_err(|_| HostError::Poisoned)?;
    match tx_lock.as_ref() {
        Some(tx) => tx.send(command).map_err(|_| HostError::Disconnected),
        None => Err(HostError::NotStarted),
    }
}

/// Forward one raw input event.
pub fn send_input(state: &AppState, event: InputEvent) -> Result<(), HostError> {
    send(state, GameLoopCommand::Input(event))
}

pub fn resize(state: &AppState, width: f64, height: f64) -> Result<(), HostError> {
    send(state, GameLoopCommand::Resize { width, height })
}

/// Ask the loop to stop. Stopping a loop that already exited is not an error.
pub fn shutdown(state: &AppState) -> Result<(), HostError> {
    match send(state, GameLoopCommand::Shutdown) {
        Ok(()) | Err(HostError::Disconnected) => {}
        Err(err) => return Err(err),
    }
    let mut running = state.running.lock().map_err(|_| HostError::Poisoned)?;
    *running = false;
    Ok(())
}

/// Latest published snapshot, if the arena is active.
pub fn get_snapshot(state: &AppState) -> Result<Option<ArenaSnapshot>, HostError> {
    let lock = state.latest_snapshot.lock().map_err(|_| HostError::Poisoned)?;
    Ok(lock.clone())
}
