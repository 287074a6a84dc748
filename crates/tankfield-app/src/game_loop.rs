//! Game loop thread: runs the scene engine at 60 Hz.
//!
//! The engine is built inside the thread because scenes are not `Send`.
//! Commands arrive via an `mpsc` channel; the latest arena snapshot is
//! published to shared state after every tick.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use tankfield_core::constants::{FRAME_DELTA, PAGE_GAME, PAGE_MAIN_MENU, TICK_RATE};
use tankfield_core::level::LevelData;
use tankfield_core::state::ArenaSnapshot;
use tankfield_core::tuning::GameConfig;
use tankfield_sim::error::EngineError;
use tankfield_sim::render::HeadlessRenderer;
use tankfield_sim::scenes::{ArenaScene, LevelSource, MenuScene};
use tankfield_sim::{SceneDescriptor, SceneEngine};

use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Ticks between snapshot log lines.
const SNAPSHOT_LOG_INTERVAL: u64 = TICK_RATE as u64;

/// Everything needed to build the engine on the loop thread.
#[derive(Debug, Clone)]
pub struct LoopSetup {
    pub level: LevelData,
    pub config: GameConfig,
    pub viewport: (f64, f64),
    pub skip_menu: bool,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
}

/// Register the menu and arena scenes on a headless renderer.
pub fn build_engine(setup: &LoopSetup) -> Result<SceneEngine<HeadlessRenderer>, EngineError> {
    let arena = &setup.config.arena;
    let world_size = (
        setup.level.columns() as f64 * arena.tile_width,
        setup.level.rows() as f64 * arena.tile_height,
    );
    let descriptors = vec![
        SceneDescriptor::new(0, PAGE_MAIN_MENU, Box::new(MenuScene::new())),
        SceneDescriptor::new(
            1,
            PAGE_GAME,
            Box::new(ArenaScene::new(
                LevelSource::Data(setup.level.clone()),
                setup.config,
            )),
        ),
    ];
    let renderer = HeadlessRenderer::new(setup.viewport.0, setup.viewport.1);
    let mut engine = SceneEngine::new(renderer, descriptors, world_size)?;
    if setup.skip_menu {
        engine.switch_scene(PAGE_GAME)?;
    }
    Ok(engine)
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    setup: LoopSetup,
    latest_snapshot: Arc<Mutex<Option<ArenaSnapshot>>>,
) -> (mpsc::Sender<GameLoopCommand>, JoinHandle<u64>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("tankfield-game-loop".into())
        .spawn(move || match build_engine(&setup) {
            Ok(engine) => run_game_loop(engine, &setup, cmd_rx, &latest_snapshot),
            Err(err) => {
                error!(error = %err, "engine_start_failed");
                0
            }
        })
        .expect("Failed to spawn game loop thread");

    (cmd_tx, handle)
}

/// The game loop. Runs until Shutdown, channel disconnect, or the tick
/// limit. Returns the number of ticks run.
fn run_game_loop(
    mut engine: SceneEngine<HeadlessRenderer>,
    setup: &LoopSetup,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<ArenaSnapshot>>,
) -> u64 {
    let mut next_tick_time = Instant::now();
    let mut ticks = 0u64;

    loop {
        if setup.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }

        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Input(event)) => engine.queue_input(event),
                Ok(GameLoopCommand::Resize { width, height }) => engine.resize(width, height),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    engine.shutdown();
                    return ticks;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick
        for event in engine.update(FRAME_DELTA) {
            info!(?event, "scene_event");
        }
        ticks += 1;

        // 3. Publish the snapshot
        let snapshot = engine.snapshot();
        if ticks % SNAPSHOT_LOG_INTERVAL == 0 {
            if let Some(snap) = &snapshot {
                match serde_json::to_string(snap) {
                    Ok(json) => debug!(tick = ticks, snapshot = %json, "arena_snapshot"),
                    Err(err) => error!(error = %err, "snapshot_serialize_failed"),
                }
            }
        }
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = snapshot;
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }

    engine.shutdown();
    info!(ticks, "game_loop_finished");
    ticks
}
