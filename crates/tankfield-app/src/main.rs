use std::io::BufRead;
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tankfield_app::config::{load_game_config, HostOptions, USAGE};
use tankfield_app::game_loop::LoopSetup;
use tankfield_app::host;
use tankfield_app::state::AppState;
use tankfield_core::commands::InputEvent;
use tankfield_core::level::LevelData;
use tankfield_core::tuning::GameConfig;
use tankfield_procgen::{generate_level, player_footprint, LevelGenConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = match HostOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "tankfield_failed");
            ExitCode::FAILURE
        }
    }
}

fn run(options: HostOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &options.config {
        Some(path) => load_game_config(path)?,
        None => GameConfig::default(),
    };

    let level = match &options.level {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            serde_json::from_str::<LevelData>(&json)?
        }
        None => {
            let (columns, rows) = config.arena.grid_size.unwrap_or((
                tankfield_core::constants::GRID_X_COUNT,
                tankfield_core::constants::GRID_Y_COUNT,
            ));
            generate_level(&LevelGenConfig {
                seed: options.seed,
                columns,
                rows,
                keep_clear: player_footprint(&config.arena),
                ..Default::default()
            })
        }
    };
    info!(
        columns = level.columns(),
        rows = level.rows(),
        seed = options.seed,
        "level_ready"
    );

    let state = AppState::new();
    let handle = host::start_simulation(
        &state,
        LoopSetup {
            level,
            config,
            viewport: options.viewport,
            skip_menu: options.skip_menu,
            max_ticks: options.ticks,
        },
    )?;

    // Input arrives as one JSON event per line on stdin.
    if options.ticks.is_none() {
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<InputEvent>(&line) {
                Ok(event) => {
                    if host::send_input(&state, event).is_err() {
                        break;
                    }
                }
                Err(err) => warn!(error = %err, line = %line, "bad_input_line"),
            }
        }
        host::shutdown(&state)?;
    }

    let ticks = handle.join().map_err(|_| "game loop thread panicked")?;
    if let Some(snapshot) = host::get_snapshot(&state)? {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    info!(ticks, "tankfield_exit");
    Ok(())
}
