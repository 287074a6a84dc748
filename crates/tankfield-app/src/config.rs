//! Command-line options and the optional JSON tuning file.

use std::path::{Path, PathBuf};

use thiserror::Error;

use tankfield_core::constants::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use tankfield_core::tuning::GameConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("invalid value `{value}` for {flag}")]
    InvalidValue { flag: String, value: String },
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

/// Options for the headless host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostOptions {
    /// Level file. A level is generated from `seed` when absent.
    pub level: Option<PathBuf>,
    /// Tuning overrides.
    pub config: Option<PathBuf>,
    pub seed: u64,
    /// Stop after this many ticks. Runs until stdin closes when absent.
    pub ticks: Option<u64>,
    pub viewport: (f64, f64),
    /// Skip the menu and start in the arena.
    pub skip_menu: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            level: None,
            config: None,
            seed: 42,
            ticks: None,
            viewport: (DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            skip_menu: false,
        }
    }
}

pub const USAGE: &str = "usage: tankfield [--level <file>] [--config <file>] [--seed <n>] \
[--ticks <n>] [--viewport <w>x<h>] [--skip-menu]";

impl HostOptions {
    /// Parse arguments (without the program name).
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--level" => options.level = Some(PathBuf::from(value(&arg, args.next())?)),
                "--config" => options.config = Some(PathBuf::from(value(&arg, args.next())?)),
                "--seed" => options.seed = parse_number(&arg, value(&arg, args.next())?)?,
                "--ticks" => options.ticks = Some(parse_number(&arg, value(&arg, args.next())?)?),
                "--viewport" => {
                    let raw = value(&arg, args.next())?;
                    options.viewport = parse_viewport(&arg, &raw)?;
                }
                "--skip-menu" => options.skip_menu = true,
                _ => return Err(ConfigError::UnknownArgument(arg)),
            }
        }
        Ok(options)
    }
}

fn value(flag: &str, next: Option<String>) -> Result<String, ConfigError> {
    next.ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

fn parse_number<T: std::str::FromStr>(flag: &str, raw: String) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: raw,
    })
}

fn parse_viewport(flag: &str, raw: &str) -> Result<(f64, f64), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: raw.to_string(),
    };
    let (w, h) = raw.split_once('x').ok_or_else(invalid)?;
    let width: f64 = w.parse().map_err(|_| invalid())?;
    let height: f64 = h.parse().map_err(|_| invalid())?;
    if width <= 0.0 || height <= 0.0 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Read a tuning file. Missing fields keep their defaults.
pub fn load_game_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
