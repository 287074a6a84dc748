//! Error types for level loading, scene setup, and scene switching.

use thiserror::Error;

/// Level data could not be turned into a grid.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level has no cells")]
    Empty,
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("level is {found_cols}x{found_rows}, expected {expected_cols}x{expected_rows}")]
    Dimensions {
        expected_cols: usize,
        expected_rows: usize,
        found_cols: usize,
        found_rows: usize,
    },
    #[error("unknown cell code {code} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, code: i64 },
}

/// A scene failed to set itself up.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Scene registry and switching failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no scenes registered")]
    NoScenes,
    #[error("scene index {0} registered more than once")]
    DuplicateIndex(i32),
    #[error("world size must be positive, got {width}x{height}")]
    InvalidWorldSize { width: f64, height: f64 },
    #[error("scene not found: {0}")]
    SceneNotFound(String),
    #[error("scene `{name}` failed to set up: {source}")]
    Setup {
        name: String,
        #[source]
        source: SceneError,
    },
}
