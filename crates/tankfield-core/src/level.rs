//! Level file format: `{ "data": number[][] }`.
//!
//! `data[row][col]` holds a raw cell code. Codes are kept as integers here
//! so the loader can report the exact cell that is out of range.

use serde::{Deserialize, Serialize};

use crate::enums::CellCode;

/// Raw level document as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub data: Vec<Vec<i64>>,
}

impl LevelData {
    /// Build a document from typed cells.
    pub fn from_cells(rows: &[Vec<CellCode>]) -> Self {
        Self {
            data: rows
                .iter()
                .map(|row| row.iter().map(|c| c.code() as i64).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    /// Column count of the first row (0 for an empty document).
    pub fn columns(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }
}

/// Tile coordinate inside a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub row: usize,
    pub col: usize,
}

impl TileCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}
