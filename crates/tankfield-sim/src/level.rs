//! Grid loading and obstacle placement.

use std::path::Path;

use hecs::{Entity, World};
use tracing::{debug, info};

use tankfield_core::components::Life;
use tankfield_core::constants::FLOOR_ALPHA;
use tankfield_core::enums::{ActorKind, CellCode};
use tankfield_core::level::{LevelData, TileCoord};
use tankfield_core::tuning::ArenaConfig;
use tankfield_core::types::{NodeId, Position};

use crate::actors::{self, FLOOR_TEXTURE};
use crate::error::LevelError;
use crate::render::{DrawOrder, Renderer};

/// Validated, immutable grid of cell codes, indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<CellCode>>,
    columns: usize,
}

impl Grid {
    /// Validate a level document.
    ///
    /// `expected` is `(columns, rows)`; `None` accepts any rectangular grid.
    pub fn from_level(level: &LevelData, expected: Option<(usize, usize)>) -> Result<Self, LevelError> {
        let rows = level.rows();
        let columns = level.columns();
        if rows == 0 || columns == 0 {
            return Err(LevelError::Empty);
        }

        let mut cells = Vec::with_capacity(rows);
        for (row, raw) in level.data.iter().enumerate() {
            if raw.len() != columns {
                return Err(LevelError::Ragged {
                    row,
                    expected: columns,
                    found: raw.len(),
                });
            }
            let parsed = raw
                .iter()
                .enumerate()
                .map(|(col, &code)| {
                    u8::try_from(code)
                        .ok()
                        .and_then(|c| CellCode::try_from(c).ok())
                        .ok_or(LevelError::UnknownCell { row, col, code })
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(parsed);
        }

        if let Some((expected_cols, expected_rows)) = expected {
            if expected_cols != columns || expected_rows != rows {
                return Err(LevelError::Dimensions {
                    expected_cols,
                    expected_rows,
                    found_cols: columns,
                    found_rows: rows,
                });
            }
        }

        Ok(Self { cells, columns })
    }

    /// Parse a level from JSON text.
    pub fn from_json(json: &str, expected: Option<(usize, usize)>) -> Result<Self, LevelError> {
        let level: LevelData = serde_json::from_str(json)?;
        Self::from_level(&level, expected)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell(&self, coord: TileCoord) -> Option<CellCode> {
        self.cells.get(coord.row)?.get(coord.col).copied()
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, CellCode)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &cell)| (TileCoord::new(row, col), cell))
        })
    }

    /// World-space size `(width, height)` for the given tile size.
    pub fn pixel_size(&self, tile_width: f64, tile_height: f64) -> (f64, f64) {
        (
            self.columns as f64 * tile_width,
            self.rows() as f64 * tile_height,
        )
    }
}

/// Read and validate a level file.
pub fn load_level_file(path: &Path, expected: Option<(usize, usize)>) -> Result<Grid, LevelError> {
    let json = std::fs::read_to_string(path)?;
    let grid = Grid::from_json(&json, expected)?;
    info!(
        path = %path.display(),
        columns = grid.columns(),
        rows = grid.rows(),
        "level_loaded"
    );
    Ok(grid)
}

/// Actors and decorative nodes created from a grid.
#[derive(Debug, Default)]
pub struct ArenaLayout {
    pub walls: Vec<(TileCoord, Entity)>,
    pub destructibles: Vec<(TileCoord, Entity)>,
    /// Floor tiles under empty cells. Not actors.
    pub floor: Vec<NodeId>,
}

impl ArenaLayout {
    /// Drop entries whose entity no longer exists.
    pub fn prune(&mut self, world: &World) {
        self.walls.retain(|(_, e)| world.contains(*e));
        self.destructibles.retain(|(_, e)| world.contains(*e));
    }

    /// Destroy the floor nodes. Actors are released through the world.
    pub fn release_floor(&mut self, renderer: &mut dyn Renderer) {
        for node in self.floor.drain(..) {
            renderer.destroy_node(node);
        }
    }
}

/// Tile origin of a grid cell in world units.
pub fn tile_origin(coord: TileCoord, tile_width: f64, tile_height: f64) -> Position {
    Position::new(coord.col as f64 * tile_width, coord.row as f64 * tile_height)
}

/// Place one actor per non-empty cell and a floor node per empty cell.
pub fn spawn_grid(
    grid: &Grid,
    world: &mut World,
    renderer: &mut dyn Renderer,
    config: &ArenaConfig,
) -> ArenaLayout {
    let mut layout = ArenaLayout::default();

    for (coord, cell) in grid.iter() {
        let origin = tile_origin(coord, config.tile_width, config.tile_height);
        match cell {
            CellCode::Empty => {
                let node = renderer.create_node(FLOOR_TEXTURE);
                renderer.set_position(node, origin.x, origin.y);
                renderer.set_alpha(node, FLOOR_ALPHA);
                renderer.attach(node, DrawOrder::Front);
                layout.floor.push(node);
            }
            CellCode::Wall => {
                let entity =
                    actors::spawn_obstacle(world, renderer, ActorKind::Wall, origin, Life::Infinite);
                layout.walls.push((coord, entity));
            }
            CellCode::Destructible => {
                let entity = actors::spawn_obstacle(
                    world,
                    renderer,
                    ActorKind::Destructible,
                    origin,
                    Life::Finite(config.destructible_life),
                );
                layout.destructibles.push((coord, entity));
            }
        }
    }

    debug!(
        walls = layout.walls.len(),
        destructibles = layout.destructibles.len(),
        floor = layout.floor.len(),
        "grid_spawned"
    );
    layout
}
