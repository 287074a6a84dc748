//! Seeded level generation.
//!
//! Scatters walls and destructibles over distinct empty cells of an open
//! grid. The same seed and parameters always give the same level.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tankfield_core::constants::{
    GENERATED_DESTRUCTIBLES, GENERATED_WALLS, GRID_X_COUNT, GRID_Y_COUNT, TANK_TEXTURE_HEIGHT,
    TANK_TEXTURE_WIDTH,
};
use tankfield_core::enums::CellCode;
use tankfield_core::level::{LevelData, TileCoord};
use tankfield_core::tuning::ArenaConfig;

/// Parameters for [`generate_level`].
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGenConfig {
    pub seed: u64,
    pub columns: usize,
    pub rows: usize,
    pub walls: usize,
    pub destructibles: usize,
    /// Cells that must stay empty (the tiles under the spawned player).
    pub keep_clear: Vec<TileCoord>,
}

impl Default for LevelGenConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            columns: GRID_X_COUNT,
            rows: GRID_Y_COUNT,
            walls: GENERATED_WALLS,
            destructibles: GENERATED_DESTRUCTIBLES,
            keep_clear: player_footprint(&ArenaConfig::default()),
        }
    }
}

/// Tiles touched by the player at its spawn point.
///
/// Covers the scaled tank body and its collision circle (radius = half the
/// body width), so no obstacle overlaps the tank on the first tick.
pub fn player_footprint(arena: &ArenaConfig) -> Vec<TileCoord> {
    let width = TANK_TEXTURE_WIDTH * arena.player_scale;
    let height = TANK_TEXTURE_HEIGHT * arena.player_scale;
    let half_w = width / 2.0;
    let half_h = (height / 2.0).max(half_w);
    let spawn = arena.spawn_point;

    let span = |low: f64, high: f64, tile: f64| {
        let first = (low.max(0.0) / tile).floor() as usize;
        let last = ((high / tile).ceil() as usize).saturating_sub(1);
        first..=last.max(first)
    };
    let cols = span(spawn.x - half_w, spawn.x + half_w, arena.tile_width);
    span(spawn.y - half_h, spawn.y + half_h, arena.tile_height)
        .flat_map(|row| cols.clone().map(move |col| TileCoord::new(row, col)))
        .collect()
}

/// Generate a level. Counts larger than the free space are truncated,
/// walls first.
pub fn generate_level(config: &LevelGenConfig) -> LevelData {
    let mut cells = vec![vec![CellCode::Empty; config.columns]; config.rows];

    let mut free: Vec<TileCoord> = (0..config.rows)
        .flat_map(|row| (0..config.columns).map(move |col| TileCoord::new(row, col)))
        .filter(|coord| !config.keep_clear.contains(coord))
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    free.shuffle(&mut rng);

    let walls = config.walls.min(free.len());
    let destructibles = config.destructibles.min(free.len() - walls);
    for coord in &free[..walls] {
        cells[coord.row][coord.col] = CellCode::Wall;
    }
    for coord in &free[walls..walls + destructibles] {
        cells[coord.row][coord.col] = CellCode::Destructible;
    }

    LevelData::from_cells(&cells)
}
