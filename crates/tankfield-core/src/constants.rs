//! Simulation constants and default tuning values.
//!
//! These are defaults only. Every movement and projectile value is
//! overridable through the structs in [`crate::tuning`].

// --- Scenes ---

/// Routing name of the main menu scene.
pub const PAGE_MAIN_MENU: &str = "Main Menu";

/// Routing name of the arena scene.
pub const PAGE_GAME: &str = "Game";

// --- Timing ---

/// Host frame rate.
pub const TICK_RATE: u32 = 60;

/// Delta passed to the engine for one frame at the nominal rate.
pub const FRAME_DELTA: f64 = 1.0;

/// Default viewport of the headless host.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 720.0;

// --- Grid ---

/// Columns in the shipped level.
pub const GRID_X_COUNT: usize = 50;

/// Rows in the shipped level.
pub const GRID_Y_COUNT: usize = 50;

/// Tile width in world pixels.
pub const TILE_WIDTH: f64 = 35.0;

/// Tile height in world pixels.
pub const TILE_HEIGHT: f64 = 35.0;

/// Starting life of a destructible tile.
pub const DESTRUCTIBLE_LIFE: f64 = 100.0;

/// Alpha of decorative floor tiles.
pub const FLOOR_ALPHA: f64 = 0.2;

// --- Keyboard movement ---

pub const MAX_SPEED: f64 = 34.0;
pub const MAX_ROTATION_SPEED: f64 = 10.0;
pub const ACCELERATION: f64 = 0.2;
pub const ROTATION_ACCELERATION: f64 = 0.02;
pub const LATERAL_FRICTION: f64 = 0.95;
pub const ROTATION_DRAG: f64 = 0.95;
pub const DRAG: f64 = 0.98;

/// Rotation speed is multiplied by `(speed / MAX_SPEED) * TURN_SPEED_COUPLING`
/// while turning, so faster tanks turn harder.
pub const TURN_SPEED_COUPLING: f64 = 10.0;

/// Wall push-back is `ACCELERATION * WALL_PUSH_FACTOR`.
pub const WALL_PUSH_FACTOR: f64 = 2.0;

/// Heading nudge applied on wall contact, signed by rotation speed.
pub const WALL_ROTATION_KICK: f64 = 0.02;

// --- Pointer-seeking movement ---

pub const POINTER_MAX_SPEED: f64 = 6.0;
pub const POINTER_ACCELERATION: f64 = 1.0;
pub const POINTER_EASING: f64 = 2.0;

/// Degrees-per-second style easing factor for turning toward the pointer.
pub const POINTER_ROTATION_EASING: f64 = 75.0;

/// Sprite art faces up, so headings toward the pointer are offset by 90°.
pub const POINTER_HEADING_OFFSET_DEGREES: f64 = 90.0;

pub const POINTER_WALL_FRICTION: f64 = 1.0;

// --- Projectiles ---

pub const BULLET_LIFE: f64 = 100.0;
pub const BULLET_SPEED: f64 = 10.0;
pub const RELOAD_COOLDOWN: f64 = 10.0;

/// Life removed from a target per projectile hit.
pub const BULLET_HIT_DAMAGE: f64 = 35.0;

/// Angle between shots in multi-shot loadouts (degrees).
pub const BULLET_SPREAD: f64 = 15.0;

// --- Player ---

pub const PLAYER_SPAWN_X: f64 = 150.0;
pub const PLAYER_SPAWN_Y: f64 = 10.0;
pub const PLAYER_SCALE: f64 = 1.0;

/// Unscaled size of the tank texture.
pub const TANK_TEXTURE_WIDTH: f64 = 28.0;
pub const TANK_TEXTURE_HEIGHT: f64 = 20.0;

// --- Transitions ---

/// Default alpha change per tick unit.
pub const TRANSITION_STEP: f64 = 0.01;

/// Step of a scene descriptor's `fade_in` instance (used when leaving).
pub const FADE_IN_STEP: f64 = 0.1;

/// Step of a scene descriptor's `fade_out` instance (used when entering).
pub const FADE_OUT_STEP: f64 = TRANSITION_STEP;

/// Overlay colour.
pub const TRANSITION_COLOR: u32 = 0x000000;

// --- Tire marks ---

pub const TIRE_MARK_ALPHA: f64 = 0.8;
pub const TIRE_MARK_FADE: f64 = 0.01;

/// Offset of each track from the tank centre, as a fraction of its width.
pub const TIRE_MARK_OFFSET: f64 = 0.2;

// --- Level generation ---

pub const GENERATED_WALLS: usize = 50;
pub const GENERATED_DESTRUCTIBLES: usize = 25;
