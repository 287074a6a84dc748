//! The game scene: a tank on a tile grid, shooting at obstacles.

use std::path::PathBuf;

use hecs::{Entity, World};
use tracing::{debug, info};

use tankfield_core::commands::InputEvent;
use tankfield_core::components::{Body, Heading, Visual};
use tankfield_core::constants::PAGE_MAIN_MENU;
use tankfield_core::enums::{ControlKey, ControlScheme, TankType};
use tankfield_core::events::ProjectileEvent;
use tankfield_core::level::LevelData;
use tankfield_core::state::{ArenaSnapshot, PlayerView};
use tankfield_core::tuning::GameConfig;
use tankfield_core::types::{Position, SimTime, Velocity};

use crate::actors;
use crate::error::SceneError;
use crate::input::{DisplayTransform, InputState};
use crate::level::{self, ArenaLayout, Grid};
use crate::render::Renderer;
use crate::scene::{Scene, SceneCommand, SceneContext};
use crate::systems::keyboard_movement::KeyboardController;
use crate::systems::pointer_movement::PointerController;
use crate::systems::projectiles::ProjectileSystem;
use crate::systems::tire_marks::TireMarks;

/// Button id that leaves the arena for the main menu.
pub const BACK_BUTTON: &str = "back";

/// Where the arena reads its grid from on every `init`.
#[derive(Debug, Clone)]
pub enum LevelSource {
    Data(LevelData),
    File(PathBuf),
}

/// One shot of a fire pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Degrees added to the tank heading.
    pub offset: f64,
    pub triggers_reload: bool,
    pub damage: f64,
}

/// Shots fired per trigger pull for each loadout. The last shot reloads.
pub fn fire_pattern(tank: TankType, spread: f64) -> Vec<Shot> {
    let shot = |offset, triggers_reload, damage| Shot {
        offset,
        triggers_reload,
        damage,
    };
    match tank {
        TankType::Twin => vec![shot(-spread, false, 10.0), shot(spread, true, 10.0)],
        TankType::Heavy => vec![shot(0.0, true, 25.0)],
        TankType::Spread => vec![
            shot(0.0, false, 20.0),
            shot(-spread, false, 20.0),
            shot(spread, true, 20.0),
        ],
    }
}

pub struct ArenaScene {
    source: LevelSource,
    config: GameConfig,
    grid: Option<Grid>,
    world: World,
    layout: ArenaLayout,
    player: Option<Entity>,
    keyboard: KeyboardController,
    pointer: PointerController,
    projectiles: ProjectileSystem,
    tire_marks: TireMarks,
    input: InputState,
    tank: TankType,
    display: DisplayTransform,
    time: SimTime,
    last_events: Vec<ProjectileEvent>,
}

impl ArenaScene {
    pub fn new(source: LevelSource, config: GameConfig) -> Self {
        Self {
            source,
            config,
            grid: None,
            world: World::new(),
            layout: ArenaLayout::default(),
            player: None,
            keyboard: KeyboardController::new(config.keyboard),
            pointer: PointerController::new(config.pointer),
            projectiles: ProjectileSystem::new(config.projectiles),
            tire_marks: TireMarks::new(config.arena.tire_mark_fade),
            input: InputState::default(),
            tank: TankType::default(),
            display: DisplayTransform::default(),
            time: SimTime::default(),
            last_events: Vec::new(),
        }
    }

    /// Arena size in world units. Zero before the first `init`.
    pub fn world_size(&self) -> (f64, f64) {
        self.grid.as_ref().map_or((0.0, 0.0), |g| {
            g.pixel_size(self.config.arena.tile_width, self.config.arena.tile_height)
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn tank(&self) -> TankType {
        self.tank
    }

    /// Projectile events from the most recent tick.
    pub fn last_events(&self) -> &[ProjectileEvent] {
        &self.last_events
    }

    fn load_grid(&self) -> Result<Grid, SceneError> {
        let expected = self.config.arena.grid_size;
        let grid = match &self.source {
            LevelSource::Data(data) => Grid::from_level(data, expected)?,
            LevelSource::File(path) => level::load_level_file(path, expected)?,
        };
        Ok(grid)
    }

    fn change_tank(&mut self, renderer: &mut dyn Renderer) {
        self.tank = self.tank.next();
        if let Some(player) = self.player {
            if let Ok(visual) = self.world.get::<&Visual>(player) {
                renderer.set_tint(visual.0, self.tank.tint());
            }
        }
        debug!(tank = ?self.tank, "tank_changed");
    }

    fn fire(&mut self, renderer: &mut dyn Renderer) {
        let Some(player) = self.player else {
            return;
        };
        let Ok((pos, heading, body)) = self
            .world
            .query_one_mut::<(&Position, &Heading, &Body)>(player)
            .map(|(p, h, b)| (*p, *h, *b))
        else {
            return;
        };
        let origin = Position::from(body.center(&pos));
        let heading_degrees = heading.0.to_degrees();
        for shot in fire_pattern(self.tank, self.config.arena.bullet_spread) {
            let fired = self.projectiles.fire(
                &mut self.world,
                renderer,
                origin,
                heading_degrees + shot.offset,
                shot.triggers_reload,
                shot.damage,
            );
            if fired.is_none() {
                break;
            }
        }
    }

    fn lay_tire_marks(&mut self, renderer: &mut dyn Renderer) {
        let Some(player) = self.player else {
            return;
        };
        let Ok((pos, vel, heading, body)) = self
            .world
            .query_one_mut::<(&Position, &Velocity, &Heading, &Body)>(player)
            .map(|(p, v, h, b)| (*p, *v, *h, *b))
        else {
            return;
        };
        if vel.speed() > 0.0 {
            let center = Position::from(body.center(&pos));
            self.tire_marks.lay(renderer, center, heading.0, body.width);
        }
    }
}

impl Scene for ArenaScene {
    fn init(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        let grid = self.load_grid()?;

        self.world.clear();
        self.keyboard = KeyboardController::new(self.config.keyboard);
        self.pointer = PointerController::new(self.config.pointer);
        self.projectiles = ProjectileSystem::new(self.config.projectiles);
        self.tire_marks = TireMarks::new(self.config.arena.tire_mark_fade);
        self.tank = TankType::default();
        self.time = SimTime::default();
        self.last_events.clear();

        self.layout = level::spawn_grid(&grid, &mut self.world, ctx.renderer, &self.config.arena);
        self.grid = Some(grid);

        let player = actors::spawn_player(
            &mut self.world,
            ctx.renderer,
            self.config.arena.spawn_point,
            self.tank,
            self.config.arena.player_scale,
        );
        match self.config.arena.control {
            ControlScheme::Keyboard => self.keyboard.register(player),
            ControlScheme::Pointer => self.pointer.register(player),
        }
        self.player = Some(player);

        self.input.start();
        self.update_display(ctx);

        let (width, height) = self.world_size();
        info!(
            width,
            height,
            walls = self.layout.walls.len(),
            destructibles = self.layout.destructibles.len(),
            control = ?self.config.arena.control,
            "arena_ready"
        );
        Ok(())
    }

    fn handle_input(&mut self, event: &InputEvent) {
        self.input.apply(event);
    }

    fn scene_update(&mut self, delta: f64, ctx: &mut SceneContext<'_>) -> SceneCommand {
        self.time.advance(delta);
        let world_size = self.world_size();

        let mut command = SceneCommand::None;
        if self.input.take_buttons().iter().any(|b| b == BACK_BUTTON) {
            command = SceneCommand::SwitchTo(PAGE_MAIN_MENU.to_string());
        }
        for key in self.input.keyboard.take_presses() {
            if key == ControlKey::ChangeTank {
                self.change_tank(ctx.renderer);
            }
        }

        self.keyboard
            .update(&mut self.world, &self.input.keyboard, delta, world_size);
        let pointer = self
            .input
            .pointer
            .position()
            .map(|client| self.display.to_world(&client));
        self.pointer.update(&mut self.world, pointer, delta);

        if self.input.keyboard.is_down(ControlKey::Fire) {
            self.fire(ctx.renderer);
        }

        self.last_events = self
            .projectiles
            .update(&mut self.world, ctx.renderer, delta, world_size);
        if !self.last_events.is_empty() {
            self.layout.prune(&self.world);
        }

        self.lay_tire_marks(ctx.renderer);
        self.tire_marks.update(ctx.renderer, delta);
        actors::sync_visuals(&self.world, ctx.renderer);

        command
    }

    fn update_display(&mut self, ctx: &mut SceneContext<'_>) {
        let (width, _) = self.world_size();
        let (viewport_width, _) = ctx.renderer.viewport();
        self.display = DisplayTransform::fit(viewport_width, width, ctx.display_scale);
        ctx.renderer.set_stage_transform(
            self.display.scale,
            self.display.offset_x,
            self.display.offset_y,
        );
    }

    fn close(&mut self, renderer: &mut dyn Renderer) {
        self.input.stop();
        self.keyboard.release_all();
        self.pointer.release_all();
        self.projectiles.clear(&mut self.world, renderer);
        self.tire_marks.clear(renderer);
        actors::despawn_all(&mut self.world, renderer);
        self.layout.release_floor(renderer);
        self.layout = ArenaLayout::default();
        self.player = None;
        debug!("arena_closed");
    }

    fn snapshot(&self) -> Option<ArenaSnapshot> {
        let player = self.player.and_then(|entity| {
            let mut query = self
                .world
                .query_one::<(&Position, &Velocity, &Heading)>(entity)
                .ok()?;
            query.get().map(|(pos, vel, heading)| PlayerView {
                position: *pos,
                velocity: *vel,
                heading: heading.0,
                tank: self.tank,
            })
        });

        Some(ArenaSnapshot {
            time: self.time,
            scene_state: Default::default(),
            player,
            walls: self.layout.walls.len(),
            destructibles: self.layout.destructibles.len(),
            projectiles: self.projectiles.projectiles().len(),
            tire_marks: self.tire_marks.len(),
            reload_remaining: self.projectiles.cooldown().max(0.0),
        })
    }
}
