//! Tests for transitions, the scene lifecycle, controllers, projectiles,
//! level loading and the arena scene.

use std::cell::RefCell;
use std::rc::Rc;

use hecs::World;

use tankfield_core::commands::InputEvent;
use tankfield_core::components::{Body, CollisionTarget, Heading, Life};
use tankfield_core::constants::{PAGE_GAME, PAGE_MAIN_MENU};
use tankfield_core::enums::*;
use tankfield_core::events::ProjectileEvent;
use tankfield_core::level::{LevelData, TileCoord};
use tankfield_core::tuning::*;
use tankfield_core::types::{Position, Rect, Velocity};

use crate::actors;
use crate::engine::{SceneDescriptor, SceneEngine};
use crate::error::{EngineError, LevelError, SceneError};
use crate::input::{display_scale, DisplayTransform, InputState, KeyboardState, PointerTracker};
use crate::level::{self, Grid};
use crate::render::{HeadlessRenderer, Renderer};
use crate::scene::{Scene, SceneCommand, SceneContext, SceneRunner};
use crate::scenes::{ArenaScene, LevelSource, MenuScene};
use crate::systems::collision;
use crate::systems::keyboard_movement::KeyboardController;
use crate::systems::pointer_movement::{rotate_towards, PointerController};
use crate::systems::projectiles::ProjectileSystem;
use crate::systems::tire_marks::TireMarks;
use crate::transition::FadeTransition;

fn renderer() -> HeadlessRenderer {
    HeadlessRenderer::new(1000.0, 1000.0)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn keys_holding(held: &[&str]) -> KeyboardState {
    let mut keys = KeyboardState::default();
    keys.start();
    for key in held {
        keys.key_down(key);
    }
    keys
}

fn kinematics(world: &World, entity: hecs::Entity) -> (Position, Velocity, f64) {
    let mut query = world
        .query_one::<(&Position, &Velocity, &Heading)>(entity)
        .unwrap();
    let (pos, vel, heading) = query.get().unwrap();
    (*pos, *vel, heading.0)
}

/// 10x10 open arena with a wall at (0,1) and a destructible at (1,0).
fn small_level() -> LevelData {
    let mut data = vec![vec![0; 10]; 10];
    data[0][1] = 1;
    data[1][0] = 2;
    LevelData { data }
}

fn arena_config() -> GameConfig {
    GameConfig {
        arena: ArenaConfig {
            grid_size: None,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[derive(Default)]
struct Counters {
    inits: u32,
    closes: u32,
    updates: u32,
}

/// Scene that records its lifecycle calls and owns one node.
struct ProbeScene {
    counters: Rc<RefCell<Counters>>,
    node: Option<tankfield_core::types::NodeId>,
    command: SceneCommand,
}

impl ProbeScene {
    fn new(counters: Rc<RefCell<Counters>>) -> Self {
        Self {
            counters,
            node: None,
            command: SceneCommand::None,
        }
    }
}

impl Scene for ProbeScene {
    fn init(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        self.counters.borrow_mut().inits += 1;
        let node = ctx.renderer.create_node("probe");
        self.node = Some(node);
        Ok(())
    }

    fn scene_update(&mut self, _delta: f64, _ctx: &mut SceneContext<'_>) -> SceneCommand {
        self.counters.borrow_mut().updates += 1;
        std::mem::take(&mut self.command)
    }

    fn update_display(&mut self, _ctx: &mut SceneContext<'_>) {}

    fn close(&mut self, renderer: &mut dyn Renderer) {
        self.counters.borrow_mut().closes += 1;
        if let Some(node) = self.node.take() {
            renderer.destroy_node(node);
        }
    }
}

// ---- Transitions ----

#[test]
fn test_fade_out_runs_to_zero_and_stays() {
    let mut r = renderer();
    let mut fade = FadeTransition::new(0.25);
    fade.init(TransitionKind::FadeOut, &mut r);
    assert_eq!(fade.alpha(), 1.0);

    let statuses: Vec<_> = (0..4).map(|_| fade.update(1.0, &mut r)).collect();
    assert_eq!(
        statuses,
        vec![
            TransitionStatus::Running,
            TransitionStatus::Running,
            TransitionStatus::Running,
            TransitionStatus::Completed,
        ]
    );

    for _ in 0..5 {
        assert_eq!(fade.update(1.0, &mut r), TransitionStatus::Completed);
        assert_eq!(fade.alpha(), 0.0, "alpha must not go below zero");
    }
    let overlay = fade.overlay().unwrap();
    assert_eq!(r.node(overlay).unwrap().alpha, 0.0);
}

#[test]
fn test_fade_in_clamps_at_one() {
    let mut r = renderer();
    let mut fade = FadeTransition::new(0.4);
    fade.init(TransitionKind::FadeIn, &mut r);
    assert_eq!(fade.alpha(), 0.0);

    assert_eq!(fade.update(1.0, &mut r), TransitionStatus::Running);
    assert_eq!(fade.update(1.0, &mut r), TransitionStatus::Running);
    assert_eq!(fade.update(1.0, &mut r), TransitionStatus::Completed);
    assert_eq!(fade.alpha(), 1.0);
}

#[test]
fn test_transition_idle_before_init() {
    let mut r = renderer();
    let mut fade = FadeTransition::default();
    assert_eq!(fade.update(1.0, &mut r), TransitionStatus::Idle);
    assert_eq!(r.live_nodes(), 0);
}

#[test]
fn test_transition_overlay_covers_viewport_and_releases_once() {
    let mut r = renderer();
    let mut fade = FadeTransition::default();
    fade.init(TransitionKind::FadeOut, &mut r);
    let overlay = fade.overlay().unwrap();
    let node = r.node(overlay).unwrap();
    assert_eq!((node.width, node.height), (1000.0, 1000.0));
    assert_eq!(r.stage_order().last(), Some(&overlay), "overlay on top");

    r.set_viewport(800.0, 600.0);
    fade.resize(&mut r);
    assert_eq!(r.node_size(overlay), (800.0, 600.0));

    fade.release(&mut r);
    fade.release(&mut r);
    assert_eq!(r.live_nodes(), 0);
    assert_eq!(r.invalid_destroys(), 0);
}

#[test]
fn test_transition_reinit_replaces_overlay() {
    let mut r = renderer();
    let mut fade = FadeTransition::default();
    fade.init(TransitionKind::FadeOut, &mut r);
    fade.init(TransitionKind::FadeIn, &mut r);
    assert_eq!(r.live_nodes(), 1);
    assert_eq!(fade.kind(), Some(TransitionKind::FadeIn));
}

// ---- Scene state machine ----

fn probe_runner(counters: Rc<RefCell<Counters>>) -> SceneRunner {
    SceneRunner::new(
        0,
        "probe",
        Box::new(ProbeScene::new(counters)),
        FadeTransition::new(0.5),
        FadeTransition::new(0.5),
    )
}

#[test]
fn test_lifecycle_load_process_finalize_done() {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let mut runner = probe_runner(counters.clone());
    let mut r = renderer();
    let mut ctx = SceneContext {
        renderer: &mut r,
        display_scale: 1.0,
    };

    runner.setup(&mut ctx).unwrap();
    assert_eq!(runner.state(), SceneState::Load);
    assert_eq!(runner.overlay_alphas(), (1.0, 0.0));

    let (_, change) = runner.update(1.0, &mut ctx);
    assert_eq!(change, None);
    let (_, change) = runner.update(1.0, &mut ctx);
    assert_eq!(change, Some((SceneState::Load, SceneState::Process)));

    // Process stays put until finalized externally.
    for _ in 0..10 {
        runner.update(1.0, &mut ctx);
    }
    assert_eq!(runner.state(), SceneState::Process);

    runner.set_finalizing();
    assert_eq!(runner.state(), SceneState::Finalize);
    runner.update(1.0, &mut ctx);
    let (_, change) = runner.update(1.0, &mut ctx);
    assert_eq!(change, Some((SceneState::Finalize, SceneState::Done)));

    runner.set_finalizing();
    assert_eq!(runner.state(), SceneState::Done, "done is terminal");

    // Gameplay ran on every tick regardless of state.
    assert_eq!(counters.borrow().updates, 14);
}

#[test]
fn test_runner_close_runs_once_per_activation() {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let mut runner = probe_runner(counters.clone());
    let mut r = renderer();
    {
        let mut ctx = SceneContext {
            renderer: &mut r,
            display_scale: 1.0,
        };
        runner.setup(&mut ctx).unwrap();
    }
    runner.close(&mut r);
    runner.close(&mut r);
    assert_eq!(counters.borrow().closes, 1);
    assert_eq!(r.live_nodes(), 0, "scene node and both overlays released");
    assert_eq!(r.invalid_destroys(), 0);
}

// ---- Input ----

#[test]
fn test_keyboard_ignores_events_until_started() {
    let mut keys = KeyboardState::default();
    keys.key_down("ArrowUp");
    assert!(!keys.is_down(ControlKey::Accelerate));

    keys.start();
    keys.key_down("w");
    assert!(keys.is_down(ControlKey::Accelerate));
    keys.key_up("ArrowUp");
    assert!(!keys.is_down(ControlKey::Accelerate));
}

#[test]
fn test_keyboard_stop_clears_held_keys() {
    let mut keys = keys_holding(&["ArrowLeft", " "]);
    assert_eq!(keys.take_presses(), vec![ControlKey::Left, ControlKey::Fire]);
    keys.stop();
    keys.start();
    assert!(!keys.is_down(ControlKey::Left));
    assert!(!keys.is_down(ControlKey::Fire));
}

#[test]
fn test_key_repeat_is_one_press() {
    let mut keys = keys_holding(&["t", "t", "t"]);
    assert_eq!(keys.take_presses(), vec![ControlKey::ChangeTank]);
    assert!(keys.take_presses().is_empty());
}

#[test]
fn test_pointer_tracker_lifecycle() {
    let mut pointer = PointerTracker::default();
    pointer.move_to(5.0, 5.0);
    assert_eq!(pointer.position(), None);
    pointer.start();
    pointer.move_to(5.0, 6.0);
    pointer.move_to(7.0, 8.0);
    assert_eq!(pointer.position(), Some(Position::new(7.0, 8.0)));
    pointer.stop();
    assert_eq!(pointer.position(), None);
}

#[test]
fn test_input_state_routes_events() {
    let mut input = InputState::default();
    input.apply(&InputEvent::button("play"));
    assert!(input.take_buttons().is_empty());

    input.start();
    input.apply(&InputEvent::key_down("d"));
    input.apply(&InputEvent::PointerMove { x: 1.0, y: 2.0 });
    input.apply(&InputEvent::button("play"));
    assert!(input.keyboard.is_down(ControlKey::Right));
    assert_eq!(input.pointer.position(), Some(Position::new(1.0, 2.0)));
    assert_eq!(input.take_buttons(), vec!["play".to_string()]);
}

#[test]
fn test_display_scale_and_padding() {
    let scale = display_scale((1000.0, 500.0), 1750.0, 1750.0);
    assert!(approx(scale, 500.0 / 1750.0));

    let display = DisplayTransform::fit(1000.0, 1750.0, scale);
    assert!(approx(display.offset_x, 250.0));

    let world = Position::new(350.0, 700.0);
    let back = display.to_world(&display.to_client(&world));
    assert!(approx(back.x, world.x) && approx(back.y, world.y));
}

// ---- Keyboard controller ----

#[test]
fn test_keyboard_accelerates_along_heading() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(100.0, 100.0), TankType::Twin, 1.0);
    let mut controller = KeyboardController::default();
    controller.register(tank);

    controller.update(&mut world, &keys_holding(&["ArrowUp"]), 1.0, (1000.0, 1000.0));

    let (pos, vel, _) = kinematics(&world, tank);
    let expected = 0.2 * 0.95 * 0.98;
    assert!(approx(vel.x, expected), "vx = {}", vel.x);
    assert!(approx(vel.y, 0.0));
    assert!(approx(pos.x, 100.0 + expected));
}

#[test]
fn test_keyboard_brake_reverses() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(100.0, 100.0), TankType::Twin, 1.0);
    let mut controller = KeyboardController::default();
    controller.register(tank);

    controller.update(&mut world, &keys_holding(&["ArrowDown"]), 1.0, (1000.0, 1000.0));
    let (pos, vel, _) = kinematics(&world, tank);
    assert!(vel.x < 0.0);
    assert!(pos.x < 100.0);
}

#[test]
fn test_keyboard_turning_needs_speed() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(100.0, 100.0), TankType::Twin, 1.0);
    let mut controller = KeyboardController::default();
    controller.register(tank);

    controller.update(&mut world, &keys_holding(&["ArrowLeft"]), 1.0, (1000.0, 1000.0));
    assert_eq!(controller.rotation_speed(), 0.0);
    assert_eq!(kinematics(&world, tank).2, 0.0);

    world.get::<&mut Velocity>(tank).unwrap().x = 17.0;
    controller.update(&mut world, &keys_holding(&["ArrowLeft"]), 1.0, (1000.0, 1000.0));
    // (0 - 0.02) * (17 / 34) * 10, then rotation drag.
    let expected = -0.02 * 0.5 * 10.0 * 0.95;
    assert!(approx(controller.rotation_speed(), expected));
    assert!(approx(kinematics(&world, tank).2, expected));
}

#[test]
fn test_keyboard_clamps_velocity_and_position() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(980.0, 500.0), TankType::Twin, 1.0);
    world.get::<&mut Velocity>(tank).unwrap().x = 100.0;
    let mut controller = KeyboardController::default();
    controller.register(tank);

    controller.update(&mut world, &KeyboardState::default(), 1.0, (1000.0, 1000.0));

    let (pos, vel, _) = kinematics(&world, tank);
    assert_eq!(vel.x, 34.0);
    assert_eq!(pos.x, 1000.0 - 14.0, "clamped by half width");
}

#[test]
fn test_keyboard_wall_pushes_back() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(100.0, 100.0), TankType::Twin, 1.0);
    actors::spawn_obstacle(&mut world, &mut r, ActorKind::Wall, Position::new(110.0, 90.0), Life::Infinite);
    let mut controller = KeyboardController::default();
    controller.register(tank);

    controller.update(&mut world, &KeyboardState::default(), 1.0, (1000.0, 1000.0));

    let angle = (107.5_f64 - 100.0).atan2(127.5 - 100.0);
    let (_, vel, heading) = kinematics(&world, tank);
    assert!(approx(vel.x, -angle.cos() * 0.4 * 0.98), "vx = {}", vel.x);
    assert!(approx(vel.y, -angle.sin() * 0.4 * 0.98));
    assert_eq!(heading, 0.0, "no kick without rotation speed");
}

#[test]
fn test_keyboard_rotation_speed_clamped() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(500.0, 500.0), TankType::Twin, 1.0);
    let mut controller = KeyboardController::new(KeyboardTuning {
        max_rotation_speed: 0.05,
        ..Default::default()
    });
    controller.register(tank);

    for _ in 0..3 {
        world.get::<&mut Velocity>(tank).unwrap().x = 34.0;
        let before = kinematics(&world, tank).2;
        controller.update(&mut world, &keys_holding(&["ArrowRight"]), 1.0, (1000.0, 1000.0));
        // (rs + 0.02) * (34 / 34) * 10 exceeds the cap, then rotation drag.
        assert!(approx(controller.rotation_speed(), 0.05 * 0.95), "rs = {}", controller.rotation_speed());
        assert!(approx(kinematics(&world, tank).2 - before, 0.05 * 0.95));
    }

    controller.release_all();
    controller.register(tank);
    world.get::<&mut Velocity>(tank).unwrap().x = 34.0;
    controller.update(&mut world, &keys_holding(&["ArrowLeft"]), 1.0, (1000.0, 1000.0));
    assert!(approx(controller.rotation_speed(), -0.05 * 0.95));
}

#[test]
fn test_keyboard_wall_contact_kicks_heading() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(100.0, 100.0), TankType::Twin, 1.0);
    actors::spawn_obstacle(&mut world, &mut r, ActorKind::Wall, Position::new(110.0, 90.0), Life::Infinite);
    world.get::<&mut Velocity>(tank).unwrap().x = 17.0;
    let mut controller = KeyboardController::default();
    controller.register(tank);

    controller.update(&mut world, &keys_holding(&["ArrowRight"]), 1.0, (1000.0, 1000.0));

    // 0.02 * (17 / 34) * 10 = 0.1, dragged to 0.095; the contact adds one kick.
    let rotation = controller.rotation_speed();
    assert!(approx(rotation, 0.1 * 0.95));
    let heading = kinematics(&world, tank).2;
    assert!(approx(heading - rotation, 0.02), "kick = {}", heading - rotation);
}

#[test]
fn test_keyboard_release_all_stops_updates() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(100.0, 100.0), TankType::Twin, 1.0);
    let mut controller = KeyboardController::default();
    controller.update(&mut world, &keys_holding(&["ArrowUp"]), 1.0, (1000.0, 1000.0));

    controller.register(tank);
    controller.release_all();
    assert!(controller.registered().is_empty());
    controller.update(&mut world, &keys_holding(&["ArrowUp"]), 1.0, (1000.0, 1000.0));
    assert_eq!(kinematics(&world, tank).0, Position::new(100.0, 100.0));
}

#[test]
fn test_keyboard_drops_despawned_actor() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(100.0, 100.0), TankType::Twin, 1.0);
    let mut controller = KeyboardController::default();
    controller.register(tank);
    actors::despawn(&mut world, &mut r, tank);

    controller.update(&mut world, &keys_holding(&["ArrowUp"]), 1.0, (1000.0, 1000.0));
    assert!(controller.registered().is_empty());
}

// ---- Pointer controller ----

#[test]
fn test_pointer_moves_toward_target_and_eases_heading() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(0.0, 0.0), TankType::Twin, 1.0);
    let mut controller = PointerController::default();
    controller.register(tank);

    controller.update(&mut world, Some(Position::new(100.0, 0.0)), 1.0);

    let (pos, vel, heading) = kinematics(&world, tank);
    assert!(approx(vel.x, 2.0));
    assert!(approx(pos.x, 2.0));
    assert!(approx(heading.to_degrees(), 90.0 * 75.0 / 1000.0));
}

#[test]
fn test_pointer_speed_capped() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(0.0, 0.0), TankType::Twin, 1.0);
    let mut controller = PointerController::default();
    controller.register(tank);

    for _ in 0..10 {
        controller.update(&mut world, Some(Position::new(900.0, 0.0)), 1.0);
    }
    assert!(approx(kinematics(&world, tank).1.speed(), 6.0));
}

#[test]
fn test_pointer_skips_when_close_or_unknown() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(0.0, 0.0), TankType::Twin, 1.0);
    let mut controller = PointerController::default();
    controller.register(tank);

    controller.update(&mut world, None, 1.0);
    controller.update(&mut world, Some(Position::new(11.0, 0.0)), 1.0);

    let (pos, vel, heading) = kinematics(&world, tank);
    assert_eq!(pos, Position::new(0.0, 0.0));
    assert_eq!(vel, Velocity::default());
    assert_eq!(heading, 0.0);
}

#[test]
fn test_pointer_friction_blocks_movement_into_wall() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(0.0, 0.0), TankType::Twin, 1.0);
    actors::spawn_obstacle(&mut world, &mut r, ActorKind::Wall, Position::new(10.0, -17.0), Life::Infinite);
    let mut controller = PointerController::default();
    controller.register(tank);

    controller.update(&mut world, Some(Position::new(100.0, 0.0)), 1.0);
    assert!(approx(kinematics(&world, tank).0.x, 0.0));
}

#[test]
fn test_rotate_towards_takes_short_arc() {
    let tuning = PointerTuning::default();
    let mut heading = Heading(350.0_f64.to_radians());
    // Bearing 0 plus the 90 degree offset: the short way from 350 is +100.
    rotate_towards(&mut heading, &Position::new(0.0, 0.0), &Position::new(50.0, 0.0), 1.0, &tuning);
    assert!(approx(heading.0.to_degrees(), 350.0 + 100.0 * 0.075));
}

#[test]
fn test_friction_response_keeps_sliding_component() {
    let targets = vec![(
        hecs::Entity::DANGLING,
        Rect::new(10.0, -50.0, 20.0, 100.0),
    )];
    let moved = collision::friction_response(
        glam::DVec2::new(0.0, 0.0),
        14.0,
        glam::DVec2::new(2.0, 3.0),
        &targets,
        1.0,
    );
    assert!(approx(moved.x, 0.0));
    assert!(approx(moved.y, 3.0));
}

// ---- Projectiles ----

#[test]
fn test_cooldown_gates_fire() {
    let mut r = renderer();
    let mut world = World::new();
    let mut system = ProjectileSystem::default();
    let at = Position::new(500.0, 500.0);
    let size = (1.0e6, 1.0e6);

    assert!(system.fire(&mut world, &mut r, at, 0.0, true, 10.0).is_some());
    assert!(
        system.fire(&mut world, &mut r, at, 0.0, true, 10.0).is_none(),
        "second shot while reloading"
    );

    system.update(&mut world, &mut r, 5.0, size);
    assert!(system.fire(&mut world, &mut r, at, 0.0, true, 10.0).is_none());
    system.update(&mut world, &mut r, 5.0, size);
    assert!(
        system.fire(&mut world, &mut r, at, 0.0, true, 10.0).is_some(),
        "cumulative delta reached the reload time"
    );
}

#[test]
fn test_cooldown_keeps_decreasing_below_zero() {
    let mut r = renderer();
    let mut world = World::new();
    let mut system = ProjectileSystem::default();
    system.update(&mut world, &mut r, 3.0, (100.0, 100.0));
    assert_eq!(system.cooldown(), -3.0);
}

#[test]
fn test_non_reload_shots_do_not_gate() {
    let mut r = renderer();
    let mut world = World::new();
    let mut system = ProjectileSystem::default();
    let at = Position::new(50.0, 50.0);
    for _ in 0..3 {
        assert!(system.fire(&mut world, &mut r, at, 0.0, false, 10.0).is_some());
    }
    assert_eq!(system.projectiles().len(), 3);
}

#[test]
fn test_projectile_expires_exactly_at_life() {
    let mut r = renderer();
    let mut world = World::new();
    let mut system = ProjectileSystem::default();
    let size = (1.0e6, 1.0e6);
    system
        .fire(&mut world, &mut r, Position::new(500.0, 500.0), 0.0, false, 0.0)
        .unwrap();

    for tick in 1..100 {
        let events = system.update(&mut world, &mut r, 1.0, size);
        assert!(events.is_empty(), "removed early at tick {tick}");
        assert_eq!(system.projectiles().len(), 1);
    }
    let events = system.update(&mut world, &mut r, 1.0, size);
    assert!(matches!(events[..], [ProjectileEvent::ProjectileExpired { .. }]));
    assert!(system.projectiles().is_empty());
    assert_eq!(r.count_texture(actors::BULLET_TEXTURE), 0);
}

#[test]
fn test_projectile_moves_by_velocity_times_delta() {
    let mut r = renderer();
    let mut world = World::new();
    let mut system = ProjectileSystem::default();
    let bullet = system
        .fire(&mut world, &mut r, Position::new(100.0, 100.0), 90.0, false, 0.0)
        .unwrap();
    system.update(&mut world, &mut r, 0.5, (1000.0, 1000.0));
    let (pos, _, _) = kinematics(&world, bullet);
    assert!(approx(pos.x, 100.0));
    assert!(approx(pos.y, 105.0));
}

#[test]
fn test_projectile_hit_applies_fixed_damage_once() {
    let mut r = renderer();
    let mut world = World::new();
    let hay = actors::spawn_obstacle(
        &mut world,
        &mut r,
        ActorKind::Destructible,
        Position::new(100.0, 100.0),
        Life::Finite(100.0),
    );
    let mut system = ProjectileSystem::default();
    let bullet = system
        .fire(&mut world, &mut r, Position::new(90.0, 117.0), 0.0, true, 10.0)
        .unwrap();

    let events = system.update(&mut world, &mut r, 1.0, (1000.0, 1000.0));

    assert_eq!(*world.get::<&Life>(hay).unwrap(), Life::Finite(65.0));
    assert!(!world.contains(bullet), "projectile zeroed on the hit tick");
    assert_eq!(
        events,
        vec![
            ProjectileEvent::TargetHit {
                kind: ActorKind::Destructible,
                position: Position::new(100.0, 100.0),
                remaining: 65.0,
            },
            ProjectileEvent::ProjectileExpired {
                position: Position::new(100.0, 117.0),
            },
        ]
    );

    system.update(&mut world, &mut r, 1.0, (1000.0, 1000.0));
    assert_eq!(*world.get::<&Life>(hay).unwrap(), Life::Finite(65.0));
}

#[test]
fn test_projectile_damage_policy_from_projectile() {
    let mut r = renderer();
    let mut world = World::new();
    let hay = actors::spawn_obstacle(
        &mut world,
        &mut r,
        ActorKind::Destructible,
        Position::new(100.0, 100.0),
        Life::Finite(100.0),
    );
    let mut system = ProjectileSystem::new(ProjectileTuning {
        hit_damage: HitDamage::FromProjectile,
        ..Default::default()
    });
    system.fire(&mut world, &mut r, Position::new(90.0, 117.0), 0.0, false, 25.0);
    system.update(&mut world, &mut r, 1.0, (1000.0, 1000.0));
    assert_eq!(*world.get::<&Life>(hay).unwrap(), Life::Finite(75.0));
}

#[test]
fn test_destructible_destroyed_after_three_hits() {
    let mut r = renderer();
    let mut world = World::new();
    let hay = actors::spawn_obstacle(
        &mut world,
        &mut r,
        ActorKind::Destructible,
        Position::new(100.0, 100.0),
        Life::Finite(100.0),
    );
    let mut system = ProjectileSystem::default();
    for _ in 0..3 {
        system.fire(&mut world, &mut r, Position::new(90.0, 117.0), 0.0, false, 0.0);
    }

    let events = system.update(&mut world, &mut r, 1.0, (1000.0, 1000.0));

    assert!(!world.contains(hay));
    assert!(events.contains(&ProjectileEvent::TargetDestroyed {
        kind: ActorKind::Destructible,
        position: Position::new(100.0, 100.0),
    }));
    assert_eq!(r.count_texture(actors::DESTRUCTIBLE_TEXTURE), 0);
    assert_eq!(r.invalid_destroys(), 0);

    // Nothing left to hit or free.
    system.update(&mut world, &mut r, 1.0, (1000.0, 1000.0));
    assert_eq!(r.invalid_destroys(), 0);
}

#[test]
fn test_wall_absorbs_projectile() {
    let mut r = renderer();
    let mut world = World::new();
    let wall = actors::spawn_obstacle(&mut world, &mut r, ActorKind::Wall, Position::new(100.0, 100.0), Life::Infinite);
    let mut system = ProjectileSystem::default();
    system.fire(&mut world, &mut r, Position::new(90.0, 117.0), 0.0, false, 0.0);

    let events = system.update(&mut world, &mut r, 1.0, (1000.0, 1000.0));

    assert!(world.contains(wall));
    assert!(system.projectiles().is_empty());
    assert!(matches!(
        events[0],
        ProjectileEvent::TargetHit { kind: ActorKind::Wall, remaining, .. } if remaining.is_infinite()
    ));
}

#[test]
fn test_projectile_leaving_world_is_removed() {
    let mut r = renderer();
    let mut world = World::new();
    let mut system = ProjectileSystem::default();
    system.fire(&mut world, &mut r, Position::new(5.0, 5.0), 180.0, false, 0.0);
    let events = system.update(&mut world, &mut r, 1.0, (100.0, 100.0));
    assert_eq!(events.len(), 1);
    assert!(system.projectiles().is_empty());
}

#[test]
fn test_projectile_drawn_behind() {
    let mut r = renderer();
    let mut world = World::new();
    actors::spawn_player(&mut world, &mut r, Position::new(50.0, 50.0), TankType::Twin, 1.0);
    let mut system = ProjectileSystem::default();
    system.fire(&mut world, &mut r, Position::new(50.0, 50.0), 0.0, false, 0.0);
    let first = r.stage_order()[0];
    assert_eq!(r.node(first).unwrap().texture, actors::BULLET_TEXTURE);
}

// ---- Actors ----

#[test]
fn test_despawn_frees_node_once() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(50.0, 50.0), TankType::Heavy, 1.0);
    assert_eq!(r.count_texture(actors::TANK_TEXTURE), 1);

    assert!(actors::despawn(&mut world, &mut r, tank));
    assert!(!actors::despawn(&mut world, &mut r, tank));
    assert_eq!(r.destroyed(), 1);
    assert_eq!(r.invalid_destroys(), 0);
}

#[test]
fn test_player_body_uses_scaled_node_size() {
    let mut r = renderer();
    let mut world = World::new();
    let tank = actors::spawn_player(&mut world, &mut r, Position::new(50.0, 50.0), TankType::Spread, 2.0);
    let body = *world.get::<&Body>(tank).unwrap();
    assert_eq!((body.width, body.height), (56.0, 40.0));
    let visual = world.get::<&tankfield_core::components::Visual>(tank).unwrap().0;
    assert_eq!(r.node(visual).unwrap().tint, TankType::Spread.tint());
}

// ---- Level loading ----

#[test]
fn test_two_by_two_grid_scenario() {
    let level = LevelData {
        data: vec![vec![0, 1], vec![2, 0]],
    };
    let grid = Grid::from_level(&level, None).unwrap();
    let mut r = renderer();
    let mut world = World::new();
    let layout = level::spawn_grid(&grid, &mut world, &mut r, &ArenaConfig::default());

    assert_eq!(layout.walls.len(), 1);
    assert_eq!(layout.destructibles.len(), 1);
    let (wall_tile, wall) = layout.walls[0];
    let (hay_tile, hay) = layout.destructibles[0];
    assert_eq!(wall_tile, TileCoord::new(0, 1));
    assert_eq!(hay_tile, TileCoord::new(1, 0));

    assert_eq!(*world.get::<&Life>(wall).unwrap(), Life::Infinite);
    assert_eq!(*world.get::<&Life>(hay).unwrap(), Life::Finite(100.0));
    assert_eq!(*world.get::<&Position>(wall).unwrap(), Position::new(35.0, 0.0));
    assert_eq!(*world.get::<&Position>(hay).unwrap(), Position::new(0.0, 35.0));
    assert!(world.get::<&CollisionTarget>(wall).is_ok());
    assert!(world.get::<&CollisionTarget>(hay).is_ok());

    // Only two actors: empty cells are floor decoration.
    assert_eq!(world.len(), 2);
    assert_eq!(collision::target_bounds(&world).len(), 2);
    assert_eq!(layout.floor.len(), 2);
    assert_eq!(r.count_texture(actors::FLOOR_TEXTURE), 2);
}

#[test]
fn test_level_rejects_bad_data() {
    let empty = LevelData { data: vec![] };
    assert!(matches!(Grid::from_level(&empty, None), Err(LevelError::Empty)));

    let ragged = LevelData {
        data: vec![vec![0, 0], vec![0]],
    };
    assert!(matches!(
        Grid::from_level(&ragged, None),
        Err(LevelError::Ragged { row: 1, expected: 2, found: 1 })
    ));

    let unknown = LevelData {
        data: vec![vec![0, 3]],
    };
    assert!(matches!(
        Grid::from_level(&unknown, None),
        Err(LevelError::UnknownCell { row: 0, col: 1, code: 3 })
    ));

    let negative = LevelData {
        data: vec![vec![-1]],
    };
    assert!(matches!(
        Grid::from_level(&negative, None),
        Err(LevelError::UnknownCell { code: -1, .. })
    ));

    let small = LevelData {
        data: vec![vec![0; 3]; 2],
    };
    assert!(matches!(
        Grid::from_level(&small, Some((50, 50))),
        Err(LevelError::Dimensions { found_cols: 3, found_rows: 2, .. })
    ));
}

#[test]
fn test_level_from_json() {
    let grid = Grid::from_json(r#"{"data":[[1,0,2]]}"#, Some((3, 1))).unwrap();
    assert_eq!(grid.cell(TileCoord::new(0, 2)), Some(CellCode::Destructible));
    assert_eq!(grid.pixel_size(35.0, 35.0), (105.0, 35.0));
    assert!(matches!(Grid::from_json("{", None), Err(LevelError::Parse(_))));
}

#[test]
fn test_missing_level_file_is_io_error() {
    let result = level::load_level_file(std::path::Path::new("/nonexistent/level.json"), None);
    assert!(matches!(result, Err(LevelError::Io(_))));
}

// ---- Tire marks ----

#[test]
fn test_tire_marks_fade_out() {
    let mut r = renderer();
    let mut marks = TireMarks::new(0.1);
    marks.lay(&mut r, Position::new(50.0, 50.0), 0.0, 28.0);
    assert_eq!(marks.len(), 2);
    let mut ys: Vec<f64> = r
        .stage_order()
        .iter()
        .map(|n| r.node(*n).unwrap().y)
        .collect();
    ys.sort_by(|a, b| a.total_cmp(b));
    assert!(approx(ys[0], 50.0 - 28.0 * 0.2));
    assert!(approx(ys[1], 50.0 + 28.0 * 0.2));

    marks.update(&mut r, 4.0);
    assert_eq!(marks.len(), 2);
    marks.update(&mut r, 4.0);
    assert!(marks.is_empty());
    assert_eq!(r.count_texture(actors::TIRE_MARK_TEXTURE), 0);
}

// ---- Arena scene ----

fn arena_with(r: &mut HeadlessRenderer, config: GameConfig) -> ArenaScene {
    let mut scene = ArenaScene::new(LevelSource::Data(small_level()), config);
    let mut ctx = SceneContext {
        renderer: r,
        display_scale: 1.0,
    };
    scene.init(&mut ctx).unwrap();
    scene
}

fn tick(scene: &mut ArenaScene, r: &mut HeadlessRenderer, events: &[InputEvent]) -> SceneCommand {
    for event in events {
        scene.handle_input(event);
    }
    let mut ctx = SceneContext {
        renderer: r,
        display_scale: 1.0,
    };
    scene.scene_update(1.0, &mut ctx)
}

#[test]
fn test_arena_init_spawns_grid_and_player() {
    let mut r = renderer();
    let scene = arena_with(&mut r, arena_config());
    let snap = scene.snapshot().unwrap();
    assert_eq!(snap.walls, 1);
    assert_eq!(snap.destructibles, 1);
    let player = snap.player.unwrap();
    assert_eq!(player.position, Position::new(150.0, 10.0));
    assert_eq!(player.tank, TankType::Twin);
    assert_eq!(scene.world_size(), (350.0, 350.0));
    assert_eq!(r.count_texture(actors::FLOOR_TEXTURE), 98);
}

#[test]
fn test_arena_fire_twin_pattern() {
    let mut r = renderer();
    let mut scene = arena_with(&mut r, arena_config());
    tick(&mut scene, &mut r, &[InputEvent::key_down(" ")]);
    let snap = scene.snapshot().unwrap();
    assert_eq!(snap.projectiles, 2);
    assert_eq!(snap.reload_remaining, 9.0);

    tick(&mut scene, &mut r, &[]);
    assert_eq!(scene.snapshot().unwrap().projectiles, 2, "reloading");
}

#[test]
fn test_arena_change_tank_cycles_loadout() {
    let mut r = renderer();
    let mut scene = arena_with(&mut r, arena_config());
    tick(&mut scene, &mut r, &[InputEvent::key_down("t")]);
    assert_eq!(scene.tank(), TankType::Heavy);
    tick(&mut scene, &mut r, &[InputEvent::key_up("t"), InputEvent::key_down("t")]);
    assert_eq!(scene.tank(), TankType::Spread);

    tick(&mut scene, &mut r, &[InputEvent::key_down(" ")]);
    assert_eq!(scene.snapshot().unwrap().projectiles, 3);
}

#[test]
fn test_arena_keyboard_drives_player_and_lays_marks() {
    let mut r = renderer();
    let mut scene = arena_with(&mut r, arena_config());
    tick(&mut scene, &mut r, &[InputEvent::key_down("ArrowUp")]);
    for _ in 0..9 {
        tick(&mut scene, &mut r, &[]);
    }
    let snap = scene.snapshot().unwrap();
    let player = snap.player.unwrap();
    assert!(player.position.x > 150.0);
    assert!(snap.tire_marks > 0);
}

#[test]
fn test_arena_pointer_scheme() {
    let mut r = renderer();
    let mut config = arena_config();
    config.arena.control = ControlScheme::Pointer;
    let mut scene = arena_with(&mut r, config);
    tick(&mut scene, &mut r, &[InputEvent::PointerMove { x: 150.0, y: 300.0 }]);
    let player = scene.snapshot().unwrap().player.unwrap();
    assert!(player.position.y > 10.0);
}

#[test]
fn test_arena_back_button_requests_menu() {
    let mut r = renderer();
    let mut scene = arena_with(&mut r, arena_config());
    let command = tick(&mut scene, &mut r, &[InputEvent::button("back")]);
    assert_eq!(command, SceneCommand::SwitchTo(PAGE_MAIN_MENU.to_string()));
}

#[test]
fn test_arena_close_releases_everything() {
    let mut r = renderer();
    let mut scene = arena_with(&mut r, arena_config());
    tick(&mut scene, &mut r, &[InputEvent::key_down(" "), InputEvent::key_down("ArrowUp")]);
    assert!(r.live_nodes() > 0);

    scene.close(&mut r);
    assert_eq!(r.live_nodes(), 0);
    assert_eq!(r.invalid_destroys(), 0);
    assert!(scene.world().is_empty());

    // Input stopped: held keys are gone after re-init.
    let mut ctx = SceneContext {
        renderer: &mut r,
        display_scale: 1.0,
    };
    scene.init(&mut ctx).unwrap();
    tick(&mut scene, &mut r, &[]);
    assert_eq!(scene.snapshot().unwrap().projectiles, 0);
}

#[test]
fn test_arena_init_fails_on_bad_level() {
    let mut r = renderer();
    let mut scene = ArenaScene::new(
        LevelSource::Data(LevelData { data: vec![vec![9]] }),
        arena_config(),
    );
    let mut ctx = SceneContext {
        renderer: &mut r,
        display_scale: 1.0,
    };
    assert!(matches!(
        scene.init(&mut ctx),
        Err(SceneError::Level(LevelError::UnknownCell { .. }))
    ));
    assert_eq!(r.live_nodes(), 0);
}

#[test]
fn test_arena_update_display_centres_grid() {
    let mut r = renderer();
    let mut scene = arena_with(&mut r, arena_config());
    let mut ctx = SceneContext {
        renderer: &mut r,
        display_scale: 2.0,
    };
    scene.update_display(&mut ctx);
    assert_eq!(r.stage_transform(), (2.0, (1000.0 - 700.0) / 2.0, 0.0));
}

// ---- Engine ----

fn game_engine() -> SceneEngine<HeadlessRenderer> {
    let descriptors = vec![
        SceneDescriptor::new(1, PAGE_GAME, Box::new(ArenaScene::new(
            LevelSource::Data(small_level()),
            arena_config(),
        ))),
        SceneDescriptor::new(0, PAGE_MAIN_MENU, Box::new(MenuScene::new())),
    ];
    SceneEngine::new(renderer(), descriptors, (350.0, 350.0)).unwrap()
}

#[test]
fn test_engine_starts_lowest_index() {
    let engine = game_engine();
    assert_eq!(engine.active_name(), PAGE_MAIN_MENU);
    assert_eq!(engine.active_state(), SceneState::Load);
    assert!(engine.snapshot().is_none());
}

#[test]
fn test_engine_rejects_bad_registry() {
    assert!(matches!(
        SceneEngine::new(renderer(), Vec::new(), (1.0, 1.0)),
        Err(EngineError::NoScenes)
    ));

    let descriptors = vec![
        SceneDescriptor::new(3, "a", Box::new(MenuScene::new())),
        SceneDescriptor::new(3, "b", Box::new(MenuScene::new())),
    ];
    assert!(matches!(
        SceneEngine::new(renderer(), descriptors, (1.0, 1.0)),
        Err(EngineError::DuplicateIndex(3))
    ));
    for size in [(0.0, 500.0), (500.0, 0.0), (f64::NAN, 1.0)] {
        let descriptors = vec![SceneDescriptor::new(0, "a", Box::new(MenuScene::new()))];
        assert!(
            matches!(
                SceneEngine::new(renderer(), descriptors, size),
                Err(EngineError::InvalidWorldSize { .. })
            ),
            "world size {size:?} accepted"
        );
    }
}

#[test]
fn test_engine_unknown_scene_keeps_active() {
    let mut engine = game_engine();
    let live = engine.renderer().live_nodes();
    assert!(matches!(
        engine.switch_scene("Credits"),
        Err(EngineError::SceneNotFound(name)) if name == "Credits"
    ));
    assert_eq!(engine.active_name(), PAGE_MAIN_MENU);
    assert_eq!(engine.renderer().live_nodes(), live);
}

#[test]
fn test_engine_play_button_fades_then_switches() {
    let mut engine = game_engine();
    engine.queue_input(InputEvent::button("play"));

    let mut switched = false;
    for _ in 0..20 {
        let events = engine.update(1.0);
        if events
            .iter()
            .any(|e| matches!(e, tankfield_core::events::SceneEvent::Switched { .. }))
        {
            switched = true;
            break;
        }
        assert_eq!(engine.active_state(), SceneState::Finalize);
    }
    assert!(switched, "menu should hand over to the game");
    assert_eq!(engine.active_name(), PAGE_GAME);
    assert_eq!(engine.active_state(), SceneState::Load);
    assert_eq!(engine.overlay_alphas(), (1.0, 0.0));
    assert!(engine.snapshot().is_some());
}

#[test]
fn test_engine_switching_never_double_frees() {
    let mut engine = game_engine();
    let baseline = engine.renderer().live_nodes();
    for _ in 0..3 {
        engine.switch_scene(PAGE_GAME).unwrap();
        engine.queue_input(InputEvent::key_down(" "));
        for _ in 0..5 {
            engine.update(1.0);
        }
        engine.switch_scene(PAGE_MAIN_MENU).unwrap();
    }
    assert_eq!(engine.renderer().live_nodes(), baseline);
    assert_eq!(engine.renderer().invalid_destroys(), 0);
}

#[test]
fn test_engine_resize_rescales_stage() {
    let mut engine = game_engine();
    engine.switch_scene(PAGE_GAME).unwrap();
    engine.resize(700.0, 350.0);
    assert_eq!(engine.display_scale(), 1.0);
    assert_eq!(engine.renderer().stage_transform(), (1.0, 175.0, 0.0));
}

#[test]
fn test_engine_finalize_active() {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let mut probe = ProbeScene::new(counters.clone());
    probe.command = SceneCommand::Finalize;
    let mut engine = SceneEngine::new(
        renderer(),
        vec![SceneDescriptor::new(0, "probe", Box::new(probe))],
        (100.0, 100.0),
    )
    .unwrap();

    engine.update(1.0);
    assert_eq!(engine.active_state(), SceneState::Finalize);

    engine.finalize_active();
    for _ in 0..20 {
        engine.update(1.0);
    }
    assert_eq!(engine.active_state(), SceneState::Done);
    assert_eq!(counters.borrow().updates, 21);
}

#[test]
fn test_engine_ignores_switch_to_unknown_scene() {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let mut probe = ProbeScene::new(counters.clone());
    probe.command = SceneCommand::SwitchTo("nowhere".to_string());
    let mut engine = SceneEngine::new(
        renderer(),
        vec![SceneDescriptor::new(0, "probe", Box::new(probe))],
        (100.0, 100.0),
    )
    .unwrap();

    let events = engine.update(1.0);
    assert!(events.is_empty());
    assert_eq!(engine.active_state(), SceneState::Load);
    assert_eq!(engine.active_name(), "probe");
    assert_eq!(counters.borrow().closes, 0);
}
