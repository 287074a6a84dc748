//! Scene engine: owns the scene registry and the renderer, ticks the
//! active scene, and replaces it on request.
//!
//! Completely headless. The host feeds input with `queue_input` and calls
//! `update(delta)` once per frame.

use std::collections::VecDeque;

use tracing::{error, info, warn};

use tankfield_core::commands::InputEvent;
use tankfield_core::constants::{FADE_IN_STEP, FADE_OUT_STEP};
use tankfield_core::enums::SceneState;
use tankfield_core::events::SceneEvent;
use tankfield_core::state::ArenaSnapshot;

use crate::error::EngineError;
use crate::input::display_scale;
use crate::render::Renderer;
use crate::scene::{Scene, SceneCommand, SceneContext, SceneRunner};
use crate::transition::FadeTransition;

/// A scene as registered by the caller.
pub struct SceneDescriptor {
    /// Unique. The lowest index starts active.
    pub index: i32,
    /// Routing key for `switch_scene`.
    pub name: String,
    pub scene: Box<dyn Scene>,
    pub fade_in: FadeTransition,
    pub fade_out: FadeTransition,
}

impl SceneDescriptor {
    /// Descriptor with the default fade speeds.
    pub fn new(index: i32, name: impl Into<String>, scene: Box<dyn Scene>) -> Self {
        Self {
            index,
            name: name.into(),
            scene,
            fade_in: FadeTransition::new(FADE_IN_STEP),
            fade_out: FadeTransition::new(FADE_OUT_STEP),
        }
    }
}

pub struct SceneEngine<R: Renderer> {
    renderer: R,
    runners: Vec<SceneRunner>,
    active: usize,
    /// Arena size in world units, used for the global display scale.
    world_size: (f64, f64),
    display_scale: f64,
    input_queue: VecDeque<InputEvent>,
    /// Scene to switch to once the active one reaches `Done`.
    pending_switch: Option<String>,
}

impl<R: Renderer> SceneEngine<R> {
    /// Register the scenes and set up the one with the lowest index.
    pub fn new(
        renderer: R,
        descriptors: Vec<SceneDescriptor>,
        world_size: (f64, f64),
    ) -> Result<Self, EngineError> {
        if descriptors.is_empty() {
            return Err(EngineError::NoScenes);
        }
        let (width, height) = world_size;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(EngineError::InvalidWorldSize { width, height });
        }

        let mut runners: Vec<SceneRunner> = descriptors
            .into_iter()
            .map(|d| SceneRunner::new(d.index, d.name, d.scene, d.fade_in, d.fade_out))
            .collect();
        runners.sort_by_key(|r| r.index);
        if let Some(pair) = runners.windows(2).find(|w| w[0].index == w[1].index) {
            return Err(EngineError::DuplicateIndex(pair[0].index));
        }

        let scale = display_scale(renderer.viewport(), world_size.0, world_size.1);
        let mut engine = Self {
            renderer,
            runners,
            active: 0,
            world_size,
            display_scale: scale,
            input_queue: VecDeque::new(),
            pending_switch: None,
        };
        engine.setup_active()?;
        info!(scene = %engine.runners[0].name, scenes = engine.runners.len(), "engine_started");
        Ok(engine)
    }

    /// Queue a raw input event for the next tick.
    pub fn queue_input(&mut self, event: InputEvent) {
        self.input_queue.push_back(event);
    }

    pub fn queue_inputs(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.input_queue.extend(events);
    }

    /// Advance the active scene by one tick.
    pub fn update(&mut self, delta: f64) -> Vec<SceneEvent> {
        let mut events = Vec::new();

        let runner = &mut self.runners[self.active];
        while let Some(event) = self.input_queue.pop_front() {
            runner.handle_input(&event);
        }

        let mut ctx = SceneContext {
            renderer: &mut self.renderer,
            display_scale: self.display_scale,
        };
        let (command, change) = runner.update(delta, &mut ctx);
        if let Some((from, to)) = change {
            events.push(SceneEvent::StateChanged {
                scene: runner.name.clone(),
                from,
                to,
            });
        }

        match command {
            SceneCommand::None => {}
            SceneCommand::Finalize => runner.set_finalizing(),
            SceneCommand::SwitchTo(name) => self.request_switch(name),
        }

        if self.runners[self.active].state() == SceneState::Done {
            if let Some(name) = self.pending_switch.take() {
                let from = self.runners[self.active].name.clone();
                if self.switch_scene(&name).is_ok() {
                    events.push(SceneEvent::Switched { from, to: name });
                }
            }
        }

        events
    }

    /// Close the active scene and set up `name` in its place.
    ///
    /// An unknown name is logged and leaves the active scene untouched.
    pub fn switch_scene(&mut self, name: &str) -> Result<(), EngineError> {
        let Some(target) = self.runners.iter().position(|r| r.name == name) else {
            error!(scene = name, "scene_not_found");
            return Err(EngineError::SceneNotFound(name.to_string()));
        };

        let previous = self.active;
        self.runners[previous].close(&mut self.renderer);
        self.renderer.clear_stage();
        self.input_queue.clear();
        self.pending_switch = None;

        self.active = target;
        if let Err(err) = self.setup_active() {
            error!(scene = name, error = %err, "scene_setup_failed");
            self.active = previous;
            if let Err(restore) = self.setup_active() {
                warn!(error = %restore, "scene_restore_failed");
            }
            return Err(err);
        }

        info!(
            from = %self.runners[previous].name,
            to = name,
            "scene_switched"
        );
        Ok(())
    }

    /// Finalize the active scene and switch to `name` once it is done.
    /// Unknown names are logged and ignored.
    fn request_switch(&mut self, name: String) {
        if self.pending_switch.is_some() {
            return;
        }
        if !self.runners.iter().any(|r| r.name == name) {
            error!(scene = %name, "scene_not_found");
            return;
        }
        self.runners[self.active].set_finalizing();
        self.pending_switch = Some(name);
    }

    /// Start the active scene's leaving transition.
    pub fn finalize_active(&mut self) {
        self.runners[self.active].set_finalizing();
    }

    /// Apply a new viewport size and let the active scene reposition itself.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.renderer.set_viewport(width, height);
        self.display_scale = display_scale((width, height), self.world_size.0, self.world_size.1);
        let mut ctx = SceneContext {
            renderer: &mut self.renderer,
            display_scale: self.display_scale,
        };
        self.runners[self.active].update_display(&mut ctx);
    }

    pub fn active_name(&self) -> &str {
        &self.runners[self.active].name
    }

    pub fn active_state(&self) -> SceneState {
        self.runners[self.active].state()
    }

    pub fn display_scale(&self) -> f64 {
        self.display_scale
    }

    /// Entering and leaving overlay alpha of the active scene.
    pub fn overlay_alphas(&self) -> (f64, f64) {
        self.runners[self.active].overlay_alphas()
    }

    /// Gameplay snapshot of the active scene, if it has one.
    pub fn snapshot(&self) -> Option<ArenaSnapshot> {
        self.runners[self.active].snapshot()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Close the active scene. The engine must not be updated afterwards.
    pub fn shutdown(&mut self) {
        self.runners[self.active].close(&mut self.renderer);
        self.renderer.clear_stage();
        info!("engine_shutdown");
    }

    fn setup_active(&mut self) -> Result<(), EngineError> {
        let runner = &mut self.runners[self.active];
        let mut ctx = SceneContext {
            renderer: &mut self.renderer,
            display_scale: self.display_scale,
        };
        runner.setup(&mut ctx).map_err(|source| EngineError::Setup {
            name: runner.name.clone(),
            source,
        })
    }
}
