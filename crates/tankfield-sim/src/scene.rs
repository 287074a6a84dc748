//! Scene trait and the LOAD → PROCESS → FINALIZE → DONE lifecycle.
//!
//! [`SceneRunner`] wraps a boxed [`Scene`] with its two fade transitions and
//! drives the state machine. Gameplay (`scene_update`) runs on every tick in
//! every state; transitions overlay it rather than pausing it.

use tracing::debug;

use tankfield_core::commands::InputEvent;
use tankfield_core::enums::{SceneState, TransitionKind, TransitionStatus};
use tankfield_core::state::ArenaSnapshot;

use crate::error::SceneError;
use crate::render::Renderer;
use crate::transition::FadeTransition;

/// What a scene asks the engine to do after a tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SceneCommand {
    #[default]
    None,
    /// Start the leaving transition.
    Finalize,
    /// Replace the active scene with the named one.
    SwitchTo(String),
}

/// Renderer access and global display scale handed to scene hooks.
pub struct SceneContext<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub display_scale: f64,
}

/// A game scene. Implementors own their actors and visual nodes.
pub trait Scene {
    /// Build the scene. Called on every activation, after any previous
    /// `close`, so implementations must start from a clean slate.
    fn init(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError>;

    /// Record a raw input event. Applied before the next `scene_update`.
    fn handle_input(&mut self, _event: &InputEvent) {}

    /// Gameplay for one tick.
    fn scene_update(&mut self, delta: f64, ctx: &mut SceneContext<'_>) -> SceneCommand;

    /// Reposition visuals after the viewport or display scale changed.
    fn update_display(&mut self, ctx: &mut SceneContext<'_>);

    /// Release every owned visual node and stop all controllers.
    fn close(&mut self, renderer: &mut dyn Renderer);

    /// Gameplay state for logging. Scenes without an arena return `None`.
    fn snapshot(&self) -> Option<ArenaSnapshot> {
        None
    }
}

/// A registered scene plus its lifecycle state and transitions.
pub struct SceneRunner {
    pub index: i32,
    pub name: String,
    scene: Box<dyn Scene>,
    /// Descriptor's fade-in instance. Plays as the leaving transition.
    fade_in: FadeTransition,
    /// Descriptor's fade-out instance. Plays as the entering transition.
    fade_out: FadeTransition,
    state: SceneState,
    active: bool,
}

impl SceneRunner {
    pub fn new(
        index: i32,
        name: impl Into<String>,
        scene: Box<dyn Scene>,
        fade_in: FadeTransition,
        fade_out: FadeTransition,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            scene,
            fade_in,
            fade_out,
            state: SceneState::Load,
            active: false,
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set the scene up and attach its transitions.
    ///
    /// Roles are swapped: the descriptor's fade-out instance
    /// (overlay 1 → 0) reveals the scene on entry, and its fade-in instance
    /// (overlay 0 → 1) covers it on exit.
    pub fn setup(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        self.state = SceneState::Load;
        self.scene.init(ctx)?;
        self.fade_in.init(TransitionKind::FadeIn, ctx.renderer);
        self.fade_out.init(TransitionKind::FadeOut, ctx.renderer);
        self.active = true;
        Ok(())
    }

    /// Drive the lifecycle, then run gameplay. Returns the scene's command
    /// and the state change, if any, that happened this tick.
    pub fn update(
        &mut self,
        delta: f64,
        ctx: &mut SceneContext<'_>,
    ) -> (SceneCommand, Option<(SceneState, SceneState)>) {
        let before = self.state;
        match self.state {
            SceneState::Load => {
                if self.fade_out.update(delta, ctx.renderer) == TransitionStatus::Completed {
                    self.state = SceneState::Process;
                }
            }
            SceneState::Process => {}
            SceneState::Finalize => {
                if self.fade_in.update(delta, ctx.renderer) == TransitionStatus::Completed {
                    self.state = SceneState::Done;
                }
            }
            SceneState::Done => {}
        }

        let command = self.scene.scene_update(delta, ctx);
        let change = (before != self.state).then_some((before, self.state));
        if let Some((from, to)) = change {
            debug!(scene = %self.name, ?from, ?to, "scene_state_changed");
        }
        (command, change)
    }

    /// Begin the leaving transition. Ignored unless the scene is processing
    /// or still loading.
    pub fn set_finalizing(&mut self) {
        if matches!(self.state, SceneState::Load | SceneState::Process) {
            self.state = SceneState::Finalize;
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        self.scene.handle_input(event);
    }

    pub fn update_display(&mut self, ctx: &mut SceneContext<'_>) {
        self.fade_in.resize(ctx.renderer);
        self.fade_out.resize(ctx.renderer);
        self.scene.update_display(ctx);
    }

    /// Tear the scene down. A runner that is not active is left alone, so
    /// `close` runs exactly once per activation.
    pub fn close(&mut self, renderer: &mut dyn Renderer) {
        if !self.active {
            return;
        }
        self.scene.close(renderer);
        self.fade_in.release(renderer);
        self.fade_out.release(renderer);
        self.active = false;
    }

    /// Scene snapshot stamped with the lifecycle state.
    pub fn snapshot(&self) -> Option<ArenaSnapshot> {
        self.scene.snapshot().map(|mut snap| {
            snap.scene_state = self.state;
            snap
        })
    }

    /// Alpha of the entering and leaving overlays.
    pub fn overlay_alphas(&self) -> (f64, f64) {
        (self.fade_out.alpha(), self.fade_in.alpha())
    }
}
