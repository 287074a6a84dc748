//! Main menu: a header and a play button.

use tankfield_core::commands::InputEvent;
use tankfield_core::constants::PAGE_GAME;
use tankfield_core::types::NodeId;

use crate::error::SceneError;
use crate::input::InputState;
use crate::render::{DrawOrder, Renderer};
use crate::scene::{Scene, SceneCommand, SceneContext};

pub const PLAY_BUTTON: &str = "play";

#[derive(Debug, Default)]
pub struct MenuScene {
    header: Option<NodeId>,
    play: Option<NodeId>,
    input: InputState,
}

impl MenuScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for MenuScene {
    fn init(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        let header = ctx.renderer.create_node("header");
        let play = ctx.renderer.create_node("play_button");
        ctx.renderer.attach(header, DrawOrder::Front);
        ctx.renderer.attach(play, DrawOrder::Front);
        self.header = Some(header);
        self.play = Some(play);
        self.input.start();
        self.update_display(ctx);
        Ok(())
    }

    fn handle_input(&mut self, event: &InputEvent) {
        self.input.apply(event);
    }

    fn scene_update(&mut self, _delta: f64, _ctx: &mut SceneContext<'_>) -> SceneCommand {
        if self.input.take_buttons().iter().any(|b| b == PLAY_BUTTON) {
            SceneCommand::SwitchTo(PAGE_GAME.to_string())
        } else {
            SceneCommand::None
        }
    }

    fn update_display(&mut self, ctx: &mut SceneContext<'_>) {
        // Menu widgets are laid out in client space.
        ctx.renderer.set_stage_transform(1.0, 0.0, 0.0);
        let (width, height) = ctx.renderer.viewport();
        if let Some(header) = self.header {
            ctx.renderer.set_position(header, width / 2.0, height / 3.0);
        }
        if let Some(play) = self.play {
            ctx.renderer.set_position(play, width / 2.0, height / 2.0);
        }
    }

    fn close(&mut self, renderer: &mut dyn Renderer) {
        self.input.stop();
        for node in [self.header.take(), self.play.take()].into_iter().flatten() {
            renderer.destroy_node(node);
        }
    }
}
