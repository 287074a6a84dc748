//! Full-screen fade overlay used to enter and leave scenes.

use tankfield_core::constants::{TRANSITION_COLOR, TRANSITION_STEP};
use tankfield_core::enums::{TransitionKind, TransitionStatus};
use tankfield_core::types::NodeId;

use crate::render::{DrawOrder, Renderer};

/// Linear alpha fade. Can be re-initialized for every scene activation.
#[derive(Debug)]
pub struct FadeTransition {
    step: f64,
    kind: Option<TransitionKind>,
    overlay: Option<NodeId>,
    alpha: f64,
}

impl Default for FadeTransition {
    fn default() -> Self {
        Self::new(TRANSITION_STEP)
    }
}

impl FadeTransition {
    /// `step` is the alpha change per unit of delta.
    pub fn new(step: f64) -> Self {
        Self {
            step,
            kind: None,
            overlay: None,
            alpha: 0.0,
        }
    }

    /// Create the overlay on top of the stage, sized to the viewport.
    /// Any overlay from a previous activation is released first.
    pub fn init(&mut self, kind: TransitionKind, renderer: &mut dyn Renderer) {
        self.release(renderer);

        let (width, height) = renderer.viewport();
        let overlay = renderer.create_rect(width, height, TRANSITION_COLOR);
        self.alpha = match kind {
            TransitionKind::FadeOut => 1.0,
            TransitionKind::FadeIn => 0.0,
        };
        renderer.set_alpha(overlay, self.alpha);
        renderer.attach(overlay, DrawOrder::Front);

        self.kind = Some(kind);
        self.overlay = Some(overlay);
    }

    /// Advance the fade by `step * delta`.
    ///
    /// Alpha is clamped to `[0, 1]`. Once the terminal bound is reached the
    /// transition stays there and keeps reporting `Completed`.
    pub fn update(&mut self, delta: f64, renderer: &mut dyn Renderer) -> TransitionStatus {
        let Some(kind) = self.kind else {
            return TransitionStatus::Idle;
        };

        if self.is_complete() {
            return TransitionStatus::Completed;
        }

        self.alpha = match kind {
            TransitionKind::FadeOut => (self.alpha - self.step * delta).max(0.0),
            TransitionKind::FadeIn => (self.alpha + self.step * delta).min(1.0),
        };
        if let Some(overlay) = self.overlay {
            renderer.set_alpha(overlay, self.alpha);
        }

        if self.is_complete() {
            TransitionStatus::Completed
        } else {
            TransitionStatus::Running
        }
    }

    /// Re-fit the overlay to a new viewport.
    pub fn resize(&mut self, renderer: &mut dyn Renderer) {
        if let Some(overlay) = self.overlay {
            let (width, height) = renderer.viewport();
            renderer.set_size(overlay, width, height);
        }
    }

    /// Destroy the overlay node. Safe to call repeatedly.
    pub fn release(&mut self, renderer: &mut dyn Renderer) {
        if let Some(overlay) = self.overlay.take() {
            renderer.destroy_node(overlay);
        }
        self.kind = None;
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn kind(&self) -> Option<TransitionKind> {
        self.kind
    }

    pub fn overlay(&self) -> Option<NodeId> {
        self.overlay
    }

    fn is_complete(&self) -> bool {
        match self.kind {
            Some(TransitionKind::FadeOut) => self.alpha <= 0.0,
            Some(TransitionKind::FadeIn) => self.alpha >= 1.0,
            None => false,
        }
    }
}
