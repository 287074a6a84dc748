//! Fading tire marks laid under a moving tank.

use tankfield_core::constants::{TIRE_MARK_ALPHA, TIRE_MARK_OFFSET};
use tankfield_core::types::{NodeId, Position};

use crate::actors::TIRE_MARK_TEXTURE;
use crate::render::{DrawOrder, Renderer};

#[derive(Debug, Clone, Copy)]
struct TireMark {
    node: NodeId,
    alpha: f64,
}

/// Decorative marks. Not actors: no collision, no life.
#[derive(Debug, Default)]
pub struct TireMarks {
    fade: f64,
    marks: Vec<TireMark>,
}

impl TireMarks {
    /// `fade` is the alpha lost per unit of delta.
    pub fn new(fade: f64) -> Self {
        Self {
            fade,
            marks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Lay one mark under each track of a tank at `center` facing `heading`.
    pub fn lay(&mut self, renderer: &mut dyn Renderer, center: Position, heading: f64, width: f64) {
        let offset = width * TIRE_MARK_OFFSET;
        for side in [-1.0, 1.0] {
            let angle = heading + side * std::f64::consts::FRAC_PI_2;
            let node = renderer.create_node(TIRE_MARK_TEXTURE);
            renderer.set_position(
                node,
                center.x + angle.cos() * offset,
                center.y + angle.sin() * offset,
            );
            renderer.set_rotation(node, heading);
            renderer.set_alpha(node, TIRE_MARK_ALPHA);
            renderer.attach(node, DrawOrder::Back);
            self.marks.push(TireMark {
                node,
                alpha: TIRE_MARK_ALPHA,
            });
        }
    }

    /// Fade every mark and destroy the ones that became invisible.
    pub fn update(&mut self, renderer: &mut dyn Renderer, delta: f64) {
        let fade = self.fade * delta;
        self.marks.retain_mut(|mark| {
            mark.alpha -= fade;
            if mark.alpha <= 0.0 {
                renderer.destroy_node(mark.node);
                false
            } else {
                renderer.set_alpha(mark.node, mark.alpha);
                true
            }
        });
    }

    pub fn clear(&mut self, renderer: &mut dyn Renderer) {
        for mark in self.marks.drain(..) {
            renderer.destroy_node(mark.node);
        }
    }
}
