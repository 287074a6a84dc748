//! Renderer seam.
//!
//! The simulation never draws. It owns `NodeId`s and pushes transforms,
//! alpha, and tint through [`Renderer`]. [`HeadlessRenderer`] keeps node
//! state in memory for tests and the headless host.

use std::collections::HashMap;

use tankfield_core::constants::{TANK_TEXTURE_HEIGHT, TANK_TEXTURE_WIDTH};
use tankfield_core::types::NodeId;

/// Where a node is attached in the stage's draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOrder {
    /// Behind everything already on stage.
    Back,
    /// On top of everything already on stage.
    Front,
}

/// Capabilities the kernel needs from a rendering backend.
pub trait Renderer {
    /// Create a node from a named texture. The node is not attached yet.
    fn create_node(&mut self, texture: &str) -> NodeId;

    /// Create a solid-colour rectangle node.
    fn create_rect(&mut self, width: f64, height: f64, color: u32) -> NodeId;

    fn attach(&mut self, node: NodeId, order: DrawOrder);

    fn set_position(&mut self, node: NodeId, x: f64, y: f64);

    fn set_rotation(&mut self, node: NodeId, radians: f64);

    fn set_scale(&mut self, node: NodeId, scale: f64);

    fn set_alpha(&mut self, node: NodeId, alpha: f64);

    fn set_tint(&mut self, node: NodeId, tint: u32);

    /// Resize a rectangle node.
    fn set_size(&mut self, node: NodeId, width: f64, height: f64);

    /// On-screen `(width, height)` of the node including its scale.
    fn node_size(&self, node: NodeId) -> (f64, f64);

    /// Detach and free the node. Each node is destroyed at most once.
    fn destroy_node(&mut self, node: NodeId);

    /// Detach every node from the stage without destroying it.
    fn clear_stage(&mut self);

    /// Current viewport size in client pixels.
    fn viewport(&self) -> (f64, f64);

    fn set_viewport(&mut self, width: f64, height: f64);

    /// Scale and offset applied to the whole stage.
    fn set_stage_transform(&mut self, scale: f64, offset_x: f64, offset_y: f64);
}

/// State of one node held by [`HeadlessRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub texture: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
    pub alpha: f64,
    pub tint: u32,
    pub width: f64,
    pub height: f64,
}

/// In-memory renderer. Tracks live nodes, stage order, and destroy calls.
#[derive(Debug)]
pub struct HeadlessRenderer {
    next_id: u64,
    nodes: HashMap<NodeId, NodeState>,
    stage: Vec<NodeId>,
    texture_sizes: HashMap<String, (f64, f64)>,
    viewport: (f64, f64),
    stage_transform: (f64, f64, f64),
    destroyed: u64,
    invalid_destroys: u64,
}

/// Texture used when a texture name has no registered size.
const DEFAULT_TEXTURE_SIZE: (f64, f64) = (32.0, 32.0);

impl HeadlessRenderer {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        let mut texture_sizes = HashMap::new();
        texture_sizes.insert("tile".to_string(), (35.0, 35.0));
        texture_sizes.insert("rocks".to_string(), (35.0, 35.0));
        texture_sizes.insert("hay".to_string(), (35.0, 35.0));
        texture_sizes.insert("tank".to_string(), (TANK_TEXTURE_WIDTH, TANK_TEXTURE_HEIGHT));
        texture_sizes.insert("bullet".to_string(), (6.0, 6.0));
        texture_sizes.insert("tire_mark".to_string(), (3.0, 3.0));

        Self {
            next_id: 0,
            nodes: HashMap::new(),
            stage: Vec::new(),
            texture_sizes,
            viewport: (viewport_width, viewport_height),
            stage_transform: (1.0, 0.0, 0.0),
            destroyed: 0,
            invalid_destroys: 0,
        }
    }

    /// Register (or override) the pixel size of a texture.
    pub fn with_texture(mut self, name: &str, width: f64, height: f64) -> Self {
        self.texture_sizes.insert(name.to_string(), (width, height));
        self
    }

    pub fn node(&self, node: NodeId) -> Option<&NodeState> {
        self.nodes.get(&node)
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Live nodes created from `texture`.
    pub fn count_texture(&self, texture: &str) -> usize {
        self.nodes.values().filter(|n| n.texture == texture).count()
    }

    /// Attached nodes, back to front.
    pub fn stage_order(&self) -> &[NodeId] {
        &self.stage
    }

    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    /// Destroy calls for nodes that did not exist (double frees).
    pub fn invalid_destroys(&self) -> u64 {
        self.invalid_destroys
    }

    pub fn stage_transform(&self) -> (f64, f64, f64) {
        self.stage_transform
    }

    fn alloc(&mut self, texture: &str, width: f64, height: f64) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeState {
                texture: texture.to_string(),
                x: 0.0,
                y: 0.0,
                rotation: 0.0,
                scale: 1.0,
                alpha: 1.0,
                tint: 0xffffff,
                width,
                height,
            },
        );
        id
    }
}

impl Renderer for HeadlessRenderer {
    fn create_node(&mut self, texture: &str) -> NodeId {
        let (w, h) = self
            .texture_sizes
            .get(texture)
            .copied()
            .unwrap_or(DEFAULT_TEXTURE_SIZE);
        self.alloc(texture, w, h)
    }

    fn create_rect(&mut self, width: f64, height: f64, color: u32) -> NodeId {
        let id = self.alloc("rect", width, height);
        self.set_tint(id, color);
        id
    }

    fn attach(&mut self, node: NodeId, order: DrawOrder) {
        if !self.nodes.contains_key(&node) {
            return;
        }
        self.stage.retain(|n| *n != node);
        match order {
            DrawOrder::Back => self.stage.insert(0, node),
            DrawOrder::Front => self.stage.push(node),
        }
    }

    fn set_position(&mut self, node: NodeId, x: f64, y: f64) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.x = x;
            n.y = y;
        }
    }

    fn set_rotation(&mut self, node: NodeId, radians: f64) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.rotation = radians;
        }
    }

    fn set_scale(&mut self, node: NodeId, scale: f64) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.scale = scale;
        }
    }

    fn set_alpha(&mut self, node: NodeId, alpha: f64) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.alpha = alpha;
        }
    }

    fn set_tint(&mut self, node: NodeId, tint: u32) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.tint = tint;
        }
    }

    fn set_size(&mut self, node: NodeId, width: f64, height: f64) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.width = width;
            n.height = height;
        }
    }

    fn node_size(&self, node: NodeId) -> (f64, f64) {
        self.nodes
            .get(&node)
            .map_or((0.0, 0.0), |n| (n.width * n.scale, n.height * n.scale))
    }

    fn destroy_node(&mut self, node: NodeId) {
        if self.nodes.remove(&node).is_some() {
            self.stage.retain(|n| *n != node);
            self.destroyed += 1;
        } else {
            self.invalid_destroys += 1;
        }
    }

    fn clear_stage(&mut self) {
        self.stage.clear();
    }

    fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
    }

    fn set_stage_transform(&mut self, scale: f64, offset_x: f64, offset_y: f64) {
        self.stage_transform = (scale, offset_x, offset_y);
    }
}
