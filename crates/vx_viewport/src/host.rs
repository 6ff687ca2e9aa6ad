//! Interfaces the preview core consumes from its host.
//!
//! The host owns the real scene graph, particle runtime and GPU. The core
//! only needs existence predicates, per-part bounds, a few scene mutations
//! and an offscreen render call.

use glam::Vec3;
use vx_math::Bounds;

use crate::camera::CameraFrame;
use crate::content::{AssetRef, ComponentFlags, ContentRoot, NodeId};
use crate::error::PreviewResult;
use crate::grid::{GridMaterial, GridMesh};

/// Read-only view of the content hierarchy
pub trait SceneQuery {
    /// Direct children of `node`, in hierarchy order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Components present on `node` itself
    fn components(&self, node: NodeId) -> ComponentFlags;

    /// World-space bounds of the renderer on `node`, if it has one
    fn render_bounds(&self, node: NodeId) -> Option<Bounds>;

    /// World-space position of `node`
    fn position(&self, node: NodeId) -> Vec3;
}

/// Time-stepped particle runtime
pub trait ParticleSimulator {
    /// Advance `emitter` by `delta` seconds. With `restart`, rewind to time
    /// zero and clear live particles first.
    fn simulate(&mut self, emitter: NodeId, delta: f32, restart: bool);

    fn play(&mut self, emitter: NodeId);

    fn pause(&mut self, emitter: NodeId);

    /// Current simulation time of `emitter` in seconds
    fn simulation_time(&self, emitter: NodeId) -> f32;
}

/// Scene instantiation and mutation primitives
pub trait SceneHost: SceneQuery + ParticleSimulator {
    /// Instantiate `asset` into the preview scene. `None` is a load error.
    fn instantiate(&mut self, asset: &AssetRef) -> Option<ContentRoot>;

    /// Destroy `node` and its whole subtree immediately
    fn destroy(&mut self, node: NodeId);

    /// Move a root into the isolated preview render scene
    fn move_to_render_scene(&mut self, node: NodeId);

    /// Create a world-space UI canvas root to host UI content
    fn create_ui_canvas(&mut self) -> Option<NodeId>;

    /// Reparent `child` under `parent`, keeping local coordinates
    fn set_parent(&mut self, child: NodeId, parent: NodeId);

    /// Set a uniform local scale on `node`
    fn set_uniform_scale(&mut self, node: NodeId, scale: f32);

    fn set_position(&mut self, node: NodeId, position: Vec3);

    fn set_active(&mut self, node: NodeId, active: bool);

    /// Create a hidden line-renderer object using `material`
    fn create_grid_object(&mut self, material: &GridMaterial) -> Option<NodeId>;

    /// Replace the line mesh drawn by a grid object
    fn upload_grid_mesh(&mut self, node: NodeId, mesh: &GridMesh);
}

/// Pixel rectangle of the preview area
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rect of the given size at the origin
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// True when there is nothing to draw into
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Texture produced by an offscreen render pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Everything the render surface needs for one pass
#[derive(Clone, Debug)]
pub struct RenderRequest {
    pub rect: ViewRect,
    pub camera: CameraFrame,
    pub lighting_enabled: bool,
}

/// Offscreen render surface.
///
/// Created lazily by the session on first need and released explicitly on
/// teardown; never left to drop order.
pub trait RenderBackend {
    /// Acquire GPU resources for the surface
    fn create_surface(&mut self) -> PreviewResult<()>;

    /// Render one pass into `request.rect` and return the resulting texture
    fn render(&mut self, request: &RenderRequest) -> PreviewResult<TextureHandle>;

    /// Release everything acquired by `create_surface`
    fn release_surface(&mut self);
}
