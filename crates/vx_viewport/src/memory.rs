//! In-memory scene host and render surface.
//!
//! Backs the headless driver and the tests. Nodes live in a generational
//! arena; particle emitters grow a spherical cloud at a fixed speed for one
//! lifetime, which is enough to exercise warm-up, playback and framing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vx_math::Bounds;

use crate::content::{AssetRef, ComponentFlags, ContentRoot, NodeId};
use crate::error::{PreviewError, PreviewResult};
use crate::grid::{GridMaterial, GridMesh};
use crate::host::{
    ParticleSimulator, RenderBackend, RenderRequest, SceneHost, SceneQuery, TextureHandle,
};
use crate::preferences::{PreferenceSink, ViewPreferences};
use crate::status::{StatusMessage, StatusSink};

/// Particle emitter parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterDesc {
    /// Growth of the particle cloud radius in units per second
    pub speed: f32,
    /// Seconds after which the cloud stops growing
    pub lifetime: f32,
}

impl Default for EmitterDesc {
    fn default() -> Self {
        Self {
            speed: 1.0,
            lifetime: 1.0,
        }
    }
}

/// Description of a node and its subtree
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDesc {
    pub name: String,
    /// Position relative to the parent
    pub position: [f32; 3],
    /// Half-size of a mesh renderer centered on the node
    pub mesh: Option<[f32; 3]>,
    pub emitter: Option<EmitterDesc>,
    pub ui_canvas: bool,
    pub ui_graphic: bool,
    pub children: Vec<NodeDesc>,
}

impl NodeDesc {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn mesh(name: impl Into<String>, center: [f32; 3], extents: [f32; 3]) -> Self {
        Self {
            mesh: Some(extents),
            ..Self::empty(name).at(center)
        }
    }

    pub fn emitter(name: impl Into<String>, position: [f32; 3], speed: f32) -> Self {
        Self {
            emitter: Some(EmitterDesc {
                speed,
                ..Default::default()
            }),
            ..Self::empty(name).at(position)
        }
    }

    pub fn ui_canvas(name: impl Into<String>) -> Self {
        Self {
            ui_canvas: true,
            ..Self::empty(name)
        }
    }

    pub fn ui_graphic(name: impl Into<String>) -> Self {
        Self {
            ui_graphic: true,
            ..Self::empty(name)
        }
    }

    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn with_children(mut self, children: Vec<NodeDesc>) -> Self {
        self.children = children;
        self
    }

    fn components(&self) -> ComponentFlags {
        let mut flags = ComponentFlags::NONE;
        if self.mesh.is_some() {
            flags.insert(ComponentFlags::RENDERER);
        }
        if self.emitter.is_some() {
            flags.insert(ComponentFlags::PARTICLE_EMITTER | ComponentFlags::RENDERER);
        }
        if self.ui_canvas {
            flags.insert(ComponentFlags::UI_CANVAS);
        }
        if self.ui_graphic {
            flags.insert(ComponentFlags::UI_GRAPHIC);
        }
        flags
    }

    fn validate(&self) -> PreviewResult<()> {
        let finite = self.position.iter().chain(self.mesh.iter().flatten()).all(|v| v.is_finite());
        if !finite {
            return Err(PreviewError::InvalidScene(format!(
                "node '{}' has a non-finite position or mesh size",
                self.name
            )));
        }
        if let Some(emitter) = &self.emitter {
            if !(emitter.speed >= 0.0 && emitter.lifetime >= 0.0) {
                return Err(PreviewError::InvalidScene(format!(
                    "emitter '{}' needs a non-negative speed and lifetime",
                    self.name
                )));
            }
        }
        self.children.iter().try_for_each(NodeDesc::validate)
    }
}

/// Asset catalogue loaded from JSON
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub assets: HashMap<String, NodeDesc>,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> PreviewResult<Self> {
        let description: Self = serde_json::from_str(json)?;
        for desc in description.assets.values() {
            desc.validate()?;
        }
        Ok(description)
    }

    pub fn from_file(path: impl AsRef<Path>) -> PreviewResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[derive(Clone, Debug)]
struct EmitterState {
    desc: EmitterDesc,
    time: f32,
    playing: bool,
}

impl EmitterState {
    fn radius(&self) -> f32 {
        self.desc.speed * self.time.min(self.desc.lifetime)
    }
}

#[derive(Clone, Debug)]
struct GridObject {
    material: GridMaterial,
    mesh: Option<GridMesh>,
}

#[derive(Clone, Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    position: Vec3,
    scale: f32,
    active: bool,
    in_render_scene: bool,
    components: ComponentFlags,
    mesh: Option<Vec3>,
    emitter: Option<EmitterState>,
    grid: Option<GridObject>,
}

impl Node {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            position: Vec3::ZERO,
            scale: 1.0,
            active: true,
            in_render_scene: false,
            components: ComponentFlags::NONE,
            mesh: None,
            emitter: None,
            grid: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed scene implementing every host interface
#[derive(Debug, Default)]
pub struct MemoryScene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    assets: HashMap<String, NodeDesc>,
    grid_uploads: usize,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(description: SceneDescription) -> Self {
        Self {
            assets: description.assets,
            ..Self::default()
        }
    }

    /// Make `desc` instantiable under `name`
    pub fn register_asset(&mut self, name: impl Into<String>, desc: NodeDesc) {
        self.assets.insert(name.into(), desc);
    }

    pub fn with_asset(mut self, name: impl Into<String>, desc: NodeDesc) -> Self {
        self.register_asset(name, desc);
        self
    }

    pub fn asset_names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId::new(index, 0)
            }
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    /// Spawn the registered asset `asset` as a new root
    pub fn try_instantiate(&mut self, asset: &AssetRef) -> PreviewResult<ContentRoot> {
        let desc = self
            .assets
            .get(&asset.name)
            .cloned()
            .ok_or_else(|| PreviewError::InstantiationFailed {
                asset: asset.name.clone(),
            })?;
        Ok(self.spawn(&desc))
    }

    /// Create the subtree described by `desc` as a new root
    pub fn spawn(&mut self, desc: &NodeDesc) -> NodeId {
        self.spawn_under(desc, None)
    }

    fn spawn_under(&mut self, desc: &NodeDesc, parent: Option<NodeId>) -> NodeId {
        let mut node = Node::new(desc.name.clone());
        node.parent = parent;
        node.position = Vec3::from(desc.position);
        node.components = desc.components();
        node.mesh = desc.mesh.map(Vec3::from);
        node.emitter = desc.emitter.map(|desc| EmitterState {
            desc,
            time: 0.0,
            playing: false,
        });

        let id = self.allocate(node);
        for child in &desc.children {
            let child_id = self.spawn_under(child, Some(id));
            if let Some(node) = self.get_mut(id) {
                node.children.push(child_id);
            }
        }
        id
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.get(id).and_then(|node| node.parent);
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|&c| c != id);
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = self.children(id);
        for child in children {
            self.free_subtree(child);
        }
        if let Some(slot) = self.slots.get_mut(id.index() as usize) {
            if slot.generation == id.generation() && slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index());
            }
        }
    }

    /// World position and uniform scale of `id`
    fn world_transform(&self, id: NodeId) -> Option<(Vec3, f32)> {
        let node = self.get(id)?;
        Some(match node.parent.and_then(|p| self.world_transform(p)) {
            Some((parent_position, parent_scale)) => (
                parent_position + node.position * parent_scale,
                parent_scale * node.scale,
            ),
            None => (node.position, node.scale),
        })
    }

    /// True when `node` is `ancestor` or lies below it
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// True when `id` and all its ancestors are active
    pub fn is_active(&self, id: NodeId) -> bool {
        match self.get(id) {
            Some(node) if node.active => node.parent.map_or(true, |p| self.is_active(p)),
            _ => false,
        }
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|node| node.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn local_scale(&self, id: NodeId) -> Option<f32> {
        self.get(id).map(|node| node.scale)
    }

    pub fn in_render_scene(&self, id: NodeId) -> bool {
        self.get(id).map_or(false, |node| node.in_render_scene)
    }

    pub fn emitter_playing(&self, id: NodeId) -> bool {
        self.get(id)
            .and_then(|node| node.emitter.as_ref())
            .map_or(false, |emitter| emitter.playing)
    }

    pub fn grid_mesh(&self, id: NodeId) -> Option<&GridMesh> {
        self.get(id)?.grid.as_ref()?.mesh.as_ref()
    }

    pub fn grid_material(&self, id: NodeId) -> Option<&GridMaterial> {
        self.get(id)?.grid.as_ref().map(|grid| &grid.material)
    }

    /// Number of grid mesh uploads since creation
    pub fn grid_upload_count(&self) -> usize {
        self.grid_uploads
    }

    /// Number of live nodes
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }
}

impl SceneQuery for MemoryScene {
    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn components(&self, node: NodeId) -> ComponentFlags {
        self.get(node).map_or(ComponentFlags::NONE, |n| n.components)
    }

    fn render_bounds(&self, id: NodeId) -> Option<Bounds> {
        let node = self.get(id)?;
        let extents = match (&node.mesh, &node.emitter) {
            (Some(extents), _) => *extents,
            (None, Some(emitter)) => Vec3::splat(emitter.radius()),
            (None, None) => return None,
        };

        let (position, scale) = self.world_transform(id)?;
        Some(Bounds::new(position, extents * scale))
    }

    fn position(&self, node: NodeId) -> Vec3 {
        self.world_transform(node).map_or(Vec3::ZERO, |(position, _)| position)
    }
}

impl ParticleSimulator for MemoryScene {
    fn simulate(&mut self, emitter: NodeId, delta: f32, restart: bool) {
        if let Some(state) = self.get_mut(emitter).and_then(|n| n.emitter.as_mut()) {
            if restart {
                state.time = 0.0;
            }
            state.time += delta;
        }
    }

    fn play(&mut self, emitter: NodeId) {
        if let Some(state) = self.get_mut(emitter).and_then(|n| n.emitter.as_mut()) {
            state.playing = true;
        }
    }

    fn pause(&mut self, emitter: NodeId) {
        if let Some(state) = self.get_mut(emitter).and_then(|n| n.emitter.as_mut()) {
            state.playing = false;
        }
    }

    fn simulation_time(&self, emitter: NodeId) -> f32 {
        self.get(emitter)
            .and_then(|n| n.emitter.as_ref())
            .map_or(0.0, |state| state.time)
    }
}

impl SceneHost for MemoryScene {
    fn instantiate(&mut self, asset: &AssetRef) -> Option<ContentRoot> {
        match self.try_instantiate(asset) {
            Ok(root) => Some(root),
            Err(e) => {
                log::debug!("{}", e);
                None
            }
        }
    }

    fn destroy(&mut self, node: NodeId) {
        if !self.is_alive(node) {
            return;
        }
        self.detach(node);
        self.free_subtree(node);
    }

    fn move_to_render_scene(&mut self, node: NodeId) {
        if let Some(node) = self.get_mut(node) {
            node.in_render_scene = true;
        }
    }

    fn create_ui_canvas(&mut self) -> Option<NodeId> {
        Some(self.spawn(&NodeDesc::ui_canvas("PreviewCanvas")))
    }

    fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        if !self.is_alive(child) || !self.is_alive(parent) {
            return;
        }
        if self.is_ancestor_or_self(child, parent) {
            log::warn!("Refusing to parent {:?} under its own subtree", child);
            return;
        }
        self.detach(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    fn set_uniform_scale(&mut self, node: NodeId, scale: f32) {
        if let Some(node) = self.get_mut(node) {
            node.scale = scale;
        }
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) {
        if let Some(node) = self.get_mut(node) {
            node.position = position;
        }
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        if let Some(node) = self.get_mut(node) {
            node.active = active;
        }
    }

    fn create_grid_object(&mut self, material: &GridMaterial) -> Option<NodeId> {
        let mut node = Node::new("PreviewGrid");
        node.active = false;
        node.grid = Some(GridObject {
            material: *material,
            mesh: None,
        });
        Some(self.allocate(node))
    }

    fn upload_grid_mesh(&mut self, node: NodeId, mesh: &GridMesh) {
        if let Some(grid) = self.get_mut(node).and_then(|n| n.grid.as_mut()) {
            grid.mesh = Some(mesh.clone());
            self.grid_uploads += 1;
        }
    }
}

/// Render surface that records every request
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    fail_on_create: bool,
    surface_live: bool,
    creates: usize,
    releases: usize,
    requests: Vec<RenderRequest>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer whose surface can never be created
    pub fn unavailable() -> Self {
        Self {
            fail_on_create: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_surface_live(&self) -> bool {
        self.surface_live
    }

    pub fn create_count(&self) -> usize {
        self.creates
    }

    pub fn release_count(&self) -> usize {
        self.releases
    }

    pub fn requests(&self) -> &[RenderRequest] {
        &self.requests
    }

    pub fn last_request(&self) -> Option<&RenderRequest> {
        self.requests.last()
    }

    /// Drop the surface without a release, like a lost device.
    /// Rendering fails until the surface is created again.
    pub fn lose_surface(&mut self) {
        self.surface_live = false;
    }
}

impl RenderBackend for MemoryRenderer {
    fn create_surface(&mut self) -> PreviewResult<()> {
        if self.fail_on_create {
            return Err(PreviewError::RendererUnavailable(
                "offscreen surface creation is disabled".into(),
            ));
        }
        self.surface_live = true;
        self.creates += 1;
        Ok(())
    }

    fn render(&mut self, request: &RenderRequest) -> PreviewResult<TextureHandle> {
        if !self.surface_live {
            return Err(PreviewError::RendererUnavailable("no live surface".into()));
        }
        self.requests.push(request.clone());
        Ok(TextureHandle(self.requests.len() as u64))
    }

    fn release_surface(&mut self) {
        if self.surface_live {
            self.surface_live = false;
            self.releases += 1;
        }
    }
}

/// Preference sink keeping every saved value; clones share the record
#[derive(Clone, Debug, Default)]
pub struct RecordingPreferences {
    saved: Rc<RefCell<Vec<ViewPreferences>>>,
}

impl RecordingPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<ViewPreferences> {
        self.saved.borrow().clone()
    }

    pub fn last(&self) -> Option<ViewPreferences> {
        self.saved.borrow().last().copied()
    }
}

impl PreferenceSink for RecordingPreferences {
    fn save(&mut self, preferences: &ViewPreferences) -> PreviewResult<()> {
        self.saved.borrow_mut().push(*preferences);
        Ok(())
    }
}

/// Status sink keeping every message; clones share the record
#[derive(Clone, Debug, Default)]
pub struct RecordingStatus {
    messages: Rc<RefCell<Vec<StatusMessage>>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<StatusMessage> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<StatusMessage> {
        self.messages.borrow().last().cloned()
    }
}

impl StatusSink for RecordingStatus {
    fn publish(&mut self, message: &StatusMessage) {
        self.messages.borrow_mut().push(message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_invalidates_handles() {
        let mut scene = MemoryScene::new();
        let root =
            scene.spawn(&NodeDesc::empty("root").with_children(vec![NodeDesc::empty("child")]));
        let child = scene.children(root)[0];
        assert_eq!(scene.live_count(), 2);

        scene.destroy(root);
        assert!(!scene.is_alive(root));
        assert!(!scene.is_alive(child));
        assert_eq!(scene.live_count(), 0);

        // Reused slot gets a new generation
        let fresh = scene.spawn(&NodeDesc::empty("fresh"));
        assert_eq!(fresh.index(), root.index());
        assert_ne!(fresh, root);
        assert!(!scene.is_alive(root));
        assert_eq!(scene.name(fresh), Some("fresh"));
    }

    #[test]
    fn test_world_transform_follows_parent() {
        let mut scene = MemoryScene::new();
        let canvas = scene.spawn(&NodeDesc::ui_canvas("canvas").at([1.0, 0.0, 0.0]));
        let panel = scene.spawn(&NodeDesc::mesh("panel", [100.0, 0.0, 0.0], [50.0, 50.0, 0.0]));

        scene.set_parent(panel, canvas);
        scene.set_uniform_scale(canvas, 0.01);
        let bounds = scene.render_bounds(panel).unwrap();
        assert!(bounds.center.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
        assert!(bounds.extents.abs_diff_eq(Vec3::new(0.5, 0.5, 0.0), 1e-5));
        assert_eq!(scene.parent(panel), Some(canvas));
    }

    #[test]
    fn test_emitter_cloud_grows_for_one_lifetime() {
        let mut scene = MemoryScene::new();
        let e = scene.spawn(&NodeDesc::emitter("e", [0.0; 3], 2.0));
        assert_eq!(scene.render_bounds(e).unwrap().radius(), 0.0);

        scene.simulate(e, 0.5, false);
        assert!((scene.render_bounds(e).unwrap().extents.x - 1.0).abs() < 1e-6);
        scene.simulate(e, 5.0, false);
        assert!((scene.render_bounds(e).unwrap().extents.x - 2.0).abs() < 1e-6);
        scene.simulate(e, 0.0, true);
        assert_eq!(scene.simulation_time(e), 0.0);
    }

    #[test]
    fn test_unknown_asset_fails_instantiation() {
        let mut scene =
            MemoryScene::new().with_asset("cube", NodeDesc::mesh("cube", [0.0; 3], [0.5; 3]));
        assert!(scene.instantiate(&AssetRef::new("cube")).is_some());
        assert!(scene.instantiate(&AssetRef::new("missing")).is_none());

        match scene.try_instantiate(&AssetRef::new("missing")) {
            Err(PreviewError::InstantiationFailed { asset }) => assert_eq!(asset, "missing"),
            other => panic!("expected InstantiationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut scene = MemoryScene::new();
        let leaf = NodeDesc::empty("leaf");
        let mid = NodeDesc::empty("mid").with_children(vec![leaf]);
        let root = scene.spawn(&NodeDesc::empty("root").with_children(vec![mid]));
        let mid = scene.children(root)[0];
        let leaf = scene.children(mid)[0];

        scene.set_parent(root, leaf);
        scene.set_parent(mid, mid);
        assert_eq!(scene.parent(root), None);
        assert_eq!(scene.parent(mid), Some(root));
        assert!(scene.children(leaf).is_empty());

        // Hierarchy is still finite
        assert_eq!(crate::hierarchy::descendants(&scene, root).count(), 3);
        scene.destroy(root);
        assert_eq!(scene.live_count(), 0);
    }

    #[test]
    fn test_scene_description_json() {
        let json = r#"{
            "assets": {
                "fx": {
                    "name": "fx",
                    "children": [ { "name": "sparks", "emitter": { "speed": 3.0 } } ]
                }
            }
        }"#;
        let description = SceneDescription::from_json(json).unwrap();
        let sparks = &description.assets["fx"].children[0];
        assert_eq!(sparks.emitter.unwrap().speed, 3.0);
        assert_eq!(sparks.emitter.unwrap().lifetime, 1.0);

        let bad = r#"{ "assets": { "x": { "emitter": { "speed": -1.0 } } } }"#;
        assert!(matches!(SceneDescription::from_json(bad), Err(PreviewError::InvalidScene(_))));
        assert!(matches!(SceneDescription::from_json("{"), Err(PreviewError::Serialization(_))));
    }

    #[test]
    fn test_renderer_lifecycle() {
        let mut renderer = MemoryRenderer::unavailable();
        assert!(renderer.create_surface().is_err());
        assert!(!renderer.is_surface_live());

        let mut renderer = MemoryRenderer::new();
        renderer.create_surface().unwrap();
        renderer.release_surface();
        renderer.release_surface();
        assert_eq!(renderer.release_count(), 1);

        renderer.create_surface().unwrap();
        renderer.lose_surface();
        let request = RenderRequest {
            rect: crate::host::ViewRect::sized(8.0, 8.0),
            camera: crate::camera::CameraController::new(Default::default()).compose_pose(),
            lighting_enabled: true,
        };
        assert!(matches!(renderer.render(&request), Err(PreviewError::RendererUnavailable(_))));
        renderer.create_surface().unwrap();
        assert!(renderer.render(&request).is_ok());
    }
}
