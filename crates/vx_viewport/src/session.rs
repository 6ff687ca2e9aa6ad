//! Viewport session: owns the previewed content and drives every frame.

use crate::bounds::compute_bounds;
use crate::camera::{CameraController, ViewAxis, ZoomOutcome};
use crate::classifier::classify;
use crate::config::ViewportConfig;
use crate::content::{AssetRef, ContentRoot, ContentType, NodeId};
use crate::error::PreviewResult;
use crate::grid::GridLayer;
use crate::host::{RenderBackend, RenderRequest, SceneHost, TextureHandle, ViewRect};
use crate::input::{CameraCommand, InputTracker, ViewportInput};
use crate::particles::{ParticleDriver, PlaybackState};
use crate::preferences::{PreferenceSink, ViewPreferences};
use crate::status::{DisplayMode, StatusMessage, StatusSink};

/// Result of a draw call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOutput {
    /// Rendered scene, ready to blit
    Texture(TextureHandle),
    /// Nothing to render; show this message instead
    Placeholder(StatusMessage),
    /// Zero-sized rect
    Skipped,
}

/// Which host controls are enabled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlStates {
    pub frame: bool,
    pub reset: bool,
    pub auto_rotate: bool,
    pub particle_playback: bool,
    /// Play/pause shows "pause" when true
    pub particles_playing: bool,
}

/// One active preview.
///
/// All auxiliary resources (grid object, UI canvas, render surface) are
/// acquired lazily and released explicitly by [`ViewportSession::shutdown`],
/// which also runs on drop.
pub struct ViewportSession<H: SceneHost, R: RenderBackend> {
    host: H,
    renderer: R,
    surface_live: bool,
    camera: CameraController,
    particles: ParticleDriver,
    grid: GridLayer,
    input: InputTracker,
    preferences: ViewPreferences,
    preference_sink: Option<Box<dyn PreferenceSink>>,
    status_sink: Option<Box<dyn StatusSink>>,
    content: Option<ContentRoot>,
    ui_root: Option<NodeId>,
    asset: Option<AssetRef>,
    content_type: ContentType,
    display: DisplayMode,
    status: StatusMessage,
    auto_rotate: bool,
}

impl<H: SceneHost, R: RenderBackend> ViewportSession<H, R> {
    pub fn new(host: H, renderer: R, config: ViewportConfig, preferences: ViewPreferences) -> Self {
        let mut camera = CameraController::new(config);
        camera.set_view_axis(preferences.view_axis);

        Self {
            host,
            renderer,
            surface_live: false,
            camera,
            particles: ParticleDriver::new(),
            grid: GridLayer::new(),
            input: InputTracker::new(),
            preferences,
            preference_sink: None,
            status_sink: None,
            content: None,
            ui_root: None,
            asset: None,
            content_type: ContentType::None,
            display: DisplayMode::None,
            status: StatusMessage::NoSelection,
            auto_rotate: false,
        }
    }

    /// Write preference changes through `sink`
    pub fn with_preference_sink(mut self, sink: impl PreferenceSink + 'static) -> Self {
        self.preference_sink = Some(Box::new(sink));
        self
    }

    /// Publish status changes to `sink`
    pub fn with_status_sink(mut self, sink: impl StatusSink + 'static) -> Self {
        self.status_sink = Some(Box::new(sink));
        self
    }

    // =========================================================================
    // Load / unload
    // =========================================================================

    /// Replace the current content with `asset`.
    ///
    /// Failures leave the session interactive in `DisplayMode::Unavailable`
    /// with a status message; nothing is retried until the next load.
    pub fn load(&mut self, asset: Option<&AssetRef>) -> DisplayMode {
        self.clear_content();

        let Some(asset) = asset else {
            self.set_status(StatusMessage::NoSelection);
            self.sync_controls();
            return self.display;
        };
        self.asset = Some(asset.clone());

        if let Err(e) = self.ensure_surface() {
            log::warn!("Cannot preview {}: {}", asset.name, e);
            self.display = DisplayMode::Unavailable;
            self.set_status(StatusMessage::RendererUnavailable);
            self.sync_controls();
            return self.display;
        }

        let Some(root) = self.host.instantiate(asset) else {
            log::warn!("Scene host could not instantiate {}", asset.name);
            self.display = DisplayMode::Unavailable;
            self.set_status(StatusMessage::InstantiationFailed {
                asset: asset.name.clone(),
            });
            self.sync_controls();
            return self.display;
        };

        self.host.move_to_render_scene(root);
        self.content = Some(root);
        self.content_type = classify(&self.host, root);
        self.display = DisplayMode::Scene;
        self.camera.set_content_type(self.content_type);

        if self.content_type == ContentType::Ugui {
            self.attach_ui_canvas(root);
        }

        if self.content_type == ContentType::Particle {
            self.particles.collect(&self.host, root);
            let warm_up = self.camera.config().warm_up;
            self.particles.warm_up(&mut self.host, &warm_up);
        }

        self.reframe(true);
        self.camera.snap_to_axis(self.preferences.view_axis);
        self.particles.restart(&mut self.host);

        log::info!("Loaded {} as {}", asset.name, self.content_type);
        self.set_status(StatusMessage::Content {
            asset: asset.name.clone(),
            content_type: self.content_type,
        });
        self.sync_controls();
        self.update_grid();
        self.display
    }

    fn attach_ui_canvas(&mut self, root: ContentRoot) {
        match self.host.create_ui_canvas() {
            Some(canvas) => {
                self.host.move_to_render_scene(canvas);
                self.host.set_parent(root, canvas);
                self.host.set_uniform_scale(canvas, self.camera.content_scale());
                self.ui_root = Some(canvas);
            }
            None => log::warn!("Scene host could not create a UI canvas; UI zoom is disabled"),
        }
    }

    /// Destroy the current content and everything created for it
    pub fn unload(&mut self) {
        self.clear_content();
        if self.status != StatusMessage::NoSelection {
            self.set_status(StatusMessage::NoSelection);
        }
        self.sync_controls();
    }

    fn clear_content(&mut self) {
        if let Some(root) = self.content.take() {
            self.host.destroy(root);
        }
        if let Some(canvas) = self.ui_root.take() {
            self.host.destroy(canvas);
        }

        self.particles.clear();
        self.asset = None;
        self.content_type = ContentType::None;
        self.display = DisplayMode::None;
        self.camera.set_content_type(ContentType::None);
        self.update_grid();
    }

    fn ensure_surface(&mut self) -> PreviewResult<()> {
        if !self.surface_live {
            self.renderer.create_surface()?;
            self.surface_live = true;
        }
        Ok(())
    }

    // =========================================================================
    // Per-frame
    // =========================================================================

    /// Advance time by `delta` seconds
    pub fn tick(&mut self, delta: f32) {
        if self.display != DisplayMode::Scene {
            return;
        }

        if self.auto_rotate && self.content_type.behavior().auto_rotate {
            let speed = self.camera.config().auto_rotate_speed;
            self.camera.rotate_yaw(delta * speed);
        }

        if self.particles.is_playing() {
            self.particles.tick(&mut self.host, delta);
            if let Some(root) = self.content {
                let bounds = compute_bounds(&self.host, root);
                self.camera.refresh_clip_bounds(&bounds);
            }
        }
    }

    /// Render into `rect`, or describe the placeholder to show
    pub fn draw(&mut self, rect: ViewRect) -> DrawOutput {
        if rect.is_empty() {
            return DrawOutput::Skipped;
        }

        if self.display != DisplayMode::Scene {
            return DrawOutput::Placeholder(self.status.clone());
        }

        self.camera.set_preview_size(rect.width, rect.height);
        let request = RenderRequest {
            rect,
            camera: self.camera.compose_pose(),
            lighting_enabled: self.preferences.lighting_enabled,
        };

        match self.renderer.render(&request) {
            Ok(texture) => DrawOutput::Texture(texture),
            Err(e) => {
                log::warn!("Preview render failed: {}", e);
                // Recreated by the next load
                self.renderer.release_surface();
                self.surface_live = false;
                self.display = DisplayMode::Unavailable;
                self.set_status(StatusMessage::RendererUnavailable);
                self.sync_controls();
                self.update_grid();
                DrawOutput::Placeholder(self.status.clone())
            }
        }
    }

    /// Record the preview area size used for aspect and pan scaling
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_preview_size(width, height);
        self.camera.derive_clip_planes();
    }

    // =========================================================================
    // Input and commands
    // =========================================================================

    /// Feed a raw input event; returns true when it moved the camera
    pub fn handle_input(&mut self, input: ViewportInput) -> bool {
        match self.input.handle(input, self.display == DisplayMode::Scene) {
            Some(command) => self.apply(command),
            None => false,
        }
    }

    /// Apply a camera command; ignored unless a scene is displayed
    pub fn apply(&mut self, command: CameraCommand) -> bool {
        if self.display != DisplayMode::Scene {
            return false;
        }

        match command {
            CameraCommand::Orbit(delta) => self.camera.orbit(delta),
            CameraCommand::Pan(delta) => self.camera.pan(delta),
            CameraCommand::Zoom(delta) => {
                if let ZoomOutcome::ContentScale(scale) = self.camera.zoom(delta) {
                    if let Some(canvas) = self.ui_root {
                        self.host.set_uniform_scale(canvas, scale);
                    }
                }
                true
            }
            CameraCommand::Frame { recenter } => {
                self.frame_content(recenter);
                true
            }
            CameraCommand::ResetView => {
                self.reset_view();
                true
            }
        }
    }

    /// Recompute bounds and fit the camera to them
    pub fn frame_content(&mut self, recenter: bool) {
        if self.content.is_none() {
            return;
        }
        self.reframe(recenter);
        self.update_grid();
    }

    fn reframe(&mut self, recenter: bool) {
        let Some(root) = self.content else {
            return;
        };
        let host = &self.host;
        let bounds = self.camera.framing_bounds(|| compute_bounds(host, root));
        self.camera.frame_content(bounds, recenter);
    }

    /// Initial orbit angles, then a recentered frame
    pub fn reset_view(&mut self) {
        if self.content.is_none() {
            return;
        }
        self.camera.reset_orbit();
        self.frame_content(true);
    }

    /// Snap to `axis` and remember it.
    ///
    /// Without a displayed scene only the remembered axis changes.
    pub fn snap_to_axis(&mut self, axis: ViewAxis) {
        if self.display == DisplayMode::Scene {
            self.auto_rotate = false;
            self.camera.snap_to_axis(axis);
        } else {
            self.camera.set_view_axis(axis);
        }

        self.preferences.view_axis = axis;
        self.persist_preferences();
    }

    /// Enable or disable auto-rotate. Returns the resulting state, which is
    /// always false when the content does not allow it.
    pub fn set_auto_rotate(&mut self, enabled: bool) -> bool {
        self.auto_rotate = enabled && self.auto_rotate_allowed();
        self.auto_rotate
    }

    fn auto_rotate_allowed(&self) -> bool {
        self.display == DisplayMode::Scene && self.content_type.behavior().auto_rotate
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.preferences.grid_visible = visible;
        self.persist_preferences();
        self.update_grid();
    }

    pub fn set_lighting_enabled(&mut self, enabled: bool) {
        self.preferences.lighting_enabled = enabled;
        self.persist_preferences();
    }

    /// Play or pause every emitter; particle content only
    pub fn toggle_particle_play(&mut self) {
        if self.particle_controls_enabled() {
            self.particles.toggle_play(&mut self.host);
        }
    }

    /// Rewind and play every emitter; particle content only
    pub fn restart_particles(&mut self) {
        if self.particle_controls_enabled() {
            self.particles.restart(&mut self.host);
        }
    }

    fn particle_controls_enabled(&self) -> bool {
        self.display == DisplayMode::Scene && self.content_type.behavior().particle_controls
    }

    pub fn control_states(&self) -> ControlStates {
        let scene = self.display == DisplayMode::Scene;
        ControlStates {
            frame: scene,
            reset: scene,
            auto_rotate: self.auto_rotate_allowed(),
            particle_playback: self.particle_controls_enabled(),
            particles_playing: self.particles.state() == PlaybackState::Playing,
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn sync_controls(&mut self) {
        if !self.auto_rotate_allowed() {
            self.auto_rotate = false;
        }
    }

    fn update_grid(&mut self) {
        let wanted = self.preferences.grid_visible
            && self.display == DisplayMode::Scene
            && self.content_type.behavior().shows_grid;
        let bounds = *self.camera.bounds();
        self.grid.update(&mut self.host, &bounds, wanted);
    }

    fn set_status(&mut self, status: StatusMessage) {
        if let Some(sink) = self.status_sink.as_mut() {
            sink.publish(&status);
        }
        self.status = status;
    }

    fn persist_preferences(&mut self) {
        if let Some(sink) = self.preference_sink.as_mut() {
            if let Err(e) = sink.save(&self.preferences) {
                log::warn!("Failed to save view preferences: {}", e);
            }
        }
    }

    /// Release the content, the grid and the render surface
    pub fn shutdown(&mut self) {
        self.clear_content();
        self.grid.release(&mut self.host);
        if self.surface_live {
            self.renderer.release_surface();
            self.surface_live = false;
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn particles(&self) -> &ParticleDriver {
        &self.particles
    }

    pub fn grid(&self) -> &GridLayer {
        &self.grid
    }

    pub fn content_root(&self) -> Option<ContentRoot> {
        self.content
    }

    pub fn ui_root(&self) -> Option<NodeId> {
        self.ui_root
    }

    pub fn asset(&self) -> Option<&AssetRef> {
        self.asset.as_ref()
    }

    #[inline]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    #[inline]
    pub fn display_mode(&self) -> DisplayMode {
        self.display
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    pub fn preferences(&self) -> &ViewPreferences {
        &self.preferences
    }

    #[inline]
    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    #[inline]
    pub fn is_surface_live(&self) -> bool {
        self.surface_live
    }
}

impl<H: SceneHost, R: RenderBackend> Drop for ViewportSession<H, R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
