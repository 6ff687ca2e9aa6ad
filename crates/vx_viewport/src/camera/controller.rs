//! Camera controller: orbit, pan, zoom, framing and clip planes.

use glam::{Mat4, Quat, Vec2, Vec3};
use vx_math::consts::EPSILON;
use vx_math::projection::{aspect_ratio, sphere_fit_distance};
use vx_math::{approx_eq, orbit_eye, orbit_rotation, Bounds, CameraBasis, Projection};

use super::behavior::{ClipCenter, ContentBehavior, FramingMode, PanMode, ZoomMode};
use super::state::{CameraState, ViewAxis};
use crate::config::ViewportConfig;
use crate::content::ContentType;

/// Smallest radius used when solving a fitting distance
const MIN_FRAMING_RADIUS: f32 = 0.001;
/// Smallest radius used for clip-plane padding
const MIN_CLIP_RADIUS: f32 = 0.01;
const MIN_NEAR_CLIP: f32 = 0.01;
const MIN_CLIP_RANGE: f32 = 0.1;

/// Camera pose and projection ready to hand to a render surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub rotation: Quat,
    pub projection: Projection,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl CameraFrame {
    /// Unit vector the camera looks along
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix(self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Result of a zoom step
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomOutcome {
    /// The orbit distance changed
    Distance(f32),
    /// The content root must be rescaled to this uniform scale
    ContentScale(f32),
}

/// Turns input deltas and content bounds into a camera pose.
///
/// Content-dependent behavior comes from the [`ContentBehavior`] table of the
/// current content type.
#[derive(Clone, Debug)]
pub struct CameraController {
    config: ViewportConfig,
    state: CameraState,
    content_type: ContentType,
    /// Bounds the camera is framed on
    bounds: Bounds,
    /// Bounding radius used for clip-plane padding
    clip_radius: f32,
    preview_size: Vec2,
    content_scale: f32,
}

impl CameraController {
    pub fn new(config: ViewportConfig) -> Self {
        let state = CameraState::new(&config);
        let bounds = Bounds::default();
        Self {
            config,
            state,
            content_type: ContentType::None,
            clip_radius: bounds.radius(),
            bounds,
            preview_size: Vec2::ZERO,
            content_scale: 1.0,
        }
    }

    #[inline]
    fn behavior(&self) -> &'static ContentBehavior {
        self.content_type.behavior()
    }

    /// Switch to a new content type and set up its projection
    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
        let behavior = self.behavior();

        self.state.projection = match behavior.framing {
            FramingMode::FitSphere => Projection::Perspective {
                fov_y_degrees: self.config.field_of_view,
            },
            FramingMode::FixedOrtho { ortho_size, .. } => {
                Projection::Orthographic { size: ortho_size }
            }
        };

        self.content_scale = match behavior.zoom {
            ZoomMode::RescaleContent { initial_scale, .. } => initial_scale,
            ZoomMode::Dolly => 1.0,
        };
    }

    /// Record the pixel size of the preview area
    pub fn set_preview_size(&mut self, width: f32, height: f32) {
        self.preview_size = Vec2::new(width.max(0.0), height.max(0.0));
    }

    #[inline]
    fn aspect(&self) -> f32 {
        aspect_ratio(self.preview_size.x, self.preview_size.y)
    }

    /// Rotate around the target by a pixel delta. Returns false when the
    /// content type has no orbit.
    pub fn orbit(&mut self, delta: Vec2) -> bool {
        if !self.behavior().orbit {
            return false;
        }

        let sensitivity = self.config.orbit_sensitivity;
        let limit = self.config.pitch_limit;
        let angles = &mut self.state.orbit_angles;
        angles.x = (angles.x + delta.y * sensitivity).clamp(-limit, limit);
        angles.y += delta.x * sensitivity;
        true
    }

    /// Add the world offset for a pixel drag to the pan offset
    pub fn pan(&mut self, delta: Vec2) -> bool {
        if self.preview_size.x <= 0.0 || self.preview_size.y <= 0.0 {
            return false;
        }

        let offset = match self.behavior().pan {
            PanMode::FixedScale { world_per_pixel } => {
                Vec3::new(-delta.x * world_per_pixel, delta.y * world_per_pixel, 0.0)
            }
            PanMode::Frustum => {
                let (view_width, view_height) = self
                    .state
                    .projection
                    .visible_extent(self.state.distance, self.aspect());
                let basis = self.basis();
                let dx = -delta.x / self.preview_size.x * view_width;
                let dy = delta.y / self.preview_size.y * view_height;
                basis.right * dx + basis.up * dy
            }
        };

        self.state.pan_offset += offset;
        true
    }

    /// Zoom by a normalized wheel delta
    pub fn zoom(&mut self, delta: f32) -> ZoomOutcome {
        let outcome = match self.behavior().zoom {
            ZoomMode::Dolly => {
                self.state.distance =
                    self.config.clamp_distance(self.state.distance * (1.0 + delta));
                ZoomOutcome::Distance(self.state.distance)
            }
            ZoomMode::RescaleContent {
                min_step,
                max_step,
                min_scale,
                max_scale,
                ..
            } => {
                let factor = (1.0 + delta).clamp(min_step, max_step);
                self.content_scale = (self.content_scale * factor).clamp(min_scale, max_scale);
                ZoomOutcome::ContentScale(self.content_scale)
            }
        };

        self.derive_clip_planes();
        outcome
    }

    /// Bounds to frame for the current content type.
    ///
    /// Fixed-ortho content always frames its fixed box and never calls
    /// `compute`.
    pub fn framing_bounds(&self, compute: impl FnOnce() -> Bounds) -> Bounds {
        match self.behavior().framing {
            FramingMode::FixedOrtho { bounds_size, .. } => {
                Bounds::from_center_size(Vec3::ZERO, bounds_size)
            }
            FramingMode::FitSphere => compute(),
        }
    }

    /// Frame `bounds`: solve the distance that fits its bounding sphere and
    /// derive clip planes. `recenter` drops the pan offset.
    pub fn frame_content(&mut self, bounds: Bounds, recenter: bool) {
        self.bounds = bounds;
        self.clip_radius = bounds.radius();
        if recenter {
            self.state.pan_offset = Vec3::ZERO;
        }

        if let (FramingMode::FitSphere, Projection::Perspective { fov_y_degrees }) =
            (self.behavior().framing, self.state.projection)
        {
            let radius = bounds.radius().max(MIN_FRAMING_RADIUS);
            let fit = sphere_fit_distance(radius, fov_y_degrees, self.aspect());
            self.state.distance = self.config.clamp_distance(fit * self.config.frame_margin);
        }

        self.derive_clip_planes();

        log::debug!(
            "Framed {} content: radius {:.3}, distance {:.3}, clip [{:.3}, {:.3}]",
            self.content_type,
            bounds.radius(),
            self.state.distance,
            self.state.near_clip,
            self.state.far_clip
        );
    }

    /// Update the radius used for clip planes without reframing
    pub fn refresh_clip_bounds(&mut self, bounds: &Bounds) {
        let radius = bounds.radius();
        if !approx_eq(radius, self.clip_radius, EPSILON) {
            self.clip_radius = radius;
            self.derive_clip_planes();
        }
    }

    /// Snap to a canonical axis pose and drop the pan offset
    pub fn snap_to_axis(&mut self, axis: ViewAxis) {
        self.state.view_axis = axis;
        self.state.pan_offset = Vec3::ZERO;
        self.state.orbit_angles = axis.orbit_angles();
    }

    /// Set the remembered axis without moving the camera
    pub fn set_view_axis(&mut self, axis: ViewAxis) {
        self.state.view_axis = axis;
    }

    /// Back to the initial orbit angles; the caller reframes
    pub fn reset_orbit(&mut self) {
        self.state.orbit_angles = self.config.initial_orbit_angles();
    }

    /// Advance yaw by `degrees`
    pub fn rotate_yaw(&mut self, degrees: f32) {
        self.state.orbit_angles.y += degrees;
    }

    /// Point the camera is looking at
    pub fn target(&self) -> Vec3 {
        self.bounds.center + self.state.pan_offset
    }

    fn rotation(&self) -> Quat {
        match self.behavior().framing {
            FramingMode::FixedOrtho { .. } => Quat::IDENTITY,
            FramingMode::FitSphere => orbit_rotation(self.state.pitch(), self.state.yaw()),
        }
    }

    fn basis(&self) -> CameraBasis {
        CameraBasis::from_rotation(self.rotation())
    }

    fn eye(&self) -> Vec3 {
        match self.behavior().framing {
            FramingMode::FixedOrtho { camera_offset, .. } => camera_offset + self.state.pan_offset,
            FramingMode::FitSphere => {
                orbit_eye(self.target(), self.rotation(), self.state.distance)
            }
        }
    }

    /// Pose and projection for the current state
    pub fn compose_pose(&self) -> CameraFrame {
        CameraFrame {
            position: self.eye(),
            rotation: self.rotation(),
            projection: self.state.projection,
            near: self.state.near_clip,
            far: self.state.far_clip,
            aspect: self.aspect(),
        }
    }

    /// Place near/far around the target with padding proportional to the
    /// content radius
    pub fn derive_clip_planes(&mut self) {
        let behavior = self.behavior();
        let center_distance = match behavior.clip_center {
            ClipCenter::CameraToTarget => self.eye().distance(self.target()),
            ClipCenter::OrbitDistance => self.state.distance,
        };

        let radius = self.clip_radius.max(MIN_CLIP_RADIUS);
        let padding = radius * behavior.clip_padding;
        let near = (center_distance - padding).max(MIN_NEAR_CLIP);
        let far = (center_distance + padding).max(near + MIN_CLIP_RANGE);

        self.state.near_clip = near;
        self.state.far_clip = far;
    }

    #[inline]
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    #[inline]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Display scale of rescaled content
    #[inline]
    pub fn content_scale(&self) -> f32 {
        self.content_scale
    }

    #[inline]
    pub fn preview_size(&self) -> Vec2 {
        self.preview_size
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn controller(content_type: ContentType) -> CameraController {
        let mut controller = CameraController::default();
        controller.set_content_type(content_type);
        controller.set_preview_size(400.0, 400.0);
        controller
    }

    /// Bounds whose extents have length `radius`
    fn sphere_bounds(radius: f32) -> Bounds {
        Bounds::new(Vec3::ZERO, Vec3::new(radius, 0.0, 0.0))
    }

    #[test]
    fn test_pitch_stays_clamped() {
        let mut c = controller(ContentType::Model);
        for _ in 0..100 {
            c.orbit(Vec2::new(3.0, 1_000.0));
        }
        assert_eq!(c.state().pitch(), 80.0);
        for _ in 0..100 {
            c.orbit(Vec2::new(0.0, -1e6));
        }
        assert_eq!(c.state().pitch(), -80.0);
    }

    #[test]
    fn test_orbit_applies_sensitivity() {
        let mut c = controller(ContentType::Model);
        assert!(c.orbit(Vec2::new(10.0, 5.0)));
        assert_relative_eq!(c.state().yaw(), -118.0);
        assert_relative_eq!(c.state().pitch(), 16.0);
    }

    #[test]
    fn test_ugui_ignores_orbit() {
        let mut c = controller(ContentType::Ugui);
        let before = c.state().orbit_angles;
        assert!(!c.orbit(Vec2::new(50.0, 50.0)));
        assert_eq!(c.state().orbit_angles, before);
    }

    #[test]
    fn test_dolly_zoom_clamped() {
        let mut c = controller(ContentType::Model);
        for _ in 0..200 {
            c.zoom(0.25);
        }
        assert_eq!(c.state().distance, 20_000.0);
        for _ in 0..500 {
            c.zoom(-0.25);
        }
        assert_eq!(c.state().distance, 0.05);
    }

    #[test]
    fn test_ui_zoom_rescales_content() {
        let mut c = controller(ContentType::Ugui);
        let distance = c.state().distance;
        assert_eq!(c.content_scale(), 0.0025);

        assert_eq!(c.zoom(5.0), ZoomOutcome::ContentScale(0.0025 * 1.5));
        for _ in 0..50 {
            c.zoom(5.0);
        }
        assert_eq!(c.content_scale(), 0.02);
        for _ in 0..50 {
            c.zoom(-5.0);
        }
        assert_eq!(c.content_scale(), 0.0005);
        assert_eq!(c.state().distance, distance);
    }

    #[test]
    fn test_frame_fits_sphere() {
        let mut c = controller(ContentType::Model);
        c.frame_content(sphere_bounds(2.0), true);

        let state = c.state();
        assert_relative_eq!(state.distance, 4.2, epsilon = 1e-3);
        assert_relative_eq!(state.near_clip, 1.7, epsilon = 1e-3);
        assert_relative_eq!(state.far_clip, 6.7, epsilon = 1e-3);
    }

    #[test]
    fn test_frame_is_idempotent() {
        let mut c = controller(ContentType::Particle);
        let bounds = Bounds::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.3, 4.0, 1.2));
        c.frame_content(bounds, true);
        let first = *c.state();
        c.frame_content(bounds, true);
        assert_eq!(c.state().distance, first.distance);
        assert_eq!(c.state().near_clip, first.near_clip);
    }

    #[test]
    fn test_frame_distance_clamped() {
        let mut c = controller(ContentType::Model);
        c.frame_content(sphere_bounds(1e7), true);
        assert_eq!(c.state().distance, 20_000.0);

        c.frame_content(sphere_bounds(0.0), true);
        assert_eq!(c.state().distance, 0.05);
        assert!(c.state().near_clip > 0.0);
        assert!(c.state().far_clip >= c.state().near_clip + 0.1 - 1e-6);
    }

    #[test]
    fn test_particle_padding() {
        let mut c = controller(ContentType::Particle);
        c.frame_content(sphere_bounds(2.0), true);
        let state = c.state();
        assert_relative_eq!(state.far_clip - state.distance, 4.0, epsilon = 1e-3);
    }

    #[test]
    fn test_recenter_drops_pan() {
        let mut c = controller(ContentType::Model);
        c.frame_content(sphere_bounds(1.0), true);
        assert!(c.pan(Vec2::new(20.0, 10.0)));
        assert_ne!(c.state().pan_offset, Vec3::ZERO);

        c.frame_content(sphere_bounds(1.0), false);
        assert_ne!(c.state().pan_offset, Vec3::ZERO);
        c.frame_content(sphere_bounds(1.0), true);
        assert_eq!(c.state().pan_offset, Vec3::ZERO);
    }

    #[test]
    fn test_pan_moves_along_camera_plane() {
        let mut c = controller(ContentType::Model);
        c.snap_to_axis(ViewAxis::Z);
        c.frame_content(sphere_bounds(1.0), true);

        // Full-width drag to the right moves the target by one view width to the left
        c.pan(Vec2::new(400.0, 0.0));
        let (width, _) = c.state().projection.visible_extent(c.state().distance, 1.0);
        let offset = c.state().pan_offset;
        assert_relative_eq!(offset.x, -width, epsilon = 1e-4);
        assert_relative_eq!(offset.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pan_needs_preview_size() {
        let mut c = CameraController::default();
        c.set_content_type(ContentType::Model);
        assert!(!c.pan(Vec2::new(5.0, 5.0)));
        assert_eq!(c.state().pan_offset, Vec3::ZERO);
    }

    #[test]
    fn test_ui_pan_fixed_scale() {
        let mut c = controller(ContentType::Ugui);
        c.pan(Vec2::new(100.0, 40.0));
        assert!(c.state().pan_offset.abs_diff_eq(Vec3::new(-0.25, 0.1, 0.0), 1e-6));
    }

    #[test]
    fn test_snap_to_axis_is_exact() {
        let mut c = controller(ContentType::Model);
        c.frame_content(sphere_bounds(1.0), true);
        c.orbit(Vec2::new(33.0, 12.0));
        c.pan(Vec2::new(7.0, 3.0));

        c.snap_to_axis(ViewAxis::Y);
        assert_eq!(c.state().orbit_angles, Vec2::new(-90.0, 0.0));
        assert_eq!(c.state().pan_offset, Vec3::ZERO);
        assert_eq!(c.state().view_axis, ViewAxis::Y);
    }

    #[test]
    fn test_pose_looks_at_target() {
        let mut c = controller(ContentType::Model);
        let bounds = Bounds::new(Vec3::new(3.0, 1.0, -2.0), Vec3::ONE);
        c.frame_content(bounds, true);

        let frame = c.compose_pose();
        let to_target = (c.target() - frame.position).normalize();
        assert!(to_target.abs_diff_eq(frame.forward(), 1e-4));
        assert_relative_eq!(
            frame.position.distance(c.target()),
            c.state().distance,
            epsilon = 1e-3
        );

        // Target sits on the view-space +Z axis
        let view = frame.view_matrix().transform_point3(c.target());
        assert_relative_eq!(view.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(view.y, 0.0, epsilon = 1e-3);
        assert!(view.z > 0.0);
    }

    #[test]
    fn test_ui_pose_fixed_ortho() {
        let mut c = controller(ContentType::Ugui);
        let bounds = c.framing_bounds(|| panic!("fixed framing must not compute bounds"));
        assert_eq!(bounds.size(), Vec3::new(1.0, 1.0, 0.1));
        c.frame_content(bounds, true);

        let frame = c.compose_pose();
        assert_eq!(frame.position, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(frame.rotation, Quat::IDENTITY);
        assert_eq!(frame.projection, Projection::Orthographic { size: 1.2 });

        // Clip planes straddle the 4 unit camera-to-target distance
        let padding = bounds.radius() * 1.25;
        assert_relative_eq!(frame.near, 4.0 - padding, epsilon = 1e-4);
        assert_relative_eq!(frame.far, 4.0 + padding, epsilon = 1e-4);
    }

    #[test]
    fn test_reset_orbit() {
        let mut c = controller(ContentType::Model);
        c.snap_to_axis(ViewAxis::X);
        c.reset_orbit();
        assert_eq!(c.state().orbit_angles, Vec2::new(15.0, -120.0));
    }
}
