//! Camera projection helpers
//!
//! Conventions match the preview scene: left-handed, +Z forward, +Y up,
//! angles in degrees at the API surface.

use glam::Mat4;

/// Smallest half-angle (radians) used when solving for a fitting distance.
///
/// Keeps `1 / sin(half_angle)` bounded for degenerate fields of view.
pub const MIN_HALF_FOV_RADIANS: f32 = 0.1;

/// Camera projection mode
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Perspective projection with a vertical field of view in degrees
    Perspective { fov_y_degrees: f32 },
    /// Orthographic projection; `size` is half the visible height
    Orthographic { size: f32 },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective { fov_y_degrees: 60.0 }
    }
}

impl Projection {
    #[inline]
    pub fn is_orthographic(&self) -> bool {
        matches!(self, Projection::Orthographic { .. })
    }

    /// Height of the view volume at `distance` from the eye
    pub fn visible_height(&self, distance: f32) -> f32 {
        match *self {
            Projection::Perspective { fov_y_degrees } => {
                2.0 * distance * (fov_y_degrees.to_radians() * 0.5).tan()
            }
            Projection::Orthographic { size } => 2.0 * size,
        }
    }

    /// Width and height of the view volume at `distance` from the eye
    pub fn visible_extent(&self, distance: f32, aspect: f32) -> (f32, f32) {
        let height = self.visible_height(distance);
        (height * aspect, height)
    }

    /// Left-handed projection matrix with a [0, 1] depth range
    pub fn matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        match *self {
            Projection::Perspective { fov_y_degrees } => {
                Mat4::perspective_lh(fov_y_degrees.to_radians(), aspect, near, far)
            }
            Projection::Orthographic { size } => {
                let half_width = size * aspect;
                Mat4::orthographic_lh(-half_width, half_width, -size, size, near, far)
            }
        }
    }
}

/// Aspect ratio of a `width` x `height` area, 1.0 when height is not positive
#[inline]
pub fn aspect_ratio(width: f32, height: f32) -> f32 {
    if height > 0.0 {
        width / height
    } else {
        1.0
    }
}

/// Horizontal field of view (degrees) for a vertical one and an aspect ratio
pub fn vertical_to_horizontal_fov(fov_y_degrees: f32, aspect: f32) -> f32 {
    let half_v = fov_y_degrees.to_radians() * 0.5;
    (2.0 * (half_v.tan() * aspect).atan()).to_degrees()
}

/// Eye distance at which a sphere of `radius` fits both view axes.
///
/// Solves `radius / sin(half_fov)` for the vertical and horizontal fields of
/// view and keeps the larger one. No safety margin is applied.
pub fn sphere_fit_distance(radius: f32, fov_y_degrees: f32, aspect: f32) -> f32 {
    let half_v = (fov_y_degrees.to_radians() * 0.5).max(MIN_HALF_FOV_RADIANS);
    let fov_x_degrees = vertical_to_horizontal_fov(fov_y_degrees, aspect);
    let half_h = (fov_x_degrees.to_radians() * 0.5).max(MIN_HALF_FOV_RADIANS);

    let distance_vertical = radius / half_v.sin();
    let distance_horizontal = radius / half_h.sin();
    distance_vertical.max(distance_horizontal)
}
