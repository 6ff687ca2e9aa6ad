//! Camera state and the remembered view axis.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use vx_math::Projection;

use crate::config::ViewportConfig;

/// Canonical viewing direction the user can snap to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewAxis {
    X,
    Y,
    #[default]
    Z,
}

impl ViewAxis {
    /// Orbit angles (pitch, yaw) of the snapped pose
    pub fn orbit_angles(self) -> Vec2 {
        match self {
            ViewAxis::X => Vec2::new(0.0, -90.0),
            ViewAxis::Y => Vec2::new(-90.0, 0.0),
            ViewAxis::Z => Vec2::new(0.0, 0.0),
        }
    }

    /// Integer form used by preference stores
    pub fn to_index(self) -> i32 {
        match self {
            ViewAxis::X => 0,
            ViewAxis::Y => 1,
            ViewAxis::Z => 2,
        }
    }

    /// Unknown values map to `Z`
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => ViewAxis::X,
            1 => ViewAxis::Y,
            _ => ViewAxis::Z,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewAxis::X => "X",
            ViewAxis::Y => "Y",
            ViewAxis::Z => "Z",
        }
    }
}

/// Everything the controller knows about the camera.
///
/// `orbit_angles` is `(pitch, yaw)` in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub orbit_angles: Vec2,
    pub distance: f32,
    pub pan_offset: Vec3,
    pub view_axis: ViewAxis,
    pub projection: Projection,
    pub near_clip: f32,
    pub far_clip: f32,
}

impl CameraState {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            orbit_angles: config.initial_orbit_angles(),
            distance: config.initial_distance,
            pan_offset: Vec3::ZERO,
            view_axis: ViewAxis::default(),
            projection: Projection::Perspective {
                fov_y_degrees: config.field_of_view,
            },
            near_clip: 0.01,
            far_clip: 1000.0,
        }
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.orbit_angles.x
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.orbit_angles.y
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(&ViewportConfig::default())
    }
}
