//! Viewport configuration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::particles::WarmUpConfig;

/// Tunables for the preview camera and particle warm-up
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Vertical field of view in degrees for 3D content
    pub field_of_view: f32,
    /// Degrees of orbit per pixel of drag
    pub orbit_sensitivity: f32,
    /// Pitch is clamped to +/- this many degrees
    pub pitch_limit: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Multiplier applied to the fitting distance when framing
    pub frame_margin: f32,
    /// Pitch and yaw (degrees) of a fresh session and of Reset View
    pub initial_orbit: [f32; 2],
    pub initial_distance: f32,
    /// Auto-rotate yaw speed in degrees per second
    pub auto_rotate_speed: f32,
    pub warm_up: WarmUpConfig,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            field_of_view: 60.0,
            orbit_sensitivity: 0.2,
            pitch_limit: 80.0,
            min_distance: 0.05,
            max_distance: 20_000.0,
            frame_margin: 1.05,
            initial_orbit: [15.0, -120.0],
            initial_distance: 5.0,
            auto_rotate_speed: 15.0,
            warm_up: WarmUpConfig::default(),
        }
    }
}

impl ViewportConfig {
    pub fn with_field_of_view(mut self, degrees: f32) -> Self {
        self.field_of_view = degrees;
        self
    }

    pub fn with_warm_up(mut self, warm_up: WarmUpConfig) -> Self {
        self.warm_up = warm_up;
        self
    }

    pub fn with_auto_rotate_speed(mut self, degrees_per_second: f32) -> Self {
        self.auto_rotate_speed = degrees_per_second;
        self
    }

    /// Initial orbit angles as (pitch, yaw)
    #[inline]
    pub fn initial_orbit_angles(&self) -> Vec2 {
        Vec2::from(self.initial_orbit)
    }

    #[inline]
    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}
