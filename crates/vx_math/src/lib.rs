//! # vx_math - Preview Framing Math
//!
//! Spatial primitives for the ViewportX asset preview, built on `glam`:
//! bounding boxes, projection and field-of-view fitting, and orbit
//! rotations. Angles are degrees at the API surface; the coordinate
//! convention is left-handed with +Z forward and +Y up.

pub mod bounds;
pub mod orbit;
pub mod projection;

pub use bounds::Bounds;
pub use orbit::{orbit_eye, orbit_rotation, CameraBasis};
pub use projection::{
    aspect_ratio, sphere_fit_distance, vertical_to_horizontal_fov, Projection,
    MIN_HALF_FOV_RADIANS,
};

pub use glam::{Mat4, Quat, Vec2, Vec3};

/// Common math constants
pub mod consts {
    /// Degenerate-size guard used by framing and clip-plane math
    pub const EPSILON: f32 = 1e-6;
}

/// Approximate float equality with an absolute tolerance
#[inline]
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

pub mod prelude {
    pub use crate::bounds::Bounds;
    pub use crate::orbit::{orbit_eye, orbit_rotation, CameraBasis};
    pub use crate::projection::Projection;
    pub use glam::{Mat4, Quat, Vec2, Vec3};
}
