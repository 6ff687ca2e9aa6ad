//! Orbit rotations and camera basis vectors

use glam::{EulerRot, Quat, Vec3};

/// Rotation for an orbit pose: yaw about +Y, then pitch about the rotated +X.
///
/// Positive pitch tips the forward vector down. Roll is always zero.
#[inline]
pub fn orbit_rotation(pitch_degrees: f32, yaw_degrees: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw_degrees.to_radians(),
        pitch_degrees.to_radians(),
        0.0,
    )
}

/// Orthonormal camera axes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl CameraBasis {
    /// Axes of a camera with the given orientation
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            forward: rotation * Vec3::Z,
            right: rotation * Vec3::X,
            up: rotation * Vec3::Y,
        }
    }
}

/// Eye position `distance` behind `target` along the rotation's forward axis
#[inline]
pub fn orbit_eye(target: Vec3, rotation: Quat, distance: f32) -> Vec3 {
    target - (rotation * Vec3::Z) * distance
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_identity_looks_forward() {
        let basis = CameraBasis::from_rotation(orbit_rotation(0.0, 0.0));
        assert!(basis.forward.abs_diff_eq(Vec3::Z, EPS));
        assert!(basis.right.abs_diff_eq(Vec3::X, EPS));
        assert!(basis.up.abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn test_positive_pitch_looks_down() {
        let forward = orbit_rotation(90.0, 0.0) * Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::NEG_Y, EPS));
    }

    #[test]
    fn test_negative_yaw_quarter_turn() {
        let forward = orbit_rotation(0.0, -90.0) * Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::NEG_X, EPS));
    }

    #[test]
    fn test_right_stays_horizontal() {
        let basis = CameraBasis::from_rotation(orbit_rotation(35.0, 123.0));
        assert!(basis.right.y.abs() < EPS);
        assert!((basis.forward.dot(basis.up)).abs() < EPS);
    }

    #[test]
    fn test_orbit_eye_behind_target() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        let eye = orbit_eye(target, orbit_rotation(0.0, 0.0), 5.0);
        assert!(eye.abs_diff_eq(Vec3::new(1.0, 2.0, -2.0), EPS));
    }
}
