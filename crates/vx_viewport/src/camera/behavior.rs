//! Per-content-type camera behavior table.
//!
//! Every content-dependent literal used by the camera lives here; the
//! controller only dispatches on these variants.

use glam::Vec3;

use crate::content::ContentType;

/// How a screen-space drag becomes a pan offset
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanMode {
    /// Scale by the visible frustum at the orbit distance, along the camera basis
    Frustum,
    /// Fixed world units per pixel in the X-Y plane, X inverted
    FixedScale { world_per_pixel: f32 },
}

/// What a zoom step changes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomMode {
    /// Multiply the orbit distance by `1 + delta`
    Dolly,
    /// Rescale the content root instead of moving the camera
    RescaleContent {
        initial_scale: f32,
        min_step: f32,
        max_step: f32,
        min_scale: f32,
        max_scale: f32,
    },
}

/// How content is framed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FramingMode {
    /// Perspective orbit camera solving a distance that fits the bounding sphere
    FitSphere,
    /// Fixed orthographic camera looking down +Z at a fixed box
    FixedOrtho {
        ortho_size: f32,
        camera_offset: Vec3,
        bounds_size: Vec3,
    },
}

/// Which distance the clip planes are centered on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipCenter {
    OrbitDistance,
    CameraToTarget,
}

/// Camera behavior for one content type
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentBehavior {
    pub orbit: bool,
    pub auto_rotate: bool,
    pub pan: PanMode,
    pub zoom: ZoomMode,
    pub framing: FramingMode,
    pub clip_center: ClipCenter,
    /// Clip-plane padding as a multiple of the bounding radius
    pub clip_padding: f32,
    pub shows_grid: bool,
    pub particle_controls: bool,
}

const NONE: ContentBehavior = ContentBehavior {
    orbit: false,
    auto_rotate: false,
    pan: PanMode::Frustum,
    zoom: ZoomMode::Dolly,
    framing: FramingMode::FitSphere,
    clip_center: ClipCenter::OrbitDistance,
    clip_padding: 1.25,
    shows_grid: false,
    particle_controls: false,
};

const MODEL: ContentBehavior = ContentBehavior {
    orbit: true,
    auto_rotate: true,
    shows_grid: true,
    ..NONE
};

// Simulated extents change every frame, so the clip range gets more slack.
const PARTICLE: ContentBehavior = ContentBehavior {
    clip_padding: 2.0,
    particle_controls: true,
    ..MODEL
};

const UGUI: ContentBehavior = ContentBehavior {
    orbit: false,
    auto_rotate: false,
    pan: PanMode::FixedScale {
        world_per_pixel: 0.0025,
    },
    zoom: ZoomMode::RescaleContent {
        initial_scale: 0.0025,
        min_step: 0.5,
        max_step: 1.5,
        min_scale: 0.0005,
        max_scale: 0.02,
    },
    framing: FramingMode::FixedOrtho {
        ortho_size: 1.2,
        camera_offset: Vec3::new(0.0, 0.0, -4.0),
        bounds_size: Vec3::new(1.0, 1.0, 0.1),
    },
    clip_center: ClipCenter::CameraToTarget,
    clip_padding: 1.25,
    shows_grid: false,
    particle_controls: false,
};

impl ContentBehavior {
    pub fn for_type(content_type: ContentType) -> &'static ContentBehavior {
        match content_type {
            ContentType::None => &NONE,
            ContentType::Model => &MODEL,
            ContentType::Particle => &PARTICLE,
            ContentType::Ugui => &UGUI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_gets_extra_padding() {
        assert_eq!(ContentType::Particle.behavior().clip_padding, 2.0);
        assert_eq!(ContentType::Model.behavior().clip_padding, 1.25);
    }

    #[test]
    fn test_ugui_has_no_orbit() {
        let ui = ContentType::Ugui.behavior();
        assert!(!ui.orbit);
        assert!(!ui.auto_rotate);
        assert!(matches!(ui.framing, FramingMode::FixedOrtho { .. }));
    }
}
