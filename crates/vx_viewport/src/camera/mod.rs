//! Preview camera.

pub mod behavior;
mod controller;
mod state;

pub use behavior::{ClipCenter, ContentBehavior, FramingMode, PanMode, ZoomMode};
pub use controller::{CameraController, CameraFrame, ZoomOutcome};
pub use state::{CameraState, ViewAxis};
