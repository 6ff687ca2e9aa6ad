//! # vx_viewport - Asset Preview Camera and Framing
//!
//! The core of the ViewportX asset preview: it classifies loaded content,
//! frames it with an orbit or fixed orthographic camera, drives particle
//! playback and keeps a ground grid sized to the content.
//!
//! The host supplies the scene graph, particle runtime and render surface
//! through the traits in [`host`]. [`memory`] provides in-memory versions of
//! all of them.
//!
//! ```text
//!   input ──► InputTracker ──► CameraCommand ─┐
//!                                             ▼
//!   SceneHost ◄──── ViewportSession ────► CameraController ──► CameraFrame
//!       ▲            │        │                                   │
//!       │            ▼        ▼                                   ▼
//!       └──── ParticleDriver  GridLayer                     RenderBackend
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vx_viewport::prelude::*;
//!
//! let scene = MemoryScene::new().with_asset("crate", NodeDesc::mesh("crate", [0.0; 3], [1.0; 3]));
//! let mut session = ViewportSession::new(
//!     scene,
//!     MemoryRenderer::new(),
//!     ViewportConfig::default(),
//!     ViewPreferences::default(),
//! );
//!
//! session.load(Some(&AssetRef::new("crate")));
//! session.tick(1.0 / 60.0);
//! let output = session.draw(ViewRect::sized(512.0, 512.0));
//! ```

pub mod bounds;
pub mod camera;
pub mod classifier;
pub mod config;
pub mod content;
pub mod error;
pub mod grid;
pub mod hierarchy;
pub mod host;
pub mod input;
pub mod memory;
pub mod particles;
pub mod preferences;
pub mod session;
pub mod status;

pub use bounds::compute_bounds;
pub use camera::{
    CameraController, CameraFrame, CameraState, ContentBehavior, ViewAxis, ZoomOutcome,
};
pub use classifier::classify;
pub use config::ViewportConfig;
pub use content::{AssetRef, ComponentFlags, ContentRoot, ContentType, NodeId};
pub use error::{PreviewError, PreviewResult};
pub use grid::{GridLayer, GridMesh, GridSpec};
pub use host::{
    ParticleSimulator, RenderBackend, RenderRequest, SceneHost, SceneQuery, TextureHandle, ViewRect,
};
pub use input::{CameraCommand, InputTracker, KeyCode, PointerButton, ViewportInput};
pub use particles::{ParticleDriver, PlaybackState, WarmUpConfig};
pub use preferences::{JsonPreferenceStore, PreferenceSink, ViewPreferences};
pub use session::{ControlStates, DrawOutput, ViewportSession};
pub use status::{DisplayMode, LogStatusSink, StatusMessage, StatusSink};

pub mod prelude {
    pub use crate::camera::{CameraFrame, ViewAxis};
    pub use crate::config::ViewportConfig;
    pub use crate::content::{AssetRef, ContentType};
    pub use crate::host::{RenderBackend, SceneHost, ViewRect};
    pub use crate::input::ViewportInput;
    pub use crate::memory::{MemoryRenderer, MemoryScene, NodeDesc};
    pub use crate::preferences::ViewPreferences;
    pub use crate::session::{DrawOutput, ViewportSession};
    pub use crate::status::DisplayMode;
}
