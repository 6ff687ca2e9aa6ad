//! Error types for the preview viewport

use thiserror::Error;

/// Preview errors.
///
/// These only cross the host seams (renderer creation, preference I/O,
/// scene descriptions). The session turns them into display state and
/// status text; none of them is fatal.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The scene host returned no content root for the asset
    #[error("Failed to instantiate asset: {asset}")]
    InstantiationFailed { asset: String },

    /// The offscreen render surface could not be created or used
    #[error("Preview renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// Preference or scene file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Preference or scene file could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A scene description referenced something that does not exist
    #[error("Invalid scene description: {0}")]
    InvalidScene(String),
}

/// Result type for preview operations
pub type PreviewResult<T> = Result<T, PreviewError>;
