//! Display state and status text.

use core::fmt;

use crate::content::ContentType;

/// What the draw path shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Nothing selected
    #[default]
    None,
    /// Content is loaded and rendered
    Scene,
    /// Load or renderer failure; a placeholder is shown
    Unavailable,
}

/// Short status line for the host UI.
///
/// Wording is neutral English; localized hosts match on the variant instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    NoSelection,
    Content { asset: String, content_type: ContentType },
    InstantiationFailed { asset: String },
    RendererUnavailable,
}

impl StatusMessage {
    /// True for the failure variants
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StatusMessage::InstantiationFailed { .. } | StatusMessage::RendererUnavailable
        )
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::NoSelection => f.write_str("No asset selected"),
            StatusMessage::Content { asset, content_type } => {
                write!(f, "{} ({})", asset, content_type)
            }
            StatusMessage::InstantiationFailed { asset } => {
                write!(f, "Could not instantiate {}", asset)
            }
            StatusMessage::RendererUnavailable => f.write_str("Preview renderer unavailable"),
        }
    }
}

/// Receives status text from the session
pub trait StatusSink {
    fn publish(&mut self, message: &StatusMessage);
}

/// Status sink that writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn publish(&mut self, message: &StatusMessage) {
        if message.is_error() {
            log::warn!("{}", message);
        } else {
            log::info!("{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(StatusMessage::NoSelection.to_string(), "No asset selected");
        let loaded = StatusMessage::Content {
            asset: "crate".into(),
            content_type: ContentType::Particle,
        };
        assert_eq!(loaded.to_string(), "crate (Particle)");
        assert!(!loaded.is_error());
        assert!(StatusMessage::RendererUnavailable.is_error());
    }
}
