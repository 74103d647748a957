//! Error types
//!
//! Only `EngineError` is ever fatal, and only to engine construction.
//! Asset and audio errors degrade to fallback visuals or silence.

use thiserror::Error;

use crate::assets::ImageKey;

/// Failure to load an image asset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("failed to load image from {url}")]
    LoadFailed { url: String },

    #[error("no url configured for {0:?}")]
    NotConfigured(ImageKey),
}

/// Failure to play an audio cue
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// Autoplay policy or an interrupted play request
    #[error("playback blocked: {0}")]
    Blocked(String),

    #[error("playback failed: {0}")]
    Playback(String),

    #[error("audio unavailable")]
    Unavailable,
}

impl AudioError {
    /// Classify a DOM exception by name (`NotAllowedError`, `AbortError`, ...)
    pub fn from_dom(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "AbortError" => AudioError::Blocked(name.to_string()),
            _ => AudioError::Playback(format!("{name}: {message}")),
        }
    }

    /// Blocked playback is expected on page load and is not worth a warning
    pub fn is_expected(&self) -> bool {
        matches!(self, AudioError::Blocked(_))
    }
}

/// Failure to bring up the drawing surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no window")]
    NoWindow,

    #[error("missing canvas element #{0}")]
    MissingCanvas(String),

    #[error("element #{0} is not a canvas")]
    NotACanvas(String),

    #[error("2d context unavailable")]
    ContextUnavailable,
}

/// Failure to read a game config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
