//! Error types for playback

use cadence_core::types::TrackId;
use thiserror::Error;

/// Failures reported by a media handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// The handle refused to start playback (e.g. autoplay policy)
    #[error("Playback rejected: {0}")]
    PlayRejected(String),

    /// The resource could not be loaded
    #[error("Failed to load {source_url}: {message}")]
    Load { source_url: String, message: String },

    /// Any other handle failure
    #[error("Media error: {0}")]
    Other(String),
}

/// Non-fatal playback errors surfaced by the media binding
///
/// None of these stop the binding; the store is reconciled and playback
/// can resume on the next user action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The track has no playable media resource
    #[error("Track {0} has no media resource")]
    ResourceMissing(TrackId),

    /// The media handle failed
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
