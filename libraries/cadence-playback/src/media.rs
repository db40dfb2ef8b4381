//! Media handle boundary
//!
//! The platform provides the actual player (an audio element, a native
//! decoder, a test double). Only [`crate::MediaBinding`] talks to it.

use crate::error::MediaError;
use async_trait::async_trait;

/// A single playable-resource sink
#[async_trait]
pub trait MediaHandle: Send {
    /// Currently assigned source URL
    fn source(&self) -> Option<String>;

    /// Assign a source; takes effect on the next [`MediaHandle::load`]
    fn set_source(&mut self, url: &str);

    /// Start loading the assigned source
    ///
    /// Completion is reported as [`MediaEvent::Loaded`].
    fn load(&mut self);

    /// Start or resume playback
    ///
    /// May be refused by the platform (autoplay policy, decode failure).
    async fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Duration in seconds, `None` until metadata is known
    fn duration(&self) -> Option<f64>;

    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    fn is_looping(&self) -> bool;

    fn set_looping(&mut self, looping: bool);
}

/// Notifications emitted by a media handle
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Periodic position report
    TimeUpdate {
        position: f64,
        /// Known duration, if any
        duration: Option<f64>,
    },

    /// Enough of `source` is loaded to know its duration
    Loaded { source: String, duration: f64 },

    /// Playback reached the end of the resource
    Ended,

    /// The handle failed
    Error { message: String },
}
