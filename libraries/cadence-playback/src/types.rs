//! Core types for playback

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Direction of a queue advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards the end of the queue
    Next,

    /// Towards the start of the queue
    Previous,
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 0.5)
    pub volume: f32,

    /// Delay between a natural track end and the automatic advance
    /// (default: 300ms)
    pub advance_debounce: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            advance_debounce: Duration::from_millis(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.volume, 0.5);
        assert_eq!(config.advance_debounce, Duration::from_millis(300));
    }
}
