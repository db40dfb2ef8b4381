/// ID types for Cadence entities
///
/// The catalog service identifies everything with plain integers, so the
/// wrappers are `Copy` and serialize transparently.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(i64);

impl TrackId {
    /// Create a new track ID
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw integer
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playlist identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(i64);

impl PlaylistId {
    /// Sentinel id of the favorited-tracks collection
    pub const FAVORITES: PlaylistId = PlaylistId(-1);

    /// Id of the default "all tracks" working playlist
    pub const MAIN: PlaylistId = PlaylistId(1);

    /// Create a new playlist ID
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw integer
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Whether this is the favorites sentinel rather than a server playlist
    pub const fn is_favorites(self) -> bool {
        self.0 == Self::FAVORITES.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw integer
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorites_sentinel_is_negative_one() {
        assert_eq!(PlaylistId::FAVORITES.as_i64(), -1);
        assert!(PlaylistId::new(-1).is_favorites());
        assert!(!PlaylistId::MAIN.is_favorites());
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&TrackId::new(17)).unwrap();
        assert_eq!(json, "17");

        let id: PlaylistId = serde_json::from_str("4").unwrap();
        assert_eq!(id, PlaylistId::new(4));
    }

    #[test]
    fn track_id_display() {
        assert_eq!(format!("{}", TrackId::new(123)), "123");
    }
}
