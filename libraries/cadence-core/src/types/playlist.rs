/// Playlist domain type
use crate::types::{PlaylistId, Track, TrackId};
use serde::{Deserialize, Serialize};

/// Display name of the favorites sentinel playlist
pub const FAVORITES_PLAYLIST_NAME: &str = "My tracks";

/// Display name of the default working playlist
pub const MAIN_PLAYLIST_NAME: &str = "Main";

/// A named, ordered sequence of tracks
///
/// Track order is the order tracks are advanced through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist identifier (`PlaylistId::FAVORITES` for the favorites view)
    pub id: PlaylistId,

    /// Display name
    pub name: String,

    /// Tracks in playback order
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Create a playlist
    pub fn new(id: PlaylistId, name: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            id,
            name: name.into(),
            tracks,
        }
    }

    /// The favorites sentinel playlist holding the given tracks
    pub fn favorites(tracks: Vec<Track>) -> Self {
        Self::new(PlaylistId::FAVORITES, FAVORITES_PLAYLIST_NAME, tracks)
    }

    /// The default "all tracks" working playlist
    pub fn main(tracks: Vec<Track>) -> Self {
        Self::new(PlaylistId::MAIN, MAIN_PLAYLIST_NAME, tracks)
    }

    /// Whether this is the favorites sentinel
    pub fn is_favorites(&self) -> bool {
        self.id.is_favorites()
    }

    /// Position of a track in the sequence, looked up by identity
    ///
    /// Linear scan; playlists are small. This is the single lookup used
    /// by every playback transition.
    pub fn index_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|track| track.id == id)
    }

    /// Track at a position
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
