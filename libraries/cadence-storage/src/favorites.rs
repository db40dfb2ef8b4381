//! Local favorites collection
//!
//! Favorites are kept as whole tracks (not just ids) so the favorites view
//! can be built as a playlist without another catalog round-trip. The list
//! is stored as a JSON array under [`FAVORITES_KEY`].
//!
//! Observers never share the set mutably: they subscribe to a broadcast
//! channel and re-read membership when a [`FavoritesChanged`] arrives.

use cadence_core::types::{Playlist, Track, TrackId};
use cadence_core::{KeyValueStore, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Storage key of the favorites list
pub const FAVORITES_KEY: &str = "favoriteTracks";

/// Capacity of the change channel; slow observers see `Lagged` and resync
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Membership change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoritesChanged {
    /// Track whose membership changed
    pub track_id: TrackId,
    /// Membership after the change
    pub is_favorite: bool,
}

/// Favorites membership backed by a key-value store
pub struct FavoritesSet<S: KeyValueStore> {
    store: S,
    tracks: Mutex<Vec<Track>>,
    changes: broadcast::Sender<FavoritesChanged>,
}

impl<S: KeyValueStore> FavoritesSet<S> {
    /// Load the persisted favorites
    ///
    /// A malformed stored list is logged and treated as empty; storage
    /// read failures are returned.
    pub fn load(store: S) -> Result<Self> {
        let tracks = match store.get(FAVORITES_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<Track>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored favorites are malformed, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };

        debug!(count = tracks.len(), "Loaded favorites");

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            store,
            tracks: Mutex::new(tracks),
            changes,
        })
    }

    /// Subscribe to membership changes
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesChanged> {
        self.changes.subscribe()
    }

    /// Whether a track is a favorite
    pub fn is_favorite(&self, id: TrackId) -> bool {
        self.lock().iter().any(|track| track.id == id)
    }

    /// Flip membership of `track`, returning the new membership
    pub fn toggle_favorite(&self, track: &Track) -> Result<bool> {
        let mut tracks = self.lock();
        let is_favorite = match tracks.iter().position(|t| t.id == track.id) {
            Some(index) => {
                let removed = tracks.remove(index);
                if let Err(e) = self.save(&tracks) {
                    tracks.insert(index, removed);
                    return Err(e);
                }
                false
            }
            None => {
                tracks.push(track.clone());
                if let Err(e) = self.save(&tracks) {
                    tracks.pop();
                    return Err(e);
                }
                true
            }
        };
        drop(tracks);

        self.notify(track.id, is_favorite);
        Ok(is_favorite)
    }

    /// Add `track`; returns `false` when it was already a favorite
    pub fn add(&self, track: &Track) -> Result<bool> {
        let mut tracks = self.lock();
        if tracks.iter().any(|t| t.id == track.id) {
            return Ok(false);
        }

        tracks.push(track.clone());
        if let Err(e) = self.save(&tracks) {
            tracks.pop();
            return Err(e);
        }
        drop(tracks);

        self.notify(track.id, true);
        Ok(true)
    }

    /// Remove a track by id; returns `false` when it was not a favorite
    pub fn remove(&self, id: TrackId) -> Result<bool> {
        let mut tracks = self.lock();
        let Some(index) = tracks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };

        let removed = tracks.remove(index);
        if let Err(e) = self.save(&tracks) {
            tracks.insert(index, removed);
            return Err(e);
        }
        drop(tracks);

        self.notify(id, false);
        Ok(true)
    }

    /// Favorite tracks in the order they were added
    pub fn tracks(&self) -> Vec<Track> {
        self.lock().clone()
    }

    /// The favorites sentinel playlist
    pub fn playlist(&self) -> Playlist {
        Playlist::favorites(self.tracks())
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether there are no favorites
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Track>> {
        self.tracks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save(&self, tracks: &[Track]) -> Result<()> {
        let json = serde_json::to_string(tracks)?;
        self.store.set(FAVORITES_KEY, &json)
    }

    fn notify(&self, track_id: TrackId, is_favorite: bool) {
        debug!(track_id = %track_id, is_favorite, "Favorites changed");
        // No receivers is fine
        let _ = self.changes.send(FavoritesChanged {
            track_id,
            is_favorite,
        });
    }
}
