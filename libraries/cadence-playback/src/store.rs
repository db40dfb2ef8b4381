//! Shared playback store
//!
//! Wraps [`PlaybackState`] in a `watch` channel. Each operation runs one
//! transition under the channel's write lock and publishes the result as a
//! new snapshot only when something changed. Subscribers always see the
//! latest snapshot; intermediate ones may be skipped.

use crate::state::PlaybackState;
use crate::types::{Direction, PlaybackConfig};
use cadence_core::types::{Playlist, PlaylistId, Track};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tracing::debug;

/// Shared owner of the playback state
///
/// Construct once per session and hand out as `Arc<PlaybackStore>`.
pub struct PlaybackStore {
    state: watch::Sender<PlaybackState>,
    rng: Mutex<StdRng>,
}

impl PlaybackStore {
    /// Create a store with an entropy-seeded shuffle RNG
    pub fn new(config: &PlaybackConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a store with a deterministic shuffle RNG
    pub fn with_seed(config: &PlaybackConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &PlaybackConfig, rng: StdRng) -> Self {
        let (state, _) = watch::channel(PlaybackState::new(config));
        Self {
            state,
            rng: Mutex::new(rng),
        }
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning it
    pub fn with_state<T>(&self, f: impl FnOnce(&PlaybackState) -> T) -> T {
        f(&self.state.borrow())
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    // ===== Operations =====

    pub fn select_track(&self, track: Track, playlist: Playlist) {
        self.update("select_track", |state, rng| {
            state.select_track(track, playlist, rng);
        });
    }

    pub fn toggle_play(&self) {
        self.update("toggle_play", |state, _| state.toggle_play());
    }

    pub fn play(&self) {
        self.update("play", |state, _| state.play());
    }

    pub fn pause(&self) {
        self.update("pause", |state, _| state.pause());
    }

    pub fn set_volume(&self, volume: f32) {
        self.update("set_volume", |state, _| state.set_volume(volume));
    }

    pub fn set_duration(&self, duration: f64) {
        self.update("set_duration", |state, _| state.set_duration(duration));
    }

    pub fn set_current_time(&self, time: f64) {
        self.update("set_current_time", |state, _| state.set_current_time(time));
    }

    pub fn seek(&self, time: f64) {
        self.update("seek", |state, _| state.seek(time));
    }

    pub fn set_loop(&self, looping: bool) {
        self.update("set_loop", |state, _| state.set_loop(looping));
    }

    pub fn set_shuffle(&self, shuffle: bool) {
        self.update("set_shuffle", |state, rng| state.set_shuffle(shuffle, rng));
    }

    pub fn advance(&self, direction: Direction) {
        self.update("advance", |state, rng| state.advance(direction, rng));
    }

    pub fn next(&self) {
        self.advance(Direction::Next);
    }

    pub fn previous(&self) {
        self.advance(Direction::Previous);
    }

    pub fn restart_track(&self) {
        self.update("restart_track", |state, _| state.restart_track());
    }

    pub fn load_tracks_into_playlist(&self, tracks: Vec<Track>) {
        self.update("load_tracks_into_playlist", |state, rng| {
            state.load_tracks_into_playlist(tracks, rng);
        });
    }

    pub fn load_named_playlist(&self, id: PlaylistId, name: impl Into<String>, tracks: Vec<Track>) {
        let name = name.into();
        self.update("load_named_playlist", |state, rng| {
            state.load_named_playlist(id, name, tracks, rng);
        });
    }

    pub fn load_favorites(&self, tracks: Vec<Track>) {
        self.update("load_favorites", |state, rng| state.load_favorites(tracks, rng));
    }

    /// Apply one transition atomically, publishing only real changes
    fn update(&self, op: &'static str, f: impl FnOnce(&mut PlaybackState, &mut StdRng)) -> bool {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let changed = self.state.send_if_modified(|state| {
            let before = state.clone();
            f(state, &mut *rng);
            *state != before
        });

        if changed {
            self.with_state(|state| {
                debug!(
                    op,
                    track_id = ?state.current_track().map(|t| t.id.as_i64()),
                    playing = state.is_playing(),
                    "Playback state changed"
                );
            });
        }
        changed
    }
}

impl Default for PlaybackStore {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::types::TrackId;

    fn track(id: i64) -> Track {
        Track::new(TrackId::new(id), format!("Track {id}"), "Artist")
    }

    #[test]
    fn operations_update_the_snapshot() {
        let store = PlaybackStore::with_seed(&PlaybackConfig::default(), 1);
        let playlist = Playlist::main(vec![track(1), track(2)]);

        store.select_track(track(1), playlist);
        store.next();

        let state = store.snapshot();
        assert_eq!(state.current_track().map(|t| t.id), Some(TrackId::new(2)));
        assert!(state.is_playing());
    }

    #[test]
    fn unchanged_state_is_not_published() {
        let store = PlaybackStore::default();
        let mut rx = store.subscribe();

        store.pause();
        assert!(!rx.has_changed().unwrap());

        store.play();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_playing());

        store.set_volume(f32::NAN);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn subscribers_see_only_the_latest_snapshot() {
        let store = PlaybackStore::default();
        let mut rx = store.subscribe();

        store.set_volume(0.1);
        store.set_volume(0.2);
        store.set_volume(0.9);

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().volume(), 0.9);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn config_volume_is_applied() {
        let config = PlaybackConfig {
            volume: 0.8,
            ..PlaybackConfig::default()
        };
        assert_eq!(PlaybackStore::new(&config).snapshot().volume(), 0.8);
    }

    #[test]
    fn store_is_shareable_across_threads() {
        let store = std::sync::Arc::new(PlaybackStore::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || store.set_volume(i as f32 / 10.0))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let volume = store.snapshot().volume();
        assert!((0.0..=0.3).contains(&volume));
    }
}
