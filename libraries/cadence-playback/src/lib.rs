//! Cadence - Playback
//!
//! Client-side playback control for Cadence.
//!
//! This crate provides:
//! - Shuffle order generation (Fisher-Yates over playlist indices)
//! - The playback state machine: selection, transport, volume, seek,
//!   loop, shuffle, next/previous
//! - A shared store publishing whole-state snapshots
//! - A binding that drives one platform media handle from the store
//!
//! # Architecture
//!
//! `cadence-playback` decodes nothing and plays nothing itself. The
//! platform supplies a [`MediaHandle`]; [`MediaBinding`] is the only code
//! that commands it. Everything else reads [`PlaybackState`] snapshots
//! from the [`PlaybackStore`] and requests changes through its operations.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Playlist, Track, TrackId};
//! use cadence_playback::{PlaybackConfig, PlaybackStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(PlaybackStore::new(&PlaybackConfig::default()));
//!
//! let tracks: Vec<Track> = (1..=3)
//!     .map(|id| Track::new(TrackId::new(id), format!("Track {id}"), "Artist"))
//!     .collect();
//! let playlist = Playlist::main(tracks.clone());
//!
//! store.select_track(tracks[2].clone(), playlist);
//! store.next();
//!
//! // Sequential playback wraps around
//! let state = store.snapshot();
//! assert_eq!(state.current_track().unwrap().id, TrackId::new(1));
//! assert!(state.is_playing());
//! ```

pub mod binding;
pub mod error;
pub mod media;
pub mod scheduler;
pub mod shuffle;
pub mod state;
pub mod store;
pub mod types;

pub use binding::MediaBinding;
pub use error::{MediaError, PlaybackError, Result};
pub use media::{MediaEvent, MediaHandle};
pub use scheduler::ScheduledTask;
pub use shuffle::{generate_shuffled_order, shuffled_order};
pub use state::PlaybackState;
pub use store::PlaybackStore;
pub use types::{Direction, PlaybackConfig};
