//! Cadence Core
//!
//! Platform-agnostic core types, traits, and error handling for Cadence.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `User` and their identifiers
//! - **Core Traits**: `KeyValueStore` for session and favorites persistence
//! - **Catalog helpers**: search/facet filtering and time formatting
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Playlist, PlaylistId, Track, TrackId};
//!
//! let track = Track::new(TrackId::new(8), "Chase", "Alexander Nakarada")
//!     .with_media("https://cdn.example.com/chase.mp3");
//!
//! let playlist = Playlist::new(PlaylistId::new(2), "Focus", vec![track.clone()]);
//! assert_eq!(playlist.index_of(track.id), Some(0));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod format;
pub mod traits;
pub mod types;

pub use error::{CadenceError, Result};
pub use filter::TrackFilter;
pub use format::format_time;
pub use traits::KeyValueStore;
pub use types::{
    AuthTokens, Playlist, PlaylistId, Track, TrackId, User, UserId, FAVORITES_PLAYLIST_NAME,
    MAIN_PLAYLIST_NAME,
};
