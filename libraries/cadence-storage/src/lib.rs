//! Cadence Storage
//!
//! Persistence for the pieces of client state that outlive a session:
//!
//! - [`MemoryStore`] and [`JsonFileStore`] implement
//!   [`cadence_core::KeyValueStore`]
//! - [`FavoritesSet`] keeps the local favorites list and broadcasts
//!   membership changes to independent observers
//! - [`SessionStore`] saves and restores the authenticated user and tokens
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Track, TrackId};
//! use cadence_storage::{FavoritesSet, MemoryStore};
//!
//! let favorites = FavoritesSet::load(MemoryStore::new()).unwrap();
//! let mut changes = favorites.subscribe();
//!
//! let track = Track::new(TrackId::new(1), "Chase", "Alexander Nakarada");
//! assert!(favorites.toggle_favorite(&track).unwrap());
//! assert!(changes.try_recv().unwrap().is_favorite);
//! ```

pub mod favorites;
pub mod kv;
pub mod session;

pub use favorites::{FavoritesChanged, FavoritesSet, FAVORITES_KEY};
pub use kv::{JsonFileStore, MemoryStore};
pub use session::{SessionStore, StoredSession};
