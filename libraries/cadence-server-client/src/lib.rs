//! Cadence Server Client
//!
//! HTTP client for the music catalog service Cadence plays from.
//!
//! # Features
//!
//! - **Authentication**: signup, login, token issue/refresh/verify
//! - **Catalog**: all tracks, curated playlists, playlist lookup with
//!   normalization of the service's several response shapes
//! - **Favorites**: server-side favorites for logged-in users
//! - **Session**: persisted login with refresh-and-retry on auth failures
//!
//! # Example
//!
//! ```ignore
//! use cadence_server_client::{ApiClient, AuthSession, ClientConfig};
//! use cadence_storage::JsonFileStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::default())?;
//!
//!     let tracks = client.catalog().get_all_tracks().await?;
//!     println!("Found {} tracks", tracks.len());
//!
//!     let session = AuthSession::new(client, JsonFileStore::open("cadence.json")?);
//!     let user = session.login("me@example.com", "secret").await?;
//!     println!("Logged in as {}", user.username);
//!
//!     let favorites = session.favorite_tracks().await?;
//!     println!("{} favorites", favorites.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod catalog;
mod client;
mod error;
mod favorites;
mod session;
mod types;

// Re-export main types
pub use client::ApiClient;
pub use error::{Result, ServerClientError};
pub use session::AuthSession;
pub use types::{ClientConfig, DEFAULT_BASE_URL};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use catalog::CatalogClient;
pub use favorites::FavoritesClient;
