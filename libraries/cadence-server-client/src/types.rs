//! Types for catalog API requests and responses.

use crate::error::{Result, ServerClientError};
use cadence_core::types::{Playlist, PlaylistId, Track, TrackId, User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

/// Public catalog service
pub const DEFAULT_BASE_URL: &str = "https://webdev-music-003b5b991590.herokuapp.com";

/// Configuration for connecting to the catalog service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL (e.g. "https://music.example.com")
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Config for `base_url` with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for signup.
#[derive(Debug, Serialize)]
pub(crate) struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub username: &'a str,
}

/// Request body for login and token issue.
#[derive(Debug, Serialize)]
pub(crate) struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for token refresh.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Request body for token verification.
#[derive(Debug, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    pub token: &'a str,
}

/// Response from token refresh.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
}

/// Login response: either the user fields inline or wrapped in `result`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    email: Option<String>,
    username: Option<String>,
    #[serde(rename = "_id")]
    id: Option<UserId>,
    result: Option<User>,
    message: Option<String>,
}

impl LoginResponse {
    pub(crate) fn into_user(self) -> Result<User> {
        match self {
            Self {
                email: Some(email),
                username: Some(username),
                id: Some(id),
                ..
            } if !email.is_empty() && !username.is_empty() => Ok(User {
                id,
                email,
                username,
            }),
            Self {
                result: Some(user), ..
            } => Ok(user),
            Self { message, .. } => Err(ServerClientError::MalformedResponse(
                message.unwrap_or_else(|| "Unexpected login response format".to_string()),
            )),
        }
    }
}

/// Error body: `{ message }` or `{ detail }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.detail)
    }
}

// =============================================================================
// Catalog Types
// =============================================================================

/// `{ success, data, message }` envelope used by listing endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

/// Favorites listing: a bare array or `{ data }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TrackList {
    Bare(Vec<Track>),
    Wrapped { data: Vec<Track> },
}

impl TrackList {
    pub(crate) fn into_tracks(self) -> Vec<Track> {
        match self {
            Self::Bare(tracks) | Self::Wrapped { data: tracks } => tracks,
        }
    }
}

/// Playlist entry: a full track or only its id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PlaylistItem {
    Track(Box<Track>),
    Id(TrackId),
}

/// Playlist as sent by the catalog (`items`, or `tracks` on older builds).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlaylistWire {
    #[serde(rename = "_id")]
    pub id: PlaylistId,
    pub name: String,
    pub items: Option<Vec<PlaylistItem>>,
    pub tracks: Option<Vec<PlaylistItem>>,
}

impl PlaylistWire {
    fn entries(&self) -> &[PlaylistItem] {
        self.items
            .as_deref()
            .or(self.tracks.as_deref())
            .unwrap_or_default()
    }

    /// Whether some entries are bare ids that need the full catalog
    pub(crate) fn has_bare_ids(&self) -> bool {
        self.entries()
            .iter()
            .any(|item| matches!(item, PlaylistItem::Id(_)))
    }

    /// Build the canonical playlist, resolving bare ids against `catalog`
    ///
    /// Ids missing from the catalog are dropped.
    pub(crate) fn into_playlist(self, catalog: &[Track]) -> Playlist {
        let by_id: HashMap<TrackId, &Track> = catalog.iter().map(|t| (t.id, t)).collect();

        let Self {
            id,
            name,
            items,
            tracks,
        } = self;

        let tracks = items
            .or(tracks)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| match item {
                PlaylistItem::Track(track) => Some(*track),
                PlaylistItem::Id(track_id) => {
                    let track = by_id.get(&track_id).map(|t| (*t).clone());
                    if track.is_none() {
                        warn!(playlist_id = %id, track_id = %track_id, "Playlist references unknown track");
                    }
                    track
                }
            })
            .collect();

        Playlist::new(id, name, tracks)
    }
}

/// Single-playlist response in any of the shapes the catalog has used.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistResponse {
    success: Option<bool>,
    data: Option<PlaylistWire>,
    #[serde(rename = "_id")]
    id: Option<PlaylistId>,
    name: Option<String>,
    items: Option<Vec<PlaylistItem>>,
    tracks: Option<Vec<PlaylistItem>>,
    detail: Option<String>,
    message: Option<String>,
}

impl PlaylistResponse {
    /// Normalize to the wire playlist, or explain why it can't be
    pub(crate) fn into_wire(self, status: u16) -> Result<PlaylistWire> {
        if self.success == Some(false) {
            return Err(ServerClientError::ServerError {
                status,
                message: self
                    .detail
                    .or(self.message)
                    .unwrap_or_else(|| "Failed to load playlist".to_string()),
            });
        }

        if let Some(wire) = self.data {
            return Ok(wire);
        }

        match (self.id, self.name) {
            (Some(id), Some(name)) if !name.is_empty() => Ok(PlaylistWire {
                id,
                name,
                items: self.items,
                tracks: self.tracks,
            }),
            _ => Err(ServerClientError::MalformedResponse(
                "Invalid playlist response format".to_string(),
            )),
        }
    }
}
