//! Server-side favorites.

use crate::client::{error_from_response, read_json, send};
use crate::error::Result;
use crate::types::TrackList;
use cadence_core::types::{Track, TrackId};
use reqwest::Client;
use tracing::debug;

/// Favorites endpoints; every call needs an access token.
pub struct FavoritesClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> FavoritesClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// The user's favorited tracks.
    pub async fn get_favorite_tracks(&self, access: &str) -> Result<Vec<Track>> {
        let url = format!("{}/catalog/track/favorite/all/", self.base_url);
        debug!(url = %url, "Fetching favorite tracks");

        let response = send(self.http.get(&url).bearer_auth(access)).await?;
        let list: TrackList = read_json(response, "favorite tracks").await?;
        Ok(list.into_tracks())
    }

    pub async fn add_to_favorites(&self, id: TrackId, access: &str) -> Result<()> {
        let url = self.track_url(id);
        debug!(url = %url, "Adding favorite");

        let response = send(self.http.post(&url).bearer_auth(access)).await?;
        ensure_success(response).await
    }

    pub async fn remove_from_favorites(&self, id: TrackId, access: &str) -> Result<()> {
        let url = self.track_url(id);
        debug!(url = %url, "Removing favorite");

        let response = send(self.http.delete(&url).bearer_auth(access)).await?;
        ensure_success(response).await
    }

    fn track_url(&self, id: TrackId) -> String {
        format!("{}/catalog/track/{}/favorite/", self.base_url, id)
    }
}

/// Success with the body ignored.
async fn ensure_success(response: reqwest::Response) -> Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}
