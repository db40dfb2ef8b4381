//! Track and playlist listings.

use crate::client::{read_json, send};
use crate::error::{Result, ServerClientError};
use crate::types::{Envelope, PlaylistResponse, PlaylistWire};
use cadence_core::types::{Playlist, PlaylistId, Track};
use reqwest::Client;
use tracing::debug;

/// Catalog client for the public listing endpoints.
pub struct CatalogClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> CatalogClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Every track in the catalog, in catalog order.
    pub async fn get_all_tracks(&self) -> Result<Vec<Track>> {
        let url = format!("{}/catalog/track/all/", self.base_url);
        debug!(url = %url, "Fetching all tracks");

        let response = send(self.http.get(&url)).await?;
        let status = response.status().as_u16();
        let envelope: Envelope<Vec<Track>> = read_json(response, "track listing").await?;

        match envelope {
            Envelope {
                success: true,
                data: Some(tracks),
                ..
            } => {
                debug!(count = tracks.len(), "Fetched tracks");
                Ok(tracks)
            }
            Envelope { message, .. } => Err(ServerClientError::ServerError {
                status,
                message: message.unwrap_or_else(|| "Failed to load tracks".to_string()),
            }),
        }
    }

    /// All curated playlists.
    ///
    /// Playlists whose entries are bare track ids are resolved against the
    /// full track listing, fetched once.
    pub async fn get_playlists(&self) -> Result<Vec<Playlist>> {
        let url = format!("{}/catalog/selection/all", self.base_url);
        debug!(url = %url, "Fetching playlists");

        let response = send(self.http.get(&url)).await?;
        let status = response.status().as_u16();
        let envelope: Envelope<Vec<PlaylistWire>> = read_json(response, "playlist listing").await?;

        if !envelope.success {
            return Err(ServerClientError::ServerError {
                status,
                message: envelope
                    .message
                    .unwrap_or_else(|| "Failed to load playlists".to_string()),
            });
        }

        let wires = envelope.data.unwrap_or_default();
        let catalog = self.catalog_for(&wires).await?;
        Ok(wires
            .into_iter()
            .map(|wire| wire.into_playlist(&catalog))
            .collect())
    }

    /// One playlist, normalized from whichever response shape the service
    /// sends.
    pub async fn get_playlist_by_id(&self, id: PlaylistId) -> Result<Playlist> {
        let url = format!("{}/catalog/selection/{}/", self.base_url, id);
        debug!(url = %url, "Fetching playlist");

        let response = send(self.http.get(&url)).await?;
        let status = response.status().as_u16();
        let wire = read_json::<PlaylistResponse>(response, "playlist")
            .await?
            .into_wire(status)?;

        let catalog = self.catalog_for(std::slice::from_ref(&wire)).await?;
        Ok(wire.into_playlist(&catalog))
    }

    async fn catalog_for(&self, wires: &[PlaylistWire]) -> Result<Vec<Track>> {
        if wires.iter().any(PlaylistWire::has_bare_ids) {
            debug!("Playlist entries reference track ids, loading catalog");
            self.get_all_tracks().await
        } else {
            Ok(Vec::new())
        }
    }
}
