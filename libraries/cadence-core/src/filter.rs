//! Catalog search and facet helpers
//!
//! Mirrors what the track list offers: a free-text search over title,
//! artist and album, plus artist/genre/year facets.

use crate::types::Track;
use std::collections::BTreeSet;

/// Criteria for narrowing a track listing
///
/// All set criteria must match. An empty filter matches every track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackFilter {
    /// Case-insensitive substring of name, author or album
    pub query: Option<String>,

    /// Exact artist name
    pub artist: Option<String>,

    /// Genre the track must carry
    pub genre: Option<String>,

    /// Release year
    pub year: Option<i32>,
}

impl TrackFilter {
    /// Filter matching everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict by free-text search
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Restrict to one artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Restrict to one genre
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Restrict to one release year
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Whether no criteria are set
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.artist.is_none() && self.genre.is_none() && self.year.is_none()
    }

    /// Check a single track
    pub fn matches(&self, track: &Track) -> bool {
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            let hit = track.name.to_lowercase().contains(&query)
                || track.author.to_lowercase().contains(&query)
                || track.album.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }

        if let Some(artist) = &self.artist {
            if &track.author != artist {
                return false;
            }
        }

        if let Some(genre) = &self.genre {
            if !track.genre.iter().any(|g| g == genre) {
                return false;
            }
        }

        if let Some(year) = self.year {
            if track.release_year() != Some(year) {
                return false;
            }
        }

        true
    }

    /// Tracks matching the filter, in their original order
    pub fn apply<'a>(&self, tracks: &'a [Track]) -> Vec<&'a Track> {
        tracks.iter().filter(|track| self.matches(track)).collect()
    }
}

/// Distinct artist names, sorted
pub fn unique_artists(tracks: &[Track]) -> Vec<String> {
    tracks
        .iter()
        .map(|track| track.author.as_str())
        .filter(|artist| !artist.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Distinct genres across all tracks, sorted
pub fn unique_genres(tracks: &[Track]) -> Vec<String> {
    tracks
        .iter()
        .flat_map(|track| track.genre.iter())
        .filter(|genre| !genre.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct release years, newest first
pub fn unique_years(tracks: &[Track]) -> Vec<i32> {
    tracks
        .iter()
        .filter_map(Track::release_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}
