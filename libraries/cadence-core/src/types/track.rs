/// Track domain type
use crate::types::TrackId;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// A catalog track
///
/// Field names follow the catalog wire format so the same type can be
/// persisted locally (favorites) and decoded from API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    #[serde(rename = "_id")]
    pub id: TrackId,

    /// Track title
    pub name: String,

    /// Performing artist
    #[serde(default)]
    pub author: String,

    /// Album name
    #[serde(default)]
    pub album: String,

    /// Genres, in catalog order
    #[serde(default)]
    pub genre: Vec<String>,

    /// Release date as sent by the catalog (`YYYY-MM-DD`)
    #[serde(default)]
    pub release_date: Option<String>,

    /// Duration in whole seconds
    #[serde(rename = "duration_in_seconds", default)]
    pub duration_secs: u32,

    /// Playable media URL; `None` when the track has no audio
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub track_file: Option<String>,

    /// Cover image URL
    #[serde(default)]
    pub logo: Option<String>,
}

impl Track {
    /// Create a track with minimal metadata and no media resource
    pub fn new(id: TrackId, name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            author: author.into(),
            album: String::new(),
            genre: Vec::new(),
            release_date: None,
            duration_secs: 0,
            track_file: None,
            logo: None,
        }
    }

    /// Attach a playable media URL
    #[must_use]
    pub fn with_media(mut self, url: impl Into<String>) -> Self {
        self.track_file = Some(url.into());
        self
    }

    /// Set the album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the genre list
    #[must_use]
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genre = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Set the release date (`YYYY-MM-DD`)
    #[must_use]
    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    /// Set the duration in seconds
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// The playable media URL, if the track has audio
    pub fn media_url(&self) -> Option<&str> {
        self.track_file.as_deref()
    }

    /// Whether the track can be played at all
    pub fn has_media(&self) -> bool {
        self.track_file.is_some()
    }

    /// Track duration as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }

    /// Release year, read from the leading component of the release date
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?.trim();
        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(parsed.year());
        }
        date.split('-').next()?.parse().ok()
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|url| !url.trim().is_empty()))
}
