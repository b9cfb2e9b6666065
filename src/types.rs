use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A visitor's cached Spotify credential. Either absent from the store or
/// fully populated; never partially written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub scope: String,
}

impl Credential {
    /// Seconds until this credential expires, negative if already expired.
    pub fn remaining(&self, now: i64) -> i64 {
        self.expires_at - now
    }
}

/// Wire format of the provider token endpoint, for both the initial code
/// exchange and refresh. `refresh_token` is omitted on refresh unless the
/// provider rotates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Tracks,
    Artists,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Tracks => "tracks",
            ItemType::Artists => "artists",
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tracks" => Ok(ItemType::Tracks),
            "artists" => Ok(ItemType::Artists),
            other => Err(format!("unknown item type: {}", other)),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_term" => Ok(TimeRange::ShortTerm),
            "medium_term" => Ok(TimeRange::MediumTerm),
            "long_term" => Ok(TimeRange::LongTerm),
            other => Err(format!("unknown time range: {}", other)),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    pub items: Vec<TopTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTrack {
    pub name: String,
    pub duration_ms: u64,
    pub artists: Vec<TrackArtist>,
    pub album: TrackAlbum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopArtistsResponse {
    pub items: Vec<TopArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopArtist {
    pub name: String,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackView {
    pub name: String,
    pub artist: String,
    pub duration: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistView {
    pub name: String,
    pub image: Option<String>,
}
