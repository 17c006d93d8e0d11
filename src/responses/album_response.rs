use chrono::{DateTime, Utc};
use entities::{album, song};
use serde::Serialize;

use crate::responses::song_response::SongResponse;

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    pub(crate) id: i32,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) image_url: String,
    pub(crate) release_year: i32,
    pub(crate) songs_count: u64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl AlbumResponse {
    pub fn from_album(album: album::Model, songs_count: u64) -> Self {
        Self {
            id: album.id,
            title: album.title,
            artist: album.artist,
            image_url: album.image_url,
            release_year: album.release_year,
            songs_count,
            created_at: album.created_at,
            updated_at: album.updated_at,
        }
    }
}

/// Single album with every song on it, in full.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetailResponse {
    pub(crate) id: i32,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) image_url: String,
    pub(crate) release_year: i32,
    pub(crate) songs: Vec<SongResponse>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl AlbumDetailResponse {
    pub fn from_album(album: album::Model, songs: Vec<song::Model>) -> Self {
        let songs = songs
            .into_iter()
            .map(|s| SongResponse::from_song(s, Some(album.title.to_owned())))
            .collect();
        Self {
            id: album.id,
            title: album.title,
            artist: album.artist,
            image_url: album.image_url,
            release_year: album.release_year,
            songs,
            created_at: album.created_at,
            updated_at: album.updated_at,
        }
    }
}
