use chrono::{DateTime, Utc};
use entities::song;
use serde::Serialize;

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SongResponse {
    pub(crate) id: i32,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) image_url: String,
    pub(crate) audio_url: String,
    pub(crate) duration: i32,
    pub(crate) album: Option<i32>,
    pub(crate) album_title: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl SongResponse {
    pub fn from_song(song: song::Model, album_title: Option<String>) -> Self {
        Self {
            id: song.id,
            title: song.title,
            artist: song.artist,
            image_url: song.image_url,
            audio_url: song.audio_url,
            duration: song.duration,
            album: song.album_id,
            album_title,
            created_at: song.created_at,
            updated_at: song.updated_at,
        }
    }
}

/// List entry. The audio reference is only handed out on the detail view.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SongListItem {
    pub(crate) id: i32,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) image_url: String,
    pub(crate) duration: i32,
}

impl From<song::Model> for SongListItem {
    fn from(song: song::Model) -> Self {
        Self {
            id: song.id,
            title: song.title,
            artist: song.artist,
            image_url: song.image_url,
            duration: song.duration,
        }
    }
}

pub fn song_list(songs: Vec<song::Model>) -> Vec<SongListItem> {
    songs.into_iter().map(SongListItem::from).collect()
}
