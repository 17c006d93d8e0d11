use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};

use crate::song::ActiveModel;

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct SongModel {
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub audio_url: String,
    pub duration: i32,
    pub album_id: Option<i32>,
}

impl From<SongModel> for ActiveModel {
    fn from(song: SongModel) -> Self {
        let now = Utc::now();
        ActiveModel {
            id: NotSet,
            title: Set(song.title),
            artist: Set(song.artist),
            image_url: Set(song.image_url),
            audio_url: Set(song.audio_url),
            duration: Set(song.duration),
            album_id: Set(song.album_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// Field set for a partial update. `album_id: Some(None)` detaches the song
/// from its album, `None` leaves it as is.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Default)]
pub struct SongChanges {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub duration: Option<i32>,
    pub album_id: Option<Option<i32>>,
}

impl SongChanges {
    pub fn apply(self, active: &mut ActiveModel) {
        if let Some(title) = self.title {
            active.title = Set(title);
        }
        if let Some(artist) = self.artist {
            active.artist = Set(artist);
        }
        if let Some(image_url) = self.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(audio_url) = self.audio_url {
            active.audio_url = Set(audio_url);
        }
        if let Some(duration) = self.duration {
            active.duration = Set(duration);
        }
        if let Some(album_id) = self.album_id {
            active.album_id = Set(album_id);
        }
        active.updated_at = Set(Utc::now());
    }
}
