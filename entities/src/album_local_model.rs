use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};

use crate::album::ActiveModel;

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct AlbumModel {
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub release_year: i32,
}

impl From<AlbumModel> for ActiveModel {
    fn from(album: AlbumModel) -> Self {
        let now = Utc::now();
        ActiveModel {
            id: NotSet,
            title: Set(album.title),
            artist: Set(album.artist),
            image_url: Set(album.image_url),
            release_year: Set(album.release_year),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// Field set for a partial update. `None` leaves the column untouched.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Default)]
pub struct AlbumChanges {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub image_url: Option<String>,
    pub release_year: Option<i32>,
}

impl AlbumChanges {
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
        if let Some(release_year) = self.release_year {
            active.release_year = Set(release_year);
        }
        active.updated_at = Set(Utc::now());
    }
}
