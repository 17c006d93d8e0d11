use std::collections::HashMap;

use entities::prelude::Song;
use entities::song;
use entities::song_local_model::{SongChanges, SongModel};
use log::info;
use rand::seq::SliceRandom;
use rand::thread_rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::{StoreError, StoreResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SongOrder {
    /// Primary key order.
    Default,
    NewestFirst,
}

pub async fn get_songs<C: ConnectionTrait>(
    db: &C,
    order: SongOrder,
) -> StoreResult<Vec<song::Model>> {
    let query = match order {
        SongOrder::Default => Song::find().order_by_asc(song::Column::Id),
        SongOrder::NewestFirst => Song::find()
            .order_by_desc(song::Column::CreatedAt)
            .order_by_desc(song::Column::Id),
    };
    Ok(query.all(db).await?)
}

pub async fn get_song_by_id<C: ConnectionTrait>(db: &C, song_id: i32) -> StoreResult<song::Model> {
    Song::find_by_id(song_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound)
}

pub async fn get_songs_by_album_id<C: ConnectionTrait>(
    db: &C,
    album_id: i32,
) -> StoreResult<Vec<song::Model>> {
    Ok(Song::find()
        .filter(song::Column::AlbumId.eq(album_id))
        .order_by_asc(song::Column::Id)
        .all(db)
        .await?)
}

pub async fn add_song<C: ConnectionTrait>(db: &C, song: SongModel) -> StoreResult<song::Model> {
    let model = song::ActiveModel::from(song).insert(db).await?;
    info!("Added song {} with id {}", model.title, model.id);
    Ok(model)
}

pub async fn update_song<C: ConnectionTrait>(
    db: &C,
    song_id: i32,
    changes: SongChanges,
) -> StoreResult<song::Model> {
    let mut active = get_song_by_id(db, song_id).await?.into_active_model();
    changes.apply(&mut active);
    Ok(active.update(db).await?)
}

pub async fn delete_song_by_id<C: ConnectionTrait>(db: &C, song_id: i32) -> StoreResult<()> {
    let ret = Song::delete_by_id(song_id).exec(db).await?;
    if ret.rows_affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub async fn count_songs<C: ConnectionTrait>(db: &C) -> StoreResult<u64> {
    Ok(Song::find().count(db).await?)
}

/// Up to `size` distinct songs, drawn uniformly at random.
pub async fn sample_songs<C: ConnectionTrait>(
    db: &C,
    size: usize,
) -> StoreResult<Vec<song::Model>> {
    let mut song_ids: Vec<i32> = Song::find()
        .select_only()
        .column(song::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    song_ids.shuffle(&mut thread_rng());
    song_ids.truncate(size);
    if song_ids.is_empty() {
        return Ok(vec![]);
    }
    let mut songs = Song::find()
        .filter(song::Column::Id.is_in(song_ids.clone()))
        .all(db)
        .await?;
    // Keep the drawn order, not the store's
    songs.sort_by_key(|s| song_ids.iter().position(|id| *id == s.id));
    Ok(songs)
}

pub async fn get_distinct_song_artists<C: ConnectionTrait>(db: &C) -> StoreResult<Vec<String>> {
    Ok(Song::find()
        .select_only()
        .column(song::Column::Artist)
        .distinct()
        .into_tuple()
        .all(db)
        .await?)
}

/// Number of songs per album, for every album in `album_ids` that has any.
pub async fn count_songs_by_album<C: ConnectionTrait>(
    db: &C,
    album_ids: Vec<i32>,
) -> StoreResult<HashMap<i32, u64>> {
    if album_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Option<i32>, i64)> = Song::find()
        .select_only()
        .column(song::Column::AlbumId)
        .column_as(Expr::col(song::Column::Id).count(), "songs_count")
        .filter(song::Column::AlbumId.is_in(album_ids))
        .group_by(song::Column::AlbumId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(album_id, count)| album_id.map(|id| (id, count.max(0) as u64)))
        .collect())
}
