use entities::album;
use entities::album_local_model::{AlbumChanges, AlbumModel};
use entities::prelude::{Album, Song};
use entities::song;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::{StoreError, StoreResult};

/// Newest first.
pub async fn get_albums<C: ConnectionTrait>(db: &C) -> StoreResult<Vec<album::Model>> {
    Ok(Album::find()
        .order_by_desc(album::Column::CreatedAt)
        .order_by_desc(album::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_album_by_id<C: ConnectionTrait>(
    db: &C,
    album_id: i32,
) -> StoreResult<album::Model> {
    Album::find_by_id(album_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound)
}

pub async fn album_exists<C: ConnectionTrait>(db: &C, album_id: i32) -> StoreResult<bool> {
    Ok(Album::find_by_id(album_id).count(db).await? > 0)
}

pub async fn add_album<C: ConnectionTrait>(db: &C, album: AlbumModel) -> StoreResult<album::Model> {
    let model = album::ActiveModel::from(album).insert(db).await?;
    info!("Added album {} with id {}", model.title, model.id);
    Ok(model)
}

pub async fn update_album<C: ConnectionTrait>(
    db: &C,
    album_id: i32,
    changes: AlbumChanges,
) -> StoreResult<album::Model> {
    let mut active = get_album_by_id(db, album_id).await?.into_active_model();
    changes.apply(&mut active);
    Ok(active.update(db).await?)
}

/// Removes the album together with every song on it, or nothing at all.
pub async fn delete_album_by_id<C: TransactionTrait>(db: &C, album_id: i32) -> StoreResult<()> {
    let txn = db.begin().await?;
    if Album::find_by_id(album_id).one(&txn).await?.is_none() {
        txn.rollback().await?;
        return Err(StoreError::NotFound);
    }
    let songs = Song::delete_many()
        .filter(song::Column::AlbumId.eq(album_id))
        .exec(&txn)
        .await?;
    Album::delete_by_id(album_id).exec(&txn).await?;
    txn.commit().await?;
    info!(
        "Deleted album {} along with {} songs",
        album_id, songs.rows_affected
    );
    Ok(())
}

pub async fn count_albums<C: ConnectionTrait>(db: &C) -> StoreResult<u64> {
    Ok(Album::find().count(db).await?)
}

pub async fn get_distinct_album_artists<C: ConnectionTrait>(db: &C) -> StoreResult<Vec<String>> {
    Ok(Album::find()
        .select_only()
        .column(album::Column::Artist)
        .distinct()
        .into_tuple()
        .all(db)
        .await?)
}
