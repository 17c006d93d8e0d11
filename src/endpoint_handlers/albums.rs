use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use entities::album;
use entities::album_local_model::{AlbumChanges, AlbumModel};
use log::info;
use sea_orm::ConnectionTrait;
use serde::Deserialize;

use crate::auth_middleware::Principal;
use crate::endpoint_handlers::{require_admin, FieldErrors, Mode, Path};
use crate::errors::ApiError;
use crate::responses::album_response::{AlbumDetailResponse, AlbumResponse};
use crate::AppState;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPayload {
    title: Option<String>,
    artist: Option<String>,
    image_url: Option<String>,
    release_year: Option<i32>,
}

impl AlbumPayload {
    fn validate(self, mode: Mode) -> Result<AlbumChanges, ApiError> {
        let mut errors = FieldErrors::default();
        let changes = AlbumChanges {
            title: errors.text("title", self.title, mode),
            artist: errors.text("artist", self.artist, mode),
            image_url: errors.text("imageUrl", self.image_url, mode),
            release_year: errors.required("releaseYear", self.release_year, mode),
        };
        errors.finish()?;
        Ok(changes)
    }
}

fn new_album(changes: AlbumChanges) -> Option<AlbumModel> {
    Some(AlbumModel {
        title: changes.title?,
        artist: changes.artist?,
        image_url: changes.image_url?,
        release_year: changes.release_year?,
    })
}

async fn album_summaries<C: ConnectionTrait>(
    db: &C,
    albums: Vec<album::Model>,
) -> Result<Vec<AlbumResponse>, ApiError> {
    let ids = albums.iter().map(|a| a.id).collect();
    let counts = queries::songs::count_songs_by_album(db, ids).await?;
    Ok(albums
        .into_iter()
        .map(|a| {
            let songs_count = counts.get(&a.id).copied().unwrap_or(0);
            AlbumResponse::from_album(a, songs_count)
        })
        .collect())
}

async fn album_summary<C: ConnectionTrait>(
    db: &C,
    album: album::Model,
) -> Result<AlbumResponse, ApiError> {
    let mut summaries = album_summaries(db, vec![album]).await?;
    summaries
        .pop()
        .ok_or_else(|| ApiError::Internal("album summary went missing".to_string()))
}

pub async fn get_albums(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlbumResponse>>, ApiError> {
    let albums = queries::albums::get_albums(&state.connection).await?;
    Ok(Json(album_summaries(&state.connection, albums).await?))
}

pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AlbumDetailResponse>, ApiError> {
    let album = queries::albums::get_album_by_id(&state.connection, id).await?;
    let songs = queries::songs::get_songs_by_album_id(&state.connection, album.id).await?;
    Ok(Json(AlbumDetailResponse::from_album(album, songs)))
}

pub async fn create_album(
    State(state): State<AppState>,
    principal: Option<Principal>,
    payload: Result<Json<AlbumPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<AlbumResponse>), ApiError> {
    require_admin(&state, principal.as_ref())?;
    let Json(payload) = payload?;
    let album = new_album(payload.validate(Mode::Full)?)
        .ok_or_else(|| ApiError::Internal("validated album is incomplete".to_string()))?;
    let album = queries::albums::add_album(&state.connection, album).await?;
    Ok((
        StatusCode::CREATED,
        Json(AlbumResponse::from_album(album, 0)),
    ))
}

async fn update_album(
    state: AppState,
    principal: Option<Principal>,
    id: i32,
    payload: Result<Json<AlbumPayload>, JsonRejection>,
    mode: Mode,
) -> Result<Json<AlbumResponse>, ApiError> {
    require_admin(&state, principal.as_ref())?;
    queries::albums::get_album_by_id(&state.connection, id).await?;
    let Json(payload) = payload?;
    let changes = payload.validate(mode)?;
    let album = queries::albums::update_album(&state.connection, id, changes).await?;
    info!("Updated album {} with id {}", album.title, album.id);
    Ok(Json(album_summary(&state.connection, album).await?))
}

pub async fn replace_album(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<AlbumPayload>, JsonRejection>,
) -> Result<Json<AlbumResponse>, ApiError> {
    update_album(state, principal, id, payload, Mode::Full).await
}

pub async fn patch_album(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<AlbumPayload>, JsonRejection>,
) -> Result<Json<AlbumResponse>, ApiError> {
    update_album(state, principal, id, payload, Mode::Partial).await
}

/// Songs on the album go with it.
pub async fn delete_album(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, principal.as_ref())?;
    queries::albums::delete_album_by_id(&state.connection, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
