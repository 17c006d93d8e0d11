use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use entities::song;
use entities::song_local_model::{SongChanges, SongModel};
use log::info;
use queries::songs::SongOrder;
use sea_orm::ConnectionTrait;
use serde::Deserialize;

use crate::auth_middleware::Principal;
use crate::endpoint_handlers::{double_option, require_admin, FieldErrors, Mode, Path};
use crate::errors::ApiError;
use crate::policies::admin_only;
use crate::responses::song_response::{song_list, SongListItem, SongResponse};
use crate::AppState;

const FEATURED_COUNT: usize = 6;
const MADE_FOR_YOU_COUNT: usize = 4;
const TRENDING_COUNT: usize = 4;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SongPayload {
    title: Option<String>,
    artist: Option<String>,
    image_url: Option<String>,
    audio_url: Option<String>,
    duration: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    album: Option<Option<i32>>,
}

impl SongPayload {
    async fn validate<C: ConnectionTrait>(
        self,
        db: &C,
        mode: Mode,
    ) -> Result<SongChanges, ApiError> {
        let mut errors = FieldErrors::default();
        let title = errors.text("title", self.title, mode);
        let artist = errors.text("artist", self.artist, mode);
        let image_url = errors.text("imageUrl", self.image_url, mode);
        let audio_url = errors.text("audioUrl", self.audio_url, mode);
        let duration = errors.required("duration", self.duration, mode);
        if duration.is_some_and(|d| d < 0) {
            errors.add("duration", "Ensure this value is greater than or equal to 0.");
        }
        if let Some(Some(album_id)) = self.album {
            if !queries::albums::album_exists(db, album_id).await? {
                errors.missing_record("album", album_id);
            }
        }
        errors.finish()?;
        Ok(SongChanges {
            title,
            artist,
            image_url,
            audio_url,
            duration,
            album_id: self.album,
        })
    }
}

fn new_song(changes: SongChanges) -> Option<SongModel> {
    Some(SongModel {
        title: changes.title?,
        artist: changes.artist?,
        image_url: changes.image_url?,
        audio_url: changes.audio_url?,
        duration: changes.duration?,
        album_id: changes.album_id.flatten(),
    })
}

/// Full representation, with the album title looked up fresh.
async fn song_detail<C: ConnectionTrait>(
    db: &C,
    song: song::Model,
) -> Result<SongResponse, ApiError> {
    let album_title = match song.album_id {
        Some(album_id) => Some(queries::albums::get_album_by_id(db, album_id).await?.title),
        None => None,
    };
    Ok(SongResponse::from_song(song, album_title))
}

/// The whole catalog. The administrator sees it newest first.
pub async fn get_songs(
    State(state): State<AppState>,
    principal: Option<Principal>,
) -> Result<Json<Vec<SongListItem>>, ApiError> {
    let order = if admin_only(state.admin.as_ref(), principal.as_ref()) {
        SongOrder::NewestFirst
    } else {
        SongOrder::Default
    };
    let songs = queries::songs::get_songs(&state.connection, order).await?;
    Ok(Json(song_list(songs)))
}

pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SongResponse>, ApiError> {
    let song = queries::songs::get_song_by_id(&state.connection, id).await?;
    Ok(Json(song_detail(&state.connection, song).await?))
}

pub async fn create_song(
    State(state): State<AppState>,
    principal: Option<Principal>,
    payload: Result<Json<SongPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<SongResponse>), ApiError> {
    require_admin(&state, principal.as_ref())?;
    let Json(payload) = payload?;
    let changes = payload.validate(&state.connection, Mode::Full).await?;
    let song = new_song(changes)
        .ok_or_else(|| ApiError::Internal("validated song is incomplete".to_string()))?;
    let song = queries::songs::add_song(&state.connection, song).await?;
    Ok((
        StatusCode::CREATED,
        Json(song_detail(&state.connection, song).await?),
    ))
}

async fn update_song(
    state: AppState,
    principal: Option<Principal>,
    id: i32,
    payload: Result<Json<SongPayload>, JsonRejection>,
    mode: Mode,
) -> Result<Json<SongResponse>, ApiError> {
    require_admin(&state, principal.as_ref())?;
    queries::songs::get_song_by_id(&state.connection, id).await?;
    let Json(payload) = payload?;
    let changes = payload.validate(&state.connection, mode).await?;
    let song = queries::songs::update_song(&state.connection, id, changes).await?;
    info!("Updated song {} with id {}", song.title, song.id);
    Ok(Json(song_detail(&state.connection, song).await?))
}

pub async fn replace_song(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<SongPayload>, JsonRejection>,
) -> Result<Json<SongResponse>, ApiError> {
    update_song(state, principal, id, payload, Mode::Full).await
}

pub async fn patch_song(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<SongPayload>, JsonRejection>,
) -> Result<Json<SongResponse>, ApiError> {
    update_song(state, principal, id, payload, Mode::Partial).await
}

pub async fn delete_song(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, principal.as_ref())?;
    queries::songs::delete_song_by_id(&state.connection, id).await?;
    info!("Deleted song with id {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn sample(state: &AppState, size: usize) -> Result<Json<Vec<SongListItem>>, ApiError> {
    let songs = queries::songs::sample_songs(&state.connection, size).await?;
    Ok(Json(song_list(songs)))
}

pub async fn get_featured(
    State(state): State<AppState>,
) -> Result<Json<Vec<SongListItem>>, ApiError> {
    sample(&state, FEATURED_COUNT).await
}

pub async fn get_made_for_you(
    State(state): State<AppState>,
) -> Result<Json<Vec<SongListItem>>, ApiError> {
    sample(&state, MADE_FOR_YOU_COUNT).await
}

pub async fn get_trending(
    State(state): State<AppState>,
) -> Result<Json<Vec<SongListItem>>, ApiError> {
    sample(&state, TRENDING_COUNT).await
}
