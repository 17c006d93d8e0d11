use axum::extract::State;
use axum::Json;
use log::warn;

use crate::auth_middleware::Principal;
use crate::endpoint_handlers::require_admin;
use crate::errors::ApiError;
use crate::responses::stats_response::{count_artists, StatsResponse};
use crate::responses::AdminCheckResponse;
use crate::AppState;

pub async fn check_admin(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<AdminCheckResponse>, ApiError> {
    if !state.admin.is_admin(&principal) {
        warn!("User {} asked for admin rights", principal.email);
        return Err(ApiError::Forbidden);
    }
    Ok(Json(AdminCheckResponse { admin: true }))
}

pub async fn get_stats(
    State(state): State<AppState>,
    principal: Option<Principal>,
) -> Result<Json<StatsResponse>, ApiError> {
    require_admin(&state, principal.as_ref())?;
    let db = &state.connection;
    let song_artists = queries::songs::get_distinct_song_artists(db).await?;
    let album_artists = queries::albums::get_distinct_album_artists(db).await?;
    Ok(Json(StatsResponse {
        total_songs: queries::songs::count_songs(db).await?,
        total_albums: queries::albums::count_albums(db).await?,
        total_users: queries::users::count_users(db).await?,
        total_artists: count_artists(song_artists, album_artists),
    }))
}
