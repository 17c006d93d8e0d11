use axum::routing::get;
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;

use crate::auth_middleware::auth_middleware;
use crate::endpoint_handlers::{admin, albums, messages, songs, users};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Users
        .route("/users/", get(users::get_users))
        .route("/users/:id/", get(users::get_user))
        .route("/users/:id/messages/", get(users::get_conversation))
        // Songs
        .route("/songs/", get(songs::get_songs).post(songs::create_song))
        .route("/songs/featured/", get(songs::get_featured))
        .route("/songs/made-for-you/", get(songs::get_made_for_you))
        .route("/songs/trending/", get(songs::get_trending))
        .route(
            "/songs/:id/",
            get(songs::get_song)
                .put(songs::replace_song)
                .patch(songs::patch_song)
                .delete(songs::delete_song),
        )
        // Albums
        .route("/albums/", get(albums::get_albums).post(albums::create_album))
        .route(
            "/albums/:id/",
            get(albums::get_album)
                .put(albums::replace_album)
                .patch(albums::patch_album)
                .delete(albums::delete_album),
        )
        // Messages
        .route(
            "/messages/",
            get(messages::get_messages).post(messages::create_message),
        )
        .route(
            "/messages/:id/",
            get(messages::get_message)
                .put(messages::replace_message)
                .patch(messages::patch_message)
                .delete(messages::delete_message),
        )
        // Administration
        .route("/admin/check/", get(admin::check_admin))
        .route("/stats/", get(admin::get_stats))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
