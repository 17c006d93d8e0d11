use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use entities::album_local_model::AlbumModel;
use entities::song_local_model::SongModel;
use entities::user_local_model::UserModel;
use entities::{album, song, user};
use jsonwebtoken::{encode, EncodingKey, Header};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth_middleware::{Claims, TokenVerifier};
use crate::policies::AdminEmail;
use crate::routes::build_router;
use crate::AppState;

pub const SECRET: &str = "test-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";

pub fn token_for(user_id: i32) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let connection = Database::connect(options).await.unwrap();
        Migrator::up(&connection, None).await.unwrap();
        Self {
            state: AppState::new(
                connection,
                Arc::new(AdminEmail::new(ADMIN_EMAIL)),
                TokenVerifier::new(SECRET),
            ),
        }
    }

    /// Sends a request through the full router and returns the status and
    /// the JSON body (`Null` when empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = build_router(self.state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn user(&self, email: &str, full_name: &str) -> user::Model {
        queries::users::add_user(
            &self.state.connection,
            UserModel {
                email: email.to_string(),
                password: "pbkdf2_sha256$hash".to_string(),
                full_name: full_name.to_string(),
                image_url: None,
                is_staff: false,
                is_superuser: false,
            },
        )
        .await
        .unwrap()
    }

    /// The configured administrator and a bearer token for them.
    pub async fn admin(&self) -> (user::Model, String) {
        let admin = self.user(ADMIN_EMAIL, "Admin").await;
        let token = token_for(admin.id);
        (admin, token)
    }

    pub async fn album(&self, title: &str, artist: &str) -> album::Model {
        queries::albums::add_album(
            &self.state.connection,
            AlbumModel {
                title: title.to_string(),
                artist: artist.to_string(),
                image_url: format!("/covers/{title}.jpg"),
                release_year: 2021,
            },
        )
        .await
        .unwrap()
    }

    pub async fn song(&self, title: &str, artist: &str, album_id: Option<i32>) -> song::Model {
        queries::songs::add_song(
            &self.state.connection,
            SongModel {
                title: title.to_string(),
                artist: artist.to_string(),
                image_url: format!("/covers/{title}.jpg"),
                audio_url: format!("/audio/{title}.mp3"),
                duration: 200,
                album_id,
            },
        )
        .await
        .unwrap()
    }
}
