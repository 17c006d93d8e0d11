use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use entities::user;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::warn;
use queries::StoreError;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::AppState;

/// The authenticated caller of a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<user::Model> for Principal {
    fn from(user: user::Model) -> Self {
        Principal {
            id: user.id,
            email: user.email,
            name: user.full_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub exp: i64,
}

/// Checks bearer tokens minted by the identity provider.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Id of the user the token was issued to.
    pub fn verify(&self, token: &str) -> Result<i32, ApiError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            warn!("Rejected bearer token: {}", err);
            ApiError::InvalidToken
        })?;
        data.claims.sub.parse().map_err(|_| {
            warn!("Bearer token subject is not a user id: {}", data.claims.sub);
            ApiError::InvalidToken
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

/// Resolves the bearer token, if any, into a [`Principal`] stored on the
/// request. Requests without a token pass through anonymously; a token that
/// does not resolve to an active user is rejected outright.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()) else {
        return Ok(next.run(request).await);
    };
    let user_id = state.tokens.verify(&token)?;
    let user = match queries::users::get_user_by_id(&state.connection, user_id).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            warn!("Token for unknown user {}", user_id);
            return Err(ApiError::InvalidToken);
        }
        Err(err) => return Err(err.into()),
    };
    if !user.is_active {
        warn!("Inactive user {} tried to authenticate", user.email);
        return Err(ApiError::InvalidToken);
    }

    request.extensions_mut().insert(Principal::from(user));
    Ok(next.run(request).await)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(ApiError::Unauthenticated)
    }
}
