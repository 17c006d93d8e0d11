use axum::extract::State;
use axum::Json;

use crate::auth_middleware::Principal;
use crate::endpoint_handlers::messages::message_responses;
use crate::endpoint_handlers::Path;
use crate::errors::ApiError;
use crate::responses::message_response::MessageResponse;
use crate::responses::user_response::UserResponse;
use crate::AppState;

/// Everyone the caller could talk to.
pub async fn get_users(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = queries::users::get_users_except(&state.connection, principal.id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// The caller's own record is not reachable here, matching the listing.
pub async fn get_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    if id == principal.id {
        return Err(ApiError::NotFound);
    }
    let user = queries::users::get_user_by_id(&state.connection, id).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn get_conversation(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    if id == principal.id {
        return Err(ApiError::NotFound);
    }
    queries::users::get_user_by_id(&state.connection, id).await?;
    let messages = queries::messages::get_conversation(&state.connection, principal.id, id).await?;
    Ok(Json(message_responses(&state.connection, messages).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::test_support::{token_for, TestApp};

    #[tokio::test]
    async fn listing_excludes_the_caller() {
        let app = TestApp::new().await;
        let ana = app.user("ana@example.com", "Ana").await;
        let bob = app.user("bob@example.com", "Bob").await;
        let cid = app.user("cid@example.com", "Cid").await;

        let (status, body) = app
            .request(Method::GET, "/users/", Some(&token_for(ana.id)), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![cid.id as i64, bob.id as i64]);
        assert_eq!(body[0]["email"], "cid@example.com");
        assert_eq!(body[0]["name"], "Cid");
        assert!(body[0].get("password").is_none());
    }

    #[tokio::test]
    async fn users_require_a_valid_token() {
        let app = TestApp::new().await;
        let (status, _) = app.request(Method::GET, "/users/", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app
            .request(Method::GET, "/users/", Some("not-a-token"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        // Token for a user that does not exist
        let (status, _) = app
            .request(Method::GET, "/users/", Some(&token_for(42)), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn single_user_lookup() {
        let app = TestApp::new().await;
        let ana = app.user("ana@example.com", "Ana").await;
        let bob = app.user("bob@example.com", "Bob").await;
        let token = token_for(ana.id);

        let (status, body) = app
            .request(Method::GET, &format!("/users/{}/", bob.id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "bob@example.com");
        assert_eq!(body["imageUrl"], json!(null));

        let (status, _) = app
            .request(Method::GET, &format!("/users/{}/", ana.id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app
            .request(Method::GET, "/users/999/", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn conversation_is_the_same_from_both_sides() {
        let app = TestApp::new().await;
        let ana = app.user("ana@example.com", "Ana").await;
        let bob = app.user("bob@example.com", "Bob").await;
        let cid = app.user("cid@example.com", "Cid").await;
        let ana_token = token_for(ana.id);
        let bob_token = token_for(bob.id);

        for (token, receiver, content) in [
            (&ana_token, bob.id, "hi bob"),
            (&bob_token, ana.id, "hi ana"),
            (&ana_token, cid.id, "hi cid"),
            (&ana_token, bob.id, "bye bob"),
        ] {
            let (status, _) = app
                .request(
                    Method::POST,
                    "/messages/",
                    Some(token),
                    Some(json!({"receiver": receiver, "content": content})),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, from_ana) = app
            .request(Method::GET, &format!("/users/{}/messages/", bob.id), Some(&ana_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let (_, from_bob) = app
            .request(Method::GET, &format!("/users/{}/messages/", ana.id), Some(&bob_token), None)
            .await;
        assert_eq!(from_ana, from_bob);
        let contents: Vec<&str> = from_ana
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["hi bob", "hi ana", "bye bob"]);

        let (status, _) = app
            .request(Method::GET, "/users/999/messages/", Some(&ana_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app
            .request(Method::GET, &format!("/users/{}/messages/", ana.id), Some(&ana_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
