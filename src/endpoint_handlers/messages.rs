use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use entities::message;
use entities::message_local_model::{MessageChanges, MessageModel};
use log::{info, warn};
use queries::StoreError;
use sea_orm::ConnectionTrait;
use serde::Deserialize;

use crate::auth_middleware::Principal;
use crate::endpoint_handlers::{FieldErrors, Mode, Path};
use crate::errors::ApiError;
use crate::policies::{owner_or_read_only, Action};
use crate::responses::message_response::MessageResponse;
use crate::AppState;

/// Any `sender` in the body is ignored: messages are always sent by the caller.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    receiver: Option<i32>,
    content: Option<String>,
}

impl MessagePayload {
    async fn validate<C: ConnectionTrait>(
        self,
        db: &C,
        mode: Mode,
    ) -> Result<MessageChanges, ApiError> {
        let mut errors = FieldErrors::default();
        let receiver_id = errors.required("receiver", self.receiver, mode);
        if let Some(receiver_id) = receiver_id {
            match queries::users::get_user_by_id(db, receiver_id).await {
                Ok(_) => {}
                Err(StoreError::NotFound) => errors.missing_record("receiver", receiver_id),
                Err(err) => return Err(err.into()),
            }
        }
        let content = errors
            .long_text("content", self.content, mode)
            .map(|c| c.trim().to_string());
        errors.finish()?;
        Ok(MessageChanges {
            receiver_id,
            content,
        })
    }
}

/// Attaches sender and receiver details, read from the store as they are now.
pub(crate) async fn message_responses<C: ConnectionTrait>(
    db: &C,
    messages: Vec<message::Model>,
) -> Result<Vec<MessageResponse>, ApiError> {
    let mut user_ids: Vec<i32> = messages
        .iter()
        .flat_map(|m| [m.sender_id, m.receiver_id])
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    let users = queries::users::get_users_by_ids(db, user_ids).await?;
    messages
        .into_iter()
        .map(|m| MessageResponse::from_message(m, &users))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ApiError::Internal("message refers to a missing user".to_string()))
}

async fn message_response<C: ConnectionTrait>(
    db: &C,
    message: message::Model,
) -> Result<MessageResponse, ApiError> {
    message_responses(db, vec![message])
        .await?
        .pop()
        .ok_or_else(|| ApiError::Internal("message response went missing".to_string()))
}

/// A message the caller takes part in, checked against `action`.
async fn load_message(
    state: &AppState,
    principal: &Principal,
    id: i32,
    action: Action,
) -> Result<message::Model, ApiError> {
    let message =
        queries::messages::get_message_for_user(&state.connection, id, principal.id).await?;
    if !owner_or_read_only(principal, &message, action) {
        warn!(
            "User {} tried to modify message {} sent by someone else",
            principal.email, id
        );
        return Err(ApiError::Forbidden);
    }
    Ok(message)
}

pub async fn get_messages(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let messages = queries::messages::get_messages_for_user(&state.connection, principal.id).await?;
    Ok(Json(message_responses(&state.connection, messages).await?))
}

pub async fn get_message(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = load_message(&state, &principal, id, Action::Read).await?;
    Ok(Json(message_response(&state.connection, message).await?))
}

pub async fn create_message(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<MessagePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(payload) = payload?;
    let changes = payload.validate(&state.connection, Mode::Full).await?;
    let (Some(receiver_id), Some(content)) = (changes.receiver_id, changes.content) else {
        return Err(ApiError::Internal("validated message is incomplete".to_string()));
    };
    let message = queries::messages::add_message(
        &state.connection,
        MessageModel {
            sender_id: principal.id,
            receiver_id,
            content,
        },
    )
    .await?;
    info!(
        "{} (user {}) sent message {} to user {}",
        principal.name, principal.id, message.id, receiver_id
    );
    Ok((
        StatusCode::CREATED,
        Json(message_response(&state.connection, message).await?),
    ))
}

async fn update_message(
    state: AppState,
    principal: Principal,
    id: i32,
    payload: Result<Json<MessagePayload>, JsonRejection>,
    mode: Mode,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = load_message(&state, &principal, id, Action::Write).await?;
    let Json(payload) = payload?;
    let changes = payload.validate(&state.connection, mode).await?;
    let message = queries::messages::update_message(&state.connection, message, changes).await?;
    info!("User {} edited message {}", principal.id, message.id);
    Ok(Json(message_response(&state.connection, message).await?))
}

pub async fn replace_message(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    payload: Result<Json<MessagePayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    update_message(state, principal, id, payload, Mode::Full).await
}

pub async fn patch_message(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    payload: Result<Json<MessagePayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    update_message(state, principal, id, payload, Mode::Partial).await
}

pub async fn delete_message(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    load_message(&state, &principal, id, Action::Write).await?;
    queries::messages::delete_message_by_id(&state.connection, id).await?;
    info!("User {} deleted message {}", principal.id, id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::test_support::{token_for, TestApp};

    async fn send(app: &TestApp, token: &str, receiver: i32, content: &str) -> Value {
        let (status, body) = app
            .request(
                Method::POST,
                "/messages/",
                Some(token),
                Some(json!({"receiver": receiver, "content": content})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    #[tokio::test]
    async fn messaging_requires_authentication() {
        let app = TestApp::new().await;
        let (status, _) = app.request(Method::GET, "/messages/", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app
            .request(
                Method::POST,
                "/messages/",
                None,
                Some(json!({"receiver": 1, "content": "hi"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sender_cannot_be_spoofed() {
        let app = TestApp::new().await;
        let ana = app.user("ana@example.com", "Ana").await;
        let bob = app.user("bob@example.com", "Bob").await;
        let eve = app.user("eve@example.com", "Eve").await;

        let (status, body) = app
            .request(
                Method::POST,
                "/messages/",
                Some(&token_for(eve.id)),
                Some(json!({
                    "sender": ana.id,
                    "receiver": bob.id,
                    "content": "  it's ana, honest  "
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["sender"], eve.id);
        assert_eq!(body["senderEmail"], "eve@example.com");
        assert_eq!(body["senderName"], "Eve");
        assert_eq!(body["receiver"], bob.id);
        assert_eq!(body["receiverName"], "Bob");
        assert_eq!(body["content"], "it's ana, honest");

        let (_, inbox) = app
            .request(Method::GET, "/messages/", Some(&token_for(ana.id)), None)
            .await;
        assert_eq!(inbox, json!([]));
    }

    #[tokio::test]
    async fn listing_is_scoped_and_chronological() {
        let app = TestApp::new().await;
        let ana = app.user("ana@example.com", "Ana").await;
        let bob = app.user("bob@example.com", "Bob").await;
        let cid = app.user("cid@example.com", "Cid").await;
        let ana_token = token_for(ana.id);

        let first = send(&app, &ana_token, bob.id, "first").await;
        send(&app, &token_for(bob.id), cid.id, "not ana's business").await;
        let second = send(&app, &token_for(cid.id), ana.id, "second").await;

        let (status, body) = app
            .request(Method::GET, "/messages/", Some(&ana_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], first["id"]);
        assert_eq!(list[1]["id"], second["id"]);

        let (status, _) = app
            .request(
                Method::GET,
                &format!("/messages/{}/", first["id"]),
                Some(&token_for(cid.id)),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = app
            .request(
                Method::GET,
                &format!("/messages/{}/", first["id"]),
                Some(&token_for(bob.id)),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "first");
    }

    #[tokio::test]
    async fn invalid_messages_are_rejected() {
        let app = TestApp::new().await;
        let ana = app.user("ana@example.com", "Ana").await;
        let token = token_for(ana.id);

        let (status, body) = app
            .request(Method::POST, "/messages/", Some(&token), Some(json!({"content": "   "})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"]["receiver"][0], "This field is required.");
        assert_eq!(body["fields"]["content"][0], "This field may not be blank.");

        let (status, body) = app
            .request(
                Method::POST,
                "/messages/",
                Some(&token),
                Some(json!({"receiver": 999, "content": "hello?"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["fields"]["receiver"][0],
            "Invalid pk \"999\" - object does not exist."
        );
    }

    #[tokio::test]
    async fn only_the_sender_edits_or_deletes() {
        let app = TestApp::new().await;
        let ana = app.user("ana@example.com", "Ana").await;
        let bob = app.user("bob@example.com", "Bob").await;
        let cid = app.user("cid@example.com", "Cid").await;
        let ana_token = token_for(ana.id);
        let bob_token = token_for(bob.id);

        let sent = send(&app, &ana_token, bob.id, "draft").await;
        let uri = format!("/messages/{}/", sent["id"]);

        let (status, _) = app
            .request(
                Method::PATCH,
                &uri,
                Some(&bob_token),
                Some(json!({"content": "edited by bob"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.request(Method::DELETE, &uri, Some(&bob_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app
            .request(Method::DELETE, &uri, Some(&token_for(cid.id)), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .request(Method::PATCH, &uri, Some(&ana_token), Some(json!({"content": "final"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "final");
        assert_eq!(body["receiver"], bob.id);

        let (status, body) = app
            .request(Method::PUT, &uri, Some(&ana_token), Some(json!({"content": "no receiver"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["fields"].get("receiver").is_some());

        let (status, _) = app.request(Method::DELETE, &uri, Some(&ana_token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.request(Method::GET, &uri, Some(&bob_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
