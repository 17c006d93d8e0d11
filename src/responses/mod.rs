use serde::Serialize;

use crate::errors::FieldMessages;

pub mod album_response;
pub mod message_response;
pub mod song_response;
pub mod stats_response;
pub mod user_response;

#[derive(Serialize, Clone, Debug)]
pub struct ErrorResponse {
    pub(crate) error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) fields: Option<FieldMessages>,
}

#[derive(Serialize, Clone, Debug)]
pub struct AdminCheckResponse {
    pub(crate) admin: bool,
}
