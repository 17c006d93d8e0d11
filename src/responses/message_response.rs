use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entities::{message, user};
use serde::Serialize;

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub(crate) id: i32,
    pub(crate) sender: i32,
    pub(crate) sender_email: String,
    pub(crate) sender_name: String,
    pub(crate) receiver: i32,
    pub(crate) receiver_email: String,
    pub(crate) receiver_name: String,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl MessageResponse {
    /// `None` if either party is missing from `users`.
    pub fn from_message(
        message: message::Model,
        users: &HashMap<i32, user::Model>,
    ) -> Option<Self> {
        let sender = users.get(&message.sender_id)?;
        let receiver = users.get(&message.receiver_id)?;
        Some(Self {
            id: message.id,
            sender: sender.id,
            sender_email: sender.email.to_owned(),
            sender_name: sender.full_name.to_owned(),
            receiver: receiver.id,
            receiver_email: receiver.email.to_owned(),
            receiver_name: receiver.full_name.to_owned(),
            content: message.content,
            created_at: message.created_at,
            updated_at: message.updated_at,
        })
    }
}
