use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};

use crate::message::ActiveModel;

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct MessageModel {
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: String,
}

impl From<MessageModel> for ActiveModel {
    fn from(message: MessageModel) -> Self {
        let now = Utc::now();
        ActiveModel {
            id: NotSet,
            sender_id: Set(message.sender_id),
            receiver_id: Set(message.receiver_id),
            content: Set(message.content),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// Sender is fixed at creation and is not part of the change set.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Default)]
pub struct MessageChanges {
    pub receiver_id: Option<i32>,
    pub content: Option<String>,
}

impl MessageChanges {
    pub fn apply(self, active: &mut ActiveModel) {
        if let Some(receiver_id) = self.receiver_id {
            active.receiver_id = Set(receiver_id);
        }
        if let Some(content) = self.content {
            active.content = Set(content);
        }
        active.updated_at = Set(Utc::now());
    }
}
