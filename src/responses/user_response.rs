use chrono::{DateTime, Utc};
use entities::user;
use serde::Serialize;

/// Public view of a user. Credentials and account flags stay behind.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub(crate) id: i32,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) image_url: Option<String>,
    pub(crate) date_joined: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.full_name,
            image_url: user.image_url,
            date_joined: user.date_joined,
        }
    }
}
