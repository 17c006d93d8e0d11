use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};

use crate::user::ActiveModel;

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct UserModel {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub image_url: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl From<UserModel> for ActiveModel {
    fn from(user: UserModel) -> Self {
        ActiveModel {
            id: NotSet,
            email: Set(user.email),
            password: Set(user.password),
            full_name: Set(user.full_name),
            image_url: Set(user.image_url),
            date_joined: Set(Utc::now()),
            is_active: Set(true),
            is_staff: Set(user.is_staff),
            is_superuser: Set(user.is_superuser),
        }
    }
}
