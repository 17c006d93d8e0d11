use std::collections::HashMap;

use entities::prelude::User;
use entities::user;
use entities::user_local_model::UserModel;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::{StoreError, StoreResult};

pub async fn add_user<C: ConnectionTrait>(db: &C, user: UserModel) -> StoreResult<user::Model> {
    Ok(user::ActiveModel::from(user).insert(db).await?)
}

pub async fn get_user_by_id<C: ConnectionTrait>(db: &C, user_id: i32) -> StoreResult<user::Model> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound)
}

/// Everyone but `user_id`, most recently joined first.
pub async fn get_users_except<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> StoreResult<Vec<user::Model>> {
    Ok(User::find()
        .filter(user::Column::Id.ne(user_id))
        .order_by_desc(user::Column::DateJoined)
        .order_by_desc(user::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_users_by_ids<C: ConnectionTrait>(
    db: &C,
    user_ids: Vec<i32>,
) -> StoreResult<HashMap<i32, user::Model>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = User::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn count_users<C: ConnectionTrait>(db: &C) -> StoreResult<u64> {
    Ok(User::find().count(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let db = test_support::connect().await;
        test_support::user(&db, "ana@example.com").await;
        let err = add_user(
            &db,
            UserModel {
                email: "ana@example.com".to_string(),
                password: "other".to_string(),
                full_name: "Another Ana".to_string(),
                image_url: None,
                is_staff: false,
                is_superuser: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)), "{err:?}");
    }

    #[tokio::test]
    async fn listing_excludes_the_given_user() {
        let db = test_support::connect().await;
        let ana = test_support::user(&db, "ana@example.com").await;
        let bob = test_support::user(&db, "bob@example.com").await;
        let cid = test_support::user(&db, "cid@example.com").await;

        let others = get_users_except(&db, bob.id).await.unwrap();
        let ids: Vec<i32> = others.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![cid.id, ana.id]);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let db = test_support::connect().await;
        assert!(matches!(
            get_user_by_id(&db, 42).await,
            Err(StoreError::NotFound)
        ));
    }
}
