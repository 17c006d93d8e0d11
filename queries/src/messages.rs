use entities::message;
use entities::message_local_model::{MessageChanges, MessageModel};
use entities::prelude::Message;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};

use crate::{StoreError, StoreResult};

fn involving(user_id: i32) -> Condition {
    Condition::any()
        .add(message::Column::SenderId.eq(user_id))
        .add(message::Column::ReceiverId.eq(user_id))
}

fn between(first: i32, second: i32) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(message::Column::SenderId.eq(first))
                .add(message::Column::ReceiverId.eq(second)),
        )
        .add(
            Condition::all()
                .add(message::Column::SenderId.eq(second))
                .add(message::Column::ReceiverId.eq(first)),
        )
}

/// Every message the user sent or received, oldest first.
pub async fn get_messages_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> StoreResult<Vec<message::Model>> {
    Ok(Message::find()
        .filter(involving(user_id))
        .order_by_asc(message::Column::CreatedAt)
        .order_by_asc(message::Column::Id)
        .all(db)
        .await?)
}

/// Messages exchanged between two users in either direction, oldest first.
pub async fn get_conversation<C: ConnectionTrait>(
    db: &C,
    first: i32,
    second: i32,
) -> StoreResult<Vec<message::Model>> {
    Ok(Message::find()
        .filter(between(first, second))
        .order_by_asc(message::Column::CreatedAt)
        .order_by_asc(message::Column::Id)
        .all(db)
        .await?)
}

/// A message the user takes part in. Anything else is reported as missing.
pub async fn get_message_for_user<C: ConnectionTrait>(
    db: &C,
    message_id: i32,
    user_id: i32,
) -> StoreResult<message::Model> {
    Message::find_by_id(message_id)
        .filter(involving(user_id))
        .one(db)
        .await?
        .ok_or(StoreError::NotFound)
}

pub async fn add_message<C: ConnectionTrait>(
    db: &C,
    message: MessageModel,
) -> StoreResult<message::Model> {
    Ok(message::ActiveModel::from(message).insert(db).await?)
}

pub async fn update_message<C: ConnectionTrait>(
    db: &C,
    message: message::Model,
    changes: MessageChanges,
) -> StoreResult<message::Model> {
    let mut active = message.into_active_model();
    changes.apply(&mut active);
    Ok(active.update(db).await?)
}

pub async fn delete_message_by_id<C: ConnectionTrait>(db: &C, message_id: i32) -> StoreResult<()> {
    let ret = Message::delete_by_id(message_id).exec(db).await?;
    if ret.rows_affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    async fn send<C: ConnectionTrait>(db: &C, from: i32, to: i32, text: &str) -> message::Model {
        add_message(
            db,
            MessageModel {
                sender_id: from,
                receiver_id: to,
                content: text.to_string(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn conversation_is_symmetric_and_chronological() {
        let db = test_support::connect().await;
        let ana = test_support::user(&db, "ana@example.com").await;
        let bob = test_support::user(&db, "bob@example.com").await;
        let cid = test_support::user(&db, "cid@example.com").await;

        let hi = send(&db, ana.id, bob.id, "hi").await;
        send(&db, ana.id, cid.id, "not for bob").await;
        let hey = send(&db, bob.id, ana.id, "hey").await;
        let bye = send(&db, ana.id, bob.id, "bye").await;

        let forward = get_conversation(&db, ana.id, bob.id).await.unwrap();
        let backward = get_conversation(&db, bob.id, ana.id).await.unwrap();
        assert_eq!(forward, backward);
        let ids: Vec<i32> = forward.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![hi.id, hey.id, bye.id]);
    }

    #[tokio::test]
    async fn messages_are_scoped_to_participants() {
        let db = test_support::connect().await;
        let ana = test_support::user(&db, "ana@example.com").await;
        let bob = test_support::user(&db, "bob@example.com").await;
        let cid = test_support::user(&db, "cid@example.com").await;

        let private = send(&db, ana.id, bob.id, "secret").await;
        send(&db, cid.id, ana.id, "hello ana").await;

        assert_eq!(get_messages_for_user(&db, ana.id).await.unwrap().len(), 2);
        assert_eq!(get_messages_for_user(&db, bob.id).await.unwrap().len(), 1);
        assert!(get_message_for_user(&db, private.id, bob.id).await.is_ok());
        assert!(matches!(
            get_message_for_user(&db, private.id, cid.id).await,
            Err(StoreError::NotFound)
        ));
    }
}
