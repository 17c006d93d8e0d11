use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_tables::{Albums, Messages, Songs};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx-songs-album_id")
                    .table(Songs::Table)
                    .col(Songs::AlbumId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-songs-artist")
                    .table(Songs::Table)
                    .col(Songs::Artist)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-albums-artist")
                    .table(Albums::Table)
                    .col(Albums::Artist)
                    .to_owned(),
            )
            .await?;
        // Conversation lookups filter on both parties
        manager
            .create_index(
                Index::create()
                    .name("idx-messages-sender_id-receiver_id")
                    .table(Messages::Table)
                    .col(Messages::SenderId)
                    .col(Messages::ReceiverId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-messages-created_at")
                    .table(Messages::Table)
                    .col(Messages::CreatedAt)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx-messages-created_at", Messages::Table.to_string()),
            ("idx-messages-sender_id-receiver_id", Messages::Table.to_string()),
            ("idx-albums-artist", Albums::Table.to_string()),
            ("idx-songs-artist", Songs::Table.to_string()),
            ("idx-songs-album_id", Songs::Table.to_string()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
