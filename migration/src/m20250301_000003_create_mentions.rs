// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_articles::Articles;
use crate::m20250301_000002_create_political_entities::PoliticalEntities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mentions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mentions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mentions::ArticleId).integer().not_null())
                    .col(ColumnDef::new(Mentions::EntityId).integer().not_null())
                    .col(
                        ColumnDef::new(Mentions::Count)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentions_article_id")
                            .from(Mentions::Table, Mentions::ArticleId)
                            .to(Articles::Table, Articles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentions_entity_id")
                            .from(Mentions::Table, Mentions::EntityId)
                            .to(PoliticalEntities::Table, PoliticalEntities::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per (article, entity) pair; counts are merged in place
        manager
            .create_index(
                Index::create()
                    .name("ix_mentions_article_entity")
                    .table(Mentions::Table)
                    .col(Mentions::ArticleId)
                    .col(Mentions::EntityId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mentions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Mentions {
    Table,
    Id,
    ArticleId,
    EntityId,
    Count,
}
