// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::mention::{MentionRecord, MentionStat};
use crate::domain::repositories::mention_repository::{MentionRepository, RepositoryError};
use crate::infrastructure::database::entities::{article, mention, political_entity};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;

/// 标题列的最大长度（字符）
const TITLE_MAX_CHARS: usize = 500;
/// 链接列的最大长度（字符）
const URL_MAX_CHARS: usize = 500;
/// 来源列的最大长度（字符）
const SOURCE_MAX_CHARS: usize = 255;
/// 实体名称列的最大长度（字符）
const ENTITY_MAX_CHARS: usize = 100;

#[derive(Debug, FromQueryResult)]
struct MentionStatRow {
    entity: String,
    source: String,
    total_mentions: i64,
}

/// 提及仓库实现
///
/// 基于SeaORM实现的提及数据访问层。
/// 一次 `save` 调用内的所有写入共享同一个事务。
pub struct MentionRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl MentionRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn save_in(
        txn: &DatabaseTransaction,
        records: &[MentionRecord],
    ) -> Result<usize, RepositoryError> {
        // ids resolved during this call, keyed by content hash / entity name
        let mut article_ids: HashMap<String, i32> = HashMap::new();
        let mut entity_ids: HashMap<String, i32> = HashMap::new();
        let mut saved = 0usize;

        for record in records {
            // identity columns: skip oversized values instead of cutting them
            if record.article_url.chars().count() > URL_MAX_CHARS {
                tracing::warn!(
                    url_len = record.article_url.chars().count(),
                    entity = %record.entity,
                    "Article url exceeds column length, record skipped"
                );
                continue;
            }
            if record.entity.chars().count() > ENTITY_MAX_CHARS {
                tracing::warn!(
                    entity = %record.entity,
                    "Entity name exceeds column length, record skipped"
                );
                continue;
            }

            let count = i32::try_from(record.count)
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| {
                    RepositoryError::InvalidRecord(format!(
                        "mention count {} for '{}' is out of range",
                        record.count, record.entity
                    ))
                })?;

            let article_id = match article_ids.get(&record.content_hash) {
                Some(id) => *id,
                None => {
                    let id = Self::get_or_create_article(txn, record).await?;
                    article_ids.insert(record.content_hash.clone(), id);
                    id
                }
            };

            let entity_id = match entity_ids.get(&record.entity) {
                Some(id) => *id,
                None => {
                    let id = Self::get_or_create_entity(txn, &record.entity).await?;
                    entity_ids.insert(record.entity.clone(), id);
                    id
                }
            };

            Self::add_mention(txn, article_id, entity_id, count).await?;
            saved += 1;
        }

        Ok(saved)
    }

    async fn get_or_create_article(
        txn: &DatabaseTransaction,
        record: &MentionRecord,
    ) -> Result<i32, RepositoryError> {
        if let Some(existing) = article::Entity::find()
            .filter(article::Column::ContentHash.eq(record.content_hash.as_str()))
            .one(txn)
            .await?
        {
            return Ok(existing.id);
        }

        // Same url with revised text: keep the stored row
        if let Some(existing) = article::Entity::find()
            .filter(article::Column::Url.eq(record.article_url.as_str()))
            .one(txn)
            .await?
        {
            tracing::debug!(
                url = %record.article_url,
                article_id = existing.id,
                "Article url already stored with a different fingerprint"
            );
            return Ok(existing.id);
        }

        let model = article::ActiveModel {
            title: Set(record.title.chars().take(TITLE_MAX_CHARS).collect()),
            url: Set(record.article_url.clone()),
            content: Set(Some(record.content.clone())),
            published_at: Set(record.date.fixed_offset()),
            source: Set(record.source.chars().take(SOURCE_MAX_CHARS).collect()),
            content_hash: Set(record.content_hash.clone()),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let result = article::Entity::insert(model).exec(txn).await?;
        tracing::debug!(
            article_id = result.last_insert_id,
            url = %record.article_url,
            "Article stored"
        );
        Ok(result.last_insert_id)
    }

    async fn get_or_create_entity(
        txn: &DatabaseTransaction,
        name: &str,
    ) -> Result<i32, RepositoryError> {
        if let Some(existing) = political_entity::Entity::find()
            .filter(political_entity::Column::Name.eq(name))
            .one(txn)
            .await?
        {
            return Ok(existing.id);
        }

        let model = political_entity::ActiveModel {
            name: Set(name.to_string()),
            entity_type: Set(None),
            ..Default::default()
        };

        let result = political_entity::Entity::insert(model).exec(txn).await?;
        tracing::debug!(entity = %name, entity_id = result.last_insert_id, "Entity stored");
        Ok(result.last_insert_id)
    }

    async fn add_mention(
        txn: &DatabaseTransaction,
        article_id: i32,
        entity_id: i32,
        count: i32,
    ) -> Result<(), RepositoryError> {
        let existing = mention::Entity::find()
            .filter(mention::Column::ArticleId.eq(article_id))
            .filter(mention::Column::EntityId.eq(entity_id))
            .one(txn)
            .await?;

        match existing {
            Some(row) => {
                mention::Entity::update_many()
                    .col_expr(
                        mention::Column::Count,
                        Expr::col(mention::Column::Count).add(count),
                    )
                    .filter(mention::Column::Id.eq(row.id))
                    .exec(txn)
                    .await?;
            }
            None => {
                let model = mention::ActiveModel {
                    article_id: Set(article_id),
                    entity_id: Set(entity_id),
                    count: Set(count),
                    ..Default::default()
                };
                mention::Entity::insert(model).exec(txn).await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl MentionRepository for MentionRepositoryImpl {
    async fn save(&self, records: &[MentionRecord]) -> Result<usize, RepositoryError> {
        if records.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await?;

        match Self::save_in(&txn, records).await {
            Ok(saved) => {
                txn.commit().await?;
                tracing::info!(saved, "Mention records committed");
                Ok(saved)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Failed to roll back mention transaction");
                }
                tracing::error!(error = %err, "Mention transaction rolled back");
                Err(err)
            }
        }
    }

    async fn mention_stats(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MentionStat>, RepositoryError> {
        let rows = mention::Entity::find()
            .select_only()
            .column_as(political_entity::Column::Name, "entity")
            .column_as(article::Column::Source, "source")
            .column_as(mention::Column::Count.sum(), "total_mentions")
            .join(JoinType::InnerJoin, mention::Relation::Article.def())
            .join(JoinType::InnerJoin, mention::Relation::PoliticalEntity.def())
            .filter(article::Column::PublishedAt.gte(since.fixed_offset()))
            .group_by(political_entity::Column::Name)
            .group_by(article::Column::Source)
            .order_by_desc(mention::Column::Count.sum())
            .order_by_asc(political_entity::Column::Name)
            .order_by_asc(article::Column::Source)
            .into_model::<MentionStatRow>()
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| MentionStat {
                entity: row.entity,
                source: row.source,
                total_mentions: row.total_mentions,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "mention_repo_impl_test.rs"]
mod tests;
