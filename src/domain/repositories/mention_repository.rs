// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::mention::{MentionRecord, MentionStat};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// 提及仓库特质
///
/// 定义提及记录的持久化接口。实现必须满足：
/// - 一次调用的全部写入在同一个事务中完成，失败时整体回滚
/// - 文章按内容指纹去重，实体按名称去重
/// - 提及次数为累加语义，重复保存同一条记录会叠加计数
#[async_trait]
pub trait MentionRepository: Send + Sync {
    /// 保存一批提及记录
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 成功写入的记录数
    /// * `Err(RepositoryError)` - 任意写入失败，事务已回滚
    async fn save(&self, records: &[MentionRecord]) -> Result<usize, RepositoryError>;

    /// 按 (实体, 来源) 汇总 `since` 之后发布的文章中的提及次数
    async fn mention_stats(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MentionStat>, RepositoryError>;
}
