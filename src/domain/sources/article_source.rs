// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::RawArticle;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upstream returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("All {} fetch units of {origin} failed", .failures.len())]
    Exhausted {
        origin: String,
        failures: Vec<SourceFailure>,
    },
}

/// 采集时间窗口
///
/// 只请求最近 `days` 天内发布的文章
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub days: u32,
}

impl FetchWindow {
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    /// 窗口起始日期（`now - days`）
    pub fn from_date(&self, now: DateTime<Utc>) -> NaiveDate {
        (now - Duration::days(i64::from(self.days))).date_naive()
    }

    /// 窗口起始时间点
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.days))
    }
}

/// 单个采集单元的失败记录
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceFailure {
    /// 数据源名称
    pub source: String,
    /// 采集单元（实体查询或订阅地址）
    pub target: String,
    pub reason: String,
}

/// 一次采集的结果：成功单元的文章与失败单元的记录
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub articles: Vec<RawArticle>,
    pub failures: Vec<SourceFailure>,
}

impl SourceBatch {
    /// 合并各采集单元的结果
    ///
    /// 单元失败只被记录，不会中断其它单元。
    /// 只有在至少尝试了一个单元且全部失败时，才返回 `SourceError::Exhausted`。
    pub fn from_results(
        origin: &str,
        results: Vec<(String, Result<Vec<RawArticle>, SourceError>)>,
    ) -> Result<Self, SourceError> {
        let attempted = results.len();
        let mut batch = SourceBatch::default();

        for (target, result) in results {
            match result {
                Ok(mut articles) => batch.articles.append(&mut articles),
                Err(err) => batch.failures.push(SourceFailure {
                    source: origin.to_string(),
                    target,
                    reason: err.to_string(),
                }),
            }
        }

        if attempted > 0 && batch.failures.len() == attempted {
            return Err(SourceError::Exhausted {
                origin: origin.to_string(),
                failures: batch.failures,
            });
        }

        Ok(batch)
    }
}

/// 文章数据源特质
///
/// 每个实现负责一类上游（新闻检索 API、RSS 订阅等），
/// 把上游响应转换为统一的 [`RawArticle`]。
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Get the name of the source
    fn name(&self) -> &'static str;

    /// Fetch articles published inside the window
    async fn fetch(
        &self,
        entities: &[String],
        window: FetchWindow,
    ) -> Result<SourceBatch, SourceError>;
}
