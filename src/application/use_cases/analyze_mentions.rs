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

use crate::domain::{
    models::mention::{MentionRecord, MentionStat},
    repositories::mention_repository::{MentionRepository, RepositoryError},
    services::{article_deduplicator::ArticleDeduplicator, mention_extractor::MentionExtractor},
    sources::article_source::{ArticleSource, FetchWindow, SourceError, SourceFailure},
};
use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("All article sources failed ({} failures)", .0.len())]
    AllSourcesFailed(Vec<SourceFailure>),
    #[error("Persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
}

/// 一次分析运行的汇总
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub days: u32,
    /// 各数据源返回的文章总数
    pub articles_fetched: usize,
    /// 通过校验和去重后参与提取的文章数
    pub articles_analyzed: usize,
    pub invalid_dropped: usize,
    pub duplicates_dropped: usize,
    /// 提取出的提及记录，包含片段和文章信息
    pub records: Vec<MentionRecord>,
    /// 持久化仓库确认写入的记录数
    pub saved: usize,
    /// 被隔离的数据源失败
    pub failures: Vec<SourceFailure>,
}

impl AnalysisReport {
    fn empty(run_id: Uuid, days: u32) -> Self {
        Self {
            run_id,
            days,
            articles_fetched: 0,
            articles_analyzed: 0,
            invalid_dropped: 0,
            duplicates_dropped: 0,
            records: Vec::new(),
            saved: 0,
            failures: Vec::new(),
        }
    }
}

/// 提及分析用例
///
/// 串联一次完整的运行：拉取所有数据源、去重、提取提及、持久化。
/// 数据源和单篇文章的失败被隔离记录；只有全部数据源失败或持久化失败才会中止运行。
pub struct MentionAnalyzer<R> {
    repository: Arc<R>,
    sources: Vec<Arc<dyn ArticleSource>>,
    extractor: MentionExtractor,
}

impl<R> MentionAnalyzer<R>
where
    R: MentionRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        sources: Vec<Arc<dyn ArticleSource>>,
        extractor: MentionExtractor,
    ) -> Self {
        Self {
            repository,
            sources,
            extractor,
        }
    }

    /// 分析最近 `days` 天的文章
    pub async fn analyze(&self, days: u32) -> Result<AnalysisReport, AnalyzerError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("analyze", %run_id, days);
        self.run(run_id, days).instrument(span).await
    }

    async fn run(&self, run_id: Uuid, days: u32) -> Result<AnalysisReport, AnalyzerError> {
        let mut report = AnalysisReport::empty(run_id, days);

        if self.extractor.is_empty() {
            tracing::info!("No entities configured, nothing to analyze");
            return Ok(report);
        }

        let started_at = Utc::now();
        let window = FetchWindow::new(days);
        let entities = self.extractor.entities();
        tracing::info!(
            entities = entities.len(),
            sources = self.sources.len(),
            "Mention analysis started"
        );

        // 1. Fetch every source concurrently
        let results = join_all(self.sources.iter().map(|source| async move {
            (source.name(), source.fetch(entities, window).await)
        }))
        .await;

        let mut raw_articles = Vec::new();
        let mut succeeded = 0usize;
        for (name, result) in results {
            match result {
                Ok(mut batch) => {
                    succeeded += 1;
                    tracing::info!(
                        source = name,
                        articles = batch.articles.len(),
                        failures = batch.failures.len(),
                        "Source fetched"
                    );
                    raw_articles.append(&mut batch.articles);
                    report.failures.append(&mut batch.failures);
                }
                Err(SourceError::Exhausted { failures, .. }) => {
                    tracing::warn!(source = name, failures = failures.len(), "Source failed for every target");
                    report.failures.extend(failures);
                }
                Err(err) => {
                    tracing::warn!(source = name, error = %err, "Source failed");
                    report.failures.push(SourceFailure {
                        source: name.to_string(),
                        target: "*".to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if !self.sources.is_empty() && succeeded == 0 {
            tracing::error!(failures = report.failures.len(), "All article sources failed");
            return Err(AnalyzerError::AllSourcesFailed(report.failures));
        }

        // 2. Drop invalid and duplicate articles
        report.articles_fetched = raw_articles.len();
        let outcome = ArticleDeduplicator::new().process(raw_articles, started_at);
        report.articles_analyzed = outcome.articles.len();
        report.invalid_dropped = outcome.invalid_dropped;
        report.duplicates_dropped = outcome.duplicates_dropped;

        // 3. Extract mentions
        let records: Vec<MentionRecord> = outcome
            .articles
            .iter()
            .flat_map(|article| self.extractor.extract(article))
            .collect();

        if records.is_empty() {
            tracing::info!(
                articles = report.articles_analyzed,
                "No mentions found, nothing to persist"
            );
            return Ok(report);
        }

        for record in &records {
            tracing::debug!(
                entity = %record.entity,
                count = record.count,
                url = %record.article_url,
                snippet = %record.snippet,
                "Mention found"
            );
        }

        // 4. Persist in one transaction
        report.saved = self.repository.save(&records).await.map_err(|err| {
            tracing::error!(error = %err, records = records.len(), "Failed to persist mentions");
            AnalyzerError::Persistence(err)
        })?;
        report.records = records;

        tracing::info!(
            fetched = report.articles_fetched,
            analyzed = report.articles_analyzed,
            saved = report.saved,
            failures = report.failures.len(),
            "Mention analysis finished"
        );
        Ok(report)
    }

    /// 最近 `days` 天内按 (实体, 来源) 汇总的提及次数
    pub async fn mention_stats(&self, days: u32) -> Result<Vec<MentionStat>, AnalyzerError> {
        let since = FetchWindow::new(days).since(Utc::now());
        Ok(self.repository.mention_stats(since).await?)
    }

    /// 按构建的逆序释放依赖：先仓库，再数据源
    pub fn shutdown(self) {
        let Self {
            repository,
            mut sources,
            extractor,
        } = self;

        drop(repository);
        tracing::debug!("Mention repository released");

        while let Some(source) = sources.pop() {
            tracing::debug!(source = source.name(), "Article source released");
            drop(source);
        }

        drop(extractor);
        tracing::info!("Mention analyzer shut down");
    }
}

#[cfg(test)]
#[path = "analyze_mentions_test.rs"]
mod tests;
