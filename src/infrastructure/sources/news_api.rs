// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::NewsSettings;
use crate::domain::models::article::RawArticle;
use crate::domain::sources::article_source::{
    ArticleSource, FetchWindow, SourceBatch, SourceError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Deserialize;

/// 缺少来源名称时使用的标签
const DEFAULT_SOURCE_LABEL: &str = "newsapi";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    total_results: Option<u64>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    source: Option<NewsApiSourceRef>,
    description: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceRef {
    name: Option<String>,
}

/// 新闻检索 API 数据源
///
/// 每个实体发起一次检索（`q` = 实体名称），按页请求直到：
/// 返回条数不足一页、达到 `totalResults` 或达到 `max_pages`。
pub struct NewsApiSource {
    client: reqwest::Client,
    settings: NewsSettings,
}

impl NewsApiSource {
    pub fn new(settings: NewsSettings) -> Result<Self, SourceError> {
        let client = super::build_client(settings.timeout_secs)?;
        Ok(Self { client, settings })
    }

    pub fn with_client(client: reqwest::Client, settings: NewsSettings) -> Self {
        Self { client, settings }
    }

    async fn fetch_page(
        &self,
        entity: &str,
        from: &str,
        page: u32,
    ) -> Result<NewsApiResponse, SourceError> {
        let page_size = self.settings.page_size.to_string();
        let page_number = page.to_string();
        let query_params = [
            ("q", entity),
            ("from", from),
            ("sortBy", "publishedAt"),
            ("language", self.settings.language.as_str()),
            ("pageSize", page_size.as_str()),
            ("page", page_number.as_str()),
            ("apiKey", self.settings.api_key.as_str()),
        ];

        let response = self
            .client
            .get(&self.settings.base_url)
            .query(&query_params)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        if body.status == "error" {
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: format!(
                    "{}: {}",
                    body.code.as_deref().unwrap_or("unknown"),
                    body.message.as_deref().unwrap_or_default()
                ),
            });
        }

        Ok(body)
    }

    async fn fetch_entity(&self, entity: &str, from: &str) -> Result<Vec<RawArticle>, SourceError> {
        let page_size = self.settings.page_size.max(1);
        let mut articles = Vec::new();

        for page in 1..=self.settings.max_pages.max(1) {
            let response = match self.fetch_page(entity, from, page).await {
                Ok(response) => response,
                Err(err) if page == 1 => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        entity = %entity,
                        page,
                        error = %err,
                        "News page failed, keeping earlier pages"
                    );
                    break;
                }
            };

            let received = response.articles.len();
            articles.extend(response.articles.into_iter().filter_map(to_raw_article));

            let fetched_so_far = u64::from(page) * u64::from(page_size);
            let exhausted = response
                .total_results
                .map(|total| fetched_so_far >= total)
                .unwrap_or(false);
            if received < page_size as usize || exhausted {
                break;
            }
        }

        tracing::debug!(entity = %entity, articles = articles.len(), "News query finished");
        Ok(articles)
    }
}

fn to_raw_article(article: NewsApiArticle) -> Option<RawArticle> {
    let title = article.title.filter(|t| !t.trim().is_empty())?;
    let url = article.url.filter(|u| !u.trim().is_empty())?;

    let content = format!(
        "{} {}",
        article.description.unwrap_or_default(),
        article.content.unwrap_or_default()
    )
    .trim()
    .to_string();

    let published_at = article
        .published_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|date| date.with_timezone(&Utc));

    let source = article
        .source
        .and_then(|s| s.name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SOURCE_LABEL.to_string());

    Some(RawArticle::new(title, content, url, source).with_published_at(published_at))
}

#[async_trait]
impl ArticleSource for NewsApiSource {
    fn name(&self) -> &'static str {
        "news_api"
    }

    async fn fetch(
        &self,
        entities: &[String],
        window: FetchWindow,
    ) -> Result<SourceBatch, SourceError> {
        if entities.is_empty() {
            return Ok(SourceBatch::default());
        }
        if self.settings.api_key.trim().is_empty() {
            return Err(SourceError::Config("news api key is not configured".to_string()));
        }

        let from = window.from_date(Utc::now()).format("%Y-%m-%d").to_string();

        let results: Vec<(String, Result<Vec<RawArticle>, SourceError>)> =
            stream::iter(entities.iter().cloned())
                .map(|entity| {
                    let from = from.as_str();
                    async move {
                        let result = self.fetch_entity(&entity, from).await;
                        if let Err(err) = &result {
                            tracing::warn!(entity = %entity, error = %err, "News query failed");
                        }
                        (entity, result)
                    }
                })
                .buffered(self.settings.concurrency.max(1))
                .collect()
                .await;

        SourceBatch::from_results(self.name(), results)
    }
}

#[cfg(test)]
#[path = "news_api_test.rs"]
mod tests;
