// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::FeedSettings;
use crate::domain::models::article::RawArticle;
use crate::domain::sources::article_source::{
    ArticleSource, FetchWindow, SourceBatch, SourceError,
};
use async_trait::async_trait;
use feed_rs::model::Entry;
use futures::stream::{self, StreamExt};
use scraper::Html;
use url::Url;

/// RSS 订阅数据源
///
/// 每个订阅地址独立拉取和解析，单个订阅失败只记录不影响其它订阅。
/// 订阅条目与实体无关，实体过滤在提取阶段完成。
pub struct RssFeedSource {
    client: reqwest::Client,
    settings: FeedSettings,
}

impl RssFeedSource {
    pub fn new(settings: FeedSettings) -> Result<Self, SourceError> {
        let client = super::build_client(settings.timeout_secs)?;
        Ok(Self { client, settings })
    }

    pub fn with_client(client: reqwest::Client, settings: FeedSettings) -> Self {
        Self { client, settings }
    }

    async fn fetch_feed(&self, feed_url: &str) -> Result<Vec<RawArticle>, SourceError> {
        let target = Url::parse(feed_url)
            .map_err(|e| SourceError::Config(format!("invalid feed url {}: {}", feed_url, e)))?;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: format!("feed {} returned {}", feed_url, status),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        parse_feed(&bytes[..], feed_url)
    }
}

/// 解析订阅文档（RSS、Atom 或 JSON Feed）
pub fn parse_feed(body: &[u8], feed_url: &str) -> Result<Vec<RawArticle>, SourceError> {
    let feed = feed_rs::parser::parse(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    let articles: Vec<RawArticle> = feed
        .entries
        .into_iter()
        .filter_map(|entry| to_raw_article(entry, feed_url))
        .collect();

    tracing::debug!(feed = %feed_url, articles = articles.len(), "Feed parsed");
    Ok(articles)
}

fn to_raw_article(entry: Entry, feed_url: &str) -> Option<RawArticle> {
    let url = entry.links.first()?.href.trim().to_string();
    if url.is_empty() {
        return None;
    }

    let title = entry
        .title
        .map(|t| collapse_whitespace(&t.content))
        .unwrap_or_default();

    let content = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .map(|html| html_to_text(&html))
        .unwrap_or_default();

    let published_at = entry.published.or(entry.updated);

    Some(RawArticle::new(title, content, url, feed_url).with_published_at(published_at))
}

/// 去除 HTML 标签并折叠空白
pub fn html_to_text(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let text: String = document.root_element().text().collect();
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl ArticleSource for RssFeedSource {
    fn name(&self) -> &'static str {
        "rss"
    }

    async fn fetch(
        &self,
        _entities: &[String],
        _window: FetchWindow,
    ) -> Result<SourceBatch, SourceError> {
        let results: Vec<(String, Result<Vec<RawArticle>, SourceError>)> =
            stream::iter(self.settings.urls.iter().cloned())
                .map(|feed_url| async move {
                    let result = self.fetch_feed(&feed_url).await;
                    if let Err(err) = &result {
                        tracing::warn!(feed = %feed_url, error = %err, "Feed fetch failed");
                    }
                    (feed_url, result)
                })
                .buffered(self.settings.concurrency.max(1))
                .collect()
                .await;

        SourceBatch::from_results(self.name(), results)
    }
}

#[cfg(test)]
#[path = "rss_feed_test.rs"]
mod tests;
