// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use mentionrs::application::use_cases::analyze_mentions::MentionAnalyzer;
use mentionrs::config::settings::{FeedSettings, NewsSettings};
use mentionrs::domain::services::mention_extractor::MentionExtractor;
use mentionrs::domain::sources::article_source::ArticleSource;
use mentionrs::infrastructure::repositories::mention_repo_impl::MentionRepositoryImpl;
use mentionrs::infrastructure::sources::build_client;
use mentionrs::infrastructure::sources::news_api::NewsApiSource;
use mentionrs::infrastructure::sources::rss_feed::RssFeedSource;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::json;
use std::sync::Arc;
use wiremock::MockServer;

pub const NEWS_PATH: &str = "/v2/everything";

pub async fn setup_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let db = Arc::new(db);
    Migrator::up(db.as_ref(), None).await.unwrap();
    db
}

pub fn news_settings(server: &MockServer) -> NewsSettings {
    NewsSettings {
        api_key: "integration-key".to_string(),
        base_url: format!("{}{}", server.uri(), NEWS_PATH),
        language: "ru".to_string(),
        page_size: 100,
        max_pages: 1,
        timeout_secs: 5,
        concurrency: 2,
    }
}

pub fn feed_settings(urls: Vec<String>) -> FeedSettings {
    FeedSettings {
        urls,
        timeout_secs: 5,
        concurrency: 2,
    }
}

/// 新闻检索 API 的成功响应
pub fn news_body(articles: &[(&str, &str, &str)]) -> serde_json::Value {
    let articles: Vec<serde_json::Value> = articles
        .iter()
        .map(|(title, url, description)| {
            json!({
                "title": title,
                "url": url,
                "publishedAt": chrono::Utc::now().to_rfc3339(),
                "source": { "id": null, "name": "Example News" },
                "description": description,
                "content": null
            })
        })
        .collect();

    json!({
        "status": "ok",
        "totalResults": articles.len(),
        "articles": articles
    })
}

/// 包含给定条目 (标题, 链接, 摘要) 的 RSS 文档
pub fn rss_body(items: &[(&str, &str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, link, description)| {
            format!(
                "<item><title>{}</title><link>{}</link><description>{}</description></item>",
                title, link, description
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Test feed</title><link>https://feed.example.com</link><description>Test</description>{}</channel></rss>"#,
        items
    )
}

pub fn build_analyzer(
    db: Arc<DatabaseConnection>,
    news: NewsSettings,
    feeds: FeedSettings,
    entities: &[&str],
) -> MentionAnalyzer<MentionRepositoryImpl> {
    // Both sources share one connection pool
    let client = build_client(news.timeout_secs).unwrap();
    let sources: Vec<Arc<dyn ArticleSource>> = vec![
        Arc::new(NewsApiSource::with_client(client.clone(), news)),
        Arc::new(RssFeedSource::with_client(client, feeds)),
    ];
    let repository = Arc::new(MentionRepositoryImpl::new(db));
    MentionAnalyzer::new(repository, sources, MentionExtractor::new(entities))
}
