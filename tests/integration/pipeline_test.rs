// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    build_analyzer, feed_settings, news_body, news_settings, rss_body, setup_db, NEWS_PATH,
};
use mentionrs::application::use_cases::analyze_mentions::AnalyzerError;
use mentionrs::infrastructure::database::entities::{article, mention, political_entity};
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_news(server: &MockServer, entity: &str, articles: &[(&str, &str, &str)]) {
    Mock::given(method("GET"))
        .and(path(NEWS_PATH))
        .and(query_param("q", entity))
        .respond_with(ResponseTemplate::new(200).set_body_json(news_body(articles)))
        .mount(server)
        .await;
}

async fn mount_feed(server: &MockServer, feed_path: &str, items: &[(&str, &str, &str)]) {
    Mock::given(method("GET"))
        .and(path(feed_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_body(items)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pipeline_persists_mentions_when_one_feed_fails() {
    let server = MockServer::start().await;
    mount_news(
        &server,
        "trump",
        &[("Trump visits Paris", "https://news.example.com/1", "Trump met officials.")],
    )
    .await;
    mount_news(&server, "путин", &[]).await;
    mount_feed(
        &server,
        "/feeds/good",
        &[("Путин и Trump", "https://feed.example.com/1", "Путин ответил Trump")],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/feeds/bad"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let bad_feed = format!("{}/feeds/bad", server.uri());
    let analyzer = build_analyzer(
        db.clone(),
        news_settings(&server),
        feed_settings(vec![bad_feed.clone(), format!("{}/feeds/good", server.uri())]),
        &["Trump", "Путин"],
    );

    let report = analyzer.analyze(1).await.unwrap();

    assert_eq!(report.articles_fetched, 2);
    assert_eq!(report.articles_analyzed, 2);
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.saved, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].target, bad_feed);

    assert_eq!(article::Entity::find().count(db.as_ref()).await.unwrap(), 2);

    let names: Vec<String> = political_entity::Entity::find()
        .order_by_asc(political_entity::Column::Id)
        .all(db.as_ref())
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["trump".to_string(), "путин".to_string()]);

    let counts: Vec<i32> = mention::Entity::find()
        .order_by_asc(mention::Column::Id)
        .all(db.as_ref())
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.count)
        .collect();
    assert_eq!(counts, vec![2, 2, 2]);
}

#[tokio::test]
async fn test_repeated_runs_accumulate_counts() {
    let server = MockServer::start().await;
    mount_news(
        &server,
        "trump",
        &[("Trump visits Paris", "https://news.example.com/1", "Trump left.")],
    )
    .await;

    let db = setup_db().await;
    let analyzer = build_analyzer(
        db.clone(),
        news_settings(&server),
        feed_settings(Vec::new()),
        &["trump"],
    );

    analyzer.analyze(1).await.unwrap();
    analyzer.analyze(1).await.unwrap();

    let mentions = mention::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].count, 4);
    assert_eq!(article::Entity::find().count(db.as_ref()).await.unwrap(), 1);

    let stats = analyzer.mention_stats(7).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].entity, "trump");
    assert_eq!(stats[0].source, "Example News");
    assert_eq!(stats[0].total_mentions, 4);
}

#[tokio::test]
async fn test_same_text_under_different_urls_is_one_article() {
    let server = MockServer::start().await;
    mount_news(
        &server,
        "trump",
        &[("Trump visits Paris", "https://news.example.com/1", "Trump met officials.")],
    )
    .await;
    mount_feed(
        &server,
        "/feeds/mirror",
        &[("Trump visits Paris", "https://mirror.example.com/1", "Trump met officials.")],
    )
    .await;

    let db = setup_db().await;
    let analyzer = build_analyzer(
        db.clone(),
        news_settings(&server),
        feed_settings(vec![format!("{}/feeds/mirror", server.uri())]),
        &["trump"],
    );

    let report = analyzer.analyze(1).await.unwrap();
    assert_eq!(report.articles_analyzed, 2);
    assert_eq!(report.records.len(), 2);

    let articles = article::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].url, "https://news.example.com/1");

    let mentions = mention::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].count, 4);
}

#[tokio::test]
async fn test_all_sources_failing_persists_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let analyzer = build_analyzer(
        db.clone(),
        news_settings(&server),
        feed_settings(vec![format!("{}/feeds/down", server.uri())]),
        &["trump"],
    );

    let result = analyzer.analyze(1).await;
    match result {
        Err(AnalyzerError::AllSourcesFailed(failures)) => assert_eq!(failures.len(), 2),
        other => panic!("expected all sources to fail, got {:?}", other),
    }

    assert_eq!(article::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}
