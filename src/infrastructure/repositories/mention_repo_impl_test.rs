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

use super::*;
use chrono::Duration;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, PaginatorTrait};

async fn setup_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let db = Arc::new(db);
    Migrator::up(db.as_ref(), None).await.unwrap();
    db
}

fn record(entity: &str, count: u32, url: &str, hash: &str) -> MentionRecord {
    MentionRecord {
        date: Utc::now(),
        entity: entity.to_string(),
        count,
        source: "Example".to_string(),
        snippet: format!("[{}] said", entity),
        article_url: url.to_string(),
        title: "Title".to_string(),
        content: "Body".to_string(),
        content_hash: hash.to_string(),
    }
}

async fn mention_counts(db: &DatabaseConnection) -> Vec<i32> {
    mention::Entity::find()
        .order_by_asc(mention::Column::Id)
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.count)
        .collect()
}

#[tokio::test]
async fn test_save_creates_article_entity_and_mention() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());

    let saved = repo
        .save(&[record("trump", 3, "https://a/1", "h1")])
        .await
        .unwrap();
    assert_eq!(saved, 1);

    let articles = article::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].url, "https://a/1");
    assert_eq!(articles[0].content.as_deref(), Some("Body"));
    assert_eq!(articles[0].content_hash, "h1");

    let entities = political_entity::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].name, "trump");
    assert_eq!(entities[0].entity_type, None);

    assert_eq!(mention_counts(db.as_ref()).await, vec![3]);
}

#[tokio::test]
async fn test_save_twice_accumulates_counts() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());
    let records = vec![record("trump", 2, "https://a/1", "h1")];

    repo.save(&records).await.unwrap();
    repo.save(&records).await.unwrap();

    assert_eq!(mention_counts(db.as_ref()).await, vec![4]);
    assert_eq!(article::Entity::find().count(db.as_ref()).await.unwrap(), 1);
    assert_eq!(
        political_entity::Entity::find().count(db.as_ref()).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_same_content_under_different_urls_is_one_article() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());

    repo.save(&[
        record("trump", 1, "https://a/1", "same"),
        record("trump", 2, "https://b/1", "same"),
    ])
    .await
    .unwrap();

    assert_eq!(article::Entity::find().count(db.as_ref()).await.unwrap(), 1);
    assert_eq!(mention_counts(db.as_ref()).await, vec![3]);
}

#[tokio::test]
async fn test_known_url_with_new_fingerprint_reuses_article() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());

    repo.save(&[record("trump", 1, "https://a/1", "v1")])
        .await
        .unwrap();
    repo.save(&[record("trump", 1, "https://a/1", "v2")])
        .await
        .unwrap();

    let articles = article::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].content_hash, "v1");
    assert_eq!(mention_counts(db.as_ref()).await, vec![2]);
}

#[tokio::test]
async fn test_entities_are_shared_across_articles() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());

    repo.save(&[
        record("trump", 1, "https://a/1", "h1"),
        record("putin", 4, "https://a/1", "h1"),
        record("trump", 2, "https://a/2", "h2"),
    ])
    .await
    .unwrap();

    assert_eq!(article::Entity::find().count(db.as_ref()).await.unwrap(), 2);
    assert_eq!(
        political_entity::Entity::find().count(db.as_ref()).await.unwrap(),
        2
    );
    assert_eq!(mention_counts(db.as_ref()).await, vec![1, 4, 2]);
}

#[tokio::test]
async fn test_save_empty_is_noop() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());

    assert_eq!(repo.save(&[]).await.unwrap(), 0);
    assert_eq!(article::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failure_mid_transaction_rolls_back_everything() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());

    db.execute_unprepared("DROP TABLE mentions").await.unwrap();

    let result = repo
        .save(&[record("trump", 1, "https://a/1", "h1")])
        .await;
    assert!(matches!(result, Err(RepositoryError::Database(_))));

    assert_eq!(article::Entity::find().count(db.as_ref()).await.unwrap(), 0);
    assert_eq!(
        political_entity::Entity::find().count(db.as_ref()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_zero_count_is_rejected_and_rolled_back() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());

    let result = repo
        .save(&[
            record("trump", 1, "https://a/1", "h1"),
            record("putin", 0, "https://a/2", "h2"),
        ])
        .await;
    assert!(matches!(result, Err(RepositoryError::InvalidRecord(_))));

    assert_eq!(article::Entity::find().count(db.as_ref()).await.unwrap(), 0);
    assert!(mention_counts(db.as_ref()).await.is_empty());
}

#[tokio::test]
async fn test_oversized_values_are_skipped_or_cut() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());

    let long_url = format!("https://a/{}", "x".repeat(URL_MAX_CHARS));
    let long_entity = "п".repeat(ENTITY_MAX_CHARS + 1);
    let mut long_source = record("trump", 2, "https://a/1", "h1");
    long_source.source = "s".repeat(SOURCE_MAX_CHARS + 20);

    let saved = repo
        .save(&[
            record("putin", 1, &long_url, "h2"),
            record(&long_entity, 1, "https://a/3", "h3"),
            long_source,
        ])
        .await
        .unwrap();

    assert_eq!(saved, 1);
    let articles = article::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].url, "https://a/1");
    assert_eq!(articles[0].source.chars().count(), SOURCE_MAX_CHARS);

    let names: Vec<String> = political_entity::Entity::find()
        .all(db.as_ref())
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["trump".to_string()]);
    assert_eq!(mention_counts(db.as_ref()).await, vec![2]);
}

#[tokio::test]
async fn test_mention_stats_groups_by_entity_and_source() {
    let db = setup_db().await;
    let repo = MentionRepositoryImpl::new(db.clone());

    let mut other_source = record("trump", 5, "https://b/1", "h3");
    other_source.source = "Other".to_string();

    let mut stale = record("trump", 100, "https://c/1", "h4");
    stale.date = Utc::now() - Duration::days(30);

    repo.save(&[
        record("trump", 2, "https://a/1", "h1"),
        record("trump", 1, "https://a/2", "h2"),
        record("putin", 1, "https://a/2", "h2"),
        other_source,
        stale,
    ])
    .await
    .unwrap();

    let stats = repo
        .mention_stats(Utc::now() - Duration::days(7))
        .await
        .unwrap();

    assert_eq!(
        stats,
        vec![
            MentionStat {
                entity: "trump".to_string(),
                source: "Other".to_string(),
                total_mentions: 5,
            },
            MentionStat {
                entity: "trump".to_string(),
                source: "Example".to_string(),
                total_mentions: 3,
            },
            MentionStat {
                entity: "putin".to_string(),
                source: "Example".to_string(),
                total_mentions: 1,
            },
        ]
    );
}
