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

use mentionrs::application::use_cases::analyze_mentions::MentionAnalyzer;
use mentionrs::config::settings::Settings;
use mentionrs::domain::services::mention_extractor::MentionExtractor;
use mentionrs::domain::sources::article_source::ArticleSource;
use mentionrs::infrastructure::database::connection;
use mentionrs::infrastructure::repositories::mention_repo_impl::MentionRepositoryImpl;
use mentionrs::infrastructure::sources::news_api::NewsApiSource;
use mentionrs::infrastructure::sources::rss_feed::RssFeedSource;
use mentionrs::utils::telemetry;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 主函数
///
/// 执行一次提及分析后退出，由外部调度器周期性调用。
/// 运行失败时返回错误，进程以非零状态退出。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.log);
    info!("Starting mentionrs...");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize sources and repository
    let sources: Vec<Arc<dyn ArticleSource>> = vec![
        Arc::new(NewsApiSource::new(settings.news.clone())?),
        Arc::new(RssFeedSource::new(settings.feeds.clone())?),
    ];
    let repository = Arc::new(MentionRepositoryImpl::new(db.clone()));
    let extractor = MentionExtractor::new(&settings.analyzer.entities);

    // 5. Run the analysis once
    let analyzer = MentionAnalyzer::new(repository, sources, extractor);
    let outcome = analyzer.analyze(settings.analyzer.lookback_days).await;

    match &outcome {
        Ok(report) => {
            info!(
                run_id = %report.run_id,
                fetched = report.articles_fetched,
                analyzed = report.articles_analyzed,
                invalid = report.invalid_dropped,
                duplicates = report.duplicates_dropped,
                records = report.records.len(),
                saved = report.saved,
                failures = report.failures.len(),
                "Analysis completed"
            );
            if let Ok(summary) = serde_json::to_string(report) {
                debug!(%summary, "Analysis report");
            }
            for failure in &report.failures {
                warn!(
                    source = %failure.source,
                    target = %failure.target,
                    reason = %failure.reason,
                    "Source failure during run"
                );
            }

            match analyzer.mention_stats(settings.analyzer.stats_days).await {
                Ok(stats) => {
                    for stat in stats {
                        info!(
                            entity = %stat.entity,
                            source = %stat.source,
                            total = stat.total_mentions,
                            days = settings.analyzer.stats_days,
                            "Mention statistics"
                        );
                    }
                }
                Err(e) => warn!(error = %e, "Failed to load mention statistics"),
            }
        }
        Err(e) => error!(error = %e, "Analysis failed"),
    }

    // 6. Shutdown in reverse order
    analyzer.shutdown();
    connection::close_pool(db).await?;
    info!("mentionrs finished");

    outcome?;
    Ok(())
}
