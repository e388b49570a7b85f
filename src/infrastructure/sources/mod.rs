// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 文章数据源实现模块
///
/// - 新闻检索 API（news_api）：按实体分页检索最近的文章
/// - RSS 订阅（rss_feed）：拉取并解析 RSS / Atom / JSON Feed
pub mod news_api;
pub mod rss_feed;

use crate::domain::sources::article_source::SourceError;
use std::time::Duration;

/// 出站请求使用的 User-Agent
pub const USER_AGENT: &str = concat!("mentionrs/", env!("CARGO_PKG_VERSION"));

/// 构建数据源共用的 HTTP 客户端
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SourceError::Config(e.to_string()))
}
