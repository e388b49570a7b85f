// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::{NormalizedArticle, RawArticle};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// 文章被跳过的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingTitle,
    MissingContent,
    DuplicateUrl,
}

impl SkipReason {
    /// 是否属于无效文章（而非重复文章）
    pub fn is_invalid(&self) -> bool {
        !matches!(self, SkipReason::DuplicateUrl)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::MissingTitle => "missing title",
            SkipReason::MissingContent => "missing content",
            SkipReason::DuplicateUrl => "duplicate url",
        };
        f.write_str(reason)
    }
}

/// 去重阶段的结果
#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    pub articles: Vec<NormalizedArticle>,
    pub invalid_dropped: usize,
    pub duplicates_dropped: usize,
}

/// 文章去重器
///
/// 先剔除缺少标题或正文的文章，再按 URL 去重（保留首次出现），
/// 并为保留的文章计算内容指纹。去重状态只在一次运行内有效。
#[derive(Debug, Default)]
pub struct ArticleDeduplicator {
    seen_urls: HashSet<String>,
}

impl ArticleDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 判断单篇文章是否保留
    ///
    /// 无效文章不会占用 URL，后续同 URL 的有效文章仍可被接纳。
    pub fn admit(
        &mut self,
        raw: RawArticle,
        now: DateTime<Utc>,
    ) -> Result<NormalizedArticle, SkipReason> {
        if raw.title.trim().is_empty() {
            return Err(SkipReason::MissingTitle);
        }
        if raw.content.trim().is_empty() {
            return Err(SkipReason::MissingContent);
        }
        if !self.seen_urls.insert(raw.url.clone()) {
            return Err(SkipReason::DuplicateUrl);
        }

        let full_text = format!("{} {}", raw.title, raw.content).to_lowercase();
        let content_hash = content_fingerprint(&full_text);

        Ok(NormalizedArticle {
            title: raw.title,
            content: raw.content,
            url: raw.url,
            published_at: raw.published_at.unwrap_or(now),
            source: raw.source,
            full_text,
            content_hash,
        })
    }

    /// 处理整批文章
    pub fn process(&mut self, articles: Vec<RawArticle>, now: DateTime<Utc>) -> DedupOutcome {
        let mut outcome = DedupOutcome::default();

        for raw in articles {
            let url = raw.url.clone();
            match self.admit(raw, now) {
                Ok(article) => outcome.articles.push(article),
                Err(reason) => {
                    tracing::debug!(url = %url, reason = %reason, "Article skipped");
                    if reason.is_invalid() {
                        outcome.invalid_dropped += 1;
                    } else {
                        outcome.duplicates_dropped += 1;
                    }
                }
            }
        }

        outcome
    }
}

/// 内容指纹：去除首尾空白后的 SHA-256 十六进制摘要
pub fn content_fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    hex::encode(hasher.finalize())
}
