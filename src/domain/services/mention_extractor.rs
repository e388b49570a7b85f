// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::NormalizedArticle;
use crate::domain::models::mention::MentionRecord;

/// 片段窗口：命中位置两侧各保留的字符数
pub const SNIPPET_WINDOW: usize = 50;

/// 提及提取器
///
/// 对规范化文章的扫描文本做字面子串匹配（不做分词或词边界判断），
/// 为每个有命中的实体生成一条 [`MentionRecord`]。
#[derive(Debug, Clone)]
pub struct MentionExtractor {
    entities: Vec<String>,
}

impl MentionExtractor {
    /// 创建提取器
    ///
    /// 实体名称会被去除首尾空白并转为小写，空名称被丢弃，
    /// 重复名称只保留第一次出现。
    pub fn new<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for entity in entities {
            let name = entity.as_ref().trim().to_lowercase();
            if name.is_empty() || normalized.contains(&name) {
                continue;
            }
            normalized.push(name);
        }

        Self {
            entities: normalized,
        }
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// 提取单篇文章中的提及
    pub fn extract(&self, article: &NormalizedArticle) -> Vec<MentionRecord> {
        let text = article.full_text.as_str();

        self.entities
            .iter()
            .filter_map(|entity| {
                let count = count_occurrences(text, entity);
                if count == 0 {
                    return None;
                }
                let position = text.find(entity.as_str())?;

                Some(MentionRecord {
                    date: article.published_at,
                    entity: entity.clone(),
                    count,
                    source: article.source.clone(),
                    snippet: snippet(text, position, entity, SNIPPET_WINDOW),
                    article_url: article.url.clone(),
                    title: article.title.clone(),
                    content: article.content.clone(),
                    content_hash: article.content_hash.clone(),
                })
            })
            .collect()
    }
}

/// 统计非重叠子串出现次数
pub fn count_occurrences(text: &str, entity: &str) -> u32 {
    if entity.is_empty() {
        return 0;
    }
    u32::try_from(text.matches(entity).count()).unwrap_or(u32::MAX)
}

/// 截取命中位置附近的上下文
///
/// `byte_pos` 是实体在 `text` 中首次出现的字节偏移。
/// 窗口按字符计算，两侧各 `window` 个字符并截断到文本边界，
/// 窗口内实体的每次出现都被替换为 `[entity]`。
pub fn snippet(text: &str, byte_pos: usize, entity: &str, window: usize) -> String {
    let start = text
        .get(..byte_pos)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(0);
    let from = start.saturating_sub(window);
    let to = start + entity.chars().count() + window;

    let excerpt: String = text.chars().skip(from).take(to - from).collect();
    excerpt
        .replace(entity, &format!("[{}]", entity))
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "mention_extractor_test.rs"]
mod tests;
