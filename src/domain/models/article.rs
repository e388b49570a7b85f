// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 原始文章
///
/// 由各数据源客户端（新闻检索 API、RSS 订阅）产出的统一文章结构，
/// 尚未经过校验、去重和指纹计算。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawArticle {
    /// 文章标题
    pub title: String,
    /// 正文或摘要，可能为空
    pub content: String,
    /// 文章链接，运行内去重的依据
    pub url: String,
    /// 发布时间，无法解析时为 None，由下游回退为采集时间
    pub published_at: Option<DateTime<Utc>>,
    /// 来源标签（API 的来源名称或订阅地址）
    pub source: String,
}

impl RawArticle {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
            published_at: None,
            source: source.into(),
        }
    }

    pub fn with_published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        self.published_at = published_at;
        self
    }
}

/// 规范化后的文章
///
/// 通过校验并完成去重的文章，携带小写扫描文本和内容指纹。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NormalizedArticle {
    pub title: String,
    pub content: String,
    pub url: String,
    /// 已解析的发布时间（缺失时为本次运行的开始时间）
    pub published_at: DateTime<Utc>,
    pub source: String,
    /// 小写的 `title + " " + content`，提及统计的扫描目标
    pub full_text: String,
    /// `full_text` 的 SHA-256 十六进制指纹，跨运行的去重键
    pub content_hash: String,
}
