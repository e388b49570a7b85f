// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 提及记录
///
/// 一篇文章中某个实体的命中结果，是持久化仓库的输入单元。
/// 每个 (文章, 有命中的实体) 组合产生一条记录。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentionRecord {
    /// 文章发布时间
    pub date: DateTime<Utc>,
    /// 规范化（小写、去空白）后的实体名称
    pub entity: String,
    /// 非重叠子串出现次数，始终大于 0
    pub count: u32,
    pub source: String,
    /// 首次出现位置附近的上下文，命中部分以 `[entity]` 标记
    pub snippet: String,
    pub article_url: String,
    pub title: String,
    pub content: String,
    pub content_hash: String,
}

/// 提及统计
///
/// 按 (实体, 来源) 汇总的提及次数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MentionStat {
    pub entity: String,
    pub source: String,
    pub total_mentions: i64,
}
