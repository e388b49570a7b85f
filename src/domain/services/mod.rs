// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含提及分析的纯业务逻辑，不涉及网络和存储：
/// - 文章去重（article_deduplicator）：剔除无效文章、按 URL 去重并计算内容指纹
/// - 提及提取（mention_extractor）：统计实体出现次数并截取上下文片段
pub mod article_deduplicator;
pub mod mention_extractor;
