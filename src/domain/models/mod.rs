// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了提及分析流水线中流转的内存记录：
/// - 文章（article）：数据源产出的原始文章与规范化后的文章
/// - 提及（mention）：单篇文章中实体命中的记录及汇总统计
///
/// 这些都是普通数据结构，不持有数据库对象；
/// 只有持久化仓库负责把它们写入存储。
pub mod article;
pub mod mention;
