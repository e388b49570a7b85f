// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 文章数据源领域模块
///
/// 定义数据源特质及其批次、失败记录和错误类型，
/// 具体的 HTTP 客户端实现位于基础设施层。
pub mod article_source;
