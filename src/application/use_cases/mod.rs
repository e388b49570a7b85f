// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// - 提及分析（analyze_mentions）：一次完整的采集、提取与持久化运行
pub mod analyze_mentions;
