// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 包括翻页间隔策略、字段解析、错误类型与日志初始化
pub mod delay_policy;
pub mod errors;
pub mod field_parsing;
pub mod telemetry;
