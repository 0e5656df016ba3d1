// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供领域抽象的具体技术实现：
/// - 数据库（database）：SQLite 连接池
/// - 代理（proxy）：代理池与可用性检测
/// - 仓库实现（repositories）：职位仓库的 SQLite 与 CSV 实现
pub mod database;
pub mod proxy;
pub mod repositories;
