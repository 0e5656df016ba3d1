// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：职位记录、爬取会话、代理与查询参数
/// - 仓库接口（repositories）：职位持久化抽象接口
/// - 服务（services）：爬取流程与响应解析
///
/// 领域层不依赖于任何具体的浏览器或数据库实现。
pub mod models;
pub mod repositories;
pub mod services;
