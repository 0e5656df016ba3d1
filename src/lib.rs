// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含职位模型、爬取服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// 页面会话抽象与基于 Chromium 的实现
pub mod engines;

/// 基础设施模块
///
/// 提供数据库连接、职位仓库实现和代理池
pub mod infrastructure;

/// 工具模块
///
/// 提供错误类型、日志初始化、翻页间隔和字段解析
pub mod utils;
