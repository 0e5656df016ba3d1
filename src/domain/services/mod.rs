// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 爬取服务（crawl_service）：分页抓取、去重累积、终止判断与持久化
/// - 响应解析（payload_parser）：把职位列表接口响应映射为职位记录
pub mod crawl_service;
pub mod payload_parser;
