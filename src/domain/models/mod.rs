// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 职位（job_posting）：一条招聘信息及其去重键
/// - 爬取会话（crawl_session）：一次运行的累积结果与状态机
/// - 代理（proxy）：host:port 代理描述符
/// - 搜索查询（search_query）：搜索页地址与城市代码
pub mod crawl_session;
pub mod job_posting;
pub mod proxy;
pub mod search_query;
