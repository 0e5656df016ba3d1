// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::SessionError;
use thiserror::Error;

/// 存储层错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("非法表名: {0}")]
    InvalidTableName(String),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 爬取过程错误类型
///
/// `run()` 在循环边界捕获这些错误并转换为终止状态，
/// 只有 `save()` 与 `set_proxy()` 会把错误返回给调用方。
#[derive(Error, Debug)]
pub enum CrawlError {
    /// 等待窗口内没有匹配的网络响应
    #[error("第 {page} 页等待职位列表响应超时")]
    FetchTimeout { page: u32 },

    /// 站点返回了反爬状态码
    #[error("触发反爬机制 code={code}: {message}")]
    Blocked { code: i64, message: String },

    /// 页面会话错误
    #[error("页面会话错误: {0}")]
    Session(#[from] SessionError),

    /// 切换代理时拆除或重建会话失败
    #[error("切换代理失败: {0}")]
    ProxyReconfig(String),

    /// 代理切换失败后爬虫不可再用
    #[error("爬虫处于不可用状态，需要重新创建实例")]
    Unusable,

    /// 持久化错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
}
