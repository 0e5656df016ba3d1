// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::JobPosting;
use crate::utils::errors::StoreError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static TABLE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*$").unwrap());

/// 职位仓库特质
///
/// 定义职位数据持久化接口。只保证"插入一条规范化记录"，
/// 不保证跨运行的幂等性。
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 确保目标表存在，不存在时创建
    async fn ensure_table(&self, table: &str) -> Result<(), StoreError>;

    /// 插入一条职位记录
    async fn insert_row(&self, table: &str, job: &JobPosting) -> Result<(), StoreError>;
}

/// 校验表名
///
/// 表名会被拼接进 SQL 语句与文件名，只允许字母（含中文）、数字和下划线，且不能以数字开头
pub fn validate_table_name(table: &str) -> Result<(), StoreError> {
    if TABLE_NAME.is_match(table) {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(table.to_string()))
    }
}
