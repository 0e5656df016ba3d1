// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 职位详情页地址前缀
const JOB_DETAIL_URL: &str = "https://www.zhipin.com/job_detail";

/// 职位实体
///
/// 从一页职位列表响应中解析出的一条招聘信息。创建后不可变，
/// 薪资、经验、学历均保留站点原始文本。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    /// 职位名称
    pub position_name: String,
    /// 公司名称
    pub company_name: String,
    /// 薪资（原始文本，例如 "15-25K·13薪"）
    pub salary: String,
    /// 工作城市
    pub work_city: String,
    /// 经验要求（原始文本）
    pub work_exp: String,
    /// 学历要求（原始文本）
    pub education: String,
    /// 公司规模
    pub company_size: String,
    /// 所属行业
    pub industry: String,
    /// 福利标签
    pub welfare: Vec<String>,
    /// 技能要求
    pub job_summary: Vec<String>,
    /// 区域
    pub area_district: String,
    /// 商圈
    pub business_district: String,
    /// 职位详情链接，缺少职位ID时为空
    pub position_url: String,
    /// 采集时间
    pub collected_at: DateTime<Utc>,
}

impl JobPosting {
    /// 创建只包含名称与公司的职位，其余字段为空
    pub fn new(position_name: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            position_name: position_name.into(),
            company_name: company_name.into(),
            salary: String::new(),
            work_city: String::new(),
            work_exp: String::new(),
            education: String::new(),
            company_size: String::new(),
            industry: String::new(),
            welfare: Vec::new(),
            job_summary: Vec::new(),
            area_district: String::new(),
            business_district: String::new(),
            position_url: String::new(),
            collected_at: Utc::now(),
        }
    }

    /// 去重键
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.position_name, &self.company_name)
    }

    /// 由加密职位ID拼出详情页地址
    pub fn detail_url(encrypt_job_id: &str) -> String {
        if encrypt_job_id.is_empty() {
            String::new()
        } else {
            format!("{}/{}.html", JOB_DETAIL_URL, encrypt_job_id)
        }
    }
}

/// 去重键：(职位名称, 公司名称)
///
/// 只在一次爬取会话内有效，不保证跨城市或跨运行唯一
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub position_name: String,
    pub company_name: String,
}

impl DedupKey {
    pub fn new(position_name: &str, company_name: &str) -> Self {
        Self {
            position_name: position_name.to_string(),
            company_name: company_name.to_string(),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.position_name, self.company_name)
    }
}
