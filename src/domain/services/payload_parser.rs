// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::JobPosting;
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 职位列表接口中的单条职位
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawJob {
    #[serde(deserialize_with = "nullable")]
    job_name: String,
    #[serde(deserialize_with = "nullable")]
    brand_name: String,
    #[serde(deserialize_with = "nullable")]
    salary_desc: String,
    #[serde(deserialize_with = "nullable")]
    city_name: String,
    #[serde(deserialize_with = "nullable")]
    job_experience: String,
    #[serde(deserialize_with = "nullable")]
    job_degree: String,
    #[serde(deserialize_with = "nullable")]
    brand_scale_name: String,
    #[serde(deserialize_with = "nullable")]
    brand_industry: String,
    #[serde(deserialize_with = "nullable")]
    area_district: String,
    #[serde(deserialize_with = "nullable")]
    business_district: String,
    #[serde(deserialize_with = "nullable")]
    encrypt_job_id: String,
    #[serde(deserialize_with = "nullable")]
    welfare_list: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    skills: Vec<String>,
}

/// `null` 与缺失字段一样取默认值
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<RawJob> for JobPosting {
    fn from(raw: RawJob) -> Self {
        JobPosting {
            position_url: JobPosting::detail_url(&raw.encrypt_job_id),
            position_name: raw.job_name,
            company_name: raw.brand_name,
            salary: raw.salary_desc,
            work_city: raw.city_name,
            work_exp: raw.job_experience,
            education: raw.job_degree,
            company_size: raw.brand_scale_name,
            industry: raw.brand_industry,
            welfare: raw.welfare_list,
            job_summary: raw.skills,
            area_district: raw.area_district,
            business_district: raw.business_district,
            collected_at: Utc::now(),
        }
    }
}

/// 解析一页职位列表响应
///
/// 读取 `zpData.jobList`。结构缺失时返回空列表而不是错误，
/// 调用方把它视为"没有更多数据"。无法识别的单条记录被跳过。
pub fn parse_job_list(payload: &Value) -> Vec<JobPosting> {
    let Some(list) = payload
        .get("zpData")
        .and_then(|d| d.get("jobList"))
        .and_then(Value::as_array)
    else {
        tracing::debug!("Payload has no zpData.jobList, treating as empty page");
        return Vec::new();
    };

    list.iter()
        .filter_map(|entry| {
            if !entry.is_object() {
                return None;
            }
            match RawJob::deserialize(entry) {
                Ok(raw) => Some(JobPosting::from(raw)),
                Err(e) => {
                    tracing::debug!("Skipping unrecognised job entry: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// 读取响应中的业务状态码
///
/// 站点在触发反爬时返回非零 `code`（例如 37）；缺少 `code` 视为正常
pub fn response_code(payload: &Value) -> Option<(i64, String)> {
    let code = payload.get("code").and_then(Value::as_i64)?;
    if code == 0 {
        return None;
    }
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((code, message))
}
