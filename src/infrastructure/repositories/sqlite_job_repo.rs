// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::job_posting::JobPosting;
use crate::domain::repositories::job_repository::{validate_table_name, JobRepository};
use crate::utils::errors::StoreError;
use crate::utils::field_parsing::{parse_education, parse_experience, parse_salary};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// SQLite 职位仓库实现
pub struct SqliteJobRepository {
    /// 数据库连接池
    pool: SqlitePool,
}

impl SqliteJobRepository {
    /// 创建新的职位仓库实例
    ///
    /// # 参数
    ///
    /// * `pool` - 数据库连接池
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 列出所有用户表（排除 sqlite 系统表）
    pub async fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    /// 统计表内记录数
    pub async fn count_rows(&self, table: &str) -> Result<i64, StoreError> {
        validate_table_name(table)?;
        let count = sqlx::query_scalar::<_, i64>(&format!(r#"SELECT COUNT(*) FROM "{}""#, table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    async fn ensure_table(&self, table: &str) -> Result<(), StoreError> {
        validate_table_name(table)?;
        let sql = format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                position_name TEXT NOT NULL,
                company_name TEXT NOT NULL,
                salary TEXT,
                work_city TEXT,
                work_exp TEXT,
                education TEXT,
                company_size TEXT,
                industry TEXT,
                area_district TEXT,
                business_district TEXT,
                position_url TEXT,
                job_summary TEXT,
                welfare TEXT,
                salary_min_k REAL,
                salary_max_k REAL,
                salary_months INTEGER,
                work_exp_years REAL,
                education_level INTEGER,
                collected_at TEXT NOT NULL
            )"#,
            table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_row(&self, table: &str, job: &JobPosting) -> Result<(), StoreError> {
        validate_table_name(table)?;
        let salary = parse_salary(&job.salary);
        let sql = format!(
            r#"INSERT INTO "{}" (
                position_name, company_name, salary, work_city, work_exp, education,
                company_size, industry, area_district, business_district, position_url,
                job_summary, welfare, salary_min_k, salary_max_k, salary_months,
                work_exp_years, education_level, collected_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            table
        );

        sqlx::query(&sql)
            .bind(&job.position_name)
            .bind(&job.company_name)
            .bind(&job.salary)
            .bind(&job.work_city)
            .bind(&job.work_exp)
            .bind(&job.education)
            .bind(&job.company_size)
            .bind(&job.industry)
            .bind(&job.area_district)
            .bind(&job.business_district)
            .bind(&job.position_url)
            .bind(serde_json::to_string(&job.job_summary)?)
            .bind(serde_json::to_string(&job.welfare)?)
            .bind(salary.map(|s| s.min_k as f64))
            .bind(salary.map(|s| s.max_k as f64))
            .bind(salary.map(|s| s.months as i64))
            .bind(parse_experience(&job.work_exp) as f64)
            .bind(parse_education(&job.education) as i64)
            .bind(job.collected_at.to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
