// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::JobPosting;
use crate::domain::repositories::job_repository::{validate_table_name, JobRepository};
use crate::utils::errors::StoreError;
use async_trait::async_trait;
use csv::WriterBuilder;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// UTF-8 字节序标记，表格软件据此识别中文表头
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADERS: [&str; 14] = [
    "position_name",
    "company_name",
    "salary",
    "work_city",
    "work_exp",
    "education",
    "company_size",
    "industry",
    "area_district",
    "business_district",
    "position_url",
    "job_summary",
    "welfare",
    "collected_at",
];

/// CSV 职位仓库实现
///
/// 每张"表"对应 `<dir>/<table>.csv`，建表时写入 BOM 与表头，之后逐行追加。
/// 列表字段用 "、" 连接。
pub struct CsvJobRepository {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvJobRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 表对应的文件路径
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.base_dir.join(format!("{}.csv", table))
    }

    fn record(job: &JobPosting) -> [String; 14] {
        [
            job.position_name.clone(),
            job.company_name.clone(),
            job.salary.clone(),
            job.work_city.clone(),
            job.work_exp.clone(),
            job.education.clone(),
            job.company_size.clone(),
            job.industry.clone(),
            job.area_district.clone(),
            job.business_district.clone(),
            job.position_url.clone(),
            job.job_summary.join("、"),
            job.welfare.join("、"),
            job.collected_at.to_rfc3339(),
        ]
    }

    /// 把若干行编码为 CSV 字节
    fn encode<I, R>(rows: I) -> Result<Vec<u8>, StoreError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        for row in rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| StoreError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
    }

    async fn append(path: &Path, job: &JobPosting) -> Result<(), StoreError> {
        let bytes = Self::encode([Self::record(job)])?;
        let mut file = OpenOptions::new().append(true).open(path).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl JobRepository for CsvJobRepository {
    async fn ensure_table(&self, table: &str) -> Result<(), StoreError> {
        validate_table_name(table)?;
        let _guard = self.write_lock.lock().await;

        tokio::fs::create_dir_all(&self.base_dir).await?;
        let path = self.table_path(table);
        if tokio::fs::try_exists(&path).await? {
            return Ok(());
        }

        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend(Self::encode([HEADERS])?);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), "CSV table created");
        Ok(())
    }

    async fn insert_row(&self, table: &str, job: &JobPosting) -> Result<(), StoreError> {
        validate_table_name(table)?;
        let _guard = self.write_lock.lock().await;
        Self::append(&self.table_path(table), job).await
    }
}
