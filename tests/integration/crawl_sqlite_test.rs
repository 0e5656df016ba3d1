// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::fast_options;
use super::helpers::jobs_page;
use super::helpers::scripted_session::ScriptedSessionFactory;
use std::sync::Arc;
use tempfile::TempDir;
use zpcrawl::domain::models::crawl_session::CrawlState;
use zpcrawl::domain::services::crawl_service::JobCrawler;
use zpcrawl::infrastructure::database::connection;
use zpcrawl::infrastructure::repositories::sqlite_job_repo::SqliteJobRepository;

async fn sqlite_repo(dir: &TempDir) -> Arc<SqliteJobRepository> {
    let url = format!("sqlite://{}", dir.path().join("jobs.db").display());
    let pool = connection::connect(&url, 1).await.unwrap();
    Arc::new(SqliteJobRepository::new(pool))
}

/// 按插入顺序读取表内的 (职位名称, 公司名称)
async fn stored_keys(dir: &TempDir, table: &str) -> Vec<(String, String)> {
    let url = format!("sqlite://{}", dir.path().join("jobs.db").display());
    let pool = connection::connect(&url, 1).await.unwrap();
    let sql = format!(r#"SELECT position_name, company_name FROM "{}" ORDER BY id"#, table);
    let keys: Vec<(String, String)> = sqlx::query_as(&sql).fetch_all(&pool).await.unwrap();
    keys
}

/// 三页抓取：第二页与第一页部分重复，第三页为空
///
/// 保存后表内按首次出现顺序恰好有三行
#[tokio::test]
async fn test_overlapping_pages_persist_unique_rows() {
    let dir = TempDir::new().unwrap();
    let repo = sqlite_repo(&dir).await;
    let factory = ScriptedSessionFactory::new(vec![
        Some(jobs_page(&[("A", "X"), ("B", "Y")])),
        Some(jobs_page(&[("B", "Y"), ("C", "Z")])),
        Some(jobs_page(&[])),
    ]);

    let mut crawler = JobCrawler::new(factory.clone(), repo.clone(), "unity", "101020100", fast_options());
    let state = crawler.run().await;
    let report = crawler.save("unity_jobs").await.unwrap();
    crawler.quit().await;

    assert_eq!(state, CrawlState::Exhausted { page: 3 });
    assert_eq!(report.inserted, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(
        stored_keys(&dir, "unity_jobs").await,
        vec![
            ("A".to_string(), "X".to_string()),
            ("B".to_string(), "Y".to_string()),
            ("C".to_string(), "Z".to_string()),
        ]
    );
    assert_eq!(repo.list_tables().await.unwrap(), vec!["unity_jobs".to_string()]);
    assert_eq!(factory.events().last().map(String::as_str), Some("quit direct"));
}

/// 互不重叠的页面：累积数等于各页数量之和
#[tokio::test]
async fn test_disjoint_pages_accumulate_all_rows() {
    let dir = TempDir::new().unwrap();
    let repo = sqlite_repo(&dir).await;
    let factory = ScriptedSessionFactory::new(vec![
        Some(jobs_page(&[("A", "X"), ("B", "X")])),
        Some(jobs_page(&[("C", "Y")])),
        Some(jobs_page(&[("D", "Z"), ("E", "Z"), ("F", "Z")])),
        Some(jobs_page(&[])),
    ]);

    let mut crawler = JobCrawler::new(factory, repo.clone(), "unity", "101020100", fast_options());
    crawler.run().await;
    crawler.save("jobs").await.unwrap();

    assert_eq!(crawler.jobs().len(), 6);
    assert_eq!(repo.count_rows("jobs").await.unwrap(), 6);
}

/// 同名职位出现在不同公司：按 (职位, 公司) 区分，不会被合并
#[tokio::test]
async fn test_same_title_at_different_companies_is_kept() {
    let dir = TempDir::new().unwrap();
    let repo = sqlite_repo(&dir).await;
    let factory = ScriptedSessionFactory::new(vec![
        Some(jobs_page(&[("A", "X")])),
        Some(jobs_page(&[("A", "Y")])),
        Some(jobs_page(&[])),
    ]);

    let mut crawler = JobCrawler::new(factory, repo.clone(), "unity", "101020100", fast_options());
    let state = crawler.run().await;
    crawler.save("jobs").await.unwrap();

    assert_eq!(state, CrawlState::Exhausted { page: 3 });
    assert_eq!(crawler.jobs().len(), 2);
    assert_eq!(
        stored_keys(&dir, "jobs").await,
        vec![
            ("A".to_string(), "X".to_string()),
            ("A".to_string(), "Y".to_string()),
        ]
    );
}

/// 第二页与第一页完全相同：停在第二页，不请求第三页
#[tokio::test]
async fn test_identical_second_page_stalls() {
    let dir = TempDir::new().unwrap();
    let repo = sqlite_repo(&dir).await;
    let factory = ScriptedSessionFactory::new(vec![
        Some(jobs_page(&[("A", "X")])),
        Some(jobs_page(&[("A", "X")])),
        Some(jobs_page(&[("D", "W")])),
    ]);

    let mut crawler = JobCrawler::new(factory.clone(), repo.clone(), "unity", "101020100", fast_options());
    let state = crawler.run().await;
    crawler.save("jobs").await.unwrap();

    assert_eq!(state, CrawlState::Stalled { page: 2 });
    assert_eq!(stored_keys(&dir, "jobs").await, vec![("A".to_string(), "X".to_string())]);
    let navigations = factory
        .events()
        .iter()
        .filter(|e| e.starts_with("navigate"))
        .count();
    assert_eq!(navigations, 2);
}

/// 第一页超时：没有数据，保存不会建表
#[tokio::test]
async fn test_first_page_timeout_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let repo = sqlite_repo(&dir).await;
    let factory = ScriptedSessionFactory::new(vec![None]);

    let mut crawler = JobCrawler::new(factory, repo.clone(), "unity", "101020100", fast_options());
    let state = crawler.run().await;
    let report = crawler.save("jobs").await.unwrap();

    assert!(matches!(state, CrawlState::Aborted { page: 1, .. }));
    assert_eq!(report.inserted, 0);
    assert!(repo.list_tables().await.unwrap().is_empty());
}

/// 非法表名在建表阶段被拒绝
#[tokio::test]
async fn test_save_rejects_invalid_table_name() {
    let dir = TempDir::new().unwrap();
    let repo = sqlite_repo(&dir).await;
    let factory = ScriptedSessionFactory::new(vec![Some(jobs_page(&[("A", "X")])), None]);

    let mut crawler = JobCrawler::new(factory, repo, "unity", "101020100", fast_options());
    crawler.run().await;

    assert!(crawler.save("jobs; DROP TABLE x").await.is_err());
}

/// 解析出的薪资区间与原始薪资一同入库
#[tokio::test]
async fn test_salary_range_is_stored() {
    let dir = TempDir::new().unwrap();
    let repo = sqlite_repo(&dir).await;
    let factory = ScriptedSessionFactory::new(vec![Some(jobs_page(&[("A", "X")])), Some(jobs_page(&[]))]);

    let mut crawler = JobCrawler::new(factory, repo, "unity", "101020100", fast_options());
    crawler.run().await;
    crawler.save("jobs").await.unwrap();

    let url = format!("sqlite://{}", dir.path().join("jobs.db").display());
    let pool = connection::connect(&url, 1).await.unwrap();
    let (salary, min_k, max_k, months): (String, f64, f64, i64) = sqlx::query_as(
        "SELECT salary, salary_min_k, salary_max_k, salary_months FROM jobs",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(salary, "15-25K·13薪");
    assert_eq!(min_k, 15.0);
    assert_eq!(max_k, 25.0);
    assert_eq!(months, 13);
}
