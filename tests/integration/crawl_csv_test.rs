// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::scripted_session::ScriptedSessionFactory;
use super::helpers::{fast_options, jobs_page};
use std::sync::Arc;
use tempfile::TempDir;
use zpcrawl::domain::services::crawl_service::JobCrawler;
use zpcrawl::infrastructure::repositories::csv_job_repo::CsvJobRepository;

#[tokio::test]
async fn test_crawl_exports_csv() {
    let dir = TempDir::new().unwrap();
    let repo = Arc::new(CsvJobRepository::new(dir.path()));
    let factory = ScriptedSessionFactory::new(vec![
        Some(jobs_page(&[("Unity开发", "米哈游"), ("TA", "莉莉丝")])),
        Some(jobs_page(&[])),
    ]);

    let mut crawler = JobCrawler::new(factory, repo.clone(), "unity", "101020100", fast_options());
    crawler.run().await;
    let report = crawler.save("unity").await.unwrap();
    assert_eq!(report.inserted, 2);

    let mut reader = csv::Reader::from_path(repo.table_path("unity")).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "position_name");
    assert_eq!(&headers[1], "company_name");

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Unity开发");
    assert_eq!(&rows[1][1], "莉莉丝");
    assert!(rows[0].iter().any(|field| field == "五险一金、带薪年假"));
}

/// 两次运行写入同一张表：表头只写一次，数据追加
#[tokio::test]
async fn test_second_run_appends_rows() {
    let dir = TempDir::new().unwrap();
    let repo = Arc::new(CsvJobRepository::new(dir.path()));

    for title in ["A", "B"] {
        let factory = ScriptedSessionFactory::new(vec![Some(jobs_page(&[(title, "X")])), None]);
        let mut crawler = JobCrawler::new(factory, repo.clone(), "unity", "101020100", fast_options());
        crawler.run().await;
        crawler.save("jobs").await.unwrap();
        crawler.quit().await;
    }

    let mut reader = csv::Reader::from_path(repo.table_path("jobs")).unwrap();
    let titles: Vec<String> = reader
        .records()
        .map(|r| r.unwrap()[0].to_string())
        .collect();
    assert_eq!(titles, vec!["A", "B"]);
}
