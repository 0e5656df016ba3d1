// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::scripted_session::ScriptedSessionFactory;
use super::helpers::{fast_options, jobs_page};
use async_trait::async_trait;
use std::sync::Arc;
use tempfile::TempDir;
use zpcrawl::domain::models::crawl_session::CrawlState;
use zpcrawl::domain::models::proxy::ProxyDescriptor;
use zpcrawl::domain::services::crawl_service::JobCrawler;
use zpcrawl::infrastructure::proxy::{ProxyPool, ProxyProbe};
use zpcrawl::infrastructure::repositories::csv_job_repo::CsvJobRepository;
use zpcrawl::utils::errors::CrawlError;

/// 只认为指定端口的代理可用
struct PortProbe(u16);

#[async_trait]
impl ProxyProbe for PortProbe {
    async fn is_healthy(&self, proxy: &ProxyDescriptor) -> bool {
        proxy.port == self.0
    }
}

/// 从代理池取第一个可用代理，之后的会话都经由它
#[tokio::test]
async fn test_pool_proxy_is_used_for_crawl() {
    let mut pool = ProxyPool::from_lines("# proxies\n10.0.0.1:8080\n10.0.0.2:3128\n");
    let proxy = pool.first_healthy(&PortProbe(3128)).await.unwrap();
    assert_eq!(proxy.to_string(), "10.0.0.2:3128");

    let dir = TempDir::new().unwrap();
    let factory = ScriptedSessionFactory::new(vec![Some(jobs_page(&[("A", "X")])), None]);
    let mut crawler = JobCrawler::new(
        factory.clone(),
        Arc::new(CsvJobRepository::new(dir.path())),
        "unity",
        "101020100",
        fast_options(),
    )
    .with_proxy(proxy);

    crawler.run().await;
    crawler.quit().await;

    let events = factory.events();
    assert_eq!(events[0], "open 10.0.0.2:3128");
    assert!(events[1].starts_with("navigate 10.0.0.2:3128"));
}

/// 切换代理后从第一页重新开始，已累积的职位保留
#[tokio::test]
async fn test_switch_proxy_between_runs_keeps_jobs() {
    let dir = TempDir::new().unwrap();
    let factory = ScriptedSessionFactory::new(vec![
        Some(jobs_page(&[("A", "X")])),
        None,
        Some(jobs_page(&[("A", "X"), ("B", "Y")])),
        Some(jobs_page(&[])),
    ]);
    let mut crawler = JobCrawler::new(
        factory.clone(),
        Arc::new(CsvJobRepository::new(dir.path())),
        "unity",
        "101020100",
        fast_options(),
    );

    assert!(matches!(crawler.run().await, CrawlState::Aborted { page: 2, .. }));
    crawler
        .set_proxy(ProxyDescriptor::new("10.0.0.9", 8888))
        .await
        .unwrap();
    assert_eq!(crawler.run().await, CrawlState::Exhausted { page: 2 });

    assert_eq!(crawler.jobs().len(), 2);
    let events = factory.events();
    let quit = events.iter().position(|e| e == "quit direct").unwrap();
    let reopen = events.iter().position(|e| e == "open 10.0.0.9:8888").unwrap();
    assert!(quit < reopen);
}

/// 代理不可达：切换失败，爬虫不可再用，但已有数据仍可保存
#[tokio::test]
async fn test_unreachable_proxy_leaves_crawler_unusable() {
    let dir = TempDir::new().unwrap();
    let factory = ScriptedSessionFactory::new(vec![Some(jobs_page(&[("A", "X")])), None]);
    let bad = ProxyDescriptor::new("10.0.0.3", 9999);
    factory.refuse(bad.clone());
    let mut crawler = JobCrawler::new(
        factory,
        Arc::new(CsvJobRepository::new(dir.path())),
        "unity",
        "101020100",
        fast_options(),
    );
    crawler.run().await;

    let err = crawler.set_proxy(bad).await.unwrap_err();
    assert!(matches!(err, CrawlError::ProxyReconfig(_)));
    assert!(crawler.is_unusable());
    assert!(matches!(crawler.run().await, CrawlState::Aborted { .. }));

    let report = crawler.save("jobs").await.unwrap();
    assert_eq!(report.inserted, 1);
    crawler.quit().await;
}
