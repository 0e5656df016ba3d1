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

use anyhow::{bail, Context};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use validator::Validate;
use zpcrawl::config::settings::Settings;
use zpcrawl::domain::models::proxy::ProxyDescriptor;
use zpcrawl::domain::models::search_query::resolve_city;
use zpcrawl::domain::repositories::job_repository::JobRepository;
use zpcrawl::domain::services::crawl_service::{CrawlOptions, JobCrawler};
use zpcrawl::engines::chromium_session::ChromiumSessionFactory;
use zpcrawl::infrastructure::database::connection;
use zpcrawl::infrastructure::proxy::{ProxyChecker, ProxyPool};
use zpcrawl::infrastructure::repositories::csv_job_repo::CsvJobRepository;
use zpcrawl::infrastructure::repositories::sqlite_job_repo::SqliteJobRepository;
use zpcrawl::utils::telemetry;

/// 命令行参数，未指定的项使用配置文件中的值
#[derive(Parser, Debug)]
#[command(name = "zpcrawl")]
#[command(about = "Crawl paginated job listings and persist them to SQLite or CSV")]
struct Cli {
    /// 职位关键词
    #[arg(long)]
    keyword: Option<String>,

    /// 城市名称或 9 位城市代码
    #[arg(long)]
    city: Option<String>,

    /// 代理地址 (host:port)
    #[arg(long)]
    proxy: Option<String>,

    /// 代理列表文件，取第一个可用代理
    #[arg(long)]
    proxy_file: Option<String>,

    /// 登录 Cookie 文件 (JSON)
    #[arg(long)]
    cookie_file: Option<String>,

    /// 目标表名
    #[arg(long)]
    table: Option<String>,

    /// 最大页数
    #[arg(long)]
    max_pages: Option<u32>,

    /// 存储后端 (sqlite, csv)
    #[arg(long)]
    backend: Option<String>,

    /// 输出 JSON 格式日志
    #[arg(long)]
    json_logs: bool,

    /// 列出 SQLite 中的表及行数后退出
    #[arg(long)]
    list_tables: bool,
}

impl Cli {
    fn apply(self, settings: &mut Settings) {
        if let Some(keyword) = self.keyword {
            settings.crawl.keyword = keyword;
        }
        if let Some(city) = self.city {
            settings.crawl.city = city;
        }
        if let Some(max_pages) = self.max_pages {
            settings.crawl.max_pages = Some(max_pages);
        }
        if let Some(table) = self.table {
            settings.storage.table = table;
        }
        if let Some(backend) = self.backend {
            settings.storage.backend = backend;
        }
        if let Some(proxy) = self.proxy {
            settings.proxy.address = Some(proxy);
        }
        if let Some(file) = self.proxy_file {
            settings.proxy.pool_file = Some(file);
        }
        if let Some(file) = self.cookie_file {
            settings.browser.cookie_file = Some(file);
        }
    }
}

/// 主函数
///
/// 加载配置、选择存储后端、执行一次爬取并保存结果
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry(cli.json_logs);
    let list_tables = cli.list_tables;

    let mut settings = Settings::new().context("failed to load configuration")?;
    cli.apply(&mut settings);
    settings
        .crawl
        .validate()
        .context("invalid crawl configuration")?;

    if list_tables {
        return print_tables(&settings).await;
    }

    let city = resolve_city(&settings.crawl.city)
        .with_context(|| format!("unknown city: {}", settings.crawl.city))?;
    settings.crawl.city = city;

    let proxy = select_proxy(&settings).await?;

    info!(
        keyword = %settings.crawl.keyword,
        city = %settings.crawl.city,
        backend = %settings.storage.backend,
        "Starting zpcrawl"
    );

    match settings.storage.backend.as_str() {
        "sqlite" => {
            let pool = connection::create_pool(&settings.storage).await?;
            info!("Database connection established");
            crawl_into(&settings, Arc::new(SqliteJobRepository::new(pool)), proxy).await
        }
        "csv" => {
            let repo = CsvJobRepository::new(&settings.storage.csv_dir);
            crawl_into(&settings, Arc::new(repo), proxy).await
        }
        other => bail!("unsupported storage backend: {}", other),
    }
}

async fn crawl_into<R: JobRepository>(
    settings: &Settings,
    repo: Arc<R>,
    proxy: Option<ProxyDescriptor>,
) -> anyhow::Result<()> {
    let factory = ChromiumSessionFactory::new(settings.browser.clone());
    let mut crawler = JobCrawler::new(
        factory,
        repo,
        settings.crawl.keyword.clone(),
        settings.crawl.city.clone(),
        CrawlOptions::from(&settings.crawl),
    );
    if let Some(proxy) = proxy {
        crawler = crawler.with_proxy(proxy);
    }

    let state = crawler.run().await;
    info!(%state, collected = crawler.jobs().len(), "Crawl loop ended");

    let saved = crawler.save(&settings.storage.table).await;
    crawler.quit().await;

    let report = saved?;
    info!(
        table = %settings.storage.table,
        inserted = report.inserted,
        failed = report.failed,
        "Done"
    );
    Ok(())
}

async fn select_proxy(settings: &Settings) -> anyhow::Result<Option<ProxyDescriptor>> {
    if let Some(address) = &settings.proxy.address {
        let proxy: ProxyDescriptor = address
            .parse()
            .with_context(|| format!("invalid proxy address: {}", address))?;
        return Ok(Some(proxy));
    }

    let Some(path) = &settings.proxy.pool_file else {
        return Ok(None);
    };

    let mut pool = ProxyPool::load(path)
        .await
        .with_context(|| format!("failed to read proxy file: {}", path))?;
    let checker = ProxyChecker::new(
        settings.proxy.check_url.clone(),
        Duration::from_secs(settings.proxy.check_timeout_secs),
    );

    match pool.first_healthy(&checker).await {
        Some(proxy) => {
            info!(%proxy, "Using proxy from pool");
            Ok(Some(proxy))
        }
        None => {
            warn!(pool_size = pool.len(), "No healthy proxy found, connecting directly");
            Ok(None)
        }
    }
}

async fn print_tables(settings: &Settings) -> anyhow::Result<()> {
    let pool = connection::create_pool(&settings.storage).await?;
    let repo = SqliteJobRepository::new(pool);
    let tables = repo.list_tables().await?;
    if tables.is_empty() {
        println!("No tables in {}", settings.storage.database_url);
        return Ok(());
    }
    for table in tables {
        let rows = repo.count_rows(&table).await?;
        println!("{}\t{}", table, rows);
    }
    Ok(())
}
