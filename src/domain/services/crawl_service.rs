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

use crate::config::settings::CrawlSettings;
use crate::domain::models::crawl_session::{CrawlSession, CrawlState};
use crate::domain::models::job_posting::JobPosting;
use crate::domain::models::proxy::ProxyDescriptor;
use crate::domain::models::search_query::SearchQuery;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::services::payload_parser::{parse_job_list, response_code};
use crate::engines::traits::{PageSession, SessionError, SessionFactory};
use crate::utils::delay_policy::PageDelayPolicy;
use crate::utils::errors::CrawlError;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// 爬取参数
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// 搜索页地址
    pub search_url: String,
    /// 职位列表响应的路径特征
    pub listen_path: String,
    /// 单页响应等待时间
    pub response_timeout: Duration,
    /// 最大页数，为空时只依赖空页/停滞判断
    pub max_pages: Option<u32>,
    /// 翻页间隔策略
    pub delay: PageDelayPolicy,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            search_url: "https://www.zhipin.com/web/geek/job".to_string(),
            listen_path: "wapi/zpgeek/search/joblist.json".to_string(),
            response_timeout: Duration::from_secs(10),
            max_pages: None,
            delay: PageDelayPolicy::default(),
        }
    }
}

impl From<&CrawlSettings> for CrawlOptions {
    fn from(settings: &CrawlSettings) -> Self {
        Self {
            search_url: settings.search_url.clone(),
            listen_path: settings.listen_path.clone(),
            response_timeout: settings.response_timeout(),
            max_pages: settings.max_pages,
            delay: PageDelayPolicy::from_millis(settings.min_delay_ms, settings.max_delay_ms),
        }
    }
}

/// 保存结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// 成功插入的记录数
    pub inserted: usize,
    /// 插入失败的记录数
    pub failed: usize,
}

/// 分页职位爬虫
///
/// 针对固定的 (关键词, 城市) 逐页抓取搜索结果，截获职位列表接口响应，
/// 按 (职位名称, 公司名称) 去重累积，遇到空页或停滞时停止，最后持久化。
///
/// 页面会话由爬虫独占，首次抓取时按需创建；切换代理时先释放旧会话再创建新会话。
pub struct JobCrawler<F: SessionFactory, R: JobRepository> {
    /// 会话工厂
    factory: F,
    /// 职位仓库
    repo: Arc<R>,
    /// 当前持有的页面会话
    page_session: Option<F::Session>,
    /// 本次运行的累积状态
    crawl: CrawlSession,
    /// 爬取参数
    options: CrawlOptions,
    /// 当前状态
    state: CrawlState,
    /// 代理切换失败后置位，之后的抓取全部拒绝
    unusable: bool,
}

impl<F: SessionFactory, R: JobRepository> JobCrawler<F, R> {
    /// 创建新的爬虫实例，不会立即打开页面会话
    ///
    /// # 参数
    ///
    /// * `factory` - 页面会话工厂
    /// * `repo` - 职位仓库
    /// * `keyword` - 职位关键词
    /// * `city` - 城市代码
    /// * `options` - 爬取参数
    pub fn new(
        factory: F,
        repo: Arc<R>,
        keyword: impl Into<String>,
        city: impl Into<String>,
        options: CrawlOptions,
    ) -> Self {
        Self {
            factory,
            repo,
            page_session: None,
            crawl: CrawlSession::new(keyword, city),
            options,
            state: CrawlState::Idle,
            unusable: false,
        }
    }

    /// 指定首次打开会话时使用的代理
    pub fn with_proxy(mut self, proxy: ProxyDescriptor) -> Self {
        self.crawl.set_proxy(Some(proxy));
        self
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn crawl_session(&self) -> &CrawlSession {
        &self.crawl
    }

    pub fn jobs(&self) -> &[JobPosting] {
        self.crawl.jobs()
    }

    pub fn has_session(&self) -> bool {
        self.page_session.is_some()
    }

    pub fn is_unusable(&self) -> bool {
        self.unusable
    }

    /// 取得页面会话，没有时按当前代理创建并注册监听
    async fn acquire(&mut self) -> Result<&mut F::Session, CrawlError> {
        if self.unusable {
            return Err(CrawlError::Unusable);
        }
        if self.page_session.is_none() {
            let mut session = self.factory.open(self.crawl.proxy()).await?;
            if let Err(e) = session.listen(&self.options.listen_path).await {
                let _ = session.quit().await;
                return Err(e.into());
            }
            debug!(factory = self.factory.name(), "Page session acquired");
            self.page_session = Some(session);
        }
        self.page_session.as_mut().ok_or(CrawlError::Unusable)
    }

    /// 抓取指定页，返回截获的职位列表响应
    ///
    /// 等待超时返回 `FetchTimeout`，站点返回反爬状态码时返回 `Blocked`。
    /// 每页只尝试一次，重试由调用方决定。
    pub async fn fetch_page(&mut self, page: u32) -> Result<Value, CrawlError> {
        let url = SearchQuery::new(self.crawl.keyword(), self.crawl.city(), page)
            .to_url(&self.options.search_url)
            .map_err(|e| SessionError::Navigation(e.to_string()))?;
        let listen_path = self.options.listen_path.clone();
        let timeout = self.options.response_timeout;

        let session = self.acquire().await?;
        debug!(page, %url, "Navigating");
        session.navigate(&url).await?;

        let payload = session
            .wait_for_response(&listen_path, timeout)
            .await
            .map_err(|e| match e {
                SessionError::Timeout => CrawlError::FetchTimeout { page },
                other => CrawlError::Session(other),
            })?;

        if let Some((code, message)) = response_code(&payload) {
            return Err(CrawlError::Blocked { code, message });
        }

        Ok(payload)
    }

    /// 解析一页响应，结构缺失时返回空列表
    pub fn parse_page(&self, payload: &Value) -> Vec<JobPosting> {
        parse_job_list(payload)
    }

    /// 执行爬取循环，返回终止状态
    ///
    /// 错误在此边界被捕获并记录，不会向上传播；已累积的数据保持不变。
    pub async fn run(&mut self) -> CrawlState {
        let span = info_span!(
            "crawl",
            run_id = %self.crawl.run_id(),
            keyword = %self.crawl.keyword(),
            city = %self.crawl.city()
        );
        self.run_pages().instrument(span).await
    }

    async fn run_pages(&mut self) -> CrawlState {
        let mut page: u32 = 1;
        let mut previous_count = self.crawl.len();

        let outcome = loop {
            if let Some(max) = self.options.max_pages {
                if page > max {
                    info!(max_pages = max, "Page limit reached");
                    break CrawlState::PageLimit { pages: max };
                }
            }

            let delay = self.options.delay.delay_for(page);
            if !delay.is_zero() {
                debug!(page, delay_ms = delay.as_millis() as u64, "Waiting before next page");
                tokio::time::sleep(delay).await;
            }

            self.crawl.set_page(page);
            self.state = CrawlState::Fetching { page };
            info!(page, "Fetching page");

            let page_jobs = match self.fetch_page(page).await {
                Ok(payload) => self.parse_page(&payload),
                Err(e) => {
                    error!(page, error = %e, "Crawl aborted");
                    break CrawlState::Aborted {
                        page,
                        reason: e.to_string(),
                    };
                }
            };

            if page_jobs.is_empty() {
                info!(page, "Page has no jobs, crawl exhausted");
                break CrawlState::Exhausted { page };
            }

            let fetched = page_jobs.len();
            let added = self.crawl.absorb(page_jobs);
            let total = self.crawl.len();
            info!(page, fetched, added, total, "Page processed");

            if total == previous_count {
                warn!(page, "Page added no new jobs, crawl stalled");
                break CrawlState::Stalled { page };
            }

            previous_count = total;
            page += 1;
        };

        if self.crawl.is_empty() {
            warn!(state = %outcome, "Crawl finished without collecting any jobs");
        } else {
            info!(
                state = %outcome,
                last_page = self.crawl.current_page(),
                total = self.crawl.len(),
                "Crawl finished"
            );
        }

        self.state = outcome.clone();
        outcome
    }

    /// 把累积的职位写入指定表
    ///
    /// 没有数据时直接返回且不触碰仓库；单行插入失败只记录日志并继续下一行。
    pub async fn save(&self, table: &str) -> Result<SaveReport, CrawlError> {
        let jobs = self.crawl.jobs();
        if jobs.is_empty() {
            warn!(table, "No jobs collected, nothing to save");
            return Ok(SaveReport::default());
        }

        self.repo.ensure_table(table).await?;

        let mut report = SaveReport::default();
        for job in jobs {
            match self.repo.insert_row(table, job).await {
                Ok(()) => report.inserted += 1,
                Err(e) => {
                    warn!(table, job = %job.dedup_key(), error = %e, "Failed to insert job");
                    report.failed += 1;
                }
            }
        }

        info!(
            table,
            inserted = report.inserted,
            failed = report.failed,
            "Jobs saved"
        );
        Ok(report)
    }

    /// 切换代理
    ///
    /// 先释放当前会话，再按新代理创建会话并重新注册监听。
    /// 任一步失败都会让爬虫进入不可用状态，需要重新创建实例。
    pub async fn set_proxy(&mut self, proxy: ProxyDescriptor) -> Result<(), CrawlError> {
        if self.unusable {
            return Err(CrawlError::Unusable);
        }

        if let Some(mut old) = self.page_session.take() {
            if let Err(e) = old.quit().await {
                self.unusable = true;
                return Err(CrawlError::ProxyReconfig(format!(
                    "failed to release previous session: {}",
                    e
                )));
            }
        }

        let mut fresh = match self.factory.open(Some(&proxy)).await {
            Ok(session) => session,
            Err(e) => {
                self.unusable = true;
                return Err(CrawlError::ProxyReconfig(e.to_string()));
            }
        };

        if let Err(e) = fresh.listen(&self.options.listen_path).await {
            let _ = fresh.quit().await;
            self.unusable = true;
            return Err(CrawlError::ProxyReconfig(e.to_string()));
        }

        info!(%proxy, "Page session rebuilt with proxy");
        self.page_session = Some(fresh);
        self.crawl.set_proxy(Some(proxy));
        Ok(())
    }

    /// 释放页面会话，从未打开过会话时什么都不做
    pub async fn quit(&mut self) {
        if let Some(mut session) = self.page_session.take() {
            if let Err(e) = session.quit().await {
                warn!(error = %e, "Failed to release page session");
            } else {
                debug!("Page session released");
            }
        }
    }
}
