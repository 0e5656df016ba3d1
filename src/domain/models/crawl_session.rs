// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::{DedupKey, JobPosting};
use crate::domain::models::proxy::ProxyDescriptor;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// 爬取会话
///
/// 一次运行的临时状态：查询条件、当前页码、按顺序累积的职位以及已见去重键。
/// 职位只能通过 [`CrawlSession::absorb`] 加入，保证 `jobs.len() == seen.len()`。
#[derive(Debug, Clone)]
pub struct CrawlSession {
    run_id: Uuid,
    keyword: String,
    city: String,
    page: u32,
    jobs: Vec<JobPosting>,
    seen: HashSet<DedupKey>,
    proxy: Option<ProxyDescriptor>,
}

impl CrawlSession {
    pub fn new(keyword: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            keyword: keyword.into(),
            city: city.into(),
            page: 1,
            jobs: Vec::new(),
            seen: HashSet::new(),
            proxy: None,
        }
    }

    /// 合并一页职位，返回新增的不重复职位数
    pub fn absorb(&mut self, page_jobs: Vec<JobPosting>) -> usize {
        let before = self.jobs.len();
        for job in page_jobs {
            if self.seen.insert(job.dedup_key()) {
                self.jobs.push(job);
            }
        }
        debug_assert_eq!(self.jobs.len(), self.seen.len());
        self.jobs.len() - before
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    pub fn proxy(&self) -> Option<&ProxyDescriptor> {
        self.proxy.as_ref()
    }

    pub(crate) fn set_proxy(&mut self, proxy: Option<ProxyDescriptor>) {
        self.proxy = proxy;
    }
}

/// 爬取状态
///
/// 状态流转：
/// Idle → Fetching(N) → Fetching(N+1) / Exhausted / Stalled / Aborted / PageLimit
///
/// 除 Idle 与 Fetching 外均为终止状态，终止状态都允许保存数据。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CrawlState {
    /// 未开始
    #[default]
    Idle,
    /// 正在抓取第 N 页
    Fetching { page: u32 },
    /// 某页没有任何可解析的职位
    Exhausted { page: u32 },
    /// 某页没有带来任何新职位
    Stalled { page: u32 },
    /// 抓取或解析出错，提前结束
    Aborted { page: u32, reason: String },
    /// 达到配置的最大页数
    PageLimit { pages: u32 },
}

impl CrawlState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CrawlState::Idle | CrawlState::Fetching { .. })
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlState::Idle => write!(f, "idle"),
            CrawlState::Fetching { page } => write!(f, "fetching page {}", page),
            CrawlState::Exhausted { page } => write!(f, "exhausted at page {}", page),
            CrawlState::Stalled { page } => write!(f, "stalled at page {}", page),
            CrawlState::Aborted { page, reason } => {
                write!(f, "aborted at page {}: {}", page, reason)
            }
            CrawlState::PageLimit { pages } => write!(f, "page limit of {} reached", pages),
        }
    }
}
