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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 爬取配置
    pub crawl: CrawlSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 代理配置
    pub proxy: ProxySettings,
}

/// 爬取配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CrawlSettings {
    /// 职位关键词
    #[validate(length(min = 1, max = 64, message = "Keyword cannot be empty"))]
    pub keyword: String,
    /// 城市名称或城市代码
    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: String,
    /// 搜索页地址
    pub search_url: String,
    /// 职位列表响应的路径特征
    pub listen_path: String,
    /// 单页响应等待时间（秒）
    #[validate(range(min = 1, max = 120))]
    pub response_timeout_secs: u64,
    /// 最大页数，为空时仅依赖空页/停滞判断
    #[validate(range(min = 1, max = 1000))]
    pub max_pages: Option<u32>,
    /// 翻页最小间隔（毫秒）
    pub min_delay_ms: u64,
    /// 翻页最大间隔（毫秒）
    pub max_delay_ms: u64,
}

impl CrawlSettings {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头模式
    pub headless: bool,
    /// 远程调试地址，设置后连接已有浏览器而不是启动新实例
    pub remote_debugging_url: Option<String>,
    /// CDP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 随机选用的 User-Agent 列表
    pub user_agents: Vec<String>,
    /// 登录后导出的 Cookie 文件 (JSON 列表)，打开会话时写入浏览器
    #[serde(default)]
    pub cookie_file: Option<String>,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储后端 (sqlite, csv)
    pub backend: String,
    /// SQLite 连接地址
    pub database_url: String,
    /// CSV 输出目录
    pub csv_dir: String,
    /// 目标表名
    pub table: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
}

/// 代理配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ProxySettings {
    /// 单个代理地址 (host:port)
    pub address: Option<String>,
    /// 代理列表文件，每行一个 host:port
    pub pool_file: Option<String>,
    /// 代理可用性检测地址
    pub check_url: String,
    /// 代理检测超时（秒）
    pub check_timeout_secs: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `ZPCRAWL__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("ZPCRAWL").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅包含默认值的配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Crawl defaults
            .set_default("crawl.keyword", "unity")?
            .set_default("crawl.city", "101020100")?
            .set_default("crawl.search_url", "https://www.zhipin.com/web/geek/job")?
            .set_default("crawl.listen_path", "wapi/zpgeek/search/joblist.json")?
            .set_default("crawl.response_timeout_secs", 10)?
            .set_default("crawl.min_delay_ms", 4000)?
            .set_default("crawl.max_delay_ms", 8000)?
            // Browser defaults
            .set_default("browser.headless", true)?
            .set_default("browser.request_timeout_secs", 30)?
            .set_default(
                "browser.user_agents",
                vec![
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
                    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
                    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
                ],
            )?
            // Storage defaults
            .set_default("storage.backend", "sqlite")?
            .set_default("storage.database_url", "sqlite://job_database.db")?
            .set_default("storage.csv_dir", "./data")?
            .set_default("storage.table", "jobs")?
            .set_default("storage.max_connections", 1)?
            // Proxy defaults
            .set_default("proxy.check_url", "http://httpbin.org/ip")?
            .set_default("proxy.check_timeout_secs", 5)
    }
}
