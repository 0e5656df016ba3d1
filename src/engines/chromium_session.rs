// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::domain::models::proxy::ProxyDescriptor;
use crate::engines::traits::{PageSession, SessionError, SessionFactory};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chromiumoxide::cdp::browser_protocol::network::{
    CookieParam, EventLoadingFailed, EventLoadingFinished, EventResponseReceived,
    GetResponseBodyParams, RequestId, SetCookiesParams,
};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::stream;
use std::pin::Pin;
use futures::{FutureExt, Stream, StreamExt};
use rand::seq::IndexedRandom;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 隐藏常见自动化特征的脚本，在每个新文档加载前执行
const STEALTH_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {get: () => undefined});
    window.chrome = {runtime: {}};
"#;

/// Chromium 会话工厂
///
/// 每次 `open` 启动（或连接）一个独立的浏览器实例，
/// 代理通过 `--proxy-server` 启动参数生效，因此切换代理必须重建会话。
pub struct ChromiumSessionFactory {
    settings: BrowserSettings,
}

impl ChromiumSessionFactory {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn pick_user_agent(&self) -> Option<&str> {
        self.settings
            .user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
    }

    fn build_config(&self, proxy: Option<&ProxyDescriptor>) -> Result<BrowserConfig, SessionError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(self.settings.request_timeout_secs))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled");

        if !self.settings.headless {
            builder = builder.with_head();
        }

        if let Some(ua) = self.pick_user_agent() {
            builder = builder.arg(format!("--user-agent={}", ua));
        }

        if let Some(proxy) = proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy.server_url()));
        }

        builder.build().map_err(SessionError::Launch)
    }
}

#[async_trait]
impl SessionFactory for ChromiumSessionFactory {
    type Session = ChromiumSession;

    async fn open(&self, proxy: Option<&ProxyDescriptor>) -> Result<ChromiumSession, SessionError> {
        let (browser, mut handler) = match (&self.settings.remote_debugging_url, proxy) {
            (Some(url), None) => {
                tracing::info!("Connecting to remote Chrome instance at: {}", url);
                Browser::connect(url)
                    .await
                    .map_err(|e| SessionError::Launch(format!("Failed to connect to remote Chrome: {}", e)))?
            }
            (Some(_), Some(proxy)) => {
                // A remote browser was started with its own flags; the proxy cannot be applied to it.
                tracing::warn!(%proxy, "Ignoring remote debugging url because a proxy was requested");
                Browser::launch(self.build_config(Some(proxy))?)
                    .await
                    .map_err(|e| SessionError::Launch(e.to_string()))?
            }
            (None, proxy) => Browser::launch(self.build_config(proxy)?)
                .await
                .map_err(|e| SessionError::Launch(e.to_string()))?,
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(SessionError::Launch(e.to_string()));
            }
        };

        if let Err(e) = page
            .evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_SCRIPT))
            .await
        {
            tracing::warn!("Failed to install stealth script: {}", e);
        }

        if let Some(path) = &self.settings.cookie_file {
            let cookies = load_cookie_file(path).await;
            if !cookies.is_empty() {
                let count = cookies.len();
                match page.execute(SetCookiesParams::new(cookies)).await {
                    Ok(_) => tracing::info!(count, path = %path, "Login cookies applied"),
                    Err(e) => tracing::warn!(path = %path, error = %e, "Failed to apply login cookies"),
                }
            }
        }

        tracing::debug!(proxy = ?proxy.map(ToString::to_string), "Chromium session opened");

        Ok(ChromiumSession {
            browser,
            page,
            handler_task,
            listeners: None,
            closed: false,
        })
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// 登录导出的 Cookie 条目，多余字段忽略
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCookie {
    name: String,
    value: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    secure: Option<bool>,
    #[serde(default)]
    http_only: Option<bool>,
}

/// 解析 JSON 格式的 Cookie 列表，没有 domain 的条目被跳过
fn parse_cookies(text: &str) -> Result<Vec<CookieParam>, serde_json::Error> {
    let stored: Vec<StoredCookie> = serde_json::from_str(text)?;
    Ok(stored
        .into_iter()
        .filter(|c| c.domain.as_deref().is_some_and(|d| !d.is_empty()))
        .map(|c| {
            let mut cookie = CookieParam::new(c.name, c.value);
            cookie.domain = c.domain;
            cookie.path = c.path;
            cookie.secure = c.secure;
            cookie.http_only = c.http_only;
            cookie
        })
        .collect())
}

/// 读取 Cookie 文件，文件缺失或格式错误时记录警告并返回空列表
async fn load_cookie_file(path: &str) -> Vec<CookieParam> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path, error = %e, "Cookie file unavailable, continuing without login");
            return Vec::new();
        }
    };
    match parse_cookies(&text) {
        Ok(cookies) => cookies,
        Err(e) => {
            tracing::warn!(path, error = %e, "Cookie file is not a valid cookie list");
            Vec::new()
        }
    }
}

/// 截获的响应头事件
#[derive(Debug, Clone, PartialEq)]
struct Intercepted {
    request_id: String,
    url: String,
}

/// 请求加载结束事件
#[derive(Debug, Clone, PartialEq)]
enum LoadEvent {
    Finished(String),
    Failed { request_id: String, error: String },
}

/// 网络事件订阅
struct Listeners {
    responses: Pin<Box<dyn Stream<Item = Intercepted> + Send + Sync>>,
    loads: Pin<Box<dyn Stream<Item = LoadEvent> + Send + Sync>>,
}

impl Listeners {
    /// 丢弃已缓冲的事件
    fn drain(&mut self) -> usize {
        drain_ready(&mut self.responses) + drain_ready(&mut self.loads)
    }
}

/// 取出流中所有已就绪的元素，不等待
fn drain_ready<S: Stream + Unpin>(stream: &mut S) -> usize {
    let mut dropped = 0;
    while let Some(Some(_)) = stream.next().now_or_never() {
        dropped += 1;
    }
    dropped
}

async fn next_matching<S>(responses: &mut S, path_substring: &str) -> Option<Intercepted>
where
    S: Stream<Item = Intercepted> + Unpin,
{
    while let Some(response) = responses.next().await {
        if response.url.contains(path_substring) {
            return Some(response);
        }
    }
    None
}

/// 等待指定请求的响应体加载完成
async fn wait_loaded<S>(loads: &mut S, request_id: &str) -> Result<(), SessionError>
where
    S: Stream<Item = LoadEvent> + Unpin,
{
    while let Some(event) = loads.next().await {
        match event {
            LoadEvent::Finished(id) if id == request_id => return Ok(()),
            LoadEvent::Failed { request_id: id, error } if id == request_id => {
                return Err(SessionError::Body(error))
            }
            _ => {}
        }
    }
    Err(SessionError::Closed)
}

/// 基于 chromiumoxide 的页面会话
///
/// 通过订阅 `Network.responseReceived` 截获职位列表接口的响应，
/// 等到同一请求的 `Network.loadingFinished` 后再用 `Network.getResponseBody` 读取响应体。
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    listeners: Option<Listeners>,
    closed: bool,
}

impl ChromiumSession {
    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    async fn read_body(&self, request_id: &str) -> Result<String, SessionError> {
        let body = self
            .page
            .execute(GetResponseBodyParams::new(RequestId::new(request_id)))
            .await
            .map_err(|e| SessionError::Body(e.to_string()))?;

        if body.result.base64_encoded {
            let bytes = BASE64
                .decode(body.result.body.as_bytes())
                .map_err(|e| SessionError::Body(e.to_string()))?;
            String::from_utf8(bytes).map_err(|e| SessionError::Body(e.to_string()))
        } else {
            Ok(body.result.body.clone())
        }
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn listen(&mut self, path_substring: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        let responses = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?
            .map(|event| Intercepted {
                request_id: event.request_id.inner().clone(),
                url: event.response.url.clone(),
            });
        let finished = self
            .page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?
            .map(|event| LoadEvent::Finished(event.request_id.inner().clone()));
        let failed = self
            .page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?
            .map(|event| LoadEvent::Failed {
                request_id: event.request_id.inner().clone(),
                error: event.error_text.clone(),
            });

        self.listeners = Some(Listeners {
            responses: Box::pin(responses),
            loads: Box::pin(stream::select(finished, failed)),
        });
        tracing::debug!(path = path_substring, "Response listener registered");
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        // 上一页残留的响应不能算作本页
        if let Some(listeners) = self.listeners.as_mut() {
            let dropped = listeners.drain();
            if dropped > 0 {
                tracing::debug!(dropped, "Discarded buffered network events");
            }
        }
        self.page
            .goto(url)
            .await
            .map_err(|e| SessionError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn wait_for_response(
        &mut self,
        path_substring: &str,
        timeout: Duration,
    ) -> Result<Value, SessionError> {
        self.ensure_open()?;
        let listeners = self.listeners.as_mut().ok_or(SessionError::NotListening)?;
        let deadline = tokio::time::Instant::now() + timeout;

        let matched = tokio::time::timeout_at(
            deadline,
            next_matching(&mut listeners.responses, path_substring),
        )
        .await
        .map_err(|_| SessionError::Timeout)?
        .ok_or(SessionError::Closed)?;

        tokio::time::timeout_at(deadline, wait_loaded(&mut listeners.loads, &matched.request_id))
            .await
            .map_err(|_| SessionError::Timeout)??;

        let text = self.read_body(&matched.request_id).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn quit(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.listeners = None;

        let result = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();

        result
            .map(|_| ())
            .map_err(|e| SessionError::Launch(format!("Failed to close browser: {}", e)))
    }
}
