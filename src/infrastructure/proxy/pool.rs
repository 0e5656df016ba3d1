// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::proxy::ProxyDescriptor;
use crate::infrastructure::proxy::checker::ProxyProbe;
use std::path::Path;

/// 代理池
///
/// 按轮询方式在多次爬取会话之间切换代理，不在单页抓取过程中切换
#[derive(Debug, Clone, Default)]
pub struct ProxyPool {
    proxies: Vec<ProxyDescriptor>,
    cursor: usize,
}

impl ProxyPool {
    pub fn new(proxies: Vec<ProxyDescriptor>) -> Self {
        Self { proxies, cursor: 0 }
    }

    /// 从文本解析代理列表，每行一个 host:port，忽略空行与 # 注释
    pub fn from_lines(text: &str) -> Self {
        let mut proxies = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.parse::<ProxyDescriptor>() {
                Ok(proxy) if !proxies.contains(&proxy) => proxies.push(proxy),
                Ok(_) => {}
                Err(e) => tracing::warn!(line = lineno + 1, "Skipping malformed proxy entry: {}", e),
            }
        }
        Self::new(proxies)
    }

    /// 从文件加载代理列表
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Ok(Self::from_lines(&text))
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// 轮询取下一个代理
    pub fn next_proxy(&mut self) -> Option<ProxyDescriptor> {
        if self.proxies.is_empty() {
            return None;
        }
        let proxy = self.proxies[self.cursor % self.proxies.len()].clone();
        self.cursor = (self.cursor + 1) % self.proxies.len();
        Some(proxy)
    }

    /// 从当前位置开始最多检测一轮，返回第一个可用代理
    pub async fn first_healthy<P: ProxyProbe + ?Sized>(&mut self, probe: &P) -> Option<ProxyDescriptor> {
        for _ in 0..self.proxies.len() {
            let proxy = self.next_proxy()?;
            if probe.is_healthy(&proxy).await {
                return Some(proxy);
            }
        }
        None
    }
}
