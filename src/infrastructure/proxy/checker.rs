// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::proxy::ProxyDescriptor;
use async_trait::async_trait;
use std::time::Duration;

/// 代理可用性检测特质
#[async_trait]
pub trait ProxyProbe: Send + Sync {
    async fn is_healthy(&self, proxy: &ProxyDescriptor) -> bool;
}

/// 基于 HTTP 请求的代理检测器
///
/// 经由代理请求检测地址，在超时时间内返回 2xx 即视为可用
pub struct ProxyChecker {
    check_url: String,
    timeout: Duration,
}

impl ProxyChecker {
    pub fn new(check_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            check_url: check_url.into(),
            timeout,
        }
    }

    fn client(&self, proxy: &ProxyDescriptor) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .proxy(reqwest::Proxy::all(proxy.server_url())?)
            .timeout(self.timeout)
            .build()
    }
}

impl Default for ProxyChecker {
    fn default() -> Self {
        Self::new("http://httpbin.org/ip", Duration::from_secs(5))
    }
}

#[async_trait]
impl ProxyProbe for ProxyChecker {
    async fn is_healthy(&self, proxy: &ProxyDescriptor) -> bool {
        let client = match self.client(proxy) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(%proxy, "Failed to build proxy client: {}", e);
                return false;
            }
        };

        match client.get(&self.check_url).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(%proxy, "Proxy is healthy");
                true
            }
            Ok(resp) => {
                tracing::warn!(%proxy, status = %resp.status(), "Proxy check returned non-success status");
                false
            }
            Err(e) => {
                tracing::warn!(%proxy, "Proxy check failed: {}", e);
                false
            }
        }
    }
}
