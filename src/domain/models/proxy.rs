// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 代理地址解析错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProxyParseError {
    #[error("代理地址缺少端口: {0}")]
    MissingPort(String),
    #[error("代理主机为空: {0}")]
    EmptyHost(String),
    #[error("代理端口非法: {0}")]
    InvalidPort(String),
}

/// 代理描述符 (host:port)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyDescriptor {
    pub host: String,
    pub port: u16,
}

impl ProxyDescriptor {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// 浏览器 `--proxy-server` 与 HTTP 客户端使用的代理地址
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl FromStr for ProxyDescriptor {
    type Err = ProxyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix("http://")
            .unwrap_or(trimmed)
            .trim_end_matches('/');

        let (host, port) = trimmed
            .rsplit_once(':')
            .ok_or_else(|| ProxyParseError::MissingPort(s.to_string()))?;

        if host.trim().is_empty() {
            return Err(ProxyParseError::EmptyHost(s.to_string()));
        }

        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ProxyParseError::InvalidPort(s.to_string()))?;
        if port == 0 {
            return Err(ProxyParseError::InvalidPort(s.to_string()));
        }

        Ok(Self::new(host.trim(), port))
    }
}

impl fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
