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

use crate::domain::models::proxy::ProxyDescriptor;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// 页面会话错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    /// 浏览器启动或连接失败
    #[error("Launch failed: {0}")]
    Launch(String),
    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 等待响应超时
    #[error("Timeout")]
    Timeout,
    /// 会话已关闭
    #[error("Session closed")]
    Closed,
    /// 尚未建立响应监听
    #[error("No response listener registered")]
    NotListening,
    /// 读取响应体失败
    #[error("Failed to read response body: {0}")]
    Body(String),
    /// 响应体不是合法 JSON
    #[error("Response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 页面会话能力
///
/// 对浏览器或网络客户端的抽象：导航到 URL，截获指定路径的 JSON 响应，释放资源。
/// 一个会话同一时间只被一个爬取会话独占。
#[async_trait]
pub trait PageSession: Send {
    /// 注册网络拦截规则，之后所有 URL 包含 `path_substring` 的响应都会被缓冲
    async fn listen(&mut self, path_substring: &str) -> Result<(), SessionError>;

    /// 导航到目标 URL，此前缓冲但未取走的响应会被丢弃
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// 等待下一个 URL 包含 `path_substring` 的响应并解析为 JSON
    async fn wait_for_response(
        &mut self,
        path_substring: &str,
        timeout: Duration,
    ) -> Result<Value, SessionError>;

    /// 释放会话资源，重复调用必须安全
    async fn quit(&mut self) -> Result<(), SessionError>;
}

/// 页面会话工厂
///
/// 按需创建会话，切换代理时用于重建会话
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// 会话类型
    type Session: PageSession;

    /// 打开新会话，`proxy` 为空时直连
    async fn open(&self, proxy: Option<&ProxyDescriptor>) -> Result<Self::Session, SessionError>;

    /// 工厂名称
    fn name(&self) -> &'static str;
}
