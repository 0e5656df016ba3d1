// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 代理模块
///
/// 代理列表加载、轮换与可用性检测
pub mod checker;
pub mod pool;

pub use checker::{ProxyChecker, ProxyProbe};
pub use pool::ProxyPool;
