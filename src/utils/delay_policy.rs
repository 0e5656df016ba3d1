// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

/// 翻页间隔策略
///
/// 把页码映射为翻页前的等待时间。间隔是模拟人工翻页的建议性延迟，
/// 不是硬性调度器；测试中使用 [`PageDelayPolicy::none`] 以零延迟运行。
#[derive(Clone)]
pub enum PageDelayPolicy {
    /// 不等待
    None,
    /// 固定间隔
    Fixed(Duration),
    /// 在 [min, max] 区间内均匀随机
    Uniform { min: Duration, max: Duration },
    /// 自定义函数
    Custom(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl Default for PageDelayPolicy {
    fn default() -> Self {
        Self::Uniform {
            min: Duration::from_secs(4),
            max: Duration::from_secs(8),
        }
    }
}

impl std::fmt::Debug for PageDelayPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            Self::Uniform { min, max } => f
                .debug_struct("Uniform")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl PageDelayPolicy {
    /// 零延迟
    pub fn none() -> Self {
        Self::None
    }

    /// 固定间隔
    pub fn fixed(delay: Duration) -> Self {
        Self::Fixed(delay)
    }

    /// 随机间隔，min 大于 max 时两者互换
    pub fn uniform(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self::Uniform { min, max }
        } else {
            Self::Uniform { min: max, max: min }
        }
    }

    /// 从毫秒配置构建
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        match (min_ms, max_ms) {
            (0, 0) => Self::None,
            (min, max) if min == max => Self::Fixed(Duration::from_millis(min)),
            (min, max) => Self::uniform(Duration::from_millis(min), Duration::from_millis(max)),
        }
    }

    /// 自定义页码到间隔的映射
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// 抓取第 `page` 页之前应等待的时间，第一页不等待
    pub fn delay_for(&self, page: u32) -> Duration {
        if page <= 1 {
            return Duration::ZERO;
        }
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Uniform { min, max } => {
                // 直接构造的变体可能上下界颠倒
                let (lo, hi) = ((*min).min(*max), (*min).max(*max));
                if lo == hi {
                    return lo;
                }
                let secs = rand::random_range(lo.as_secs_f64()..=hi.as_secs_f64());
                Duration::from_secs_f64(secs)
            }
            Self::Custom(f) => f(page),
        }
    }
}
