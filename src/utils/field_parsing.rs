// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static K_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)\s*[Kk]").unwrap());
static WAN_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)万\s*-\s*(\d+(?:\.\d+)?)").unwrap());
static YUAN_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)\s*元").unwrap());
static MONTHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*薪").unwrap());
static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

const DEFAULT_SALARY_MONTHS: u8 = 12;

/// 月薪区间（单位：千元）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min_k: f32,
    pub max_k: f32,
    /// 年薪月数，例如 "·13薪" 为 13，未标注时为 12
    pub months: u8,
}

/// 解析薪资文本
///
/// 支持 "15-25K"、"15-25K·13薪"、"1.5万-2万"、"2.2万-4"、"8000-12000元"。
/// 日薪与时薪不是月薪区间，返回 `None`。
pub fn parse_salary(raw: &str) -> Option<SalaryRange> {
    if raw.contains("元/天") || raw.contains("元/时") {
        return None;
    }

    let months = MONTHS
        .captures(raw)
        .and_then(|c| c[1].parse::<u8>().ok())
        .unwrap_or(DEFAULT_SALARY_MONTHS);

    let range = |caps: regex::Captures<'_>, scale: f32| -> Option<(f32, f32)> {
        let min = caps[1].parse::<f32>().ok()? * scale;
        let max = caps[2].parse::<f32>().ok()? * scale;
        Some((min, max))
    };

    let (min_k, max_k) = if let Some(caps) = K_RANGE.captures(raw) {
        range(caps, 1.0)?
    } else if let Some(caps) = WAN_RANGE.captures(raw) {
        range(caps, 10.0)?
    } else if let Some(caps) = YUAN_RANGE.captures(raw) {
        range(caps, 0.001)?
    } else {
        return None;
    };

    Some(SalaryRange {
        min_k,
        max_k,
        months,
    })
}

/// 解析经验要求为年数，"不限"、"无经验"、"在校"、"应届" 视为 0
pub fn parse_experience(raw: &str) -> f32 {
    if ["不限", "无经验", "在校", "应届"]
        .iter()
        .any(|kw| raw.contains(kw))
    {
        return 0.0;
    }
    FIRST_NUMBER
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// 学历等级，按要求从低到高排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    Unlimited = 0,
    JuniorCollege = 1,
    Bachelor = 2,
    Master = 3,
    Doctor = 4,
}

/// 解析学历要求，无法识别时为不限
pub fn parse_education(raw: &str) -> EducationLevel {
    const LEVELS: &[(&str, EducationLevel)] = &[
        ("不限", EducationLevel::Unlimited),
        ("大专", EducationLevel::JuniorCollege),
        ("本科", EducationLevel::Bachelor),
        ("硕士", EducationLevel::Master),
        ("博士", EducationLevel::Doctor),
    ];
    LEVELS
        .iter()
        .find(|(kw, _)| raw.contains(kw))
        .map(|(_, level)| *level)
        .unwrap_or(EducationLevel::Unlimited)
}
