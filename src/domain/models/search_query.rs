// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

/// 常用城市及其城市代码
pub const CITY_CODES: &[(&str, &str)] = &[
    ("上海", "101020100"),
    ("北京", "101010100"),
    ("广州", "101280100"),
    ("深圳", "101280600"),
    ("杭州", "101210100"),
    ("成都", "101270100"),
];

/// 将城市名称或 9 位城市代码解析为城市代码
pub fn resolve_city(city: &str) -> Option<String> {
    let city = city.trim();
    if city.len() == 9 && city.chars().all(|c| c.is_ascii_digit()) {
        return Some(city.to_string());
    }
    CITY_CODES
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, code)| code.to_string())
}

/// 搜索页查询参数
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery<'a> {
    pub query: &'a str,
    pub city: &'a str,
    pub page: u32,
}

impl<'a> SearchQuery<'a> {
    pub fn new(query: &'a str, city: &'a str, page: u32) -> Self {
        Self { query, city, page }
    }

    /// 拼接完整的搜索页地址
    pub fn to_url(&self, base_url: &str) -> Result<String, serde_urlencoded::ser::Error> {
        let params = serde_urlencoded::to_string(self)?;
        Ok(format!("{}?{}", base_url, params))
    }
}
