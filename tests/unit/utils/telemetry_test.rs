// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use zpcrawl::utils::telemetry;

#[test]
fn test_telemetry_initialization() {
    // 全局订阅器只能初始化一次，本测试二进制中只在这里调用
    telemetry::init_telemetry(false);

    tracing::info!(page = 1, fetched = 30, added = 30, total = 30, "Page processed");
    tracing::warn!(table = "jobs", "No jobs collected, nothing to save");
}
