// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod crawl_csv_test;
pub mod crawl_sqlite_test;
pub mod proxy_rotation_test;
