// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供职位仓库接口的 SQLite 与 CSV 实现
pub mod csv_job_repo;
pub mod sqlite_job_repo;
