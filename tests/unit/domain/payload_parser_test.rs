// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::json;
use zpcrawl::domain::services::payload_parser::{parse_job_list, response_code};

#[test]
fn test_entries_keep_response_order() {
    let payload = json!({"code": 0, "zpData": {"jobList": [
        {"jobName": "C", "brandName": "Z"},
        {"jobName": "A", "brandName": "X"},
        {"jobName": "B", "brandName": "Y"}
    ]}});

    let titles: Vec<String> = parse_job_list(&payload)
        .into_iter()
        .map(|j| j.position_name)
        .collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
}

#[test]
fn test_extra_fields_are_ignored() {
    let payload = json!({"zpData": {"hasMore": true, "jobList": [
        {"jobName": "A", "brandName": "X", "bossName": "王先生", "jobLabels": ["3-5年"]}
    ]}});

    let jobs = parse_job_list(&payload);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].company_name, "X");
}

#[test]
fn test_blocked_payload_has_code() {
    let payload = json!({"code": 37, "message": "您的环境存在异常", "zpData": {}});
    let (code, _) = response_code(&payload).unwrap();
    assert_eq!(code, 37);
    assert!(parse_job_list(&payload).is_empty());
}
