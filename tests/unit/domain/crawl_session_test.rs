// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use zpcrawl::domain::models::crawl_session::{CrawlSession, CrawlState};
use zpcrawl::domain::models::job_posting::{DedupKey, JobPosting};

fn page(entries: &[(&str, &str)]) -> Vec<JobPosting> {
    entries
        .iter()
        .map(|(title, company)| JobPosting::new(*title, *company))
        .collect()
}

#[test]
fn test_absorbing_same_page_twice_is_idempotent() {
    // Given: 已合并过一页
    let mut session = CrawlSession::new("unity", "101020100");
    let jobs = page(&[("A", "X"), ("B", "Y")]);
    assert_eq!(session.absorb(jobs.clone()), 2);

    // When: 再次合并同一页
    let added = session.absorb(jobs);

    // Then: 没有新增
    assert_eq!(added, 0);
    assert_eq!(session.len(), 2);
}

#[test]
fn test_disjoint_pages_sum() {
    let mut session = CrawlSession::new("unity", "101020100");
    let pages = [
        page(&[("A", "X"), ("B", "X")]),
        page(&[("C", "Y")]),
        page(&[("D", "Z"), ("E", "Z"), ("F", "Z")]),
    ];
    let expected: usize = pages.iter().map(Vec::len).sum();

    for p in pages {
        session.absorb(p);
    }

    assert_eq!(session.len(), expected);
}

#[test]
fn test_duplicates_within_one_page_are_dropped() {
    let mut session = CrawlSession::new("unity", "101020100");
    let added = session.absorb(page(&[("A", "X"), ("A", "X"), ("A", "Y")]));

    assert_eq!(added, 2);
    let keys: Vec<DedupKey> = session.jobs().iter().map(JobPosting::dedup_key).collect();
    assert_eq!(keys, vec![DedupKey::new("A", "X"), DedupKey::new("A", "Y")]);
}

#[test]
fn test_first_occurrence_wins() {
    let mut session = CrawlSession::new("unity", "101020100");
    let mut first = JobPosting::new("A", "X");
    first.salary = "10-15K".to_string();
    let mut second = JobPosting::new("A", "X");
    second.salary = "20-30K".to_string();

    session.absorb(vec![first]);
    session.absorb(vec![second]);

    assert_eq!(session.jobs()[0].salary, "10-15K");
}

#[test]
fn test_terminal_states() {
    assert!(!CrawlState::Idle.is_terminal());
    assert!(!CrawlState::Fetching { page: 3 }.is_terminal());
    assert!(CrawlState::Exhausted { page: 3 }.is_terminal());
    assert!(CrawlState::Stalled { page: 2 }.is_terminal());
    assert!(CrawlState::PageLimit { pages: 5 }.is_terminal());
    assert!(CrawlState::Aborted {
        page: 1,
        reason: "timeout".to_string()
    }
    .is_terminal());
}
