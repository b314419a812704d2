// src/summary.rs
//! Windowed filtering and tallying of public events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::ingest::GithubEvent;
use crate::timefmt::parse_github_timestamp;

/// Event types admitted when no explicit include list is configured.
pub const DEFAULT_PUBLIC_EVENT_TYPES: [&str; 7] = [
    "PushEvent",
    "PullRequestEvent",
    "PullRequestReviewEvent",
    "IssuesEvent",
    "IssueCommentEvent",
    "ReleaseEvent",
    "CreateEvent",
];

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Window {
    /// The `hours` leading up to and including `to`.
    pub fn ending_at(to: DateTime<Utc>, hours: u32) -> Self {
        Self {
            from: to - chrono::Duration::hours(i64::from(hours)),
            to,
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from <= ts && ts <= self.to
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilters {
    pub include_repos: BTreeSet<String>,
    pub exclude_repos: BTreeSet<String>,
    pub include_types: BTreeSet<String>,
    pub exclude_types: BTreeSet<String>,
}

impl EventFilters {
    fn admits_type(&self, kind: &str) -> bool {
        if self.exclude_types.contains(kind) {
            return false;
        }
        if self.include_types.is_empty() {
            DEFAULT_PUBLIC_EVENT_TYPES.contains(&kind)
        } else {
            self.include_types.contains(kind)
        }
    }

    fn admits_repo(&self, repo: &str) -> bool {
        !repo.is_empty()
            && !self.exclude_repos.contains(repo)
            && (self.include_repos.is_empty() || self.include_repos.contains(repo))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoTally {
    pub repo: String,
    pub events: u64,
    pub url: String,
}

impl RepoTally {
    fn new(repo: &str, events: u64) -> Self {
        Self {
            repo: repo.to_string(),
            events,
            url: format!("https://github.com/{repo}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub counts_by_type: BTreeMap<String, u64>,
    /// Most active first; equal counts ordered by lowercased name.
    pub ranked_repos: Vec<RepoTally>,
}

impl Summary {
    pub fn total_events(&self) -> u64 {
        self.counts_by_type.values().sum()
    }
}

pub fn summarize(events: &[GithubEvent], window: &Window, filters: &EventFilters) -> Summary {
    let mut counts_by_type: BTreeMap<String, u64> = BTreeMap::new();
    let mut counts_by_repo: HashMap<&str, u64> = HashMap::new();

    for ev in events {
        let Some(created) = ev.created_at.as_deref().and_then(parse_github_timestamp) else {
            continue;
        };
        if !window.contains(created) {
            continue;
        }

        let Some(kind) = ev.kind.as_deref() else {
            continue;
        };
        if !filters.admits_type(kind) {
            continue;
        }

        let Some(repo) = ev.repo_name.as_deref() else {
            continue;
        };
        if !filters.admits_repo(repo) {
            continue;
        }

        *counts_by_type.entry(kind.to_string()).or_default() += 1;
        *counts_by_repo.entry(repo).or_default() += 1;
    }

    let mut ranked_repos: Vec<RepoTally> = counts_by_repo
        .into_iter()
        .map(|(repo, n)| RepoTally::new(repo, n))
        .collect();
    // Lowercase ties fall back to the exact name so the order is total.
    ranked_repos.sort_by(|a, b| {
        b.events
            .cmp(&a.events)
            .then_with(|| a.repo.to_lowercase().cmp(&b.repo.to_lowercase()))
            .then_with(|| a.repo.cmp(&b.repo))
    });

    Summary {
        counts_by_type,
        ranked_repos,
    }
}
