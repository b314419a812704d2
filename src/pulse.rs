// src/pulse.rs
//! The daily pulse document and its Markdown view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Identity;
use crate::summary::{RepoTally, Summary, Window};
use crate::timefmt::isoformat_z;

pub const SCHEMA_VERSION: &str = "1.0";
pub const PULSE_KIND: &str = "noroshi.pulse";
pub const GENERATOR: &str = "noroshi";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PulseWindow {
    pub hours: u32,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivacyFlags {
    pub public_only: bool,
    pub no_face_photo: bool,
    pub no_age: bool,
    pub no_education_history: bool,
}

impl Default for PrivacyFlags {
    fn default() -> Self {
        Self {
            public_only: true,
            no_face_photo: true,
            no_age: true,
            no_education_history: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub generator: String,
    pub github_sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pulse {
    pub schema_version: String,
    pub kind: String,
    pub generated_at: String,
    pub window: PulseWindow,
    pub summary: String,
    pub counts: BTreeMap<String, u64>,
    pub repos: Vec<RepoTally>,
    pub evidence: Vec<EvidenceLink>,
    pub privacy: PrivacyFlags,
    pub provenance: Provenance,
    pub warnings: Vec<String>,
}

/// Everything a pulse is built from, besides the summary itself.
#[derive(Debug, Clone)]
pub struct PulseInputs<'a> {
    pub now: DateTime<Utc>,
    pub window: Window,
    pub window_hours: u32,
    pub max_top_repos: usize,
    pub identity: &'a Identity,
    pub github_sha: Option<&'a str>,
    pub warnings: Vec<String>,
}

pub fn summary_line(total_events: u64, repo_count: usize, window_hours: u32) -> String {
    if total_events > 0 {
        format!(
            "Public GitHub activity (last {window_hours}h): {total_events} events across {repo_count} repos."
        )
    } else {
        format!("No qualifying public GitHub activity in the last {window_hours}h. Pulse kept alive.")
    }
}

impl Pulse {
    pub fn build(summary: Summary, inputs: PulseInputs<'_>) -> Self {
        let line = summary_line(
            summary.total_events(),
            summary.ranked_repos.len(),
            inputs.window_hours,
        );
        let mut repos = summary.ranked_repos;
        repos.truncate(inputs.max_top_repos);

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            kind: PULSE_KIND.to_string(),
            generated_at: isoformat_z(inputs.now),
            window: PulseWindow {
                hours: inputs.window_hours,
                from: isoformat_z(inputs.window.from),
                to: isoformat_z(inputs.window.to),
            },
            summary: line,
            counts: summary.counts_by_type,
            repos,
            evidence: vec![
                EvidenceLink {
                    label: "GitHub profile".into(),
                    url: inputs.identity.github_profile_url.into(),
                },
                EvidenceLink {
                    label: "Kaggle profile".into(),
                    url: inputs.identity.kaggle_profile_url.into(),
                },
            ],
            privacy: PrivacyFlags::default(),
            provenance: Provenance {
                generator: GENERATOR.to_string(),
                github_sha: inputs.github_sha.unwrap_or_default().to_string(),
            },
            warnings: inputs.warnings,
        }
    }

    /// `YYYY-MM-DD` of `generated_at`.
    pub fn day(&self) -> &str {
        self.generated_at.get(..10).unwrap_or(&self.generated_at)
    }

    pub fn to_markdown(&self) -> String {
        let mut lines: Vec<String> = vec![
            format!("# NOROSHI — {}", self.day()),
            String::new(),
            self.summary.clone(),
            String::new(),
            format!("Window: {} → {}", self.window.from, self.window.to),
            String::new(),
            "## Evidence".into(),
        ];
        lines.extend(self.evidence.iter().map(|e| format!("- {}", e.url)));
        lines.push(String::new());
        lines.push("## Top repos (by public activity)".into());
        lines.extend(self.repos.iter().map(|r| format!("- {} ({})", r.repo, r.events)));

        if !self.warnings.is_empty() {
            lines.push(String::new());
            lines.push("## Warnings".into());
            lines.extend(self.warnings.iter().map(|w| format!("- {w}")));
        }

        lines.push(String::new());
        lines.push(
            "Privacy-by-design: no face photo, age, or education history is published.".into(),
        );
        lines.push(String::new());
        lines.join("\n")
    }
}
