// src/guard.rs
//! Privacy/content guard over the published site tree.
//!
//! Rules, applied to every existing guarded file:
//! - no image markup (`<img`, `data:image`), case-insensitive;
//! - no email addresses outside the allowlist, and no `mailto:` links;
//! - `.json` files must parse.

use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::layout::SiteLayout;

fn email_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("email pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    ImageMarkup,
    EmailAddress(String),
    MailtoLink,
    InvalidJson(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.path.display();
        match &self.kind {
            ViolationKind::ImageMarkup => write!(f, "{p}: contains image markup (disallowed)"),
            ViolationKind::EmailAddress(addr) => write!(f, "{p}: contains email address: {addr}"),
            ViolationKind::MailtoLink => write!(f, "{p}: contains mailto: link"),
            ViolationKind::InvalidJson(msg) => write!(f, "{p}: invalid JSON ({msg})"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Guard {
    /// Addresses that may appear publicly. Empty unless a public contact is
    /// deliberately added.
    pub allowed_emails: BTreeSet<String>,
}

impl Guard {
    pub fn with_allowed_emails<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    /// Apply all rules to one file's text. JSON validity is checked only
    /// when `path` has a `.json` extension.
    pub fn check_text(&self, path: &Path, text: &str) -> Vec<Violation> {
        let mut out = Vec::new();
        let mut push = |kind: ViolationKind| {
            out.push(Violation {
                path: path.to_path_buf(),
                kind,
            })
        };

        let lowered = text.to_lowercase();
        if lowered.contains("<img") || lowered.contains("data:image") {
            push(ViolationKind::ImageMarkup);
        }

        for m in email_re().find_iter(text) {
            if !self.allowed_emails.contains(m.as_str()) {
                push(ViolationKind::EmailAddress(m.as_str().to_string()));
            }
        }
        if lowered.contains("mailto:") {
            push(ViolationKind::MailtoLink);
        }

        if is_json_path(path) {
            if let Err(e) = serde_json::from_str::<serde_json::Value>(text) {
                push(ViolationKind::InvalidJson(e.to_string()));
            }
        }

        out
    }

    /// Scan `paths` in order. Missing files are skipped.
    pub fn check_paths(&self, paths: &[PathBuf]) -> Vec<Violation> {
        let mut violations = Vec::new();
        for path in paths {
            let Some(text) = read_text_lossy(path) else {
                continue;
            };
            violations.extend(self.check_text(path, &text));
        }
        counter!("guard_violations_total").increment(violations.len() as u64);
        violations
    }

    /// Scan the fixed site files plus the dated pulse named by `latest.json`.
    pub fn check_site(&self, layout: &SiteLayout) -> Vec<Violation> {
        let mut paths = layout.guarded_files();
        paths.extend(derived_daily_paths(layout));
        tracing::debug!(files = paths.len(), "guard scanning site");
        self.check_paths(&paths)
    }
}

pub const EXIT_PASSED: u8 = 0;
pub const EXIT_FAILED: u8 = 1;

/// Print the guard verdict to `out` and return the process exit status.
pub fn report<W: Write>(violations: &[Violation], out: &mut W) -> io::Result<u8> {
    if violations.is_empty() {
        writeln!(out, "Privacy/content guard passed.")?;
        return Ok(EXIT_PASSED);
    }

    tracing::warn!(count = violations.len(), "privacy/content guard failed");
    writeln!(out, "Privacy/content guard failed:")?;
    for v in violations {
        writeln!(out, "- {v}")?;
    }
    Ok(EXIT_FAILED)
}

fn is_json_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// File contents with undecodable bytes replaced; `None` if it cannot be read.
pub fn read_text_lossy(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Dated pulse files for the day in `latest.json`'s `generated_at`. Empty if
/// the file is missing or unusable; its validity is reported by the JSON rule.
pub fn derived_daily_paths(layout: &SiteLayout) -> Vec<PathBuf> {
    let Some(text) = read_text_lossy(&layout.latest_json()) else {
        return Vec::new();
    };
    let Ok(latest) = serde_json::from_str::<serde_json::Value>(&text) else {
        return Vec::new();
    };
    let Some(day) = latest
        .get("generated_at")
        .and_then(|v| v.as_str())
        .and_then(|s| s.get(..10))
    else {
        return Vec::new();
    };
    vec![layout.daily_json(day), layout.daily_md(day)]
}
