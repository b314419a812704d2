// src/config.rs
//! Pulse configuration (`noroshi/config.json`) and the process environment.
//!
//! Every field has a default; values that are missing, mistyped or out of
//! range fall back to it instead of failing the run.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;

use crate::output::read_json_object;

pub const DEFAULT_HANDLE: &str = "KG-NINJA";
pub const DEFAULT_WINDOW_HOURS: u32 = 24;
pub const MAX_WINDOW_HOURS: u32 = 168;
pub const DEFAULT_MAX_TOP_REPOS: usize = 12;
pub const MAX_TOP_REPOS_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseConfig {
    pub github_handle: String,
    pub window_hours: u32,
    pub max_top_repos: usize,
    pub include_repos: BTreeSet<String>,
    pub exclude_repos: BTreeSet<String>,
    pub include_event_types: BTreeSet<String>,
    pub exclude_event_types: BTreeSet<String>,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            github_handle: DEFAULT_HANDLE.to_string(),
            window_hours: DEFAULT_WINDOW_HOURS,
            max_top_repos: DEFAULT_MAX_TOP_REPOS,
            include_repos: BTreeSet::new(),
            exclude_repos: BTreeSet::new(),
            include_event_types: BTreeSet::new(),
            exclude_event_types: BTreeSet::new(),
        }
    }
}

impl PulseConfig {
    /// Load from `path`. Missing or malformed files yield the defaults.
    pub fn load_from(path: &Path) -> Self {
        let raw = read_json_object(path);
        let cfg = Self::from_map(&raw);
        tracing::info!(
            path = %path.display(),
            handle = %cfg.github_handle,
            window_hours = cfg.window_hours,
            max_top_repos = cfg.max_top_repos,
            "pulse config loaded"
        );
        cfg
    }

    pub fn from_map(raw: &Map<String, Value>) -> Self {
        let d = Self::default();

        let github_handle = raw
            .get("github_handle")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or(d.github_handle);

        let window_hours = raw
            .get("window_hours")
            .and_then(Value::as_u64)
            .filter(|h| (1..=MAX_WINDOW_HOURS as u64).contains(h))
            .map(|h| h as u32)
            .unwrap_or(d.window_hours);

        let max_top_repos = raw
            .get("max_top_repos")
            .and_then(Value::as_u64)
            .filter(|n| (1..=MAX_TOP_REPOS_LIMIT as u64).contains(n))
            .map(|n| n as usize)
            .unwrap_or(d.max_top_repos);

        Self {
            github_handle,
            window_hours,
            max_top_repos,
            include_repos: string_set(raw.get("include_repos")),
            exclude_repos: string_set(raw.get("exclude_repos")),
            include_event_types: string_set(raw.get("include_event_types")),
            exclude_event_types: string_set(raw.get("exclude_event_types")),
        }
    }
}

/// Trimmed, non-empty strings of a JSON array; anything else is dropped.
fn string_set(value: Option<&Value>) -> BTreeSet<String> {
    let Some(Value::Array(items)) = value else {
        return BTreeSet::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Public identity published in every pulse and profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub display_handle: &'static str,
    pub github_profile_url: &'static str,
    pub kaggle_profile_url: &'static str,
}

pub const IDENTITY: Identity = Identity {
    display_handle: "KGNINJA",
    github_profile_url: "https://github.com/KG-NINJA",
    kaggle_profile_url: "https://www.kaggle.com/kgninja",
};

impl Default for Identity {
    fn default() -> Self {
        IDENTITY
    }
}

/// Environment values read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteEnv {
    pub site_url: Option<String>,
    pub github_repository: Option<String>,
    pub github_repository_owner: Option<String>,
    pub token: Option<String>,
    pub github_sha: Option<String>,
}

impl SiteEnv {
    pub fn from_env() -> Self {
        Self {
            site_url: env_nonempty("SITE_URL"),
            github_repository: env_nonempty("GITHUB_REPOSITORY"),
            github_repository_owner: env_nonempty("GITHUB_REPOSITORY_OWNER"),
            token: env_nonempty("GITHUB_TOKEN").or_else(|| env_nonempty("GH_TOKEN")),
            github_sha: env_nonempty("GITHUB_SHA"),
        }
    }

    /// Absolute base URL of the published site, without a trailing slash.
    pub fn resolved_site_url(&self) -> Option<String> {
        resolve_site_url(
            self.site_url.as_deref(),
            self.github_repository.as_deref(),
            self.github_repository_owner.as_deref(),
        )
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// `SITE_URL` wins; otherwise derive the GitHub Pages URL from
/// `owner/repo`. A repo named `{owner}.github.io` is served at the root.
pub fn resolve_site_url(
    explicit: Option<&str>,
    repository: Option<&str>,
    owner: Option<&str>,
) -> Option<String> {
    if let Some(url) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        // An explicit value that is only slashes names no base at all.
        let base = url.trim_end_matches('/');
        return (!base.is_empty()).then(|| base.to_string());
    }

    let (repo, owner) = (repository?, owner?);
    let (_, repo_name) = repo.split_once('/')?;
    if repo_name.is_empty() || owner.is_empty() {
        return None;
    }

    if repo_name.eq_ignore_ascii_case(&format!("{owner}.github.io")) {
        Some(format!("https://{owner}.github.io"))
    } else {
        Some(format!("https://{owner}.github.io/{repo_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_config_is_all_defaults() {
        assert_eq!(PulseConfig::from_map(&Map::new()), PulseConfig::default());
    }

    #[test]
    fn out_of_range_and_mistyped_values_fall_back() {
        let cfg = PulseConfig::from_map(&map(json!({
            "github_handle": "   ",
            "window_hours": 500,
            "max_top_repos": 0,
        })));
        assert_eq!(cfg, PulseConfig::default());

        let cfg = PulseConfig::from_map(&map(json!({
            "window_hours": "24",
            "max_top_repos": 3.5,
        })));
        assert_eq!(cfg.window_hours, DEFAULT_WINDOW_HOURS);
        assert_eq!(cfg.max_top_repos, DEFAULT_MAX_TOP_REPOS);
    }

    #[test]
    fn valid_overrides_apply_and_lists_are_cleaned() {
        let cfg = PulseConfig::from_map(&map(json!({
            "github_handle": "octocat",
            "window_hours": 168,
            "max_top_repos": 50,
            "include_repos": [" a/x ", "", 7, "b/y"],
            "exclude_event_types": "PushEvent",
        })));
        assert_eq!(cfg.github_handle, "octocat");
        assert_eq!(cfg.window_hours, 168);
        assert_eq!(cfg.max_top_repos, 50);
        assert_eq!(
            cfg.include_repos.into_iter().collect::<Vec<_>>(),
            vec!["a/x".to_string(), "b/y".to_string()]
        );
        assert!(cfg.exclude_event_types.is_empty());
    }

    #[test]
    fn site_url_resolution() {
        assert_eq!(
            resolve_site_url(Some("https://example.org/"), Some("o/r"), Some("o")),
            Some("https://example.org".to_string())
        );
        assert_eq!(
            resolve_site_url(None, Some("KG-NINJA/kg-ninja.github.io"), Some("KG-NINJA")),
            Some("https://KG-NINJA.github.io".to_string())
        );
        assert_eq!(
            resolve_site_url(None, Some("octo/site"), Some("octo")),
            Some("https://octo.github.io/site".to_string())
        );
        assert_eq!(resolve_site_url(None, Some("octo/site"), None), None);
        assert_eq!(resolve_site_url(None, Some("noslash"), Some("octo")), None);
    }

    #[test]
    fn slash_only_site_url_is_not_a_base() {
        assert_eq!(resolve_site_url(Some("/"), None, None), None);
        assert_eq!(resolve_site_url(Some(" /// "), None, None), None);
        assert_eq!(
            resolve_site_url(Some("/"), Some("octo/site"), Some("octo")),
            None
        );
    }
}
