// src/profile.rs
//! `.well-known/aieo.json`: machine-readable profile, merged on every run.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Identity;
use crate::layout::rel;
use crate::output::take_string;

pub const PROFILE_SCHEMA_VERSION: &str = "1.0";
pub const PROFILE_TYPE: &str = "aieo.profile";

/// Keys that are only defaulted keep whatever value they already hold, of
/// any type; `evidence` and `noroshi` are only extended when they are objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AieoProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    pub handle: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noroshi: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_urls: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Absolute URLs recorded when the site base URL is known.
#[derive(Debug, Clone)]
pub struct ResolvedUrls<'a> {
    pub site_url: &'a str,
    pub daily_json: &'a str,
    pub daily_md: &'a str,
}

impl AieoProfile {
    /// Boundary parse. Unknown keys are preserved.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            schema_version: map.remove("schema_version"),
            kind: map.remove("type"),
            handle: take_string(&mut map, "handle").unwrap_or_default(),
            updated_at: take_string(&mut map, "updated_at").unwrap_or_default(),
            evidence: map.remove("evidence"),
            noroshi: map.remove("noroshi"),
            site_url: map.remove("site_url"),
            resolved_urls: map.remove("resolved_urls"),
            extra: map,
        }
    }

    pub fn refresh(
        &mut self,
        identity: &Identity,
        updated_at: &str,
        urls: Option<ResolvedUrls<'_>>,
    ) {
        self.schema_version
            .get_or_insert_with(|| Value::from(PROFILE_SCHEMA_VERSION));
        self.kind.get_or_insert_with(|| Value::from(PROFILE_TYPE));
        self.handle = identity.display_handle.to_string();
        self.updated_at = updated_at.to_string();

        if let Value::Object(evidence) = self.evidence.get_or_insert_with(empty_object) {
            evidence
                .entry("github")
                .or_insert_with(|| Value::from(identity.github_profile_url));
            evidence
                .entry("kaggle")
                .or_insert_with(|| Value::from(identity.kaggle_profile_url));
        }

        if let Value::Object(noroshi) = self.noroshi.get_or_insert_with(empty_object) {
            for (key, path) in [
                ("latest", rel::LATEST_JSON),
                ("json_feed", rel::FEED_JSON),
                ("rss", rel::RSS_XML),
                ("pulse", "daily"),
            ] {
                noroshi.insert(key.to_string(), Value::from(path));
            }
        }

        if let Some(urls) = urls {
            let site = urls.site_url;
            self.site_url = Some(Value::from(site));
            let resolved: Map<String, Value> = [
                ("daily_json", urls.daily_json.to_string()),
                ("daily_md", urls.daily_md.to_string()),
                ("latest_json", format!("{site}/{}", rel::LATEST_JSON)),
                ("facts", format!("{site}/facts/")),
                ("clarifications", format!("{site}/clarifications/")),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();
            self.resolved_urls = Some(Value::Object(resolved));
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
