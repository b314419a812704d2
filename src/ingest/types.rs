// src/ingest/types.rs
use serde_json::Value;
use thiserror::Error;

/// One record of the public events feed. Fields the API sends with an
/// unexpected type are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct GithubEvent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub created_at: Option<String>,
    pub repo_name: Option<String>,
}

impl GithubEvent {
    pub fn new(kind: &str, created_at: &str, repo_name: &str) -> Self {
        Self {
            kind: Some(kind.to_string()),
            created_at: Some(created_at.to_string()),
            repo_name: Some(repo_name.to_string()),
        }
    }

    /// Lenient projection of a raw API object; `None` for non-objects.
    pub fn from_value(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            kind: text("type"),
            created_at: text("created_at"),
            repo_name: obj
                .get("repo")
                .and_then(|r| r.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("response is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected GitHub API response (expected an array)")]
    UnexpectedResponse,
}

impl FetchError {
    /// Short stable name recorded in pulse warnings (no message, no trace).
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(e) if e.is_timeout() => "Timeout",
            FetchError::Transport(_) => "Transport",
            FetchError::Status(_) => "Status",
            FetchError::Decode(_) => "Decode",
            FetchError::UnexpectedResponse => "UnexpectedResponse",
        }
    }
}

#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self) -> Result<Vec<GithubEvent>, FetchError>;
    fn name(&self) -> &'static str;
}
