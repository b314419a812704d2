// src/ingest/mod.rs
pub mod github;
pub mod types;

pub use github::GithubEventsProvider;
pub use types::{EventSource, FetchError, GithubEvent};

/// Fetch once; on any failure return no events plus a one-line warning.
pub async fn fetch_or_warn(source: &dyn EventSource) -> (Vec<GithubEvent>, Option<String>) {
    match source.fetch_events().await {
        Ok(events) => {
            tracing::info!(provider = source.name(), count = events.len(), "events fetched");
            (events, None)
        }
        Err(e) => (
            Vec::new(),
            Some(format!("GitHub events fetch failed: {}", e.kind())),
        ),
    }
}
