// src/ingest/github.rs
use async_trait::async_trait;
use metrics::counter;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use crate::ingest::types::{EventSource, FetchError, GithubEvent};

pub const API_BASE: &str = "https://api.github.com";
pub const USER_AGENT_VALUE: &str = "kg-noroshi/1.0";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn events_url(handle: &str) -> String {
    format!("{API_BASE}/users/{handle}/events/public?per_page=100")
}

/// Parse a response body. The payload must be a JSON array; non-object
/// elements are dropped.
pub fn parse_events(body: &str) -> Result<Vec<GithubEvent>, FetchError> {
    let payload: Value = serde_json::from_str(body)?;
    let Value::Array(items) = payload else {
        return Err(FetchError::UnexpectedResponse);
    };
    Ok(items.iter().filter_map(GithubEvent::from_value).collect())
}

/// Public events of one GitHub user, either over HTTPS or from a fixture body.
pub struct GithubEventsProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        url: String,
        token: Option<String>,
        client: reqwest::Client,
    },
}

impl GithubEventsProvider {
    pub fn from_fixture(body: &str) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
        }
    }

    pub fn for_handle(handle: &str, token: Option<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            mode: Mode::Http {
                url: events_url(handle),
                token,
                client,
            },
        })
    }

    async fn fetch_http(
        client: &reqwest::Client,
        url: &str,
        token: Option<&str>,
    ) -> Result<Vec<GithubEvent>, FetchError> {
        let resp = request(client, url, token).send().await?;
        check_status(resp.status())?;
        let body = resp.text().await?;
        parse_events(&body)
    }
}

fn request(client: &reqwest::Client, url: &str, token: Option<&str>) -> reqwest::RequestBuilder {
    let req = client
        .get(url)
        .header(ACCEPT, "application/vnd.github+json")
        .header(USER_AGENT, USER_AGENT_VALUE);
    match token {
        Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
        None => req,
    }
}

/// Any non-2xx status is a failed fetch, whatever the body holds.
fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status(status))
    }
}

#[async_trait]
impl EventSource for GithubEventsProvider {
    async fn fetch_events(&self) -> Result<Vec<GithubEvent>, FetchError> {
        let res = match &self.mode {
            Mode::Fixture(body) => parse_events(body),
            Mode::Http { url, token, client } => {
                Self::fetch_http(client, url, token.as_deref()).await
            }
        };
        match &res {
            Ok(events) => {
                counter!("pulse_events_fetched_total").increment(events.len() as u64);
            }
            Err(e) => {
                tracing::warn!(error = %e, provider = self.name(), "events fetch failed");
                counter!("pulse_fetch_errors_total").increment(1);
            }
        }
        res
    }

    fn name(&self) -> &'static str {
        "GitHub"
    }
}
