// src/timefmt.rs
use chrono::{DateTime, SecondsFormat, Utc};

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// `2026-01-13T12:34:56Z` (sub-second precision dropped).
pub fn isoformat_z(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a GitHub API timestamp such as `2026-01-13T12:34:56Z`.
/// Offsets other than `Z` are accepted and normalized to UTC.
pub fn parse_github_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Calendar date of `ts` in UTC, `YYYY-MM-DD`.
pub fn run_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}
