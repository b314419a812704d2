// src/rss.rs
//! RSS 2.0 projection of the JSON Feed.

use anyhow::{Context, Result};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime, UtcOffset};

use crate::feed::JsonFeed;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

#[derive(Debug, Serialize)]
struct Rss {
    #[serde(rename = "@version")]
    version: &'static str,
    channel: Channel,
}

#[derive(Debug, Serialize)]
struct Channel {
    title: String,
    link: String,
    description: String,
    #[serde(rename = "item")]
    item: Vec<Item>,
}

#[derive(Debug, Serialize)]
struct Item {
    guid: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    description: String,
    #[serde(rename = "pubDate", skip_serializing_if = "Option::is_none")]
    pub_date: Option<String>,
}

/// `Tue, 13 Jan 2026 12:34:56 GMT`; `None` when `ts` is not RFC 3339.
pub fn rfc822_gmt(ts: &str) -> Option<String> {
    let format = time::format_description::parse(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT",
    )
    .ok()?;
    OffsetDateTime::parse(ts.trim(), &Rfc3339)
        .ok()?
        .to_offset(UtcOffset::UTC)
        .format(&format)
        .ok()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

pub fn render_rss(feed: &JsonFeed) -> Result<String> {
    let item = feed
        .items
        .iter()
        .map(|entry| {
            let guid = entry.id().to_string();
            Item {
                title: non_empty(entry.title.as_deref())
                    .map(str::to_string)
                    .unwrap_or_else(|| guid.clone()),
                link: non_empty(entry.url.as_deref()).map(str::to_string),
                description: entry.content_text.clone().unwrap_or_default(),
                pub_date: non_empty(entry.date_published.as_deref()).and_then(rfc822_gmt),
                guid,
            }
        })
        .collect();

    let rss = Rss {
        version: "2.0",
        channel: Channel {
            title: non_empty(feed.title.as_deref())
                .unwrap_or("NOROSHI")
                .to_string(),
            link: non_empty(feed.home_page_url.as_deref())
                .unwrap_or("./")
                .to_string(),
            description: feed.description.clone().unwrap_or_default(),
            item,
        },
    };

    let body = quick_xml::se::to_string_with_root("rss", &rss).context("rendering rss xml")?;
    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}
