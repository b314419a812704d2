// src/feed.rs
//! JSON Feed 1.1 document with id-keyed upsert.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::output::{take_if_string, take_string};

pub const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";
pub const DEFAULT_MAX_ITEMS: usize = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("feed item must include a non-empty id")]
    InvalidItem,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    /// Keys this crate does not manage, carried through untouched. A managed
    /// key holding a non-string also lands here and is written back as is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeedItem {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            id: take_if_string(&mut map, "id"),
            url: take_if_string(&mut map, "url"),
            title: take_if_string(&mut map, "title"),
            content_text: take_if_string(&mut map, "content_text"),
            date_published: take_if_string(&mut map, "date_published"),
            extra: map,
        }
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JsonFeed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Newest first.
    pub items: Vec<FeedItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JsonFeed {
    /// Boundary parse of whatever `feed.json` held. Non-objects become an
    /// empty feed and mistyped metadata is dropped. Every object item is
    /// kept; other item entries are skipped.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        let items = match map.remove("items") {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(m) => Some(FeedItem::from_map(m)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            version: take_string(&mut map, "version"),
            title: take_string(&mut map, "title"),
            home_page_url: take_string(&mut map, "home_page_url"),
            feed_url: take_string(&mut map, "feed_url"),
            description: take_string(&mut map, "description"),
            items,
            extra: map,
        }
    }

    /// Fill metadata only where absent.
    pub fn ensure_defaults(&mut self, title: &str, description: &str) {
        self.version.get_or_insert_with(|| JSON_FEED_VERSION.to_string());
        self.title.get_or_insert_with(|| title.to_string());
        self.description
            .get_or_insert_with(|| description.to_string());
    }
}

/// Insert `item` at the front, replacing every entry with the same id and
/// dropping the oldest entries beyond `max_items`.
pub fn upsert(
    feed: &mut JsonFeed,
    item: FeedItem,
    max_items: usize,
) -> Result<&mut JsonFeed, FeedError> {
    if item.id().is_empty() {
        return Err(FeedError::InvalidItem);
    }

    feed.items.retain(|existing| existing.id() != item.id());
    feed.items.insert(0, item);
    feed.items.truncate(max_items);
    Ok(feed)
}
