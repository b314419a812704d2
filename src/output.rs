// src/output.rs
//! Flat-file helpers shared by every writer.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Pretty JSON with sorted keys, 2-space indent and a trailing newline.
pub fn to_json_string<T: Serialize>(payload: &T) -> Result<String> {
    // Round-trip through Value: its object map is ordered by key.
    let value = serde_json::to_value(payload).context("serializing payload")?;
    let mut out = serde_json::to_string_pretty(&value).context("rendering json")?;
    out.push('\n');
    Ok(out)
}

pub fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    let content = to_json_string(payload)?;
    write_text(path, &content)
}

/// Read a JSON object from disk. Missing, unreadable, malformed or non-object
/// files all yield an empty map.
pub fn read_json_object(path: &Path) -> Map<String, Value> {
    let Ok(bytes) = fs::read(path) else {
        return Map::new();
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "not a JSON object; rebuilding");
            Map::new()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed JSON; rebuilding");
            Map::new()
        }
    }
}

/// Remove `key` and keep it only if it is a string.
pub fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Remove `key` only if it holds a string; any other value stays in `map`.
pub fn take_if_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(_)) => take_string(map, key),
        _ => None,
    }
}
