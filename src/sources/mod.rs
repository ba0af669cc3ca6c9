//! Built-in feed sources
//!
//! Each feed delivers the whole collection on every notification. Two
//! collection shapes are accepted: a JSON array of documents, or a JSON
//! object mapping document ids to documents (a collection export).

mod file;
mod lines;

pub use file::JsonFileFeed;
pub use lines::LineFeed;

use anyhow::{anyhow, Result};
use headcount_core::{BoxedFeedSource, FeedConfig, Registry};
use headcount_types::Document;
use log::trace;
use serde_json::Value;
use std::io::{stdin, BufReader};
use std::time::Duration;

/// Parse one collection snapshot.
///
/// Entries that are not JSON objects are skipped; their fields are
/// validated later during normalization.
pub fn parse_snapshot(text: &str) -> Result<Vec<Document>> {
    let entries = match serde_json::from_str::<Value>(text)? {
        Value::Array(entries) => entries,
        Value::Object(collection) => collection.into_iter().map(|(_, doc)| doc).collect(),
        other => return Err(anyhow!("Expected a JSON array or object, got {}", kind(&other))),
    };

    let total = entries.len();
    let docs: Vec<Document> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(doc) => Some(doc),
            _ => None,
        })
        .collect();
    if docs.len() < total {
        trace!("Skipped {} non-object entries in snapshot", total - docs.len());
    }
    Ok(docs)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn file_feed(config: &FeedConfig) -> Result<BoxedFeedSource> {
    let path = config
        .path
        .clone()
        .ok_or_else(|| anyhow!("The file feed needs a path"))?;
    Ok(Box::new(JsonFileFeed::new(
        path,
        Duration::from_millis(config.poll_interval_ms),
    )))
}

fn stdin_feed(_config: &FeedConfig) -> Result<BoxedFeedSource> {
    Ok(Box::new(LineFeed::new("stdin", BufReader::new(stdin()))))
}

/// Register all built-in feeds with `registry`
pub fn register_all(registry: &mut Registry) {
    registry.register_feed("file", file_feed);
    registry.register_feed("stdin", stdin_feed);
}
