//! Configuration sections shared by the pipeline, feeds and displayers

use crate::layout::GridConfig;
use crate::metrics::MetricSchema;
use crate::time_format::TimeFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Feed source selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Registered feed id ("file" or "stdin" for the built-ins)
    #[serde(default = "default_feed_source")]
    pub source: String,
    /// Collection file for the file feed
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Fallback polling interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_feed_source() -> String {
    "stdin".to_string()
}

fn default_poll_interval() -> u64 {
    1000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: default_feed_source(),
            path: None,
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Windowing and projection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Trailing window, anchored at each device's newest record
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    #[serde(default)]
    pub metrics: MetricSchema,
    #[serde(default)]
    pub time_format: TimeFormat,
}

fn default_window_seconds() -> u64 {
    45 * 60
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window_seconds(),
            metrics: MetricSchema::default(),
            time_format: TimeFormat::default(),
        }
    }
}

/// Display slots and labeling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of slots; devices beyond it are not shown
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    #[serde(default)]
    pub grid: GridConfig,
    /// Registered displayer id used for every slot
    #[serde(default = "default_displayer")]
    pub displayer: String,
    /// Device id -> label shown in slot titles
    #[serde(default)]
    pub friendly_names: HashMap<String, String>,
    /// Mark slots stale when no frame arrives for this long
    #[serde(default)]
    pub stale_after_secs: Option<u64>,
}

fn default_display_limit() -> usize {
    4
}

fn default_displayer() -> String {
    "text".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            display_limit: default_display_limit(),
            grid: GridConfig::default(),
            displayer: default_displayer(),
            friendly_names: HashMap::new(),
            stale_after_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_fill_defaults() {
        let pipeline: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(pipeline.window_seconds, 2700);
        assert_eq!(pipeline.metrics, MetricSchema::default());

        let display: DisplayConfig =
            serde_json::from_str(r#"{"friendly_names": {"dev:1": "Lobby"}}"#).unwrap();
        assert_eq!(display.display_limit, 4);
        assert_eq!(display.displayer, "text");
        assert_eq!(display.friendly_names.get("dev:1").map(String::as_str), Some("Lobby"));

        let feed: FeedConfig =
            serde_json::from_str(r#"{"source": "file", "path": "/tmp/c.json"}"#).unwrap();
        assert_eq!(feed.poll_interval_ms, 1000);
        assert_eq!(feed.path, Some(PathBuf::from("/tmp/c.json")));
    }
}
