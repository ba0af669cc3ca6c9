//! Snapshot handler: one full feed snapshot in, one frame out
//!
//! Every invocation works on its own local data; the sequence counter and
//! the handoff are the only state shared between concurrent notifications.

use super::handoff::{FramePublisher, HandoffError, PublishOutcome};
use super::projector::project;
use super::window::build_windows;
use crate::config::ConfigError;
use headcount_core::SnapshotListener;
use headcount_types::{
    DeviceSeries, Document, EventRecord, Frame, MetricSchema, PipelineConfig, TimeFormatter,
};
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Validated, immutable settings for building frames
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub window_seconds: u64,
    pub schema: MetricSchema,
    pub formatter: TimeFormatter,
}

impl PipelineSettings {
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.metrics.validate()?;
        Ok(Self {
            window_seconds: config.window_seconds,
            schema: config.metrics.clone(),
            formatter: config.time_format.formatter()?,
        })
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            window_seconds: PipelineConfig::default().window_seconds,
            schema: MetricSchema::default(),
            formatter: TimeFormatter::default(),
        }
    }
}

/// Counts for one processed snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub documents: usize,
    pub accepted: usize,
    pub dropped: usize,
    pub devices: usize,
}

/// Normalize documents, dropping the ones that are malformed
pub fn normalize(docs: &[Document], schema: &MetricSchema) -> Vec<EventRecord> {
    docs.iter()
        .filter_map(|doc| EventRecord::from_document(doc, schema))
        .collect()
}

/// Build the frame for one snapshot; see [`build_frame_with_stats`]
pub fn build_frame(docs: &[Document], settings: &PipelineSettings, sequence: u64) -> Frame {
    build_frame_with_stats(docs, settings, sequence).0
}

/// Normalize, window and project a full snapshot.
///
/// Pure: the same documents and settings always produce the same frame.
pub fn build_frame_with_stats(
    docs: &[Document],
    settings: &PipelineSettings,
    sequence: u64,
) -> (Frame, SnapshotStats) {
    let records = normalize(docs, &settings.schema);
    let accepted = records.len();

    let devices: Vec<DeviceSeries> = build_windows(records, settings.window_seconds)
        .into_iter()
        .map(|window| DeviceSeries {
            table: project(&window, &settings.schema, &settings.formatter),
            device_id: window.device_id,
        })
        .collect();

    let stats = SnapshotStats {
        documents: docs.len(),
        accepted,
        dropped: docs.len() - accepted,
        devices: devices.len(),
    };
    (Frame { sequence, devices }, stats)
}

/// Builds a frame per notification and publishes it to the render loop
pub struct SnapshotHandler {
    settings: Arc<PipelineSettings>,
    publisher: FramePublisher,
    sequence: AtomicU64,
}

impl SnapshotHandler {
    pub fn new(settings: Arc<PipelineSettings>, publisher: FramePublisher) -> Self {
        Self {
            settings,
            publisher,
            sequence: AtomicU64::new(0),
        }
    }

    /// Process one snapshot. An empty or fully malformed snapshot still
    /// publishes an (empty) frame.
    pub fn handle(&self, docs: &[Document]) -> Result<PublishOutcome, HandoffError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let (frame, stats) = build_frame_with_stats(docs, &self.settings, sequence);
        debug!(
            "Snapshot {}: {} documents, {} accepted, {} dropped, {} devices",
            sequence, stats.documents, stats.accepted, stats.dropped, stats.devices
        );
        self.publisher.publish(frame)
    }

    /// Adapt the handler to the feed callback shape
    pub fn into_listener(self: Arc<Self>) -> SnapshotListener {
        Arc::new(move |docs: Vec<Document>| {
            if let Err(e) = self.handle(&docs) {
                warn!("Dropping snapshot: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::handoff::handoff;
    use headcount_types::TimeFormat;
    use serde_json::{json, Value};

    fn docs(value: Value) -> Vec<Document> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|doc| doc.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_build_frame_counts_drops() {
        let snapshot = docs(json!([
            {"device": "d1", "time": 100, "num_faces": 2},
            {"device": "d2", "time": 100},
            {"time": 100, "num_faces": 1},
            {"device": "d3", "time": 90, "num_faces": 0, "num_facing_faces": 0}
        ]));
        let (frame, stats) = build_frame_with_stats(&snapshot, &PipelineSettings::default(), 4);

        assert_eq!(frame.sequence, 4);
        assert_eq!(frame.device_ids(), vec!["d1", "d3"]);
        assert_eq!(
            stats,
            SnapshotStats {
                documents: 4,
                accepted: 2,
                dropped: 2,
                devices: 2
            }
        );
    }

    #[test]
    fn test_handle_publishes_empty_frame_for_empty_snapshot() {
        let (publisher, receiver) = handoff();
        let handler = SnapshotHandler::new(Arc::new(PipelineSettings::default()), publisher);

        assert_eq!(handler.handle(&[]), Ok(PublishOutcome::Delivered));
        let frame = receiver.try_next().unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn test_sequence_increases_per_notification() {
        let (publisher, receiver) = handoff();
        let handler = Arc::new(SnapshotHandler::new(
            Arc::new(PipelineSettings::default()),
            publisher,
        ));
        let listener = handler.clone().into_listener();

        listener(Vec::new());
        assert_eq!(receiver.try_next().map(|f| f.sequence), Some(0));
        listener(Vec::new());
        assert_eq!(receiver.try_next().map(|f| f.sequence), Some(1));
    }

    #[test]
    fn test_settings_reject_invalid_config() {
        let config = PipelineConfig {
            time_format: TimeFormat::Clock {
                pattern: "%X".to_string(),
                timezone: Some("Nowhere/Special".to_string()),
            },
            ..PipelineConfig::default()
        };
        assert!(PipelineSettings::from_config(&config).is_err());

        let config = PipelineConfig {
            metrics: MetricSchema::new(Vec::new()),
            ..PipelineConfig::default()
        };
        assert!(PipelineSettings::from_config(&config).is_err());
    }
}
