//! Normalized sensor observations
//!
//! Feeds hand over raw documents (unordered field maps). Everything
//! downstream works on [`EventRecord`]s; documents that cannot be
//! normalized are dropped here and never reach a frame.

use crate::metrics::MetricSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One raw document as delivered by a feed
pub type Document = Map<String, Value>;

/// Document field holding the device identifier
pub const DEVICE_FIELD: &str = "device";

/// Document field holding the observation time in epoch seconds
pub const TIME_FIELD: &str = "time";

/// A single observation from one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub device_id: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    /// Metric values keyed by document field name
    pub metrics: BTreeMap<String, f64>,
}

impl EventRecord {
    pub fn new(device_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, field: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(field.into(), value);
        self
    }

    pub fn metric(&self, field: &str) -> Option<f64> {
        self.metrics.get(field).copied()
    }

    /// Normalize a raw document.
    ///
    /// Returns `None` when the device id is not a string, the time is not a
    /// finite number, or the primary metric is missing or not numeric.
    /// Secondary metrics with unusable values are treated as absent.
    /// Only the device, time and schema fields are read.
    pub fn from_document(doc: &Document, schema: &MetricSchema) -> Option<Self> {
        let device_id = doc.get(DEVICE_FIELD)?.as_str()?;
        let timestamp = epoch_seconds(doc.get(TIME_FIELD)?)?;

        let mut metrics = BTreeMap::new();
        for column in &schema.columns {
            match doc.get(&column.field).and_then(finite_number) {
                Some(value) => {
                    metrics.insert(column.field.clone(), value);
                }
                None if column.primary => return None,
                None => {}
            }
        }

        Some(Self {
            device_id: device_id.to_string(),
            timestamp,
            metrics,
        })
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// Whole epoch seconds; fractional times are floored
fn epoch_seconds(value: &Value) -> Option<i64> {
    if let Some(secs) = value.as_i64() {
        return Some(secs);
    }
    let secs = finite_number(value)?.floor();
    if secs < i64::MIN as f64 || secs >= i64::MAX as f64 {
        return None;
    }
    Some(secs as i64)
}
