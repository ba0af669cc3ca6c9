//! headcount-types: Shared data types for the headcount sensor dashboard.
//!
//! This crate contains pure data types (records, series tables, frames and
//! configuration sections) shared across all headcount crates. Nothing here
//! performs I/O or spawns threads.

pub mod config;
pub mod frame;
pub mod layout;
pub mod metrics;
pub mod record;
pub mod time_format;

// Re-export commonly used types at the crate root for convenience
pub use config::{DisplayConfig, FeedConfig, PipelineConfig};
pub use frame::{DeviceSeries, DisplayTime, Frame, SeriesRow, SeriesTable, TIME_COLUMN};
pub use layout::{GridConfig, SlotPosition};
pub use metrics::{
    MetricColumn, MetricSchema, SchemaError, PRIMARY_METRIC_FIELD, SECONDARY_METRIC_FIELD,
};
pub use record::{Document, EventRecord, DEVICE_FIELD, TIME_FIELD};
pub use time_format::{TimeFormat, TimeFormatError, TimeFormatter};
