//! headcount: live per-device people-count series from change-feed snapshots
//!
//! This library provides the core functionality for headcount, including:
//! - The snapshot pipeline (windowing, projection, handoff, render loop)
//! - Built-in feeds (collection file, line-delimited stdin)
//! - Built-in text displayers
//! - Configuration management

pub mod config;
pub mod displayers;
pub mod pipeline;
pub mod sources;

// Re-export commonly used types
pub use config::AppConfig;
pub use headcount_core::{Displayer, FeedSource, Registry};
pub use pipeline::{handoff, RenderLoop, SnapshotHandler};
