//! headcount-core: Core traits and registry for the headcount dashboard.
//!
//! This crate contains the seams to the outside world (FeedSource,
//! Displayer), the Registry that maps configuration ids to them, the
//! shutdown signal and shared constants.

pub mod constants;
mod displayer;
mod feed_source;
mod registry;
mod shutdown;

pub use constants::{HANDOFF_CAPACITY, MISSING_VALUE_LABEL, STALE_MARKER};
pub use displayer::{BoxedDisplayer, Displayer, SharedWriter};
pub use feed_source::{BoxedFeedSource, FeedMetadata, FeedSource, SnapshotListener};
pub use registry::{DisplayerFactory, FeedFactory, Registry};
pub use shutdown::{shutdown_signal, Shutdown, ShutdownHandle};

// Re-export types used in trait signatures for convenience
pub use headcount_types::{Document, FeedConfig, SeriesTable, SlotPosition};
