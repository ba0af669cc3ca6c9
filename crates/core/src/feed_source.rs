//! Feed source trait and related types

use crate::shutdown::Shutdown;
use anyhow::Result;
use headcount_types::Document;
use std::sync::Arc;

/// Metadata about a feed source
#[derive(Debug, Clone)]
pub struct FeedMetadata {
    /// Unique identifier for this feed type
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of where the documents come from
    pub description: String,
}

/// Callback invoked with the full current collection on every notification
///
/// The callback may be invoked from any thread, and concurrently if a feed
/// delivers overlapping notifications.
pub type SnapshotListener = Arc<dyn Fn(Vec<Document>) + Send + Sync>;

/// Trait for all change-feed sources
///
/// A feed delivers snapshots, never diffs: every notification carries the
/// complete set of documents currently known to the collection. Redelivery
/// and reordering are allowed.
pub trait FeedSource: Send {
    /// Get metadata about this feed
    fn metadata(&self) -> &FeedMetadata;

    /// Deliver snapshots to `listener` until the feed is exhausted or
    /// `shutdown` fires
    ///
    /// Runs on the caller's thread. Transient failures (unreadable file,
    /// malformed snapshot) are logged and skipped; only unrecoverable setup
    /// errors are returned.
    fn run(&mut self, listener: SnapshotListener, shutdown: Shutdown) -> Result<()>;
}

/// Type-erased feed source for dynamic dispatch
pub type BoxedFeedSource = Box<dyn FeedSource>;
