//! Line-delimited snapshot feed
//!
//! Each non-blank line is one complete snapshot. Handy for piping a
//! change-feed bridge into the dashboard, and for replaying recordings.

use super::parse_snapshot;
use anyhow::Result;
use headcount_core::{FeedMetadata, FeedSource, Shutdown, SnapshotListener};
use log::{debug, info, warn};
use std::io::BufRead;

pub struct LineFeed<R> {
    metadata: FeedMetadata,
    reader: R,
}

impl<R: BufRead + Send> LineFeed<R> {
    pub fn new(id: &str, reader: R) -> Self {
        Self {
            metadata: FeedMetadata {
                id: id.to_string(),
                name: "Line feed".to_string(),
                description: "One JSON collection snapshot per line".to_string(),
            },
            reader,
        }
    }
}

impl<R: BufRead + Send> FeedSource for LineFeed<R> {
    fn metadata(&self) -> &FeedMetadata {
        &self.metadata
    }

    /// Returns at end of input. A blocking read is not interrupted by
    /// shutdown; the signal is checked between lines.
    fn run(&mut self, listener: SnapshotListener, shutdown: Shutdown) -> Result<()> {
        let mut delivered = 0u64;
        let mut line = String::new();
        let mut number = 0u64;

        loop {
            if shutdown.is_triggered() {
                debug!("{}: shutdown requested", self.metadata.id);
                break;
            }

            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            number += 1;
            if line.trim().is_empty() {
                continue;
            }

            match parse_snapshot(&line) {
                Ok(docs) => {
                    listener(docs);
                    delivered += 1;
                }
                Err(e) => warn!("{}: skipping line {}: {}", self.metadata.id, number, e),
            }
        }

        info!("{}: delivered {} snapshots", self.metadata.id, delivered);
        Ok(())
    }
}
