//! Collection file feed
//!
//! Re-delivers the full contents of a JSON collection file whenever it
//! changes. Changes are picked up from filesystem notifications, with a
//! modification-time poll as fallback for filesystems that do not emit
//! them.

use super::parse_snapshot;
use anyhow::Result;
use crossbeam::channel::{never, select, unbounded, Receiver};
use headcount_core::{FeedMetadata, FeedSource, Shutdown, SnapshotListener};
use headcount_types::Document;
use log::{debug, info, warn};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

type WatchEvents = Receiver<notify::Result<Event>>;

pub struct JsonFileFeed {
    metadata: FeedMetadata,
    path: PathBuf,
    poll_interval: Duration,
}

impl JsonFileFeed {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        let path = path.into();
        Self {
            metadata: FeedMetadata {
                id: "file".to_string(),
                name: "Collection file".to_string(),
                description: format!("Documents stored in {}", path.display()),
            },
            path,
            poll_interval,
        }
    }

    fn read_snapshot(&self) -> Result<Vec<Document>> {
        let text = std::fs::read_to_string(&self.path)?;
        parse_snapshot(&text)
    }

    fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
    }

    fn deliver(&self, listener: &SnapshotListener) {
        match self.read_snapshot() {
            Ok(docs) => {
                debug!("{}: delivering {} documents", self.path.display(), docs.len());
                listener(docs);
            }
            Err(e) => warn!("{}: skipping unreadable snapshot: {}", self.path.display(), e),
        }
    }

    fn concerns_feed_file(&self, event: &Event) -> bool {
        (event.kind.is_create() || event.kind.is_modify())
            && event
                .paths
                .iter()
                .any(|path| path.file_name() == self.path.file_name())
    }

    /// Watch the parent directory, so files replaced by rename are seen too
    fn watch(&self) -> Option<(RecommendedWatcher, WatchEvents)> {
        let (tx, rx) = unbounded();
        let forward = move |event: notify::Result<Event>| {
            let _ = tx.send(event);
        };
        let mut watcher = match notify::recommended_watcher(forward) {
            Ok(watcher) => watcher,
            Err(e) => {
                warn!("File notifications unavailable, polling only: {}", e);
                return None;
            }
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
            warn!("Cannot watch {}, polling only: {}", dir.display(), e);
            return None;
        }
        Some((watcher, rx))
    }
}

impl FeedSource for JsonFileFeed {
    fn metadata(&self) -> &FeedMetadata {
        &self.metadata
    }

    fn run(&mut self, listener: SnapshotListener, shutdown: Shutdown) -> Result<()> {
        // The watcher must stay alive for as long as events are wanted
        let (_watcher, mut events) = match self.watch() {
            Some((watcher, events)) => (Some(watcher), events),
            None => (None, never()),
        };

        let mut last_seen = self.modified();
        if last_seen.is_some() {
            self.deliver(&listener);
        } else {
            info!("Waiting for {} to appear", self.path.display());
        }

        loop {
            select! {
                recv(shutdown.receiver()) -> _ => break,
                recv(events) -> event => match event {
                    Ok(Ok(event)) => {
                        if self.concerns_feed_file(&event) {
                            last_seen = self.modified();
                            self.deliver(&listener);
                        }
                    }
                    Ok(Err(e)) => warn!("Watch error on {}: {}", self.path.display(), e),
                    Err(_) => {
                        warn!("File watcher stopped, polling only");
                        events = never();
                    }
                },
                default(self.poll_interval) => {
                    let modified = self.modified();
                    if modified.is_some() && modified != last_seen {
                        last_seen = modified;
                        self.deliver(&listener);
                    }
                }
            }
        }

        debug!("{}: feed stopped", self.path.display());
        Ok(())
    }
}
