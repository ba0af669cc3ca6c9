//! Registry for feed sources and displayers

use crate::{BoxedDisplayer, BoxedFeedSource, SharedWriter};
use anyhow::{anyhow, Result};
use headcount_types::{FeedConfig, SlotPosition};
use std::collections::HashMap;

/// Function that creates a feed source from its configuration
pub type FeedFactory = fn(&FeedConfig) -> Result<BoxedFeedSource>;

/// Function that creates the displayer for one slot
pub type DisplayerFactory = fn(SlotPosition, SharedWriter) -> BoxedDisplayer;

/// Registry for feed sources and displayers
///
/// Built-in feeds and displayers register themselves at startup; the
/// configuration then selects them by id.
pub struct Registry {
    feeds: HashMap<String, FeedFactory>,
    displayers: HashMap<String, DisplayerFactory>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            feeds: HashMap::new(),
            displayers: HashMap::new(),
        }
    }

    /// Register a feed source
    pub fn register_feed(&mut self, id: &str, factory: FeedFactory) {
        self.feeds.insert(id.to_string(), factory);
    }

    /// Register a displayer
    pub fn register_displayer(&mut self, id: &str, factory: DisplayerFactory) {
        self.displayers.insert(id.to_string(), factory);
    }

    /// Create the feed named by `config.source`
    pub fn create_feed(&self, config: &FeedConfig) -> Result<BoxedFeedSource> {
        let factory = self
            .feeds
            .get(&config.source)
            .ok_or_else(|| anyhow!("Unknown feed source: {}", config.source))?;
        factory(config)
    }

    /// Create a displayer by ID
    pub fn create_displayer(
        &self,
        id: &str,
        position: SlotPosition,
        writer: SharedWriter,
    ) -> Result<BoxedDisplayer> {
        let factory = self
            .displayers
            .get(id)
            .ok_or_else(|| anyhow!("Unknown displayer: {}", id))?;
        Ok(factory(position, writer))
    }

    /// List all registered feed IDs, sorted
    pub fn list_feeds(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.feeds.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// List all registered displayer IDs, sorted
    pub fn list_displayers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.displayers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
