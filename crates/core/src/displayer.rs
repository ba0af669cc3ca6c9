//! Displayer trait and related types

use anyhow::Result;
use headcount_types::SeriesTable;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Output shared by every slot of a text-based display surface
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Trait for all displayers
///
/// A displayer is one render target (a display slot). It is created once at
/// startup and then redrawn with whichever device the render loop binds to
/// it. Only the render loop calls into displayers.
pub trait Displayer: Send {
    /// Unique identifier for this displayer type
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Replace the slot's content with `table`, titled `title`
    ///
    /// Redraws are idempotent: drawing the same table twice shows the same
    /// content.
    fn draw(&mut self, title: &str, table: &SeriesTable) -> Result<()>;

    /// Flag the current content as out of date
    ///
    /// Called when no frame has arrived within the configured liveness
    /// timeout. The default implementation does nothing.
    fn mark_stale(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Type-erased displayer for dynamic dispatch
pub type BoxedDisplayer = Box<dyn Displayer>;
