//! Built-in displayers
//!
//! Each displayer renders one slot's series table onto a shared text
//! output. The render loop owns the displayers and is their only caller.

mod json;
mod text;

pub use json::JsonLinesDisplayer;
pub use text::TextDisplayer;

use anyhow::{anyhow, Result};
use headcount_core::{BoxedDisplayer, Registry, SharedWriter, SlotPosition};

/// Write one complete block to the shared output and flush it.
///
/// Blocks from different slots never interleave.
pub(crate) fn write_block(writer: &SharedWriter, block: &str) -> Result<()> {
    let mut out = writer
        .lock()
        .map_err(|_| anyhow!("Display output lock poisoned"))?;
    out.write_all(block.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn text_displayer(position: SlotPosition, writer: SharedWriter) -> BoxedDisplayer {
    Box::new(TextDisplayer::new(position, writer))
}

fn json_displayer(position: SlotPosition, writer: SharedWriter) -> BoxedDisplayer {
    Box::new(JsonLinesDisplayer::new(position, writer))
}

/// Register all built-in displayers with `registry`
pub fn register_all(registry: &mut Registry) {
    registry.register_displayer("text", text_displayer);
    registry.register_displayer("json", json_displayer);
}
