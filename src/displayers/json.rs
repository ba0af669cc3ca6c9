//! JSON lines displayer
//!
//! One JSON object per redraw, for piping into other tools. Rows use the
//! `{time, <label>: value}` shape that chart front ends take directly.

use super::write_block;
use anyhow::Result;
use headcount_core::{Displayer, SeriesTable, SharedWriter, SlotPosition};
use serde_json::json;

pub struct JsonLinesDisplayer {
    id: String,
    name: String,
    position: SlotPosition,
    writer: SharedWriter,
    drawn: bool,
}

impl JsonLinesDisplayer {
    pub fn new(position: SlotPosition, writer: SharedWriter) -> Self {
        Self {
            id: "json".to_string(),
            name: "JSON Lines".to_string(),
            position,
            writer,
            drawn: false,
        }
    }

    fn emit(&self, value: serde_json::Value) -> Result<()> {
        let mut line = serde_json::to_string(&value)?;
        line.push('\n');
        write_block(&self.writer, &line)
    }
}

impl Displayer for JsonLinesDisplayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draw(&mut self, title: &str, table: &SeriesTable) -> Result<()> {
        self.emit(json!({
            "slot": self.position.slot,
            "row": self.position.row,
            "column": self.position.column,
            "title": title,
            "rows": table.row_objects(),
            "latest": table.latest,
        }))?;
        self.drawn = true;
        Ok(())
    }

    fn mark_stale(&mut self) -> Result<()> {
        if !self.drawn {
            return Ok(());
        }
        self.emit(json!({"slot": self.position.slot, "stale": true}))
    }
}
