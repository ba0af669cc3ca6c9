//! Text displayer implementation

use super::write_block;
use crate::pipeline::render::format_value;
use anyhow::Result;
use headcount_core::{Displayer, SeriesTable, SharedWriter, SlotPosition, STALE_MARKER};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Only the newest points fit on one line
const SPARKLINE_WIDTH: usize = 48;

/// Text displayer
///
/// Writes a compact block per redraw: the title with the number of points,
/// then one sparkline per metric column followed by its newest value.
pub struct TextDisplayer {
    id: String,
    name: String,
    position: SlotPosition,
    writer: SharedWriter,
    last_title: Option<String>,
}

impl TextDisplayer {
    pub fn new(position: SlotPosition, writer: SharedWriter) -> Self {
        Self {
            id: "text".to_string(),
            name: "Text Display".to_string(),
            position,
            writer,
            last_title: None,
        }
    }

    fn render(&self, title: &str, table: &SeriesTable) -> String {
        if table.is_empty() {
            return format!("[{}] {} | no data\n", self.position, title);
        }

        let mut block = format!("[{}] {} | {} points\n", self.position, title, table.len());
        let width = table.columns.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        for (index, label) in table.columns.iter().enumerate() {
            let values: Vec<f64> = table.rows.iter().map(|row| row.values[index]).collect();
            let last = values.last().copied().unwrap_or(0.0);
            block.push_str(&format!(
                "  {:<width$}  {} {}\n",
                label,
                sparkline(&values),
                format_value(last),
                width = width
            ));
        }
        block
    }
}

/// Scale the newest values onto block characters, min to max
fn sparkline(values: &[f64]) -> String {
    let start = values.len().saturating_sub(SPARKLINE_WIDTH);
    let values = &values[start..];

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    values
        .iter()
        .map(|value| {
            let level = if span > 0.0 {
                ((value - min) / span * top).round() as usize
            } else {
                0
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

impl Displayer for TextDisplayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draw(&mut self, title: &str, table: &SeriesTable) -> Result<()> {
        let block = self.render(title, table);
        write_block(&self.writer, &block)?;
        self.last_title = Some(title.to_string());
        Ok(())
    }

    fn mark_stale(&mut self) -> Result<()> {
        match &self.last_title {
            Some(title) => write_block(
                &self.writer,
                &format!("[{}] {} {}\n", self.position, title, STALE_MARKER),
            ),
            None => Ok(()),
        }
    }
}
