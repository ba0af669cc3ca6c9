#![allow(dead_code)]

use anyhow::Result;
use headcount_core::{BoxedDisplayer, Displayer, SeriesTable};
use headcount_types::Document;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One redraw as seen by a [`RecordingDisplayer`]
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub slot: usize,
    pub title: String,
    pub table: SeriesTable,
}

pub type DrawLog = Arc<Mutex<Vec<Draw>>>;

/// Displayer that records every redraw
pub struct RecordingDisplayer {
    slot: usize,
    log: DrawLog,
}

impl Displayer for RecordingDisplayer {
    fn id(&self) -> &str {
        "recording"
    }

    fn name(&self) -> &str {
        "Recording"
    }

    fn draw(&mut self, title: &str, table: &SeriesTable) -> Result<()> {
        self.log.lock().unwrap().push(Draw {
            slot: self.slot,
            title: title.to_string(),
            table: table.clone(),
        });
        Ok(())
    }
}

pub fn recording_slots(count: usize) -> (Vec<BoxedDisplayer>, DrawLog) {
    let log = DrawLog::default();
    let slots = (0..count)
        .map(|slot| {
            Box::new(RecordingDisplayer {
                slot,
                log: log.clone(),
            }) as BoxedDisplayer
        })
        .collect();
    (slots, log)
}

/// Documents from a JSON array literal
pub fn docs(value: Value) -> Vec<Document> {
    value
        .as_array()
        .expect("array of documents")
        .iter()
        .map(|doc| doc.as_object().cloned().expect("document object"))
        .collect()
}
