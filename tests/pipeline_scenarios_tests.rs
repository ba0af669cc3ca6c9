mod common;

use common::{docs, recording_slots};
use headcount::displayers::JsonLinesDisplayer;
use headcount::pipeline::{build_frame, PipelineSettings, RenderLoop, SlotLabeler};
use headcount_core::{BoxedDisplayer, SharedWriter};
use headcount_types::{DisplayTime, GridConfig, SeriesRow};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[test]
fn test_single_record_becomes_one_row() {
    let settings = PipelineSettings::default();
    let frame = build_frame(
        &docs(json!([{"device": "d1", "time": 100, "num_faces": 2}])),
        &settings,
        0,
    );

    assert_eq!(frame.device_ids(), vec!["d1"]);
    let table = frame.get("d1").unwrap();
    assert_eq!(table.columns, vec!["People", "Attention"]);
    assert_eq!(
        table.rows,
        vec![SeriesRow {
            time: DisplayTime::Millis(100_000),
            values: vec![2.0, 0.0],
        }]
    );
    assert_eq!(table.latest, Some(2.0));
    assert_eq!(SlotLabeler::default().title("d1", table.latest), "d1 (2)");
}

#[test]
fn test_single_record_as_json_line() {
    let frame = build_frame(
        &docs(json!([{"device": "d1", "time": 100, "num_faces": 2}])),
        &PipelineSettings::default(),
        0,
    );

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer: SharedWriter = buffer.clone();
    let slot: BoxedDisplayer =
        Box::new(JsonLinesDisplayer::new(GridConfig::default().position(0), writer));
    let mut render = RenderLoop::new(vec![slot], SlotLabeler::default());
    assert_eq!(render.render_frame(&frame), 1);

    let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 1);

    let line: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(line["title"], "d1 (2)");
    assert_eq!(line["rows"], json!([{"time": 100_000, "People": 2.0, "Attention": 0.0}]));
    assert_eq!(line["latest"], 2.0);
}

#[test]
fn test_records_older_than_window_are_dropped() {
    let settings = PipelineSettings::default();
    assert_eq!(settings.window_seconds, 2700);

    let frame = build_frame(
        &docs(json!([
            {"device": "d1", "time": 0, "num_faces": 5},
            {"device": "d1", "time": 3000, "num_faces": 1},
        ])),
        &settings,
        0,
    );

    let table = frame.get("d1").unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].time, DisplayTime::Millis(3_000_000));
    assert_eq!(table.latest, Some(1.0));
}

#[test]
fn test_empty_snapshot_renders_nothing() {
    let frame = build_frame(&[], &PipelineSettings::default(), 0);
    assert!(frame.is_empty());

    let (slots, log) = recording_slots(4);
    let mut render = RenderLoop::new(slots, SlotLabeler::default());
    assert_eq!(render.render_frame(&frame), 0);
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(render.stats().failed_redraws, 0);
}

#[test]
fn test_display_limit_keeps_first_device() {
    let frame = build_frame(
        &docs(json!([
            {"device": "second-by-id", "time": 50, "num_faces": 1},
            {"device": "a-first-by-id", "time": 60, "num_faces": 3},
        ])),
        &PipelineSettings::default(),
        0,
    );

    let (slots, log) = recording_slots(1);
    let mut render = RenderLoop::new(slots, SlotLabeler::default());
    assert_eq!(render.render_frame(&frame), 1);

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].slot, 0);
    assert_eq!(log[0].title, "second-by-id (1)");
}

#[test]
fn test_same_snapshot_same_frame() {
    let snapshot = docs(json!([
        {"device": "d2", "time": 10, "num_faces": 1, "num_facing_faces": 1},
        {"device": "d1", "time": 12, "num_faces": 4},
        {"device": "d2", "time": 5, "num_faces": 2},
        {"device": "d1", "time": "late", "num_faces": 9},
    ]));
    let settings = PipelineSettings::default();

    let first = serde_json::to_vec(&build_frame(&snapshot, &settings, 7)).unwrap();
    let second = serde_json::to_vec(&build_frame(&snapshot, &settings, 7)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_frames_replace_slots_wholesale() {
    let settings = PipelineSettings::default();
    let (slots, log) = recording_slots(2);
    let mut render = RenderLoop::new(slots, SlotLabeler::default());

    render.render_frame(&build_frame(
        &docs(json!([
            {"device": "a", "time": 1, "num_faces": 1},
            {"device": "b", "time": 1, "num_faces": 2},
        ])),
        &settings,
        0,
    ));
    render.render_frame(&build_frame(
        &docs(json!([{"device": "b", "time": 2, "num_faces": 3}])),
        &settings,
        1,
    ));

    // Positional binding: b moves into slot 0, slot 1 keeps its old content
    assert_eq!(render.bound_device(0), Some("b"));
    assert_eq!(render.bound_device(1), Some("b"));
    let log = log.lock().unwrap();
    assert_eq!(log.last().map(|draw| draw.title.as_str()), Some("b (3)"));
    assert_eq!(log.len(), 3);
}
