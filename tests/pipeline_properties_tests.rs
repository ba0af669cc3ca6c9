//! Checks over deterministic pseudo-random snapshots

mod common;

use headcount::pipeline::window::cutoff;
use headcount::pipeline::{build_frame, PipelineSettings};
use headcount_types::{DisplayTime, Document, Frame};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::collections::HashMap;

const ROUNDS: u64 = 200;

fn valid_doc(rng: &mut StdRng) -> Value {
    let mut doc = json!({
        "device": format!("dev:{}", rng.gen_range(0..5)),
        "time": rng.gen_range(0..20_000),
        "num_faces": rng.gen_range(0..8),
    });
    if rng.gen_bool(0.5) {
        doc["num_facing_faces"] = json!(rng.gen_range(0..8));
    }
    doc
}

fn malformed_doc(rng: &mut StdRng) -> Value {
    match rng.gen_range(0..5) {
        0 => json!({"time": 10, "num_faces": 1}),
        1 => json!({"device": 42, "time": 10, "num_faces": 1}),
        2 => json!({"device": "dev:0", "time": "yesterday", "num_faces": 1}),
        3 => json!({"device": "dev:1", "time": 10}),
        _ => json!({"device": "dev:2", "time": 10, "num_faces": "many"}),
    }
}

fn to_docs(values: Vec<Value>) -> Vec<Document> {
    common::docs(Value::Array(values))
}

fn settings(rng: &mut StdRng) -> PipelineSettings {
    PipelineSettings {
        window_seconds: rng.gen_range(1..6_000),
        ..PipelineSettings::default()
    }
}

fn seconds(time: &DisplayTime) -> i64 {
    match time {
        DisplayTime::Millis(ms) => ms / 1000,
        DisplayTime::Text(text) => panic!("unexpected text time {}", text),
    }
}

#[test]
fn test_rows_are_inside_window_and_complete() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..ROUNDS {
        let settings = settings(&mut rng);
        let count = rng.gen_range(0..60);
        let values: Vec<Value> = (0..count).map(|_| valid_doc(&mut rng)).collect();

        let mut by_device: HashMap<String, Vec<i64>> = HashMap::new();
        for value in &values {
            by_device
                .entry(value["device"].as_str().unwrap().to_string())
                .or_default()
                .push(value["time"].as_i64().unwrap());
        }

        let frame = build_frame(&to_docs(values), &settings, 0);
        assert_eq!(frame.len(), by_device.len());

        for (device, times) in &by_device {
            let newest = *times.iter().max().unwrap();
            let limit = cutoff(newest, settings.window_seconds);
            let expected = times.iter().filter(|t| **t > limit).count();

            let table = frame.get(device).unwrap();
            assert_eq!(table.len(), expected, "device {}", device);
            assert!(table.rows.iter().all(|row| seconds(&row.time) > limit));
        }
    }
}

#[test]
fn test_rows_are_oldest_first() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..ROUNDS {
        let settings = settings(&mut rng);
        let values: Vec<Value> = (0..40).map(|_| valid_doc(&mut rng)).collect();
        let frame = build_frame(&to_docs(values), &settings, 0);

        for series in frame.iter() {
            let times: Vec<i64> = series.table.rows.iter().map(|row| seconds(&row.time)).collect();
            assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}

#[test]
fn test_rebuilding_gives_identical_bytes() {
    let mut rng = StdRng::seed_from_u64(99);
    for round in 0..ROUNDS {
        let settings = settings(&mut rng);
        let values: Vec<Value> = (0..30)
            .map(|_| {
                if rng.gen_bool(0.2) {
                    malformed_doc(&mut rng)
                } else {
                    valid_doc(&mut rng)
                }
            })
            .collect();
        let docs = to_docs(values);

        let first = serde_json::to_vec(&build_frame(&docs, &settings, round)).unwrap();
        let second = serde_json::to_vec(&build_frame(&docs, &settings, round)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_malformed_documents_change_nothing() {
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..ROUNDS {
        let settings = settings(&mut rng);
        let mut valid = Vec::new();
        let mut mixed = Vec::new();
        for _ in 0..30 {
            if rng.gen_bool(0.3) {
                mixed.push(malformed_doc(&mut rng));
            } else {
                let doc = valid_doc(&mut rng);
                valid.push(doc.clone());
                mixed.push(doc);
            }
        }

        let clean: Frame = build_frame(&to_docs(valid), &settings, 3);
        let noisy: Frame = build_frame(&to_docs(mixed), &settings, 3);
        assert_eq!(clean, noisy);
    }
}

#[test]
fn test_missing_secondary_projects_to_zero() {
    let mut rng = StdRng::seed_from_u64(42);
    let values: Vec<Value> = (0..50)
        .map(|i| {
            json!({
                "device": format!("dev:{}", i % 3),
                "time": rng.gen_range(0..1_000),
                "num_faces": rng.gen_range(1..8),
            })
        })
        .collect();

    let frame = build_frame(&to_docs(values), &PipelineSettings::default(), 0);
    for series in frame.iter() {
        let attention = series.table.column("Attention").unwrap();
        assert!(attention.iter().all(|x| *x == 0.0));
        assert!(series.table.column("People").unwrap().iter().all(|x| *x >= 1.0));
    }
}
