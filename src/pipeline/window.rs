//! Per-device trailing windows
//!
//! Windows are rebuilt from scratch for every snapshot. Nothing is carried
//! over between snapshots, so a record that falls out of one snapshot's
//! window is gone even if a later snapshot has an older newest record.

use headcount_types::EventRecord;
use std::collections::HashMap;

/// Time-ordered records of one device, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceWindow {
    pub device_id: String,
    pub records: Vec<EventRecord>,
}

impl DeviceWindow {
    fn new(device_id: String) -> Self {
        Self {
            device_id,
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The newest record
    pub fn latest(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// Sort by timestamp (stable, ties keep input order) and drop records at
    /// or before the cutoff
    fn retain_recent(&mut self, window_seconds: u64) {
        self.records.sort_by_key(|record| record.timestamp);
        let Some(newest) = self.records.last().map(|record| record.timestamp) else {
            return;
        };
        let cutoff = cutoff(newest, window_seconds);
        let expired = self.records.partition_point(|record| record.timestamp <= cutoff);
        self.records.drain(..expired);
    }
}

/// Oldest timestamp that is no longer inside the window ending at `newest`
pub fn cutoff(newest: i64, window_seconds: u64) -> i64 {
    newest.saturating_sub(i64::try_from(window_seconds).unwrap_or(i64::MAX))
}

/// Group records by device and keep each device's trailing window.
///
/// Devices come out in the order they were first seen in `records`. Every
/// device present in the batch gets a window, which is empty only when
/// `window_seconds` is zero.
pub fn build_windows(records: Vec<EventRecord>, window_seconds: u64) -> Vec<DeviceWindow> {
    let mut windows: Vec<DeviceWindow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let slot = match index.get(&record.device_id) {
            Some(&slot) => slot,
            None => {
                index.insert(record.device_id.clone(), windows.len());
                windows.push(DeviceWindow::new(record.device_id.clone()));
                windows.len() - 1
            }
        };
        windows[slot].records.push(record);
    }

    for window in &mut windows {
        window.retain_recent(window_seconds);
    }

    windows
}
