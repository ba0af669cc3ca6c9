//! Render-ready series tables and the frames that carry them

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the time value in [`SeriesTable::row_objects`]; no metric may use it
pub const TIME_COLUMN: &str = "time";

/// Time value of a row, in the unit the display layer was configured for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayTime {
    /// Milliseconds since the Unix epoch
    Millis(i64),
    /// Pre-formatted clock string
    Text(String),
}

impl From<DisplayTime> for Value {
    fn from(time: DisplayTime) -> Self {
        match time {
            DisplayTime::Millis(ms) => Value::from(ms),
            DisplayTime::Text(text) => Value::from(text),
        }
    }
}

/// One row of a series table; `values` follow the table's column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub time: DisplayTime,
    pub values: Vec<f64>,
}

/// Ordered rows for one device, oldest first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesTable {
    /// Metric column labels
    pub columns: Vec<String>,
    pub rows: Vec<SeriesRow>,
    /// Primary metric of the newest row
    pub latest: Option<f64>,
}

impl SeriesTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == label)
    }

    /// All values of one column, in row order
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let index = self.column_index(label)?;
        Some(self.rows.iter().map(|row| row.values[index]).collect())
    }

    /// A single cell
    pub fn value(&self, row: usize, label: &str) -> Option<f64> {
        let index = self.column_index(label)?;
        self.rows.get(row).map(|row| row.values[index])
    }

    /// Rows as `{time, <column>: value, ...}` objects, the shape chart
    /// surfaces consume
    pub fn row_objects(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                let mut object = Map::with_capacity(self.columns.len() + 1);
                object.insert(TIME_COLUMN.to_string(), row.time.clone().into());
                for (label, value) in self.columns.iter().zip(&row.values) {
                    object.insert(label.clone(), Value::from(*value));
                }
                object
            })
            .collect()
    }
}

/// The series table of one device within a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSeries {
    pub device_id: String,
    pub table: SeriesTable,
}

/// Complete per-device output of one snapshot.
///
/// Devices keep the order in which they were first seen in the snapshot.
/// Frames are never merged; each one replaces the previous wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Position of the source snapshot in the handler's delivery order
    pub sequence: u64,
    pub devices: Vec<DeviceSeries>,
}

impl Frame {
    pub fn empty(sequence: u64) -> Self {
        Self {
            sequence,
            devices: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, device_id: &str) -> Option<&SeriesTable> {
        self.devices
            .iter()
            .find(|series| series.device_id == device_id)
            .map(|series| &series.table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceSeries> {
        self.devices.iter()
    }

    pub fn device_ids(&self) -> Vec<&str> {
        self.devices.iter().map(|series| series.device_id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> SeriesTable {
        SeriesTable {
            columns: vec!["People".to_string(), "Attention".to_string()],
            rows: vec![
                SeriesRow {
                    time: DisplayTime::Millis(100_000),
                    values: vec![2.0, 0.0],
                },
                SeriesRow {
                    time: DisplayTime::Millis(160_000),
                    values: vec![3.0, 1.0],
                },
            ],
            latest: Some(3.0),
        }
    }

    #[test]
    fn test_column_lookup() {
        let table = table();
        assert_eq!(table.column("People"), Some(vec![2.0, 3.0]));
        assert_eq!(table.value(1, "Attention"), Some(1.0));
        assert_eq!(table.column("Missing"), None);
        assert_eq!(table.value(5, "People"), None);
    }

    #[test]
    fn test_row_objects_shape() {
        let rows = table().row_objects();
        assert_eq!(
            Value::Object(rows[0].clone()),
            json!({"time": 100000, "People": 2.0, "Attention": 0.0})
        );
    }

    #[test]
    fn test_text_time_serializes_untagged() {
        let json = serde_json::to_value(DisplayTime::Text("12:00:00".to_string())).unwrap();
        assert_eq!(json, json!("12:00:00"));
    }

    #[test]
    fn test_frame_lookup_keeps_order() {
        let frame = Frame {
            sequence: 3,
            devices: vec![
                DeviceSeries {
                    device_id: "b".to_string(),
                    table: SeriesTable::default(),
                },
                DeviceSeries {
                    device_id: "a".to_string(),
                    table: table(),
                },
            ],
        };
        assert_eq!(frame.device_ids(), vec!["b", "a"]);
        assert_eq!(frame.get("a").map(|t| t.len()), Some(2));
        assert!(frame.get("c").is_none());
    }
}
