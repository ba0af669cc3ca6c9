//! Metric columns tracked for every device

use crate::frame::TIME_COLUMN;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Document field holding the primary people count
pub const PRIMARY_METRIC_FIELD: &str = "num_faces";

/// Document field holding the count of faces looking at the sensor
pub const SECONDARY_METRIC_FIELD: &str = "num_facing_faces";

/// One tracked metric: where it is read from and how it is labeled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricColumn {
    /// Field name in the raw document
    pub field: String,
    /// Column label in the projected series table
    pub label: String,
    /// Records missing the primary metric are dropped
    #[serde(default)]
    pub primary: bool,
}

impl MetricColumn {
    pub fn primary(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            primary: true,
        }
    }

    pub fn secondary(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            primary: false,
        }
    }
}

/// Errors found while validating a metric schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("metric schema has no columns")]
    Empty,
    #[error("metric schema needs exactly one primary column, found {0}")]
    PrimaryCount(usize),
    #[error("metric field '{0}' is listed more than once")]
    DuplicateField(String),
    #[error("metric label '{0}' is used more than once")]
    DuplicateLabel(String),
    #[error("metric label '{0}' is reserved for the row time")]
    ReservedLabel(String),
}

/// Ordered list of tracked metrics; column order in every table follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSchema {
    pub columns: Vec<MetricColumn>,
}

impl MetricSchema {
    pub fn new(columns: Vec<MetricColumn>) -> Self {
        Self { columns }
    }

    /// The primary column, if the schema has one
    pub fn primary(&self) -> Option<&MetricColumn> {
        self.columns.iter().find(|column| column.primary)
    }

    /// Column labels in schema order
    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.label.clone()).collect()
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let primaries = self.columns.iter().filter(|column| column.primary).count();
        if primaries != 1 {
            return Err(SchemaError::PrimaryCount(primaries));
        }

        let mut fields = HashSet::new();
        let mut labels = HashSet::new();
        for column in &self.columns {
            if !fields.insert(column.field.as_str()) {
                return Err(SchemaError::DuplicateField(column.field.clone()));
            }
            if column.label == TIME_COLUMN {
                return Err(SchemaError::ReservedLabel(column.label.clone()));
            }
            if !labels.insert(column.label.as_str()) {
                return Err(SchemaError::DuplicateLabel(column.label.clone()));
            }
        }

        Ok(())
    }
}

impl Default for MetricSchema {
    fn default() -> Self {
        Self {
            columns: vec![
                MetricColumn::primary(PRIMARY_METRIC_FIELD, "People"),
                MetricColumn::secondary(SECONDARY_METRIC_FIELD, "Attention"),
            ],
        }
    }
}
