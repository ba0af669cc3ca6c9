//! Projection of device windows into display tables

use super::window::DeviceWindow;
use headcount_types::{MetricSchema, SeriesRow, SeriesTable, TimeFormatter};

/// Build the series table for one window.
///
/// Rows keep the window's oldest-first order. Secondary metrics missing
/// from a record project to `0.0`; `latest` is the primary metric of the
/// newest record.
pub fn project(
    window: &DeviceWindow,
    schema: &MetricSchema,
    formatter: &TimeFormatter,
) -> SeriesTable {
    let rows = window
        .records
        .iter()
        .map(|record| SeriesRow {
            time: formatter.display_time(record.timestamp),
            values: schema
                .columns
                .iter()
                .map(|column| record.metric(&column.field).unwrap_or(0.0))
                .collect(),
        })
        .collect();

    let latest = schema
        .primary()
        .and_then(|primary| window.latest()?.metric(&primary.field));

    SeriesTable {
        columns: schema.labels(),
        rows,
        latest,
    }
}
