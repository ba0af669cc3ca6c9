//! Display time units for series rows

use crate::frame::DisplayTime;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How row timestamps are presented to the display layer.
///
/// The unit is chosen once for the whole pipeline, never per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeFormat {
    /// Milliseconds since the Unix epoch
    #[default]
    EpochMillis,
    /// Formatted wall clock time
    Clock {
        /// strftime pattern
        #[serde(default = "default_clock_pattern")]
        pattern: String,
        /// IANA timezone name; local time when absent
        #[serde(default)]
        timezone: Option<String>,
    },
}

fn default_clock_pattern() -> String {
    "%X".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
    #[error("invalid time pattern '{0}'")]
    InvalidPattern(String),
}

impl TimeFormat {
    /// Resolve the format into a formatter, validating pattern and timezone
    pub fn formatter(&self) -> Result<TimeFormatter, TimeFormatError> {
        match self {
            TimeFormat::EpochMillis => Ok(TimeFormatter::EpochMillis),
            TimeFormat::Clock { pattern, timezone } => {
                if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                    return Err(TimeFormatError::InvalidPattern(pattern.clone()));
                }
                match timezone {
                    None => Ok(TimeFormatter::Local {
                        pattern: pattern.clone(),
                    }),
                    Some(name) => {
                        let tz = name
                            .parse::<Tz>()
                            .map_err(|_| TimeFormatError::UnknownTimezone(name.clone()))?;
                        Ok(TimeFormatter::Zoned {
                            pattern: pattern.clone(),
                            tz,
                        })
                    }
                }
            }
        }
    }
}

/// A validated [`TimeFormat`]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TimeFormatter {
    #[default]
    EpochMillis,
    Local { pattern: String },
    Zoned { pattern: String, tz: Tz },
}

impl TimeFormatter {
    pub fn display_time(&self, timestamp: i64) -> DisplayTime {
        let pattern = match self {
            TimeFormatter::EpochMillis => {
                return DisplayTime::Millis(timestamp.saturating_mul(1000));
            }
            TimeFormatter::Local { pattern } | TimeFormatter::Zoned { pattern, .. } => pattern,
        };

        // Outside chrono's range the raw seconds are shown instead
        let Some(utc) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
            return DisplayTime::Text(timestamp.to_string());
        };

        let text = match self {
            TimeFormatter::Zoned { tz, .. } => utc.with_timezone(tz).format(pattern).to_string(),
            _ => utc.with_timezone(&Local).format(pattern).to_string(),
        };
        DisplayTime::Text(text)
    }
}
