//! Timestamp formatting utilities
//!
//! Log lines carry local wall-clock time. The default pattern is
//! `2025-01-08 10:30:45.123`.

use chrono::{DateTime, Local};
use std::fmt::Write;

const MILLIS_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.3f";
const SECONDS_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use customlog::core::TimestampFormat;
/// use chrono::Local;
///
/// let format = TimestampFormat::Millis;
/// let timestamp = format.format(&Local::now());
/// assert_eq!(timestamp.len(), "2025-01-08 10:30:45.123".len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// Millisecond precision: `2025-01-08 10:30:45.123`
    #[default]
    Millis,

    /// Second precision: `2025-01-08 10:30:45`
    Seconds,

    /// RFC 3339 with the local offset: `2025-01-08T10:30:45.123+01:00`
    Rfc3339,

    /// Custom strftime format
    ///
    /// An invalid pattern never fails a log call; the millisecond pattern
    /// is used instead.
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::Millis => datetime.format(MILLIS_PATTERN).to_string(),
            TimestampFormat::Seconds => datetime.format(SECONDS_PATTERN).to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Custom(pattern) => {
                let mut out = String::new();
                if write!(out, "{}", datetime.format(pattern)).is_err() {
                    return datetime.format(MILLIS_PATTERN).to_string();
                }
                out
            }
        }
    }
}
