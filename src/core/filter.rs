//! Record filters applied by appenders before formatting

use super::log_record::LogRecord;

/// Decides whether a record reaches an appender's sink
///
/// Rejected records are dropped before any formatting or I/O. Closures with
/// the right signature are filters too:
///
/// ```
/// use customlog::core::{Filter, LogLevel, LogRecord};
///
/// let no_heartbeats = |record: &LogRecord| !record.template.starts_with("heartbeat");
/// assert!(!no_heartbeats.accept(&LogRecord::new(LogLevel::Debug, "heartbeat ok")));
/// ```
pub trait Filter: Send + Sync {
    fn accept(&self, record: &LogRecord) -> bool;
}

/// Pass-through filter
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Filter for AcceptAll {
    #[inline]
    fn accept(&self, _record: &LogRecord) -> bool {
        true
    }
}

impl<F> Filter for F
where
    F: Fn(&LogRecord) -> bool + Send + Sync,
{
    fn accept(&self, record: &LogRecord) -> bool {
        self(record)
    }
}
