//! Appender trait for log output destinations

use super::{error::Result, filter::Filter, formatter::Formatter, log_record::LogRecord};
use std::sync::Arc;

pub trait Appender: Send + Sync {
    fn append(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Flush and release the underlying destination. Called once when the
    /// appender is detached from a logger.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn set_formatter(&mut self, _formatter: Arc<dyn Formatter>) {}

    fn set_filter(&mut self, _filter: Arc<dyn Filter>) {}

    /// Switch write-through mode on destinations that buffer
    fn set_buffered(&mut self, _buffered: bool) -> Result<()> {
        Ok(())
    }
}
