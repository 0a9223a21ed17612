//! File appender implementation

use super::rotating_file::{RotatingFileSink, RotationPolicy};
use crate::core::{AcceptAll, Appender, Filter, Formatter, LineFormatter, LogRecord, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Filters, formats and writes records to a [`RotatingFileSink`]
pub struct FileAppender {
    sink: RotatingFileSink,
    formatter: Arc<dyn Formatter>,
    filter: Arc<dyn Filter>,
}

impl FileAppender {
    /// Open `path` with the default rotation policy and line format
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_policy(path.into(), RotationPolicy::default())
    }

    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        Ok(Self {
            sink: RotatingFileSink::open(path, policy)?,
            formatter: Arc::new(LineFormatter::new()),
            filter: Arc::new(AcceptAll),
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.sink.path()
    }

    #[must_use]
    pub fn sink(&self) -> &RotatingFileSink {
        &self.sink
    }
}

impl Appender for FileAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        if !self.filter.accept(record) {
            return Ok(());
        }
        let line = self.formatter.format(record);
        self.sink.append(&line)
    }

    fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }

    fn name(&self) -> &str {
        "file"
    }

    fn close(&mut self) -> Result<()> {
        self.sink.close()
    }

    fn set_formatter(&mut self, formatter: Arc<dyn Formatter>) {
        self.formatter = formatter;
    }

    fn set_filter(&mut self, filter: Arc<dyn Filter>) {
        self.filter = filter;
    }

    fn set_buffered(&mut self, buffered: bool) -> Result<()> {
        self.sink.set_buffered(buffered)
    }
}
