//! Console appender implementation
//!
//! Writes to stderr. This is where records go until a logger is given an
//! output path, and where it falls back to if that path cannot be opened.

use crate::core::{AcceptAll, Appender, Filter, Formatter, LineFormatter, LogRecord, Result};
use std::io::Write;
use std::sync::Arc;

pub struct ConsoleAppender {
    use_colors: bool,
    formatter: Arc<dyn Formatter>,
    filter: Arc<dyn Filter>,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: false,
            formatter: Arc::new(LineFormatter::new()),
            filter: Arc::new(AcceptAll),
        }
    }

    /// Colorize lines by level. Only takes effect with the `console` feature.
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
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

    fn render(&self, record: &LogRecord) -> String {
        let text = self.formatter.format(record);
        #[cfg(feature = "console")]
        if self.use_colors {
            use colored::Colorize;
            return text.color(record.level.color_code()).to_string();
        }
        text
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        if !self.filter.accept(record) {
            return Ok(());
        }
        let output = self.render(record);
        // Lock once so the line is not interleaved with other stderr writers
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn set_formatter(&mut self, formatter: Arc<dyn Formatter>) {
        self.formatter = formatter;
    }

    fn set_filter(&mut self, filter: Arc<dyn Filter>) {
        self.filter = filter;
    }
}
