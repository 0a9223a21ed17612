//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

/// Trace text of an error attached to an `error` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    /// Messages of the `source()` chain, outermost first
    pub causes: Vec<String>,
    pub backtrace: Option<String>,
}

impl ErrorReport {
    /// Capture an error, its source chain and (when enabled through
    /// `RUST_BACKTRACE`) the current backtrace.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        let backtrace = Backtrace::capture();
        let backtrace = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };

        Self {
            message: error.to_string(),
            causes,
            backtrace,
        }
    }

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
            backtrace: None,
        }
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        for cause in &self.causes {
            writeln!(f, "Caused by: {}", cause)?;
        }
        if let Some(ref backtrace) = self.backtrace {
            write!(f, "{}", backtrace)?;
            if !backtrace.ends_with('\n') {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    /// Name of the component that produced the record
    pub target: Option<String>,
    pub template: String,
    pub params: Vec<String>,
    pub error: Option<ErrorReport>,
}

impl LogRecord {
    /// Sanitize message text to prevent log injection attacks
    ///
    /// A record's message must stay on one line; only the attached trace
    /// may span several.
    fn sanitize(message: &str) -> String {
        message.replace('\n', "\\n").replace('\r', "\\r")
    }

    pub fn new(level: LogLevel, template: impl AsRef<str>) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            target: None,
            template: Self::sanitize(template.as_ref()),
            params: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.params = params
            .into_iter()
            .map(|p| Self::sanitize(p.as_ref()))
            .collect();
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl AsRef<str>) -> Self {
        self.target = Some(Self::sanitize(target.as_ref()));
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: ErrorReport) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[derive(Debug, thiserror::Error)]
    #[error("could not reach database")]
    struct Unreachable(#[source] Refused);

    #[test]
    fn test_sanitizes_template_and_params() {
        let record = LogRecord::new(LogLevel::Info, "line one\nline two")
            .with_params(["a\r\nb"]);
        assert_eq!(record.template, "line one\\nline two");
        assert_eq!(record.params, vec!["a\\r\\nb".to_string()]);
    }

    #[test]
    fn test_sanitizes_target() {
        let record = LogRecord::new(LogLevel::Info, "hello").with_target("Db\n[ERROR] forged");
        assert_eq!(record.target.as_deref(), Some("Db\\n[ERROR] forged"));
    }

    #[test]
    fn test_error_report_walks_source_chain() {
        let err = Unreachable(Refused);
        let report = ErrorReport::from_error(&err);
        assert_eq!(report.message, "could not reach database");
        assert_eq!(report.causes, vec!["connection refused".to_string()]);
    }

    #[test]
    fn test_error_report_display() {
        let report = ErrorReport::new("outer").with_cause("inner");
        assert_eq!(report.to_string(), "outer\nCaused by: inner\n");
    }
}
