//! # customlog
//!
//! A small leveled logging library: `{}` placeholder messages, a pluggable
//! line formatter, and output to stderr or a size-rotated file that can be
//! redirected while other threads are logging.
//!
//! ## Features
//!
//! - **Leveled**: `DEBUG < INFO < WARN < ERROR`, with `ALL` and `OFF` thresholds
//! - **Cheap when off**: records below the threshold are dropped before
//!   any parameter is rendered
//! - **Rotating files**: bounded backups `app.log.1 .. app.log.N`
//! - **Properties config**: `logLevel`, `customLogFormatter`, `logFilePath`, ...
//!
//! ```no_run
//! use customlog::prelude::*;
//!
//! let logger = Logger::from_properties_file("config/logging.properties");
//! logger.info("started with {} workers", &[&4]);
//!
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! logger.error("flush failed for {}", Some(&err), &[&"orders"]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, RotationPolicy};
    pub use crate::core::{
        Appender, ErrorReport, Filter, Formatter, FormatterRegistry, LevelFilter, LineFormatter,
        LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, Result,
        SimpleFormatter, TimestampFormat,
    };
}

pub use appenders::{ConsoleAppender, FileAppender, RotatingFileSink, RotationPolicy};
pub use core::{
    global, render_message, AcceptAll, Appender, ErrorReport, Filter, Formatter,
    FormatterRegistry, LevelFilter, LineFormatter, LogLevel, LogRecord, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, Properties, Result, SimpleFormatter, TimestampFormat,
    DEFAULT_PROPERTIES_PATH,
};
