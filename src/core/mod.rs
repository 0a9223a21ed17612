//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod properties;
pub mod timestamp;

pub use appender::Appender;
pub use config::{LoggerConfig, DEFAULT_PROPERTIES_PATH};
pub use error::{LoggerError, Result};
pub use filter::{AcceptAll, Filter};
pub use formatter::{render_message, Formatter, FormatterRegistry, LineFormatter, SimpleFormatter};
pub use log_level::{LevelFilter, LogLevel};
pub use log_record::{ErrorReport, LogRecord};
pub use logger::{global, Logger, LoggerBuilder};
pub use properties::Properties;
pub use timestamp::TimestampFormat;
