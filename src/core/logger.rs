//! Main logger implementation

use super::{
    appender::Appender,
    config::{LoggerConfig, DEFAULT_PROPERTIES_PATH},
    error::{LoggerError, Result},
    filter::{AcceptAll, Filter},
    formatter::{Formatter, FormatterRegistry, LineFormatter},
    log_level::{LevelFilter, LogLevel},
    log_record::{ErrorReport, LogRecord},
};
use crate::appenders::{ConsoleAppender, FileAppender, RotationPolicy};
use parking_lot::{Mutex, RwLock};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Settings used whenever the sink is rebuilt
struct SinkSettings {
    formatter: Arc<dyn Formatter>,
    filter: Arc<dyn Filter>,
    rotation: RotationPolicy,
    output_path: Option<PathBuf>,
}

impl SinkSettings {
    fn console(&self) -> Box<dyn Appender> {
        Box::new(
            ConsoleAppender::new()
                .with_formatter(Arc::clone(&self.formatter))
                .with_filter(Arc::clone(&self.filter)),
        )
    }

    fn file(&self, path: &Path) -> Result<Box<dyn Appender>> {
        let appender = FileAppender::with_policy(path, self.rotation.clone())?
            .with_formatter(Arc::clone(&self.formatter))
            .with_filter(Arc::clone(&self.filter));
        Ok(Box::new(appender))
    }
}

struct Shared {
    min_level: RwLock<LevelFilter>,
    appender: Mutex<Box<dyn Appender>>,
    settings: RwLock<SinkSettings>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Err(e) = self.appender.get_mut().close() {
            eprintln!("[LOGGER ERROR] Failed to close sink during shutdown: {}", e);
        }
    }
}

/// Leveled logging facade over a single sink
///
/// `Logger` is a cheap handle: clones and [`Logger::named`] handles share
/// the same threshold, formatter and sink. The host builds one at startup
/// and passes it to the code that logs.
///
/// # Example
///
/// ```no_run
/// use customlog::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LevelFilter::Info)
///     .output_path("logs/app.log")
///     .build();
///
/// logger.info("value={} count={}", &[&"x", &3]);
/// logger.debug("dropped below threshold", &[]);
///
/// let db = logger.named("Database");
/// db.warn("pool at {}%", &[&92]);
/// ```
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    target: Option<Arc<str>>,
}

impl Logger {
    /// Logger that writes everything to stderr with the line format
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Build a logger from a config, resolving the formatter in `registry`
    ///
    /// An unknown formatter falls back to [`LineFormatter`] and is reported
    /// on stderr.
    #[must_use]
    pub fn from_config(config: &LoggerConfig, registry: &FormatterRegistry) -> Self {
        Self::configure(config.clone(), registry, Vec::new())
    }

    /// Build a logger from a properties file with the built-in formatters
    ///
    /// A missing file or bad values fall back to defaults. Problems are
    /// reported on stderr, never returned to the caller, since the file sink
    /// may be the very thing that failed to configure.
    #[must_use]
    pub fn from_properties_file<P: AsRef<Path>>(path: P) -> Self {
        Self::from_properties_file_with_registry(path, &FormatterRegistry::default())
    }

    #[must_use]
    pub fn from_properties_file_with_registry<P: AsRef<Path>>(
        path: P,
        registry: &FormatterRegistry,
    ) -> Self {
        let (config, problems) = LoggerConfig::load(path, registry);
        Self::configure(config, registry, problems)
    }

    fn configure(
        config: LoggerConfig,
        registry: &FormatterRegistry,
        mut problems: Vec<LoggerError>,
    ) -> Self {
        let formatter = registry.create(&config.formatter).unwrap_or_else(|e| {
            problems.push(e);
            Arc::new(LineFormatter::new()) as Arc<dyn Formatter>
        });

        let mut builder = LoggerBuilder::new()
            .min_level(config.level)
            .formatter_arc(formatter)
            .rotation(config.rotation);
        if let Some(path) = config.output_path {
            builder = builder.output_path(path);
        }
        for problem in &problems {
            eprintln!(
                "[LOGGER ERROR] Configuration fell back to defaults: {}",
                problem
            );
        }
        builder.build()
    }

    /// Handle sharing this logger's state that stamps records with `target`
    #[must_use]
    pub fn named(&self, target: impl AsRef<str>) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            target: Some(Arc::from(target.as_ref())),
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn set_level(&self, level: LevelFilter) {
        *self.shared.min_level.write() = level;
    }

    #[must_use]
    pub fn level(&self) -> LevelFilter {
        *self.shared.min_level.read()
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.shared.min_level.read().allows(level)
    }

    /// Redirect output to a rotating file at `path`
    ///
    /// The current sink is flushed and closed and the new one attached while
    /// holding the sink lock, so concurrent calls write either to the old
    /// file or to the new one. When `path` cannot be opened the logger falls
    /// back to stderr and the error is returned.
    pub fn set_output_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut appender = self.shared.appender.lock();
        let mut settings = self.shared.settings.write();

        if let Err(e) = appender.close() {
            eprintln!(
                "[LOGGER ERROR] Failed to close {} sink: {}",
                appender.name(),
                e
            );
        }

        match settings.file(path) {
            Ok(file) => {
                *appender = file;
                settings.output_path = Some(path.to_path_buf());
                Ok(())
            }
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Cannot open log file '{}': {}. Falling back to stderr.",
                    path.display(),
                    e
                );
                *appender = settings.console();
                settings.output_path = None;
                Err(e)
            }
        }
    }

    /// Path of the active file sink, `None` while writing to stderr
    #[must_use]
    pub fn output_path(&self) -> Option<PathBuf> {
        self.shared.settings.read().output_path.clone()
    }

    pub fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        let mut appender = self.shared.appender.lock();
        appender.set_formatter(Arc::clone(&formatter));
        self.shared.settings.write().formatter = formatter;
    }

    pub fn set_filter(&self, filter: Arc<dyn Filter>) {
        let mut appender = self.shared.appender.lock();
        appender.set_filter(Arc::clone(&filter));
        self.shared.settings.write().filter = filter;
    }

    /// Switch the file sink between buffered and write-through mode
    pub fn set_buffered(&self, buffered: bool) -> Result<()> {
        let mut appender = self.shared.appender.lock();
        self.shared.settings.write().rotation.buffered = buffered;
        appender.set_buffered(buffered)
    }

    /// Replace the sink with a caller-provided appender
    pub fn set_appender(&self, new_appender: Box<dyn Appender>) {
        let mut appender = self.shared.appender.lock();
        if let Err(e) = appender.close() {
            eprintln!(
                "[LOGGER ERROR] Failed to close {} sink: {}",
                appender.name(),
                e
            );
        }
        *appender = new_appender;
        self.shared.settings.write().output_path = None;
    }

    pub fn flush(&self) -> Result<()> {
        self.shared.appender.lock().flush()
    }

    /// Log `template` at `level`, substituting `params` into `{}` placeholders
    ///
    /// Below the threshold this returns before rendering any parameter.
    pub fn log(&self, level: LogLevel, template: &str, params: &[&dyn Display]) {
        self.log_with_error(level, template, None, params);
    }

    pub fn log_with_error(
        &self,
        level: LogLevel,
        template: &str,
        error: Option<&(dyn std::error::Error + 'static)>,
        params: &[&dyn Display],
    ) {
        if !self.is_enabled(level) {
            return;
        }

        let mut record =
            LogRecord::new(level, template).with_params(params.iter().map(|p| p.to_string()));
        if let Some(ref target) = self.target {
            record = record.with_target(target);
        }
        if let Some(error) = error {
            record = record.with_error(ErrorReport::from_error(error));
        }
        self.write_record(&record);
    }

    /// Hand an already built record to the sink, bypassing the threshold
    ///
    /// Sink failures and panics are reported on stderr and never reach the
    /// caller.
    pub fn write_record(&self, record: &LogRecord) {
        let mut appender = self.shared.appender.lock();
        let result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| appender.append(record)));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] {} sink failed: {}", appender.name(), e);
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] {} sink panicked: {}",
                    appender.name(),
                    panic_msg
                );
            }
        }
    }

    #[inline]
    pub fn debug(&self, template: &str, params: &[&dyn Display]) {
        self.log(LogLevel::Debug, template, params);
    }

    #[inline]
    pub fn info(&self, template: &str, params: &[&dyn Display]) {
        self.log(LogLevel::Info, template, params);
    }

    #[inline]
    pub fn warn(&self, template: &str, params: &[&dyn Display]) {
        self.log(LogLevel::Warn, template, params);
    }

    /// Log at `ERROR`; with an error attached its trace follows the message line
    #[inline]
    pub fn error(
        &self,
        template: &str,
        error: Option<&(dyn std::error::Error + 'static)>,
        params: &[&dyn Display],
    ) {
        self.log_with_error(LogLevel::Error, template, error, params);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Process-wide logger configured from [`DEFAULT_PROPERTIES_PATH`] on first use
///
/// Prefer constructing a [`Logger`] at startup and passing it around; this
/// exists for code that has no such composition root.
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(|| Logger::from_properties_file(DEFAULT_PROPERTIES_PATH))
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use customlog::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LevelFilter::Debug)
///     .formatter(SimpleFormatter::new())
///     .rotation(RotationPolicy::new().with_max_size(64 * 1024))
///     .build();
/// assert!(logger.is_enabled(LogLevel::Debug));
/// ```
pub struct LoggerBuilder {
    min_level: LevelFilter,
    formatter: Arc<dyn Formatter>,
    filter: Arc<dyn Filter>,
    rotation: RotationPolicy,
    output_path: Option<PathBuf>,
    appender: Option<Box<dyn Appender>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LevelFilter::All,
            formatter: Arc::new(LineFormatter::new()),
            filter: Arc::new(AcceptAll),
            rotation: RotationPolicy::default(),
            output_path: None,
            appender: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LevelFilter) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter(self, formatter: impl Formatter + 'static) -> Self {
        self.formatter_arc(Arc::new(formatter))
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter_arc(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.rotation.buffered = buffered;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Use a custom sink instead of stderr or a rotating file
    #[must_use = "builder methods return a new value"]
    pub fn appender(mut self, appender: impl Appender + 'static) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    /// Build the logger
    ///
    /// An output path that cannot be opened is reported on stderr and the
    /// logger writes to stderr instead.
    #[must_use]
    pub fn build(self) -> Logger {
        let mut settings = SinkSettings {
            formatter: self.formatter,
            filter: self.filter,
            rotation: self.rotation,
            output_path: None,
        };

        let appender = match (self.appender, self.output_path) {
            (Some(appender), _) => appender,
            (None, Some(path)) => match settings.file(&path) {
                Ok(file) => {
                    settings.output_path = Some(path);
                    file
                }
                Err(e) => {
                    eprintln!(
                        "[LOGGER ERROR] Cannot open log file '{}': {}. Falling back to stderr.",
                        path.display(),
                        e
                    );
                    settings.console()
                }
            },
            (None, None) => settings.console(),
        };

        Logger {
            shared: Arc::new(Shared {
                min_level: RwLock::new(self.min_level),
                appender: Mutex::new(appender),
                settings: RwLock::new(settings),
            }),
            target: None,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
