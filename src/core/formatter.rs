//! Line formatters
//!
//! A formatter turns one [`LogRecord`] into the text written to a sink. The
//! built-in [`LineFormatter`] produces
//!
//! ```text
//! [2025-01-08 10:30:45.123] [INFO] value=x count=3
//! ```
//!
//! and substitutes positional parameters into `{}` placeholders. Formatting
//! never fails: any combination of template and parameters renders to a line.

use super::error::{LoggerError, Result};
use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Placeholder token replaced by a positional parameter
pub const PLACEHOLDER: &str = "{}";

/// Renders a record into newline-terminated text
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
    fn name(&self) -> &str;
}

/// Substitute `params` into `template`.
///
/// - With `{}` tokens and at least one parameter, parameters fill the
///   placeholders in order. A placeholder left without a parameter stays as
///   `{}`. The first parameter beyond the last placeholder is appended as
///   ` [param]`; anything after that is dropped.
/// - Without `{}` tokens and exactly one parameter, the parameter is
///   appended as ` [param]`.
/// - Otherwise the template is returned unchanged.
///
/// ```
/// use customlog::core::formatter::render_message;
///
/// let params = vec!["x".to_string(), "3".to_string()];
/// assert_eq!(render_message("value={} count={}", &params), "value=x count=3");
/// assert_eq!(render_message("hello", &["42".to_string()]), "hello [42]");
/// ```
#[must_use]
pub fn render_message(template: &str, params: &[String]) -> String {
    if params.is_empty() {
        return template.to_string();
    }

    if template.contains(PLACEHOLDER) {
        let mut pieces = template.split(PLACEHOLDER);
        let mut out = String::with_capacity(template.len() + params.len() * 8);
        out.push_str(pieces.next().unwrap_or_default());

        let mut used = 0;
        for piece in pieces {
            match params.get(used) {
                Some(param) => {
                    out.push_str(param);
                    used += 1;
                }
                None => out.push_str(PLACEHOLDER),
            }
            out.push_str(piece);
        }

        if let Some(extra) = params.get(used) {
            out.push_str(" [");
            out.push_str(extra);
            out.push(']');
        }
        out
    } else if params.len() == 1 {
        format!("{} [{}]", template, params[0])
    } else {
        template.to_string()
    }
}

fn append_trace(line: &mut String, record: &LogRecord) {
    if let Some(ref error) = record.error {
        line.push_str(&error.to_string());
    }
}

/// Default `[timestamp] [LEVEL] message` formatter
#[derive(Debug, Clone, Default)]
pub struct LineFormatter {
    timestamp_format: TimestampFormat,
}

impl LineFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timestamp format for this formatter
    ///
    /// ```
    /// use customlog::core::{LineFormatter, TimestampFormat};
    ///
    /// let formatter = LineFormatter::new().with_timestamp_format(TimestampFormat::Seconds);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl Formatter for LineFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut line = format!(
            "[{}] [{}] ",
            self.timestamp_format.format(&record.timestamp),
            record.level
        );
        if let Some(ref target) = record.target {
            line.push('[');
            line.push_str(target);
            line.push_str("] ");
        }
        line.push_str(&render_message(&record.template, &record.params));
        line.push('\n');
        append_trace(&mut line, record);
        line
    }

    fn name(&self) -> &str {
        "line"
    }
}

/// `timestamp LEVEL: message` formatter
#[derive(Debug, Clone, Default)]
pub struct SimpleFormatter {
    timestamp_format: TimestampFormat,
}

impl SimpleFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl Formatter for SimpleFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let message = render_message(&record.template, &record.params);
        let mut line = match record.target {
            Some(ref target) => format!(
                "{} {}: [{}] {}\n",
                self.timestamp_format.format(&record.timestamp),
                record.level,
                target,
                message
            ),
            None => format!(
                "{} {}: {}\n",
                self.timestamp_format.format(&record.timestamp),
                record.level,
                message
            ),
        };
        append_trace(&mut line, record);
        line
    }

    fn name(&self) -> &str {
        "simple"
    }
}

type FormatterFactory = Arc<dyn Fn() -> Arc<dyn Formatter> + Send + Sync>;

/// Lookup table from configuration names to formatter constructors
///
/// # Examples
///
/// ```
/// use customlog::core::{FormatterRegistry, LineFormatter, TimestampFormat};
/// use std::sync::Arc;
///
/// let mut registry = FormatterRegistry::default();
/// registry.register("coarse", || {
///     Arc::new(LineFormatter::new().with_timestamp_format(TimestampFormat::Seconds))
/// });
///
/// assert!(registry.create("coarse").is_ok());
/// assert!(registry.create("simple").is_ok());
/// assert!(registry.create("missing").is_err());
/// ```
#[derive(Clone)]
pub struct FormatterRegistry {
    factories: HashMap<String, FormatterFactory>,
}

impl FormatterRegistry {
    /// Name the default formatter is registered under
    pub const DEFAULT: &'static str = "default";

    /// Registry without any entries
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn Formatter> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Instantiate the formatter registered under `name`.
    ///
    /// Qualified names such as `com.example.SimpleFormatter` or
    /// `my_crate::SimpleFormatter` fall back to their last path segment,
    /// which must match a registered name exactly.
    ///
    /// ```
    /// use customlog::core::FormatterRegistry;
    ///
    /// let registry = FormatterRegistry::default();
    /// assert_eq!(registry.create("my_crate::SimpleFormatter").unwrap().name(), "simple");
    /// assert!(registry.create("my_crate::Simple").is_err());
    /// ```
    pub fn create(&self, name: &str) -> Result<Arc<dyn Formatter>> {
        self.resolve(name)
            .map(|factory| factory())
            .ok_or_else(|| LoggerError::unknown_formatter(name))
    }

    fn resolve(&self, name: &str) -> Option<&FormatterFactory> {
        let name = name.trim();
        self.factories.get(name).or_else(|| {
            let short = name.rsplit(['.', ':']).next()?;
            self.factories.get(short)
        })
    }
}

impl Default for FormatterRegistry {
    /// Registry holding the built-in formatters
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Self::DEFAULT, || Arc::new(LineFormatter::new()));
        registry.register("line", || Arc::new(LineFormatter::new()));
        registry.register("LineFormatter", || Arc::new(LineFormatter::new()));
        registry.register("simple", || Arc::new(SimpleFormatter::new()));
        registry.register("SimpleFormatter", || Arc::new(SimpleFormatter::new()));
        registry
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("names", &self.names())
            .finish()
    }
}
