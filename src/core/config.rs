//! Logger configuration read from a properties source
//!
//! Recognized keys:
//!
//! | key                  | meaning                                 | default     |
//! |----------------------|-----------------------------------------|-------------|
//! | `logLevel`           | threshold (`ALL`, `DEBUG`, ..., `OFF`)  | `ALL`       |
//! | `customLogFormatter` | formatter name in the registry          | `default`   |
//! | `logFilePath`        | output file; console when absent        | none        |
//! | `logFileLimit`       | rotation threshold in bytes, 0 = never  | `6000`      |
//! | `logFileCount`       | number of backups kept                  | `1`         |
//! | `logFileBuffered`    | buffer writes until flush               | `true`      |
//! | `logFileAppend`      | keep existing content on open           | `true`      |
//!
//! A bad value never aborts configuration: the key keeps its default and the
//! problem is returned alongside the config so the logger can report it.
//!
//! The same settings can also come from a JSON document, which is checked
//! strictly:
//!
//! ```json
//! {
//!   "level": "WARN",
//!   "formatter": "simple",
//!   "output_path": "logs/app.log",
//!   "rotation": { "max_bytes": 1048576, "max_backups": 3 }
//! }
//! ```

use super::error::{LoggerError, Result};
use super::formatter::FormatterRegistry;
use super::log_level::LevelFilter;
use super::properties::Properties;
use crate::appenders::rotating_file::RotationPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Properties file consulted by [`crate::global`]
pub const DEFAULT_PROPERTIES_PATH: &str = "config/logging.properties";

pub mod keys {
    pub const LOG_LEVEL: &str = "logLevel";
    pub const CUSTOM_LOG_FORMATTER: &str = "customLogFormatter";
    pub const LOG_FILE_PATH: &str = "logFilePath";
    pub const LOG_FILE_LIMIT: &str = "logFileLimit";
    pub const LOG_FILE_COUNT: &str = "logFileCount";
    pub const LOG_FILE_BUFFERED: &str = "logFileBuffered";
    pub const LOG_FILE_APPEND: &str = "logFileAppend";
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub level: LevelFilter,
    /// Registry name of the formatter
    pub formatter: String,
    pub output_path: Option<PathBuf>,
    pub rotation: RotationPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::All,
            formatter: FormatterRegistry::DEFAULT.to_string(),
            output_path: None,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LoggerConfig {
    /// Build a config from parsed properties
    ///
    /// Returns the config together with every problem found; each faulty
    /// key falls back to its default.
    pub fn from_properties(
        props: &Properties,
        registry: &FormatterRegistry,
    ) -> (Self, Vec<LoggerError>) {
        let mut config = Self::default();
        let mut problems = Vec::new();

        if let Some(level) = parse_key::<LevelFilter>(props, keys::LOG_LEVEL, &mut problems) {
            config.level = level;
        }

        if let Some(name) = props.get(keys::CUSTOM_LOG_FORMATTER) {
            let name = name.trim();
            if !name.is_empty() {
                if registry.contains(name) {
                    config.formatter = name.to_string();
                } else {
                    problems.push(LoggerError::unknown_formatter(name));
                }
            }
        }

        if let Some(path) = props.get(keys::LOG_FILE_PATH) {
            let path = path.trim();
            if !path.is_empty() {
                config.output_path = Some(PathBuf::from(path));
            }
        }

        if let Some(limit) = parse_key::<u64>(props, keys::LOG_FILE_LIMIT, &mut problems) {
            config.rotation.max_bytes = limit;
        }
        if let Some(count) = parse_key::<usize>(props, keys::LOG_FILE_COUNT, &mut problems) {
            if count == 0 {
                problems.push(LoggerError::config(
                    keys::LOG_FILE_COUNT,
                    "must be at least 1",
                ));
            } else {
                config.rotation.max_backups = count;
            }
        }
        if let Some(buffered) = parse_bool(props, keys::LOG_FILE_BUFFERED, &mut problems) {
            config.rotation.buffered = buffered;
        }
        if let Some(append) = parse_bool(props, keys::LOG_FILE_APPEND, &mut problems) {
            config.rotation.append = append;
        }

        (config, problems)
    }

    /// Load a properties file and build a config from it
    ///
    /// A missing or unreadable file yields the default config and the IO
    /// error as its only problem.
    pub fn load<P: AsRef<Path>>(
        path: P,
        registry: &FormatterRegistry,
    ) -> (Self, Vec<LoggerError>) {
        match Properties::load(path) {
            Ok(props) => Self::from_properties(&props, registry),
            Err(e) => (Self::default(), vec![e]),
        }
    }

    /// Parse a JSON config; omitted fields keep their defaults
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, unknown fields, an unknown level or
    /// formatter name, or an invalid rotation policy.
    pub fn from_json(text: &str, registry: &FormatterRegistry) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if !registry.contains(&config.formatter) {
            return Err(LoggerError::unknown_formatter(config.formatter));
        }
        config.rotation.validate()?;
        Ok(config)
    }

    pub fn load_json<P: AsRef<Path>>(path: P, registry: &FormatterRegistry) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading JSON config",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&text, registry)
    }

    /// Strict variant of [`LoggerConfig::load`] that fails on the first problem
    pub fn try_load<P: AsRef<Path>>(path: P, registry: &FormatterRegistry) -> Result<Self> {
        let (config, problems) = Self::load(path, registry);
        let first = problems.into_iter().next();
        match first {
            Some(e) => Err(e),
            None => Ok(config),
        }
    }
}

fn parse_key<T>(props: &Properties, key: &str, problems: &mut Vec<LoggerError>) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = props.get(key)?.trim();
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            problems.push(LoggerError::config(key, format!("'{}': {}", raw, e)));
            None
        }
    }
}

fn parse_bool(props: &Properties, key: &str, problems: &mut Vec<LoggerError>) -> Option<bool> {
    let raw = props.get(key)?.trim();
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => {
            problems.push(LoggerError::config(
                key,
                format!("'{}' is not a boolean", raw),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_from(text: &str) -> (LoggerConfig, Vec<LoggerError>) {
        let props = Properties::parse(text).unwrap();
        LoggerConfig::from_properties(&props, &FormatterRegistry::default())
    }

    #[test]
    fn test_defaults_when_empty() {
        let (config, problems) = config_from("");
        assert!(problems.is_empty());
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.level, LevelFilter::All);
        assert_eq!(config.formatter, "default");
    }

    #[test]
    fn test_all_keys() {
        let (config, problems) = config_from(
            "logLevel=WARNING\n\
             customLogFormatter=simple\n\
             logFilePath=logs/app.log\n\
             logFileLimit=1024\n\
             logFileCount=3\n\
             logFileBuffered=false\n\
             logFileAppend=false\n",
        );
        assert!(problems.is_empty(), "{:?}", problems);
        assert_eq!(config.level, LevelFilter::Warn);
        assert_eq!(config.formatter, "simple");
        assert_eq!(config.output_path, Some(PathBuf::from("logs/app.log")));
        assert_eq!(config.rotation.max_bytes, 1024);
        assert_eq!(config.rotation.max_backups, 3);
        assert!(!config.rotation.buffered);
        assert!(!config.rotation.append);
    }

    #[test]
    fn test_bad_level_falls_back() {
        let (config, problems) = config_from("logLevel=CHATTY\nlogFileLimit=10");
        assert_eq!(config.level, LevelFilter::All);
        assert_eq!(config.rotation.max_bytes, 10);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].is_config_error());
    }

    #[test]
    fn test_unknown_formatter_falls_back() {
        let (config, problems) = config_from("customLogFormatter=com.log.hernando.Fancy");
        assert_eq!(config.formatter, "default");
        assert!(matches!(problems[0], LoggerError::UnknownFormatter { .. }));
    }

    #[test]
    fn test_bad_numbers_and_booleans() {
        let (config, problems) =
            config_from("logFileLimit=big\nlogFileCount=0\nlogFileBuffered=maybe");
        assert_eq!(config.rotation, RotationPolicy::default());
        assert_eq!(problems.len(), 3);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, problems) = LoggerConfig::load(
            dir.path().join("missing.properties"),
            &FormatterRegistry::default(),
        );
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(problems.len(), 1);
        assert!(!problems[0].is_config_error());
    }

    #[test]
    fn test_from_json() {
        let registry = FormatterRegistry::default();
        let config = LoggerConfig::from_json(
            r#"{
                "level": "warning",
                "formatter": "com.example.SimpleFormatter",
                "output_path": "logs/app.log",
                "rotation": { "max_bytes": 1024, "max_backups": 3 }
            }"#,
            &registry,
        )
        .unwrap();
        assert_eq!(config.level, LevelFilter::Warn);
        assert_eq!(config.output_path, Some(PathBuf::from("logs/app.log")));
        assert_eq!(config.rotation.max_bytes, 1024);
        assert_eq!(config.rotation.max_backups, 3);
        assert!(config.rotation.buffered);

        assert_eq!(
            LoggerConfig::from_json("{}", &registry).unwrap(),
            LoggerConfig::default()
        );
    }

    #[test]
    fn test_from_json_rejects_bad_documents() {
        let registry = FormatterRegistry::default();
        for text in [
            r#"{"level": "CHATTY"}"#,
            r#"{"levle": "INFO"}"#,
            r#"{"rotation": {"max_backups": 0}}"#,
            r#"{"formatter": "fancy"}"#,
            "not json",
        ] {
            let err = LoggerConfig::from_json(text, &registry).unwrap_err();
            assert!(err.is_config_error(), "{}: {:?}", text, err);
        }
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logging.json");
        fs::write(&path, r#"{"level": "ERROR"}"#).unwrap();

        let registry = FormatterRegistry::default();
        let config = LoggerConfig::load_json(&path, &registry).unwrap();
        assert_eq!(config.level, LevelFilter::Error);
        assert!(LoggerConfig::load_json(dir.path().join("absent.json"), &registry).is_err());
    }

    #[test]
    fn test_try_load() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.properties");
        fs::write(&good, "logLevel = INFO\n").unwrap();
        let bad = dir.path().join("bad.properties");
        fs::write(&bad, "logLevel = LOUD\n").unwrap();

        let registry = FormatterRegistry::default();
        assert_eq!(
            LoggerConfig::try_load(&good, &registry).unwrap().level,
            LevelFilter::Info
        );
        assert!(LoggerConfig::try_load(&bad, &registry).is_err());
    }
}
