//! Log level and threshold definitions

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Severity of a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<LevelFilter>()? {
            LevelFilter::Debug => Ok(LogLevel::Debug),
            LevelFilter::Info => Ok(LogLevel::Info),
            LevelFilter::Warn => Ok(LogLevel::Warn),
            LevelFilter::Error => Ok(LogLevel::Error),
            LevelFilter::All | LevelFilter::Off => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Minimum severity a record needs to be written
///
/// `All` lets every record through and is the default; `Off` silences the
/// logger entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LevelFilter {
    #[default]
    All = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LevelFilter {
    pub fn to_str(&self) -> &'static str {
        match self {
            LevelFilter::All => "ALL",
            LevelFilter::Debug => "DEBUG",
            LevelFilter::Info => "INFO",
            LevelFilter::Warn => "WARN",
            LevelFilter::Error => "ERROR",
            LevelFilter::Off => "OFF",
        }
    }

    /// Whether a record at `level` passes this threshold
    #[inline]
    #[must_use]
    pub fn allows(&self, level: LogLevel) -> bool {
        (level as u8) >= (*self as u8)
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl TryFrom<String> for LevelFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, <LevelFilter as TryFrom<String>>::Error> {
        value.parse()
    }
}

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The classic java.util.logging names are accepted as aliases so that
        // existing logging.properties files keep working.
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(LevelFilter::All),
            "TRACE" | "FINEST" | "FINER" | "FINE" | "CONFIG" | "DEBUG" => Ok(LevelFilter::Debug),
            "INFO" => Ok(LevelFilter::Info),
            "WARN" | "WARNING" => Ok(LevelFilter::Warn),
            "ERROR" | "SEVERE" | "FATAL" => Ok(LevelFilter::Error),
            "OFF" => Ok(LevelFilter::Off),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
