//! Logging macros for placeholder messages.
//!
//! Arguments are passed as `&dyn Display` and substituted into `{}`
//! placeholders by the formatter, so nothing is rendered when the level is
//! disabled.
//!
//! # Examples
//!
//! ```
//! use customlog::prelude::*;
//! use customlog::{error, info};
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "refused");
//! error!(logger, err = err, "Connection to {} failed", "db-1");
//! ```

/// Log a message at an explicit level.
///
/// ```
/// # use customlog::prelude::*;
/// # let logger = Logger::new();
/// use customlog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log(
            $level,
            $template,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
        )
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.debug($template, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.info($template, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.warn($template, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Log an error-level message, optionally with the error that caused it.
///
/// With `err = ...` the error's message, its `source()` chain and any
/// captured backtrace are written after the line. The expression must be a
/// value implementing `Error`; for a boxed error pass the box's contents with
/// `err = *boxed`, since `Box<dyn Error>` itself is not an `Error`.
///
/// ```
/// # use customlog::prelude::*;
/// # let logger = Logger::new();
/// use customlog::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
///
/// let cause = "x".parse::<u32>().unwrap_err();
/// error!(logger, err = cause, "Bad port in {}", "config");
///
/// let boxed: Box<dyn std::error::Error + Send + Sync> = "disk full".into();
/// error!(logger, err = *boxed, "Flush failed");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, err = $err:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.error(
            $template,
            ::std::option::Option::Some(&$err as &(dyn ::std::error::Error + 'static)),
            &[$(&$arg as &dyn ::std::fmt::Display),*],
        )
    };
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.error(
            $template,
            ::std::option::Option::None,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
        )
    };
}
