//! Basic logger usage example
//!
//! Demonstrates console logging, placeholder messages, thresholds, named
//! loggers and error traces.
//!
//! Run with: cargo run --example basic_usage

use customlog::prelude::*;
use customlog::{error, info, warn};

#[derive(Debug, thiserror::Error)]
#[error("configuration file is missing key '{0}'")]
struct MissingKey(&'static str);

fn main() {
    println!("=== customlog - Basic Usage Example ===\n");

    // Without an output path every record goes to stderr
    let logger = Logger::new();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message", &[]);
    logger.info("This is an info message", &[]);
    logger.warn("This is a warning message", &[]);
    logger.error("This is an error message", None, &[]);

    println!("\n2. Placeholders:");
    logger.info("value={} count={}", &[&"x", &3]);
    logger.info("no placeholder, one parameter", &[&42]);
    info!(logger, "Server listening on port {}", 8080);

    println!("\n3. Threshold set to WARN - debug and info won't show:");
    logger.set_level(LevelFilter::Warn);
    logger.debug("Debug message (hidden)", &[]);
    logger.info("Info message (hidden)", &[]);
    warn!(logger, "Warning message (visible)");

    println!("\n4. Named loggers share the threshold and sink:");
    let db = logger.named("Database");
    db.warn("pool at {}% capacity", &[&92]);

    println!("\n5. Errors with a trace:");
    let err = MissingKey("logFilePath");
    error!(db, err = err, "Could not load {}", "settings");

    println!("\n=== Example completed successfully! ===");
}
