//! File logging example
//!
//! Demonstrates properties-based configuration, size rotation and
//! redirecting output while the program runs.
//!
//! Run with: cargo run --example file_logging

use customlog::prelude::*;
use std::fs;

fn main() -> Result<()> {
    println!("=== customlog - File Logging Example ===\n");

    fs::create_dir_all("demo_logs")?;
    fs::write(
        "demo_logs/logging.properties",
        "# demo configuration\n\
         logLevel = INFO\n\
         customLogFormatter = default\n\
         logFilePath = demo_logs/application.log\n\
         logFileLimit = 2048\n\
         logFileCount = 3\n",
    )?;

    println!("1. Logging through a properties-configured logger:");
    let logger = Logger::from_properties_file("demo_logs/logging.properties");
    logger.info("Application started", &[]);
    logger.debug("Loading configuration... (below threshold)", &[]);
    logger.warn("Using default settings for {} options", &[&2]);

    println!("2. Writing enough records to rotate:");
    for i in 0..100 {
        logger.info("Processing item {} of {}", &[&i, &100]);
    }
    logger.flush()?;

    for name in ["application.log", "application.log.1", "application.log.2", "application.log.3"] {
        let path = format!("demo_logs/{}", name);
        match fs::metadata(&path) {
            Ok(meta) => println!("   {} ({} bytes)", path, meta.len()),
            Err(_) => println!("   {} (absent)", path),
        }
    }

    println!("3. Redirecting to a second file:");
    logger.set_output_path("demo_logs/after_redirect.log")?;
    logger.info("Now writing to {}", &[&"after_redirect.log"]);
    logger.flush()?;

    println!("\nLast lines of demo_logs/after_redirect.log:");
    let content = fs::read_to_string("demo_logs/after_redirect.log")?;
    for line in content.lines().rev().take(3) {
        println!("   {}", line);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
