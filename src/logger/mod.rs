//! Structured logging for the balance exporter
//!
//! Provides a small tagged logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-tag debug control via `--debug <tag>` flags
//! - Dual output: colored console + daily log file
//!
//! ## Usage
//!
//! ```ignore
//! use balance_exporter::logger::{self, LogTag};
//!
//! logger::error(LogTag::Rpc, "getBalance failed");
//! logger::warning(LogTag::Prices, "Rate limited, retrying in 62s");
//! logger::info(LogTag::Export, "Wrote 7uqs-balances.csv");
//! logger::debug(LogTag::Http, "GET https://..."); // Only with --debug http
//! logger::verbose(LogTag::Cache, "Cache dump ..."); // Only with --verbose
//! ```
//!
//! ## Initialization
//!
//! Call once at startup, after the paths module has created the logs directory:
//! ```ignore
//! logger::init(LoggerConfig::default());
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Stores the configuration and opens the log file when file output is
/// enabled. Safe to call more than once; the last call wins.
pub fn init(config: LoggerConfig) {
    let file_enabled = config.file_enabled;
    set_logger_config(config);

    if file_enabled {
        file::init_file_logging(&crate::paths::get_logs_directory());
    }
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (shown unless --quiet raised the threshold further)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when `--debug <tag>` names this tag (or `--debug all`).
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
///
/// Call this before exit so buffered lines reach the log file.
pub fn flush() {
    file::flush_file_logging();
}
