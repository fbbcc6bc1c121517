/// Logger configuration shared by all logging calls
use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped (Debug/Verbose have extra gates)
    pub min_level: LogLevel,
    /// Tags with debug output enabled
    pub debug_tags: HashSet<LogTag>,
    /// Mirror console output to the daily log file
    pub file_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            file_enabled: true,
        }
    }
}

impl LoggerConfig {
    /// Build from CLI flags
    ///
    /// `debug` accepts tag keys (`http`, `prices`, ...) or `all`; unknown keys
    /// are ignored.
    pub fn from_flags(debug: &[String], verbose: bool, quiet: bool) -> Self {
        let mut debug_tags = HashSet::new();
        for key in debug {
            if key.eq_ignore_ascii_case("all") {
                debug_tags.extend(LogTag::ALL);
            } else if let Some(tag) = LogTag::from_debug_key(key) {
                debug_tags.insert(tag);
            }
        }

        let min_level = if verbose {
            LogLevel::Verbose
        } else if quiet {
            LogLevel::Warning
        } else if !debug_tags.is_empty() {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };

        Self {
            min_level,
            debug_tags,
            file_enabled: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(_) => LoggerConfig::default(),
    }
}

pub fn set_logger_config(config: LoggerConfig) {
    if let Ok(mut current) = LOGGER_CONFIG.write() {
        *current = config;
    }
}

pub(super) fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().debug_tags.contains(tag)
}
