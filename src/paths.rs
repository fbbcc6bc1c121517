//! Centralized path resolution for the balance exporter
//!
//! All file and directory paths are resolved through this module so that every
//! subcommand reads and writes the same locations.
//!
//! ## Path Strategy
//!
//! The base directory follows platform standards:
//! - **macOS**: `~/Library/Application Support/BalanceExporter/`
//! - **Windows**: `%LOCALAPPDATA%\BalanceExporter\`
//! - **Linux**: `$XDG_DATA_HOME/BalanceExporter/` (fallback `~/.local/share/BalanceExporter/`)
//!
//! `BALANCE_EXPORTER_HOME` overrides the base directory entirely.
//!
//! ## Directory Structure
//!
//! ```text
//! BalanceExporter/
//! ├── data/
//! │ ├── config.toml
//! │ ├── coingecko_list.json
//! │ └── price_cache.json
//! ├── logs/
//! │ └── balance_exporter_*.log
//! └── exports/
//!   └── *-balances.csv
//! ```

use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Environment variable that overrides the base directory
pub const HOME_ENV_VAR: &str = "BALANCE_EXPORTER_HOME";

// =============================================================================
// BASE DIRECTORY RESOLUTION
// =============================================================================

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
  const APP_DIR: &str = "BalanceExporter";

  if let Ok(dir) = std::env::var(HOME_ENV_VAR) {
    if !dir.trim().is_empty() {
      return PathBuf::from(dir);
    }
  }

  if let Some(dir) = dirs::data_local_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(dir) = dirs::data_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(home) = dirs::home_dir() {
    return home.join(APP_DIR);
  }

  PathBuf::from(APP_DIR)
}

// =============================================================================
// PRIMARY DIRECTORY ACCESSORS
// =============================================================================

pub fn get_base_directory() -> PathBuf {
  BASE_DIRECTORY.clone()
}

/// Config, reference list and price cache
pub fn get_data_directory() -> PathBuf {
  BASE_DIRECTORY.join("data")
}

pub fn get_logs_directory() -> PathBuf {
  BASE_DIRECTORY.join("logs")
}

/// Default output directory for CSV reports
pub fn get_exports_directory() -> PathBuf {
  BASE_DIRECTORY.join("exports")
}

// =============================================================================
// FILE PATHS
// =============================================================================

pub fn get_config_path() -> PathBuf {
  get_data_directory().join("config.toml")
}

/// CoinGecko coin list written by `fetch-coin-list`
pub fn get_coin_list_path() -> PathBuf {
  get_data_directory().join("coingecko_list.json")
}

/// Persisted historical price cache
pub fn get_price_cache_path() -> PathBuf {
  get_data_directory().join("price_cache.json")
}

// =============================================================================
// DIRECTORY INITIALIZATION
// =============================================================================

/// Create every directory the application writes into
pub fn ensure_all_directories() -> Result<(), String> {
  let dirs_to_create = vec![
    ("base", get_base_directory()),
    ("data", get_data_directory()),
    ("logs", get_logs_directory()),
    ("exports", get_exports_directory()),
  ];

  for (name, dir) in dirs_to_create {
    if !dir.exists() {
      std::fs::create_dir_all(&dir).map_err(|e| {
        format!(
          "Failed to create {} directory at {}: {}",
          name,
          dir.display(),
          e
        )
      })?;
    }
  }

  Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
