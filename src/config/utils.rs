use super::schemas::Config;
/// Configuration utilities - loading and access helpers
///
/// - Loading configuration from disk (defaults when the file is absent)
/// - Thread-safe access through `with_config`
/// - In-place updates for CLI overrides
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

/// Global configuration instance
///
/// Access it through `with_config` / `get_config_clone`. Reading before
/// `load_config_from_path` initializes it with defaults.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Parse a configuration file without touching the global instance
///
/// A missing file yields `Config::default()`.
pub fn read_config_file(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

    toml::from_str::<Config>(&contents)
        .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))
}

/// Load configuration from a specific file path and initialize the global CONFIG
///
/// Returns `true` when the file existed, `false` when defaults were used.
pub fn load_config_from_path(path: &Path) -> Result<bool, String> {
    let existed = path.exists();
    let config = read_config_file(path)?;

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(existed)
}

/// Execute a function with read access to the configuration
///
/// ```ignore
/// let url = with_config(|cfg| cfg.rpc.url.clone());
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    let config_lock = CONFIG.get_or_init(|| RwLock::new(Config::default()));
    let config = config_lock.read().unwrap_or_else(|e| e.into_inner());
    f(&config)
}

/// Get a clone of the entire configuration
///
/// Use when values are needed across await points.
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

/// Apply an in-memory update (CLI overrides); nothing is written to disk
pub fn update_config<F>(update_fn: F)
where
    F: FnOnce(&mut Config),
{
    let config_lock = CONFIG.get_or_init(|| RwLock::new(Config::default()));
    let mut config = config_lock.write().unwrap_or_else(|e| e.into_inner());
    update_fn(&mut config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rpc.url, "https://api.mainnet-beta.solana.com");
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.http.base_delay_ms, 1000);
        assert_eq!(config.prices.rate_limit_fallback_secs, 62);
        assert!(config.export.skip_dust_balances);
        assert!(config.export.skip_unknown_tokens);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[rpc]"));
        assert!(toml_str.contains("[prices]"));
        assert!(toml_str.contains("[export]"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[rpc]\nurl = \"http://localhost:8899\"\n\n[export]\nskip_dust_balances = false"
        )
        .unwrap();

        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.rpc.url, "http://localhost:8899");
        assert_eq!(config.rpc.commitment, "confirmed");
        assert!(!config.export.skip_dust_balances);
        assert!(config.export.skip_unknown_tokens);
        assert_eq!(config.http, Default::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = read_config_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rpc\nurl = ").unwrap();
        assert!(read_config_file(file.path()).is_err());
    }
}
