/// On-disk price cache: `"<tokenId>_<YYYY-MM-DD>"` → number or `"Unknown"`
///
/// The whole map is rewritten on every persist. A key, once stored, keeps its
/// first value.
use crate::logger::{self, LogTag};
use crate::tokens::types::Price;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    path: Option<PathBuf>,
    entries: HashMap<String, Price>,
}

impl PriceCache {
    /// Cache key for one token on one day
    pub fn key(token_id: &str, date: &str) -> String {
        format!("{}_{}", token_id, date)
    }

    /// Cache that never touches disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`
    ///
    /// A missing file is an empty cache. Unreadable or malformed files are
    /// logged and also start empty; the next persist overwrites them.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<HashMap<String, Price>>(&data) {
                Ok(entries) => {
                    logger::debug(
                        LogTag::Cache,
                        &format!("Loaded {} cached prices from {}", entries.len(), path.display()),
                    );
                    entries
                }
                Err(e) => {
                    logger::warning(
                        LogTag::Cache,
                        &format!("Ignoring malformed price cache {}: {}", path.display(), e),
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                logger::warning(
                    LogTag::Cache,
                    &format!("Failed to read price cache {}: {}", path.display(), e),
                );
                HashMap::new()
            }
        };

        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn get(&self, key: &str) -> Option<Price> {
        self.entries.get(key).copied()
    }

    /// Store `price` unless `key` already has a value; returns the stored value
    pub fn insert(&mut self, key: String, price: Price) -> Price {
        *self.entries.entry(key).or_insert(price)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the backing file with the full map (no-op for in-memory caches)
    pub fn persist(&self) -> Result<(), String> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };

        let sorted: BTreeMap<&String, &Price> = self.entries.iter().collect();
        let data = serde_json::to_string_pretty(&sorted)
            .map_err(|e| format!("Failed to serialize price cache: {}", e))?;
        fs::write(path, data).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_cache() {
        let dir = TempDir::new().unwrap();
        let cache = PriceCache::load(dir.path().join("price_cache.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("price_cache.json");
        fs::write(&path, "{not json").unwrap();

        let cache = PriceCache::load(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("price_cache.json");

        let mut cache = PriceCache::load(&path);
        cache.insert(PriceCache::key("solana", "2023-12-30"), Price::Usd(101.52));
        cache.insert(PriceCache::key("ghost", "2023-12-30"), Price::Unknown);
        cache.persist().unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["solana_2023-12-30"], 101.52);
        assert_eq!(raw["ghost_2023-12-30"], "Unknown");

        let reloaded = PriceCache::load(&path);
        assert_eq!(reloaded.get("solana_2023-12-30"), Some(Price::Usd(101.52)));
        assert_eq!(reloaded.get("ghost_2023-12-30"), Some(Price::Unknown));
    }

    #[test]
    fn test_insert_keeps_first_value() {
        let mut cache = PriceCache::in_memory();
        assert_eq!(cache.insert("usd-coin_2024-01-01".to_string(), Price::Usd(1.0)), Price::Usd(1.0));
        assert_eq!(cache.insert("usd-coin_2024-01-01".to_string(), Price::Usd(0.99)), Price::Usd(1.0));
        assert_eq!(cache.get("usd-coin_2024-01-01"), Some(Price::Usd(1.0)));
        assert!(cache.persist().is_ok());
    }
}
