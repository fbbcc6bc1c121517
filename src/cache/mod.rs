/// Persistent caches
///
/// Metadata results live only in memory inside `TokenMetadataResolver`; the
/// price cache is the one that survives between runs.
pub mod price_cache;

pub use price_cache::PriceCache;
